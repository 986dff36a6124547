//! Resumable routines.
//!
//! An [`Action`] emits one [`Primitive`] per cycle and keeps whatever progress it needs
//! in its own fields until it reports [`ActionProgress::Done`]. Tactics drive actions
//! through the [`invoke_action!`](crate::invoke_action) and [`action!`](crate::action)
//! macros, which keep one action instance per call site in the tactic's [`ActionMap`].

mod chase;
mod go_to;
mod pivot;
mod shoot;
mod spin;
mod wait;

use std::collections::HashMap;

pub use chase::Chase;
pub use go_to::GoTo;
pub use pivot::Pivot;
pub use shoot::ShootAt;
pub use spin::Spin;
pub use wait::Wait;

use stp_core::{PlayerData, Vector2};

use crate::{
    navigator::{obstacles_for, NavRequest, Navigator},
    MoveFlags, Primitive, WorldView,
};

pub struct ActionCtx<'a> {
    pub player: &'a PlayerData,
    pub view: WorldView<'a>,
    pub flags: MoveFlags,
    pub navigator: &'a dyn Navigator,
}

impl ActionCtx<'_> {
    /// Plans a path for the player to `goal`, honoring the cycle's movement flags.
    pub fn plan_path(&self, goal: Vector2) -> Vec<Vector2> {
        let world = self.view.world;
        let obstacles = obstacles_for(
            self.player.id,
            world,
            self.flags,
            &self.view.settings.navigator,
        );
        self.navigator.plan(&NavRequest {
            start: self.player.position,
            goal,
            obstacles: &obstacles,
            flags: self.flags,
            field: &world.field_geom,
        })
    }
}

/// The result of an action execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    Success,
    Failure,
}

/// The progress of an action execution
#[derive(Debug)]
pub enum ActionProgress {
    Continue(Primitive),
    Done(ActionResult),
}

impl ActionProgress {
    pub fn success() -> ActionProgress {
        ActionProgress::Done(ActionResult::Success)
    }

    pub fn failure() -> ActionProgress {
        ActionProgress::Done(ActionResult::Failure)
    }
}

pub trait Action: Send {
    fn step(&mut self, ctx: &ActionCtx<'_>) -> ActionProgress;
}

/// The state of an action execution
pub enum ActionState {
    InProgress(Box<dyn Action>),
    Done(ActionResult),
}

/// In-flight actions of one tactic, keyed by call site.
pub type ActionMap = HashMap<String, ActionState>;

/// Invokes an action from a tactic's `execute` method, creating it on first use and
/// stepping it once. Evaluates to the [`ActionProgress`].
///
/// The key defaults to the call site plus an invocation counter, so calls must happen
/// in the same order every cycle. Pass an explicit key when they don't.
///
/// ```ignore
/// match invoke_action!(ctx, GoTo::new(dest)) {
///     ActionProgress::Continue(primitive) => primitive,
///     ActionProgress::Done(_) => Primitive::Stop,
/// }
/// ```
#[macro_export]
macro_rules! invoke_action {
    ($ctx:ident, $key:tt, $action:expr) => {{
        let player_id = $ctx.player.id;
        let action_ctx = $ctx.action_ctx();
        let action_state = $ctx.actions.entry($key.to_string()).or_insert_with(|| {
            log::trace!("p{} starts {}", player_id, stringify!($action));
            $crate::actions::ActionState::InProgress(Box::new($action))
        });
        match action_state {
            $crate::actions::ActionState::InProgress(action) => {
                let progress = action.step(&action_ctx);
                if let $crate::actions::ActionProgress::Done(result) = &progress {
                    log::trace!("p{} finished {:?}", player_id, result);
                    *action_state = $crate::actions::ActionState::Done(*result);
                }
                progress
            }
            $crate::actions::ActionState::Done(result) => {
                $crate::actions::ActionProgress::Done(*result)
            }
        }
    }};
    ($ctx:ident, $action:expr) => {{
        let line_key = concat!(file!(), ":", line!());
        let invoke_count = $ctx.next_invoke_count(line_key);
        let key = format!("{}-{}", line_key, invoke_count);
        $crate::invoke_action!($ctx, key, $action)
    }};
}

/// Like [`invoke_action!`], but returns the primitive from the enclosing `execute`
/// while the action runs, and evaluates to its [`ActionResult`] once it is done.
///
/// ```ignore
/// fn execute(&mut self, ctx: &mut TacticCtx<'_>) -> Primitive {
///     if action!(ctx, GoTo::new(self.dest.clone())) == ActionResult::Failure {
///         log::warn!("could not reach {:?}", self.dest);
///     }
///     Primitive::Stop
/// }
/// ```
#[macro_export]
macro_rules! action {
    ($ctx:ident, $key:tt, $action:expr) => {{
        match $crate::invoke_action!($ctx, $key, $action) {
            $crate::actions::ActionProgress::Continue(primitive) => return primitive,
            $crate::actions::ActionProgress::Done(result) => result,
        }
    }};
    ($ctx:ident, $action:expr) => {
        match $crate::invoke_action!($ctx, $action) {
            $crate::actions::ActionProgress::Continue(primitive) => return primitive,
            $crate::actions::ActionProgress::Done(result) => result,
        }
    };
}
