//! Single-robot tasks.
//!
//! A [`Tactic`] is bound to at most one robot per cycle. It picks its preferred robot
//! from the unclaimed ones, and when executed emits a [`Primitive`] either directly or
//! by stepping an [`Action`](crate::actions::Action).

mod block;
mod chase;
mod goalie;
mod idle;
mod move_to;
mod patrol;
mod shoot;

use std::collections::HashMap;

pub use block::Block;
pub use chase::ChaseBall;
pub use goalie::Goalie;
pub use idle::Idle;
pub use move_to::Move;
pub use patrol::Patrol;
pub use shoot::Shoot;

use stp_core::{PlayerData, PlayerId, Vector2};

use crate::{
    actions::{ActionCtx, ActionMap},
    navigator::Navigator,
    MoveFlags, Primitive, WorldView,
};

pub struct TacticCtx<'a> {
    pub player: &'a PlayerData,
    pub view: WorldView<'a>,
    pub flags: MoveFlags,
    pub navigator: &'a dyn Navigator,
    pub actions: &'a mut ActionMap,
    invoke_counts: HashMap<&'static str, usize>,
}

impl<'a> TacticCtx<'a> {
    pub fn new(
        player: &'a PlayerData,
        view: WorldView<'a>,
        flags: MoveFlags,
        navigator: &'a dyn Navigator,
        actions: &'a mut ActionMap,
    ) -> Self {
        Self {
            player,
            view,
            flags,
            navigator,
            actions,
            invoke_counts: HashMap::new(),
        }
    }

    pub fn action_ctx(&self) -> ActionCtx<'a> {
        ActionCtx {
            player: self.player,
            view: self.view,
            flags: self.flags,
            navigator: self.navigator,
        }
    }

    /// Forgets every action, so the next invocations start from scratch.
    pub fn reset_actions(&mut self) {
        self.actions.clear();
    }

    #[doc(hidden)]
    pub fn next_invoke_count(&mut self, call_site: &'static str) -> usize {
        let count = self.invoke_counts.entry(call_site).or_insert(0);
        *count += 1;
        *count
    }
}

pub trait Tactic: Send {
    /// Short text for diagnostics.
    fn description(&self) -> String;

    /// Whether this tactic engages the ball. Fixed for the lifetime of the tactic.
    fn active(&self) -> bool {
        false
    }

    /// Picks the preferred robot among `candidates`, which is never empty. Must return
    /// one of them.
    fn select(&self, candidates: &[&PlayerData], view: &WorldView<'_>) -> Option<PlayerId>;

    /// Emits this cycle's primitive for the bound robot.
    fn execute(&mut self, ctx: &mut TacticCtx<'_>) -> Primitive;

    fn done(&self, _player: &PlayerData, _view: &WorldView<'_>) -> bool {
        false
    }

    fn fail(&self, _player: &PlayerData, _view: &WorldView<'_>) -> bool {
        false
    }

    /// Forgets progress kept on the tactic itself. Called whenever its robot changes,
    /// together with dropping the in-flight actions.
    fn reset(&mut self) {}
}

/// The candidate closest to `point`.
pub fn closest_to(candidates: &[&PlayerData], point: Vector2) -> Option<PlayerId> {
    candidates
        .iter()
        .min_by(|a, b| {
            (a.position - point)
                .norm()
                .total_cmp(&(b.position - point).norm())
        })
        .map(|p| p.id)
}

/// A tactic together with the robot it is bound to and its in-flight actions.
pub struct BoundTactic {
    tactic: Box<dyn Tactic>,
    player: Option<PlayerId>,
    actions: ActionMap,
}

impl BoundTactic {
    pub fn new(tactic: Box<dyn Tactic>) -> Self {
        Self {
            tactic,
            player: None,
            actions: ActionMap::new(),
        }
    }

    /// Binds the tactic to a robot. Rebinding to a different robot discards every
    /// in-flight action.
    pub fn bind(&mut self, id: PlayerId) {
        if self.player != Some(id) {
            if self.player.is_some() {
                log::debug!(
                    "{}: rebinding from p{:?} to p{}",
                    self.tactic.description(),
                    self.player,
                    id
                );
            }
            self.actions.clear();
            self.tactic.reset();
            self.player = Some(id);
        }
    }

    pub fn unbind(&mut self) {
        self.player = None;
        self.actions.clear();
        self.tactic.reset();
    }

    pub fn player(&self) -> Option<PlayerId> {
        self.player
    }

    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    pub fn active(&self) -> bool {
        self.tactic.active()
    }

    pub fn description(&self) -> String {
        self.tactic.description()
    }

    pub fn select(&self, candidates: &[&PlayerData], view: &WorldView<'_>) -> Option<PlayerId> {
        self.tactic.select(candidates, view)
    }

    pub fn execute(
        &mut self,
        player: &PlayerData,
        view: WorldView<'_>,
        flags: MoveFlags,
        navigator: &dyn Navigator,
    ) -> Primitive {
        let mut ctx = TacticCtx::new(player, view, flags, navigator, &mut self.actions);
        self.tactic.execute(&mut ctx)
    }

    /// Whether the bound robot finished the tactic. Unbound tactics are never done.
    pub fn done(&self, view: &WorldView<'_>) -> bool {
        self.bound_player(view)
            .map(|p| self.tactic.done(p, view))
            .unwrap_or(false)
    }

    pub fn fail(&self, view: &WorldView<'_>) -> bool {
        self.bound_player(view)
            .map(|p| self.tactic.fail(p, view))
            .unwrap_or(false)
    }

    fn bound_player<'v>(&self, view: &WorldView<'v>) -> Option<&'v PlayerData> {
        self.player.and_then(|id| view.world.own_player(id))
    }
}


#[cfg(test)]
mod tests {
    use stp_core::{PlayerData, PlayerId, Vector2, WorldData};

    use super::{test_util::Harness, *};
    use crate::{actions::Wait, invoke_action};

    #[test]
    fn closest_candidate() {
        let a = PlayerData::new(PlayerId::new(1), Vector2::new(0.0, 0.0));
        let b = PlayerData::new(PlayerId::new(2), Vector2::new(100.0, 0.0));
        assert_eq!(closest_to(&[&a, &b], Vector2::new(90.0, 0.0)), Some(PlayerId::new(2)));
        assert_eq!(closest_to(&[], Vector2::zeros()), None);
    }

    #[test]
    fn rebinding_discards_actions() {
        let h = Harness::new(
            WorldData::new(0.0)
                .with_own_player(PlayerData::new(PlayerId::new(0), Vector2::zeros()))
                .with_own_player(PlayerData::new(PlayerId::new(1), Vector2::new(0.0, 500.0))),
        );
        let mut tactic = BoundTactic::new(Box::new(Move::new(Vector2::new(2000.0, 0.0))));
        h.execute(&mut tactic, 0);
        assert!(tactic.has_actions());

        // Same robot keeps its progress.
        tactic.bind(PlayerId::new(0));
        assert!(tactic.has_actions());

        tactic.bind(PlayerId::new(1));
        assert!(!tactic.has_actions());
        assert_eq!(tactic.player(), Some(PlayerId::new(1)));

        h.execute(&mut tactic, 1);
        tactic.unbind();
        assert!(!tactic.has_actions());
        assert!(!tactic.done(&h.view()));
    }

    #[test]
    fn repeated_call_site_keeps_separate_actions() {
        let h = Harness::new(WorldData::new(0.0).with_own_player(PlayerData::new(
            PlayerId::new(0),
            Vector2::zeros(),
        )));
        let mut actions = ActionMap::new();
        let mut ctx = TacticCtx::new(
            &h.world.own_players[0],
            h.view(),
            MoveFlags::NONE,
            &h.navigator,
            &mut actions,
        );
        for _ in 0..2 {
            invoke_action!(ctx, Wait::cycles(3));
        }
        assert_eq!(actions.len(), 2);
        assert!(actions.keys().any(|k| k.ends_with("-1")));
        assert!(actions.keys().any(|k| k.ends_with("-2")));
    }
}
