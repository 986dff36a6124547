use stp_core::{PlayerData, PlayerId};

use super::{closest_to, Tactic, TacticCtx};
use crate::{
    actions::{ActionProgress, ActionState, GoTo},
    invoke_action, Coordinate, Primitive, WorldView,
};

const ARRIVAL_TOLERANCE: f64 = 100.0;
/// Distance at which the robot stops driving and just holds its spot.
const HOLD_TOLERANCE: f64 = 50.0;
const GO_TO_KEY: &str = "go_to";

/// Moves to a coordinate and stays there.
pub struct Move {
    dest: Coordinate,
    facing: Option<Coordinate>,
    active: bool,
}

impl Move {
    pub fn new(dest: impl Into<Coordinate>) -> Self {
        Self {
            dest: dest.into(),
            facing: None,
            active: false,
        }
    }

    /// Face `facing` while moving.
    pub fn facing(mut self, facing: impl Into<Coordinate>) -> Self {
        self.facing = Some(facing.into());
        self
    }

    /// Makes this the ball-engaging tactic of its step. It is done on arrival.
    pub fn as_active(mut self) -> Self {
        self.active = true;
        self
    }

    fn go_to(&self) -> GoTo {
        let go_to = GoTo::new(self.dest.clone()).with_tolerance(HOLD_TOLERANCE);
        match &self.facing {
            Some(facing) => go_to.with_facing(facing.clone()),
            None => go_to,
        }
    }
}

impl Tactic for Move {
    fn description(&self) -> String {
        format!("move to {:?}", self.dest)
    }

    fn active(&self) -> bool {
        self.active
    }

    fn select(&self, candidates: &[&PlayerData], view: &WorldView<'_>) -> Option<PlayerId> {
        closest_to(candidates, self.dest.evaluate(view))
    }

    fn execute(&mut self, ctx: &mut TacticCtx<'_>) -> Primitive {
        let dest = self.dest.evaluate(&ctx.view);
        let position = ctx.player.position;

        // Pushed off the spot after arriving: drive back along a planned path.
        let away = (dest - position).norm() >= HOLD_TOLERANCE;
        if away && matches!(ctx.actions.get(GO_TO_KEY), Some(ActionState::Done(_))) {
            ctx.actions.remove(GO_TO_KEY);
        }

        match invoke_action!(ctx, GO_TO_KEY, self.go_to()) {
            ActionProgress::Continue(primitive) => primitive,
            ActionProgress::Done(_) => Primitive::MoveTo {
                dest,
                orientation: self
                    .facing
                    .as_ref()
                    .map(|f| f.heading_from(position, &ctx.view))
                    .unwrap_or(ctx.player.yaw),
                end_speed: 0.0,
            },
        }
    }

    fn done(&self, player: &PlayerData, view: &WorldView<'_>) -> bool {
        (self.dest.evaluate(view) - player.position).norm() < ARRIVAL_TOLERANCE
    }
}
