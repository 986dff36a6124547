use stp_core::{math::point_towards, Angle, PlayerData, PlayerId, Vector2};

use super::{closest_to, Tactic, TacticCtx};
use crate::{Coordinate, Primitive, WorldView};

/// Stands on the line from the ball to a coordinate, blocking it.
pub struct Block {
    guarded: Coordinate,
    distance: f64,
    active: bool,
}

impl Block {
    /// Keeps `distance` mm from the ball, towards `guarded`.
    pub fn new(guarded: impl Into<Coordinate>, distance: f64) -> Self {
        Self {
            guarded: guarded.into(),
            distance,
            active: false,
        }
    }

    pub fn as_active(mut self) -> Self {
        self.active = true;
        self
    }

    fn spot(&self, view: &WorldView<'_>) -> Vector2 {
        let ball = view.world.ball_position();
        let guarded = self.guarded.evaluate(view);
        let distance = self.distance.min((guarded - ball).norm());
        view.world
            .field_geom
            .clamp(point_towards(ball, guarded, distance))
    }
}

impl Tactic for Block {
    fn description(&self) -> String {
        format!("block {:?}", self.guarded)
    }

    fn active(&self) -> bool {
        self.active
    }

    fn select(&self, candidates: &[&PlayerData], view: &WorldView<'_>) -> Option<PlayerId> {
        closest_to(candidates, self.spot(view))
    }

    fn execute(&mut self, ctx: &mut TacticCtx<'_>) -> Primitive {
        let spot = self.spot(&ctx.view);
        let orientation = Angle::between_points(ctx.player.position, ctx.view.world.ball_position());
        let next = ctx.action_ctx().plan_path(spot).first().copied();
        Primitive::MoveTo {
            dest: next.unwrap_or(ctx.player.position),
            orientation,
            end_speed: 0.0,
        }
    }
}
