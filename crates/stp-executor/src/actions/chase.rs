use stp_core::Angle;

use super::{Action, ActionCtx, ActionProgress};
use crate::Primitive;

/// Drives onto the ball until it is on the dribbler. Fails when the ball is not tracked.
#[derive(Default)]
pub struct Chase;

impl Chase {
    pub fn new() -> Self {
        Self
    }
}

impl Action for Chase {
    fn step(&mut self, ctx: &ActionCtx<'_>) -> ActionProgress {
        if ctx.player.has_ball {
            return ActionProgress::success();
        }
        let Some(ball) = &ctx.view.world.ball else {
            return ActionProgress::failure();
        };
        let ball = ball.position2();
        ActionProgress::Continue(Primitive::DribbleTo {
            dest: ball,
            orientation: Angle::between_points(ctx.player.position, ball),
        })
    }
}
