use super::{Action, ActionCtx, ActionProgress};
use crate::{Coordinate, Primitive};

const ARRIVAL_TOLERANCE: f64 = 50.0;

/// Moves to a point while spinning.
pub struct Spin {
    dest: Coordinate,
    speed: f64,
}

impl Spin {
    /// `speed` is the angular speed in rad/s; its sign gives the direction.
    pub fn new(dest: impl Into<Coordinate>, speed: f64) -> Self {
        Self {
            dest: dest.into(),
            speed,
        }
    }
}

impl Action for Spin {
    fn step(&mut self, ctx: &ActionCtx<'_>) -> ActionProgress {
        let dest = self.dest.evaluate(&ctx.view);
        if (dest - ctx.player.position).norm() < ARRIVAL_TOLERANCE {
            return ActionProgress::success();
        }
        ActionProgress::Continue(Primitive::Spin {
            dest,
            speed: self.speed,
        })
    }
}
