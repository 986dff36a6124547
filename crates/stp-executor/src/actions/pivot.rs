use stp_core::Angle;

use super::{Action, ActionCtx, ActionProgress};
use crate::{Coordinate, Primitive};

const ANGLE_TOLERANCE: f64 = 0.05;

/// Swings around a point until the robot faces another one.
pub struct Pivot {
    center: Coordinate,
    facing: Coordinate,
}

impl Pivot {
    pub fn new(center: impl Into<Coordinate>, facing: impl Into<Coordinate>) -> Self {
        Self {
            center: center.into(),
            facing: facing.into(),
        }
    }

    /// The heading the robot ends up with.
    pub fn final_orientation(&self, ctx: &ActionCtx<'_>) -> Angle {
        self.facing
            .heading_from(self.center.evaluate(&ctx.view), &ctx.view)
    }
}

impl Action for Pivot {
    fn step(&mut self, ctx: &ActionCtx<'_>) -> ActionProgress {
        let center = self.center.evaluate(&ctx.view);
        let orientation = self.facing.heading_from(center, &ctx.view);
        let swing = orientation - ctx.player.yaw;
        if swing.abs() < ANGLE_TOLERANCE {
            return ActionProgress::success();
        }
        ActionProgress::Continue(Primitive::Pivot {
            center,
            swing,
            orientation,
        })
    }
}
