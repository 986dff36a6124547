use stp_core::Angle;

use super::{Action, ActionCtx, ActionProgress};
use crate::{Coordinate, Primitive};

const DEFAULT_TOLERANCE: f64 = 50.0;

/// Drives to a coordinate along a navigated path.
///
/// When no path can be found the robot holds its position and the action keeps trying
/// on later cycles.
pub struct GoTo {
    dest: Coordinate,
    orientation: Option<Angle>,
    facing: Option<Coordinate>,
    end_speed: f64,
    tolerance: f64,
    holding: bool,
}

impl GoTo {
    pub fn new(dest: impl Into<Coordinate>) -> Self {
        Self {
            dest: dest.into(),
            orientation: None,
            facing: None,
            end_speed: 0.0,
            tolerance: DEFAULT_TOLERANCE,
            holding: false,
        }
    }

    pub fn with_orientation(mut self, orientation: Angle) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Keeps facing a coordinate, re-evaluated every cycle. A fixed orientation wins.
    pub fn with_facing(mut self, facing: impl Into<Coordinate>) -> Self {
        self.facing = Some(facing.into());
        self
    }

    pub fn with_end_speed(mut self, end_speed: f64) -> Self {
        self.end_speed = end_speed;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Action for GoTo {
    fn step(&mut self, ctx: &ActionCtx<'_>) -> ActionProgress {
        let position = ctx.player.position;
        let dest = self.dest.evaluate(&ctx.view);
        let orientation = self
            .orientation
            .or_else(|| {
                self.facing
                    .as_ref()
                    .map(|f| f.heading_from(position, &ctx.view))
            })
            .unwrap_or(ctx.player.yaw);
        if (dest - position).norm() < self.tolerance {
            return ActionProgress::success();
        }

        let path = ctx.plan_path(dest);
        let Some(next) = path.first().copied() else {
            if !self.holding {
                log::debug!("p{}: no path to {:?}, holding", ctx.player.id, dest);
                self.holding = true;
            }
            return ActionProgress::Continue(Primitive::MoveTo {
                dest: position,
                orientation,
                end_speed: 0.0,
            });
        };
        self.holding = false;

        // Keep moving through intermediate waypoints.
        let end_speed = if path.len() > 1 {
            ctx.view.settings.navigator.robot_radius * 10.0
        } else {
            self.end_speed
        };
        ActionProgress::Continue(Primitive::MoveTo {
            dest: next,
            orientation,
            end_speed,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_4;

    use approx::assert_relative_eq;
    use stp_core::{PlayerData, PlayerId, Vector2, WorldData};

    use super::*;
    use crate::actions::{test_util::Harness, ActionResult};

    #[test]
    fn moves_towards_destination_then_finishes() {
        let harness = Harness::new(WorldData::new(0.0).with_own_player(PlayerData::new(
            PlayerId::new(0),
            Vector2::zeros(),
        )));
        let mut go_to = GoTo::new(Vector2::new(1000.0, 0.0)).with_orientation(Angle::PI_2);
        match go_to.step(&harness.ctx(0)) {
            ActionProgress::Continue(Primitive::MoveTo {
                dest, orientation, ..
            }) => {
                assert_eq!(dest, Vector2::new(1000.0, 0.0));
                assert_eq!(orientation, Angle::PI_2);
            }
            other => panic!("unexpected {:?}", other),
        }

        let arrived = Harness::new(WorldData::new(0.0).with_own_player(PlayerData::new(
            PlayerId::new(0),
            Vector2::new(990.0, 0.0),
        )));
        assert!(matches!(
            go_to.step(&arrived.ctx(0)),
            ActionProgress::Done(ActionResult::Success)
        ));
    }

    #[test]
    fn follows_a_moving_facing_target() {
        let world = |ball: Vector2| {
            WorldData::new(0.0)
                .with_ball(ball)
                .with_own_player(PlayerData::new(PlayerId::new(0), Vector2::zeros()))
        };
        let mut go_to = GoTo::new(Vector2::new(3000.0, 0.0)).with_facing(Coordinate::Ball);
        let mut headings = Vec::new();
        for ball in [Vector2::new(1000.0, 1000.0), Vector2::new(-1000.0, 1000.0)] {
            match go_to.step(&Harness::new(world(ball)).ctx(0)) {
                ActionProgress::Continue(Primitive::MoveTo { orientation, .. }) => {
                    headings.push(orientation.radians())
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_relative_eq!(headings[0], FRAC_PI_4, epsilon = 1e-9);
        assert_relative_eq!(headings[1], 3.0 * FRAC_PI_4, epsilon = 1e-9);
    }

    #[test]
    fn holds_position_without_path() {
        let start = Vector2::new(-500.0, 0.0);
        let harness = Harness::new(
            WorldData::new(0.0)
                .with_own_player(PlayerData::new(PlayerId::new(0), start))
                .with_opp_player(PlayerData::new(PlayerId::new(1), Vector2::new(1000.0, 0.0))),
        );
        let mut go_to = GoTo::new(Vector2::new(1000.0, 50.0));
        for _ in 0..3 {
            match go_to.step(&harness.ctx(0)) {
                ActionProgress::Continue(Primitive::MoveTo { dest, .. }) => {
                    assert_eq!(dest, start)
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }
}
