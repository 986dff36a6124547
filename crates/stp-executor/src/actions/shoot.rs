use stp_core::{Angle, Vector2};

use super::{Action, ActionCtx, ActionProgress};
use crate::{Coordinate, Primitive};

/// Distance behind the ball where the approach ends.
const APPROACH_DISTANCE: f64 = 250.0;
/// Distance between robot center and ball center when the ball touches the kicker.
const KICK_DISTANCE: f64 = 90.0;
const POSITION_TOLERANCE: f64 = 60.0;
const ANGLE_TOLERANCE: f64 = 0.1;
/// The ball moving further than this from the robot restarts the approach.
const LOST_BALL_DISTANCE: f64 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Approach,
    Turn,
    Kick,
    Kicked,
}

/// Gets behind the ball, lines up with the target and kicks.
pub struct ShootAt {
    target: Coordinate,
    power: f64,
    chip: bool,
    phase: Phase,
}

impl ShootAt {
    pub fn new(target: impl Into<Coordinate>, power: f64) -> Self {
        Self {
            target: target.into(),
            power,
            chip: false,
            phase: Phase::Approach,
        }
    }

    pub fn chip(mut self) -> Self {
        self.chip = true;
        self
    }
}

impl Action for ShootAt {
    fn step(&mut self, ctx: &ActionCtx<'_>) -> ActionProgress {
        let Some(ball) = &ctx.view.world.ball else {
            log::debug!("p{}: lost the ball while shooting", ctx.player.id);
            return ActionProgress::failure();
        };
        let ball = ball.position2();
        let target = self.target.evaluate(&ctx.view);
        let heading = Angle::between_points(ball, target);
        let behind = |distance: f64| approach_point(ball, target, distance);
        let position = ctx.player.position;

        loop {
            match self.phase {
                Phase::Approach => {
                    let approach = behind(APPROACH_DISTANCE);
                    if ctx.player.has_ball || (approach - position).norm() < POSITION_TOLERANCE {
                        self.phase = Phase::Turn;
                        continue;
                    }
                    let next = ctx.plan_path(approach).first().copied();
                    return ActionProgress::Continue(Primitive::MoveTo {
                        dest: next.unwrap_or(position),
                        orientation: heading,
                        end_speed: 0.0,
                    });
                }
                Phase::Turn => {
                    if (ball - position).norm() > LOST_BALL_DISTANCE {
                        self.phase = Phase::Approach;
                        return ActionProgress::Continue(Primitive::Stop);
                    }
                    let kick_spot = behind(KICK_DISTANCE);
                    let aligned = (ctx.player.yaw - heading).abs() < ANGLE_TOLERANCE;
                    let touching =
                        ctx.player.has_ball || (kick_spot - position).norm() < POSITION_TOLERANCE;
                    if aligned && touching {
                        self.phase = Phase::Kick;
                        continue;
                    }
                    return ActionProgress::Continue(Primitive::MoveTo {
                        dest: kick_spot,
                        orientation: heading,
                        end_speed: 0.0,
                    });
                }
                Phase::Kick => {
                    self.phase = Phase::Kicked;
                    return ActionProgress::Continue(Primitive::Shoot {
                        target,
                        power: self.power,
                        chip: self.chip,
                    });
                }
                Phase::Kicked => return ActionProgress::success(),
            }
        }
    }
}

/// Point `distance` behind `ball` on the line from `target` through the ball.
pub fn approach_point(ball: Vector2, target: Vector2, distance: f64) -> Vector2 {
    ball - Angle::between_points(ball, target).to_unit_vector() * distance
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use stp_core::{PlayerData, PlayerId, WorldData};

    use super::*;
    use crate::actions::{test_util::Harness, ActionResult};

    fn harness(player: PlayerData) -> Harness {
        Harness::new(
            WorldData::new(0.0)
                .with_ball(Vector2::new(1000.0, 0.0))
                .with_own_player(player),
        )
    }

    #[test]
    fn approaches_from_behind_the_ball() {
        let h = harness(PlayerData::new(PlayerId::new(0), Vector2::new(0.0, 1000.0)));
        let mut shoot = ShootAt::new(Vector2::new(6000.0, 0.0), 6.0);
        match shoot.step(&h.ctx(0)) {
            ActionProgress::Continue(Primitive::MoveTo {
                dest, orientation, ..
            }) => {
                assert_relative_eq!(dest.x, 750.0, epsilon = 1e-9);
                assert_relative_eq!(dest.y, 0.0, epsilon = 1e-9);
                assert_eq!(orientation, Angle::ZERO);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(shoot.phase, Phase::Approach);
    }

    #[test]
    fn kicks_once_lined_up_then_finishes() {
        let lined_up = PlayerData::new(PlayerId::new(0), Vector2::new(910.0, 0.0)).with_ball(true);
        let h = harness(lined_up);
        let mut shoot = ShootAt::new(Vector2::new(6000.0, 0.0), 6.0).chip();
        match shoot.step(&h.ctx(0)) {
            ActionProgress::Continue(Primitive::Shoot {
                target,
                power,
                chip,
            }) => {
                assert_eq!(target, Vector2::new(6000.0, 0.0));
                assert_relative_eq!(power, 6.0);
                assert!(chip);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            shoot.step(&h.ctx(0)),
            ActionProgress::Done(ActionResult::Success)
        ));
    }

    #[test]
    fn turns_before_kicking() {
        let facing_away = PlayerData::new(PlayerId::new(0), Vector2::new(760.0, 0.0))
            .with_yaw(Angle::PI);
        let h = harness(facing_away);
        let mut shoot = ShootAt::new(Vector2::new(6000.0, 0.0), 6.0);
        match shoot.step(&h.ctx(0)) {
            ActionProgress::Continue(Primitive::MoveTo {
                dest, orientation, ..
            }) => {
                assert_relative_eq!(dest.x, 910.0, epsilon = 1e-9);
                assert_eq!(orientation, Angle::ZERO);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(shoot.phase, Phase::Turn);
    }

    #[test]
    fn approach_point_is_behind_ball() {
        let p = approach_point(Vector2::zeros(), Vector2::new(0.0, 100.0), 50.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, -50.0, epsilon = 1e-9);
    }
}
