use stp_core::{math::find_intersection, Angle, PlayerData, PlayerId, Vector2};

use super::{closest_to, Tactic, TacticCtx};
use crate::{Primitive, WorldView};

/// Distance from the goal center the goalie keeps while guarding, in mm.
const GUARD_DISTANCE: f64 = 300.0;
/// Ball speeds above this are treated as shots when heading for our goal, in mm/s.
const DANGEROUS_BALL_SPEED: f64 = 100.0;
const CLEARING_POWER: f64 = 10.0;

/// Guards the goal on its own.
///
/// Clears the ball out of the defense area, rushes to block shots heading for the goal
/// and otherwise stays between the ball and the goal center.
#[derive(Default)]
pub struct Goalie {
    active: bool,
}

impl Goalie {
    pub fn new() -> Self {
        Self::default()
    }

    /// A goalie that is the play's active tactic, for when it is the only robot left.
    pub fn lone() -> Self {
        Self { active: true }
    }
}

impl Tactic for Goalie {
    fn description(&self) -> String {
        if self.active {
            "lone goalie".to_owned()
        } else {
            "goalie".to_owned()
        }
    }

    fn active(&self) -> bool {
        self.active
    }

    fn select(&self, candidates: &[&PlayerData], view: &WorldView<'_>) -> Option<PlayerId> {
        closest_to(candidates, view.world.field_geom.own_goal())
    }

    fn execute(&mut self, ctx: &mut TacticCtx<'_>) -> Primitive {
        let world = ctx.view.world;
        let field = &world.field_geom;
        let player = ctx.player;
        let ball = world.ball_position();
        let face_ball = Angle::between_points(player.position, ball);

        if world.ball.is_some() && field.in_own_defense_area(ball, 0.0) {
            // Only kick when facing away from our own goal.
            if player.has_ball && player.yaw.abs() < std::f64::consts::FRAC_PI_2 {
                return Primitive::Shoot {
                    target: field.opp_goal(),
                    power: CLEARING_POWER,
                    chip: false,
                };
            }
            return Primitive::DribbleTo {
                dest: ball,
                orientation: face_ball,
            };
        }

        let ball_vel = world.ball_velocity();
        if ball_vel.norm() > DANGEROUS_BALL_SPEED && ball_vel.x < -1e-6 {
            let guard_x = -field.half_length() + 1.5 * ctx.view.settings.navigator.robot_radius;
            let rush = find_intersection(ball, ball_vel, Vector2::new(guard_x, 0.0), Vector2::y());
            if let Some(rush) = rush {
                if rush.y.abs() < field.goal_width / 2.0 {
                    return Primitive::MoveTo {
                        dest: rush,
                        orientation: face_ball,
                        end_speed: 0.0,
                    };
                }
            }
        }

        let goal = field.own_goal();
        let to_ball = ball - goal;
        let dest = if to_ball.norm() < 1e-6 {
            goal + Vector2::new(GUARD_DISTANCE, 0.0)
        } else {
            goal + to_ball.normalize() * GUARD_DISTANCE
        };
        Primitive::MoveTo {
            dest,
            orientation: face_ball,
            end_speed: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use stp_core::{BallData, Vector3, WorldData};

    use super::*;
    use crate::tactics::{test_util::Harness, BoundTactic};

    fn goalie_at(position: Vector2) -> PlayerData {
        PlayerData::new(PlayerId::new(0), position)
    }

    #[test]
    fn guards_between_ball_and_goal() {
        let h = Harness::new(
            WorldData::new(0.0)
                .with_ball(Vector2::new(-6000.0, 3000.0))
                .with_own_player(goalie_at(Vector2::new(-5800.0, 0.0))),
        );
        let mut goalie = BoundTactic::new(Box::new(Goalie::new()));
        match h.execute(&mut goalie, 0) {
            Primitive::MoveTo { dest, .. } => {
                assert_relative_eq!(dest.x, -6000.0, epsilon = 1e-9);
                assert_relative_eq!(dest.y, 300.0, epsilon = 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rushes_to_block_shots() {
        let mut world = WorldData::new(0.0).with_own_player(goalie_at(Vector2::new(-5800.0, 0.0)));
        world.ball = Some(BallData {
            position: Vector3::new(-2000.0, 400.0, 0.0),
            velocity: Vector3::new(-4000.0, 0.0, 0.0),
            detected: true,
        });
        let h = Harness::new(world);
        let mut goalie = BoundTactic::new(Box::new(Goalie::new()));
        match h.execute(&mut goalie, 0) {
            Primitive::MoveTo { dest, .. } => {
                assert_relative_eq!(dest.x, -6000.0 + 135.0, epsilon = 1e-9);
                assert_relative_eq!(dest.y, 400.0, epsilon = 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn clears_ball_from_defense_area() {
        let ball = Vector2::new(-5500.0, 200.0);
        let h = Harness::new(
            WorldData::new(0.0)
                .with_ball(ball)
                .with_own_player(goalie_at(Vector2::new(-5800.0, 0.0))),
        );
        let mut goalie = BoundTactic::new(Box::new(Goalie::new()));
        assert!(matches!(
            h.execute(&mut goalie, 0),
            Primitive::DribbleTo { dest, .. } if dest == ball
        ));

        let h = Harness::new(
            WorldData::new(0.0)
                .with_ball(ball)
                .with_own_player(goalie_at(Vector2::new(-5590.0, 200.0)).with_ball(true)),
        );
        assert!(matches!(
            h.execute(&mut goalie, 0),
            Primitive::Shoot { target, .. } if target == Vector2::new(6000.0, 0.0)
        ));
    }
}
