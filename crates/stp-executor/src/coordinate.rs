//! Lazily evaluated spatial references.

use std::f64::consts::PI;

use rand::Rng;
use stp_core::{Angle, Vector2};

use crate::WorldView;

/// Which way a [`Coordinate::Sided`] offset is mirrored along y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Not mirrored.
    Fixed,
    /// Mirrored to the side of the field the ball is on.
    Ball,
    /// Mirrored to the configured preferred side.
    Preferred,
}

/// What a [`Coordinate::Sided`] offset is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Absolute,
    Ball,
}

/// A point that is resolved against the world each time it is read.
///
/// Evaluation never fails. A role-relative coordinate whose slot has no robot logs a
/// warning and resolves to the field origin.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinate {
    Fixed(Vector2),
    Ball,
    /// The ball position plus an offset.
    BallOffset(Vector2),
    /// The position of the robot bound to a role slot, plus an offset.
    Role { slot: usize, offset: Vector2 },
    Sided {
        offset: Vector2,
        side: Side,
        origin: Origin,
    },
}

impl Coordinate {
    pub fn fixed(x: f64, y: f64) -> Self {
        Coordinate::Fixed(Vector2::new(x, y))
    }

    pub fn role(slot: usize) -> Self {
        Coordinate::Role {
            slot,
            offset: Vector2::zeros(),
        }
    }

    pub fn evaluate(&self, view: &WorldView<'_>) -> Vector2 {
        match self {
            Coordinate::Fixed(p) => *p,
            Coordinate::Ball => view.world.ball_position(),
            Coordinate::BallOffset(offset) => view.world.ball_position() + offset,
            Coordinate::Role { slot, offset } => match view.role_player(*slot) {
                Some(player) => player.position + offset,
                None => {
                    log::warn!("Coordinate refers to role slot {} with no robot", slot);
                    Vector2::zeros()
                }
            },
            Coordinate::Sided {
                offset,
                side,
                origin,
            } => {
                let origin = match origin {
                    Origin::Absolute => Vector2::zeros(),
                    Origin::Ball => view.world.ball_position(),
                };
                origin + Vector2::new(offset.x, offset.y * side_sign(*side, view))
            }
        }
    }

    /// Velocity of the referenced point in mm/s.
    pub fn velocity(&self, view: &WorldView<'_>) -> Vector2 {
        match self {
            Coordinate::Fixed(_) => Vector2::zeros(),
            Coordinate::Ball | Coordinate::BallOffset(_) => view.world.ball_velocity(),
            Coordinate::Role { slot, .. } => view
                .role_player(*slot)
                .map(|p| p.velocity)
                .unwrap_or_else(Vector2::zeros),
            Coordinate::Sided { origin, .. } => match origin {
                Origin::Absolute => Vector2::zeros(),
                Origin::Ball => view.world.ball_velocity(),
            },
        }
    }

    /// Heading from `from` towards the referenced point.
    pub fn heading_from(&self, from: Vector2, view: &WorldView<'_>) -> Angle {
        Angle::between_points(from, self.evaluate(view))
    }
}

impl From<Vector2> for Coordinate {
    fn from(p: Vector2) -> Self {
        Coordinate::Fixed(p)
    }
}

fn side_sign(side: Side, view: &WorldView<'_>) -> f64 {
    match side {
        Side::Fixed => 1.0,
        Side::Ball => {
            if view.world.ball_position().y < 0.0 {
                -1.0
            } else {
                1.0
            }
        }
        Side::Preferred => {
            if view.settings.preferred_side < 0.0 {
                -1.0
            } else {
                1.0
            }
        }
    }
}

/// An area of the field built from [`Coordinate`]s.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    Circle { center: Coordinate, radius: f64 },
    /// Axis aligned rectangle spanned by two opposite corners.
    Rectangle { p1: Coordinate, p2: Coordinate },
}

impl Region {
    pub fn center(&self, view: &WorldView<'_>) -> Vector2 {
        match self {
            Region::Circle { center, .. } => center.evaluate(view),
            Region::Rectangle { p1, p2 } => (p1.evaluate(view) + p2.evaluate(view)) / 2.0,
        }
    }

    pub fn contains(&self, p: Vector2, view: &WorldView<'_>) -> bool {
        match self {
            Region::Circle { center, radius } => (p - center.evaluate(view)).norm() <= *radius,
            Region::Rectangle { p1, p2 } => {
                let (a, b) = (p1.evaluate(view), p2.evaluate(view));
                (a.x.min(b.x)..=a.x.max(b.x)).contains(&p.x)
                    && (a.y.min(b.y)..=a.y.max(b.y)).contains(&p.y)
            }
        }
    }

    /// A uniformly distributed random point inside the region.
    pub fn sample(&self, view: &WorldView<'_>, rng: &mut impl Rng) -> Vector2 {
        match self {
            Region::Circle { center, radius } => {
                let r = radius * rng.gen::<f64>().sqrt();
                let theta = Angle::from_radians(rng.gen_range(-PI..PI));
                center.evaluate(view) + theta.to_unit_vector() * r
            }
            Region::Rectangle { p1, p2 } => {
                let (a, b) = (p1.evaluate(view), p2.evaluate(view));
                Vector2::new(
                    a.x + (b.x - a.x) * rng.gen::<f64>(),
                    a.y + (b.y - a.y) * rng.gen::<f64>(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};
    use stp_core::{ExecutorSettings, PlayerData, PlayerId, WorldData};

    use super::*;
    use crate::Assignment;

    fn world() -> WorldData {
        WorldData::new(0.0)
            .with_ball(Vector2::new(1000.0, -500.0))
            .with_own_player(PlayerData::new(PlayerId::new(3), Vector2::new(-200.0, 100.0)))
    }

    #[test]
    fn ball_relative() {
        let world = world();
        let assignment = Assignment::default();
        let settings = ExecutorSettings::default();
        let view = WorldView::new(&world, &assignment, &settings);
        let p = Coordinate::BallOffset(Vector2::new(-100.0, 0.0)).evaluate(&view);
        assert_relative_eq!(p.x, 900.0);
        assert_relative_eq!(p.y, -500.0);
    }

    #[test]
    fn role_relative_resolves_bound_robot() {
        let world = world();
        let mut assignment = Assignment::default();
        assignment.bind(2, PlayerId::new(3));
        let settings = ExecutorSettings::default();
        let view = WorldView::new(&world, &assignment, &settings);
        let coord = Coordinate::Role {
            slot: 2,
            offset: Vector2::new(50.0, 0.0),
        };
        assert_eq!(coord.evaluate(&view), Vector2::new(-150.0, 100.0));
    }

    #[test]
    fn unresolved_role_falls_back_to_origin() {
        let world = world();
        let assignment = Assignment::default();
        let settings = ExecutorSettings::default();
        let view = WorldView::new(&world, &assignment, &settings);
        let coord = Coordinate::Role {
            slot: 1,
            offset: Vector2::new(50.0, 0.0),
        };
        assert_eq!(coord.evaluate(&view), Vector2::zeros());
        assert_eq!(coord.velocity(&view), Vector2::zeros());
    }

    #[test]
    fn sided_coordinates_mirror() {
        let world = world();
        let assignment = Assignment::default();
        let mut settings = ExecutorSettings::default();
        let offset = Vector2::new(100.0, 300.0);

        let view = WorldView::new(&world, &assignment, &settings);
        let ball_side = Coordinate::Sided {
            offset,
            side: Side::Ball,
            origin: Origin::Absolute,
        };
        assert_eq!(ball_side.evaluate(&view), Vector2::new(100.0, -300.0));

        settings.preferred_side = -1.0;
        let view = WorldView::new(&world, &assignment, &settings);
        let preferred = Coordinate::Sided {
            offset,
            side: Side::Preferred,
            origin: Origin::Ball,
        };
        assert_eq!(preferred.evaluate(&view), Vector2::new(1100.0, -800.0));
    }

    #[test]
    fn region_sampling_stays_inside() {
        let world = world();
        let assignment = Assignment::default();
        let settings = ExecutorSettings::default();
        let view = WorldView::new(&world, &assignment, &settings);
        let mut rng = StdRng::seed_from_u64(3);

        let circle = Region::Circle {
            center: Coordinate::Ball,
            radius: 300.0,
        };
        let rect = Region::Rectangle {
            p1: Coordinate::fixed(0.0, 0.0),
            p2: Coordinate::fixed(-400.0, 200.0),
        };
        assert_eq!(rect.center(&view), Vector2::new(-200.0, 100.0));
        for _ in 0..100 {
            assert!(circle.contains(circle.sample(&view, &mut rng), &view));
            assert!(rect.contains(rect.sample(&view, &mut rng), &view));
        }
        assert!(!circle.contains(Vector2::zeros(), &view));
    }
}
