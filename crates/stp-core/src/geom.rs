use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::Vector2;

/// The field geometry.
///
/// Our goal is always on the negative x side.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[typeshare]
pub struct FieldGeometry {
    /// Field length (distance between goal lines) in mm
    pub field_length: f64,
    /// Field width (distance between touch lines) in mm
    pub field_width: f64,
    /// Goal width (distance inner edges of goal posts) in mm
    pub goal_width: f64,
    /// Goal depth (distance from outer goal line edge to inner goal back) in mm
    pub goal_depth: f64,
    /// Boundary width (distance from touch/goal line centers to boundary walls) in mm
    pub boundary_width: f64,
    /// Depth of the penalty area, measured from the goal line, in mm
    pub penalty_area_depth: f64,
    /// Width of the penalty area, in mm
    pub penalty_area_width: f64,
    /// Radius of the center circle, in mm
    pub center_circle_radius: f64,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self {
            field_length: 12000.0,
            field_width: 9000.0,
            goal_width: 1800.0,
            goal_depth: 180.0,
            boundary_width: 300.0,
            penalty_area_depth: 1800.0,
            penalty_area_width: 3600.0,
            center_circle_radius: 500.0,
        }
    }
}

impl FieldGeometry {
    pub fn half_length(&self) -> f64 {
        self.field_length / 2.0
    }

    pub fn half_width(&self) -> f64 {
        self.field_width / 2.0
    }

    /// Center of our goal line.
    pub fn own_goal(&self) -> Vector2 {
        Vector2::new(-self.half_length(), 0.0)
    }

    /// Center of the opponent goal line.
    pub fn opp_goal(&self) -> Vector2 {
        Vector2::new(self.half_length(), 0.0)
    }

    /// Whether the point lies inside the playing area (touch and goal lines included).
    pub fn contains(&self, p: Vector2) -> bool {
        p.x.abs() <= self.half_length() && p.y.abs() <= self.half_width()
    }

    /// Whether the point lies inside the playing area extended by the boundary strip.
    pub fn contains_with_boundary(&self, p: Vector2) -> bool {
        p.x.abs() <= self.half_length() + self.boundary_width
            && p.y.abs() <= self.half_width() + self.boundary_width
    }

    pub fn in_own_defense_area(&self, p: Vector2, margin: f64) -> bool {
        p.x <= -self.half_length() + self.penalty_area_depth + margin
            && p.y.abs() <= self.penalty_area_width / 2.0 + margin
    }

    pub fn in_opp_defense_area(&self, p: Vector2, margin: f64) -> bool {
        p.x >= self.half_length() - self.penalty_area_depth - margin
            && p.y.abs() <= self.penalty_area_width / 2.0 + margin
    }

    /// Clamps a point into the playing area.
    pub fn clamp(&self, p: Vector2) -> Vector2 {
        Vector2::new(
            p.x.clamp(-self.half_length(), self.half_length()),
            p.y.clamp(-self.half_width(), self.half_width()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goals_sit_on_the_x_axis() {
        let geom = FieldGeometry::default();
        assert_eq!(geom.own_goal(), Vector2::new(-6000.0, 0.0));
        assert_eq!(geom.opp_goal(), Vector2::new(6000.0, 0.0));
    }

    #[test]
    fn defense_areas() {
        let geom = FieldGeometry::default();
        assert!(geom.in_own_defense_area(Vector2::new(-5500.0, 0.0), 0.0));
        assert!(!geom.in_own_defense_area(Vector2::new(-4000.0, 0.0), 0.0));
        assert!(geom.in_own_defense_area(Vector2::new(-4100.0, 0.0), 200.0));
        assert!(geom.in_opp_defense_area(Vector2::new(5500.0, 1000.0), 0.0));
        assert!(!geom.in_opp_defense_area(Vector2::new(5500.0, 2000.0), 0.0));
    }

    #[test]
    fn clamp_and_contains() {
        let geom = FieldGeometry::default();
        let outside = Vector2::new(7000.0, -5000.0);
        assert!(!geom.contains(outside));
        assert!(!geom.contains_with_boundary(outside));
        let clamped = geom.clamp(outside);
        assert_eq!(clamped, Vector2::new(6000.0, -4500.0));
        assert!(geom.contains(clamped));
    }
}
