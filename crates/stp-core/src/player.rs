use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::{Angle, Vector2};

/// Stable id of a robot, as reported by vision.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[typeshare(serialized_as = "u32")]
pub struct PlayerId(u32);

impl PlayerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tracked robot.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[typeshare]
pub struct PlayerData {
    pub id: PlayerId,
    /// Position of the player in mm, in field coordinates
    pub position: Vector2,
    /// Velocity of the player in mm/s
    pub velocity: Vector2,
    /// Heading of the player
    pub yaw: Angle,
    /// Angular speed of the player in rad/s
    pub angular_speed: f64,
    /// Whether the ball is on the player's dribbler
    pub has_ball: bool,
}

impl PlayerData {
    /// A stationary player at `position` facing +x.
    pub fn new(id: PlayerId, position: Vector2) -> Self {
        Self {
            id,
            position,
            velocity: Vector2::zeros(),
            yaw: Angle::ZERO,
            angular_speed: 0.0,
            has_ball: false,
        }
    }

    pub fn with_yaw(mut self, yaw: Angle) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn with_ball(mut self, has_ball: bool) -> Self {
        self.has_ball = has_ball;
        self
    }
}
