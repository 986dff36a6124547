use std::collections::HashMap;

use serde::Serialize;
use stp_core::{Angle, PlayerId, Vector2};

use crate::MoveFlags;

/// A single motion or kick command for one robot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Primitive {
    /// Brake and hold still.
    Stop,
    /// Move to `dest`, arriving with `end_speed` (mm/s) and facing `orientation`.
    MoveTo {
        dest: Vector2,
        orientation: Angle,
        end_speed: f64,
    },
    /// Move with the dribbler on.
    DribbleTo { dest: Vector2, orientation: Angle },
    /// Kick (or chip) the ball towards `target`. `power` is the ball speed in m/s.
    Shoot {
        target: Vector2,
        power: f64,
        chip: bool,
    },
    /// Rotate around `center` by `swing` until facing `orientation`.
    Pivot {
        center: Vector2,
        swing: Angle,
        orientation: Angle,
    },
    /// Move to `dest` while spinning at `speed` rad/s.
    Spin { dest: Vector2, speed: f64 },
}

impl Primitive {
    /// The point the robot is heading to, if the primitive moves it.
    pub fn destination(&self) -> Option<Vector2> {
        match self {
            Primitive::Stop | Primitive::Shoot { .. } => None,
            Primitive::MoveTo { dest, .. }
            | Primitive::DribbleTo { dest, .. }
            | Primitive::Spin { dest, .. } => Some(*dest),
            Primitive::Pivot { center, .. } => Some(*center),
        }
    }
}

/// What one robot is told to do this cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerCommand {
    pub primitive: Primitive,
    pub flags: MoveFlags,
}

/// The commands issued during one cycle, at most one per robot.
#[derive(Debug, Default)]
pub struct PlayerCommands {
    commands: HashMap<PlayerId, PlayerCommand>,
}

impl PlayerCommands {
    pub fn new() -> Self {
        Self {
            commands: HashMap::with_capacity(6),
        }
    }

    /// Record the command for a robot. A second command for the same robot is rejected
    /// and `false` is returned.
    pub fn emit(&mut self, id: PlayerId, command: PlayerCommand) -> bool {
        if self.commands.contains_key(&id) {
            log::error!("Player {} already received a command this cycle", id);
            return false;
        }
        self.commands.insert(id, command);
        true
    }

    pub fn get(&self, id: PlayerId) -> Option<&PlayerCommand> {
        self.commands.get(&id)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &PlayerCommand)> {
        self.commands.iter()
    }
}

impl IntoIterator for PlayerCommands {
    type Item = (PlayerId, PlayerCommand);
    type IntoIter = std::collections::hash_map::IntoIter<PlayerId, PlayerCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}
