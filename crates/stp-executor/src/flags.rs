use serde::Serialize;
use stp_core::{GameState, GameStateData};

/// Movement restrictions passed along with every command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct MoveFlags(u32);

impl MoveFlags {
    pub const NONE: MoveFlags = MoveFlags(0);
    /// Stay out of our own defense area.
    pub const AVOID_FRIENDLY_DEFENSE: MoveFlags = MoveFlags(1 << 0);
    /// Stay out of the opponent defense area.
    pub const AVOID_ENEMY_DEFENSE: MoveFlags = MoveFlags(1 << 1);
    /// Keep the distance to the ball required during stoppages.
    pub const AVOID_BALL_STOP: MoveFlags = MoveFlags(1 << 2);
    /// We are taking a free kick.
    pub const FRIENDLY_KICK: MoveFlags = MoveFlags(1 << 3);
    /// Stay on our half of the field.
    pub const STAY_OWN_HALF: MoveFlags = MoveFlags(1 << 4);

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: MoveFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Flags for a field (non-goalie) slot in the given game state.
    pub fn for_field_slot(state: &GameStateData) -> MoveFlags {
        let mut flags = MoveFlags::AVOID_FRIENDLY_DEFENSE;
        match state.game_state {
            GameState::Stop => flags |= MoveFlags::AVOID_BALL_STOP,
            GameState::FreeKick if state.us_operating => flags |= MoveFlags::FRIENDLY_KICK,
            GameState::FreeKick => flags |= MoveFlags::AVOID_BALL_STOP,
            GameState::PrepareKickoff => {
                flags |= MoveFlags::AVOID_BALL_STOP | MoveFlags::STAY_OWN_HALF
            }
            _ => {}
        }
        flags
    }
}

impl std::ops::BitOr for MoveFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        MoveFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for MoveFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
