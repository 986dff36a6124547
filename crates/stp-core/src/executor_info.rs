use serde::Serialize;
use typeshare::typeshare;

use crate::PlayerId;

/// Diagnostics for one role slot.
#[derive(Debug, Clone, Serialize)]
#[typeshare]
pub struct SlotInfo {
    /// Slot index, 0 is the goalie.
    pub slot: u32,
    /// The robot bound to the slot, if any.
    pub player: Option<PlayerId>,
    pub active: bool,
    pub description: String,
}

/// Runtime information about the executor.
#[derive(Debug, Clone, Default, Serialize)]
#[typeshare]
pub struct ExecutorInfo {
    /// Name of the running play.
    pub play: Option<String>,
    pub step: u32,
    pub slots: Vec<SlotInfo>,
    /// The robot running the active tactic.
    pub active_player: Option<PlayerId>,
    /// Why the last play was discarded.
    pub last_abort: Option<String>,
}

impl std::fmt::Display for ExecutorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(play) = &self.play else {
            write!(f, "No Play")?;
            if let Some(reason) = &self.last_abort {
                write!(f, " (last: {})", reason)?;
            }
            return Ok(());
        };
        write!(f, "play: {}\nstep: {}", play, self.step)?;
        for slot in &self.slots {
            let player = slot
                .player
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_owned());
            let marker = if slot.active { '*' } else { ' ' };
            write!(
                f,
                "\n{} [{}]: {}{}",
                slot.slot, player, marker, slot.description
            )?;
        }
        Ok(())
    }
}
