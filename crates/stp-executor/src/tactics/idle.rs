use stp_core::{PlayerData, PlayerId};

use super::{Tactic, TacticCtx};
use crate::{Primitive, WorldView};

/// Does nothing. Fills role slots a play leaves empty.
#[derive(Default)]
pub struct Idle;

impl Idle {
    pub fn new() -> Self {
        Self
    }
}

impl Tactic for Idle {
    fn description(&self) -> String {
        "idle".to_owned()
    }

    fn select(&self, candidates: &[&PlayerData], _view: &WorldView<'_>) -> Option<PlayerId> {
        candidates.first().map(|p| p.id)
    }

    fn execute(&mut self, _ctx: &mut TacticCtx<'_>) -> Primitive {
        Primitive::Stop
    }
}
