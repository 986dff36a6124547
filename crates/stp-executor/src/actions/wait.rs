use super::{Action, ActionCtx, ActionProgress};
use crate::Primitive;

/// Holds still for a number of cycles.
pub struct Wait {
    remaining: u32,
}

impl Wait {
    pub fn cycles(cycles: u32) -> Self {
        Self { remaining: cycles }
    }
}

impl Action for Wait {
    fn step(&mut self, _ctx: &ActionCtx<'_>) -> ActionProgress {
        if self.remaining == 0 {
            return ActionProgress::success();
        }
        self.remaining -= 1;
        ActionProgress::Continue(Primitive::Stop)
    }
}

#[cfg(test)]
mod tests {
    use stp_core::{PlayerData, PlayerId, Vector2, WorldData};

    use super::*;
    use crate::actions::test_util::Harness;

    #[test]
    fn waits_for_the_given_number_of_cycles() {
        let h = Harness::new(
            WorldData::new(0.0).with_own_player(PlayerData::new(PlayerId::new(0), Vector2::zeros())),
        );
        let mut wait = Wait::cycles(2);
        let ctx = h.ctx(0);
        assert!(matches!(wait.step(&ctx), ActionProgress::Continue(Primitive::Stop)));
        assert!(matches!(wait.step(&ctx), ActionProgress::Continue(Primitive::Stop)));
        assert!(matches!(wait.step(&ctx), ActionProgress::Done(_)));
    }
}
