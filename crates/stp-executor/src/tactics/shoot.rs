use stp_core::{PlayerData, PlayerId};

use super::{closest_to, Tactic, TacticCtx};
use crate::{
    action,
    actions::{ActionProgress, ActionResult, ShootAt, Wait},
    invoke_action, Coordinate, Primitive, WorldView,
};

/// Kicks the ball at a coordinate. Done after the kick.
pub struct Shoot {
    target: Coordinate,
    power: f64,
    chip: bool,
    delay: u32,
    result: Option<ActionResult>,
}

impl Shoot {
    /// `power` is the ball speed in m/s.
    pub fn new(target: impl Into<Coordinate>, power: f64) -> Self {
        Self {
            target: target.into(),
            power,
            chip: false,
            delay: 0,
            result: None,
        }
    }

    pub fn chip(mut self) -> Self {
        self.chip = true;
        self
    }

    /// Hold still for `cycles` cycles before going for the ball.
    pub fn delayed(mut self, cycles: u32) -> Self {
        self.delay = cycles;
        self
    }
}

impl Tactic for Shoot {
    fn description(&self) -> String {
        let kind = if self.chip { "chip" } else { "shoot" };
        format!("{} at {:?}", kind, self.target)
    }

    fn active(&self) -> bool {
        true
    }

    fn select(&self, candidates: &[&PlayerData], view: &WorldView<'_>) -> Option<PlayerId> {
        // Prefer whoever already has the ball.
        candidates
            .iter()
            .find(|p| p.has_ball)
            .map(|p| p.id)
            .or_else(|| closest_to(candidates, view.world.ball_position()))
    }

    fn execute(&mut self, ctx: &mut TacticCtx<'_>) -> Primitive {
        if self.delay > 0 {
            action!(ctx, Wait::cycles(self.delay));
        }
        let shoot = || {
            let action = ShootAt::new(self.target.clone(), self.power);
            if self.chip {
                action.chip()
            } else {
                action
            }
        };
        match invoke_action!(ctx, shoot()) {
            ActionProgress::Continue(primitive) => primitive,
            ActionProgress::Done(result) => {
                if self.result.is_none() {
                    log::debug!("p{}: shot finished with {:?}", ctx.player.id, result);
                }
                self.result = Some(result);
                Primitive::Stop
            }
        }
    }

    fn done(&self, _player: &PlayerData, _view: &WorldView<'_>) -> bool {
        self.result == Some(ActionResult::Success)
    }

    fn fail(&self, _player: &PlayerData, view: &WorldView<'_>) -> bool {
        self.result == Some(ActionResult::Failure) || view.world.ball.is_none()
    }

    fn reset(&mut self) {
        self.result = None;
    }
}
