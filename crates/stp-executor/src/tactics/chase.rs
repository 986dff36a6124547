use stp_core::{PlayerData, PlayerId};

use super::{closest_to, Tactic, TacticCtx};
use crate::{
    action,
    actions::{Chase, Pivot},
    Coordinate, Primitive, WorldView,
};

const FACING_TOLERANCE: f64 = 0.1;

/// Gets the ball. Done once the bound robot has it, and faces the target if one is set.
#[derive(Default)]
pub struct ChaseBall {
    facing: Option<Coordinate>,
}

impl ChaseBall {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pivot around the ball after getting it until facing `target`.
    pub fn facing(mut self, target: impl Into<Coordinate>) -> Self {
        self.facing = Some(target.into());
        self
    }
}

impl Tactic for ChaseBall {
    fn description(&self) -> String {
        "chase".to_owned()
    }

    fn active(&self) -> bool {
        true
    }

    fn select(&self, candidates: &[&PlayerData], view: &WorldView<'_>) -> Option<PlayerId> {
        closest_to(candidates, view.world.ball_position())
    }

    fn execute(&mut self, ctx: &mut TacticCtx<'_>) -> Primitive {
        if !ctx.player.has_ball {
            ctx.reset_actions();
        }
        action!(ctx, Chase::new());
        if let Some(target) = &self.facing {
            action!(ctx, Pivot::new(Coordinate::Ball, target.clone()));
        }
        Primitive::Stop
    }

    fn done(&self, player: &PlayerData, view: &WorldView<'_>) -> bool {
        player.has_ball
            && self.facing.as_ref().map_or(true, |target| {
                (target.heading_from(player.position, view) - player.yaw).abs() < FACING_TOLERANCE
            })
    }

    fn fail(&self, _player: &PlayerData, view: &WorldView<'_>) -> bool {
        view.world.ball.is_none()
    }
}

#[cfg(test)]
mod tests {
    use stp_core::{Vector2, WorldData};

    use super::*;
    use crate::tactics::{test_util::Harness, BoundTactic};

    #[test]
    fn closest_robot_chases() {
        let h = Harness::new(
            WorldData::new(0.0)
                .with_ball(Vector2::new(-1000.0, 0.0))
                .with_own_player(PlayerData::new(PlayerId::new(0), Vector2::zeros()))
                .with_own_player(PlayerData::new(PlayerId::new(5), Vector2::new(-800.0, 0.0))),
        );
        let tactic = ChaseBall::new();
        assert_eq!(
            tactic.select(&h.candidates(), &h.view()),
            Some(PlayerId::new(5))
        );
        assert!(!tactic.fail(&h.world.own_players[1], &h.view()));
        let mut bound = BoundTactic::new(Box::new(tactic));
        assert!(matches!(
            h.execute(&mut bound, 1),
            Primitive::DribbleTo { dest, .. } if dest == Vector2::new(-1000.0, 0.0)
        ));
    }

    #[test]
    fn done_with_ball_and_fails_without_one() {
        let h = Harness::new(WorldData::new(0.0).with_own_player(
            PlayerData::new(PlayerId::new(0), Vector2::zeros()).with_ball(true),
        ));
        let tactic = ChaseBall::new();
        assert!(h.done(&tactic, 0));
        assert!(tactic.fail(&h.world.own_players[0], &h.view()));
    }

    #[test]
    fn pivots_towards_target_once_holding_the_ball() {
        let h = Harness::new(
            WorldData::new(0.0)
                .with_ball(Vector2::new(100.0, 0.0))
                .with_own_player(PlayerData::new(PlayerId::new(0), Vector2::zeros()).with_ball(true)),
        );
        let tactic = ChaseBall::new().facing(Vector2::new(0.0, 3000.0));
        assert!(!h.done(&tactic, 0));
        let mut bound = BoundTactic::new(Box::new(tactic));
        assert!(matches!(
            h.execute(&mut bound, 0),
            Primitive::Pivot { center, .. } if center == Vector2::new(100.0, 0.0)
        ));
    }
}
