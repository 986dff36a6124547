//! Common conditions for play guards.

use stp_core::{GameState, WorldData};

/// Distance from a robot center within which it is considered to control the ball, in mm.
const POSSESSION_DISTANCE: f64 = 120.0;

pub fn game_state_is(world: &WorldData, state: GameState) -> bool {
    world.game_state().same_kind(&state)
}

/// Whether we are the team acting in the current restart.
pub fn us_operating(world: &WorldData) -> bool {
    world.current_game_state.us_operating
}

pub fn our_team_size_at_least(world: &WorldData, n: usize) -> bool {
    world.own_players.len() >= n
}

pub fn our_team_size_exactly(world: &WorldData, n: usize) -> bool {
    world.own_players.len() == n
}

pub fn their_team_size_at_least(world: &WorldData, n: usize) -> bool {
    world.opp_players.len() >= n
}

pub fn their_team_size_at_most(world: &WorldData, n: usize) -> bool {
    world.opp_players.len() <= n
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Possession {
    Ours,
    Theirs,
    Loose,
}

/// Who controls the ball: a robot reporting the ball on its dribbler, or else the
/// closest robot within [`POSSESSION_DISTANCE`].
pub fn possession(world: &WorldData) -> Possession {
    if world.ball.is_none() {
        return Possession::Loose;
    }
    if world.own_players.iter().any(|p| p.has_ball) {
        return Possession::Ours;
    }
    if world.opp_players.iter().any(|p| p.has_ball) {
        return Possession::Theirs;
    }
    let ours = world.closest_to_ball(&world.own_players).map(|(_, d)| d);
    let theirs = world.closest_to_ball(&world.opp_players).map(|(_, d)| d);
    match (ours, theirs) {
        (Some(o), Some(t)) if o <= t && o < POSSESSION_DISTANCE => Possession::Ours,
        (Some(o), None) if o < POSSESSION_DISTANCE => Possession::Ours,
        (_, Some(t)) if t < POSSESSION_DISTANCE => Possession::Theirs,
        _ => Possession::Loose,
    }
}

pub fn our_ball(world: &WorldData) -> bool {
    possession(world) == Possession::Ours
}

pub fn their_ball(world: &WorldData) -> bool {
    possession(world) == Possession::Theirs
}

pub fn none_ball(world: &WorldData) -> bool {
    possession(world) == Possession::Loose
}

pub fn ball_x_less_than(world: &WorldData, x: f64) -> bool {
    world.ball.is_some() && world.ball_position().x < x
}

pub fn ball_x_greater_than(world: &WorldData, x: f64) -> bool {
    world.ball.is_some() && world.ball_position().x > x
}

pub fn ball_on_our_side(world: &WorldData) -> bool {
    ball_x_less_than(world, 0.0)
}

pub fn ball_on_their_side(world: &WorldData) -> bool {
    ball_x_greater_than(world, 0.0)
}
