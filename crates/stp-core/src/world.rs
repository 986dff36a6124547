use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::{FieldGeometry, PlayerData, PlayerId, Vector2, Vector3};

/// The game state, as reported by the referee.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Copy, Default)]
#[serde(tag = "type", content = "data")]
#[typeshare]
pub enum GameState {
    #[default]
    Unknown,
    Halt,
    Timeout,
    Stop,
    PrepareKickoff,
    BallReplacement(Vector2),
    PreparePenalty,
    Kickoff,
    FreeKick,
    Penalty,
    PenaltyRun,
    Run,
}

impl GameState {
    /// Whether two states are the same variant, ignoring any payload.
    pub fn same_kind(&self, other: &GameState) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[typeshare]
pub struct GameStateData {
    /// The state of current game
    pub game_state: GameState,
    /// If we are the main party currently performing tasks in the state.
    /// true for symmetric states (halt, stop, run, timeout)
    pub us_operating: bool,
}

/// A struct to store the ball state from a single frame.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[typeshare]
pub struct BallData {
    /// Position of the ball in mm
    pub position: Vector3,
    /// Velocity of the ball in mm/s
    pub velocity: Vector3,
    /// Whether the ball was seen in the latest frame
    pub detected: bool,
}

impl BallData {
    pub fn at(position: Vector2) -> Self {
        Self {
            position: Vector3::new(position.x, position.y, 0.0),
            velocity: Vector3::zeros(),
            detected: true,
        }
    }

    pub fn position2(&self) -> Vector2 {
        self.position.xy()
    }

    pub fn velocity2(&self) -> Vector2 {
        self.velocity.xy()
    }
}

/// A snapshot of the world, immutable for the duration of one cycle.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[typeshare]
pub struct WorldData {
    /// Time at which the snapshot was produced, in seconds
    pub t_received: f64,
    /// Our robots, in roster order
    pub own_players: Vec<PlayerData>,
    pub opp_players: Vec<PlayerData>,
    pub ball: Option<BallData>,
    pub field_geom: FieldGeometry,
    pub current_game_state: GameStateData,
}

impl WorldData {
    pub fn new(t_received: f64) -> Self {
        Self {
            t_received,
            current_game_state: GameStateData {
                game_state: GameState::Run,
                us_operating: true,
            },
            ..Default::default()
        }
    }

    pub fn with_own_player(mut self, player: PlayerData) -> Self {
        self.own_players.push(player);
        self
    }

    pub fn with_opp_player(mut self, player: PlayerData) -> Self {
        self.opp_players.push(player);
        self
    }

    pub fn with_ball(mut self, position: Vector2) -> Self {
        self.ball = Some(BallData::at(position));
        self
    }

    pub fn with_game_state(mut self, game_state: GameState, us_operating: bool) -> Self {
        self.current_game_state = GameStateData {
            game_state,
            us_operating,
        };
        self
    }

    pub fn game_state(&self) -> GameState {
        self.current_game_state.game_state
    }

    pub fn own_player(&self, id: PlayerId) -> Option<&PlayerData> {
        self.own_players.iter().find(|p| p.id == id)
    }

    pub fn opp_player(&self, id: PlayerId) -> Option<&PlayerData> {
        self.opp_players.iter().find(|p| p.id == id)
    }

    /// Ids of our robots in roster order.
    pub fn own_roster(&self) -> Vec<PlayerId> {
        self.own_players.iter().map(|p| p.id).collect()
    }

    /// Ball position, or the field center when the ball is not tracked.
    pub fn ball_position(&self) -> Vector2 {
        self.ball
            .as_ref()
            .map(|b| b.position2())
            .unwrap_or_else(Vector2::zeros)
    }

    pub fn ball_velocity(&self) -> Vector2 {
        self.ball
            .as_ref()
            .map(|b| b.velocity2())
            .unwrap_or_else(Vector2::zeros)
    }

    /// The player closest to the ball among `players`, with its distance.
    pub fn closest_to_ball<'a>(
        &self,
        players: impl IntoIterator<Item = &'a PlayerData>,
    ) -> Option<(&'a PlayerData, f64)> {
        let ball = self.ball_position();
        players
            .into_iter()
            .map(|p| (p, (p.position - ball).norm()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// A change in our roster between two consecutive snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterChange {
    Added(PlayerId),
    Removed(PlayerId),
}

/// Computes the roster changes from `previous` to the roster of `world`.
///
/// Removals are reported before additions, each in roster order.
pub fn roster_changes(previous: &[PlayerId], world: &WorldData) -> Vec<RosterChange> {
    let current = world.own_roster();
    let removed = previous
        .iter()
        .filter(|id| !current.contains(id))
        .map(|id| RosterChange::Removed(*id));
    let added = current
        .iter()
        .filter(|id| !previous.contains(id))
        .map(|id| RosterChange::Added(*id));
    removed.chain(added).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: u32, x: f64) -> PlayerData {
        PlayerData::new(PlayerId::new(id), Vector2::new(x, 0.0))
    }

    #[test]
    fn roster_diff_reports_both_directions() {
        let world = WorldData::new(0.0)
            .with_own_player(player(1, 0.0))
            .with_own_player(player(3, 0.0));
        let changes = roster_changes(&[PlayerId::new(1), PlayerId::new(2)], &world);
        assert_eq!(
            changes,
            vec![
                RosterChange::Removed(PlayerId::new(2)),
                RosterChange::Added(PlayerId::new(3)),
            ]
        );
        assert!(roster_changes(&world.own_roster(), &world).is_empty());
    }

    #[test]
    fn closest_player_to_ball() {
        let world = WorldData::new(0.0)
            .with_ball(Vector2::new(1000.0, 0.0))
            .with_own_player(player(0, 0.0))
            .with_own_player(player(1, 900.0));
        let (closest, dist) = world.closest_to_ball(&world.own_players).unwrap();
        assert_eq!(closest.id, PlayerId::new(1));
        assert!((dist - 100.0).abs() < 1e-9);
        assert!(world.closest_to_ball(&world.opp_players).is_none());
    }

    #[test]
    fn missing_ball_defaults_to_center() {
        let world = WorldData::new(0.0);
        assert_eq!(world.ball_position(), Vector2::zeros());
        assert!(GameState::BallReplacement(Vector2::new(1.0, 2.0))
            .same_kind(&GameState::BallReplacement(Vector2::zeros())));
        assert!(!GameState::Stop.same_kind(&GameState::Run));
    }
}
