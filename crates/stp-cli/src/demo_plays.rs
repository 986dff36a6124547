use anyhow::Result;
use stp_core::{FieldGeometry, GameState, Vector2, WorldData};
use stp_executor::{
    predicates::{
        ball_on_their_side, game_state_is, our_ball, our_team_size_at_least,
        our_team_size_exactly, their_ball, us_operating,
    },
    tactics::{Block, ChaseBall, Goalie, Move, Patrol, Shoot},
    Coordinate, Origin, Play, PlayCatalog, Side,
};

const SHOT_POWER: f64 = 6.0;
/// Cycles the kicker waits after the kickoff signal.
const KICKOFF_DELAY: u32 = 20;

pub fn catalog() -> Result<PlayCatalog> {
    let mut catalog = PlayCatalog::new();
    catalog
        .register(stop_formation()?)?
        .register(kickoff_prepare()?)?
        .register(kickoff_take()?)?
        .register(attack()?)?
        .register(defend()?)?
        .register(lone_goalie()?)?;
    Ok(catalog)
}

fn own_goal() -> Coordinate {
    FieldGeometry::default().own_goal().into()
}

fn opp_goal() -> Coordinate {
    FieldGeometry::default().opp_goal().into()
}

fn sided(x: f64, y: f64, side: Side, origin: Origin) -> Coordinate {
    Coordinate::Sided {
        offset: Vector2::new(x, y),
        side,
        origin,
    }
}

fn in_running_game(world: &WorldData) -> bool {
    our_team_size_at_least(world, 2) && game_state_is(world, GameState::Run)
}

fn stop_formation() -> Result<Play> {
    let mut builder = Play::builder("stop_formation");
    builder
        .invariant(|w| our_team_size_at_least(w, 2) && game_state_is(w, GameState::Stop))
        .applicable(|w| game_state_is(w, GameState::Stop))
        .assign(|_, roles| {
            roles
                .goalie(Goalie::new())
                .role(0, Block::new(own_goal(), 600.0).as_active())
                .role(1, Move::new(sided(-1500.0, 1000.0, Side::Ball, Origin::Absolute)))
                .role(2, Move::new(sided(-1500.0, -1000.0, Side::Ball, Origin::Absolute)))
                .role(3, Move::new(Coordinate::fixed(-3500.0, 0.0)));
        });
    builder.build()
}

fn kickoff_prepare() -> Result<Play> {
    let mut builder = Play::builder("kickoff_prepare");
    builder
        .invariant(|w| {
            our_team_size_at_least(w, 2) && game_state_is(w, GameState::PrepareKickoff)
        })
        .applicable(|w| game_state_is(w, GameState::PrepareKickoff))
        .assign(|world, roles| {
            // Our kicker waits just outside the center circle, theirs keeps us further off.
            let distance = if us_operating(world) { 600.0 } else { 1000.0 };
            roles
                .goalie(Goalie::new())
                .role(0, Block::new(own_goal(), distance).as_active())
                .role(1, Move::new(Coordinate::fixed(-1000.0, 1500.0)))
                .role(2, Move::new(Coordinate::fixed(-1000.0, -1500.0)))
                .role(3, Move::new(Coordinate::fixed(-3000.0, 0.0)));
        });
    builder.build()
}

fn kickoff_take() -> Result<Play> {
    let mut builder = Play::builder("kickoff_take");
    builder
        .invariant(|w| our_team_size_at_least(w, 2) && game_state_is(w, GameState::Kickoff))
        .applicable(us_operating)
        .assign(|_, roles| {
            roles
                .goalie(Goalie::new())
                .role(0, Shoot::new(opp_goal(), SHOT_POWER).delayed(KICKOFF_DELAY))
                .role(1, Move::new(Coordinate::fixed(-500.0, 2000.0)))
                .role(2, Move::new(Coordinate::fixed(-500.0, -2000.0)))
                .role(3, Block::new(own_goal(), 1500.0));
        });
    builder.build()
}

fn attack() -> Result<Play> {
    let mut builder = Play::builder("attack");
    builder
        .invariant(in_running_game)
        .applicable(|w| our_ball(w) || ball_on_their_side(w))
        .fail(|ctx| their_ball(ctx.world))
        .assign(|_, roles| {
            let wing = Coordinate::Role {
                slot: 1,
                offset: Vector2::new(-800.0, 1200.0),
            };
            roles
                .goalie(Goalie::new())
                .role(0, ChaseBall::new().facing(opp_goal()))
                .role(0, Shoot::new(opp_goal(), SHOT_POWER))
                .role(1, Move::new(wing).facing(Coordinate::Ball))
                .role(2, Block::new(own_goal(), 2000.0))
                .role(
                    3,
                    Patrol::new(vec![
                        Coordinate::fixed(-2000.0, 2000.0),
                        Coordinate::fixed(-2000.0, -2000.0),
                    ]),
                );
        });
    builder.build()
}

fn defend() -> Result<Play> {
    let mut builder = Play::builder("defend");
    builder
        .invariant(in_running_game)
        .applicable(|w| !our_ball(w) && !ball_on_their_side(w))
        .done(|ctx| our_ball(ctx.world))
        .assign(|_, roles| {
            roles
                .goalie(Goalie::new())
                .role(0, ChaseBall::new())
                .role(1, Block::new(own_goal(), 800.0))
                .role(2, Block::new(Coordinate::fixed(-6000.0, 600.0), 1500.0))
                .role(
                    3,
                    Move::new(sided(-500.0, 1500.0, Side::Preferred, Origin::Ball))
                        .facing(Coordinate::Ball),
                );
        });
    builder.build()
}

fn lone_goalie() -> Result<Play> {
    let mut builder = Play::builder("lone_goalie");
    builder
        .invariant(|w| our_team_size_exactly(w, 1))
        .applicable(|w| our_team_size_exactly(w, 1))
        .assign(|_, roles| {
            roles.goalie(Goalie::lone());
        });
    builder.build()
}

#[cfg(test)]
mod tests {
    use stp_core::{ExecutorSettings, PlayerData, PlayerId};
    use stp_executor::{Executor, ExecutorState};

    use super::*;

    fn team(n: u32) -> WorldData {
        (0..n).fold(WorldData::new(0.0).with_ball(Vector2::new(-1000.0, 0.0)), |w, id| {
            w.with_own_player(PlayerData::new(
                PlayerId::new(id),
                Vector2::new(-5000.0 + 800.0 * id as f64, 300.0),
            ))
        })
    }

    fn executor() -> Executor {
        let settings = ExecutorSettings {
            seed: Some(3),
            ..Default::default()
        };
        Executor::new(catalog().unwrap(), settings)
    }

    #[test]
    fn catalog_registers_every_play() {
        let catalog = catalog().unwrap();
        assert_eq!(catalog.len(), 6);
        assert!(catalog.get("lone_goalie").is_some());
    }

    #[test]
    fn picks_a_play_per_game_state() {
        let cases = [
            (team(5).with_game_state(GameState::Stop, false), "stop_formation"),
            (
                team(5).with_game_state(GameState::PrepareKickoff, true),
                "kickoff_prepare",
            ),
            (team(5).with_game_state(GameState::Kickoff, true), "kickoff_take"),
            (team(5), "defend"),
            (team(1), "lone_goalie"),
        ];
        for (world, expected) in cases {
            let mut executor = executor();
            let commands = executor.tick(&world);
            assert_eq!(executor.current_play(), Some(expected));
            assert_eq!(commands.len(), world.own_players.len());
        }
    }

    #[test]
    fn their_kickoff_has_no_taker() {
        let world = team(5).with_game_state(GameState::Kickoff, false);
        let mut executor = executor();
        assert!(executor.tick(&world).is_empty());
        assert_eq!(executor.state(), ExecutorState::NoPlay);
    }
}
