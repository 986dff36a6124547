//! A kinematic stand-in for the field: robots follow their primitives with bounded
//! speeds, the ball rolls with friction and can be dribbled or kicked.

use std::collections::HashMap;

use stp_core::{
    Angle, BallData, FieldGeometry, GameState, GameStateData, PlayerData, PlayerId, Vector2,
    Vector3, WorldData,
};
use stp_executor::{PlayerCommands, Primitive};

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Maximum lateral speed in mm/s
    pub max_vel: f64,
    /// Maximum angular velocity in rad/s
    pub max_ang_vel: f64,
    /// Fraction of its speed the ball loses per second
    pub ball_damping: f64,
    /// Distance from the robot center within which the dribbler holds the ball, in mm
    pub dribbler_reach: f64,
    /// Maximum angle from the front of the robot where the dribbler can pick up the ball
    pub dribbler_angle: f64,
    pub field_geometry: FieldGeometry,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_vel: 2500.0,
            max_ang_vel: 8.0,
            ball_damping: 0.6,
            dribbler_reach: 150.0,
            dribbler_angle: 0.6,
            field_geometry: FieldGeometry::default(),
        }
    }
}

struct Ball {
    position: Vector2,
    velocity: Vector2,
}

/// A referee decision taking effect at a given simulation time.
#[derive(Debug, Clone, Copy)]
pub struct RefereeEvent {
    pub at: f64,
    pub game_state: GameState,
    pub us_operating: bool,
}

pub struct Simulation {
    config: SimulationConfig,
    time: f64,
    own: Vec<PlayerData>,
    opp: Vec<PlayerData>,
    ball: Option<Ball>,
    game_state: GameStateData,
    referee: Vec<RefereeEvent>,
    commands: HashMap<PlayerId, Primitive>,
}

impl Simulation {
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Replaces the pending commands. Robots without a command brake.
    pub fn push_commands(&mut self, commands: &PlayerCommands) {
        self.commands = commands
            .iter()
            .map(|(id, cmd)| (*id, cmd.primitive.clone()))
            .collect();
    }

    pub fn remove_own_player(&mut self, id: PlayerId) {
        self.own.retain(|p| p.id != id);
    }

    pub fn step(&mut self, dt: f64) {
        self.time += dt;
        self.update_game_state();

        let mut kick = None;
        for player in self.own.iter_mut() {
            let primitive = self
                .commands
                .get(&player.id)
                .cloned()
                .unwrap_or(Primitive::Stop);
            if let Primitive::Shoot { target, power, .. } = primitive {
                if player.has_ball {
                    kick = Some((target, power));
                }
            }
            move_player(&self.config, player, &primitive, dt);
        }

        if let Some(ball) = self.ball.as_mut() {
            let field = &self.config.field_geometry;
            ball.position += ball.velocity * dt;
            ball.velocity *= (1.0 - self.config.ball_damping * dt).max(0.0);
            let half_length = field.half_length() + field.boundary_width;
            let half_width = field.half_width() + field.boundary_width;
            if ball.position.x.abs() > half_length {
                ball.position.x = ball.position.x.clamp(-half_length, half_length);
                ball.velocity.x = -ball.velocity.x;
            }
            if ball.position.y.abs() > half_width {
                ball.position.y = ball.position.y.clamp(-half_width, half_width);
                ball.velocity.y = -ball.velocity.y;
            }

            if let Some((target, power)) = kick {
                let direction = target - ball.position;
                if direction.norm() > f64::EPSILON {
                    // Power is in m/s, positions are in mm.
                    ball.velocity = direction.normalize() * power * 1000.0;
                    tracing::debug!("Kick towards ({:.0}, {:.0})", target.x, target.y);
                }
            }

            for player in self.own.iter_mut().chain(self.opp.iter_mut()) {
                player.has_ball =
                    kick.is_none() && on_dribbler(&self.config, player, ball.position);
            }
            // A dribbling robot drags the ball along in front of it.
            let carrier = self.own.iter().find(|p| {
                p.has_ball
                    && matches!(
                        self.commands.get(&p.id),
                        Some(Primitive::DribbleTo { .. })
                    )
            });
            if let Some(carrier) = carrier {
                let hold = self.config.dribbler_reach - 40.0;
                ball.position = carrier.position + carrier.yaw.to_unit_vector() * hold;
                ball.velocity = carrier.velocity;
            }
        }
    }

    pub fn world_data(&self) -> WorldData {
        WorldData {
            t_received: self.time,
            own_players: self.own.clone(),
            opp_players: self.opp.clone(),
            ball: self.ball.as_ref().map(|ball| BallData {
                position: Vector3::new(ball.position.x, ball.position.y, 0.0),
                velocity: Vector3::new(ball.velocity.x, ball.velocity.y, 0.0),
                detected: true,
            }),
            field_geom: self.config.field_geometry.clone(),
            current_game_state: self.game_state.clone(),
        }
    }

    fn update_game_state(&mut self) {
        while let Some(event) = self.referee.first().copied() {
            if event.at > self.time {
                break;
            }
            self.referee.remove(0);
            tracing::info!(
                "Referee: {:?} (us operating: {})",
                event.game_state,
                event.us_operating
            );
            self.game_state = GameStateData {
                game_state: event.game_state,
                us_operating: event.us_operating,
            };
        }
    }
}

fn on_dribbler(config: &SimulationConfig, player: &PlayerData, ball: Vector2) -> bool {
    let to_ball = ball - player.position;
    to_ball.norm() < config.dribbler_reach
        && (Angle::of_vector(&to_ball) - player.yaw).abs() < config.dribbler_angle
}

fn move_player(config: &SimulationConfig, player: &mut PlayerData, primitive: &Primitive, dt: f64) {
    let (dest, orientation) = match primitive {
        Primitive::Stop | Primitive::Shoot { .. } => (player.position, player.yaw),
        Primitive::MoveTo {
            dest, orientation, ..
        }
        | Primitive::DribbleTo { dest, orientation } => (*dest, *orientation),
        Primitive::Pivot {
            center,
            orientation,
            ..
        } => {
            let turn = clamp_turn(*orientation - player.yaw, config.max_ang_vel * dt);
            let offset = turn.rotate_vector(&(player.position - *center));
            (*center + offset, player.yaw + turn)
        }
        Primitive::Spin { dest, speed } => {
            (*dest, player.yaw + Angle::from_radians(speed * dt))
        }
    };

    let delta = dest - player.position;
    let max_step = config.max_vel * dt;
    let step = if delta.norm() > max_step {
        delta.normalize() * max_step
    } else {
        delta
    };
    player.position += step;
    player.velocity = step / dt;

    let turn = clamp_turn(orientation - player.yaw, config.max_ang_vel * dt);
    player.yaw = player.yaw + turn;
    player.angular_speed = turn.radians() / dt;
}

fn clamp_turn(turn: Angle, max: f64) -> Angle {
    Angle::from_radians(turn.radians().clamp(-max, max))
}

pub struct SimulationBuilder {
    sim: Simulation,
    last_own_id: u32,
    last_opp_id: u32,
}

impl SimulationBuilder {
    pub fn new(config: SimulationConfig) -> Self {
        SimulationBuilder {
            sim: Simulation {
                config,
                time: 0.0,
                own: Vec::new(),
                opp: Vec::new(),
                ball: None,
                game_state: GameStateData {
                    game_state: GameState::Run,
                    us_operating: true,
                },
                referee: Vec::new(),
                commands: HashMap::new(),
            },
            last_own_id: 0,
            last_opp_id: 0,
        }
    }

    pub fn add_own_player(mut self, position: Vector2, yaw: Angle) -> Self {
        let id = PlayerId::new(self.last_own_id);
        self.sim.own.push(PlayerData::new(id, position).with_yaw(yaw));
        self.last_own_id += 1;
        self
    }

    pub fn add_opp_player(mut self, position: Vector2, yaw: Angle) -> Self {
        let id = PlayerId::new(self.last_opp_id);
        self.sim.opp.push(PlayerData::new(id, position).with_yaw(yaw));
        self.last_opp_id += 1;
        self
    }

    pub fn add_ball(mut self, position: Vector2) -> Self {
        self.sim.ball = Some(Ball {
            position,
            velocity: Vector2::zeros(),
        });
        self
    }

    /// Queues a referee decision. Events must be added in time order.
    pub fn referee(mut self, at: f64, game_state: GameState, us_operating: bool) -> Self {
        self.sim.referee.push(RefereeEvent {
            at,
            game_state,
            us_operating,
        });
        self
    }

    pub fn build(self) -> Simulation {
        self.sim
    }
}

/// `own` robots on our half with the first one in goal, `opp` robots on theirs and a
/// referee going through a kickoff for us.
pub fn kickoff_scenario(own: u32, opp: u32) -> Simulation {
    let config = SimulationConfig::default();
    let half_length = config.field_geometry.half_length();
    let mut builder = SimulationBuilder::new(config).add_ball(Vector2::zeros());
    for i in 0..own {
        let position = if i == 0 {
            Vector2::new(-half_length + 300.0, 0.0)
        } else {
            Vector2::new(-2500.0, -2000.0 + 1000.0 * (i - 1) as f64)
        };
        builder = builder.add_own_player(position, Angle::ZERO);
    }
    for i in 0..opp {
        let position = Vector2::new(1500.0 + 500.0 * i as f64, -1500.0 + 1500.0 * i as f64);
        builder = builder.add_opp_player(position, Angle::PI);
    }
    builder
        .referee(0.0, GameState::Stop, false)
        .referee(2.0, GameState::PrepareKickoff, true)
        .referee(5.0, GameState::Kickoff, true)
        .referee(7.0, GameState::Run, true)
        .build()
}
