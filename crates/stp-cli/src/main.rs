use std::{collections::BTreeMap, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Result};
use clap::Parser;
use stp_core::{ExecutorSettings, PlayerId};
use stp_executor::{navigator::RrtNavigator, Executor};

mod demo_plays;
mod sim;

#[derive(Debug, Parser)]
#[command(name = "stp-cli")]
pub(crate) struct Args {
    /// Executor settings, created with defaults if missing
    #[clap(long, default_value = "stp-settings.json")]
    settings: PathBuf,

    #[clap(long, default_value = "5")]
    robots: u32,

    #[clap(long, default_value = "3")]
    opponents: u32,

    /// Stop after this many cycles. Runs until ctrl-c otherwise.
    #[clap(long)]
    cycles: Option<u64>,

    #[clap(long, default_value = "16")]
    period_ms: u64,

    /// Run only this play
    #[clap(long)]
    play: Option<String>,

    /// Plays to disable, comma separated
    #[clap(long, value_delimiter = ',')]
    disable: Vec<String>,

    /// Take one robot off the field at this cycle
    #[clap(long)]
    drop_robot_at: Option<u64>,

    /// Plan paths with RRT instead of straight-line detours
    #[clap(long, default_value = "false")]
    rrt: bool,

    /// Print every cycle's commands as JSON lines
    #[clap(long, default_value = "false")]
    json: bool,

    /// Log the executor state every this many cycles
    #[clap(long, default_value = "60")]
    info_every: u64,

    #[clap(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = tracing::Level::from_str(&args.log_level)
        .map_err(|_| anyhow!("Invalid log level: {}", args.log_level))?;
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .without_time()
        .try_init()
        .map_err(|err| anyhow!("Unable to set global tracing subscriber: {}", err))?;

    let settings = ExecutorSettings::load_or_insert(&args.settings)?;
    tracing::info!("Loaded settings from {}", args.settings.display());

    let mut executor = Executor::new(demo_plays::catalog()?, settings.clone());
    if args.rrt {
        executor = executor.with_navigator(RrtNavigator::new(&settings.navigator));
    }
    for name in &args.disable {
        executor.set_play_enabled(name, false)?;
    }
    executor.force_play(args.play.as_deref())?;

    let mut simulator = sim::kickoff_scenario(args.robots, args.opponents);
    let period = Duration::from_millis(args.period_ms.max(1));
    let dt = period.as_secs_f64();
    let mut interval = tokio::time::interval(period);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut cycle: u64 = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutting down");
                break;
            }
            _ = interval.tick() => {
                if args.drop_robot_at == Some(cycle) {
                    let id = PlayerId::new(args.robots.saturating_sub(1));
                    tracing::info!("Removing robot {} from the field", id);
                    simulator.remove_own_player(id);
                }

                let world = simulator.world_data();
                let commands = executor.tick(&world);
                if args.json {
                    let by_robot: BTreeMap<u32, _> = commands
                        .iter()
                        .map(|(id, cmd)| (id.as_u32(), cmd))
                        .collect();
                    let line = serde_json::json!({
                        "t": world.t_received,
                        "info": executor.info(),
                        "commands": by_robot,
                    });
                    println!("{}", serde_json::to_string(&line)?);
                }
                simulator.push_commands(&commands);
                simulator.step(dt);

                cycle += 1;
                if args.info_every > 0 && cycle % args.info_every == 0 {
                    tracing::info!("t = {:.2}s\n{}", simulator.time(), executor.info());
                }
                if args.cycles.is_some_and(|n| cycle >= n) {
                    break;
                }
            }
        }
    }

    tracing::info!("Ran {} cycles, final state:\n{}", cycle, executor.info());
    Ok(())
}
