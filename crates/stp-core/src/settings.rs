use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::PlayerId;

/// How the goalie slot is bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[typeshare]
pub enum GoalieSelection {
    /// The first robot in roster order
    #[default]
    FirstInRoster,
    /// A fixed robot id. Missing from the roster means no goalie.
    Id(u32),
}

impl GoalieSelection {
    pub fn fixed_id(&self) -> Option<PlayerId> {
        match self {
            GoalieSelection::FirstInRoster => None,
            GoalieSelection::Id(id) => Some(PlayerId::new(*id)),
        }
    }
}

/// Settings for the navigators.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[typeshare]
pub struct NavigatorSettings {
    /// Radius of a robot obstacle in mm. Paths keep twice this distance from robot centers.
    pub robot_radius: f64,
    /// Clearance around the ball when a flag asks to avoid it, in mm.
    pub ball_avoid_radius: f64,
    /// Maximum recursion depth of the straight line detour search.
    pub max_detour_depth: u32,
    /// RRT extension length in mm.
    pub rrt_step: f64,
    /// Maximum number of RRT iterations.
    pub rrt_max_tries: u32,
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            robot_radius: 90.0,
            ball_avoid_radius: 500.0,
            max_detour_depth: 3,
            rrt_step: 100.0,
            rrt_max_tries: 1000,
        }
    }
}

/// Settings for the executor.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
#[typeshare]
pub struct ExecutorSettings {
    pub goalie: GoalieSelection,
    /// Maximum time a play may run, in seconds. `None` disables the limit.
    pub play_timeout_secs: Option<f64>,
    /// Seed for play selection. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// The side (+1 or -1 along y) preferred by side-aware coordinates.
    pub preferred_side: f64,
    /// Whether a halt discards the running play and silences all robots.
    pub halt_overrides: bool,
    pub navigator: NavigatorSettings,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            goalie: GoalieSelection::default(),
            play_timeout_secs: Some(30.0),
            seed: None,
            preferred_side: 1.0,
            halt_overrides: true,
            navigator: NavigatorSettings::default(),
        }
    }
}

impl ExecutorSettings {
    /// Load the executor settings from a file, or store the default settings if the file does
    /// not exist.
    ///
    /// A file that exists but cannot be parsed is reported and replaced by the defaults in
    /// memory; the file itself is left untouched.
    pub fn load_or_insert(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => Ok(settings),
                Err(err) => {
                    log::error!("Failed to parse executor settings: {}", err);
                    Ok(Self::default())
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                fs::write(path, serde_json::to_string_pretty(&settings)?)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                log::info!("Wrote default executor settings to {}", path.display());
                Ok(settings)
            }
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read {}", path.display()))
            }
        }
    }

    /// Store the executor settings in the given file.
    pub async fn store(&self, path: impl AsRef<Path>) {
        let contents = match serde_json::to_string_pretty(self) {
            Ok(contents) => contents,
            Err(err) => {
                log::error!("Failed to serialize executor settings: {}", err);
                return;
            }
        };
        if let Err(err) = tokio::fs::write(path, contents).await {
            log::error!("Failed to write executor settings: {}", err);
        }
    }
}
