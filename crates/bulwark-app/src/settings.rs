//! Runner settings: an optional `bulwark.toml` with command-line overrides.
//!
//! Every table is optional. A missing file yields the defaults; a file that
//! exists but does not parse is an error rather than a silent fallback.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use bulwark_core::config::GameRules;
use bulwark_core::enums::Difficulty;
use bulwark_sim::SimConfig;

use crate::error::AppResult;

/// Headless Bulwark runner - plays a seeded defense run and records the result
#[derive(Parser, Debug)]
#[command(name = "bulwark")]
#[command(about = "Run a headless Bulwark city-defense simulation")]
pub struct Cli {
    /// Settings file (TOML). A missing file means defaults.
    #[arg(long, short = 'c', default_value = "bulwark.toml")]
    pub config: PathBuf,

    /// Random seed for deterministic runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Difficulty: easy, normal or hard
    #[arg(long, value_parser = parse_difficulty)]
    pub difficulty: Option<Difficulty>,

    /// Number of stages to clear
    #[arg(long, conflicts_with = "endless")]
    pub stages: Option<u32>,

    /// Play until the city falls
    #[arg(long)]
    pub endless: bool,

    /// Stop after this many ticks even if the run is not over (0 = no limit)
    #[arg(long)]
    pub max_ticks: Option<u64>,

    /// JSON-lines file that finished runs are appended to
    #[arg(long)]
    pub record_file: Option<PathBuf>,

    /// Pace the loop at the simulation tick rate instead of running flat out
    #[arg(long)]
    pub realtime: bool,

    /// Leave building and upgrading to nobody
    #[arg(long)]
    pub no_autopilot: bool,

    /// Print leaderboard statistics from the record file and exit
    #[arg(long)]
    pub stats: bool,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::parse(s).ok_or_else(|| format!("unknown difficulty '{s}' (easy, normal, hard)"))
}

/// How the autopilot builds and spends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotSettings {
    pub enabled: bool,
    pub launchers: usize,
    pub factories: usize,
    /// Spend surplus money on upgrades once the build plan is complete.
    pub buy_upgrades: bool,
    /// Skip cooldowns for the early-start bonus.
    pub early_start: bool,
}

impl Default for AutopilotSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            launchers: 4,
            factories: 2,
            buy_upgrades: true,
            early_start: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub seed: u64,
    pub difficulty: Difficulty,
    /// 0 runs until the run ends.
    pub max_ticks: u64,
    pub realtime: bool,
    pub record_file: PathBuf,
    pub rules: GameRules,
    pub autopilot: AutopilotSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            difficulty: Difficulty::Normal,
            max_ticks: 0,
            realtime: false,
            record_file: PathBuf::from("bulwark-runs.jsonl"),
            rules: GameRules::default(),
            autopilot: AutopilotSettings::default(),
        }
    }
}

impl AppSettings {
    pub fn from_toml(contents: &str) -> AppResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load `path`, or the defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let settings = Self::from_toml(&contents)?;
        info!(path = %path.display(), "Settings loaded");
        Ok(settings)
    }

    /// Command-line flags win over file values.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(difficulty) = cli.difficulty {
            self.difficulty = difficulty;
        }
        if cli.endless {
            self.rules.total_stages = None;
        } else if let Some(stages) = cli.stages {
            self.rules.total_stages = Some(stages);
        }
        if let Some(max_ticks) = cli.max_ticks {
            self.max_ticks = max_ticks;
        }
        if let Some(path) = &cli.record_file {
            self.record_file = path.clone();
        }
        if cli.realtime {
            self.realtime = true;
        }
        if cli.no_autopilot {
            self.autopilot.enabled = false;
        }
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            seed: self.seed,
            difficulty: self.difficulty,
            rules: self.rules.clone(),
        }
    }
}
