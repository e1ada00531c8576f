use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bulwark_app::error::AppResult;
use bulwark_app::game_loop::{GameLoop, LoopOptions};
use bulwark_app::persistence::{LeaderboardStats, RunLog, RunRecord};
use bulwark_app::settings::{AppSettings, Cli};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "bulwark failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let mut settings = AppSettings::load_or_default(&cli.config)?;
    settings.apply_overrides(&cli);
    let log = RunLog::new(settings.record_file.clone());

    if cli.stats {
        let stats = LeaderboardStats::from_records(&log.load()?);
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let options = LoopOptions {
        realtime: settings.realtime,
        max_ticks: settings.max_ticks,
        autopilot: settings
            .autopilot
            .enabled
            .then(|| settings.autopilot.clone()),
    };
    let game = GameLoop::spawn(settings.sim_config(), options)?;
    let outcome = game.join()?;

    match outcome.summary {
        Some(summary) => {
            let record = RunRecord::new(settings.seed, summary);
            log.append(&record)?;
            info!(
                path = %log.path().display(),
                score = record.summary.score,
                "Run recorded"
            );
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        None => info!(ticks = outcome.ticks, "Run stopped before game over, nothing recorded"),
    }
    Ok(())
}
