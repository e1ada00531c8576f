//! Game loop thread: runs the simulator and publishes snapshots.
//!
//! The simulator is created inside the thread so it never crosses a thread
//! boundary. Commands arrive via an `mpsc` channel; the latest snapshot is kept
//! in shared state for polling. The loop ends on `Shutdown`, channel
//! disconnect, the end of the run or the tick limit.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use bulwark_core::commands::PlayerCommand;
use bulwark_core::constants::TICK_RATE;
use bulwark_core::state::{GameSnapshot, RunSummary};
use bulwark_sim::{SimConfig, Simulator};

use crate::autopilot::Autopilot;
use crate::error::{AppError, AppResult};
use crate::settings::AutopilotSettings;

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulator.
    Player(PlayerCommand),
    /// Stop the loop gracefully.
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct LoopOptions {
    /// Sleep between ticks to hold the nominal tick rate.
    pub realtime: bool,
    /// 0 = no limit.
    pub max_ticks: u64,
    pub autopilot: Option<AutopilotSettings>,
}

/// How the loop ended.
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    pub ticks: u64,
    /// Present when the run reached game over.
    pub summary: Option<RunSummary>,
}

/// Handle to a running game loop.
pub struct GameLoop {
    command_tx: mpsc::Sender<GameLoopCommand>,
    handle: JoinHandle<LoopOutcome>,
    latest_snapshot: Arc<Mutex<Option<GameSnapshot>>>,
}

impl GameLoop {
    /// Spawn the loop in a new thread. The run starts immediately.
    pub fn spawn(config: SimConfig, options: LoopOptions) -> AppResult<Self> {
        let (command_tx, command_rx) = mpsc::channel::<GameLoopCommand>();
        let latest_snapshot = Arc::new(Mutex::new(None));
        let shared = Arc::clone(&latest_snapshot);

        let handle = std::thread::Builder::new()
            .name("bulwark-game-loop".into())
            .spawn(move || run_game_loop(config, options, command_rx, &shared))?;

        Ok(Self {
            command_tx,
            handle,
            latest_snapshot,
        })
    }

    /// Forward a player command. Returns false once the loop has ended.
    pub fn send(&self, command: PlayerCommand) -> bool {
        self.command_tx.send(GameLoopCommand::Player(command)).is_ok()
    }

    /// Copy of the most recent snapshot.
    pub fn latest_snapshot(&self) -> Option<GameSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }

    /// Ask the loop to stop and wait for it.
    pub fn shutdown(self) -> AppResult<LoopOutcome> {
        let _ = self.command_tx.send(GameLoopCommand::Shutdown);
        self.join()
    }

    /// Wait for the loop to end on its own.
    pub fn join(self) -> AppResult<LoopOutcome> {
        self.handle.join().map_err(|_| AppError::LoopPanicked)
    }
}

fn run_game_loop(
    config: SimConfig,
    options: LoopOptions,
    command_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameSnapshot>>,
) -> LoopOutcome {
    let seed = config.seed;
    let mut sim = Simulator::new(config);
    let mut autopilot = options.autopilot.map(Autopilot::new);
    sim.queue_command(PlayerCommand::StartGame);
    info!(seed, realtime = options.realtime, "Game loop started");

    let mut ticks = 0u64;
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match command_rx.try_recv() {
                Ok(GameLoopCommand::Player(cmd)) => sim.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    debug!(ticks, "Game loop stopped");
                    return LoopOutcome {
                        ticks,
                        summary: sim.take_run_summary(),
                    };
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick
        let snapshot = sim.tick();
        ticks += 1;

        // 3. Let the autopilot react before the next tick
        if let Some(pilot) = autopilot.as_mut() {
            pilot.act(&mut sim, &snapshot);
        }

        // 4. Publish for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if let Some(summary) = sim.take_run_summary() {
            info!(ticks, outcome = ?summary.outcome, "Game loop finished");
            return LoopOutcome {
                ticks,
                summary: Some(summary),
            };
        }
        if options.max_ticks > 0 && ticks >= options.max_ticks {
            info!(ticks, "Tick limit reached");
            return LoopOutcome {
                ticks,
                summary: None,
            };
        }

        // 5. Sleep until the next tick
        if options.realtime {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind, reset to avoid a catch-up spiral
                next_tick_time = now;
            }
        }
    }
}
