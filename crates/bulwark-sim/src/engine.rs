//! Simulation engine: the core of the game.
//!
//! `Simulator` owns the hecs ECS world and the run state, processes player
//! commands, runs all systems in a fixed order, and produces `GameSnapshot`s.
//! Completely headless, so a seeded run is reproducible tick for tick.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use bulwark_core::commands::PlayerCommand;
use bulwark_core::components::{Factory, Launcher};
use bulwark_core::config::GameRules;
use bulwark_core::constants::{DT, MAX_TICKS_PER_ADVANCE};
use bulwark_core::enums::*;
use bulwark_core::error::{CommandError, CommandResult};
use bulwark_core::events::SimEvent;
use bulwark_core::state::{GameSnapshot, RunSummary};
use bulwark_core::types::{EntityId, Position, SimTime};

use crate::entities::{entity_of, id_of};
use crate::history::HistoryRecorder;
use crate::placement;
use crate::state::SimulationState;
use crate::systems;
use crate::upgrades::{self, UpgradeLevels, UpgradeReceipt};
use crate::world_setup;

/// How long declined-command messages stay on the HUD.
const MESSAGE_DURATION_MS: u32 = 3000;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and commands = same simulation.
    pub seed: u64,
    pub difficulty: Difficulty,
    pub rules: GameRules,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            difficulty: Difficulty::default(),
            rules: GameRules::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct Simulator {
    world: World,
    state: SimulationState,
    time: SimTime,
    rng: ChaCha8Rng,
    upgrades: UpgradeLevels,
    history: HistoryRecorder,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
    /// Wall-clock seconds not yet consumed by `advance`.
    accumulator: f64,
    run_summary: Option<RunSummary>,
}

impl Simulator {
    /// Create a new simulator with the given config. No run is in progress.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            state: SimulationState::new(config.rules, config.difficulty),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            upgrades: UpgradeLevels::default(),
            history: HistoryRecorder::default(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            accumulator: 0.0,
            run_summary: None,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameSnapshot {
        self.step();
        self.snapshot()
    }

    /// Advance by one tick without building a snapshot.
    ///
    /// Queued commands are always processed. Systems only run while a run is
    /// in progress and not paused; simulation time stands still otherwise.
    pub fn step(&mut self) {
        self.process_commands();

        if self.state.is_running() && !self.state.paused {
            self.run_systems();
            self.time.advance();
            self.finish_if_over();
        }
    }

    /// Feed wall-clock time in seconds and run the fixed ticks it covers.
    ///
    /// At most `MAX_TICKS_PER_ADVANCE` ticks run per call; time beyond that is
    /// dropped rather than carried. Returns the number of ticks run.
    pub fn advance(&mut self, delta_secs: f64) -> u32 {
        self.accumulator += delta_secs.max(0.0);
        let mut ticks = 0;
        while self.accumulator >= DT && ticks < MAX_TICKS_PER_ADVANCE {
            self.step();
            self.accumulator -= DT;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_ADVANCE {
            self.accumulator = self.accumulator.min(DT);
        }
        ticks
    }

    /// Current visible state. Drains the events accumulated since the last snapshot.
    pub fn snapshot(&mut self) -> GameSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(&self.world, &self.time, &self.state, &self.upgrades, events)
    }

    // --- Run control ---

    /// Build the city and start stage 1. From game over this starts a fresh run.
    pub fn start_game(&mut self) {
        match self.state.phase {
            WavePhase::Inactive => {}
            WavePhase::GameOver => self.restart(),
            WavePhase::Active | WavePhase::Cooldown => return,
        }

        let armor = self.upgrades.building_armor();
        let city = world_setup::generate_city(&mut self.world, &mut self.rng, &mut self.state, armor);
        self.state.city = city;
        self.state.refresh_city_health();
        self.state.phase = WavePhase::Active;
        self.state.stage = 1;
        self.state.game_timer = self.state.rules.wave_duration_secs;
        self.state.next_spawn_ms = self.time.elapsed_ms();
        self.state.reset_wave_tracking();
        self.history.start(self.time.elapsed_secs);
        info!(
            difficulty = self.state.difficulty.as_str(),
            buildings = self.state.city.initial_count,
            "Run started"
        );
    }

    /// Tear down the world and return to the inactive state.
    /// Difficulty and rules are kept; money, stage, upgrades and statistics reset.
    pub fn restart(&mut self) {
        self.world.clear();
        self.state = SimulationState::new(self.state.rules.clone(), self.state.difficulty);
        self.time = SimTime::default();
        self.upgrades = UpgradeLevels::default();
        self.history = HistoryRecorder::default();
        self.accumulator = 0.0;
        self.run_summary = None;
        info!("Simulation reset");
    }

    pub fn pause(&mut self) {
        if self.state.is_running() {
            self.state.paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.state.paused = false;
    }

    /// Skip the rest of the cooldown. Pays the early-start bonus plus the wave bonus.
    pub fn start_next_wave(&mut self) -> CommandResult<i64> {
        match self.state.phase {
            WavePhase::Cooldown => {
                let base = self.state.rules.early_start_bonus;
                Ok(systems::wave::start_next_stage(
                    &mut self.state,
                    &mut self.history,
                    &mut self.events,
                    base,
                    true,
                ))
            }
            WavePhase::Active => Err(CommandError::WaveInProgress),
            WavePhase::Inactive | WavePhase::GameOver => Err(CommandError::NotRunning),
        }
    }

    /// Change difficulty. Live launcher ranges are re-derived now; speed, the
    /// enemy cap and the type mix apply to future spawns.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.state.difficulty = difficulty;
        upgrades::apply_upgrade_effect(
            &mut self.world,
            &self.upgrades,
            UpgradeCategory::Launcher,
            difficulty,
        );
        info!(difficulty = difficulty.as_str(), "Difficulty changed");
    }

    // --- Building ---

    /// Place a launcher or factory at the grid cell nearest `position`.
    pub fn place_structure(&mut self, kind: StructureKind, position: Position) -> CommandResult<EntityId> {
        if !self.state.is_running() {
            return Err(CommandError::NotRunning);
        }
        let cost = self.state.rules.structure_cost;
        if self.state.money < cost {
            return Err(CommandError::InsufficientFunds {
                needed: cost,
                available: self.state.money,
            });
        }
        let position = placement::snap_to_grid(position);
        placement::can_place_at(&self.world, &position)?;

        self.state.money -= cost;
        let order = self.state.next_order();
        let entity = match kind {
            StructureKind::Launcher => world_setup::spawn_launcher(
                &mut self.world,
                order,
                position,
                &self.upgrades,
                self.state.difficulty,
            ),
            StructureKind::Factory => world_setup::spawn_factory(
                &mut self.world,
                order,
                position,
                &self.upgrades,
                self.time.elapsed_ms(),
            ),
        };
        let id = id_of(entity);
        info!(?kind, x = position.x, z = position.z, money = self.state.money, "Structure placed");
        self.events.push(SimEvent::StructurePlaced { id, kind, position });
        Ok(id)
    }

    /// Abort a factory's delivery in flight. The missile returns to the
    /// factory; the fee is not refunded.
    pub fn cancel_delivery(&mut self, factory: EntityId) -> CommandResult<bool> {
        let mut f = entity_of(factory)
            .and_then(|e| self.world.get::<&mut Factory>(e).ok())
            .ok_or(CommandError::UnknownEntity(factory))?;
        let cancelled = systems::factory::cancel_delivery(&mut f);
        if cancelled {
            self.events.push(SimEvent::DeliveryCancelled { factory });
        }
        Ok(cancelled)
    }

    /// Fire one defense missile from `launcher` at `target` outside the
    /// regular fire-control scan.
    pub fn fire_missile(&mut self, launcher: EntityId, target: EntityId) -> CommandResult<EntityId> {
        let launcher_entity = entity_of(launcher)
            .filter(|&e| self.world.get::<&Launcher>(e).is_ok())
            .ok_or(CommandError::UnknownEntity(launcher))?;
        let target_entity = entity_of(target).ok_or(CommandError::UnknownEntity(target))?;
        let missile = systems::launcher::fire_missile(
            &mut self.world,
            &mut self.state,
            launcher_entity,
            target_entity,
        )?;
        Ok(id_of(missile))
    }

    // --- Upgrades ---

    pub fn can_upgrade(&self, category: UpgradeCategory, kind: UpgradeKind) -> bool {
        self.upgrades.can_upgrade(category, kind, self.state.money)
    }

    /// Buy the next level of an upgrade and push its effect onto live structures.
    pub fn apply_upgrade(&mut self, category: UpgradeCategory, kind: UpgradeKind) -> CommandResult<UpgradeReceipt> {
        let receipt = self.upgrades.purchase(category, kind, self.state.money)?;
        self.state.money -= receipt.cost;
        upgrades::apply_upgrade_effect(&mut self.world, &self.upgrades, category, self.state.difficulty);
        info!(
            category = category.as_str(),
            kind = kind.as_str(),
            level = receipt.level,
            cost = receipt.cost,
            "Upgrade applied"
        );
        self.events.push(SimEvent::UpgradeApplied {
            category,
            kind,
            level: receipt.level,
            cost: receipt.cost,
        });
        Ok(receipt)
    }

    /// Cumulative effect of an upgrade track.
    pub fn calculate_effect(&self, category: UpgradeCategory, kind: UpgradeKind) -> f64 {
        self.upgrades.calculate_effect(category, kind)
    }

    // --- Queries ---

    pub fn phase(&self) -> WavePhase {
        self.state.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn upgrades(&self) -> &UpgradeLevels {
        &self.upgrades
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Summary of the finished run, available once the run is over.
    pub fn run_summary(&self) -> Option<&RunSummary> {
        self.run_summary.as_ref()
    }

    /// Take the summary of the finished run. Returns it at most once per run.
    pub fn take_run_summary(&mut self) -> Option<RunSummary> {
        self.run_summary.take()
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// Spawn an enemy missile with a fixed start and target (for tests).
    #[cfg(test)]
    pub fn spawn_test_enemy(&mut self, kind: MissileType, start: Position, target: Position) -> EntityId {
        let order = self.state.next_order();
        let settings = self.state.settings();
        let entity = world_setup::spawn_enemy_missile_at(
            &mut self.world,
            order,
            kind,
            start,
            target,
            self.state.stage,
            &settings,
        );
        id_of(entity)
    }

    /// Spawn a building standing at `lot` and count it in the city tally (for tests).
    #[cfg(test)]
    pub fn spawn_test_building(&mut self, lot: Position, width: f64, height: f64, depth: f64) -> EntityId {
        let order = self.state.next_order();
        let armor = self.upgrades.building_armor();
        let entity = world_setup::spawn_building(&mut self.world, order, lot, width, height, depth, armor);
        self.state
            .city
            .record_building(world_setup::building_category(height), height);
        self.state.refresh_city_health();
        id_of(entity)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command. Declined commands become HUD messages.
    fn handle_command(&mut self, command: PlayerCommand) {
        let result = match command {
            PlayerCommand::StartGame => {
                self.start_game();
                Ok(())
            }
            PlayerCommand::Restart => {
                self.restart();
                Ok(())
            }
            PlayerCommand::Pause => {
                self.pause();
                Ok(())
            }
            PlayerCommand::Resume => {
                self.resume();
                Ok(())
            }
            PlayerCommand::StartNextWave => self.start_next_wave().map(|_| ()),
            PlayerCommand::SetDifficulty { difficulty } => {
                self.set_difficulty(difficulty);
                Ok(())
            }
            PlayerCommand::PlaceStructure { kind, position } => {
                self.place_structure(kind, position).map(|_| ())
            }
            PlayerCommand::CancelDelivery { factory } => self.cancel_delivery(factory).map(|_| ()),
            PlayerCommand::ApplyUpgrade { category, kind } => {
                self.apply_upgrade(category, kind).map(|_| ())
            }
        };

        if let Err(err) = result {
            warn!(%err, "Command declined");
            self.events
                .push(SimEvent::message(err.to_string(), MESSAGE_DURATION_MS, self.time.tick));
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let now_ms = self.time.elapsed_ms();

        // 1. Wave and cooldown timers
        systems::wave::run(&mut self.state, &mut self.history, &mut self.events);
        if !self.state.is_running() {
            return;
        }
        // 2. Factory production and deliveries
        systems::factory::run(
            &mut self.world,
            &mut self.state,
            &mut self.events,
            now_ms,
            self.time.tick,
        );
        // 3. Launcher fire control
        systems::launcher::run(&mut self.world, &mut self.state, &mut self.events);
        // 4. Defense missiles (flight, interception)
        systems::defense_missile::run(
            &mut self.world,
            &mut self.state,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        // 5. Enemy missiles (ballistics, impact)
        systems::enemy_missile::run(
            &mut self.world,
            &mut self.state,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        // 6. Cleanup (collapsed buildings, destroyed structures)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        // 7. Spawning
        systems::spawner::run(&mut self.world, &mut self.state, &mut self.rng, now_ms);
        // 8. Derived stats and the failure check
        self.state.refresh_city_health();
        systems::wave::check_city_failure(&mut self.state, &mut self.events);
    }

    /// Produce the run summary the first time the run is seen to be over.
    fn finish_if_over(&mut self) {
        if self.state.phase != WavePhase::GameOver {
            return;
        }
        let outcome = self.state.outcome.unwrap_or(RunOutcome::Failed);
        if let Some(summary) = self.history.finish(&self.state, outcome, self.time.elapsed_secs) {
            self.run_summary = Some(summary);
        }
    }
}
