//! Run-wide mutable state: economy, wave timers, counters and city tallies.
//!
//! Owned by `Simulator` and lent to systems by reference. Stored outside the
//! ECS world because it is a single record, not a per-entity property.

use bulwark_core::components::SpawnOrder;
use bulwark_core::config::{DifficultySettings, GameRules};
use bulwark_core::enums::{BuildingCategory, Difficulty, RunOutcome, WavePhase};
use bulwark_core::state::CategoryCount;

/// Everything about a run that is not an entity.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub phase: WavePhase,
    pub paused: bool,
    pub outcome: Option<RunOutcome>,
    pub difficulty: Difficulty,
    pub rules: GameRules,

    // --- Wave controller ---
    pub stage: u32,
    /// Seconds left in the running wave.
    pub game_timer: f64,
    /// Seconds left in the cooldown.
    pub cooldown_timer: f64,
    /// Simulation time (ms) before which no new batch spawns.
    pub next_spawn_ms: f64,

    // --- Economy / scoring ---
    pub money: i64,
    pub intercepted: u32,
    pub ground_hits: u32,
    /// Consecutive interceptions since the last ground hit.
    pub streak: u32,
    pub wave_start_intercepted: u32,
    pub wave_start_ground_hits: u32,

    // --- City ---
    pub city: CityTally,
    /// Derived each tick from `city`; never rises within a run.
    pub city_health_percent: f64,

    next_spawn_order: u64,
}

/// Building totals at generation time and destroyed so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityTally {
    pub initial_height: f64,
    pub destroyed_height: f64,
    pub initial_count: u32,
    pub destroyed_count: u32,
    pub high: CategoryCount,
    pub mid: CategoryCount,
    pub low: CategoryCount,
}

impl SimulationState {
    pub fn new(rules: GameRules, difficulty: Difficulty) -> Self {
        Self {
            phase: WavePhase::Inactive,
            paused: false,
            outcome: None,
            difficulty,
            stage: 1,
            game_timer: rules.wave_duration_secs,
            cooldown_timer: rules.cooldown_secs,
            next_spawn_ms: 0.0,
            money: rules.starting_money,
            intercepted: 0,
            ground_hits: 0,
            streak: 0,
            wave_start_intercepted: 0,
            wave_start_ground_hits: 0,
            city: CityTally::default(),
            city_health_percent: 100.0,
            next_spawn_order: 0,
            rules,
        }
    }

    pub fn settings(&self) -> DifficultySettings {
        DifficultySettings::for_difficulty(self.difficulty)
    }

    /// Whether a run is in progress (wave or cooldown).
    pub fn is_running(&self) -> bool {
        matches!(self.phase, WavePhase::Active | WavePhase::Cooldown)
    }

    /// Allocate the next spawn order number.
    pub fn next_order(&mut self) -> SpawnOrder {
        let order = SpawnOrder(self.next_spawn_order);
        self.next_spawn_order += 1;
        order
    }

    pub fn intercepted_this_wave(&self) -> u32 {
        self.intercepted - self.wave_start_intercepted
    }

    pub fn ground_hits_this_wave(&self) -> u32 {
        self.ground_hits - self.wave_start_ground_hits
    }

    /// Start per-wave counting from the current totals.
    pub fn reset_wave_tracking(&mut self) {
        self.wave_start_intercepted = self.intercepted;
        self.wave_start_ground_hits = self.ground_hits;
    }

    /// Recompute `city_health_percent` from the tally.
    pub fn refresh_city_health(&mut self) {
        self.city_health_percent = self.city.health_percent();
    }
}

impl CityTally {
    /// Remaining height as a percentage of the initial height, in [0, 100].
    pub fn health_percent(&self) -> f64 {
        if self.initial_height <= 0.0 {
            return 0.0;
        }
        let remaining = (self.initial_height - self.destroyed_height).max(0.0);
        (remaining / self.initial_height * 100.0).clamp(0.0, 100.0)
    }

    pub fn remaining_height(&self) -> f64 {
        (self.initial_height - self.destroyed_height).max(0.0)
    }

    /// Count a newly generated building.
    pub fn record_building(&mut self, category: BuildingCategory, height: f64) {
        self.initial_height += height;
        self.initial_count += 1;
        self.category_mut(category).initial += 1;
    }

    /// Count a collapse. Callers guarantee one call per building.
    pub fn record_collapse(&mut self, category: BuildingCategory, height: f64) {
        self.destroyed_height += height;
        self.destroyed_count += 1;
        self.category_mut(category).destroyed += 1;
    }

    fn category_mut(&mut self, category: BuildingCategory) -> &mut CategoryCount {
        match category {
            BuildingCategory::High => &mut self.high,
            BuildingCategory::Mid => &mut self.mid,
            BuildingCategory::Low => &mut self.low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_percent_tracks_destroyed_height() {
        let mut city = CityTally::default();
        city.record_building(BuildingCategory::High, 20.0);
        city.record_building(BuildingCategory::Low, 5.0);
        city.record_building(BuildingCategory::Mid, 15.0);
        assert_eq!(city.health_percent(), 100.0);

        city.record_collapse(BuildingCategory::Mid, 15.0);
        assert!((city.health_percent() - 62.5).abs() < 1e-9);
        assert_eq!(city.mid.destroyed, 1);
        assert_eq!(city.destroyed_count, 1);
    }

    #[test]
    fn empty_city_has_zero_health() {
        assert_eq!(CityTally::default().health_percent(), 0.0);
    }

    #[test]
    fn wave_tracking_counts_from_reset() {
        let mut state = SimulationState::new(GameRules::default(), Difficulty::Normal);
        state.intercepted = 4;
        state.ground_hits = 2;
        state.reset_wave_tracking();
        state.intercepted += 3;
        assert_eq!(state.intercepted_this_wave(), 3);
        assert_eq!(state.ground_hits_this_wave(), 0);
    }

    #[test]
    fn spawn_orders_are_monotonic() {
        let mut state = SimulationState::new(GameRules::default(), Difficulty::Normal);
        let a = state.next_order();
        let b = state.next_order();
        assert!(a < b);
    }
}
