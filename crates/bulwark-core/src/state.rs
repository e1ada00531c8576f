//! Game state snapshot: the complete visible state handed to the renderer and HUD.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{EntityId, Position, SimTime, Velocity};

/// Complete read-only view of the simulation after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub time: SimTime,
    pub phase: WavePhase,
    pub paused: bool,
    pub difficulty: Difficulty,
    pub stage: u32,
    /// Seconds left in the current wave.
    pub game_timer: f64,
    /// Seconds left in the current cooldown.
    pub cooldown_timer: f64,
    pub stats: StatsView,
    pub city: CityView,
    pub launchers: Vec<LauncherView>,
    pub factories: Vec<FactoryView>,
    pub enemy_missiles: Vec<EnemyMissileView>,
    pub defense_missiles: Vec<DefenseMissileView>,
    pub buildings: Vec<BuildingView>,
    pub upgrades: Vec<UpgradeView>,
    /// Events since the previous snapshot.
    pub events: Vec<SimEvent>,
}

/// HUD aggregates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsView {
    pub money: i64,
    pub intercepted: u32,
    pub ground_hits: u32,
    pub streak: u32,
    pub city_health_percent: f64,
}

/// City condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityView {
    pub initial_height: f64,
    pub remaining_height: f64,
    pub initial_buildings: u32,
    pub destroyed_buildings: u32,
    pub high: CategoryCount,
    pub mid: CategoryCount,
    pub low: CategoryCount,
}

/// Initial and destroyed counts for one building category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub initial: u32,
    pub destroyed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherView {
    pub id: EntityId,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    pub missiles: u32,
    pub max_missiles: u32,
    pub range: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactoryView {
    pub id: EntityId,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    pub missiles: u32,
    pub max_missiles: u32,
    pub production_interval_ms: f64,
    pub is_distributing: bool,
    /// Grid cell the in-flight delivery currently occupies.
    pub delivery_position: Option<Position>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyMissileView {
    pub id: EntityId,
    pub kind: MissileType,
    pub position: Position,
    pub velocity: Velocity,
    pub color: u32,
    pub engaged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefenseMissileView {
    pub id: EntityId,
    pub position: Position,
    pub phase: DefensePhase,
    pub target_enemy: Option<EntityId>,
    pub launcher: EntityId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingView {
    pub id: EntityId,
    pub position: Position,
    pub category: BuildingCategory,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub health: f64,
    pub max_health: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeView {
    pub category: UpgradeCategory,
    pub kind: UpgradeKind,
    pub level: u32,
    pub max_level: u32,
    /// Price of the next level, if any.
    pub next_cost: Option<i64>,
    pub cumulative_effect: f64,
}

/// Wave completion bonus breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveBonus {
    pub city_protection: i64,
    pub perfect_defense: i64,
    pub high_interception: i64,
    pub total: i64,
}

/// Per-wave statistics kept by the history recorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveRecord {
    pub stage: u32,
    pub intercepted: u32,
    pub ground_hits: u32,
    pub city_health_percent: f64,
    pub bonus: WaveBonus,
    /// Money awarded when the next stage started (base + bonus).
    pub payout: i64,
    pub early_start: bool,
}

/// End-of-run record, produced exactly once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub stage_reached: u32,
    pub intercepted: u32,
    pub ground_hits: u32,
    pub final_city_health: f64,
    pub difficulty: Difficulty,
    pub total_stages: Option<u32>,
    pub wave_duration_secs: f64,
    pub cooldown_secs: f64,
    pub final_money: i64,
    /// Simulation seconds from start to end.
    pub duration_secs: f64,
    pub score: u64,
    pub waves: Vec<WaveRecord>,
}

impl RunSummary {
    /// Fraction of resolved enemy missiles that were intercepted (0 when none resolved).
    pub fn interception_rate(&self) -> f64 {
        let total = self.intercepted + self.ground_hits;
        if total == 0 {
            0.0
        } else {
            self.intercepted as f64 / total as f64
        }
    }
}
