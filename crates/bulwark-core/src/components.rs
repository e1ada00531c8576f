//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, Position};

/// Hit points shared by every destructible entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

/// Monotonic spawn counter. Systems that scan "in order" sort by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpawnOrder(pub u64);

/// A static city building. Position is the centre of its box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub category: BuildingCategory,
    pub height: f64,
    pub width: f64,
    pub depth: f64,
    pub volume: f64,
    /// Fraction of incoming damage ignored (city armor upgrade).
    pub armor: f64,
    /// Set once when health first reaches zero. Collapsed buildings are
    /// removed at the end of the tick and never counted again.
    pub collapsed: bool,
}

/// Stationary missile launcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Launcher {
    /// Current stock, always within 0..=max_missiles.
    pub missiles: u32,
    pub max_missiles: u32,
    /// Detection radius (3D distance).
    pub range: f64,
}

/// Stationary factory that builds missiles and ships them to launchers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Factory {
    /// Produced stock, always within 0..=max_missiles.
    pub missiles: u32,
    pub max_missiles: u32,
    /// Milliseconds of simulation time per produced missile.
    pub production_interval_ms: f64,
    /// Simulation time (ms) of the last production.
    pub last_production_ms: f64,
    /// Round-robin cursor into the launcher list.
    pub last_delivered_index: usize,
    /// The single outbound delivery, if any. A factory is "distributing"
    /// exactly when this is `Some`.
    pub delivery: Option<Delivery>,
    /// Set after a delivery was refused for lack of funds, so the refusal is
    /// reported once rather than every tick.
    pub delivery_blocked: bool,
}

/// One missile moving along the grid from a factory to a launcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub launcher: EntityId,
    /// Grid cells to traverse, ending at the launcher.
    pub path: Vec<Position>,
    pub state: DeliveryState,
}

/// Delivery progress, advanced once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeliveryState {
    /// Travelling toward `path[path_index]`; `step_ticks` ticks spent on this cell.
    Enroute { path_index: usize, step_ticks: u32 },
    /// Reached the launcher; stock is handed over this tick.
    Arrived,
}

/// Ballistic enemy missile. Carries a `Velocity` component alongside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyMissile {
    pub kind: MissileType,
    /// Ground point the trajectory was solved for.
    pub target: Position,
    /// Downward acceleration per tick.
    pub gravity: f64,
    pub base_speed: f64,
    /// Ticks from spawn to target under the solved trajectory.
    pub flight_time: f64,
    pub explosion_radius: f64,
    pub damage_amount: f64,
    pub color: u32,
}

/// Interceptor launched at a single enemy missile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefenseMissile {
    /// The enemy this missile was fired at. Cleared when that enemy is gone.
    pub target_enemy: Option<EntityId>,
    /// Last known position of the target; also the termination point.
    pub target_point: Position,
    pub launch_point: Position,
    /// Bezier control point for the arc phase.
    pub control_point: Position,
    /// Chase speed (units per tick).
    pub speed: f64,
    pub phase: DefensePhase,
    pub arc_progress: u32,
    /// Length of the arc phase in ticks.
    pub arc_duration: f64,
    pub min_altitude: f64,
    /// Launcher that fired this missile.
    pub launcher: EntityId,
}
