//! Simulation constants and tuning parameters.
//!
//! Distances are world units (one grid cell is 2 units wide). Projectile
//! kinematics are per tick; timers are seconds of simulation time.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Upper bound on ticks run by a single `advance` call.
pub const MAX_TICKS_PER_ADVANCE: u32 = 8;

// --- World / grid ---

/// Side length of the playing field.
pub const GRID_SIZE: f64 = 64.0;

/// Width of one placement grid cell.
pub const GRID_STEP: f64 = 2.0;

/// Structures must satisfy |x| <= bound and |z| <= bound.
pub const PLACEMENT_BOUND: f64 = 30.0;

/// Minimum horizontal spacing between two structures.
pub const MIN_STRUCTURE_SPACING: f64 = 3.0;

/// Minimum horizontal spacing between a structure and a building.
pub const MIN_BUILDING_SPACING: f64 = 2.0;

// --- City generation ---

/// Building lots span -CITY_HALF_EXTENT..=CITY_HALF_EXTENT on both axes.
pub const CITY_HALF_EXTENT: i32 = 30;

/// Spacing between building lots.
pub const CITY_LOT_SPACING: usize = 4;

/// Probability a lot receives a building.
pub const CITY_LOT_OCCUPANCY: f64 = 0.75;

/// Random horizontal jitter applied to each lot (full width).
pub const CITY_LOT_JITTER: f64 = 1.5;

/// Distance at which the downtown height bonus fades out.
pub const CITY_DOWNTOWN_FALLOFF: f64 = 50.0;

/// Floor for the downtown height multiplier.
pub const CITY_MIN_HEIGHT_FACTOR: f64 = 0.3;

/// Buildings at or above this height are `High`.
pub const HIGH_BUILDING_THRESHOLD: f64 = 18.0;

/// Buildings at or above this height (and below high) are `Mid`.
pub const MID_BUILDING_THRESHOLD: f64 = 8.0;

/// Building max health per unit of height.
pub const BUILDING_HEALTH_PER_HEIGHT: f64 = 10.0;

// --- Structures ---

pub const LAUNCHER_MAX_HEALTH: f64 = 100.0;
pub const LAUNCHER_BASE_MAX_MISSILES: u32 = 6;

pub const FACTORY_MAX_HEALTH: f64 = 200.0;
pub const FACTORY_BASE_MAX_MISSILES: u32 = 12;
pub const FACTORY_BASE_PRODUCTION_MS: f64 = 3000.0;

/// Production interval never drops below this, whatever the upgrades.
pub const FACTORY_MIN_PRODUCTION_MS: f64 = 600.0;

/// Seconds a delivery spends on each grid cell of its path.
pub const DELIVERY_STEP_SECS: f64 = 0.15;

// --- Enemy missiles ---

/// Downward acceleration (units per tick squared).
pub const ENEMY_GRAVITY: f64 = 0.001;

/// Enemies spawn on a ring of this radius around the city centre.
pub const ENEMY_SPAWN_RADIUS: f64 = GRID_SIZE * 2.0;

pub const ENEMY_SPAWN_ALTITUDE_MIN: f64 = 50.0;
pub const ENEMY_SPAWN_ALTITUDE_SPREAD: f64 = 10.0;

/// Side of the square (centred on the origin) enemies aim into.
pub const ENEMY_TARGET_AREA: f64 = 60.0;

/// flight_time = FLIGHT_TIME_NUMERATOR / (base_speed * BASE_SPEED_SCALE), in ticks.
pub const FLIGHT_TIME_NUMERATOR: f64 = 5000.0;
pub const BASE_SPEED_SCALE: f64 = 100_000.0;

/// Base speed added per stage, before the difficulty multiplier.
pub const STAGE_SPEED_INCREMENT: f64 = 0.00002;

/// Damage multiplier for a direct hit on a building.
pub const DIRECT_HIT_MULTIPLIER: f64 = 2.0;

// --- Defense missiles ---

pub const DEFENSE_BASE_SPEED: f64 = 0.25;
pub const DEFENSE_SPEED_PER_UNIT: f64 = 0.005;
pub const DEFENSE_MAX_SPEED: f64 = 1.0;

/// Arc phase lasts max(ARC_MIN_TICKS, distance * ARC_TICKS_PER_UNIT) ticks.
pub const DEFENSE_ARC_MIN_TICKS: f64 = 30.0;
pub const DEFENSE_ARC_TICKS_PER_UNIT: f64 = 2.0;

/// Control point offset, as a fraction of horizontal launch distance.
pub const DEFENSE_ARC_LATERAL: f64 = 0.3;
pub const DEFENSE_ARC_LIFT: f64 = 0.8;

pub const DEFENSE_MIN_ALTITUDE: f64 = 1.0;

/// Proximity at which a defense missile destroys an enemy missile.
pub const INTERCEPT_RADIUS: f64 = 2.0;

/// Proximity at which a defense missile is considered to have reached its aim point.
pub const DEFENSE_ARRIVAL_RADIUS: f64 = 1.0;

// --- Spawning ---

pub const SPAWN_BATCH_BASE: u32 = 2;
pub const SPAWN_BATCH_MAX: u32 = 5;

// --- Economy ---

pub const INTERCEPT_BONUS: i64 = 5;
pub const STREAK_BONUS_THRESHOLD: u32 = 3;
pub const STREAK_BONUS: i64 = 5;
pub const HIGH_STREAK_BONUS_THRESHOLD: u32 = 5;
pub const HIGH_STREAK_BONUS: i64 = 10;

/// City-health tiers for the wave completion bonus: (min percent, bonus).
pub const CITY_HEALTH_BONUS_TIERS: [(f64, i64); 3] = [(90.0, 50), (75.0, 30), (50.0, 15)];

pub const PERFECT_DEFENSE_BONUS: i64 = 75;
pub const HIGH_INTERCEPTION_RATE: f64 = 0.8;
pub const HIGH_INTERCEPTION_BONUS: i64 = 25;
