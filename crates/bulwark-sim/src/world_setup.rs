//! Entity spawn factories for setting up the simulation world.
//!
//! Builds the procedural city, player structures and both kinds of missile
//! with their component bundles. Every spawned entity carries a `SpawnOrder`.

use glam::DVec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use bulwark_core::components::*;
use bulwark_core::config::{missile_profile, DifficultySettings};
use bulwark_core::constants::*;
use bulwark_core::enums::*;
use bulwark_core::types::{EntityId, Position, Velocity};

use crate::state::{CityTally, SimulationState};
use crate::upgrades::UpgradeLevels;

/// Generate the city on a jittered lot grid. Returns the tally of what was built.
///
/// Lots closer to the centre get taller buildings (downtown effect). Each lot
/// picks a style (tower, mid-rise, low-rise) that sets its height and
/// footprint ranges; the category is then assigned from the final height.
pub fn generate_city(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    state: &mut SimulationState,
    armor: f64,
) -> CityTally {
    let mut tally = CityTally::default();

    for x in (-CITY_HALF_EXTENT..=CITY_HALF_EXTENT).step_by(CITY_LOT_SPACING) {
        for z in (-CITY_HALF_EXTENT..=CITY_HALF_EXTENT).step_by(CITY_LOT_SPACING) {
            if rng.gen::<f64>() >= CITY_LOT_OCCUPANCY {
                continue;
            }
            let (x, z) = (x as f64, z as f64);
            let distance = (x * x + z * z).sqrt();
            let multiplier = (1.0 - distance / CITY_DOWNTOWN_FALLOFF).max(CITY_MIN_HEIGHT_FACTOR);

            let style: f64 = rng.gen();
            let (height, width, depth) = if style < 0.3 {
                (
                    rng.gen_range(8.0..23.0) * multiplier,
                    rng.gen_range(1.2..2.0),
                    rng.gen_range(1.2..2.0),
                )
            } else if style < 0.6 {
                (
                    rng.gen_range(4.0..12.0) * multiplier,
                    rng.gen_range(1.5..2.7),
                    rng.gen_range(1.5..2.7),
                )
            } else {
                (
                    rng.gen_range(2.0..6.0) * multiplier,
                    rng.gen_range(1.8..3.3),
                    rng.gen_range(1.8..3.3),
                )
            };

            let half_jitter = CITY_LOT_JITTER / 2.0;
            let lot = Position::new(
                x + rng.gen_range(-half_jitter..half_jitter),
                0.0,
                z + rng.gen_range(-half_jitter..half_jitter),
            );
            let order = state.next_order();
            spawn_building(world, order, lot, width, height, depth, armor);
            tally.record_building(building_category(height), height);
        }
    }

    info!(
        buildings = tally.initial_count,
        high = tally.high.initial,
        mid = tally.mid.initial,
        low = tally.low.initial,
        total_height = tally.initial_height,
        "City generated"
    );
    tally
}

/// Height class of a building.
pub fn building_category(height: f64) -> BuildingCategory {
    if height >= HIGH_BUILDING_THRESHOLD {
        BuildingCategory::High
    } else if height >= MID_BUILDING_THRESHOLD {
        BuildingCategory::Mid
    } else {
        BuildingCategory::Low
    }
}

/// Spawn one building standing on `lot` (a ground point).
pub fn spawn_building(
    world: &mut World,
    order: SpawnOrder,
    lot: Position,
    width: f64,
    height: f64,
    depth: f64,
    armor: f64,
) -> Entity {
    let max_health = height * BUILDING_HEALTH_PER_HEIGHT;
    world.spawn((
        Building {
            category: building_category(height),
            height,
            width,
            depth,
            volume: width * height * depth,
            armor,
            collapsed: false,
        },
        Position::new(lot.x, height / 2.0, lot.z),
        Health {
            current: max_health,
            max: max_health,
        },
        order,
    ))
}

/// Spawn a launcher with stats derived from the current upgrades. Starts full.
pub fn spawn_launcher(
    world: &mut World,
    order: SpawnOrder,
    position: Position,
    levels: &UpgradeLevels,
    difficulty: Difficulty,
) -> Entity {
    let capacity = levels.launcher_capacity();
    world.spawn((
        Launcher {
            missiles: capacity,
            max_missiles: capacity,
            range: levels.launcher_range(difficulty),
        },
        position,
        Health {
            current: LAUNCHER_MAX_HEALTH,
            max: LAUNCHER_MAX_HEALTH,
        },
        order,
    ))
}

/// Spawn a factory with stats derived from the current upgrades.
/// Its production clock starts at `now_ms`.
pub fn spawn_factory(
    world: &mut World,
    order: SpawnOrder,
    position: Position,
    levels: &UpgradeLevels,
    now_ms: f64,
) -> Entity {
    world.spawn((
        Factory {
            missiles: 0,
            max_missiles: levels.factory_capacity(),
            production_interval_ms: levels.factory_production_ms(),
            last_production_ms: now_ms,
            last_delivered_index: 0,
            delivery: None,
            delivery_blocked: false,
        },
        position,
        Health {
            current: FACTORY_MAX_HEALTH,
            max: FACTORY_MAX_HEALTH,
        },
        order,
    ))
}

/// Enemy base speed for a type at a stage under the given difficulty.
pub fn enemy_base_speed(kind: MissileType, stage: u32, settings: &DifficultySettings) -> f64 {
    (missile_profile(kind).base_speed + stage as f64 * STAGE_SPEED_INCREMENT)
        * settings.missile_speed_multiplier
}

/// Solve the ballistic launch velocity from `start` to `target`.
/// Returns (velocity per tick, flight time in ticks).
pub fn enemy_trajectory(start: Position, target: Position, base_speed: f64) -> (Velocity, f64) {
    let flight_time = FLIGHT_TIME_NUMERATOR / (base_speed * BASE_SPEED_SCALE);
    let horizontal = DVec3::new(target.x - start.x, 0.0, target.z - start.z);
    let horizontal_speed = horizontal.length() / flight_time;
    let direction = horizontal.normalize_or_zero();
    let vy = (target.y - start.y + 0.5 * ENEMY_GRAVITY * flight_time * flight_time) / flight_time;
    let velocity = Velocity::new(
        direction.x * horizontal_speed,
        vy,
        direction.z * horizontal_speed,
    );
    (velocity, flight_time)
}

/// Spawn an enemy missile on the spawn ring, aimed at a random point in the city.
pub fn spawn_enemy_missile(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    order: SpawnOrder,
    kind: MissileType,
    stage: u32,
    settings: &DifficultySettings,
) -> Entity {
    let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    let start = Position::new(
        angle.cos() * ENEMY_SPAWN_RADIUS,
        ENEMY_SPAWN_ALTITUDE_MIN + rng.gen::<f64>() * ENEMY_SPAWN_ALTITUDE_SPREAD,
        angle.sin() * ENEMY_SPAWN_RADIUS,
    );

    // Sum of two uniforms biases aim toward the centre.
    let half = ENEMY_TARGET_AREA / 2.0;
    let tx = (rng.gen::<f64>() + rng.gen::<f64>()) / 2.0 * ENEMY_TARGET_AREA - half;
    let tz = (rng.gen::<f64>() + rng.gen::<f64>()) / 2.0 * ENEMY_TARGET_AREA - half;
    let target = Position::new(tx, 0.0, tz);

    spawn_enemy_missile_at(world, order, kind, start, target, stage, settings)
}

/// Spawn an enemy missile with a fixed start and target.
pub fn spawn_enemy_missile_at(
    world: &mut World,
    order: SpawnOrder,
    kind: MissileType,
    start: Position,
    target: Position,
    stage: u32,
    settings: &DifficultySettings,
) -> Entity {
    let profile = missile_profile(kind);
    let base_speed = enemy_base_speed(kind, stage, settings);
    let (velocity, flight_time) = enemy_trajectory(start, target, base_speed);

    debug!(?kind, x = start.x, z = start.z, flight_time, "Enemy missile spawned");

    world.spawn((
        EnemyMissile {
            kind,
            target,
            gravity: ENEMY_GRAVITY,
            base_speed,
            flight_time,
            explosion_radius: profile.explosion_radius,
            damage_amount: profile.damage_amount,
            color: profile.color,
        },
        start,
        velocity,
        order,
    ))
}

/// Arc-phase parameters for a defense missile from `launch` toward `target`.
pub fn defense_arc(launcher: EntityId, launch: Position, target: Position) -> DefenseMissile {
    let horizontal = DVec3::new(target.x - launch.x, 0.0, target.z - launch.z);
    let distance = horizontal.length();
    let direction = horizontal.normalize_or_zero();
    let perpendicular = DVec3::new(-direction.z, 0.0, direction.x);

    let midpoint = DVec3::new((launch.x + target.x) / 2.0, 0.0, (launch.z + target.z) / 2.0);
    let mut control = midpoint + perpendicular * (distance * DEFENSE_ARC_LATERAL);
    control.y = launch.y.max(target.y) + distance * DEFENSE_ARC_LIFT;

    DefenseMissile {
        target_enemy: None,
        target_point: target,
        launch_point: launch,
        control_point: Position::from_vec(control),
        speed: (DEFENSE_BASE_SPEED + distance * DEFENSE_SPEED_PER_UNIT).min(DEFENSE_MAX_SPEED),
        phase: DefensePhase::Arc,
        arc_progress: 0,
        arc_duration: DEFENSE_ARC_MIN_TICKS.max(distance * DEFENSE_ARC_TICKS_PER_UNIT),
        min_altitude: DEFENSE_MIN_ALTITUDE,
        launcher,
    }
}

/// Spawn a defense missile at the launcher, engaging `target_enemy`.
pub fn spawn_defense_missile(
    world: &mut World,
    order: SpawnOrder,
    launcher: EntityId,
    launch: Position,
    target_enemy: EntityId,
    target: Position,
) -> Entity {
    let missile = DefenseMissile {
        target_enemy: Some(target_enemy),
        ..defense_arc(launcher, launch, target)
    };
    world.spawn((missile, launch, order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn city_is_deterministic_per_seed() {
        let build = |seed| {
            let mut world = World::new();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut state = SimulationState::new(Default::default(), Difficulty::Normal);
            generate_city(&mut world, &mut rng, &mut state, 0.0)
        };
        assert_eq!(build(7), build(7));
        let city = build(7);
        // 16 x 16 lots at 75% occupancy
        assert!(city.initial_count > 120 && city.initial_count < 256);
        assert_eq!(
            city.high.initial + city.mid.initial + city.low.initial,
            city.initial_count
        );
    }

    #[test]
    fn buildings_sit_on_the_ground() {
        let mut world = World::new();
        let e = spawn_building(
            &mut world,
            SpawnOrder(0),
            Position::new(2.0, 0.0, 2.0),
            2.0,
            10.0,
            2.0,
            0.0,
        );
        let pos = *world.get::<&Position>(e).unwrap();
        let health = *world.get::<&Health>(e).unwrap();
        assert_eq!(pos.y, 5.0);
        assert_eq!(health.max, 100.0);
        assert_eq!(world.get::<&Building>(e).unwrap().category, BuildingCategory::Mid);
    }

    #[test]
    fn trajectory_lands_near_target() {
        let start = Position::new(128.0, 55.0, 0.0);
        let target = Position::new(-5.0, 0.0, 10.0);
        let (velocity, flight_time) = enemy_trajectory(start, target, 0.0001);
        assert!((flight_time - 500.0).abs() < 1e-9);

        let mut pos = start.to_vec();
        let mut vel = velocity.to_vec();
        for _ in 0..flight_time as usize {
            vel.y -= ENEMY_GRAVITY;
            pos += vel;
        }
        // Per-tick integration lands within half a tick of the target.
        assert!((pos.x - target.x).abs() < 1e-6);
        assert!((pos.z - target.z).abs() < 1e-6);
        assert!(pos.y.abs() < ENEMY_GRAVITY * flight_time);
    }

    #[test]
    fn arc_rises_above_both_endpoints() {
        let arc = defense_arc(EntityId(1), Position::new(0.0, 0.0, 0.0), Position::new(20.0, 30.0, 0.0));
        assert!((arc.control_point.y - (30.0 + 16.0)).abs() < 1e-9);
        assert!((arc.control_point.x - 10.0).abs() < 1e-9);
        assert!((arc.control_point.z - 6.0).abs() < 1e-9);
        assert_eq!(arc.arc_duration, 40.0);
        assert!((arc.speed - 0.35).abs() < 1e-9);
    }

    #[test]
    fn vertical_launch_has_finite_arc() {
        let arc = defense_arc(EntityId(1), Position::new(4.0, 0.0, 4.0), Position::new(4.0, 20.0, 4.0));
        assert!(arc.control_point.x.is_finite() && arc.control_point.z.is_finite());
        assert_eq!(arc.arc_duration, DEFENSE_ARC_MIN_TICKS);
        assert_eq!(arc.speed, DEFENSE_BASE_SPEED);
    }
}
