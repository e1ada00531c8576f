//! Snapshot builder: reads the ECS world and run state into a `GameSnapshot`.

use std::collections::HashSet;

use hecs::World;

use bulwark_core::components::*;
use bulwark_core::events::SimEvent;
use bulwark_core::state::*;
use bulwark_core::types::{EntityId, Position, SimTime, Velocity};

use crate::entities::{id_of, ordered};
use crate::state::SimulationState;
use crate::systems::factory::delivery_position;
use crate::upgrades::UpgradeLevels;

/// Build a complete snapshot. Entity lists are in spawn order.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    state: &SimulationState,
    upgrades: &UpgradeLevels,
    events: Vec<SimEvent>,
) -> GameSnapshot {
    GameSnapshot {
        time: *time,
        phase: state.phase,
        paused: state.paused,
        difficulty: state.difficulty,
        stage: state.stage,
        game_timer: state.game_timer,
        cooldown_timer: state.cooldown_timer,
        stats: StatsView {
            money: state.money,
            intercepted: state.intercepted,
            ground_hits: state.ground_hits,
            streak: state.streak,
            city_health_percent: state.city_health_percent,
        },
        city: CityView {
            initial_height: state.city.initial_height,
            remaining_height: state.city.remaining_height(),
            initial_buildings: state.city.initial_count,
            destroyed_buildings: state.city.destroyed_count,
            high: state.city.high,
            mid: state.city.mid,
            low: state.city.low,
        },
        launchers: build_launchers(world),
        factories: build_factories(world),
        enemy_missiles: build_enemy_missiles(world),
        defense_missiles: build_defense_missiles(world),
        buildings: build_buildings(world),
        upgrades: upgrades.views(),
        events,
    }
}

fn build_launchers(world: &World) -> Vec<LauncherView> {
    ordered::<Launcher>(world)
        .into_iter()
        .filter_map(|e| {
            let launcher = world.get::<&Launcher>(e).ok()?;
            let pos = world.get::<&Position>(e).ok()?;
            let health = world.get::<&Health>(e).ok()?;
            Some(LauncherView {
                id: id_of(e),
                position: *pos,
                health: health.current,
                max_health: health.max,
                missiles: launcher.missiles,
                max_missiles: launcher.max_missiles,
                range: launcher.range,
            })
        })
        .collect()
}

fn build_factories(world: &World) -> Vec<FactoryView> {
    ordered::<Factory>(world)
        .into_iter()
        .filter_map(|e| {
            let factory = world.get::<&Factory>(e).ok()?;
            let pos = world.get::<&Position>(e).ok()?;
            let health = world.get::<&Health>(e).ok()?;
            Some(FactoryView {
                id: id_of(e),
                position: *pos,
                health: health.current,
                max_health: health.max,
                missiles: factory.missiles,
                max_missiles: factory.max_missiles,
                production_interval_ms: factory.production_interval_ms,
                is_distributing: factory.delivery.is_some(),
                delivery_position: factory.delivery.as_ref().and_then(delivery_position),
            })
        })
        .collect()
}

fn build_enemy_missiles(world: &World) -> Vec<EnemyMissileView> {
    let engaged: HashSet<EntityId> = world
        .query::<&DefenseMissile>()
        .iter()
        .filter_map(|(_, dm)| dm.target_enemy)
        .collect();

    ordered::<EnemyMissile>(world)
        .into_iter()
        .filter_map(|e| {
            let enemy = world.get::<&EnemyMissile>(e).ok()?;
            let pos = world.get::<&Position>(e).ok()?;
            let vel = world.get::<&Velocity>(e).ok()?;
            Some(EnemyMissileView {
                id: id_of(e),
                kind: enemy.kind,
                position: *pos,
                velocity: *vel,
                color: enemy.color,
                engaged: engaged.contains(&id_of(e)),
            })
        })
        .collect()
}

fn build_defense_missiles(world: &World) -> Vec<DefenseMissileView> {
    ordered::<DefenseMissile>(world)
        .into_iter()
        .filter_map(|e| {
            let dm = world.get::<&DefenseMissile>(e).ok()?;
            let pos = world.get::<&Position>(e).ok()?;
            Some(DefenseMissileView {
                id: id_of(e),
                position: *pos,
                phase: dm.phase,
                target_enemy: dm.target_enemy,
                launcher: dm.launcher,
            })
        })
        .collect()
}

fn build_buildings(world: &World) -> Vec<BuildingView> {
    ordered::<Building>(world)
        .into_iter()
        .filter_map(|e| {
            let building = world.get::<&Building>(e).ok()?;
            if building.collapsed {
                return None;
            }
            let pos = world.get::<&Position>(e).ok()?;
            let health = world.get::<&Health>(e).ok()?;
            Some(BuildingView {
                id: id_of(e),
                position: *pos,
                category: building.category,
                width: building.width,
                height: building.height,
                depth: building.depth,
                health: health.current,
                max_health: health.max,
            })
        })
        .collect()
}
