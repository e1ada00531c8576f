//! Damage rules shared by buildings and structures.
//!
//! Health only ever goes down and destruction is reported exactly once: a
//! second hit on something already at zero is ignored.

use hecs::{Entity, World};
use tracing::debug;

use bulwark_core::components::{Building, Health, Launcher};
use bulwark_core::effects;
use bulwark_core::events::SimEvent;
use bulwark_core::types::Position;

use crate::entities::{id_of, ordered};
use crate::state::SimulationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Damaged,
    /// Health reached zero with this hit.
    Destroyed,
    /// Already destroyed; nothing changed.
    Ignored,
}

/// Base policy: subtract, clamp at zero, report the first time zero is reached.
pub fn apply(health: &mut Health, amount: f64) -> DamageOutcome {
    if health.current <= 0.0 {
        return DamageOutcome::Ignored;
    }
    health.current = (health.current - amount.max(0.0)).max(0.0);
    if health.current <= 0.0 {
        DamageOutcome::Destroyed
    } else {
        DamageOutcome::Damaged
    }
}

/// Damage a building after armor. Collapses it (once) when health hits zero.
pub fn damage_building(
    world: &World,
    entity: Entity,
    amount: f64,
    state: &mut SimulationState,
    events: &mut Vec<SimEvent>,
) -> DamageOutcome {
    let (Ok(mut building), Ok(mut health), Ok(position)) = (
        world.get::<&mut Building>(entity),
        world.get::<&mut Health>(entity),
        world.get::<&Position>(entity),
    ) else {
        return DamageOutcome::Ignored;
    };
    if building.collapsed {
        return DamageOutcome::Ignored;
    }

    let outcome = apply(&mut health, amount * (1.0 - building.armor));
    if outcome == DamageOutcome::Destroyed {
        building.collapsed = true;
        state.city.record_collapse(building.category, building.height);
        debug!(
            category = ?building.category,
            height = building.height,
            "Building collapsed"
        );
        events.push(SimEvent::BuildingCollapsed {
            building: id_of(entity),
            category: building.category,
            height: building.height,
            position: *position,
            effect: effects::collapse(),
        });
    }
    outcome
}

/// Damage a launcher. Destroyed launchers are removed by the cleanup system.
pub fn damage_launcher(
    world: &World,
    entity: Entity,
    amount: f64,
    events: &mut Vec<SimEvent>,
) -> DamageOutcome {
    let Ok(mut health) = world.get::<&mut Health>(entity) else {
        return DamageOutcome::Ignored;
    };
    let outcome = apply(&mut health, amount);
    if outcome == DamageOutcome::Destroyed {
        debug!(launcher = ?id_of(entity), "Launcher destroyed");
        events.push(SimEvent::LauncherDestroyed {
            launcher: id_of(entity),
        });
    }
    outcome
}

/// Linear falloff: full damage at the centre, none at the radius.
pub fn falloff(damage: f64, distance: f64, radius: f64) -> f64 {
    damage * (1.0 - distance / radius)
}

/// Blast damage to every building and launcher strictly inside `radius`.
/// Building distance is measured to the building's centre.
pub fn blast(
    world: &World,
    center: Position,
    radius: f64,
    damage: f64,
    state: &mut SimulationState,
    events: &mut Vec<SimEvent>,
) {
    for entity in ordered::<Building>(world) {
        let distance = match world.get::<&Position>(entity) {
            Ok(pos) => pos.range_to(&center),
            Err(_) => continue,
        };
        if distance < radius {
            damage_building(world, entity, falloff(damage, distance, radius), state, events);
        }
    }

    for entity in ordered::<Launcher>(world) {
        let distance = match world.get::<&Position>(entity) {
            Ok(pos) => pos.range_to(&center),
            Err(_) => continue,
        };
        if distance < radius {
            damage_launcher(world, entity, falloff(damage, distance, radius), events);
        }
    }
}
