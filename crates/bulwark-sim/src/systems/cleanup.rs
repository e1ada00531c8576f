//! Cleanup system: removes collapsed buildings and destroyed structures.
//!
//! Runs after all projectile updates, so anything destroyed this tick is
//! still visible to every system that ran before it and gone by the next tick.

use hecs::{Entity, World};

use bulwark_core::components::{Building, Factory, Health, Launcher};

/// Despawn collapsed buildings and structures at zero health.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, building) in world.query_mut::<&Building>() {
        if building.collapsed {
            despawn_buffer.push(entity);
        }
    }

    for (entity, (health, _launcher)) in world.query_mut::<(&Health, &Launcher)>() {
        if health.current <= 0.0 {
            despawn_buffer.push(entity);
        }
    }

    for (entity, (health, _factory)) in world.query_mut::<(&Health, &Factory)>() {
        if health.current <= 0.0 {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
