//! Enemy missile ballistics and impact.
//!
//! Each tick gravity is applied to the velocity and the missile moves one
//! step. Entering a standing building's box is a direct hit (double damage to
//! that building); reaching the ground is a plain impact. Both end in a blast.

use glam::DVec3;
use hecs::{Entity, World};
use tracing::debug;

use bulwark_core::components::{Building, EnemyMissile};
use bulwark_core::constants::DIRECT_HIT_MULTIPLIER;
use bulwark_core::effects;
use bulwark_core::events::SimEvent;
use bulwark_core::types::{Aabb, Position, Velocity};

use crate::economy;
use crate::entities::ordered;
use crate::state::SimulationState;
use crate::systems::damage;

pub fn run(
    world: &mut World,
    state: &mut SimulationState,
    events: &mut Vec<SimEvent>,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();
    let buildings = ordered::<Building>(world);

    for missile in ordered::<EnemyMissile>(world) {
        let (position, enemy) = {
            let (Ok(enemy), Ok(mut pos), Ok(mut vel)) = (
                world.get::<&EnemyMissile>(missile),
                world.get::<&mut Position>(missile),
                world.get::<&mut Velocity>(missile),
            ) else {
                continue;
            };
            vel.y -= enemy.gravity;
            pos.x += vel.x;
            pos.y += vel.y;
            pos.z += vel.z;
            (*pos, enemy.clone())
        };

        let direct_hit = building_at(world, &buildings, position);
        if direct_hit.is_none() && position.y > 0.0 {
            continue;
        }

        if let Some(building) = direct_hit {
            damage::damage_building(
                world,
                building,
                enemy.damage_amount * DIRECT_HIT_MULTIPLIER,
                state,
                events,
            );
        }
        damage::blast(
            world,
            position,
            enemy.explosion_radius,
            enemy.damage_amount,
            state,
            events,
        );
        economy::record_ground_hit(state);

        debug!(
            kind = ?enemy.kind,
            x = position.x,
            z = position.z,
            direct_hit = direct_hit.is_some(),
            "Enemy missile impact"
        );
        events.push(SimEvent::Explosion {
            kind: enemy.kind,
            position,
            direct_hit: direct_hit.is_some(),
            effect: effects::ground_explosion(enemy.color, enemy.explosion_radius),
        });
        despawn_buffer.push(missile);
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Bounding box of a building: centred on its position, full width/height/depth.
pub fn building_bounds(position: &Position, building: &Building) -> Aabb {
    Aabb::from_center_size(
        position.to_vec(),
        DVec3::new(building.width, building.height, building.depth),
    )
}

/// First standing building whose box contains `point`.
fn building_at(world: &World, buildings: &[Entity], point: Position) -> Option<Entity> {
    buildings.iter().copied().find(|&entity| {
        match (world.get::<&Building>(entity), world.get::<&Position>(entity)) {
            (Ok(building), Ok(pos)) => {
                !building.collapsed && building_bounds(&pos, &building).contains(point.to_vec())
            }
            _ => false,
        }
    })
}
