//! Fire control: each launcher engages at most one new enemy missile per tick.
//!
//! Launchers are scanned oldest first, enemies likewise. A launcher fires at
//! the first enemy in range that no defense missile is already chasing.

use hecs::{Entity, World};
use tracing::debug;

use bulwark_core::components::{DefenseMissile, EnemyMissile, Launcher};
use bulwark_core::effects;
use bulwark_core::error::{CommandError, CommandResult};
use bulwark_core::events::SimEvent;
use bulwark_core::types::{EntityId, Position};

use crate::entities::{id_of, ordered};
use crate::state::SimulationState;
use crate::world_setup;

/// Run fire control for every launcher with stock.
pub fn run(world: &mut World, state: &mut SimulationState, events: &mut Vec<SimEvent>) {
    let enemies: Vec<(Entity, Position)> = ordered::<EnemyMissile>(world)
        .into_iter()
        .filter_map(|e| world.get::<&Position>(e).ok().map(|p| (e, *p)))
        .collect();
    if enemies.is_empty() {
        return;
    }

    for launcher in ordered::<Launcher>(world) {
        let (origin, range, missiles) = match (
            world.get::<&Position>(launcher),
            world.get::<&Launcher>(launcher),
        ) {
            (Ok(pos), Ok(l)) => (*pos, l.range, l.missiles),
            _ => continue,
        };
        if missiles == 0 {
            continue;
        }

        for (enemy, enemy_pos) in &enemies {
            if origin.range_to(enemy_pos) >= range {
                continue;
            }
            match fire_missile(world, state, launcher, *enemy) {
                Ok(_) => {
                    events.push(SimEvent::MissileLaunched {
                        launcher: id_of(launcher),
                        target: id_of(*enemy),
                        position: origin,
                        effect: effects::launch(),
                    });
                    break;
                }
                Err(CommandError::TargetAlreadyEngaged) => continue,
                Err(_) => break,
            }
        }
    }
}

/// Whether any live defense missile is chasing `target`.
pub fn is_engaged(world: &World, target: EntityId) -> bool {
    world
        .query::<&DefenseMissile>()
        .iter()
        .any(|(_, missile)| missile.target_enemy == Some(target))
}

/// Launch one defense missile from `launcher` at `target`.
///
/// Declines without side effects when the launcher is empty or the target is
/// already engaged, so every enemy has at most one pursuer.
pub fn fire_missile(
    world: &mut World,
    state: &mut SimulationState,
    launcher: Entity,
    target: Entity,
) -> CommandResult<Entity> {
    let target_id = id_of(target);
    let target_pos = match (
        world.get::<&EnemyMissile>(target),
        world.get::<&Position>(target),
    ) {
        (Ok(_), Ok(pos)) => *pos,
        _ => return Err(CommandError::UnknownEntity(target_id)),
    };

    let origin = {
        let (Ok(mut stock), Ok(pos)) = (
            world.get::<&mut Launcher>(launcher),
            world.get::<&Position>(launcher),
        ) else {
            return Err(CommandError::UnknownEntity(id_of(launcher)));
        };
        if stock.missiles == 0 {
            return Err(CommandError::OutOfMissiles);
        }
        if is_engaged(world, target_id) {
            return Err(CommandError::TargetAlreadyEngaged);
        }
        stock.missiles -= 1;
        *pos
    };

    debug!(
        launcher = ?id_of(launcher),
        target = ?target_id,
        range = origin.range_to(&target_pos),
        "Defense missile launched"
    );

    let order = state.next_order();
    Ok(world_setup::spawn_defense_missile(
        world,
        order,
        id_of(launcher),
        origin,
        target_id,
        target_pos,
    ))
}
