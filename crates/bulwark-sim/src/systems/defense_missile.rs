//! Defense missile flight and interception.
//!
//! Arc phase follows a quadratic Bezier from the launcher to the target's
//! live position; chase phase flies straight at it. A missile within
//! `INTERCEPT_RADIUS` of any enemy destroys it. Missiles that reach their aim
//! point, or drop to the floor while chasing, are removed without scoring.

use glam::DVec3;
use hecs::{Entity, World};
use tracing::debug;

use bulwark_core::components::{DefenseMissile, EnemyMissile};
use bulwark_core::constants::*;
use bulwark_core::effects;
use bulwark_core::enums::DefensePhase;
use bulwark_core::events::SimEvent;
use bulwark_core::types::{quadratic_bezier, Position};

use crate::economy;
use crate::entities::{entity_of, ordered};
use crate::state::SimulationState;

/// What happened to a defense missile this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Flight {
    Flying,
    Hit(Entity, Position),
    Spent,
}

pub fn run(
    world: &mut World,
    state: &mut SimulationState,
    events: &mut Vec<SimEvent>,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();

    let mut enemies: Vec<(Entity, Position)> = ordered::<EnemyMissile>(world)
        .into_iter()
        .filter_map(|e| world.get::<&Position>(e).ok().map(|p| (e, *p)))
        .collect();

    for missile in ordered::<DefenseMissile>(world) {
        let target_pos = live_target(world, missile);
        let flight = {
            let (Ok(mut dm), Ok(mut pos)) = (
                world.get::<&mut DefenseMissile>(missile),
                world.get::<&mut Position>(missile),
            ) else {
                continue;
            };
            match target_pos {
                Some(p) => dm.target_point = p,
                None => dm.target_enemy = None,
            }
            *pos = step(&mut dm, *pos);

            match enemies
                .iter()
                .position(|(_, enemy_pos)| pos.range_to(enemy_pos) < INTERCEPT_RADIUS)
            {
                Some(index) => {
                    let (enemy, enemy_pos) = enemies.remove(index);
                    Flight::Hit(enemy, enemy_pos)
                }
                None => {
                    let floored = dm.phase == DefensePhase::Chase && pos.y <= dm.min_altitude;
                    let arrived = pos.range_to(&dm.target_point) < DEFENSE_ARRIVAL_RADIUS;
                    if floored || arrived {
                        Flight::Spent
                    } else {
                        Flight::Flying
                    }
                }
            }
        };

        match flight {
            Flight::Flying => {}
            Flight::Hit(enemy, position) => {
                let bonus = economy::record_interception(state);
                debug!(streak = state.streak, bonus, "Enemy missile intercepted");
                events.push(SimEvent::Intercepted {
                    position,
                    bonus,
                    streak: state.streak,
                    effect: effects::interception(),
                });
                despawn_buffer.push(enemy);
                despawn_buffer.push(missile);
            }
            Flight::Spent => despawn_buffer.push(missile),
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Current position of the missile's target, if it still exists.
fn live_target(world: &World, missile: Entity) -> Option<Position> {
    let target = world.get::<&DefenseMissile>(missile).ok()?.target_enemy?;
    let enemy = entity_of(target)?;
    world.get::<&EnemyMissile>(enemy).ok()?;
    world.get::<&Position>(enemy).ok().map(|p| *p)
}

/// Advance one tick along the current phase. Returns the new position.
pub fn step(dm: &mut DefenseMissile, pos: Position) -> Position {
    match dm.phase {
        DefensePhase::Arc => {
            dm.arc_progress += 1;
            let t = (dm.arc_progress as f64 / dm.arc_duration).min(1.0);
            let next = quadratic_bezier(
                dm.launch_point.to_vec(),
                dm.control_point.to_vec(),
                dm.target_point.to_vec(),
                t,
            );
            if dm.arc_progress as f64 >= dm.arc_duration {
                dm.phase = DefensePhase::Chase;
            }
            Position::from_vec(next)
        }
        DefensePhase::Chase => {
            let to_target: DVec3 = dm.target_point.to_vec() - pos.to_vec();
            let distance = to_target.length();
            if distance <= dm.speed {
                dm.target_point
            } else {
                Position::from_vec(pos.to_vec() + to_target / distance * dm.speed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_setup::defense_arc;
    use bulwark_core::types::EntityId;

    #[test]
    fn arc_ends_at_target_then_chases() {
        let mut dm = defense_arc(EntityId(1), Position::new(0.0, 0.0, 0.0), Position::new(10.0, 20.0, 0.0));
        let mut pos = dm.launch_point;
        let ticks = dm.arc_duration as u32;
        for _ in 0..ticks {
            pos = step(&mut dm, pos);
        }
        assert_eq!(dm.phase, DefensePhase::Chase);
        assert!(pos.range_to(&dm.target_point) < 1e-9);
    }

    #[test]
    fn chase_moves_at_fixed_speed() {
        let mut dm = defense_arc(EntityId(1), Position::new(0.0, 0.0, 0.0), Position::new(10.0, 20.0, 0.0));
        dm.phase = DefensePhase::Chase;
        dm.target_point = Position::new(0.0, 10.0, 0.0);
        let pos = step(&mut dm, Position::new(0.0, 5.0, 0.0));
        assert!((pos.y - (5.0 + dm.speed)).abs() < 1e-12);
    }

    #[test]
    fn chase_does_not_overshoot() {
        let mut dm = defense_arc(EntityId(1), Position::new(0.0, 0.0, 0.0), Position::new(10.0, 20.0, 0.0));
        dm.phase = DefensePhase::Chase;
        dm.target_point = Position::new(0.0, 5.1, 0.0);
        let pos = step(&mut dm, Position::new(0.0, 5.0, 0.0));
        assert_eq!(pos, dm.target_point);
    }
}
