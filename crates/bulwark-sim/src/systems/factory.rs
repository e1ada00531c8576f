//! Factory production and missile delivery.
//!
//! A factory adds one missile to its stock every `production_interval_ms` of
//! simulation time until it is full. Whenever it has stock and no delivery in
//! flight it ships one missile (for a fee) to the next launcher in
//! round-robin order that has room. A delivery walks the placement grid one
//! cell every `DELIVERY_STEP_SECS`.

use hecs::{Entity, World};
use tracing::{debug, warn};

use bulwark_core::components::{Delivery, DeliveryState, Factory, Launcher};
use bulwark_core::constants::*;
use bulwark_core::effects;
use bulwark_core::error::{CommandError, CommandResult};
use bulwark_core::events::SimEvent;
use bulwark_core::types::{EntityId, Position};

use crate::entities::{entity_of, id_of, ordered};
use crate::placement::snap_to_grid;
use crate::state::SimulationState;

/// Ticks a delivery spends on each path cell.
pub fn delivery_step_ticks() -> u32 {
    (DELIVERY_STEP_SECS * TICK_RATE as f64).round() as u32
}

pub fn run(world: &mut World, state: &mut SimulationState, events: &mut Vec<SimEvent>, now_ms: f64, tick: u64) {
    let launchers = ordered::<Launcher>(world);

    for factory in ordered::<Factory>(world) {
        let factory_id = id_of(factory);
        let (Ok(mut f), Ok(origin)) = (
            world.get::<&mut Factory>(factory),
            world.get::<&Position>(factory),
        ) else {
            continue;
        };

        // 1. Production
        if f.missiles < f.max_missiles && now_ms - f.last_production_ms > f.production_interval_ms {
            f.missiles += 1;
            f.last_production_ms = now_ms;
            events.push(SimEvent::MissileProduced {
                factory: factory_id,
                stock: f.missiles,
                effect: effects::production(),
            });
        }

        // 2. Advance the delivery in flight
        advance_delivery(world, &mut f, factory_id, events);

        // 3. Ship the next missile
        if f.missiles == 0 || f.delivery.is_some() || launchers.is_empty() {
            continue;
        }
        let Some((index, launcher)) = next_launcher(world, &launchers, f.last_delivered_index) else {
            continue;
        };
        f.last_delivered_index = index;
        let Ok(destination) = world.get::<&Position>(launcher).map(|p| *p) else {
            continue;
        };
        let path = grid_path(*origin, destination);
        // Refusals are reported inside; the factory retries next tick.
        if let Err(err) = begin_delivery(&mut f, factory_id, id_of(launcher), path, state, events, tick) {
            debug!(factory = ?factory_id, %err, "Delivery not started");
        }
    }
}

/// First launcher with room, scanning round-robin after `last_index`.
fn next_launcher(world: &World, launchers: &[Entity], last_index: usize) -> Option<(usize, Entity)> {
    let n = launchers.len();
    (0..n)
        .map(|i| (last_index + 1 + i) % n)
        .find(|&index| {
            world
                .get::<&Launcher>(launchers[index])
                .map(|l| l.missiles < l.max_missiles)
                .unwrap_or(false)
        })
        .map(|index| (index, launchers[index]))
}

/// Start a delivery. This is the only place a factory becomes busy.
///
/// Fails without touching stock, money or the busy state when the factory is
/// empty or the balance cannot cover the fee.
pub fn begin_delivery(
    factory: &mut Factory,
    factory_id: EntityId,
    launcher: EntityId,
    path: Vec<Position>,
    state: &mut SimulationState,
    events: &mut Vec<SimEvent>,
    tick: u64,
) -> CommandResult<()> {
    if factory.missiles == 0 {
        return Err(CommandError::OutOfMissiles);
    }
    let cost = state.rules.delivery_cost;
    if state.money < cost {
        if !factory.delivery_blocked {
            factory.delivery_blocked = true;
            warn!(needed = cost, available = state.money, "Delivery refused");
            events.push(SimEvent::message(
                format!("Not enough money for missile delivery! ${cost} needed"),
                3000,
                tick,
            ));
        }
        return Err(CommandError::InsufficientFunds {
            needed: cost,
            available: state.money,
        });
    }

    state.money -= cost;
    factory.missiles -= 1;
    factory.delivery_blocked = false;
    factory.delivery = Some(Delivery {
        launcher,
        path,
        state: DeliveryState::Enroute {
            path_index: 0,
            step_ticks: 0,
        },
    });
    debug!(factory = ?factory_id, launcher = ?launcher, "Delivery started");
    events.push(SimEvent::DeliveryStarted {
        factory: factory_id,
        launcher,
    });
    Ok(())
}

/// Abort the delivery in flight, returning its missile to stock.
/// The fee is not refunded. Returns false when nothing was in flight.
pub fn cancel_delivery(factory: &mut Factory) -> bool {
    if factory.delivery.take().is_none() {
        return false;
    }
    factory.missiles = (factory.missiles + 1).min(factory.max_missiles);
    true
}

/// Step the delivery state machine once.
fn advance_delivery(world: &World, factory: &mut Factory, factory_id: EntityId, events: &mut Vec<SimEvent>) {
    let Some(delivery) = factory.delivery.as_mut() else {
        return;
    };
    let launcher = entity_of(delivery.launcher).filter(|&e| world.get::<&Launcher>(e).is_ok());
    let Some(launcher) = launcher else {
        debug!(factory = ?factory_id, "Delivery target lost");
        cancel_delivery(factory);
        events.push(SimEvent::DeliveryCancelled {
            factory: factory_id,
        });
        return;
    };

    if let DeliveryState::Enroute {
        path_index,
        step_ticks,
    } = &mut delivery.state
    {
        *step_ticks += 1;
        if *step_ticks >= delivery_step_ticks() {
            *step_ticks = 0;
            *path_index += 1;
        }
        if *path_index >= delivery.path.len() {
            delivery.state = DeliveryState::Arrived;
        }
    }

    if delivery.state == DeliveryState::Arrived {
        if let Ok(mut l) = world.get::<&mut Launcher>(launcher) {
            l.missiles = (l.missiles + 1).min(l.max_missiles);
        }
        events.push(SimEvent::DeliveryCompleted {
            factory: factory_id,
            launcher: delivery.launcher,
            effect: effects::delivery(),
        });
        factory.delivery = None;
    }
}

/// Cell the delivery currently occupies.
pub fn delivery_position(delivery: &Delivery) -> Option<Position> {
    match delivery.state {
        DeliveryState::Enroute { path_index, .. } => delivery
            .path
            .get(path_index.min(delivery.path.len().saturating_sub(1)))
            .copied(),
        DeliveryState::Arrived => delivery.path.last().copied(),
    }
}

/// Grid cells from `from` to `to`, both included, one step per cell along the
/// dominant axis.
pub fn grid_path(from: Position, to: Position) -> Vec<Position> {
    let start = snap_to_grid(from);
    let end = snap_to_grid(to);
    let dx = end.x - start.x;
    let dz = end.z - start.z;
    let steps = (dx.abs().max(dz.abs()) / GRID_STEP).ceil() as usize;

    let mut path = Vec::with_capacity(steps + 1);
    path.push(start);
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let cell = snap_to_grid(Position::new(start.x + dx * t, 0.0, start.z + dz * t));
        if path.last() != Some(&cell) {
            path.push(cell);
        }
    }
    if path.last() != Some(&end) {
        path.push(end);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_path_visits_every_cell() {
        let path = grid_path(Position::new(0.0, 0.0, 0.0), Position::new(8.0, 0.0, 0.0));
        let xs: Vec<f64> = path.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn diagonal_path_moves_both_axes() {
        let path = grid_path(Position::new(0.0, 0.0, 0.0), Position::new(6.0, 0.0, -6.0));
        assert_eq!(path.len(), 4);
        assert_eq!(path[3], Position::new(6.0, 0.0, -6.0));
        for pair in path.windows(2) {
            assert!((pair[1].x - pair[0].x).abs() <= GRID_STEP);
            assert!((pair[1].z - pair[0].z).abs() <= GRID_STEP);
        }
    }

    #[test]
    fn same_cell_path_is_one_cell() {
        let p = Position::new(4.0, 0.0, 4.0);
        assert_eq!(grid_path(p, p), vec![p]);
    }

    #[test]
    fn step_is_nine_ticks() {
        assert_eq!(delivery_step_ticks(), 9);
    }

    #[test]
    fn cancel_returns_stock_without_exceeding_cap() {
        let mut factory = Factory {
            missiles: 12,
            max_missiles: 12,
            production_interval_ms: 3000.0,
            last_production_ms: 0.0,
            last_delivered_index: 0,
            delivery: Some(Delivery {
                launcher: EntityId(1),
                path: vec![Position::default()],
                state: DeliveryState::Enroute {
                    path_index: 0,
                    step_ticks: 0,
                },
            }),
            delivery_blocked: false,
        };
        assert!(cancel_delivery(&mut factory));
        assert_eq!(factory.missiles, 12);
        assert!(factory.delivery.is_none());
        assert!(!cancel_delivery(&mut factory));
    }
}
