//! Enemy spawner: releases batches of enemy missiles during an active wave.
//!
//! Batches grow with the stage and arrive faster, and the type mix shifts
//! from mostly A toward B and C. The live enemy count never exceeds the
//! difficulty cap.

use hecs::World;
use rand::distributions::{Distribution, WeightedIndex};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use bulwark_core::components::EnemyMissile;
use bulwark_core::config::DifficultySettings;
use bulwark_core::constants::*;
use bulwark_core::enums::{MissileType, WavePhase};

use crate::state::SimulationState;
use crate::world_setup;

const TYPES: [MissileType; 3] = [MissileType::A, MissileType::B, MissileType::C];

pub fn run(world: &mut World, state: &mut SimulationState, rng: &mut ChaCha8Rng, now_ms: f64) {
    if state.phase != WavePhase::Active || now_ms < state.next_spawn_ms {
        return;
    }

    let settings = state.settings();
    let live = world.query::<&EnemyMissile>().iter().count() as u32;
    if live >= settings.max_enemy_missiles {
        return;
    }

    let batch = batch_size(state.stage).min(settings.max_enemy_missiles - live);
    for _ in 0..batch {
        let kind = choose_type(state.stage, &settings, rng);
        let order = state.next_order();
        world_setup::spawn_enemy_missile(world, rng, order, kind, state.stage, &settings);
    }
    debug!(stage = state.stage, batch, live = live + batch, "Enemy batch spawned");

    state.next_spawn_ms = now_ms + state.rules.spawn_interval_ms / state.stage.max(1) as f64;
}

/// Missiles per batch: grows by one every two stages, capped.
pub fn batch_size(stage: u32) -> u32 {
    (SPAWN_BATCH_BASE + stage / 2).min(SPAWN_BATCH_MAX)
}

/// Relative weights of types A, B and C at a stage.
///
/// Interpolates linearly from 90/7/3 at stage 1 to 50/30/20 at stage 10 and
/// keeps going past it, floored at zero.
pub fn type_weights(stage: u32) -> [f64; 3] {
    let s = stage.max(1) as f64 - 1.0;
    [
        (90.0 - s * 40.0 / 9.0).max(0.0),
        7.0 + s * 23.0 / 9.0,
        3.0 + s * 17.0 / 9.0,
    ]
}

/// Pick a type by stage weights, leaving out types the difficulty disables.
pub fn choose_type(stage: u32, settings: &DifficultySettings, rng: &mut ChaCha8Rng) -> MissileType {
    let weights = type_weights(stage);
    let allowed: Vec<f64> = TYPES
        .iter()
        .zip(weights)
        .map(|(&kind, w)| if settings.allows(kind) { w } else { 0.0 })
        .collect();
    match WeightedIndex::new(&allowed) {
        Ok(dist) => TYPES[dist.sample(rng)],
        Err(_) => MissileType::A,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_core::enums::Difficulty;
    use rand::SeedableRng;

    #[test]
    fn batch_grows_then_caps() {
        assert_eq!(batch_size(1), 2);
        assert_eq!(batch_size(2), 3);
        assert_eq!(batch_size(6), 5);
        assert_eq!(batch_size(40), 5);
    }

    #[test]
    fn weights_shift_toward_heavier_types() {
        assert_eq!(type_weights(1), [90.0, 7.0, 3.0]);
        let w10 = type_weights(10);
        assert!((w10[0] - 50.0).abs() < 1e-9);
        assert!((w10[1] - 30.0).abs() < 1e-9);
        assert!((w10[2] - 20.0).abs() < 1e-9);
        assert_eq!(type_weights(0), type_weights(1));
    }

    #[test]
    fn disabled_types_never_spawn() {
        let easy = DifficultySettings::for_difficulty(Difficulty::Easy);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..500 {
            assert_ne!(choose_type(10, &easy, &mut rng), MissileType::C);
        }
    }
}
