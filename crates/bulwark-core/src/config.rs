//! Tunable rules, difficulty presets and enemy missile profiles.

use serde::{Deserialize, Serialize};

use crate::enums::{Difficulty, MissileType};

/// Rules of a run. Every field has a default, so partial TOML tables load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Balance at the start of a run.
    pub starting_money: i64,
    /// Length of each wave in seconds.
    pub wave_duration_secs: f64,
    /// Pause between waves in seconds.
    pub cooldown_secs: f64,
    /// Stage count after which the run is cleared. `None` plays until the city falls.
    pub total_stages: Option<u32>,
    /// Price of a launcher or factory.
    pub structure_cost: i64,
    /// Price of moving one missile from a factory to a launcher.
    pub delivery_cost: i64,
    /// Paid when a cooldown runs out and the next stage begins.
    pub stage_clear_bonus: i64,
    /// Paid instead of `stage_clear_bonus` when the player skips the cooldown.
    pub early_start_bonus: i64,
    /// Base milliseconds between spawn batches, divided by the stage number.
    pub spawn_interval_ms: f64,
    /// The run fails once city health is at or below this percentage.
    pub city_failure_percent: f64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_money: 250,
            wave_duration_secs: 20.0,
            cooldown_secs: 5.0,
            total_stages: Some(10),
            structure_cost: 100,
            delivery_cost: 3,
            stage_clear_bonus: 100,
            early_start_bonus: 50,
            spawn_interval_ms: 2000.0,
            city_failure_percent: 0.0,
        }
    }
}

/// Per-difficulty parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// Launcher detection radius before upgrades.
    pub range: f64,
    /// Scales enemy base speed.
    pub missile_speed_multiplier: f64,
    /// Cap on simultaneously live enemy missiles.
    pub max_enemy_missiles: u32,
    pub enable_type_b: bool,
    pub enable_type_c: bool,
}

impl DifficultySettings {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                range: 40.0,
                missile_speed_multiplier: 0.5,
                max_enemy_missiles: 10,
                enable_type_b: true,
                enable_type_c: false,
            },
            Difficulty::Normal => Self {
                range: 36.0,
                missile_speed_multiplier: 0.6,
                max_enemy_missiles: 15,
                enable_type_b: true,
                enable_type_c: true,
            },
            Difficulty::Hard => Self {
                range: 32.0,
                missile_speed_multiplier: 0.9,
                max_enemy_missiles: 20,
                enable_type_b: true,
                enable_type_c: true,
            },
        }
    }

    /// Whether a missile type may spawn under these settings.
    pub fn allows(&self, kind: MissileType) -> bool {
        match kind {
            MissileType::A => true,
            MissileType::B => self.enable_type_b,
            MissileType::C => self.enable_type_c,
        }
    }
}

/// Fixed characteristics of an enemy missile type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissileProfile {
    /// Base speed at stage 0 before the difficulty multiplier.
    pub base_speed: f64,
    /// Display colour (0xRRGGBB).
    pub color: u32,
    pub explosion_radius: f64,
    pub damage_amount: f64,
}

pub fn missile_profile(kind: MissileType) -> MissileProfile {
    match kind {
        MissileType::A => MissileProfile {
            base_speed: 0.0001,
            color: 0xff8800,
            explosion_radius: 3.0,
            damage_amount: 20.0,
        },
        MissileType::B => MissileProfile {
            base_speed: 0.00015,
            color: 0xff0000,
            explosion_radius: 4.5,
            damage_amount: 25.0,
        },
        MissileType::C => MissileProfile {
            base_speed: 0.00027,
            color: 0xb04dfd,
            explosion_radius: 6.0,
            damage_amount: 40.0,
        },
    }
}
