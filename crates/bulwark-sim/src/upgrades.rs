//! Upgrade levels and the structure stats derived from them.
//!
//! Structure stats are never patched incrementally: every level change
//! recomputes them from the base values, the difficulty and the cumulative
//! upgrade effects, so applying the same upgrade path always lands on the
//! same stats.

use std::collections::HashMap;

use hecs::World;
use serde::{Deserialize, Serialize};

use bulwark_core::components::{Building, Factory, Launcher};
use bulwark_core::config::DifficultySettings;
use bulwark_core::constants::*;
use bulwark_core::enums::{Difficulty, UpgradeCategory, UpgradeKind};
use bulwark_core::error::{CommandError, CommandResult};
use bulwark_core::state::UpgradeView;
use bulwark_core::upgrades::table;

/// Purchased level for each upgrade track. Missing tracks are level 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpgradeLevels {
    levels: HashMap<UpgradeKind, u32>,
}

/// Result of a successful purchase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeReceipt {
    pub level: u32,
    pub cost: i64,
}

impl UpgradeLevels {
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        self.levels.get(&kind).copied().unwrap_or(0)
    }

    /// Price of the next level, or None at max level.
    pub fn next_cost(&self, kind: UpgradeKind) -> Option<i64> {
        table(kind).cost_at(self.level(kind))
    }

    /// Check a purchase without performing it.
    pub fn check(&self, category: UpgradeCategory, kind: UpgradeKind, money: i64) -> CommandResult<i64> {
        if kind.category() != category {
            return Err(CommandError::UpgradeMismatch { category, kind });
        }
        let cost = self
            .next_cost(kind)
            .ok_or(CommandError::MaxLevelReached { category, kind })?;
        if money < cost {
            return Err(CommandError::InsufficientFunds {
                needed: cost,
                available: money,
            });
        }
        Ok(cost)
    }

    pub fn can_upgrade(&self, category: UpgradeCategory, kind: UpgradeKind, money: i64) -> bool {
        self.check(category, kind, money).is_ok()
    }

    /// Raise a track by one level. The caller deducts `cost` from the balance
    /// and re-derives structure stats.
    pub fn purchase(
        &mut self,
        category: UpgradeCategory,
        kind: UpgradeKind,
        money: i64,
    ) -> CommandResult<UpgradeReceipt> {
        let cost = self.check(category, kind, money)?;
        let level = self.levels.entry(kind).or_insert(0);
        *level += 1;
        Ok(UpgradeReceipt {
            level: *level,
            cost,
        })
    }

    /// Cumulative effect of a track; 0 for a kind outside `category`.
    pub fn calculate_effect(&self, category: UpgradeCategory, kind: UpgradeKind) -> f64 {
        if kind.category() != category {
            return 0.0;
        }
        table(kind).cumulative_effect(self.level(kind))
    }

    fn effect(&self, kind: UpgradeKind) -> f64 {
        self.calculate_effect(kind.category(), kind)
    }

    pub fn views(&self) -> Vec<UpgradeView> {
        UpgradeKind::ALL
            .iter()
            .map(|&kind| {
                let t = table(kind);
                UpgradeView {
                    category: kind.category(),
                    kind,
                    level: self.level(kind),
                    max_level: t.max_level,
                    next_cost: self.next_cost(kind),
                    cumulative_effect: self.effect(kind),
                }
            })
            .collect()
    }

    // --- Derived stats ---

    pub fn launcher_range(&self, difficulty: Difficulty) -> f64 {
        DifficultySettings::for_difficulty(difficulty).range + self.effect(UpgradeKind::Range)
    }

    pub fn launcher_capacity(&self) -> u32 {
        LAUNCHER_BASE_MAX_MISSILES + self.effect(UpgradeKind::Capacity).round() as u32
    }

    pub fn factory_production_ms(&self) -> f64 {
        (FACTORY_BASE_PRODUCTION_MS - self.effect(UpgradeKind::Production)).max(FACTORY_MIN_PRODUCTION_MS)
    }

    pub fn factory_capacity(&self) -> u32 {
        FACTORY_BASE_MAX_MISSILES + self.effect(UpgradeKind::Storage).round() as u32
    }

    pub fn building_armor(&self) -> f64 {
        self.effect(UpgradeKind::Armor).clamp(0.0, 1.0)
    }
}

/// Push derived stats for `category` onto every live structure.
/// Stock above a lowered cap is clamped down.
pub fn apply_upgrade_effect(
    world: &mut World,
    levels: &UpgradeLevels,
    category: UpgradeCategory,
    difficulty: Difficulty,
) {
    match category {
        UpgradeCategory::Launcher => {
            let range = levels.launcher_range(difficulty);
            let capacity = levels.launcher_capacity();
            for (_entity, launcher) in world.query_mut::<&mut Launcher>() {
                launcher.range = range;
                launcher.max_missiles = capacity;
                launcher.missiles = launcher.missiles.min(capacity);
            }
        }
        UpgradeCategory::Factory => {
            let interval = levels.factory_production_ms();
            let capacity = levels.factory_capacity();
            for (_entity, factory) in world.query_mut::<&mut Factory>() {
                factory.production_interval_ms = interval;
                factory.max_missiles = capacity;
                factory.missiles = factory.missiles.min(capacity);
            }
        }
        UpgradeCategory::City => {
            let armor = levels.building_armor();
            for (_entity, building) in world.query_mut::<&mut Building>() {
                building.armor = armor;
            }
        }
    }
}
