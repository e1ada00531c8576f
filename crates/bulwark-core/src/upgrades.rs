//! Upgrade cost and effect tables.
//!
//! Level `n` of a track costs `costs[n]` and adds `effects[n]` to the
//! cumulative effect. A track at level `L` therefore has a cumulative effect of
//! `effects[0] + .. + effects[L - 1]`.

use crate::enums::UpgradeKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeTable {
    pub max_level: u32,
    pub costs: &'static [i64],
    pub effects: &'static [f64],
}

const RANGE: UpgradeTable = UpgradeTable {
    max_level: 5,
    costs: &[50, 75, 100, 150, 200],
    effects: &[4.0, 4.0, 4.0, 4.0, 4.0],
};

const CAPACITY: UpgradeTable = UpgradeTable {
    max_level: 3,
    costs: &[60, 90, 120],
    effects: &[2.0, 2.0, 2.0],
};

/// Milliseconds removed from the factory production interval.
const PRODUCTION: UpgradeTable = UpgradeTable {
    max_level: 4,
    costs: &[50, 80, 110, 150],
    effects: &[400.0, 400.0, 400.0, 400.0],
};

const STORAGE: UpgradeTable = UpgradeTable {
    max_level: 3,
    costs: &[40, 60, 80],
    effects: &[4.0, 4.0, 4.0],
};

/// Fraction of incoming damage buildings ignore.
const ARMOR: UpgradeTable = UpgradeTable {
    max_level: 3,
    costs: &[80, 120, 160],
    effects: &[0.1, 0.1, 0.1],
};

pub fn table(kind: UpgradeKind) -> UpgradeTable {
    match kind {
        UpgradeKind::Range => RANGE,
        UpgradeKind::Capacity => CAPACITY,
        UpgradeKind::Production => PRODUCTION,
        UpgradeKind::Storage => STORAGE,
        UpgradeKind::Armor => ARMOR,
    }
}

impl UpgradeTable {
    /// Cost of moving from `current_level` to the next one, or None at max level.
    pub fn cost_at(&self, current_level: u32) -> Option<i64> {
        if current_level >= self.max_level {
            return None;
        }
        self.costs.get(current_level as usize).copied()
    }

    /// Sum of effects for the first `level` levels.
    pub fn cumulative_effect(&self, level: u32) -> f64 {
        self.effects.iter().take(level as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_cover_every_level() {
        for kind in UpgradeKind::ALL {
            let t = table(kind);
            assert_eq!(t.costs.len(), t.max_level as usize, "{kind:?} costs");
            assert_eq!(t.effects.len(), t.max_level as usize, "{kind:?} effects");
        }
    }

    #[test]
    fn cost_at_max_level_is_none() {
        let t = table(UpgradeKind::Capacity);
        assert_eq!(t.cost_at(0), Some(60));
        assert_eq!(t.cost_at(2), Some(120));
        assert_eq!(t.cost_at(3), None);
    }

    #[test]
    fn cumulative_effect_sums_prefix() {
        let t = table(UpgradeKind::Range);
        assert_eq!(t.cumulative_effect(0), 0.0);
        assert_eq!(t.cumulative_effect(3), 12.0);
        // Levels past the table are ignored rather than panicking.
        assert_eq!(t.cumulative_effect(99), 20.0);
    }
}
