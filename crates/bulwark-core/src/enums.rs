//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Difficulty preset. Governs launcher range, enemy speed, the live enemy cap
/// and which enemy types may spawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "normal" => Some(Self::Normal),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Normal => "NORMAL",
            Self::Hard => "HARD",
        }
    }
}

/// Enemy missile type. Each has a fixed base speed, colour, blast radius and damage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissileType {
    #[default]
    A,
    B,
    C,
}

/// Building height class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingCategory {
    High,
    Mid,
    Low,
}

/// Player-placeable structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Launcher,
    Factory,
}

/// Defense missile flight phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefensePhase {
    /// Bezier arc out of the launcher.
    #[default]
    Arc,
    /// Direct pursuit of the live target position.
    Chase,
}

/// Wave controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// No run in progress.
    #[default]
    Inactive,
    /// Wave running, enemies spawning, wave timer counting down.
    Active,
    /// Pause between waves, no spawns.
    Cooldown,
    /// Terminal state; the run is over.
    GameOver,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Every stage survived.
    Cleared,
    /// The city was destroyed.
    Failed,
}

/// Upgrade category: which structures an upgrade affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeCategory {
    Launcher,
    Factory,
    City,
}

/// Individual upgrade track within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Launcher detection radius.
    Range,
    /// Launcher magazine size.
    Capacity,
    /// Factory production interval.
    Production,
    /// Factory stock cap.
    Storage,
    /// Building damage reduction.
    Armor,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 5] = [
        UpgradeKind::Range,
        UpgradeKind::Capacity,
        UpgradeKind::Production,
        UpgradeKind::Storage,
        UpgradeKind::Armor,
    ];

    /// The category this upgrade track belongs to.
    pub fn category(&self) -> UpgradeCategory {
        match self {
            Self::Range | Self::Capacity => UpgradeCategory::Launcher,
            Self::Production | Self::Storage => UpgradeCategory::Factory,
            Self::Armor => UpgradeCategory::City,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Range => "range",
            Self::Capacity => "capacity",
            Self::Production => "production",
            Self::Storage => "storage",
            Self::Armor => "armor",
        }
    }
}

impl UpgradeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Launcher => "launcher",
            Self::Factory => "factory",
            Self::City => "city",
        }
    }
}
