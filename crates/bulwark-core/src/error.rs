//! Reasons a player action can be declined.
//!
//! None of these are fatal. The simulation leaves its state untouched and
//! reports the reason; the run only ends when the city falls.

use thiserror::Error;

use crate::enums::{UpgradeCategory, UpgradeKind};
use crate::types::EntityId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Insufficient funds: need ${needed}, have ${available}")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("Invalid placement: {0}")]
    InvalidPlacement(#[from] PlacementError),

    #[error("{} {} already at max level", .category.as_str(), .kind.as_str())]
    MaxLevelReached {
        category: UpgradeCategory,
        kind: UpgradeKind,
    },

    #[error("{} is not a {} upgrade", .kind.as_str(), .category.as_str())]
    UpgradeMismatch {
        category: UpgradeCategory,
        kind: UpgradeKind,
    },

    #[error("Target already engaged")]
    TargetAlreadyEngaged,

    #[error("Launcher has no missiles")]
    OutOfMissiles,

    #[error("No run in progress")]
    NotRunning,

    #[error("Wave already in progress")]
    WaveInProgress,

    #[error("Unknown entity: {0:?}")]
    UnknownEntity(EntityId),
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PlacementError {
    #[error("position is outside the build area")]
    OutOfBounds,

    #[error("too close to another structure")]
    TooCloseToStructure,

    #[error("too close to a building")]
    TooCloseToBuilding,
}

pub type CommandResult<T> = std::result::Result<T, CommandError>;
