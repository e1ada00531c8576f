//! Player commands sent from the frontend to the simulation.
//!
//! Commands are validated and queued for processing at the next tick boundary.
//! The same operations are also available as direct `Simulator` methods that
//! return a `Result`.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, Position};

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Run control ---
    /// Build the city and start stage 1.
    StartGame,
    /// Tear everything down and return to the inactive state.
    Restart,
    /// Freeze the simulation.
    Pause,
    /// Unfreeze the simulation.
    Resume,
    /// Skip the remaining cooldown and start the next stage.
    StartNextWave,

    // --- Settings ---
    SetDifficulty { difficulty: Difficulty },

    // --- Building ---
    /// Place a launcher or factory. The position is snapped to the grid.
    PlaceStructure {
        kind: StructureKind,
        position: Position,
    },
    /// Abort the factory's in-flight delivery.
    CancelDelivery { factory: EntityId },

    // --- Upgrades ---
    ApplyUpgrade {
        category: UpgradeCategory,
        kind: UpgradeKind,
    },
}
