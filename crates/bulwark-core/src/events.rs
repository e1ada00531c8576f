//! Events emitted by the simulation for audio, effects and UI feedback.

use serde::{Deserialize, Serialize};

use crate::effects::EffectSpec;
use crate::enums::*;
use crate::state::WaveBonus;
use crate::types::{EntityId, Position};

/// Something that happened during a tick. Drained into each snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A launcher fired at an enemy missile.
    MissileLaunched {
        launcher: EntityId,
        target: EntityId,
        position: Position,
        effect: EffectSpec,
    },
    /// A defense missile destroyed an enemy missile.
    Intercepted {
        position: Position,
        bonus: i64,
        streak: u32,
        effect: EffectSpec,
    },
    /// An enemy missile reached a building or the ground.
    Explosion {
        kind: MissileType,
        position: Position,
        direct_hit: bool,
        effect: EffectSpec,
    },
    BuildingCollapsed {
        building: EntityId,
        category: BuildingCategory,
        height: f64,
        position: Position,
        effect: EffectSpec,
    },
    LauncherDestroyed { launcher: EntityId },
    MissileProduced {
        factory: EntityId,
        stock: u32,
        effect: EffectSpec,
    },
    DeliveryStarted {
        factory: EntityId,
        launcher: EntityId,
    },
    DeliveryCompleted {
        factory: EntityId,
        launcher: EntityId,
        effect: EffectSpec,
    },
    DeliveryCancelled { factory: EntityId },
    StructurePlaced {
        id: EntityId,
        kind: StructureKind,
        position: Position,
    },
    UpgradeApplied {
        category: UpgradeCategory,
        kind: UpgradeKind,
        level: u32,
        cost: i64,
    },
    /// A new stage began. `payout` is the base award plus `bonus.total`.
    WaveStarted {
        stage: u32,
        payout: i64,
        bonus: WaveBonus,
        effect: EffectSpec,
    },
    WaveCompleted { stage: u32 },
    GameOver { outcome: RunOutcome, stage: u32 },
    /// Transient user-facing message.
    Message(Message),
}

/// Transient text for the HUD message area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    /// How long the HUD should keep it on screen.
    pub duration_ms: u32,
    pub tick: u64,
}

impl SimEvent {
    pub fn message(text: impl Into<String>, duration_ms: u32, tick: u64) -> Self {
        SimEvent::Message(Message {
            text: text.into(),
            duration_ms,
            tick,
        })
    }
}
