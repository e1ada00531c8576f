//! A simple built-in player for headless runs.
//!
//! Builds launchers and factories on the free grid cells closest to the city
//! centre, rebuilds lost launchers, buys upgrades with what is left over and
//! optionally skips cooldowns.

use tracing::{debug, info};

use bulwark_core::constants::{GRID_STEP, PLACEMENT_BOUND};
use bulwark_core::enums::*;
use bulwark_core::error::CommandError;
use bulwark_core::state::GameSnapshot;
use bulwark_core::types::Position;
use bulwark_sim::Simulator;

use crate::settings::AutopilotSettings;

/// Upgrade shopping list, most valuable first.
const UPGRADE_PRIORITY: [UpgradeKind; 5] = [
    UpgradeKind::Range,
    UpgradeKind::Production,
    UpgradeKind::Capacity,
    UpgradeKind::Storage,
    UpgradeKind::Armor,
];

pub struct Autopilot {
    settings: AutopilotSettings,
    /// Placement candidates, nearest the centre first.
    cells: Vec<Position>,
}

impl Autopilot {
    pub fn new(settings: AutopilotSettings) -> Self {
        Self {
            settings,
            cells: candidate_cells(),
        }
    }

    /// Act on the latest snapshot. Called between ticks.
    pub fn act(&mut self, sim: &mut Simulator, snapshot: &GameSnapshot) {
        match snapshot.phase {
            WavePhase::Active => {}
            WavePhase::Cooldown => {
                if self.settings.early_start {
                    if let Ok(payout) = sim.start_next_wave() {
                        debug!(payout, "Autopilot skipped cooldown");
                    }
                    return;
                }
            }
            WavePhase::Inactive | WavePhase::GameOver => return,
        }

        let wanted = next_structure(
            snapshot.launchers.len(),
            snapshot.factories.len(),
            &self.settings,
        );
        match wanted {
            Some(kind) => self.build(sim, kind),
            None if self.settings.buy_upgrades => self.shop(sim),
            None => {}
        }
    }

    /// Place `kind` on the first cell that accepts it.
    fn build(&self, sim: &mut Simulator, kind: StructureKind) {
        if sim.state().money < sim.state().rules.structure_cost {
            return;
        }
        for cell in &self.cells {
            match sim.place_structure(kind, *cell) {
                Ok(id) => {
                    info!(?kind, ?id, x = cell.x, z = cell.z, "Autopilot built");
                    return;
                }
                Err(CommandError::InvalidPlacement(_)) => continue,
                Err(_) => return,
            }
        }
    }

    /// Buy the first affordable upgrade on the list.
    fn shop(&self, sim: &mut Simulator) {
        let Some(kind) = UPGRADE_PRIORITY
            .into_iter()
            .find(|kind| sim.can_upgrade(kind.category(), *kind))
        else {
            return;
        };
        if let Ok(receipt) = sim.apply_upgrade(kind.category(), kind) {
            info!(kind = kind.as_str(), level = receipt.level, "Autopilot upgraded");
        }
    }
}

/// What to build next: a launcher first, then a factory, then launchers
/// up to the target, then the remaining factories.
pub fn next_structure(launchers: usize, factories: usize, settings: &AutopilotSettings) -> Option<StructureKind> {
    if launchers < settings.launchers && (launchers == 0 || factories > 0 || settings.factories == 0) {
        Some(StructureKind::Launcher)
    } else if factories < settings.factories {
        Some(StructureKind::Factory)
    } else {
        None
    }
}

/// Every grid cell inside the build area, nearest the centre first.
pub fn candidate_cells() -> Vec<Position> {
    let steps = (PLACEMENT_BOUND / GRID_STEP) as i32;
    let mut cells: Vec<Position> = (-steps..=steps)
        .flat_map(|i| (-steps..=steps).map(move |j| (i, j)))
        .map(|(i, j)| Position::new(i as f64 * GRID_STEP, 0.0, j as f64 * GRID_STEP))
        .collect();
    cells.sort_by(|a, b| {
        let da = a.x * a.x + a.z * a.z;
        let db = b.x * b.x + b.z * b.z;
        da.total_cmp(&db)
            .then(a.x.total_cmp(&b.x))
            .then(a.z.total_cmp(&b.z))
    });
    cells
}
