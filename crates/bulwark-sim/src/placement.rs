//! Placement rules for player structures.

use hecs::World;

use bulwark_core::components::{Building, Factory, Launcher};
use bulwark_core::constants::*;
use bulwark_core::error::PlacementError;
use bulwark_core::types::Position;

/// Snap a point to the placement grid on the ground plane.
pub fn snap_to_grid(position: Position) -> Position {
    Position::new(
        (position.x / GRID_STEP).round() * GRID_STEP,
        0.0,
        (position.z / GRID_STEP).round() * GRID_STEP,
    )
}

/// Check a (snapped) position against the bounds and spacing rules.
pub fn can_place_at(world: &World, position: &Position) -> Result<(), PlacementError> {
    if position.x.abs() > PLACEMENT_BOUND || position.z.abs() > PLACEMENT_BOUND {
        return Err(PlacementError::OutOfBounds);
    }

    let crowded = |other: &Position, spacing: f64| position.horizontal_range_to(other) < spacing;

    if world
        .query::<(&Position, &Launcher)>()
        .iter()
        .any(|(_, (pos, _))| crowded(pos, MIN_STRUCTURE_SPACING))
        || world
            .query::<(&Position, &Factory)>()
            .iter()
            .any(|(_, (pos, _))| crowded(pos, MIN_STRUCTURE_SPACING))
    {
        return Err(PlacementError::TooCloseToStructure);
    }

    if world
        .query::<(&Position, &Building)>()
        .iter()
        .any(|(_, (pos, building))| !building.collapsed && crowded(pos, MIN_BUILDING_SPACING))
    {
        return Err(PlacementError::TooCloseToBuilding);
    }

    Ok(())
}
