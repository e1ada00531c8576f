//! Conversions between hecs entities and the public `EntityId`, plus ordered scans.

use hecs::{Component, Entity, World};

use bulwark_core::components::SpawnOrder;
use bulwark_core::types::EntityId;

pub fn id_of(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

/// Resolve an id back to an entity. Does not check liveness; hecs lookups on
/// a stale entity fail because the generation no longer matches.
pub fn entity_of(id: EntityId) -> Option<Entity> {
    Entity::from_bits(id.0)
}

/// All entities carrying `C`, oldest first.
pub fn ordered<C: Component>(world: &World) -> Vec<Entity> {
    let mut items: Vec<(SpawnOrder, Entity)> = world
        .query::<(&C, &SpawnOrder)>()
        .iter()
        .map(|(entity, (_, order))| (*order, entity))
        .collect();
    items.sort_unstable_by_key(|(order, _)| *order);
    items.into_iter().map(|(_, entity)| entity).collect()
}
