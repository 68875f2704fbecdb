use glam::Vec3;

use crate::entity::{EntityHandle, EntityTypeId, PoolEntity};

/// The world the pool operates against: spawning, placement and
/// visibility/activity toggles, plus the destruction signal subscription.
///
/// The pool subscribes to the destruction signal for every instance it
/// spawns. Delivery is the glue code's job: when the host destroys a
/// subscribed instance outside pool control, it must route the event to
/// [`PoolManager::on_instance_destroyed`](crate::manager::PoolManager::on_instance_destroyed),
/// which unsubscribes as its first action.
pub trait EntityHost {
    /// Creates a new instance of the given type at a position. `None` means
    /// the host cannot spawn this type at all.
    fn spawn(&mut self, type_id: EntityTypeId, position: Vec3) -> Option<EntityHandle>;

    /// Whether the handle still refers to a live instance.
    fn is_alive(&self, handle: EntityHandle) -> bool;

    /// Resolves a handle to its capability interface; `None` for stale
    /// handles.
    fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut dyn PoolEntity>;

    fn set_position(&mut self, handle: EntityHandle, position: Vec3);

    fn set_hidden(&mut self, handle: EntityHandle, hidden: bool);

    fn set_update_enabled(&mut self, handle: EntityHandle, enabled: bool);

    fn subscribe_destroyed(&mut self, handle: EntityHandle);

    fn unsubscribe_destroyed(&mut self, handle: EntityHandle);
}
