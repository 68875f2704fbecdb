use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a class of poolable instance. The host decides what an id maps
/// to (a prefab, an archetype, a scene template); the pool only needs the id
/// to be hashable and spawnable through the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityTypeId(pub u16);

impl fmt::Display for EntityTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque host-issued handle to a spawned instance.
///
/// Handles are never invalidated in place; when the instance behind one is
/// destroyed outside pool control, the handle simply stops resolving through
/// the host and the pool purges it lazily.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle(pub u64);

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability interface every pooled instance implements.
///
/// The pool invokes `on_pool_initialize` when the instance is handed out and
/// `on_pool_reset` when it returns to the pool, and defines no further
/// contract on what the hooks do internally (re-randomizing state, re-arming
/// timers, clearing trails).
pub trait PoolEntity {
    fn type_id(&self) -> EntityTypeId;

    fn on_pool_initialize(&mut self);

    fn on_pool_reset(&mut self);
}
