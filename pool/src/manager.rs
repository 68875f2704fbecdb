use std::{collections::HashMap, fmt::Write};

use thiserror::Error;

use crate::{
    entity::{EntityHandle, EntityTypeId},
    host::EntityHost,
    settings::PoolSettings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The host cannot spawn instances of this type.
    #[error("host cannot spawn entity type {0}")]
    InvalidType(EntityTypeId),
    /// The handle is stale or not tracked as busy by any pool.
    #[error("instance {0} is not tracked as busy")]
    InstanceNotFound(EntityHandle),
}

#[derive(Debug, Clone, Copy)]
struct PoolSlot {
    handle: EntityHandle,
    is_idle: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TypeStatistics {
    pub idle: usize,
    pub busy: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PoolStatistics {
    pub total_slots: usize,
    pub busy_slots: usize,
    pub per_type: HashMap<EntityTypeId, TypeStatistics>,
}

/// Type-keyed pool of reusable instances.
///
/// Idle instances are kept parked (off-map, hidden, update disabled) so they
/// are inert until reused. `acquire` hands out the first idle slot of a type
/// or grows the pool by a batch when none is left; `release` parks the
/// instance again. Slots whose instance was destroyed outside pool control
/// are purged lazily on the next acquire/release of that type.
///
/// Single-threaded by design: every operation runs to completion on the
/// caller's thread. A multi-threaded host must wrap the whole manager in one
/// mutex held across each operation, since purge-then-scan is not safe under
/// concurrent modification.
pub struct PoolManager {
    settings: PoolSettings,
    pools: HashMap<EntityTypeId, Vec<PoolSlot>>,
}

/// Moves an instance to the inert idle presentation.
fn park_instance(settings: &PoolSettings, host: &mut dyn EntityHost, handle: EntityHandle) {
    host.set_position(handle, settings.parked_position);
    host.set_hidden(handle, true);
    host.set_update_enabled(handle, false);
}

/// Brings a parked instance back into the world.
fn activate_instance(host: &mut dyn EntityHost, handle: EntityHandle) {
    host.set_hidden(handle, false);
    host.set_update_enabled(handle, true);
}

impl PoolManager {
    pub fn new(settings: PoolSettings) -> Self {
        debug_assert!(settings.is_valid(), "pool settings must have non-zero growth batches");
        PoolManager {
            settings,
            pools: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    /// Spawns `count` instances of a type and appends them to its pool as
    /// idle, parked slots. `count == 0` is a no-op.
    ///
    /// A host that refuses to spawn the type entirely fails with
    /// [`PoolError::InvalidType`]; a partial spawn failure keeps whatever was
    /// spawned and logs a warning.
    pub fn add_capacity(
        &mut self,
        host: &mut dyn EntityHost,
        type_id: EntityTypeId,
        count: usize,
    ) -> Result<(), PoolError> {
        if count == 0 {
            return Ok(());
        }

        let mut spawned = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(handle) = host.spawn(type_id, self.settings.parked_position) else {
                break;
            };
            host.subscribe_destroyed(handle);
            park_instance(&self.settings, host, handle);
            spawned.push(PoolSlot {
                handle,
                is_idle: true,
            });
        }

        if spawned.is_empty() {
            log::warn!("Host refused to spawn any instance of type {type_id}");
            return Err(PoolError::InvalidType(type_id));
        }
        if spawned.len() < count {
            log::warn!(
                "Host spawned only {} of {} requested instances of type {type_id}",
                spawned.len(),
                count
            );
        }

        log::debug!("Added {} pool slots for type {type_id}", spawned.len());
        self.pools.entry(type_id).or_default().extend(spawned);
        Ok(())
    }

    /// Resolves an instance's type through the host and adds capacity for it.
    pub fn add_capacity_for(
        &mut self,
        host: &mut dyn EntityHost,
        handle: EntityHandle,
        count: usize,
    ) -> Result<(), PoolError> {
        let type_id = host
            .entity_mut(handle)
            .map(|entity| entity.type_id())
            .ok_or(PoolError::InstanceNotFound(handle))?;
        self.add_capacity(host, type_id, count)
    }

    /// Hands out an instance of the given type, reusing the first idle slot
    /// or growing the pool by the type's growth batch when none is left.
    ///
    /// The returned instance is unparked and has had its
    /// `on_pool_initialize` hook invoked; it is never a slot already held by
    /// another caller.
    pub fn acquire(
        &mut self,
        host: &mut dyn EntityHost,
        type_id: EntityTypeId,
    ) -> Result<EntityHandle, PoolError> {
        self.purge_stale(host, type_id);

        let reusable = self
            .pools
            .get_mut(&type_id)
            .and_then(|slots| slots.iter_mut().find(|slot| slot.is_idle))
            .map(|slot| {
                slot.is_idle = false;
                slot.handle
            });

        let handle = match reusable {
            Some(handle) => handle,
            None => {
                // Exhausted (or unknown) type: grow, then hand out the first
                // slot of the new batch.
                let batch = self.settings.growth_batch_for(type_id).max(1);
                let first_new = self.pools.get(&type_id).map_or(0, Vec::len);
                self.add_capacity(host, type_id, batch)?;

                let slot = self
                    .pools
                    .get_mut(&type_id)
                    .and_then(|slots| slots.get_mut(first_new))
                    .ok_or(PoolError::InvalidType(type_id))?;
                slot.is_idle = false;
                slot.handle
            }
        };

        activate_instance(host, handle);
        if let Some(entity) = host.entity_mut(handle) {
            entity.on_pool_initialize();
        }
        log::debug!("Acquired {handle} from pool of type {type_id}");
        Ok(handle)
    }

    /// Returns a busy instance to its type's pool: parks it, invokes its
    /// `on_pool_reset` hook and marks the slot idle again.
    ///
    /// Deliberately permissive: every busy slot matching the handle is reset,
    /// so a duplicated entry can never get stuck busy. Fails without touching
    /// any state if the handle is stale, its type has no pool, or no matching
    /// busy slot exists.
    pub fn release(
        &mut self,
        host: &mut dyn EntityHost,
        handle: EntityHandle,
    ) -> Result<(), PoolError> {
        let type_id = host
            .entity_mut(handle)
            .map(|entity| entity.type_id())
            .ok_or(PoolError::InstanceNotFound(handle))?;

        self.purge_stale(host, type_id);

        let Some(slots) = self.pools.get_mut(&type_id) else {
            return Err(PoolError::InstanceNotFound(handle));
        };

        let mut released = false;
        for slot in slots.iter_mut() {
            if slot.handle == handle && !slot.is_idle {
                park_instance(&self.settings, host, slot.handle);
                if let Some(entity) = host.entity_mut(slot.handle) {
                    entity.on_pool_reset();
                }
                slot.is_idle = true;
                released = true;
            }
        }

        if released {
            log::debug!("Released {handle} back to pool of type {type_id}");
            Ok(())
        } else {
            Err(PoolError::InstanceNotFound(handle))
        }
    }

    /// Forces every slot of a type back to parked + idle, invoking each live
    /// instance's `on_pool_reset` hook once. No-op for unknown types.
    pub fn reset_all_of_type(&mut self, host: &mut dyn EntityHost, type_id: EntityTypeId) {
        let Some(slots) = self.pools.get_mut(&type_id) else {
            return;
        };

        log::debug!("Resetting all {} pool slots of type {type_id}", slots.len());
        for slot in slots.iter_mut() {
            park_instance(&self.settings, host, slot.handle);
            if let Some(entity) = host.entity_mut(slot.handle) {
                entity.on_pool_reset();
            }
            slot.is_idle = true;
        }
    }

    /// Reacts to the host's out-of-band destruction signal: drops every slot
    /// across every type that referenced the destroyed instance.
    ///
    /// Unsubscribes from the instance's destruction signal first, so a
    /// re-raised signal cannot re-enter this handler.
    pub fn on_instance_destroyed(&mut self, host: &mut dyn EntityHost, handle: EntityHandle) {
        host.unsubscribe_destroyed(handle);

        let mut removed = 0;
        for slots in self.pools.values_mut() {
            let before = slots.len();
            slots.retain(|slot| slot.handle != handle);
            removed += before - slots.len();
        }
        log::debug!("Instance {handle} destroyed externally, dropped {removed} pool slots");
    }

    /// Removes every slot of a type whose instance no longer exists.
    fn purge_stale(&mut self, host: &dyn EntityHost, type_id: EntityTypeId) {
        let Some(slots) = self.pools.get_mut(&type_id) else {
            return;
        };
        let before = slots.len();
        slots.retain(|slot| host.is_alive(slot.handle));
        let removed = before - slots.len();
        if removed > 0 {
            log::debug!("Purged {removed} stale pool slots of type {type_id}");
        }
    }

    pub fn statistics(&self) -> PoolStatistics {
        let mut stats = PoolStatistics::default();
        for (&type_id, slots) in &self.pools {
            let per_type = stats.per_type.entry(type_id).or_default();
            for slot in slots {
                if slot.is_idle {
                    per_type.idle += 1;
                } else {
                    per_type.busy += 1;
                    stats.busy_slots += 1;
                }
                stats.total_slots += 1;
            }
        }
        stats
    }

    /// Read-only report of every (type, instance, state) triple, with types
    /// in sorted order so the output is stable.
    pub fn debug_dump(&self) -> String {
        let mut types: Vec<EntityTypeId> = self.pools.keys().copied().collect();
        types.sort_unstable_by_key(|type_id| type_id.0);

        let mut out = String::new();
        for type_id in types {
            for slot in &self.pools[&type_id] {
                let state = if slot.is_idle { "Idle" } else { "Busy" };
                let _ = writeln!(out, "type={type_id} instance={} state={state}", slot.handle);
            }
        }
        out
    }
}
