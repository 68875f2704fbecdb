use std::collections::{HashMap, HashSet};

use glam::Vec3;
use pool::{
    entity::{EntityHandle, EntityTypeId, PoolEntity},
    host::EntityHost,
};

pub const PROJECTILE: EntityTypeId = EntityTypeId(1);
pub const SPARK: EntityTypeId = EntityTypeId(2);

pub struct SandboxEntity {
    type_id: EntityTypeId,
    position: Vec3,
    velocity: Vec3,
    hidden: bool,
    update_enabled: bool,
    lifetime: u32,
    seed: u64,
}

impl PoolEntity for SandboxEntity {
    fn type_id(&self) -> EntityTypeId {
        self.type_id
    }

    fn on_pool_initialize(&mut self) {
        // Deterministic "re-randomization" so sandbox runs are reproducible.
        let spread = (self.seed % 7) as f32 - 3.0;
        (self.velocity, self.lifetime) = match self.type_id {
            PROJECTILE => (Vec3::new(spread, 40.0, 0.0), 12 + (self.seed % 8) as u32),
            _ => (Vec3::new(spread, spread, 10.0), 4 + (self.seed % 4) as u32),
        };
        self.seed = self
            .seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
    }

    fn on_pool_reset(&mut self) {
        self.velocity = Vec3::ZERO;
        self.lifetime = 0;
    }
}

/// A minimal in-memory world for exercising the pool: a flat entity map with
/// frame ticking and an out-of-band destruction path.
pub struct SandboxWorld {
    next_handle: u64,
    entities: HashMap<EntityHandle, SandboxEntity>,
    destruction_subscribers: HashSet<EntityHandle>,
}

impl SandboxWorld {
    pub fn new() -> Self {
        SandboxWorld {
            next_handle: 0,
            entities: HashMap::new(),
            destruction_subscribers: HashSet::new(),
        }
    }

    /// Advances every active entity one frame and returns the handles whose
    /// lifetime expired this frame.
    pub fn tick(&mut self) -> Vec<EntityHandle> {
        let mut expired = Vec::new();
        for (&handle, entity) in self.entities.iter_mut() {
            if entity.hidden || !entity.update_enabled {
                continue;
            }
            entity.position += entity.velocity;
            if entity.lifetime > 0 {
                entity.lifetime -= 1;
                if entity.lifetime == 0 {
                    expired.push(handle);
                }
            }
        }
        expired
    }

    /// Destroys an entity outside pool control. Returns whether anyone had
    /// subscribed to this instance's destruction signal and should be
    /// notified.
    pub fn force_destroy(&mut self, handle: EntityHandle) -> bool {
        self.entities.remove(&handle);
        self.destruction_subscribers.contains(&handle)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

impl EntityHost for SandboxWorld {
    fn spawn(&mut self, type_id: EntityTypeId, position: Vec3) -> Option<EntityHandle> {
        if !matches!(type_id, PROJECTILE | SPARK) {
            log::warn!("Refusing to spawn unknown entity type {type_id}");
            return None;
        }

        self.next_handle += 1;
        let handle = EntityHandle(self.next_handle);
        self.entities.insert(
            handle,
            SandboxEntity {
                type_id,
                position,
                velocity: Vec3::ZERO,
                hidden: false,
                update_enabled: true,
                lifetime: 0,
                seed: handle.0,
            },
        );
        Some(handle)
    }

    fn is_alive(&self, handle: EntityHandle) -> bool {
        self.entities.contains_key(&handle)
    }

    fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut dyn PoolEntity> {
        self.entities
            .get_mut(&handle)
            .map(|entity| entity as &mut dyn PoolEntity)
    }

    fn set_position(&mut self, handle: EntityHandle, position: Vec3) {
        if let Some(entity) = self.entities.get_mut(&handle) {
            entity.position = position;
        }
    }

    fn set_hidden(&mut self, handle: EntityHandle, hidden: bool) {
        if let Some(entity) = self.entities.get_mut(&handle) {
            entity.hidden = hidden;
        }
    }

    fn set_update_enabled(&mut self, handle: EntityHandle, enabled: bool) {
        if let Some(entity) = self.entities.get_mut(&handle) {
            entity.update_enabled = enabled;
        }
    }

    fn subscribe_destroyed(&mut self, handle: EntityHandle) {
        self.destruction_subscribers.insert(handle);
    }

    fn unsubscribe_destroyed(&mut self, handle: EntityHandle) {
        self.destruction_subscribers.remove(&handle);
    }
}
