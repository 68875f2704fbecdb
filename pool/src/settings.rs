use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::entity::EntityTypeId;

pub const DEFAULT_GROWTH_BATCH: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PoolSettings {
    /// How many instances are spawned when an exhausted pool auto-grows.
    pub growth_batch: usize,
    /// Per-type growth batch, taking precedence over `growth_batch`.
    pub growth_batch_overrides: HashMap<EntityTypeId, usize>,
    /// Where idle instances are parked. Should be far enough off-map that a
    /// parked instance can never be seen or collided with.
    pub parked_position: Vec3,
}

impl Default for PoolSettings {
    fn default() -> Self {
        PoolSettings {
            growth_batch: DEFAULT_GROWTH_BATCH,
            growth_batch_overrides: HashMap::new(),
            parked_position: Vec3::new(0.0, 0.0, 5000.0),
        }
    }
}

impl PoolSettings {
    pub fn growth_batch_for(&self, type_id: EntityTypeId) -> usize {
        self.growth_batch_overrides
            .get(&type_id)
            .copied()
            .unwrap_or(self.growth_batch)
    }

    pub fn is_valid(&self) -> bool {
        self.growth_batch > 0 && self.growth_batch_overrides.values().all(|&batch| batch > 0)
    }
}
