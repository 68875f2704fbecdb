use std::path::Path;

use anyhow::Context;
use pool::settings::PoolSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SandboxConfig {
    pub frames: u32,
    pub pool: PoolSettings,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        SandboxConfig {
            frames: 120,
            pool: PoolSettings::default(),
        }
    }
}

impl SandboxConfig {
    const PATH: &'static str = "sandbox.ron";

    pub fn load() -> anyhow::Result<Self> {
        let path = Path::new(Self::PATH);
        if !path.exists() {
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {path:?}"))?;
        if data.is_empty() {
            return Ok(Self::default());
        }

        let config: SandboxConfig = ron::from_str(&data)
            .with_context(|| format!("Failed to parse config from {path:?}"))?;
        if !config.pool.is_valid() {
            anyhow::bail!("Invalid pool settings in {path:?}");
        }
        Ok(config)
    }
}
