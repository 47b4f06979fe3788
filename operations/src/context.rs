use anyhow::anyhow;
use chain::{ChainConfig, PresetBase};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use validator::Keyring;

/// Everything a case builder needs besides its own parameters.
pub struct GeneratorContext {
    pub config: ChainConfig,
    pub keys: Keyring,
}

impl GeneratorContext {
    pub fn new(config: ChainConfig, key_count: u64) -> anyhow::Result<Arc<Self>> {
        let keys = Keyring::interop(key_count).map_err(|e| anyhow!("Failed to derive keys: {e}"))?;
        Ok(Arc::new(Self { config, keys }))
    }

    /// Use `<configs_path>/<preset>.yaml` when a configs directory is given,
    /// the built-in preset otherwise.
    pub fn for_preset(
        configs_path: Option<&Path>,
        preset: PresetBase,
        key_count: u64,
    ) -> anyhow::Result<Arc<Self>> {
        let config = match configs_path {
            Some(path) => ChainConfig::load_preset(path, preset)
                .map_err(|e| anyhow!("Failed to load {preset} preset: {e}"))?,
            None => ChainConfig::preset(preset),
        };

        info!(preset = %preset, key_count, "Generator context ready");
        Self::new(config, key_count)
    }
}
