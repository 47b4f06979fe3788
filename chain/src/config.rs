use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetBase {
    Minimal,
    Mainnet,
}

impl PresetBase {
    pub const fn as_str(self) -> &'static str {
        match self {
            PresetBase::Minimal => "minimal",
            PresetBase::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for PresetBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const GENESIS_SLOT: u64 = 0;
pub const GENESIS_EPOCH: u64 = 0;
pub const FAR_FUTURE_EPOCH: u64 = u64::MAX;
pub const MAX_EFFECTIVE_BALANCE: u64 = 32_000_000_000;
pub const EFFECTIVE_BALANCE_INCREMENT: u64 = 1_000_000_000;
pub const GENESIS_FORK_VERSION: u32 = 0x0000_0000;
pub const DOMAIN_DEPOSIT: u32 = 3;
pub const BLS_WITHDRAWAL_PREFIX: u8 = 0x00;

/// Constants the deposit state transition depends on.
///
/// Presets only differ in epoch length; the remaining values are shared but
/// still overridable from a preset file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ChainConfig {
    pub preset_base: PresetBase,
    pub slots_per_epoch: u64,
    pub genesis_slot: u64,
    pub genesis_epoch: u64,
    pub far_future_epoch: u64,
    pub max_effective_balance: u64,
    pub effective_balance_increment: u64,
    pub genesis_fork_version: u32,
    pub domain_deposit: u32,
    pub bls_withdrawal_prefix: u8,
}

pub const MINIMAL_CONFIG: ChainConfig = ChainConfig {
    preset_base: PresetBase::Minimal,
    slots_per_epoch: 8,
    genesis_slot: GENESIS_SLOT,
    genesis_epoch: GENESIS_EPOCH,
    far_future_epoch: FAR_FUTURE_EPOCH,
    max_effective_balance: MAX_EFFECTIVE_BALANCE,
    effective_balance_increment: EFFECTIVE_BALANCE_INCREMENT,
    genesis_fork_version: GENESIS_FORK_VERSION,
    domain_deposit: DOMAIN_DEPOSIT,
    bls_withdrawal_prefix: BLS_WITHDRAWAL_PREFIX,
};

pub const MAINNET_CONFIG: ChainConfig = ChainConfig {
    preset_base: PresetBase::Mainnet,
    slots_per_epoch: 64,
    genesis_slot: GENESIS_SLOT,
    genesis_epoch: GENESIS_EPOCH,
    far_future_epoch: FAR_FUTURE_EPOCH,
    max_effective_balance: MAX_EFFECTIVE_BALANCE,
    effective_balance_increment: EFFECTIVE_BALANCE_INCREMENT,
    genesis_fork_version: GENESIS_FORK_VERSION,
    domain_deposit: DOMAIN_DEPOSIT,
    bls_withdrawal_prefix: BLS_WITHDRAWAL_PREFIX,
};

impl ChainConfig {
    pub const fn preset(base: PresetBase) -> Self {
        match base {
            PresetBase::Minimal => MINIMAL_CONFIG,
            PresetBase::Mainnet => MAINNET_CONFIG,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the state transition divides by.
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.slots_per_epoch == 0 {
            return Err("SLOTS_PER_EPOCH must be non-zero".into());
        }
        if self.effective_balance_increment == 0 {
            return Err("EFFECTIVE_BALANCE_INCREMENT must be non-zero".into());
        }
        Ok(())
    }

    /// Load `<configs_path>/<preset>.yaml`.
    pub fn load_preset<P: AsRef<Path>>(
        configs_path: P,
        base: PresetBase,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let path = configs_path
            .as_ref()
            .join(format!("{}.yaml", base.as_str()));
        let config = Self::load_from_file(&path)?;

        if config.preset_base != base {
            return Err(format!(
                "Preset file {:?} declares base {}, expected {}",
                path, config.preset_base, base
            )
            .into());
        }

        info!(path = ?path, preset = %base, "Loaded chain preset");
        Ok(config)
    }

    pub fn compute_epoch_at_slot(&self, slot: u64) -> u64 {
        slot / self.slots_per_epoch
    }

    pub fn genesis_fork_version_bytes(&self) -> [u8; 4] {
        self.genesis_fork_version.to_be_bytes()
    }
}
