pub mod config;

pub use config::{ChainConfig, PresetBase, MAINNET_CONFIG, MINIMAL_CONFIG};
