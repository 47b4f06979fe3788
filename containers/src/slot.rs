use chain::ChainConfig;
use serde::{Deserialize, Serialize};
use ssz_derive::Ssz;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Ssz, Default, Serialize, Deserialize)]
#[ssz(transparent)]
pub struct Slot(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Ssz, Default, Serialize, Deserialize)]
#[ssz(transparent)]
pub struct Epoch(pub u64);

impl Slot {
    pub fn epoch(self, config: &ChainConfig) -> Epoch {
        Epoch(config.compute_epoch_at_slot(self.0))
    }
}

impl Epoch {
    pub fn genesis(config: &ChainConfig) -> Self {
        Epoch(config.genesis_epoch)
    }

    pub fn far_future(config: &ChainConfig) -> Self {
        Epoch(config.far_future_epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain::{MAINNET_CONFIG, MINIMAL_CONFIG};

    #[test]
    fn slot_to_epoch_follows_preset() {
        assert_eq!(Slot(15).epoch(&MINIMAL_CONFIG), Epoch(1));
        assert_eq!(Slot(15).epoch(&MAINNET_CONFIG), Epoch(0));
        assert_eq!(Slot(64).epoch(&MAINNET_CONFIG), Epoch(1));
    }

    #[test]
    fn far_future_is_max() {
        assert_eq!(Epoch::far_future(&MINIMAL_CONFIG), Epoch(u64::MAX));
        assert!(Epoch::genesis(&MINIMAL_CONFIG) < Epoch::far_future(&MINIMAL_CONFIG));
    }
}
