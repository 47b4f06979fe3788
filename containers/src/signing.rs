use crate::fixed_bytes::FixedBytes;
use crate::{Bytes32, Epoch};
use chain::ChainConfig;
use serde::{Deserialize, Serialize};
use ssz::SszHash;
use ssz_derive::Ssz;

pub type Version = FixedBytes<4>;

/// Fork versions active around `epoch`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Ssz, Default, Serialize, Deserialize)]
pub struct Fork {
    pub previous_version: Version,
    pub current_version: Version,
    pub epoch: Epoch,
}

impl Fork {
    pub fn genesis(config: &ChainConfig) -> Self {
        let version = Version::new(config.genesis_fork_version_bytes());
        Self {
            previous_version: version,
            current_version: version,
            epoch: Epoch::genesis(config),
        }
    }

    pub fn version_at(&self, epoch: Epoch) -> Version {
        if epoch < self.epoch {
            self.previous_version
        } else {
            self.current_version
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Ssz, Default, Serialize, Deserialize)]
pub struct SigningData {
    pub object_root: Bytes32,
    pub domain: Bytes32,
}

/// Domain type (little endian) followed by the fork version, zero padded.
pub fn compute_domain(domain_type: u32, fork_version: Version) -> Bytes32 {
    let mut domain = [0u8; 32];
    domain[..4].copy_from_slice(&domain_type.to_le_bytes());
    domain[4..8].copy_from_slice(fork_version.as_bytes());
    Bytes32::from(domain)
}

pub fn get_domain(fork: &Fork, epoch: Epoch, domain_type: u32) -> Bytes32 {
    compute_domain(domain_type, fork.version_at(epoch))
}

pub fn compute_signing_root<T: SszHash>(object: &T, domain: Bytes32) -> Bytes32 {
    let signing_data = SigningData {
        object_root: Bytes32(object.hash_tree_root()),
        domain,
    };
    Bytes32(signing_data.hash_tree_root())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain::MINIMAL_CONFIG;

    #[test]
    fn domain_layout() {
        let domain = compute_domain(3, Version::new([0xaa, 0xbb, 0xcc, 0xdd]));
        assert_eq!(&domain.as_bytes()[..8], &[3, 0, 0, 0, 0xaa, 0xbb, 0xcc, 0xdd]);
        assert!(domain.as_bytes()[8..].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn fork_picks_version_by_epoch() {
        let fork = Fork {
            previous_version: Version::new([0, 0, 0, 1]),
            current_version: Version::new([0, 0, 0, 2]),
            epoch: Epoch(10),
        };
        assert_eq!(fork.version_at(Epoch(9)), Version::new([0, 0, 0, 1]));
        assert_eq!(fork.version_at(Epoch(10)), Version::new([0, 0, 0, 2]));
    }

    #[test]
    fn signing_root_depends_on_domain() {
        let fork = Fork::genesis(&MINIMAL_CONFIG);
        let object = Bytes32::from([9; 32]);
        let deposit_domain = get_domain(&fork, Epoch(0), 3);
        let other_domain = get_domain(&fork, Epoch(0), 4);
        assert_ne!(
            compute_signing_root(&object, deposit_domain),
            compute_signing_root(&object, other_domain)
        );
    }
}
