use crate::merkle::hash;
use crate::signing::compute_signing_root;
use crate::{BlsPublicKey, BlsSignature, Bytes32, Gwei};
use serde::{Deserialize, Serialize};
use ssz::{ContiguousVector, SszWrite};
use ssz_derive::Ssz;
use typenum::U32;

/// Depth of the deposit contract's incremental Merkle tree.
pub const DEPOSIT_CONTRACT_TREE_DEPTH: usize = 32;

pub type DepositProof = ContiguousVector<Bytes32, U32>;

/// Eth1 chain data the beacon state has voted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Ssz, Default, Serialize, Deserialize)]
pub struct Eth1Data {
    pub deposit_root: Bytes32,
    pub deposit_count: u64,
    pub block_hash: Bytes32,
}

/// The signed part of [`DepositData`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Ssz, Default, Serialize, Deserialize)]
pub struct DepositMessage {
    pub pubkey: BlsPublicKey,
    pub withdrawal_credentials: Bytes32,
    pub amount: Gwei,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Ssz, Default, Serialize, Deserialize)]
pub struct DepositData {
    pub pubkey: BlsPublicKey,
    pub withdrawal_credentials: Bytes32,
    pub amount: Gwei,
    /// Proof of possession over the [`DepositMessage`] signing root.
    pub signature: BlsSignature,
}

impl DepositData {
    pub fn message(&self) -> DepositMessage {
        DepositMessage {
            pubkey: self.pubkey,
            withdrawal_credentials: self.withdrawal_credentials,
            amount: self.amount,
        }
    }

    pub fn signing_root(&self, domain: Bytes32) -> Bytes32 {
        compute_signing_root(&self.message(), domain)
    }

    /// Deposit tree leaf: the hash of the serialized deposit data.
    pub fn leaf(&self) -> Result<Bytes32, ssz::WriteError> {
        let bytes = self.to_ssz()?;
        Ok(Bytes32(hash(&bytes)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Ssz, Serialize, Deserialize)]
pub struct Deposit {
    /// Merkle branch of `data`'s leaf, bottom-up.
    pub proof: DepositProof,
    pub index: u64,
    pub data: DepositData,
}
