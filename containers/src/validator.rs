use crate::{BlsPublicKey, Bytes32, Epoch, Gwei};
use serde::{Deserialize, Serialize};
use ssz_derive::Ssz;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Ssz, Serialize, Deserialize)]
pub struct Validator {
    pub pubkey: BlsPublicKey,
    pub withdrawal_credentials: Bytes32,
    pub activation_eligibility_epoch: Epoch,
    pub activation_epoch: Epoch,
    pub exit_epoch: Epoch,
    pub withdrawable_epoch: Epoch,
    pub slashed: bool,
    pub effective_balance: Gwei,
}
