pub mod types;
pub mod slot;
pub mod fixed_bytes;
pub mod public_key;
pub mod signature;
pub mod signing;
pub mod deposit;
pub mod validator;
pub mod merkle;
pub mod errors;
pub mod state;

pub use deposit::{Deposit, DepositData, DepositMessage, DepositProof, Eth1Data, DEPOSIT_CONTRACT_TREE_DEPTH};
pub use errors::{BlockProcessingError, DepositInvalid};
pub use fixed_bytes::FixedBytes;
pub use merkle::{verify_merkle_proof, DepositTree, MerkleTree};
pub use public_key::BlsPublicKey;
pub use signature::BlsSignature;
pub use signing::{compute_domain, compute_signing_root, get_domain, Fork, SigningData, Version};
pub use slot::{Epoch, Slot};
pub use state::State;
pub use types::{Bytes32, Gwei, ValidatorIndex};
pub use validator::Validator;
pub use ssz;
