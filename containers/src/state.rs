use crate::errors::{BlockProcessingError, DepositInvalid};
use crate::merkle::verify_merkle_proof;
use crate::signing::{get_domain, Fork};
use crate::{
    BlsPublicKey, Deposit, Epoch, Eth1Data, Gwei, Slot, Validator, ValidatorIndex,
    DEPOSIT_CONTRACT_TREE_DEPTH,
};
use chain::ChainConfig;
use serde::{Deserialize, Serialize};
use ssz::{PersistentList, H256};
use ssz_derive::Ssz;
use typenum::U4096;

pub type Validators = PersistentList<Validator, U4096>;
pub type Balances = PersistentList<Gwei, U4096>;

#[derive(Clone, Debug, PartialEq, Eq, Ssz, Default, Serialize, Deserialize)]
pub struct State {
    // --- versioning ---
    pub genesis_time: u64,
    pub slot: Slot,
    pub fork: Fork,

    // --- registry ---
    pub validators: Validators,
    pub balances: Balances,

    // --- eth1 ---
    pub latest_eth1_data: Eth1Data,
    pub deposit_index: u64,
}

impl State {
    /// An empty registry at the genesis slot.
    pub fn genesis(config: &ChainConfig, genesis_time: u64, eth1_data: Eth1Data) -> Self {
        Self {
            genesis_time,
            slot: Slot(config.genesis_slot),
            fork: Fork::genesis(config),
            validators: Validators::default(),
            balances: Balances::default(),
            latest_eth1_data: eth1_data,
            deposit_index: 0,
        }
    }

    /// Build the genesis state by applying `deposits` in order and activating
    /// every validator that reached the maximum effective balance.
    pub fn initialize_from_deposits(
        config: &ChainConfig,
        genesis_time: u64,
        eth1_data: Eth1Data,
        deposits: &[Deposit],
    ) -> Result<Self, BlockProcessingError> {
        let mut state = Self::genesis(config, genesis_time, eth1_data);

        for deposit in deposits {
            state.process_deposit(deposit, config)?;
        }

        let genesis_epoch = Epoch::genesis(config);
        for index in 0..state.validators.len_u64() {
            let validator = state
                .validators
                .get_mut(index)
                .map_err(|_| BlockProcessingError::UnknownValidator(index))?;
            if validator.effective_balance == config.max_effective_balance {
                validator.activation_eligibility_epoch = genesis_epoch;
                validator.activation_epoch = genesis_epoch;
            }
        }

        Ok(state)
    }

    pub fn current_epoch(&self, config: &ChainConfig) -> Epoch {
        self.slot.epoch(config)
    }

    pub fn validator_count(&self) -> u64 {
        self.validators.len_u64()
    }

    pub fn validator_index(&self, pubkey: &BlsPublicKey) -> Option<ValidatorIndex> {
        (&self.validators)
            .into_iter()
            .position(|validator| validator.pubkey == *pubkey)
            .map(|index| ValidatorIndex(index as u64))
    }

    pub fn balance(&self, index: ValidatorIndex) -> Result<Gwei, BlockProcessingError> {
        self.balances
            .get(index.0)
            .copied()
            .map_err(|_| BlockProcessingError::UnknownValidator(index.0))
    }

    /// Apply a single deposit.
    ///
    /// Deposits must arrive in deposit-contract order and carry a valid
    /// inclusion proof; either failure rejects the deposit. A new validator
    /// whose proof of possession does not verify is skipped without error,
    /// the deposit index still advances.
    pub fn process_deposit(
        &mut self,
        deposit: &Deposit,
        config: &ChainConfig,
    ) -> Result<(), BlockProcessingError> {
        if deposit.index != self.deposit_index {
            return Err(DepositInvalid::BadIndex {
                state: self.deposit_index,
                deposit: deposit.index,
            }
            .into());
        }

        self.verify_deposit_merkle_proof(deposit)?;

        self.deposit_index = self
            .deposit_index
            .checked_add(1)
            .ok_or(BlockProcessingError::ArithOverflow)?;

        let data = &deposit.data;

        if let Some(index) = self.validator_index(&data.pubkey) {
            let balance = self
                .balances
                .get_mut(index.0)
                .map_err(|_| BlockProcessingError::UnknownValidator(index.0))?;
            *balance = balance
                .checked_add(data.amount)
                .ok_or(BlockProcessingError::ArithOverflow)?;
            return Ok(());
        }

        let domain = get_domain(&self.fork, self.current_epoch(config), config.domain_deposit);
        if !data.signature.verify(&data.pubkey, data.signing_root(domain)) {
            return Ok(());
        }

        let far_future = Epoch::far_future(config);
        let effective_balance = (data.amount - data.amount % config.effective_balance_increment)
            .min(config.max_effective_balance);

        let validator = Validator {
            pubkey: data.pubkey,
            withdrawal_credentials: data.withdrawal_credentials,
            activation_eligibility_epoch: far_future,
            activation_epoch: far_future,
            exit_epoch: far_future,
            withdrawable_epoch: far_future,
            slashed: false,
            effective_balance,
        };

        self.validators
            .push(validator)
            .map_err(|e| BlockProcessingError::RegistryFull(format!("{e:?}")))?;
        self.balances
            .push(data.amount)
            .map_err(|e| BlockProcessingError::RegistryFull(format!("{e:?}")))?;

        Ok(())
    }

    fn verify_deposit_merkle_proof(&self, deposit: &Deposit) -> Result<(), BlockProcessingError> {
        let leaf = deposit.data.leaf()?;
        let branch: Vec<H256> = deposit.proof.iter().map(|node| node.0).collect();

        if verify_merkle_proof(
            leaf.0,
            &branch,
            DEPOSIT_CONTRACT_TREE_DEPTH,
            deposit.index as usize,
            self.latest_eth1_data.deposit_root.0,
        ) {
            Ok(())
        } else {
            Err(DepositInvalid::BadMerkleProof {
                index: deposit.index,
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain::MINIMAL_CONFIG;

    #[test]
    fn genesis_state_is_empty() {
        let state = State::genesis(&MINIMAL_CONFIG, 0, Eth1Data::default());
        assert_eq!(state.validator_count(), 0);
        assert_eq!(state.deposit_index, 0);
        assert_eq!(state.current_epoch(&MINIMAL_CONFIG), Epoch(0));
        assert_eq!(state.fork, Fork::genesis(&MINIMAL_CONFIG));
    }

    #[test]
    fn unknown_balance_is_an_error() {
        let state = State::genesis(&MINIMAL_CONFIG, 0, Eth1Data::default());
        assert_eq!(
            state.balance(ValidatorIndex(0)),
            Err(BlockProcessingError::UnknownValidator(0))
        );
    }
}
