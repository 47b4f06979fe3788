mod common;

use chain::MINIMAL_CONFIG;
use common::*;
use containers::{
    BlockProcessingError, BlsSignature, Bytes32, DepositInvalid, DepositProof, Epoch,
    ValidatorIndex,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

const MAX: u64 = 32_000_000_000;

#[rstest]
#[case(1)]
#[case(4)]
#[case(10)]
fn genesis_registers_and_activates_all(#[case] count: u64) {
    let (state, tree) = genesis_with(&MINIMAL_CONFIG, count);

    assert_eq!(state.validator_count(), count);
    assert_eq!(state.deposit_index, count);
    assert_eq!(tree.len() as u64, count);
    for index in 0..count {
        let validator = state.validators.get(index).unwrap();
        assert_eq!(validator.activation_epoch, Epoch(0));
        assert_eq!(validator.effective_balance, MAX);
        assert_eq!(state.balance(ValidatorIndex(index)).unwrap(), MAX);
    }
}

#[test]
fn new_deposit_appends_validator() {
    let (mut state, mut tree) = genesis_with(&MINIMAL_CONFIG, 10);
    let deposit = deposit_for(&mut tree, deposit_data(&MINIMAL_CONFIG, 10, MAX));
    sync_eth1_data(&mut state, &tree);

    state.process_deposit(&deposit, &MINIMAL_CONFIG).unwrap();

    assert_eq!(state.validator_count(), 11);
    assert_eq!(state.deposit_index, 11);
    let validator = state.validators.get(10).unwrap();
    assert_eq!(validator.pubkey, pubkey(10));
    assert_eq!(validator.activation_epoch, Epoch(u64::MAX));
    assert_eq!(state.balance(ValidatorIndex(10)).unwrap(), MAX);
}

#[test]
fn known_pubkey_tops_up_balance() {
    let (mut state, mut tree) = genesis_with(&MINIMAL_CONFIG, 10);
    let deposit = deposit_for(&mut tree, deposit_data(&MINIMAL_CONFIG, 3, MAX));
    sync_eth1_data(&mut state, &tree);

    state.process_deposit(&deposit, &MINIMAL_CONFIG).unwrap();

    assert_eq!(state.validator_count(), 10);
    assert_eq!(state.balance(ValidatorIndex(3)).unwrap(), 2 * MAX);
    assert_eq!(state.deposit_index, 11);
}

#[test]
fn effective_balance_is_rounded_down_and_capped() {
    let (mut state, mut tree) = genesis_with(&MINIMAL_CONFIG, 2);
    let deposit = deposit_for(&mut tree, deposit_data(&MINIMAL_CONFIG, 2, 1_500_000_000));
    sync_eth1_data(&mut state, &tree);

    state.process_deposit(&deposit, &MINIMAL_CONFIG).unwrap();

    assert_eq!(state.validators.get(2).unwrap().effective_balance, 1_000_000_000);
    assert_eq!(state.balance(ValidatorIndex(2)).unwrap(), 1_500_000_000);
}

#[test]
fn out_of_order_index_is_rejected() {
    let (mut state, mut tree) = genesis_with(&MINIMAL_CONFIG, 10);
    let deposit = deposit_for(&mut tree, deposit_data(&MINIMAL_CONFIG, 10, MAX));
    sync_eth1_data(&mut state, &tree);
    state.deposit_index = 9;
    let before = state.clone();

    let error = state.process_deposit(&deposit, &MINIMAL_CONFIG).unwrap_err();

    assert_eq!(
        error,
        BlockProcessingError::DepositInvalid(DepositInvalid::BadIndex { state: 9, deposit: 10 })
    );
    assert_eq!(state, before);
}

#[test]
fn zeroed_proof_element_is_rejected() {
    let (mut state, mut tree) = genesis_with(&MINIMAL_CONFIG, 10);
    let mut deposit = deposit_for(&mut tree, deposit_data(&MINIMAL_CONFIG, 10, MAX));
    sync_eth1_data(&mut state, &tree);

    let mut branch: Vec<Bytes32> = deposit.proof.iter().copied().collect();
    *branch.last_mut().unwrap() = Bytes32::zero();
    deposit.proof = DepositProof::try_from_iter(branch).unwrap();

    let error = state.process_deposit(&deposit, &MINIMAL_CONFIG).unwrap_err();
    assert!(error.is_invalid_operation());
    assert_eq!(
        error,
        BlockProcessingError::DepositInvalid(DepositInvalid::BadMerkleProof { index: 10 })
    );
}

#[test]
fn stale_eth1_root_is_rejected() {
    let (mut state, mut tree) = genesis_with(&MINIMAL_CONFIG, 10);
    let deposit = deposit_for(&mut tree, deposit_data(&MINIMAL_CONFIG, 10, MAX));
    // eth1 data still points at the genesis tree

    assert!(matches!(
        state.process_deposit(&deposit, &MINIMAL_CONFIG),
        Err(BlockProcessingError::DepositInvalid(DepositInvalid::BadMerkleProof { .. }))
    ));
}

#[test]
fn bad_proof_of_possession_is_skipped() {
    let (mut state, mut tree) = genesis_with(&MINIMAL_CONFIG, 10);
    let mut data = deposit_data(&MINIMAL_CONFIG, 10, MAX);
    data.signature = BlsSignature::default();
    let deposit = deposit_for(&mut tree, data);
    sync_eth1_data(&mut state, &tree);

    state.process_deposit(&deposit, &MINIMAL_CONFIG).unwrap();

    assert_eq!(state.validator_count(), 10);
    assert_eq!(state.deposit_index, 11);
}

#[test]
fn state_yaml_round_trips() {
    let (state, _) = genesis_with(&MINIMAL_CONFIG, 3);
    let yaml = serde_yaml::to_string(&state).unwrap();
    let back: containers::State = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, state);
}
