use crate::genesis::{create_deposits, create_genesis_state, deposit_leaves, leaf, proof_vector};
use crate::GeneratorContext;
use anyhow::{anyhow, ensure};
use containers::{
    verify_merkle_proof, Bytes32, Deposit, DepositData, DepositTree, Gwei, State,
    DEPOSIT_CONTRACT_TREE_DEPTH,
};
use validator::sign_deposit_data;

/// Deposit data for key `index`, signed under the state's current deposit domain.
pub fn build_deposit_data(
    ctx: &GeneratorContext,
    state: &State,
    index: u64,
    amount: Gwei,
) -> anyhow::Result<DepositData> {
    let config = &ctx.config;
    sign_deposit_data(
        &ctx.keys,
        index,
        amount,
        &state.fork,
        state.current_epoch(config),
        config,
    )
    .map_err(|e| anyhow!("Failed to sign deposit for key {index}: {e}"))
}

/// Append a deposit for key `index` to `tree` and prove it against the new root.
pub fn build_deposit(
    ctx: &GeneratorContext,
    state: &State,
    tree: &mut DepositTree,
    index: u64,
    amount: Gwei,
) -> anyhow::Result<Deposit> {
    let data = build_deposit_data(ctx, state, index, amount)?;

    let item = leaf(&data)?;
    let leaf_index = tree.push_leaf(item);
    let (_, proof) = tree.generate_proof(leaf_index);

    ensure!(
        verify_merkle_proof(item, &proof, DEPOSIT_CONTRACT_TREE_DEPTH, leaf_index, tree.root()),
        "Built proof for deposit {leaf_index} does not verify"
    );

    Ok(Deposit {
        proof: proof_vector(proof)?,
        index: leaf_index as u64,
        data,
    })
}

/// Genesis with `initial_validator_count` validators, plus a full-balance
/// deposit for key `index` placed right after the genesis deposits. The
/// state's eth1 data covers the new deposit.
///
/// `index < initial_validator_count` produces a top-up.
pub fn build_deposit_for_index(
    ctx: &GeneratorContext,
    initial_validator_count: u64,
    index: u64,
) -> anyhow::Result<(Deposit, State)> {
    let genesis_deposits = create_deposits(ctx, initial_validator_count)?;
    let mut state = create_genesis_state(ctx, &genesis_deposits)?;

    let mut tree =
        DepositTree::from_leaves(deposit_leaves(&genesis_deposits)?, DEPOSIT_CONTRACT_TREE_DEPTH);

    let deposit = build_deposit(
        ctx,
        &state,
        &mut tree,
        index,
        ctx.config.max_effective_balance,
    )?;

    state.latest_eth1_data.deposit_root = Bytes32(tree.root());
    state.latest_eth1_data.deposit_count = tree.len() as u64;

    Ok((deposit, state))
}
