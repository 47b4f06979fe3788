use crate::GeneratorContext;
use anyhow::{anyhow, ensure};
use containers::ssz::H256;
use containers::{
    Bytes32, Deposit, DepositData, DepositProof, DepositTree, Epoch, Eth1Data, Fork, State,
    DEPOSIT_CONTRACT_TREE_DEPTH,
};
use tracing::debug;
use validator::sign_deposit_data;

/// Full-balance deposits for keys `0..count`, each proven against the tree
/// of all `count` leaves.
pub fn create_deposits(ctx: &GeneratorContext, count: u64) -> anyhow::Result<Vec<Deposit>> {
    let config = &ctx.config;
    let fork = Fork::genesis(config);
    let epoch = Epoch::genesis(config);

    let datas = (0..count)
        .map(|index| {
            sign_deposit_data(&ctx.keys, index, config.max_effective_balance, &fork, epoch, config)
                .map_err(|e| anyhow!("Failed to sign genesis deposit {index}: {e}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let leaves = datas.iter().map(leaf).collect::<anyhow::Result<Vec<H256>>>()?;
    let tree = DepositTree::from_leaves(leaves, DEPOSIT_CONTRACT_TREE_DEPTH);

    datas
        .into_iter()
        .enumerate()
        .map(|(index, data)| {
            let (_, proof) = tree.generate_proof(index);
            Ok(Deposit {
                proof: proof_vector(proof)?,
                index: index as u64,
                data,
            })
        })
        .collect()
}

/// Genesis state built from `deposits`, with eth1 data pointing at their tree.
pub fn create_genesis_state(ctx: &GeneratorContext, deposits: &[Deposit]) -> anyhow::Result<State> {
    let tree = DepositTree::from_leaves(deposit_leaves(deposits)?, DEPOSIT_CONTRACT_TREE_DEPTH);

    let eth1_data = Eth1Data {
        deposit_root: Bytes32(tree.root()),
        deposit_count: deposits.len() as u64,
        block_hash: Bytes32::zero(),
    };

    let state = State::initialize_from_deposits(&ctx.config, 0, eth1_data, deposits)?;
    ensure!(
        state.validator_count() == deposits.len() as u64,
        "Genesis registered {} of {} deposits",
        state.validator_count(),
        deposits.len()
    );

    debug!(
        validators = state.validator_count(),
        deposit_root = %eth1_data.deposit_root,
        "Built genesis state"
    );
    Ok(state)
}

pub fn deposit_leaves(deposits: &[Deposit]) -> anyhow::Result<Vec<H256>> {
    deposits.iter().map(|deposit| leaf(&deposit.data)).collect()
}

pub(crate) fn leaf(data: &DepositData) -> anyhow::Result<H256> {
    data.leaf()
        .map(|leaf| leaf.0)
        .map_err(|e| anyhow!("Failed to serialize deposit data: {e:?}"))
}

pub(crate) fn proof_vector(proof: Vec<H256>) -> anyhow::Result<DepositProof> {
    DepositProof::try_from_iter(proof.into_iter().map(Bytes32))
        .map_err(|e| anyhow!("Deposit proof has the wrong length: {e:?}"))
}
