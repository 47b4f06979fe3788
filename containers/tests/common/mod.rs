use blst::min_pk::SecretKey;
use chain::ChainConfig;
use containers::signature::DST;
use containers::{
    get_domain, BlsPublicKey, BlsSignature, Bytes32, Deposit, DepositData, DepositProof,
    DepositTree, Epoch, Eth1Data, Fork, State, DEPOSIT_CONTRACT_TREE_DEPTH,
};

pub fn secret_key(index: u64) -> SecretKey {
    let mut scalar = [0u8; 32];
    scalar[24..].copy_from_slice(&(index + 1).to_be_bytes());
    SecretKey::from_bytes(&scalar).expect("small scalars are valid keys")
}

pub fn pubkey(index: u64) -> BlsPublicKey {
    BlsPublicKey::from_blst(&secret_key(index).sk_to_pk())
}

pub fn deposit_data(config: &ChainConfig, index: u64, amount: u64) -> DepositData {
    let mut data = DepositData {
        pubkey: pubkey(index),
        withdrawal_credentials: Bytes32::from([index as u8; 32]),
        amount,
        signature: BlsSignature::default(),
    };
    let domain = get_domain(&Fork::genesis(config), Epoch(0), config.domain_deposit);
    let signing_root = data.signing_root(domain);
    data.signature =
        BlsSignature::from_blst(&secret_key(index).sign(signing_root.as_bytes(), DST, &[]));
    data
}

/// Append `data` to `tree` and return a deposit proving it against the new root.
pub fn deposit_for(tree: &mut DepositTree, data: DepositData) -> Deposit {
    let index = tree.push_leaf(data.leaf().unwrap().0);
    let (_, proof) = tree.generate_proof(index);
    Deposit {
        proof: DepositProof::try_from_iter(proof.into_iter().map(Bytes32))
            .expect("proof has tree depth"),
        index: index as u64,
        data,
    }
}

/// Genesis with `count` validators plus the tree over their deposits.
pub fn genesis_with(config: &ChainConfig, count: u64) -> (State, DepositTree) {
    let datas: Vec<_> = (0..count)
        .map(|i| deposit_data(config, i, config.max_effective_balance))
        .collect();
    let tree = DepositTree::from_leaves(
        datas.iter().map(|data| data.leaf().unwrap().0),
        DEPOSIT_CONTRACT_TREE_DEPTH,
    );
    let deposits: Vec<_> = datas
        .into_iter()
        .enumerate()
        .map(|(index, data)| {
            let (_, proof) = tree.generate_proof(index);
            Deposit {
                proof: DepositProof::try_from_iter(proof.into_iter().map(Bytes32)).unwrap(),
                index: index as u64,
                data,
            }
        })
        .collect();
    let eth1_data = Eth1Data {
        deposit_root: Bytes32(tree.root()),
        deposit_count: count,
        block_hash: Bytes32::zero(),
    };
    let state = State::initialize_from_deposits(config, 0, eth1_data, &deposits).unwrap();
    (state, tree)
}

/// Point the state's eth1 data at the current tree.
pub fn sync_eth1_data(state: &mut State, tree: &DepositTree) {
    state.latest_eth1_data.deposit_root = Bytes32(tree.root());
    state.latest_eth1_data.deposit_count = tree.len() as u64;
}
