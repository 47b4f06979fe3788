use chain::ChainConfig;
use containers::{get_domain, BlsSignature, DepositData, Epoch, Fork, Gwei};

pub mod keys;

pub use keys::Keyring;

/// Build a `DepositData` for validator `index` carrying a valid proof of
/// possession under the deposit domain of `fork` at `epoch`.
pub fn sign_deposit_data(
    keys: &Keyring,
    index: u64,
    amount: Gwei,
    fork: &Fork,
    epoch: Epoch,
    config: &ChainConfig,
) -> Result<DepositData, Box<dyn std::error::Error>> {
    let mut data = DepositData {
        pubkey: keys.pubkey(index)?,
        withdrawal_credentials: keys.bls_withdrawal_credentials(index, config)?,
        amount,
        signature: BlsSignature::default(),
    };

    let domain = get_domain(fork, epoch, config.domain_deposit);
    data.signature = keys.sign(index, data.signing_root(domain))?;

    Ok(data)
}
