use blst::min_pk::SecretKey;
use chain::ChainConfig;
use containers::signature::DST;
use containers::{BlsPublicKey, BlsSignature, Bytes32};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Upper bound on derived keys, the size of the validator registry.
pub const MAX_INTEROP_KEYS: u64 = 4096;

/// Deterministic BLS keys for generated validators.
///
/// Key `i` uses the secret scalar `i + 1`, so every generator run (and every
/// consumer regenerating keys) sees the same validator set.
pub struct Keyring {
    secret_keys: Vec<SecretKey>,
    public_keys: Vec<BlsPublicKey>,
}

impl Keyring {
    pub fn interop(count: u64) -> Result<Self, Box<dyn std::error::Error>> {
        if count > MAX_INTEROP_KEYS {
            return Err(format!(
                "Requested {count} interop keys, at most {MAX_INTEROP_KEYS} are supported"
            )
            .into());
        }

        let mut secret_keys = Vec::with_capacity(count as usize);
        let mut public_keys = Vec::with_capacity(count as usize);

        for index in 0..count {
            let secret_key = SecretKey::from_bytes(&interop_scalar(index))
                .map_err(|e| format!("Invalid secret key for validator {index}: {e:?}"))?;
            let public_key = BlsPublicKey::from_blst(&secret_key.sk_to_pk());

            debug!(
                validator = index,
                pubkey = %public_key.fingerprint_hex(),
                "Derived interop key"
            );

            secret_keys.push(secret_key);
            public_keys.push(public_key);
        }

        info!(count, "Initialized interop keyring");

        Ok(Keyring {
            secret_keys,
            public_keys,
        })
    }

    pub fn len(&self) -> usize {
        self.secret_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secret_keys.is_empty()
    }

    pub fn pubkey(&self, index: u64) -> Result<BlsPublicKey, Box<dyn std::error::Error>> {
        self.public_keys
            .get(index as usize)
            .copied()
            .ok_or_else(|| self.missing(index))
    }

    /// `sha256(pubkey)` with the first byte replaced by `prefix`.
    pub fn withdrawal_credentials(
        &self,
        index: u64,
        prefix: u8,
    ) -> Result<Bytes32, Box<dyn std::error::Error>> {
        let pubkey = self.pubkey(index)?;
        let mut credentials = Bytes32::from_slice(&Sha256::digest(pubkey.as_bytes()));
        credentials.0.as_bytes_mut()[0] = prefix;
        Ok(credentials)
    }

    pub fn bls_withdrawal_credentials(
        &self,
        index: u64,
        config: &ChainConfig,
    ) -> Result<Bytes32, Box<dyn std::error::Error>> {
        self.withdrawal_credentials(index, config.bls_withdrawal_prefix)
    }

    /// Sign a signing root with validator `index`'s key.
    pub fn sign(
        &self,
        index: u64,
        signing_root: Bytes32,
    ) -> Result<BlsSignature, Box<dyn std::error::Error>> {
        let secret_key = self
            .secret_keys
            .get(index as usize)
            .ok_or_else(|| self.missing(index))?;

        let signature = secret_key.sign(signing_root.as_bytes(), DST, &[]);
        Ok(BlsSignature::from_blst(&signature))
    }

    fn missing(&self, index: u64) -> Box<dyn std::error::Error> {
        format!(
            "No key for validator {} (keyring holds {} keys)",
            index,
            self.len()
        )
        .into()
    }
}

fn interop_scalar(index: u64) -> [u8; 32] {
    let mut scalar = [0u8; 32];
    scalar[24..].copy_from_slice(&(index + 1).to_be_bytes());
    scalar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_is_index_plus_one() {
        let scalar = interop_scalar(0);
        assert_eq!(scalar[31], 1);
        assert!(scalar[..31].iter().all(|byte| *byte == 0));
        assert_eq!(hex::encode(&interop_scalar(255)[30..]), "0100");
    }

    #[test]
    fn test_key_count_is_bounded() {
        assert!(Keyring::interop(MAX_INTEROP_KEYS + 1).is_err());
        assert!(Keyring::interop(u64::MAX).is_err());
        assert!(Keyring::interop(0).unwrap().is_empty());
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let keys = Keyring::interop(2).unwrap();
        assert!(keys.pubkey(2).is_err());
        assert!(keys.sign(5, Bytes32::zero()).is_err());
    }
}
