use crate::fixed_bytes::FixedBytes;
use blst::min_pk::PublicKey;
use blst::BLST_ERROR;

pub const PUBLIC_KEY_SIZE: usize = 48;

/// Compressed BLS12-381 G1 public key.
pub type BlsPublicKey = FixedBytes<PUBLIC_KEY_SIZE>;

impl BlsPublicKey {
    pub fn from_blst(public_key: &PublicKey) -> Self {
        Self::new(public_key.compress())
    }

    /// Decompress and subgroup-check the key.
    pub fn decompress(&self) -> Result<PublicKey, BLST_ERROR> {
        let public_key = PublicKey::uncompress(&self.inner)?;
        public_key.validate()?;
        Ok(public_key)
    }

    pub fn fingerprint_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.inner[..6]))
    }
}
