use crate::fixed_bytes::FixedBytes;
use crate::public_key::BlsPublicKey;
use crate::types::Bytes32;
use blst::min_pk::Signature;
use blst::BLST_ERROR;

pub const SIGNATURE_SIZE: usize = 96;

/// Domain separation tag of the proof-of-possession BLS ciphersuite.
pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Compressed BLS12-381 G2 signature.
pub type BlsSignature = FixedBytes<SIGNATURE_SIZE>;

impl BlsSignature {
    pub fn from_blst(signature: &Signature) -> Self {
        Self::new(signature.compress())
    }

    /// Check this signature over `message` against `public_key`.
    /// Undecodable keys or signatures are simply invalid.
    pub fn verify(&self, public_key: &BlsPublicKey, message: Bytes32) -> bool {
        let Ok(public_key) = public_key.decompress() else {
            return false;
        };
        let Ok(signature) = Signature::uncompress(&self.inner) else {
            return false;
        };

        signature.verify(true, message.as_bytes(), DST, &[], &public_key, false)
            == BLST_ERROR::BLST_SUCCESS
    }
}
