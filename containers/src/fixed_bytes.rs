use serde::{Deserialize, Deserializer, Serialize, Serializer};
use crate::merkle::hash_concat;
use ssz::{ReadError, Size, SszHash, SszRead, SszSize, SszWrite, WriteError, H256};
use std::fmt;

const BYTES_PER_CHUNK: usize = 32;

/// Fixed-length SSZ byte vector.
///
/// Public keys, signatures and fork versions are all `ByteVector[N]` on the
/// wire; this wrapper gives them one SSZ, hashing and hex serde implementation.
#[derive(PartialEq, Clone, Eq, Hash, Copy)]
pub struct FixedBytes<const N: usize> {
    pub inner: [u8; N],
}

impl<const N: usize> FixedBytes<N> {
    pub const fn new(inner: [u8; N]) -> Self {
        Self { inner }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn from_hex<S: AsRef<str>>(s: S) -> Result<Self, hex::FromHexError> {
        let s = s.as_ref();
        let s = s.strip_prefix("0x").unwrap_or(s);

        let mut inner = [0u8; N];
        hex::decode_to_slice(s, &mut inner)?;
        Ok(Self { inner })
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.inner))
    }
}

impl<const N: usize> Default for FixedBytes<N> {
    fn default() -> Self {
        Self { inner: [0u8; N] }
    }
}

impl<const N: usize> From<[u8; N]> for FixedBytes<N> {
    fn from(inner: [u8; N]) -> Self {
        Self { inner }
    }
}

impl<const N: usize> fmt::Debug for FixedBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl<const N: usize> SszSize for FixedBytes<N> {
    const SIZE: Size = Size::Fixed { size: N };
}

impl<const N: usize> SszWrite for FixedBytes<N> {
    fn write_fixed(&self, bytes: &mut [u8]) {
        bytes[..N].copy_from_slice(&self.inner);
    }

    fn write_variable(&self, bytes: &mut Vec<u8>) -> Result<(), WriteError> {
        bytes.extend_from_slice(&self.inner);
        Ok(())
    }

    fn to_ssz(&self) -> Result<Vec<u8>, WriteError> {
        Ok(self.inner.to_vec())
    }
}

impl<C, const N: usize> SszRead<C> for FixedBytes<N> {
    fn from_ssz_unchecked(_context: &C, bytes: &[u8]) -> Result<Self, ReadError> {
        if bytes.len() != N {
            return Err(ReadError::FixedSizeMismatch {
                expected: N,
                actual: bytes.len(),
            });
        }

        let mut inner = [0u8; N];
        inner.copy_from_slice(bytes);

        Ok(Self { inner })
    }
}

impl<const N: usize> SszHash for FixedBytes<N> {
    type PackingFactor = typenum::U1;

    fn hash_tree_root(&self) -> H256 {
        merkleize_bytes(&self.inner)
    }
}

/// Merkleize `bytes` as right-zero-padded 32-byte chunks, padded up to a
/// power-of-two chunk count.
fn merkleize_bytes(bytes: &[u8]) -> H256 {
    let chunk_count = bytes.len().div_ceil(BYTES_PER_CHUNK).max(1);
    let mut layer: Vec<[u8; BYTES_PER_CHUNK]> = (0..chunk_count.next_power_of_two())
        .map(|i| {
            let mut chunk = [0u8; BYTES_PER_CHUNK];
            let start = i * BYTES_PER_CHUNK;
            if start < bytes.len() {
                let end = (start + BYTES_PER_CHUNK).min(bytes.len());
                chunk[..end - start].copy_from_slice(&bytes[start..end]);
            }
            chunk
        })
        .collect();

    while layer.len() > 1 {
        layer = layer
            .chunks(2)
            .map(|pair| hash_concat(H256::from(pair[0]), H256::from(pair[1])).to_fixed_bytes())
            .collect();
    }

    H256::from(layer[0])
}

impl<const N: usize> Serialize for FixedBytes<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de, const N: usize> Deserialize<'de> for FixedBytes<N> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let result: String = Deserialize::deserialize(deserializer)?;
        Self::from_hex(&result).map_err(serde::de::Error::custom)
    }
}
