use serde::{Serialize, Serializer};
use ssz::SszWrite;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("yaml encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("ssz encoding failed: {0}")]
    Ssz(String),
}

/// A value captured in both suite encodings: the structured YAML form and the
/// SSZ bytes. Serializes as the YAML form only.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    pub yaml: serde_yaml::Value,
    pub ssz: Vec<u8>,
}

impl Encoded {
    pub fn of<T: Serialize + SszWrite>(value: &T) -> Result<Self, EncodeError> {
        Ok(Self {
            yaml: serde_yaml::to_value(value)?,
            ssz: value
                .to_ssz()
                .map_err(|e| EncodeError::Ssz(format!("{e:?}")))?,
        })
    }
}

impl Serialize for Encoded {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.yaml.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encoding_is_deterministic() {
        let a = Encoded::of(&42u64).unwrap();
        let b = Encoded::of(&42u64).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.ssz, 42u64.to_le_bytes().to_vec());
        assert_eq!(a.yaml, serde_yaml::Value::from(42u64));
    }

    #[test]
    fn serializes_yaml_form_only() {
        let encoded = Encoded::of(&7u64).unwrap();
        assert_eq!(serde_yaml::to_string(&encoded).unwrap(), "7\n");
    }
}
