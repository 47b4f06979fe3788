use thiserror::Error;

/// Reasons a deposit is rejected by the state transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepositInvalid {
    #[error("deposit index {deposit} does not match state deposit index {state}")]
    BadIndex { state: u64, deposit: u64 },
    #[error("merkle proof for deposit {index} does not match the eth1 deposit root")]
    BadMerkleProof { index: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockProcessingError {
    #[error("invalid deposit: {0}")]
    DepositInvalid(#[from] DepositInvalid),
    #[error("ssz error: {0}")]
    Ssz(String),
    #[error("arithmetic overflow")]
    ArithOverflow,
    #[error("validator registry is full: {0}")]
    RegistryFull(String),
    #[error("unknown validator index {0}")]
    UnknownValidator(u64),
}

impl BlockProcessingError {
    /// Whether the error rejects the operation itself, as opposed to an
    /// internal failure while applying it.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, BlockProcessingError::DepositInvalid(_))
    }
}

impl From<ssz::WriteError> for BlockProcessingError {
    fn from(error: ssz::WriteError) -> Self {
        BlockProcessingError::Ssz(format!("{error:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_deposit_rejections_are_invalid_operations() {
        let rejected: BlockProcessingError = DepositInvalid::BadIndex { state: 10, deposit: 9 }.into();
        assert!(rejected.is_invalid_operation());
        assert!(!BlockProcessingError::ArithOverflow.is_invalid_operation());
        assert!(!BlockProcessingError::UnknownValidator(3).is_invalid_operation());
    }

    #[test]
    fn messages_name_the_indices() {
        let error = BlockProcessingError::from(DepositInvalid::BadIndex { state: 10, deposit: 9 });
        assert_eq!(
            error.to_string(),
            "invalid deposit: deposit index 9 does not match state deposit index 10"
        );
    }
}
