use crate::case::{CaseDefinition, OperationError};
use crate::encode::{EncodeError, Encoded};
use serde::Serialize;
use ssz::SszWrite;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError<E: std::error::Error + 'static> {
    #[error("case '{description}' was expected to fail but the operation succeeded")]
    UnexpectedSuccess { description: String },
    #[error("case '{description}' failed")]
    Operation {
        description: String,
        #[source]
        source: E,
    },
    #[error("case '{description}' could not be encoded")]
    Encoding {
        description: String,
        #[source]
        source: EncodeError,
    },
}

/// Captured result of one executed case.
///
/// `post` is `None` for expected-error cases and is written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedCaseRecord {
    pub description: String,
    pub pre: Encoded,
    pub data: Encoded,
    pub post: Option<Encoded>,
    #[serde(skip)]
    pub case_name: String,
    #[serde(skip)]
    pub input_type: &'static str,
}

impl EncodedCaseRecord {
    pub fn expects_error(&self) -> bool {
        self.post.is_none()
    }
}

/// Run a case and record it.
///
/// The pre state is encoded before the operation mutates it. With
/// `expect_error` set, only a [`OperationError::Rejected`] counts as the
/// expected outcome: success becomes [`HarnessError::UnexpectedSuccess`] and
/// a fault is propagated. Without it, every error is propagated.
pub fn execute<S, I, E>(case: CaseDefinition<S, I, E>) -> Result<EncodedCaseRecord, HarnessError<E>>
where
    S: Serialize + SszWrite,
    I: Serialize + SszWrite,
    E: std::error::Error + 'static,
{
    let CaseDefinition {
        description,
        input_type,
        mut state,
        input,
        operation,
        expect_error,
    } = case;

    let pre = encode(&state, &description)?;
    let data = encode(&input, &description)?;

    let outcome = operation(&mut state, &input);

    let post = if expect_error {
        match outcome {
            Err(OperationError::Rejected(_)) => None,
            Err(OperationError::Fault(source)) => {
                return Err(HarnessError::Operation {
                    description,
                    source,
                })
            }
            Ok(()) => return Err(HarnessError::UnexpectedSuccess { description }),
        }
    } else {
        if let Err(error) = outcome {
            return Err(HarnessError::Operation {
                description,
                source: error.into_inner(),
            });
        }
        Some(encode(&state, &description)?)
    };

    Ok(EncodedCaseRecord {
        case_name: case_name(&description),
        description,
        pre,
        data,
        post,
        input_type,
    })
}

fn encode<T, E>(value: &T, description: &str) -> Result<Encoded, HarnessError<E>>
where
    T: Serialize + SszWrite,
    E: std::error::Error + 'static,
{
    Encoded::of(value).map_err(|source| HarnessError::Encoding {
        description: description.to_owned(),
        source,
    })
}

/// File-system safe name for a case description.
pub fn case_name(description: &str) -> String {
    let mut name = String::with_capacity(description.len());
    for c in description.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
        } else if !name.ends_with('_') {
            name.push('_');
        }
    }
    name.trim_matches('_').to_owned()
}
