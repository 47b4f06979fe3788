use crate::case::{Operation, OperationError};
use crate::suite::{input_file_stem, Suite, SSZ_SNAPPY_EXTENSION};
use anyhow::{anyhow, Context};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use snap::raw::Decoder;
use ssz::SszReadDefault;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// A decoded case as a conformance runner sees it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestCase<S, I> {
    /// The recorded description for YAML suites. SSZ case directories do not
    /// store it, so cases from [`load_ssz_case`] carry the directory name.
    pub description: String,
    pub pre: S,
    pub data: I,
    pub post: Option<S>,
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("case '{description}': post state does not match")]
    NotEqual { description: String },
    #[error("case '{description}': operation should have failed")]
    DidntFail { description: String },
    #[error("case '{description}': operation failed unexpectedly: {reason}")]
    UnexpectedFailure { description: String, reason: String },
}

/// Apply `operation` to the case's pre state and check it against the
/// recorded outcome. Returns the resulting state.
pub fn replay<S, I, E>(case: TestCase<S, I>, operation: &Operation<S, I, E>) -> Result<S, ReplayError>
where
    S: PartialEq,
    E: fmt::Display,
{
    let TestCase {
        description,
        mut pre,
        data,
        post,
    } = case;

    let outcome = operation(&mut pre, &data);

    match (outcome, post) {
        (Ok(()), Some(expected)) if expected == pre => Ok(pre),
        (Ok(()), Some(_)) => Err(ReplayError::NotEqual { description }),
        (Ok(()), None) => Err(ReplayError::DidntFail { description }),
        (Err(OperationError::Rejected(_)), None) => Ok(pre),
        (Err(error), _) => Err(ReplayError::UnexpectedFailure {
            description,
            reason: error.to_string(),
        }),
    }
}

pub fn load_yaml_cases<S, I>(path: &Path) -> anyhow::Result<Suite<TestCase<S, I>>>
where
    S: DeserializeOwned,
    I: DeserializeOwned,
{
    let file = fs::File::open(path).with_context(|| format!("Missing suite {}", path.display()))?;
    serde_yaml::from_reader(file).with_context(|| format!("Invalid suite {}", path.display()))
}

/// Load a case directory written by [`crate::SuiteOutput::write_ssz_cases`].
///
/// The description is the case directory name, e.g. `invalid_deposit_index`,
/// not the original free-text description.
pub fn load_ssz_case<S, I>(case_dir: &Path, input_type: &str) -> anyhow::Result<TestCase<S, I>>
where
    S: SszReadDefault,
    I: SszReadDefault,
{
    let description = case_dir
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("Invalid case directory {}", case_dir.display()))?
        .to_owned();

    let file = |stem: &str| case_dir.join(format!("{stem}.{SSZ_SNAPPY_EXTENSION}"));

    let pre = decode(&file("pre"))?;
    let data = decode(&file(&input_file_stem(input_type)))?;
    let post_path = file("post");
    let post = if post_path.exists() {
        Some(decode(&post_path)?)
    } else {
        None
    };

    Ok(TestCase {
        description,
        pre,
        data,
        post,
    })
}

fn decode<T: SszReadDefault>(path: &Path) -> anyhow::Result<T> {
    let bytes = read_snappy_compressed(path)?;
    T::from_ssz_default(&bytes).map_err(|e| anyhow!("Invalid ssz in {}: {:?}", path.display(), e))
}

pub fn read_snappy_compressed(path: &Path) -> anyhow::Result<Vec<u8>> {
    let ssz_snappy = fs::read(path).with_context(|| format!("Missing {}", path.display()))?;
    let mut decoder = Decoder::new();
    decoder
        .decompress_vec(&ssz_snappy)
        .map_err(|e| anyhow!("Failed to decompress {}: {:?}", path.display(), e))
}
