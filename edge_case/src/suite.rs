use crate::harness::EncodedCaseRecord;
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use snap::raw::Encoder;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SSZ_SNAPPY_EXTENSION: &str = "ssz_snappy";

/// A rendered test suite document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite<C> {
    pub title: String,
    pub summary: String,
    pub forks_timeline: String,
    pub forks: Vec<String>,
    pub config: String,
    pub runner: String,
    pub handler: String,
    pub test_cases: Vec<C>,
}

/// A suite plus where it goes: `<directory>/<name>.yaml`.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteOutput {
    pub name: String,
    pub directory: String,
    pub suite: Suite<EncodedCaseRecord>,
}

impl SuiteOutput {
    pub fn write_yaml(&self, output_dir: &Path) -> anyhow::Result<PathBuf> {
        let dir = output_dir.join(&self.directory);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create suite directory {}", dir.display()))?;

        let path = dir.join(format!("{}.yaml", self.name));
        let file = fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_yaml::to_writer(file, &self.suite)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(
            suite = %self.name,
            cases = self.suite.test_cases.len(),
            path = %path.display(),
            "Wrote yaml suite"
        );
        Ok(path)
    }

    /// Write every case as snappy-compressed SSZ files under
    /// `<config>/<fork>/<runner>/<handler>/<case>/`, returning the case
    /// directories. Expected-error cases have no `post` file.
    pub fn write_ssz_cases(&self, output_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let suite = &self.suite;

        let mut names = HashSet::new();
        for case in &suite.test_cases {
            ensure!(
                names.insert(case.case_name.as_str()),
                "Duplicate case name '{}' in suite {}",
                case.case_name,
                self.name
            );
        }

        let mut case_dirs = Vec::new();
        for fork in &suite.forks {
            let handler_dir = output_dir
                .join(&suite.config)
                .join(fork)
                .join(&suite.runner)
                .join(&suite.handler);

            for case in &suite.test_cases {
                let case_dir = handler_dir.join(&case.case_name);
                fs::create_dir_all(&case_dir)
                    .with_context(|| format!("Failed to create {}", case_dir.display()))?;

                write_snappy_compressed(&case_dir.join(ssz_file("pre")), &case.pre.ssz)?;
                write_snappy_compressed(
                    &case_dir.join(ssz_file(&input_file_stem(case.input_type))),
                    &case.data.ssz,
                )?;
                if let Some(post) = &case.post {
                    write_snappy_compressed(&case_dir.join(ssz_file("post")), &post.ssz)?;
                }

                debug!(case = %case.case_name, fork = %fork, "Wrote ssz case");
                case_dirs.push(case_dir);
            }
        }

        info!(
            suite = %self.name,
            cases = case_dirs.len(),
            root = %output_dir.display(),
            "Wrote ssz cases"
        );
        Ok(case_dirs)
    }
}

fn ssz_file(stem: &str) -> String {
    format!("{stem}.{SSZ_SNAPPY_EXTENSION}")
}

/// `Deposit` -> `deposit`, `VoluntaryExit` -> `voluntary_exit`.
pub fn input_file_stem(input_type: &str) -> String {
    let mut stem = String::with_capacity(input_type.len() + 4);
    for (i, c) in input_type.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                stem.push('_');
            }
            stem.push(c.to_ascii_lowercase());
        } else {
            stem.push(c);
        }
    }
    stem
}

pub fn write_snappy_compressed(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let compressed = Encoder::new()
        .compress_vec(bytes)
        .with_context(|| format!("Failed to compress {}", path.display()))?;
    fs::write(path, compressed).with_context(|| format!("Failed to write {}", path.display()))
}
