//! Edge-case harness: bind a state-transition operation to a prepared
//! state and input, run it, and capture the pre state, input and post state
//! (or the expected failure) as a test-vector record.

pub mod case;
pub mod encode;
pub mod harness;
pub mod replay;
pub mod suite;

pub use case::{register, CaseDefinition, CaseEntry, Operation, OperationError, Registration};
pub use encode::{EncodeError, Encoded};
pub use harness::{execute, EncodedCaseRecord, HarnessError};
pub use replay::{load_ssz_case, load_yaml_cases, read_snappy_compressed, replay, ReplayError, TestCase};
pub use suite::{Suite, SuiteOutput};
