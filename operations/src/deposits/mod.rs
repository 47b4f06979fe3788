pub mod cases;
pub mod helpers;

pub use cases::{deposit_cases, full_deposits_suite, mini_deposits_suite, process_deposit_operation};
pub use helpers::{build_deposit, build_deposit_data, build_deposit_for_index};
