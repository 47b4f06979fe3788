pub mod context;
pub mod deposits;
pub mod genesis;

pub use context::GeneratorContext;
pub use deposits::{deposit_cases, full_deposits_suite, mini_deposits_suite};
