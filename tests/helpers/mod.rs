pub mod fixtures;
pub mod log_builder;

pub use fixtures::*;
pub use log_builder::*;
pub use mock_ledger::*;
