pub mod builder;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod instruction;
pub mod log;
pub mod state;
pub mod transaction;
pub mod utils;

pub use client::*;
pub use config::*;
pub use error::*;
pub use instruction::*;
pub use log::*;
pub use state::*;
