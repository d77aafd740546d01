pub mod rpc;

pub use rpc::{parse_commitment, RpcLedger};
