//! Ethereum infrastructure - Alloy node client implementation

mod client;
pub(crate) mod types;

pub use client::{AlloyNodeClient, NodeClient};
pub use types::TransactionReceipt;
