//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - The Alloy-based node client implementation
//! - ABI call encoding/result decoding using alloy-dyn-abi

pub mod abi;
pub mod ethereum;

pub use abi::DynAbiCodec;
pub use ethereum::{AlloyNodeClient, NodeClient, TransactionReceipt};
