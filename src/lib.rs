//! Core of an RSK node gateway: transaction construction, signing and
//! submission, plus the contract-call ABI layer.
//!
//! The HTTP surface that fronts this crate is a thin dispatch layer; every
//! operation it exposes maps onto a function in [`gateway`]. The node is
//! reached through the [`NodeClient`] trait so tests and alternative
//! transports can stand in for a live node.
//!
//! ```no_run
//! use rsk_gateway::{gateway, AlloyNodeClient};
//!
//! # async fn run() -> rsk_gateway::GatewayResult<()> {
//! let node = AlloyNodeClient::connect("http://localhost:4444")?;
//! let head = gateway::block_number(&node).await?;
//! println!("block {head}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod infrastructure;

pub use config::GatewayConfig;
pub use domain::abi::{AbiCodec, ContractInterface, DecodedValue, FunctionSpec, ParamSpec};
pub use domain::tx::{sign, SignedTransaction, UnsignedTransaction, TRANSFER_GAS_LIMIT};
pub use domain::KeyPair;
pub use error::{ErrorBody, GatewayError, GatewayResult};
pub use infrastructure::{AlloyNodeClient, DynAbiCodec, NodeClient, TransactionReceipt};
