//! ABI domain models and contracts
//!
//! This module defines the types and trait for contract-call encoding and
//! result decoding, independent of the underlying implementation
//! (alloy-dyn-abi).

mod codec;
mod interface;

pub use codec::{AbiCodec, DecodedValue};
pub use interface::{ContractInterface, FunctionSpec, ParamSpec};
