//! ABI codec trait and decoded-value types

use alloy_primitives::Bytes;

use crate::domain::abi::ContractInterface;
use crate::error::GatewayResult;

/// A decoded return value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedValue {
    /// Canonical Solidity type (e.g., "address", "uint256")
    pub kind: String,
    /// String form of the value, lossless
    pub value: String,
}

/// Trait for ABI call encoding and result decoding.
///
/// Abstracts over the actual ABI implementation (alloy-dyn-abi) so the
/// gateway operations depend only on the interface.
pub trait AbiCodec: Send + Sync {
    /// Encode a function call: 4-byte selector followed by the ABI-encoded
    /// arguments.
    ///
    /// Arguments arrive as strings from the request boundary and are coerced
    /// to the declared parameter types. Fails with `UnknownFunction`,
    /// `ArityMismatch`, or `TypeMismatch`.
    fn encode_call(
        &self,
        interface: &ContractInterface,
        function_name: &str,
        args: &[&str],
    ) -> GatewayResult<Bytes>;

    /// Decode a raw `eth_call` result against the function's declared return
    /// types. Fails with `DecodeError` on malformed or short input.
    fn decode_result(
        &self,
        interface: &ContractInterface,
        function_name: &str,
        raw: &[u8],
    ) -> GatewayResult<Vec<DecodedValue>>;
}
