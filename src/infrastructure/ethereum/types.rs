//! Receipt parsing and hex quantity helpers
//!
//! Receipts are parsed from raw JSON rather than a typed RPC struct so the
//! client works against RSK nodes whose receipt shape predates newer
//! mainnet fields.

use std::str::FromStr;

use alloy::primitives::{Address, B256};

use crate::error::{GatewayError, GatewayResult};

/// The node's record of a mined transaction's outcome.
///
/// Fetched on demand, never cached by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    /// Present only for contract-creation transactions
    pub contract_address: Option<Address>,
    /// Execution status as reported by the node; absent on nodes that
    /// predate status reporting
    pub status: Option<u64>,
}

/// Parse a raw `eth_getTransactionReceipt` JSON object.
pub(crate) fn parse_receipt(json: &serde_json::Value) -> GatewayResult<TransactionReceipt> {
    let hash_str = json
        .get("transactionHash")
        .and_then(|v| v.as_str())
        .ok_or_else(|| GatewayError::Decode("receipt missing transactionHash".to_string()))?;
    let transaction_hash = B256::from_str(hash_str)
        .map_err(|err| GatewayError::Decode(format!("bad receipt transactionHash: {err}")))?;

    let contract_address = match json.get("contractAddress").and_then(|v| v.as_str()) {
        Some(addr) => Some(
            Address::from_str(addr)
                .map_err(|err| GatewayError::Decode(format!("bad receipt contractAddress: {err}")))?,
        ),
        None => None,
    };

    let status = match json.get("status").and_then(|v| v.as_str()) {
        Some(status) => Some(parse_hex_u64(status)?),
        None => None,
    };

    Ok(TransactionReceipt {
        transaction_hash,
        contract_address,
        status,
    })
}

/// Parse a 0x-prefixed hex quantity to u64
pub(crate) fn parse_hex_u64(s: &str) -> GatewayResult<u64> {
    let payload = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(payload, 16)
        .map_err(|err| GatewayError::Decode(format!("bad hex quantity '{s}': {err}")))
}
