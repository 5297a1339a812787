//! Gateway operations
//!
//! One function per operation the HTTP layer exposes. Each call takes the
//! node client by reference, runs end-to-end, and leaves nothing behind on
//! failure. Inputs arrive as the strings the HTTP layer received; outputs
//! are string-encoded hashes, addresses, and quantities.
//!
//! Two signing modes exist:
//! - the online path (`send_transfer`) hands an unsigned transaction to the
//!   node, which must hold the sender's key. Key custody sits with the node.
//! - the offline paths sign locally with a caller-supplied private key; the
//!   key never reaches the node.
//!
//! Nonces for node-assisted builds are read from the node immediately before
//! signing. Two concurrent calls for the same sender can read the same
//! nonce; the gateway does not serialize senders, callers must.

use std::str::FromStr;

use alloy::primitives::{Address, Bytes, TxKind, B256, U256};
use alloy::rpc::types::TransactionRequest;
use tracing::{debug, info};

use crate::domain::abi::{AbiCodec, ContractInterface, DecodedValue};
use crate::domain::tx::{sign, UnsignedTransaction, TRANSFER_GAS_LIMIT};
use crate::domain::KeyPair;
use crate::error::{GatewayError, GatewayResult};
use crate::infrastructure::{DynAbiCodec, NodeClient};

/// Generate a fresh key pair. Purely local; the node never sees it.
pub fn new_account() -> KeyPair {
    KeyPair::generate()
}

/// Current block number
pub async fn block_number(node: &dyn NodeClient) -> GatewayResult<u64> {
    node.block_number().await
}

/// Addresses the node manages itself
pub async fn accounts(node: &dyn NodeClient) -> GatewayResult<Vec<String>> {
    let accounts = node.accounts().await?;
    Ok(accounts.iter().map(|addr| format!("{addr:?}")).collect())
}

/// Balance of an account, hex-encoded wei
pub async fn balance(node: &dyn NodeClient, address: &str) -> GatewayResult<String> {
    let address = parse_address("address", address)?;
    let balance = node.balance(address).await?;
    Ok(format!("0x{balance:x}"))
}

/// Value transfer signed by the node (`eth_sendTransaction`).
///
/// Returns the transaction hash.
pub async fn send_transfer(
    node: &dyn NodeClient,
    sender: &str,
    recipient: &str,
    value: &str,
) -> GatewayResult<String> {
    let sender = parse_address("senderAddress", sender)?;
    let recipient = parse_address("recipientAddress", recipient)?;
    let value = parse_quantity("value", value)?;

    let tx =
        UnsignedTransaction::build_online(node, sender, Some(recipient), value, Bytes::new())
            .await?;
    debug!(nonce = tx.nonce, gas_limit = tx.gas_limit, "assembled online transfer");

    let hash = node.send_transaction(tx.to_request()).await?;
    info!(%sender, %recipient, tx_hash = %hash, "transfer submitted for node-side signing");
    Ok(format!("{hash:?}"))
}

/// Value transfer signed locally and submitted as raw bytes.
///
/// The nonce is read from the node; gas is the fixed transfer cost and the
/// gas price is zero, which is what an RSK regtest node charges.
pub async fn send_offline_transfer(
    node: &dyn NodeClient,
    private_key: &str,
    sender: &str,
    recipient: &str,
    value: &str,
) -> GatewayResult<String> {
    let sender = parse_address("senderAddress", sender)?;
    let recipient = parse_address("recipientAddress", recipient)?;
    let value = parse_quantity("value", value)?;

    let nonce = node.transaction_count(sender).await?;
    let tx = UnsignedTransaction::build_offline(
        sender,
        Some(recipient),
        value,
        nonce,
        0,
        TRANSFER_GAS_LIMIT,
        Bytes::new(),
    );

    let signed = sign(&tx, private_key)?;
    let hash = node.send_raw_transaction(signed.raw()).await?;
    info!(%sender, %recipient, nonce, tx_hash = %hash, "offline transfer submitted");
    Ok(format!("{hash:?}"))
}

/// Deploy a contract from locally signed bytecode.
///
/// Gas is node-estimated unless the caller supplies it. Returns the
/// transaction hash; the contract address comes later from the receipt.
#[allow(clippy::too_many_arguments)]
pub async fn deploy_contract(
    node: &dyn NodeClient,
    private_key: &str,
    sender: &str,
    abi: &str,
    bytecode: &str,
    gas: Option<&str>,
    gas_price: &str,
    value: &str,
) -> GatewayResult<String> {
    let sender = parse_address("senderAddress", sender)?;
    let value = parse_quantity("value", value)?;
    let gas_price = parse_gas_price("gasPrice", gas_price)?;
    let data = parse_data("bytecode", bytecode)?;
    if data.is_empty() {
        return Err(GatewayError::Validation("bytecode is empty".to_string()));
    }

    // The interface is not needed to deploy, but a caller that sends a
    // broken ABI will fail later on every call; reject it up front.
    ContractInterface::parse(abi)?;

    let gas_limit = match gas {
        Some(gas) => parse_gas("gas", gas)?,
        None => {
            let estimate_request = TransactionRequest {
                from: Some(sender),
                input: data.clone().into(),
                value: Some(value),
                ..Default::default()
            };
            node.estimate_gas(estimate_request).await?
        }
    };

    let nonce = node.transaction_count(sender).await?;
    let tx = UnsignedTransaction::build_offline(sender, None, value, nonce, gas_price, gas_limit, data);

    let signed = sign(&tx, private_key)?;
    let hash = node.send_raw_transaction(signed.raw()).await?;
    info!(%sender, nonce, gas_limit, tx_hash = %hash, "contract deployment submitted");
    Ok(format!("{hash:?}"))
}

/// Contract address created by a deployment transaction, if mined.
///
/// An unknown or pending hash yields `Ok(None)`.
pub async fn contract_address(
    node: &dyn NodeClient,
    tx_hash: &str,
) -> GatewayResult<Option<String>> {
    let hash = parse_hash("txHash", tx_hash)?;
    let receipt = node.transaction_receipt(hash).await?;
    Ok(receipt
        .and_then(|receipt| receipt.contract_address)
        .map(|addr| format!("{addr:?}")))
}

/// Read-only contract call (`eth_call`), no state change.
pub async fn call_function(
    node: &dyn NodeClient,
    abi: &str,
    contract: &str,
    function_name: &str,
    args: &[&str],
) -> GatewayResult<Vec<DecodedValue>> {
    let contract = parse_address("contractAddress", contract)?;
    let interface = ContractInterface::parse(abi)?;

    let payload = DynAbiCodec.encode_call(&interface, function_name, args)?;
    let request = TransactionRequest {
        to: Some(TxKind::Call(contract)),
        input: payload.into(),
        ..Default::default()
    };

    let raw = node.call(request).await?;
    DynAbiCodec.decode_result(&interface, function_name, &raw)
}

/// State-changing contract call: encode, sign locally, submit raw.
///
/// Gas is node-estimated against the encoded payload unless the caller
/// supplies it. Returns the transaction hash.
#[allow(clippy::too_many_arguments)]
pub async fn send_function_call(
    node: &dyn NodeClient,
    private_key: &str,
    sender: &str,
    abi: &str,
    contract: &str,
    function_name: &str,
    args: &[&str],
    gas: Option<&str>,
    gas_price: &str,
    value: &str,
) -> GatewayResult<String> {
    let sender = parse_address("senderAddress", sender)?;
    let contract = parse_address("contractAddress", contract)?;
    let gas_price = parse_gas_price("gasPrice", gas_price)?;
    let value = parse_quantity("value", value)?;

    let interface = ContractInterface::parse(abi)?;
    let payload = DynAbiCodec.encode_call(&interface, function_name, args)?;

    let gas_limit = match gas {
        Some(gas) => parse_gas("gas", gas)?,
        None => {
            let estimate_request = TransactionRequest {
                from: Some(sender),
                to: Some(TxKind::Call(contract)),
                input: payload.clone().into(),
                value: Some(value),
                ..Default::default()
            };
            node.estimate_gas(estimate_request).await?
        }
    };

    let nonce = node.transaction_count(sender).await?;
    let tx = UnsignedTransaction::build_offline(
        sender,
        Some(contract),
        value,
        nonce,
        gas_price,
        gas_limit,
        payload,
    );

    let signed = sign(&tx, private_key)?;
    let hash = node.send_raw_transaction(signed.raw()).await?;
    info!(%sender, %contract, function = function_name, tx_hash = %hash, "contract call submitted");
    Ok(format!("{hash:?}"))
}

fn parse_address(field: &str, value: &str) -> GatewayResult<Address> {
    Address::from_str(value.trim())
        .map_err(|_| GatewayError::Validation(format!("{field} is not a valid address: {value}")))
}

fn parse_hash(field: &str, value: &str) -> GatewayResult<B256> {
    B256::from_str(value.trim())
        .map_err(|_| GatewayError::Validation(format!("{field} is not a valid hash: {value}")))
}

/// Parse a quantity, accepting 0x-prefixed hex or plain decimal
fn parse_quantity(field: &str, value: &str) -> GatewayResult<U256> {
    let trimmed = value.trim();
    let parsed = if let Some(hex_part) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        U256::from_str_radix(hex_part, 16)
    } else {
        U256::from_str_radix(trimmed, 10)
    };
    parsed.map_err(|_| GatewayError::Validation(format!("{field} is not a valid quantity: {value}")))
}

fn parse_gas(field: &str, value: &str) -> GatewayResult<u64> {
    let quantity = parse_quantity(field, value)?;
    quantity
        .try_into()
        .map_err(|_| GatewayError::Validation(format!("{field} is out of range: {value}")))
}

fn parse_gas_price(field: &str, value: &str) -> GatewayResult<u128> {
    let quantity = parse_quantity(field, value)?;
    quantity
        .try_into()
        .map_err(|_| GatewayError::Validation(format!("{field} is out of range: {value}")))
}

fn parse_data(field: &str, value: &str) -> GatewayResult<Bytes> {
    let trimmed = value.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(payload)
        .map_err(|err| GatewayError::Validation(format!("{field} is not valid hex: {err}")))?;
    Ok(Bytes::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_hex_and_decimal() {
        assert_eq!(parse_quantity("value", "0x64").unwrap(), U256::from(100));
        assert_eq!(parse_quantity("value", "100").unwrap(), U256::from(100));
        assert!(parse_quantity("value", "ten").is_err());
    }

    #[test]
    fn test_parse_address_rejects_garbage() {
        let err = parse_address("senderAddress", "0x123").unwrap_err();
        assert!(matches!(err, GatewayError::Validation(msg) if msg.contains("senderAddress")));
    }

    #[test]
    fn test_parse_data_accepts_prefixed_and_bare() {
        assert_eq!(parse_data("bytecode", "0x6080").unwrap().as_ref(), &[0x60, 0x80]);
        assert_eq!(parse_data("bytecode", "6080").unwrap().as_ref(), &[0x60, 0x80]);
        assert!(parse_data("bytecode", "0xzz").is_err());
    }

    #[test]
    fn test_new_account_yields_usable_pair() {
        let pair = new_account();
        assert_eq!(pair.public_key.len(), 64);
    }
}
