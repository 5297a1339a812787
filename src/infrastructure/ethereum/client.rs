//! Node client abstraction and the Alloy HTTP implementation
//!
//! Every operation is a single request/response round trip. Nothing here
//! retries: `eth_sendRawTransaction` is not idempotent, and a blind retry
//! after an ambiguous failure can double-spend. Retry policy for reads is
//! the caller's decision.

use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{
    fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
    Identity, Provider, ProviderBuilder, RootProvider,
};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::{RpcError, TransportErrorKind};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::infrastructure::ethereum::types::{parse_receipt, TransactionReceipt};

/// Abstract node client trait
///
/// This trait covers the JSON-RPC operations the gateway needs, abstracting
/// over the concrete transport so operations can be exercised against a mock
/// node in tests.
#[async_trait::async_trait]
pub trait NodeClient: Send + Sync {
    /// Get the current block number (`eth_blockNumber`)
    async fn block_number(&self) -> GatewayResult<u64>;

    /// Get the node-managed accounts (`eth_accounts`)
    async fn accounts(&self) -> GatewayResult<Vec<Address>>;

    /// Get an account balance in wei (`eth_getBalance`)
    async fn balance(&self, address: Address) -> GatewayResult<U256>;

    /// Get the sender's next nonce (`eth_getTransactionCount`)
    async fn transaction_count(&self, address: Address) -> GatewayResult<u64>;

    /// Estimate gas for a call or deployment (`eth_estimateGas`)
    async fn estimate_gas(&self, request: TransactionRequest) -> GatewayResult<u64>;

    /// Submit an unsigned transaction for node-side signing
    /// (`eth_sendTransaction`); requires the node to hold the sender's key
    async fn send_transaction(&self, request: TransactionRequest) -> GatewayResult<B256>;

    /// Submit pre-signed raw transaction bytes (`eth_sendRawTransaction`).
    /// Never retried.
    async fn send_raw_transaction(&self, raw: &[u8]) -> GatewayResult<B256>;

    /// Fetch a transaction receipt (`eth_getTransactionReceipt`).
    /// An unknown or unmined hash yields `None`, not an error.
    async fn transaction_receipt(&self, hash: B256) -> GatewayResult<Option<TransactionReceipt>>;

    /// Execute a read-only call (`eth_call`)
    async fn call(&self, request: TransactionRequest) -> GatewayResult<Bytes>;

    /// Get endpoint display name
    fn endpoint_name(&self) -> String;
}

// Type alias for the filled HTTP provider
type HttpFillProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

/// Alloy-backed HTTP client for a single node endpoint.
///
/// Stateless apart from the pooled HTTP transport; safe to share across
/// concurrent operations.
#[derive(Debug)]
pub struct AlloyNodeClient {
    provider: HttpFillProvider,
    endpoint: String,
}

impl AlloyNodeClient {
    /// Connect to an HTTP JSON-RPC endpoint. No request is issued until the
    /// first operation.
    pub fn connect(url: &str) -> GatewayResult<Self> {
        let rpc_url = url
            .parse()
            .map_err(|_| GatewayError::Validation(format!("invalid node url: {url}")))?;
        let provider = ProviderBuilder::new().connect_http(rpc_url);
        Ok(Self {
            provider,
            endpoint: url.to_string(),
        })
    }

    /// Connect to the endpoint named in the gateway configuration.
    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        Self::connect(&config.node_url)
    }
}

#[async_trait::async_trait]
impl NodeClient for AlloyNodeClient {
    async fn block_number(&self) -> GatewayResult<u64> {
        self.provider.get_block_number().await.map_err(map_node_error)
    }

    async fn accounts(&self) -> GatewayResult<Vec<Address>> {
        self.provider.get_accounts().await.map_err(map_node_error)
    }

    async fn balance(&self, address: Address) -> GatewayResult<U256> {
        self.provider.get_balance(address).await.map_err(map_node_error)
    }

    async fn transaction_count(&self, address: Address) -> GatewayResult<u64> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(map_node_error)
    }

    async fn estimate_gas(&self, request: TransactionRequest) -> GatewayResult<u64> {
        self.provider.estimate_gas(request).await.map_err(map_node_error)
    }

    async fn send_transaction(&self, request: TransactionRequest) -> GatewayResult<B256> {
        self.provider
            .raw_request("eth_sendTransaction".into(), (request,))
            .await
            .map_err(map_node_error)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> GatewayResult<B256> {
        let raw_hex = format!("0x{}", hex::encode(raw));
        self.provider
            .raw_request("eth_sendRawTransaction".into(), (raw_hex,))
            .await
            .map_err(map_node_error)
    }

    async fn transaction_receipt(&self, hash: B256) -> GatewayResult<Option<TransactionReceipt>> {
        let json: serde_json::Value = self
            .provider
            .raw_request("eth_getTransactionReceipt".into(), (hash,))
            .await
            .map_err(map_node_error)?;

        if json.is_null() {
            return Ok(None);
        }

        Ok(Some(parse_receipt(&json)?))
    }

    async fn call(&self, request: TransactionRequest) -> GatewayResult<Bytes> {
        self.provider.call(request).await.map_err(map_node_error)
    }

    fn endpoint_name(&self) -> String {
        self.endpoint.clone()
    }
}

/// Map a transport-layer error into the gateway taxonomy.
///
/// A JSON-RPC error object keeps the node's code and message verbatim;
/// anything else (connection refused, timeout, malformed response) is a
/// transport failure.
fn map_node_error(err: RpcError<TransportErrorKind>) -> GatewayError {
    match err {
        RpcError::ErrorResp(payload) => GatewayError::NodeRejected {
            code: payload.code,
            message: payload.message.to_string(),
        },
        other => GatewayError::NodeUnavailable(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::rpc::json_rpc::ErrorPayload;

    #[test]
    fn test_connect_rejects_bad_url() {
        let err = AlloyNodeClient::connect("not a url").unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[test]
    fn test_connect_is_lazy() {
        // No node is listening here; connecting alone must not fail.
        let client = AlloyNodeClient::connect("http://127.0.0.1:4444").unwrap();
        assert_eq!(client.endpoint_name(), "http://127.0.0.1:4444");
    }

    #[test]
    fn test_from_config_uses_configured_endpoint() {
        let config = GatewayConfig::default();
        let client = AlloyNodeClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint_name(), config.node_url);
    }

    #[test]
    fn test_rpc_error_objects_keep_their_code() {
        let payload = ErrorPayload {
            code: -32010,
            message: "nonce too low".into(),
            data: None,
        };

        let mapped = map_node_error(RpcError::ErrorResp(payload));
        match mapped {
            GatewayError::NodeRejected { code, message } => {
                assert_eq!(code, -32010);
                assert_eq!(message, "nonce too low");
            }
            other => panic!("expected NodeRejected, got {other:?}"),
        }
    }

    #[test]
    fn test_transport_failures_map_to_unavailable() {
        let err = RpcError::Transport(TransportErrorKind::BackendGone);
        assert!(matches!(
            map_node_error(err),
            GatewayError::NodeUnavailable(_)
        ));
    }
}
