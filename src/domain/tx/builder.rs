//! Transaction assembly - online (node-assisted) and offline paths

use alloy::consensus::TxLegacy;
use alloy::primitives::{Address, Bytes, TxKind, U256};
use alloy::rpc::types::TransactionRequest;

use crate::error::GatewayResult;
use crate::infrastructure::ethereum::NodeClient;

/// Fixed gas cost of a plain value transfer.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// An assembled, not-yet-signed transaction.
///
/// Field order in the canonical RLP serialization is fixed: nonce, gasPrice,
/// gasLimit, to, value, data, with the chain id folded in when replay
/// protection is enabled. Once handed to the signer the record is treated as
/// immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub sender: Address,
    /// None for contract creation
    pub recipient: Option<Address>,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub nonce: u64,
    pub data: Bytes,
    /// EIP-155 replay protection; None signs a pre-155 legacy transaction
    pub chain_id: Option<u64>,
}

impl UnsignedTransaction {
    /// Pure assembly with every field caller-supplied. No network I/O; the
    /// private key path that follows never touches the node.
    #[allow(clippy::too_many_arguments)]
    pub fn build_offline(
        sender: Address,
        recipient: Option<Address>,
        value: U256,
        nonce: u64,
        gas_price: u128,
        gas_limit: u64,
        data: Bytes,
    ) -> Self {
        Self {
            sender,
            recipient,
            value,
            gas_limit,
            gas_price,
            nonce,
            data,
            chain_id: None,
        }
    }

    /// Node-assisted assembly: the nonce comes from the node's view of the
    /// sender, and anything other than a plain transfer gets node-estimated
    /// gas.
    ///
    /// Two concurrent calls for the same sender can resolve the same nonce;
    /// the gateway does not serialize per-sender nonce acquisition, so
    /// coordination is the caller's responsibility.
    pub async fn build_online(
        node: &dyn NodeClient,
        sender: Address,
        recipient: Option<Address>,
        value: U256,
        data: Bytes,
    ) -> GatewayResult<Self> {
        let nonce = node.transaction_count(sender).await?;

        let gas_limit = if recipient.is_some() && data.is_empty() {
            TRANSFER_GAS_LIMIT
        } else {
            let mut estimate_request = TransactionRequest {
                from: Some(sender),
                value: Some(value),
                input: data.clone().into(),
                ..Default::default()
            };
            if let Some(to) = recipient {
                estimate_request.to = Some(TxKind::Call(to));
            }
            node.estimate_gas(estimate_request).await?
        };

        Ok(Self {
            sender,
            recipient,
            value,
            gas_limit,
            gas_price: 0,
            nonce,
            data,
            chain_id: None,
        })
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn with_chain_id(mut self, chain_id: Option<u64>) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Canonical consensus form, the serialization the signer hashes.
    pub fn to_legacy(&self) -> TxLegacy {
        TxLegacy {
            chain_id: self.chain_id,
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: match self.recipient {
                Some(to) => TxKind::Call(to),
                None => TxKind::Create,
            },
            value: self.value,
            input: self.data.clone(),
        }
    }

    /// RPC request form for `eth_sendTransaction`, where the node itself
    /// holds the signing context for the sender.
    pub fn to_request(&self) -> TransactionRequest {
        let mut request = TransactionRequest {
            from: Some(self.sender),
            value: Some(self.value),
            nonce: Some(self.nonce),
            gas: Some(self.gas_limit),
            gas_price: Some(self.gas_price),
            ..Default::default()
        };
        if let Some(to) = self.recipient {
            request.to = Some(TxKind::Call(to));
        }
        if !self.data.is_empty() {
            request.input = self.data.clone().into();
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_build_offline_is_pure_assembly() {
        let sender = address!("1111111111111111111111111111111111111111");
        let recipient = address!("2222222222222222222222222222222222222222");

        let tx = UnsignedTransaction::build_offline(
            sender,
            Some(recipient),
            U256::from(100),
            0,
            0,
            TRANSFER_GAS_LIMIT,
            Bytes::new(),
        );

        assert_eq!(tx.nonce, 0);
        assert_eq!(tx.gas_limit, 21_000);
        assert_eq!(tx.value, U256::from(100));
        assert_eq!(tx.chain_id, None);
    }

    #[test]
    fn test_to_legacy_field_mapping() {
        let sender = address!("1111111111111111111111111111111111111111");
        let tx = UnsignedTransaction::build_offline(
            sender,
            None,
            U256::ZERO,
            7,
            1_000,
            300_000,
            Bytes::from(vec![0x60, 0x80]),
        )
        .with_chain_id(Some(31));

        let legacy = tx.to_legacy();
        assert_eq!(legacy.nonce, 7);
        assert_eq!(legacy.gas_price, 1_000);
        assert_eq!(legacy.gas_limit, 300_000);
        assert_eq!(legacy.to, TxKind::Create);
        assert_eq!(legacy.chain_id, Some(31));
        assert_eq!(legacy.input.as_ref(), &[0x60, 0x80]);
    }

    #[test]
    fn test_to_request_omits_empty_fields() {
        let sender = address!("1111111111111111111111111111111111111111");
        let recipient = address!("2222222222222222222222222222222222222222");
        let tx = UnsignedTransaction::build_offline(
            sender,
            Some(recipient),
            U256::from(5),
            1,
            0,
            TRANSFER_GAS_LIMIT,
            Bytes::new(),
        );

        let request = tx.to_request();
        assert_eq!(request.from, Some(sender));
        assert_eq!(request.to, Some(TxKind::Call(recipient)));
        assert_eq!(request.input.input, None);
    }
}
