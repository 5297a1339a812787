//! Contract interface parsing - function signatures indexed by name

use std::collections::HashMap;

use alloy_json_abi::JsonAbi;
use alloy_primitives::keccak256;

use crate::error::{GatewayError, GatewayResult};

/// A function parameter specification
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Parameter name (may be empty)
    pub name: String,
    /// Canonical Solidity type (e.g., "address", "uint256", "(uint256,address)")
    pub kind: String,
}

/// A callable function and its type signatures
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    /// 4-byte function selector
    pub selector: [u8; 4],
    /// Function name
    pub name: String,
    /// Full canonical signature (e.g., "transfer(address,uint256)")
    pub signature: String,
    /// Input parameters
    pub inputs: Vec<ParamSpec>,
    /// Canonical return types
    pub outputs: Vec<String>,
}

impl FunctionSpec {
    /// Get selector as hex string
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }
}

/// A parsed contract interface, read-only after construction.
///
/// Functions are indexed by name; for overloaded names the first declaration
/// in the ABI wins.
#[derive(Debug, Default, Clone)]
pub struct ContractInterface {
    functions: HashMap<String, FunctionSpec>,
}

impl ContractInterface {
    /// Parse an interface from a JSON ABI string.
    ///
    /// Accepts either a raw ABI array or a compiler artifact with an "abi"
    /// field.
    pub fn parse(json: &str) -> GatewayResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|err| GatewayError::Validation(format!("abi is not valid JSON: {err}")))?;

        let abi_value = if value.is_array() {
            value
        } else if let Some(abi) = value.get("abi") {
            abi.clone()
        } else {
            return Err(GatewayError::Validation(
                "abi must be a JSON array or an object with an 'abi' field".to_string(),
            ));
        };

        let abi: JsonAbi = serde_json::from_value(abi_value)
            .map_err(|err| GatewayError::Validation(format!("malformed abi: {err}")))?;

        let mut functions = HashMap::new();
        for function in abi.functions() {
            let signature = function.signature();
            let selector = compute_selector(&signature);

            let inputs: Vec<ParamSpec> = function
                .inputs
                .iter()
                .map(|input| ParamSpec {
                    name: input.name.clone(),
                    kind: input.selector_type().into_owned(),
                })
                .collect();

            let outputs: Vec<String> = function
                .outputs
                .iter()
                .map(|output| output.selector_type().into_owned())
                .collect();

            let spec = FunctionSpec {
                selector,
                name: function.name.clone(),
                signature,
                inputs,
                outputs,
            };

            functions.entry(spec.name.clone()).or_insert(spec);
        }

        Ok(Self { functions })
    }

    /// Look up a function by name
    pub fn function(&self, name: &str) -> GatewayResult<&FunctionSpec> {
        self.functions
            .get(name)
            .ok_or_else(|| GatewayError::UnknownFunction(name.to_string()))
    }

    /// Get the number of declared functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the interface declares no functions
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Get all functions
    pub fn functions(&self) -> impl Iterator<Item = &FunctionSpec> {
        self.functions.values()
    }
}

/// Compute the 4-byte function selector from a canonical signature
fn compute_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERC20_FRAGMENT: &str = r#"[
        {
            "type": "function",
            "name": "transfer",
            "inputs": [
                {"name": "to", "type": "address"},
                {"name": "amount", "type": "uint256"}
            ],
            "outputs": [{"name": "", "type": "bool"}],
            "stateMutability": "nonpayable"
        },
        {
            "type": "function",
            "name": "balanceOf",
            "inputs": [{"name": "owner", "type": "address"}],
            "outputs": [{"name": "", "type": "uint256"}],
            "stateMutability": "view"
        }
    ]"#;

    #[test]
    fn test_compute_selector() {
        // transfer(address,uint256) -> 0xa9059cbb
        let selector = compute_selector("transfer(address,uint256)");
        assert_eq!(selector, [0xa9, 0x05, 0x9c, 0xbb]);

        // approve(address,uint256) -> 0x095ea7b3
        let selector = compute_selector("approve(address,uint256)");
        assert_eq!(selector, [0x09, 0x5e, 0xa7, 0xb3]);
    }

    #[test]
    fn test_parse_raw_array() {
        let interface = ContractInterface::parse(ERC20_FRAGMENT).unwrap();
        assert_eq!(interface.len(), 2);

        let transfer = interface.function("transfer").unwrap();
        assert_eq!(transfer.signature, "transfer(address,uint256)");
        assert_eq!(transfer.selector, [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(transfer.inputs.len(), 2);
        assert_eq!(transfer.inputs[0].kind, "address");
        assert_eq!(transfer.outputs, vec!["bool".to_string()]);
    }

    #[test]
    fn test_parse_artifact_wrapper() {
        let wrapped = format!(r#"{{"bytecode": "0x00", "abi": {ERC20_FRAGMENT}}}"#);
        let interface = ContractInterface::parse(&wrapped).unwrap();
        assert_eq!(interface.len(), 2);
    }

    #[test]
    fn test_unknown_function() {
        let interface = ContractInterface::parse(ERC20_FRAGMENT).unwrap();
        let err = interface.function("mint").unwrap_err();
        assert!(matches!(err, GatewayError::UnknownFunction(name) if name == "mint"));
    }

    #[test]
    fn test_malformed_json_is_validation_error() {
        let err = ContractInterface::parse("not json").unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));

        let err = ContractInterface::parse(r#"{"no": "abi"}"#).unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }
}
