//! ABI codec implementation using alloy-dyn-abi

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, Bytes, FixedBytes, I256, U256};

use crate::domain::abi::{AbiCodec, ContractInterface, DecodedValue, FunctionSpec, ParamSpec};
use crate::error::{GatewayError, GatewayResult};

/// ABI codec implementation using alloy-dyn-abi.
///
/// Arguments arrive as strings from the request boundary; each is coerced to
/// its declared Solidity type before encoding. Return data is decoded against
/// the function's declared output types and rendered losslessly.
pub struct DynAbiCodec;

impl AbiCodec for DynAbiCodec {
    fn encode_call(
        &self,
        interface: &ContractInterface,
        function_name: &str,
        args: &[&str],
    ) -> GatewayResult<Bytes> {
        let function = interface.function(function_name)?;

        if args.len() != function.inputs.len() {
            return Err(GatewayError::ArityMismatch {
                function: function.signature.clone(),
                expected: function.inputs.len(),
                actual: args.len(),
            });
        }

        let mut calldata = function.selector.to_vec();

        if !function.inputs.is_empty() {
            let values = coerce_arguments(function, args)?;
            // Wrap values in a tuple for proper encoding
            let tuple_value = DynSolValue::Tuple(values);
            calldata.extend_from_slice(&tuple_value.abi_encode_params());
        }

        Ok(calldata.into())
    }

    fn decode_result(
        &self,
        interface: &ContractInterface,
        function_name: &str,
        raw: &[u8],
    ) -> GatewayResult<Vec<DecodedValue>> {
        let function = interface.function(function_name)?;

        let types: Vec<DynSolType> = function
            .outputs
            .iter()
            .map(|kind| parse_type(kind))
            .collect::<GatewayResult<Vec<_>>>()?;

        if types.is_empty() {
            if raw.is_empty() {
                return Ok(Vec::new());
            }
            return Err(GatewayError::Decode(format!(
                "{} returns nothing but got {} byte(s)",
                function.signature,
                raw.len()
            )));
        }

        let tuple_type = DynSolType::Tuple(types);
        let decoded = tuple_type.abi_decode(raw).map_err(|err| {
            GatewayError::Decode(format!("bad return data for {}: {err}", function.signature))
        })?;

        let values = match decoded {
            DynSolValue::Tuple(values) => values,
            other => vec![other],
        };

        Ok(function
            .outputs
            .iter()
            .zip(values.iter())
            .map(|(kind, value)| DecodedValue {
                kind: kind.clone(),
                value: format_value(value),
            })
            .collect())
    }
}

/// Parse a canonical Solidity type string
fn parse_type(kind: &str) -> GatewayResult<DynSolType> {
    kind.parse::<DynSolType>()
        .map_err(|err| GatewayError::Validation(format!("unsupported abi type '{kind}': {err}")))
}

/// Coerce string arguments to the function's declared parameter types
fn coerce_arguments(function: &FunctionSpec, args: &[&str]) -> GatewayResult<Vec<DynSolValue>> {
    function
        .inputs
        .iter()
        .zip(args.iter())
        .enumerate()
        .map(|(idx, (param, arg))| {
            let ty = parse_type(&param.kind)?;
            coerce_value(&ty, arg).map_err(|reason| GatewayError::TypeMismatch {
                param: param_label(param, idx),
                ty: param.kind.clone(),
                reason,
            })
        })
        .collect()
}

fn param_label(param: &ParamSpec, idx: usize) -> String {
    if param.name.trim().is_empty() {
        format!("arg{idx}")
    } else {
        param.name.clone()
    }
}

/// Coerce a single string value to its declared type
fn coerce_value(ty: &DynSolType, arg: &str) -> Result<DynSolValue, String> {
    match ty {
        DynSolType::Address => {
            let addr = arg.trim().to_lowercase();
            let addr = addr.strip_prefix("0x").unwrap_or(&addr);

            if addr.len() != 40 || !addr.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err("expected 40 hex characters".to_string());
            }

            let bytes = hex::decode(addr).map_err(|e| format!("invalid hex: {e}"))?;
            let mut array = [0u8; 20];
            array.copy_from_slice(&bytes);

            Ok(DynSolValue::Address(Address::from(array)))
        }

        DynSolType::Bool => {
            let value = match arg.to_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => return Err(format!("expected true/false, got '{arg}'")),
            };
            Ok(DynSolValue::Bool(value))
        }

        DynSolType::Int(size) => {
            let value = if arg.starts_with("0x") || arg.starts_with("0X") {
                let bytes = hex_to_word(&arg[2..])?;
                I256::from_be_bytes(bytes)
            } else {
                arg.parse::<I256>().map_err(|e| format!("invalid integer: {e}"))?
            };
            Ok(DynSolValue::Int(value, *size))
        }

        DynSolType::Uint(size) => {
            let value = if arg.starts_with("0x") || arg.starts_with("0X") {
                let bytes = hex_to_word(&arg[2..])?;
                U256::from_be_bytes(bytes)
            } else {
                arg.parse::<U256>()
                    .map_err(|e| format!("invalid unsigned integer: {e}"))?
            };
            Ok(DynSolValue::Uint(value, *size))
        }

        DynSolType::Bytes => {
            let hex_str = arg.strip_prefix("0x").unwrap_or(arg);
            let bytes = hex::decode(hex_str).map_err(|e| format!("invalid hex: {e}"))?;
            Ok(DynSolValue::Bytes(bytes))
        }

        DynSolType::FixedBytes(size) => {
            let hex_str = arg.strip_prefix("0x").unwrap_or(arg);
            let bytes = hex::decode(hex_str).map_err(|e| format!("invalid hex: {e}"))?;

            if bytes.len() != *size {
                return Err(format!("expected {} bytes, got {}", size, bytes.len()));
            }

            Ok(DynSolValue::FixedBytes(
                FixedBytes::from_slice(&bytes),
                *size,
            ))
        }

        DynSolType::String => {
            // Remove surrounding quotes if present
            let s = if (arg.starts_with('"') && arg.ends_with('"') && arg.len() >= 2)
                || (arg.starts_with('\'') && arg.ends_with('\'') && arg.len() >= 2)
            {
                &arg[1..arg.len() - 1]
            } else {
                arg
            };
            Ok(DynSolValue::String(s.to_string()))
        }

        DynSolType::Array(inner_ty) => {
            let elements = split_bracketed(arg, '[', ']')?;
            let mut values = Vec::new();
            for elem in elements {
                values.push(coerce_value(inner_ty, elem)?);
            }
            Ok(DynSolValue::Array(values))
        }

        DynSolType::FixedArray(inner_ty, size) => {
            let elements = split_bracketed(arg, '[', ']')?;
            if elements.len() != *size {
                return Err(format!(
                    "fixed array expects {} elements, got {}",
                    size,
                    elements.len()
                ));
            }

            let mut values = Vec::new();
            for elem in elements {
                values.push(coerce_value(inner_ty, elem)?);
            }
            Ok(DynSolValue::FixedArray(values))
        }

        DynSolType::Tuple(types) => {
            let elements = split_bracketed(arg, '(', ')')?;
            if elements.len() != types.len() {
                return Err(format!(
                    "tuple expects {} elements, got {}",
                    types.len(),
                    elements.len()
                ));
            }

            let mut values = Vec::new();
            for (ty, elem) in types.iter().zip(elements.iter()) {
                values.push(coerce_value(ty, elem)?);
            }
            Ok(DynSolValue::Tuple(values))
        }

        _ => Err(format!("unsupported type: {ty:?}")),
    }
}

/// Split a bracketed list like "[a,b,c]" or "(a,b)" into trimmed elements
fn split_bracketed(arg: &str, open: char, close: char) -> Result<Vec<&str>, String> {
    let trimmed = arg.trim();
    if !trimmed.starts_with(open) || !trimmed.ends_with(close) {
        return Err(format!("expected a {open}…{close} enclosed list"));
    }

    let inner = &trimmed[open.len_utf8()..trimmed.len() - close.len_utf8()];
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(inner.split(',').map(|s| s.trim()).collect())
}

/// Left-pad a hex string into a 32-byte word
fn hex_to_word(hex_str: &str) -> Result<[u8; 32], String> {
    let bytes = hex::decode(hex_str).map_err(|e| format!("invalid hex: {e}"))?;
    if bytes.len() > 32 {
        return Err(format!("value too large: {} bytes", bytes.len()));
    }

    let mut word = [0u8; 32];
    word[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(word)
}

/// Format a decoded value losslessly
fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::FixedBytes(word, size) => {
            let bytes = &word.as_slice()[..(*size).min(32)];
            format!("0x{}", hex::encode(bytes))
        }
        DynSolValue::Address(addr) => format!("{addr:?}"),
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Array(arr) | DynSolValue::FixedArray(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            format!("[{}]", items.join(", "))
        }
        DynSolValue::Tuple(fields) => {
            let items: Vec<String> = fields.iter().map(format_value).collect();
            format!("({})", items.join(", "))
        }
    }
}
