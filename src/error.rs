//! Gateway error taxonomy
//!
//! Every fallible operation in the crate returns [`GatewayResult`]. Node-side
//! failures keep the node's original JSON-RPC code and message so callers can
//! debug rejections (stale nonce, insufficient balance) without guesswork.

use serde::Serialize;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Malformed or missing request field. Caller-fixable, never retried.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The contract interface has no function with the requested name.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Argument count differs from the function's declared parameter count.
    #[error("{function} expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// An argument could not be coerced to its declared Solidity type.
    #[error("cannot coerce argument '{param}' to {ty}: {reason}")]
    TypeMismatch {
        param: String,
        ty: String,
        reason: String,
    },

    /// Malformed or truncated ABI-encoded data.
    #[error("decode error: {0}")]
    Decode(String),

    /// The private key is not a valid secp256k1 scalar, or does not match
    /// the declared sender.
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    /// Transport-level failure reaching the node (connection refused,
    /// timeout). Retrying is the caller's decision; writes must not be
    /// retried blindly.
    #[error("node unavailable: {0}")]
    NodeUnavailable(String),

    /// The node accepted the request but rejected it at the JSON-RPC level.
    /// Code and message are the node's own, verbatim.
    #[error("node rejected request (code {code}): {message}")]
    NodeRejected { code: i64, message: String },
}

/// Boundary representation of an error: a human-readable message plus
/// diagnostic detail, serialized for the HTTP layer.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl GatewayError {
    /// Classify whether a retry could ever succeed without caller changes.
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::NodeUnavailable(_))
    }

    pub fn to_body(&self) -> ErrorBody {
        let detail = match self {
            GatewayError::NodeRejected { code, message } => {
                Some(format!("node error code {code}: {message}"))
            }
            GatewayError::TypeMismatch { param, ty, reason } => {
                Some(format!("param '{param}' declared as {ty}: {reason}"))
            }
            _ => None,
        };
        ErrorBody {
            message: self.to_string(),
            detail,
        }
    }
}
