//! Structured remote error.
//!
//! Wallets and ledgers report failures as JSON-RPC style objects with the
//! human-readable reason nested under an `error` field:
//!
//! ```text
//! { "error": { "code": 4001, "message": "User denied transaction signature." } }
//! ```
//!
//! Any ledger client must produce (or adapt into) this shape.

use core::fmt;

use serde::{Deserialize, Serialize};

/// EIP-1193 code for a request the user rejected in the wallet.
const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC code conventionally used for contract reverts.
const EXECUTION_REVERTED_CODE: i64 = 3;

/// Error reported by the remote ledger or the wallet in front of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    /// The nested error payload.
    pub error: RemoteErrorBody,
}

/// Payload of a [`RemoteError`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteErrorBody {
    /// Numeric error code, if the source provided one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Human-readable reason.
    pub message: String,
    /// Extra data attached by the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl RemoteError {
    /// Create an error with an optional code and a reason.
    pub fn new(code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            error: RemoteErrorBody {
                code,
                message: message.into(),
                data: None,
            },
        }
    }

    /// The user rejected the request in the wallet.
    pub fn user_rejected() -> Self {
        Self::new(Some(USER_REJECTED_CODE), "User denied transaction signature.")
    }

    /// The contract reverted with `reason`.
    pub fn reverted(reason: impl Into<String>) -> Self {
        Self::new(Some(EXECUTION_REVERTED_CODE), reason)
    }

    /// Attach extra data.
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.error.data = Some(data.into());
        self
    }

    /// The human-readable reason, verbatim.
    pub fn reason(&self) -> &str {
        &self.error.message
    }

    /// The error code, if any.
    pub fn code(&self) -> Option<i64> {
        self.error.code
    }

    /// Whether the user rejected the request.
    pub fn is_user_rejection(&self) -> bool {
        self.error.code == Some(USER_REJECTED_CODE)
    }

    /// Adapt a JSON error payload received from a wallet.
    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error.message)
    }
}

impl std::error::Error for RemoteError {}
