//! Error types for TRC20 transfers.
//!
//! Every failure of the pipeline surfaces as a [`TransferError`]. Transport
//! problems talking to the ledger node are captured as a [`NodeError`] first
//! and then folded into the variant of the stage that issued the request.

/// Result type alias for tronpay operations.
pub type Result<T> = std::result::Result<T, TransferError>;

/// The main error type for a transfer.
///
/// All variants are terminal for the request that produced them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TransferError {
    /// The address failed base58check decoding or has the wrong shape.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The amount is empty, negative, or not a plain decimal number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The scaled amount does not fit in a 256-bit word.
    #[error("amount exceeds 2^256-1 smallest units")]
    AmountOverflow,

    /// The private key is malformed or signing failed.
    #[error("signing error: {0}")]
    Signing(String),

    /// The node refused to build the transaction, or could not be reached.
    #[error("failed to create transaction: {0}")]
    RemoteConstruction(String),

    /// The node refused the signed transaction, or could not be reached.
    #[error("broadcast failed: {0}")]
    BroadcastRejected(String),

    /// The configuration is incomplete or inconsistent.
    #[error("config error: {0}")]
    Config(String),
}

impl TransferError {
    /// Create an invalid address error.
    #[must_use]
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::InvalidAddress(msg.into())
    }

    /// Create an invalid amount error.
    #[must_use]
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    /// Create a signing error.
    #[must_use]
    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    /// Create a remote construction error.
    #[must_use]
    pub fn remote_construction(msg: impl Into<String>) -> Self {
        Self::RemoteConstruction(msg.into())
    }

    /// Create a broadcast rejected error.
    #[must_use]
    pub fn broadcast_rejected(msg: impl Into<String>) -> Self {
        Self::BroadcastRejected(msg.into())
    }

    /// Create a config error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the caller could safely repeat the failed operation as is.
    ///
    /// Always `false`: a broadcast may already have reached the ledger, and
    /// the other kinds fail the same way on a second attempt. Recovery means
    /// submitting a fresh transfer request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        false
    }
}

/// Transport-level failure while talking to the ledger node.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum NodeError {
    /// The request exceeded the configured timeout.
    #[error("request to {endpoint} timed out")]
    Timeout {
        /// The endpoint path that timed out.
        endpoint: &'static str,
    },

    /// The node could not be reached.
    #[error("connection to node failed: {0}")]
    Connect(String),

    /// The node answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The response body did not match the expected schema.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Any other HTTP client failure.
    #[error("HTTP error: {0}")]
    Http(String),
}

impl NodeError {
    /// Classify a reqwest error for the given endpoint.
    pub(crate) fn from_reqwest(endpoint: &'static str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { endpoint }
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_decode() {
            Self::Http(format!("failed to read response body: {err}"))
        } else {
            Self::Http(err.to_string())
        }
    }
}
