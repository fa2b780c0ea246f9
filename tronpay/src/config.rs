//! Deployment configuration for the transfer pipeline.

use std::time::Duration;

use url::Url;

use crate::address::TronAddress;
use crate::error::{Result, TransferError};

/// Default TronGrid mainnet endpoint.
pub const TRONGRID_MAINNET_URL: &str = "https://api.trongrid.io";

/// USDT TRC20 contract on mainnet.
pub const USDT_CONTRACT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

/// Default energy fee ceiling in sun (1 TRX).
pub const DEFAULT_FEE_LIMIT: u64 = 1_000_000;

/// Decimal precision of USDT on TRON.
pub const DEFAULT_DECIMALS: u8 = 6;

/// Default per-request timeout toward the node.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shape of the signature attached to a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureFormat {
    /// 64 bytes: `r || s`, recovery byte stripped.
    #[default]
    Compact,
    /// 65 bytes: `r || s || v` with `v` in `{0, 1}`.
    Recoverable,
}

impl SignatureFormat {
    /// Signature length in bytes.
    #[must_use]
    pub const fn byte_len(self) -> usize {
        match self {
            Self::Compact => 64,
            Self::Recoverable => 65,
        }
    }
}

/// Configuration for a [`Trc20Sender`](crate::sender::Trc20Sender).
///
/// Build it with [`TransferConfig::builder`]; [`Default`] targets USDT on
/// TronGrid mainnet.
#[derive(Clone)]
pub struct TransferConfig {
    /// Base URL of the full-node HTTP API.
    pub node_url: Url,
    /// TRC20 contract to call.
    pub contract: TronAddress,
    /// Energy fee ceiling in sun.
    pub fee_limit: u64,
    /// Token decimal precision.
    pub decimals: u8,
    /// Timeout applied to each node request.
    pub timeout: Duration,
    /// Optional `TRON-PRO-API-KEY` header value.
    pub api_key: Option<String>,
    /// Recovery-byte policy for broadcast signatures.
    pub signature_format: SignatureFormat,
}

impl std::fmt::Debug for TransferConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferConfig")
            .field("node_url", &self.node_url.as_str())
            .field("contract", &self.contract)
            .field("fee_limit", &self.fee_limit)
            .field("decimals", &self.decimals)
            .field("timeout", &self.timeout)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("signature_format", &self.signature_format)
            .finish()
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            node_url: Url::parse(TRONGRID_MAINNET_URL).expect("default node url is valid"),
            contract: TronAddress::decode(USDT_CONTRACT).expect("default contract is valid"),
            fee_limit: DEFAULT_FEE_LIMIT,
            decimals: DEFAULT_DECIMALS,
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
            signature_format: SignatureFormat::default(),
        }
    }
}

impl TransferConfig {
    /// Create a builder starting from the mainnet USDT defaults.
    #[must_use]
    pub fn builder() -> TransferConfigBuilder {
        TransferConfigBuilder::default()
    }
}

/// Builder for [`TransferConfig`].
///
/// String inputs are validated in [`build`](Self::build), so setters never
/// fail.
///
/// # Examples
///
/// ```rust,ignore
/// let config = TransferConfig::builder()
///     .node_url("https://nile.trongrid.io")
///     .contract("TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf")
///     .fee_limit(30_000_000)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct TransferConfigBuilder {
    node_url: Option<String>,
    contract: Option<String>,
    fee_limit: Option<u64>,
    decimals: Option<u8>,
    timeout: Option<Duration>,
    api_key: Option<String>,
    signature_format: Option<SignatureFormat>,
}

impl TransferConfigBuilder {
    /// Set the node base URL.
    #[must_use]
    pub fn node_url(mut self, url: impl Into<String>) -> Self {
        self.node_url = Some(url.into());
        self
    }

    /// Set the TRC20 contract address (base58check or `41`-prefixed hex).
    #[must_use]
    pub fn contract(mut self, contract: impl Into<String>) -> Self {
        self.contract = Some(contract.into());
        self
    }

    /// Set the energy fee ceiling in sun.
    #[must_use]
    pub const fn fee_limit(mut self, fee_limit: u64) -> Self {
        self.fee_limit = Some(fee_limit);
        self
    }

    /// Set the token decimal precision.
    #[must_use]
    pub const fn decimals(mut self, decimals: u8) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the TronGrid API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the recovery-byte policy.
    #[must_use]
    pub const fn signature_format(mut self, format: SignatureFormat) -> Self {
        self.signature_format = Some(format);
        self
    }

    /// Build the [`TransferConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Config`] for an unparsable or non-HTTP node
    /// URL, a zero timeout or fee limit, and [`TransferError::InvalidAddress`]
    /// for a bad contract address.
    pub fn build(self) -> Result<TransferConfig> {
        let defaults = TransferConfig::default();

        let node_url = match self.node_url {
            Some(raw) => {
                let url = Url::parse(raw.trim())
                    .map_err(|e| TransferError::config(format!("invalid node url '{raw}': {e}")))?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(TransferError::config(format!(
                        "node url must be http(s), got '{}'",
                        url.scheme()
                    )));
                }
                url
            }
            None => defaults.node_url,
        };

        let contract = match self.contract {
            Some(raw) if raw.trim().starts_with("41") => TronAddress::from_hex(&raw)?,
            Some(raw) => TronAddress::decode(&raw)?,
            None => defaults.contract,
        };

        let fee_limit = self.fee_limit.unwrap_or(defaults.fee_limit);
        if fee_limit == 0 {
            return Err(TransferError::config("fee_limit must be positive"));
        }

        let timeout = self.timeout.unwrap_or(defaults.timeout);
        if timeout.is_zero() {
            return Err(TransferError::config("timeout must be positive"));
        }

        Ok(TransferConfig {
            node_url,
            contract,
            fee_limit,
            decimals: self.decimals.unwrap_or(defaults.decimals),
            timeout,
            api_key: self.api_key.filter(|k| !k.trim().is_empty()),
            signature_format: self.signature_format.unwrap_or_default(),
        })
    }
}
