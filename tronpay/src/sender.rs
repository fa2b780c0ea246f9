//! The end-to-end TRC20 transfer pipeline.
//!
//! ```text
//! private key ─► owner address ─┐
//! recipient   ─► TronAddress ───┼─► transfer call ─► build ─► sign ─► broadcast ─► TxId
//! amount      ─► smallest unit ─┘
//! ```
//!
//! Every transfer is an independent unit of work. [`Trc20Sender`] holds only
//! immutable configuration and the node client, so one instance can serve
//! concurrent requests from many tasks.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, info, info_span, warn};

use crate::abi::encode_transfer_call;
use crate::address::TronAddress;
use crate::amount::{format_units, to_smallest_unit};
use crate::config::TransferConfig;
use crate::error::{Result, TransferError};
use crate::node::{HttpNode, LedgerNode};
use crate::tx::{Broadcaster, TransactionBuilder, TransactionSigner, TxId, parse_private_key};

/// A transfer request as handed over by a front-end.
#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Sender private key, hex.
    pub private_key: String,
    /// Recipient, base58check.
    pub to_address: String,
    /// Human-denominated decimal amount.
    pub amount: String,
}

impl std::fmt::Debug for TransferRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferRequest")
            .field("private_key", &"<redacted>")
            .field("to_address", &self.to_address)
            .field("amount", &self.amount)
            .finish()
    }
}

/// Outcome of a transfer in the shape front-ends return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    /// Whether the node accepted the transaction.
    pub success: bool,
    /// Transaction id on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    /// Human-readable failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransferResponse {
    /// A successful response.
    #[must_use]
    pub fn ok(tx_id: impl Into<String>) -> Self {
        Self {
            success: true,
            tx_id: Some(tx_id.into()),
            error: None,
        }
    }

    /// A failed response.
    #[must_use]
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            tx_id: None,
            error: Some(error.into()),
        }
    }
}

impl From<Result<TxId>> for TransferResponse {
    fn from(result: Result<TxId>) -> Self {
        match result {
            Ok(id) => Self::ok(id),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// The sender address controlled by `private_key`.
///
/// # Errors
///
/// Returns [`TransferError::Signing`] for a malformed key.
pub fn owner_address(private_key: &str) -> Result<TronAddress> {
    let key = parse_private_key(private_key)?;
    Ok(TronAddress::from_public_key(key.credential().verifying_key()))
}

/// Sends TRC20 tokens through a TRON node.
///
/// # Examples
///
/// ```rust,ignore
/// let sender = Trc20Sender::new(TransferConfig::default())?;
/// let tx_id = sender
///     .transfer(&private_key, "TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC", "10.5")
///     .await?;
/// ```
#[derive(Debug)]
pub struct Trc20Sender<N = HttpNode> {
    config: TransferConfig,
    node: N,
}

impl Trc20Sender<HttpNode> {
    /// Create a sender talking to `config.node_url` over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Config`] if the HTTP client cannot be built.
    pub fn new(config: TransferConfig) -> Result<Self> {
        let node = HttpNode::new(&config)?;
        Ok(Self { config, node })
    }
}

impl<N: LedgerNode> Trc20Sender<N> {
    /// Create a sender with a custom node implementation.
    #[must_use]
    pub const fn with_node(config: TransferConfig, node: N) -> Self {
        Self { config, node }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// The node client.
    #[must_use]
    pub const fn node(&self) -> &N {
        &self.node
    }

    /// Transfer `amount` tokens to `to`, returning the transaction id.
    ///
    /// All local validation (key, recipient, amount) completes before the
    /// first network call. The broadcast is attempted at most once.
    ///
    /// # Errors
    ///
    /// Any [`TransferError`] kind; see the stage that produced it.
    pub async fn transfer(&self, private_key: &str, to: &str, amount: &str) -> Result<TxId> {
        let key = parse_private_key(private_key)?;
        let owner = TronAddress::from_public_key(key.credential().verifying_key());
        let recipient = TronAddress::decode(to)?;
        let value = to_smallest_unit(amount, self.config.decimals)?;
        if value == U256::ZERO {
            return Err(TransferError::invalid_amount(format!(
                "'{}' is below the smallest unit",
                amount.trim()
            )));
        }

        let span = info_span!(
            "trc20_transfer",
            owner = %owner,
            to = %recipient,
            contract = %self.config.contract,
        );

        async move {
            info!(
                amount = %format_units(value, self.config.decimals),
                smallest_unit = %value,
                "starting transfer",
            );

            let call = encode_transfer_call(&recipient, value);
            let unsigned = TransactionBuilder::new(&self.node)
                .build(&owner, &self.config.contract, &call, self.config.fee_limit)
                .await?;
            let signed = TransactionSigner::new(self.config.signature_format).sign(unsigned, &key)?;
            Broadcaster::new(&self.node).submit(&signed).await
        }
        .instrument(span)
        .await
    }

    /// Run a [`TransferRequest`] and fold the outcome into a
    /// [`TransferResponse`].
    pub async fn handle(&self, request: TransferRequest) -> TransferResponse {
        let result = self
            .transfer(&request.private_key, &request.to_address, &request.amount)
            .await;
        if let Err(e) = &result {
            warn!(error = %e, "transfer failed");
        }
        result.into()
    }
}
