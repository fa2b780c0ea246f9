//! reqwest-backed [`LedgerNode`].

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{
    BROADCAST_TRANSACTION, BroadcastRequest, BroadcastResponse, LedgerNode,
    TRIGGER_SMART_CONTRACT, TriggerSmartContractRequest, TriggerSmartContractResponse,
};
use crate::config::TransferConfig;
use crate::error::{NodeError, Result, TransferError};

/// Header TronGrid reads the project API key from (`TRON-PRO-API-KEY`).
const API_KEY_HEADER: &str = "tron-pro-api-key";

/// Longest error body kept in a [`NodeError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// TRON full-node HTTP client.
///
/// Every request carries the timeout from [`TransferConfig::timeout`]; no
/// request is ever retried.
#[derive(Clone)]
pub struct HttpNode {
    http_client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for HttpNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpNode")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpNode {
    /// Create a client for the node described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Config`] if the API key is not a valid
    /// header value or the HTTP client cannot be built.
    pub fn new(config: &TransferConfig) -> Result<Self> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &config.api_key {
            let mut value = HeaderValue::from_str(key)
                .map_err(|e| TransferError::config(format!("invalid api key: {e}")))?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransferError::config(format!("failed to build HTTP client: {e}")))?;

        // Url::join drops the last segment unless the base ends with '/'.
        let mut base_url = config.node_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn post<B, T>(&self, endpoint: &'static str, body: &B) -> std::result::Result<T, NodeError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| NodeError::Http(format!("bad endpoint '{endpoint}': {e}")))?;
        debug!(url = %url, "POST");

        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| NodeError::from_reqwest(endpoint, &e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| NodeError::from_reqwest(endpoint, &e))?;

        if !status.is_success() {
            let mut body = String::from_utf8_lossy(&bytes).into_owned();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(NodeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl LedgerNode for HttpNode {
    async fn trigger_smart_contract(
        &self,
        request: &TriggerSmartContractRequest,
    ) -> std::result::Result<TriggerSmartContractResponse, NodeError> {
        self.post(TRIGGER_SMART_CONTRACT, request).await
    }

    async fn broadcast_transaction(
        &self,
        request: &BroadcastRequest<'_>,
    ) -> std::result::Result<BroadcastResponse, NodeError> {
        self.post(BROADCAST_TRANSACTION, request).await
    }
}
