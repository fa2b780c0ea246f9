//! Ledger node seam.
//!
//! The pipeline talks to a TRON full node through two HTTP/JSON calls:
//! `/wallet/triggersmartcontract` builds an unsigned transaction and
//! `/wallet/broadcasttransaction` submits the signed one. [`LedgerNode`]
//! abstracts both so the pipeline can run against [`HttpNode`] in production
//! and an in-memory node in tests.
//!
//! Response schemas are typed but permissive: every field is optional and
//! the transaction stages decide which absences are fatal.

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::NodeError;

pub use http::HttpNode;

/// Endpoint path of the construction call.
pub const TRIGGER_SMART_CONTRACT: &str = "wallet/triggersmartcontract";

/// Endpoint path of the broadcast call.
pub const BROADCAST_TRANSACTION: &str = "wallet/broadcasttransaction";

/// A TRON full node reachable over its HTTP API.
#[async_trait]
pub trait LedgerNode: Send + Sync {
    /// Ask the node to materialise an unsigned contract-trigger transaction.
    async fn trigger_smart_contract(
        &self,
        request: &TriggerSmartContractRequest,
    ) -> Result<TriggerSmartContractResponse, NodeError>;

    /// Submit a signed transaction. Not idempotent.
    async fn broadcast_transaction(
        &self,
        request: &BroadcastRequest<'_>,
    ) -> Result<BroadcastResponse, NodeError>;
}

/// Body of `/wallet/triggersmartcontract`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSmartContractRequest {
    /// Sender, base58check.
    pub owner_address: String,
    /// TRC20 contract, base58check.
    pub contract_address: String,
    /// Solidity signature of the called function.
    pub function_selector: String,
    /// Hex of the ABI-encoded arguments, without the selector.
    pub parameter: String,
    /// Energy fee ceiling in sun.
    pub fee_limit: u64,
    /// TRX sent along with the call, in sun.
    pub call_value: u64,
    /// Addresses are in base58check form.
    pub visible: bool,
}

/// Response of `/wallet/triggersmartcontract`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggerSmartContractResponse {
    /// Request-level failure reported by the HTTP API layer.
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    /// Execution status of the constant pre-run.
    #[serde(default)]
    pub result: Option<ReturnStatus>,
    /// The unsigned transaction.
    #[serde(default)]
    pub transaction: Option<NodeTransaction>,
}

/// Status object TRON attaches to construction responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReturnStatus {
    /// `true` when the node accepted the call.
    #[serde(default)]
    pub result: Option<bool>,
    /// Failure code such as `CONTRACT_VALIDATE_ERROR`.
    #[serde(default)]
    pub code: Option<String>,
    /// Failure message, often hex-encoded UTF-8.
    #[serde(default)]
    pub message: Option<String>,
}

/// Transaction object as returned by the node.
///
/// `raw_data` is kept as the exact JSON text the node produced.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeTransaction {
    /// Transaction id: `sha256` of the protobuf-encoded raw data.
    #[serde(rename = "txID", default)]
    pub tx_id: Option<String>,
    /// Raw-data structure, verbatim.
    #[serde(default)]
    pub raw_data: Option<Box<RawValue>>,
    /// Protobuf encoding of the raw data, hex.
    #[serde(default)]
    pub raw_data_hex: Option<String>,
}

/// Body of `/wallet/broadcasttransaction`.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastRequest<'a> {
    /// Transaction id from construction, when known.
    #[serde(rename = "txID", skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<&'a str>,
    /// Raw-data structure exactly as received from construction.
    pub raw_data: &'a RawValue,
    /// Protobuf hex from construction, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data_hex: Option<&'a str>,
    /// One hex-encoded signature.
    pub signature: Vec<String>,
    /// Addresses inside `raw_data` are in base58check form.
    pub visible: bool,
}

/// Response of `/wallet/broadcasttransaction`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BroadcastResponse {
    /// Whether the node accepted the transaction.
    #[serde(default)]
    pub result: Option<bool>,
    /// Id of the accepted transaction.
    #[serde(default)]
    pub txid: Option<String>,
    /// Rejection code such as `SIGERROR` or `DUP_TRANSACTION_ERROR`.
    #[serde(default)]
    pub code: Option<String>,
    /// Rejection message, plain or hex-encoded UTF-8.
    #[serde(default)]
    pub message: Option<String>,
    /// Request-level failure reported by the HTTP API layer.
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

/// Decode a node message that may be hex-encoded UTF-8.
///
/// TRON hex-encodes most failure messages; plain text is passed through.
#[must_use]
pub fn decode_message(message: &str) -> String {
    let trimmed = message.trim();
    if trimmed.len() >= 2
        && let Ok(bytes) = alloy::primitives::hex::decode(trimmed)
        && let Ok(text) = String::from_utf8(bytes)
        && !text.chars().any(char::is_control)
    {
        return text;
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_message() {
        // "insufficient balance"
        assert_eq!(
            decode_message("696e73756666696369656e742062616c616e6365"),
            "insufficient balance"
        );
        assert_eq!(decode_message("insufficient balance"), "insufficient balance");
        assert_eq!(decode_message("beef"), "beef");
        assert_eq!(decode_message(""), "");
    }

    #[test]
    fn test_trigger_response_keeps_raw_data_verbatim() {
        let body = r#"{"result":{"result":true},"transaction":{"visible":true,"txID":"ab","raw_data":{"contract":[{"type":"TriggerSmartContract"}],"ref_block_bytes":"0c1e","expiration":1700000060000},"raw_data_hex":"0a02"}}"#;
        let parsed: TriggerSmartContractResponse = serde_json::from_str(body).unwrap();
        let tx = parsed.transaction.unwrap();
        assert_eq!(
            tx.raw_data.unwrap().get(),
            r#"{"contract":[{"type":"TriggerSmartContract"}],"ref_block_bytes":"0c1e","expiration":1700000060000}"#
        );
        assert_eq!(tx.tx_id.as_deref(), Some("ab"));
        assert_eq!(parsed.result.unwrap().result, Some(true));
    }

    #[test]
    fn test_trigger_error_shapes() {
        let parsed: TriggerSmartContractResponse =
            serde_json::from_str(r#"{"Error":"class org.tron.core.exception.ContractValidateException"}"#)
                .unwrap();
        assert!(parsed.error.is_some());
        assert!(parsed.transaction.is_none());

        let parsed: TriggerSmartContractResponse = serde_json::from_str(
            r#"{"result":{"code":"CONTRACT_VALIDATE_ERROR","message":"6e6f206163636f756e74"}}"#,
        )
        .unwrap();
        let status = parsed.result.unwrap();
        assert_eq!(status.result, None);
        assert_eq!(status.code.as_deref(), Some("CONTRACT_VALIDATE_ERROR"));
    }

    #[test]
    fn test_broadcast_request_shape() {
        let raw = RawValue::from_string(r#"{"expiration":1}"#.to_string()).unwrap();
        let request = BroadcastRequest {
            tx_id: None,
            raw_data: &raw,
            raw_data_hex: None,
            signature: vec!["00ff".into()],
            visible: true,
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"raw_data":{"expiration":1},"signature":["00ff"],"visible":true}"#
        );
    }

    #[test]
    fn test_trigger_request_field_names() {
        let request = TriggerSmartContractRequest {
            owner_address: "TA".into(),
            contract_address: "TB".into(),
            function_selector: "transfer(address,uint256)".into(),
            parameter: "00".into(),
            fee_limit: 1_000_000,
            call_value: 0,
            visible: true,
        };
        let value = serde_json::to_value(&request).unwrap();
        for key in [
            "owner_address",
            "contract_address",
            "function_selector",
            "parameter",
            "fee_limit",
            "call_value",
            "visible",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
