use tracing::{info, warn};

use super::{SignedTransaction, TxId};
use crate::error::{Result, TransferError};
use crate::node::{BroadcastRequest, LedgerNode, decode_message};

/// Submits signed transactions to the node.
///
/// Submission moves funds and is not idempotent, so a failed submit is
/// reported and never repeated here.
#[derive(Debug)]
pub struct Broadcaster<'a, N: ?Sized> {
    node: &'a N,
}

impl<'a, N: LedgerNode + ?Sized> Broadcaster<'a, N> {
    /// Create a broadcaster backed by `node`.
    #[must_use]
    pub const fn new(node: &'a N) -> Self {
        Self { node }
    }

    /// Submit `signed` and return its transaction id.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::BroadcastRejected`] when the request fails in
    /// transit, the node rejects the transaction, or an accepted response
    /// carries no usable id.
    pub async fn submit(&self, signed: &SignedTransaction) -> Result<TxId> {
        let unsigned = signed.unsigned();
        let request = BroadcastRequest {
            tx_id: unsigned.tx_id(),
            raw_data: unsigned.raw_data(),
            raw_data_hex: unsigned.raw_data_hex(),
            signature: vec![signed.signature_hex()],
            visible: true,
        };

        let response = self
            .node
            .broadcast_transaction(&request)
            .await
            .map_err(|e| TransferError::broadcast_rejected(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(TransferError::broadcast_rejected(decode_message(&error)));
        }

        if response.result != Some(true) {
            let reason = response
                .message
                .as_deref()
                .map(decode_message)
                .filter(|m| !m.is_empty())
                .or_else(|| response.code.clone())
                .unwrap_or_else(|| "node rejected the transaction".to_string());
            warn!(code = response.code.as_deref().unwrap_or("-"), reason = %reason, "broadcast rejected");
            return Err(TransferError::broadcast_rejected(reason));
        }

        let local = unsigned.tx_id().map(str::to_ascii_lowercase);
        let remote = response
            .txid
            .filter(|id| !id.is_empty())
            .map(|id| id.to_ascii_lowercase());
        if let (Some(local), Some(remote)) = (&local, &remote)
            && local != remote
        {
            warn!(local = %local, remote = %remote, "node reported a different txid");
        }

        let tx_id = remote.or(local).ok_or_else(|| {
            TransferError::broadcast_rejected("node accepted the transaction but returned no txid")
        })?;
        info!(tx_id = %tx_id, "transaction broadcast");
        Ok(TxId(tx_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SignatureFormat;
    use crate::testing::{MockNode, RAW_DATA_HEX, Reply, construction_ok, tx_id_of};
    use crate::tx::{TransactionSigner, UnsignedTransaction, parse_private_key};

    const KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn signed(tx_id: Option<String>) -> SignedTransaction {
        let body: serde_json::Value = serde_json::from_str(&construction_ok(RAW_DATA_HEX)).unwrap();
        let raw = serde_json::value::to_raw_value(&body["transaction"]["raw_data"]).unwrap();
        let unsigned = UnsignedTransaction::new(tx_id, raw, Some(RAW_DATA_HEX.to_string()));
        TransactionSigner::new(SignatureFormat::Compact)
            .sign(unsigned, &parse_private_key(KEY).unwrap())
            .unwrap()
    }

    fn node_replying(body: &str) -> MockNode {
        MockNode::new(Reply::Timeout, Reply::Json(body.to_string()))
    }

    #[tokio::test]
    async fn test_insufficient_balance_is_rejected() {
        let node = node_replying(r#"{"result": false, "message": "insufficient balance"}"#);
        let err = Broadcaster::new(&node)
            .submit(&signed(Some(tx_id_of(RAW_DATA_HEX))))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TransferError::BroadcastRejected("insufficient balance".into())
        );
    }

    #[tokio::test]
    async fn test_hex_message_and_bare_code() {
        let node = node_replying(
            r#"{"code":"DUP_TRANSACTION_ERROR","message":"647570207472616e73616374696f6e"}"#,
        );
        let err = Broadcaster::new(&node).submit(&signed(None)).await.unwrap_err();
        assert_eq!(err, TransferError::BroadcastRejected("dup transaction".into()));

        let node = node_replying(r#"{"code":"BANDWITH_ERROR"}"#);
        let err = Broadcaster::new(&node).submit(&signed(None)).await.unwrap_err();
        assert_eq!(err, TransferError::BroadcastRejected("BANDWITH_ERROR".into()));

        let node = node_replying(r#"{"Error":"broadcast parse error"}"#);
        let err = Broadcaster::new(&node).submit(&signed(None)).await.unwrap_err();
        assert_eq!(err, TransferError::BroadcastRejected("broadcast parse error".into()));
    }

    #[tokio::test]
    async fn test_accepted_returns_node_txid() {
        let node = node_replying(r#"{"result":true,"txid":"ABCDEF"}"#);
        let id = Broadcaster::new(&node).submit(&signed(None)).await.unwrap();
        assert_eq!(id.as_str(), "abcdef");
    }

    #[tokio::test]
    async fn test_accepted_without_txid_falls_back_to_local() {
        let local = tx_id_of(RAW_DATA_HEX);
        let node = node_replying(r#"{"result":true}"#);
        let id = Broadcaster::new(&node)
            .submit(&signed(Some(local.clone())))
            .await
            .unwrap();
        assert_eq!(id.0, local);

        let err = Broadcaster::new(&node).submit(&signed(None)).await.unwrap_err();
        assert!(matches!(err, TransferError::BroadcastRejected(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_rejected_without_retry() {
        let node = MockNode::new(Reply::Timeout, Reply::Timeout);
        let err = Broadcaster::new(&node).submit(&signed(None)).await.unwrap_err();
        assert!(matches!(err, TransferError::BroadcastRejected(ref m) if m.contains("timed out")));
        assert_eq!(node.broadcast_count(), 1);
    }

    #[tokio::test]
    async fn test_request_body_shape() {
        let node = node_replying(r#"{"result":true,"txid":"01"}"#);
        let tx = signed(Some(tx_id_of(RAW_DATA_HEX)));
        Broadcaster::new(&node).submit(&tx).await.unwrap();

        let bodies = node.broadcasts.lock().unwrap();
        let body = &bodies[0];
        assert_eq!(body["visible"], true);
        assert_eq!(body["txID"], tx_id_of(RAW_DATA_HEX));
        assert_eq!(body["raw_data_hex"], RAW_DATA_HEX);
        let signatures = body["signature"].as_array().unwrap();
        assert_eq!(signatures.len(), 1);
        assert_eq!(signatures[0].as_str().unwrap().len(), 128);
        assert_eq!(
            body["raw_data"],
            serde_json::from_str::<serde_json::Value>(tx.unsigned().raw_data().get()).unwrap()
        );
    }
}
