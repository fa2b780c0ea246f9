//! In-memory ledger node for tests.

use std::sync::Mutex;

use alloy::primitives::{B256, Signature, U256, hex};
use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::address::TronAddress;
use crate::error::NodeError;
use crate::node::{
    BroadcastRequest, BroadcastResponse, LedgerNode, TriggerSmartContractRequest,
    TriggerSmartContractResponse,
};

/// Protobuf-ish bytes standing in for a real raw-data encoding.
pub(crate) const RAW_DATA_HEX: &str = "0a020c1e2208f1b2c3d4e5f6a7b840e0c2a8b0b1315a8e01081f";

/// Canned node behaviour.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    /// Answer with this JSON body.
    Json(String),
    /// Fail as if the request timed out.
    Timeout,
    /// Broadcast only: check the signature against the owner of the last
    /// constructed transaction, like a real node.
    Verify,
}

#[derive(Debug)]
pub(crate) struct MockNode {
    trigger: Reply,
    broadcast: Reply,
    pub(crate) triggers: Mutex<Vec<TriggerSmartContractRequest>>,
    pub(crate) broadcasts: Mutex<Vec<serde_json::Value>>,
}

impl MockNode {
    pub(crate) fn new(trigger: Reply, broadcast: Reply) -> Self {
        Self {
            trigger,
            broadcast,
            triggers: Mutex::new(Vec::new()),
            broadcasts: Mutex::new(Vec::new()),
        }
    }

    /// A node that builds a well-formed transaction and verifies signatures.
    pub(crate) fn honest() -> Self {
        Self::new(Reply::Json(construction_ok(RAW_DATA_HEX)), Reply::Verify)
    }

    pub(crate) fn trigger_count(&self) -> usize {
        self.triggers.lock().unwrap().len()
    }

    pub(crate) fn broadcast_count(&self) -> usize {
        self.broadcasts.lock().unwrap().len()
    }

    fn verify(&self, body: &serde_json::Value) -> String {
        let owner = self
            .triggers
            .lock()
            .unwrap()
            .last()
            .map(|t| t.owner_address.clone())
            .unwrap_or_default();
        let raw = hex::decode(body["raw_data_hex"].as_str().unwrap_or_default()).unwrap();
        let digest = B256::from_slice(&Sha256::digest(&raw));
        let sig = hex::decode(body["signature"][0].as_str().unwrap_or_default()).unwrap();

        let signed_by_owner = sig.len() >= 64
            && [false, true].into_iter().any(|parity| {
                let candidate = Signature::new(
                    U256::from_be_slice(&sig[..32]),
                    U256::from_be_slice(&sig[32..64]),
                    parity,
                );
                candidate
                    .recover_address_from_prehash(&digest)
                    .is_ok_and(|addr| TronAddress::from_evm_address(addr).to_string() == owner)
            });

        if signed_by_owner {
            format!(r#"{{"result":true,"txid":"{}"}}"#, hex::encode(digest))
        } else {
            r#"{"code":"SIGERROR","message":"76616c6964617465207369676e6174757265206572726f72"}"#
                .to_string()
        }
    }
}

#[async_trait]
impl LedgerNode for MockNode {
    async fn trigger_smart_contract(
        &self,
        request: &TriggerSmartContractRequest,
    ) -> Result<TriggerSmartContractResponse, NodeError> {
        self.triggers.lock().unwrap().push(request.clone());
        match &self.trigger {
            Reply::Json(body) => Ok(serde_json::from_str(body)?),
            Reply::Timeout | Reply::Verify => Err(NodeError::Timeout {
                endpoint: crate::node::TRIGGER_SMART_CONTRACT,
            }),
        }
    }

    async fn broadcast_transaction(
        &self,
        request: &BroadcastRequest<'_>,
    ) -> Result<BroadcastResponse, NodeError> {
        let body = serde_json::to_value(request)?;
        self.broadcasts.lock().unwrap().push(body.clone());
        match &self.broadcast {
            Reply::Json(reply) => Ok(serde_json::from_str(reply)?),
            Reply::Verify => Ok(serde_json::from_str(&self.verify(&body))?),
            Reply::Timeout => Err(NodeError::Timeout {
                endpoint: crate::node::BROADCAST_TRANSACTION,
            }),
        }
    }
}

/// A successful construction response whose txID matches `raw_hex`.
pub(crate) fn construction_ok(raw_hex: &str) -> String {
    let tx_id = hex::encode(Sha256::digest(hex::decode(raw_hex).unwrap()));
    format!(
        r#"{{"result":{{"result":true}},"transaction":{{"visible":true,"txID":"{tx_id}","raw_data":{{"contract":[{{"parameter":{{"value":{{"data":"a9059cbb","owner_address":"TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC","contract_address":"TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t"}},"type_url":"type.googleapis.com/protocol.TriggerSmartContract"}},"type":"TriggerSmartContract"}}],"ref_block_bytes":"0c1e","ref_block_hash":"f1b2c3d4e5f6a7b8","expiration":1700000060000,"fee_limit":1000000,"timestamp":1700000000000}},"raw_data_hex":"{raw_hex}"}}}}"#
    )
}

/// The txID [`construction_ok`] reports for `raw_hex`.
pub(crate) fn tx_id_of(raw_hex: &str) -> String {
    hex::encode(Sha256::digest(hex::decode(raw_hex).unwrap()))
}
