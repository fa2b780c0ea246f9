use tracing::debug;

use super::UnsignedTransaction;
use crate::abi::{TRANSFER_SIGNATURE, TransferCall};
use crate::address::TronAddress;
use crate::error::{Result, TransferError};
use crate::node::{LedgerNode, TriggerSmartContractRequest, decode_message};

/// Asks the node to construct an unsigned `TriggerSmartContract` transaction.
#[derive(Debug)]
pub struct TransactionBuilder<'a, N: ?Sized> {
    node: &'a N,
}

impl<'a, N: LedgerNode + ?Sized> TransactionBuilder<'a, N> {
    /// Create a builder backed by `node`.
    #[must_use]
    pub const fn new(node: &'a N) -> Self {
        Self { node }
    }

    /// Build a transfer transaction from `owner` calling `contract`.
    ///
    /// The node picks the reference block and expiration window; the
    /// returned raw data is kept exactly as received.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::RemoteConstruction`] when the request fails
    /// in transit, the node reports an error, or the response lacks a
    /// transaction with raw data.
    pub async fn build(
        &self,
        owner: &TronAddress,
        contract: &TronAddress,
        call: &TransferCall,
        fee_limit: u64,
    ) -> Result<UnsignedTransaction> {
        let request = TriggerSmartContractRequest {
            owner_address: owner.to_string(),
            contract_address: contract.to_string(),
            function_selector: TRANSFER_SIGNATURE.to_string(),
            parameter: call.parameter_hex(),
            fee_limit,
            call_value: 0,
            visible: true,
        };

        let response = self
            .node
            .trigger_smart_contract(&request)
            .await
            .map_err(|e| TransferError::remote_construction(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(TransferError::remote_construction(decode_message(&error)));
        }

        if let Some(status) = &response.result
            && status.result != Some(true)
        {
            let reason = status
                .message
                .as_deref()
                .map(decode_message)
                .or_else(|| status.code.clone())
                .unwrap_or_else(|| "node did not accept the call".to_string());
            return Err(TransferError::remote_construction(reason));
        }

        let transaction = response.transaction.ok_or_else(|| {
            TransferError::remote_construction("response has no transaction")
        })?;
        let raw_data = transaction.raw_data.ok_or_else(|| {
            TransferError::remote_construction("transaction has no raw_data")
        })?;
        if !raw_data.get().trim_start().starts_with('{') {
            return Err(TransferError::remote_construction(
                "raw_data is not a JSON object",
            ));
        }

        let tx_id = transaction.tx_id.filter(|id| !id.is_empty());
        let raw_data_hex = transaction.raw_data_hex.filter(|h| !h.is_empty());
        debug!(
            tx_id = tx_id.as_deref().unwrap_or("-"),
            has_raw_data_hex = raw_data_hex.is_some(),
            "transaction constructed",
        );

        Ok(UnsignedTransaction::new(tx_id, raw_data, raw_data_hex))
    }
}
