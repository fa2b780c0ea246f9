use alloy::primitives::{B256, hex};
use alloy::signers::SignerSync;
use alloy::signers::local::PrivateKeySigner;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{SignedTransaction, UnsignedTransaction};
use crate::config::SignatureFormat;
use crate::error::{Result, TransferError};

/// Which bytes the transaction digest was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestSource {
    /// The node's protobuf encoding (`raw_data_hex`). Matches the txID the
    /// ledger computes.
    RawDataHex,
    /// The raw-data JSON text exactly as the node returned it.
    RawDataJson,
}

/// Parse a hex private key (optional `0x`, 64 hex digits).
///
/// # Errors
///
/// Returns [`TransferError::Signing`] for the wrong length, non-hex input,
/// or a value that is not a valid secp256k1 scalar (zero or not below the
/// curve order).
pub fn parse_private_key(key: &str) -> Result<PrivateKeySigner> {
    let key = key.trim();
    let key = key
        .strip_prefix("0x")
        .or_else(|| key.strip_prefix("0X"))
        .unwrap_or(key);
    if key.len() != 64 {
        return Err(TransferError::signing(format!(
            "private key must be 64 hex characters, got {}",
            key.len()
        )));
    }
    let bytes = hex::decode(key)
        .map_err(|e| TransferError::signing(format!("private key is not hex: {e}")))?;
    PrivateKeySigner::from_bytes(&B256::from_slice(&bytes))
        .map_err(|e| TransferError::signing(format!("invalid private key: {e}")))
}

/// Signs node-built transactions with secp256k1.
///
/// Signatures use RFC 6979 deterministic nonces, so no randomness is drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionSigner {
    format: SignatureFormat,
}

impl TransactionSigner {
    /// Create a signer producing signatures in `format`.
    #[must_use]
    pub const fn new(format: SignatureFormat) -> Self {
        Self { format }
    }

    /// Compute the 32-byte digest of `tx`.
    ///
    /// Uses `sha256(raw_data_hex)` when the node supplied the protobuf bytes
    /// and checks it against the node's txID; otherwise hashes the raw-data
    /// JSON text verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Signing`] if `raw_data_hex` is not hex or the
    /// digest disagrees with the node's txID.
    pub fn digest(tx: &UnsignedTransaction) -> Result<(B256, DigestSource)> {
        let Some(raw_hex) = tx.raw_data_hex() else {
            let digest = Sha256::digest(tx.raw_data().get().as_bytes());
            return Ok((B256::from_slice(&digest), DigestSource::RawDataJson));
        };

        let raw = hex::decode(raw_hex)
            .map_err(|e| TransferError::signing(format!("raw_data_hex is not hex: {e}")))?;
        let digest = B256::from_slice(&Sha256::digest(&raw));

        if let Some(tx_id) = tx.tx_id() {
            let expected = hex::decode(tx_id)
                .map_err(|e| TransferError::signing(format!("txID is not hex: {e}")))?;
            if expected.as_slice() != digest.as_slice() {
                return Err(TransferError::signing(format!(
                    "txID {tx_id} does not match sha256(raw_data_hex) {}",
                    hex::encode(digest)
                )));
            }
        }

        Ok((digest, DigestSource::RawDataHex))
    }

    /// Sign `tx` with `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Signing`] if the digest cannot be computed or
    /// the signing backend fails.
    pub fn sign(
        &self,
        tx: UnsignedTransaction,
        key: &PrivateKeySigner,
    ) -> Result<SignedTransaction> {
        let (digest, source) = Self::digest(&tx)?;
        let signature = key
            .sign_hash_sync(&digest)
            .map_err(|e| TransferError::signing(format!("signing failed: {e}")))?;

        debug!(
            digest = %digest,
            source = ?source,
            format = ?self.format,
            "transaction signed",
        );

        Ok(SignedTransaction {
            unsigned: tx,
            digest,
            signature,
            format: self.format,
        })
    }
}
