//! Transaction lifecycle: construct, sign, broadcast.
//!
//! ```text
//! TransactionBuilder::build  → UnsignedTransaction   (node call #1)
//! TransactionSigner::sign    → SignedTransaction     (pure, in memory)
//! Broadcaster::submit        → TxId                  (node call #2)
//! ```
//!
//! The raw-data structure is never re-derived locally. It travels from the
//! construction response to the broadcast body as the exact JSON text the
//! node produced.

mod broadcast;
mod builder;
mod signer;

use std::fmt;

use alloy::primitives::{B256, Signature, hex};
use serde_json::value::RawValue;

use crate::config::SignatureFormat;

pub use broadcast::Broadcaster;
pub use builder::TransactionBuilder;
pub use signer::{DigestSource, TransactionSigner, parse_private_key};

/// Transaction identifier, lowercase hex without `0x`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxId(pub String);

impl TxId {
    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TxId> for String {
    fn from(id: TxId) -> Self {
        id.0
    }
}

/// A transaction body built by the node, not yet signed.
#[derive(Debug, Clone)]
pub struct UnsignedTransaction {
    tx_id: Option<String>,
    raw_data: Box<RawValue>,
    raw_data_hex: Option<String>,
}

impl UnsignedTransaction {
    /// Wrap the pieces returned by the node.
    #[must_use]
    pub const fn new(
        tx_id: Option<String>,
        raw_data: Box<RawValue>,
        raw_data_hex: Option<String>,
    ) -> Self {
        Self {
            tx_id,
            raw_data,
            raw_data_hex,
        }
    }

    /// Transaction id reported by the node.
    #[must_use]
    pub fn tx_id(&self) -> Option<&str> {
        self.tx_id.as_deref()
    }

    /// Raw-data JSON, byte-for-byte as received.
    #[must_use]
    pub fn raw_data(&self) -> &RawValue {
        &self.raw_data
    }

    /// Protobuf encoding of the raw data, hex.
    #[must_use]
    pub fn raw_data_hex(&self) -> Option<&str> {
        self.raw_data_hex.as_deref()
    }
}

/// An [`UnsignedTransaction`] with its signature attached.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    unsigned: UnsignedTransaction,
    digest: B256,
    signature: Signature,
    format: SignatureFormat,
}

impl SignedTransaction {
    /// The transaction that was signed.
    #[must_use]
    pub const fn unsigned(&self) -> &UnsignedTransaction {
        &self.unsigned
    }

    /// The 32-byte digest the signature covers.
    #[must_use]
    pub const fn digest(&self) -> B256 {
        self.digest
    }

    /// The full recoverable signature.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Signature bytes as attached to the broadcast: `r || s`, plus the
    /// recovery byte (`0` or `1`) for [`SignatureFormat::Recoverable`].
    #[must_use]
    pub fn signature_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.format.byte_len());
        bytes.extend_from_slice(&self.signature.r().to_be_bytes::<32>());
        bytes.extend_from_slice(&self.signature.s().to_be_bytes::<32>());
        if self.format == SignatureFormat::Recoverable {
            bytes.push(u8::from(self.signature.v()));
        }
        bytes
    }

    /// Hex of [`signature_bytes`](Self::signature_bytes).
    #[must_use]
    pub fn signature_hex(&self) -> String {
        hex::encode(self.signature_bytes())
    }
}
