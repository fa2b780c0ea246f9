//! TRON address codec.
//!
//! A TRON account is identified by 21 raw bytes: the network prefix `0x41`
//! followed by the last 20 bytes of the Keccak-256 hash of the uncompressed
//! secp256k1 public key. Users see it as a base58check string starting with
//! `T`, and the node's non-visible API uses the same bytes as plain hex.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, hex, keccak256};
use k256::ecdsa::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TransferError};

/// Network prefix byte shared by TRON mainnet and its public testnets.
pub const ADDRESS_PREFIX: u8 = 0x41;

/// Length of a raw TRON address in bytes.
pub const ADDRESS_LEN: usize = 21;

/// A TRON account or contract address in raw form.
///
/// Parsing via [`FromStr`] performs full base58check decoding; [`Display`]
/// renders the checksummed form back.
///
/// [`Display`]: fmt::Display
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TronAddress([u8; ADDRESS_LEN]);

impl TronAddress {
    /// Decode a base58check display address such as
    /// `TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t`.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::InvalidAddress`] if the string is not valid
    /// base58, the checksum does not verify, or the payload is not a 21-byte
    /// `0x41`-prefixed address.
    pub fn decode(display: &str) -> Result<Self> {
        let display = display.trim();
        let bytes = bs58::decode(display)
            .with_check(None)
            .into_vec()
            .map_err(|e| TransferError::invalid_address(format!("'{display}': {e}")))?;
        Self::from_slice(&bytes)
    }

    /// Render the base58check display form.
    #[must_use]
    pub fn encode(&self) -> String {
        bs58::encode(self.0).with_check().into_string()
    }

    /// Build an address from its raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::InvalidAddress`] if `raw` is not 21 bytes
    /// long or does not start with [`ADDRESS_PREFIX`].
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        let bytes: [u8; ADDRESS_LEN] = raw.try_into().map_err(|_| {
            TransferError::invalid_address(format!(
                "expected {ADDRESS_LEN} bytes, got {}",
                raw.len()
            ))
        })?;
        if bytes[0] != ADDRESS_PREFIX {
            return Err(TransferError::invalid_address(format!(
                "unexpected network prefix 0x{:02x}",
                bytes[0]
            )));
        }
        Ok(Self(bytes))
    }

    /// Parse the node's hex form (`41` followed by 40 hex digits, optional
    /// `0x`).
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::InvalidAddress`] on bad hex or a wrong
    /// length/prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let raw = hex::decode(s.trim())
            .map_err(|e| TransferError::invalid_address(format!("'{s}': {e}")))?;
        Self::from_slice(&raw)
    }

    /// Derive the address owned by a secp256k1 public key.
    #[must_use]
    pub fn from_public_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        // Skip the 0x04 SEC1 tag; the hash covers X || Y only.
        let hash = keccak256(&point.as_bytes()[1..]);
        Self::from_evm_address(Address::from_slice(&hash[12..]))
    }

    /// Prefix a 20-byte EVM-style address body with the TRON network byte.
    #[must_use]
    pub fn from_evm_address(address: Address) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[0] = ADDRESS_PREFIX;
        bytes[1..].copy_from_slice(address.as_slice());
        Self(bytes)
    }

    /// The 20-byte body without the network prefix, as used in ABI words.
    #[must_use]
    pub fn evm_address(&self) -> Address {
        Address::from_slice(&self.0[1..])
    }

    /// Raw 21-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Lowercase hex of the raw bytes, without `0x`.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for TronAddress {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl fmt::Display for TronAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for TronAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TronAddress({})", self.encode())
    }
}

impl Serialize for TronAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for TronAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::decode(&s).map_err(serde::de::Error::custom)
    }
}
