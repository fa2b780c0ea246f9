#![cfg_attr(docsrs, feature(doc_cfg))]
//! Tronpay sends TRC20 tokens on TRON.
//!
//! The crate covers the parts of a token transfer that have to be exactly
//! right: base58check address handling, exact decimal scaling, ABI encoding
//! of `transfer(address,uint256)`, secp256k1 signing of the node-built
//! transaction and interpretation of the node's verdict.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use tronpay::prelude::*;
//!
//! let sender = Trc20Sender::new(TransferConfig::default())?;
//! let tx_id = sender
//!     .transfer(&private_key, "TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC", "10.5")
//!     .await?;
//! ```

pub mod abi;
pub mod address;
pub mod amount;
pub mod config;
pub mod error;
pub mod node;
pub mod prelude;
pub mod sender;
pub mod tx;

#[cfg(test)]
mod testing;

pub use address::TronAddress;
pub use config::{SignatureFormat, TransferConfig};
pub use error::{NodeError, Result, TransferError};
pub use sender::{TransferRequest, TransferResponse, Trc20Sender, owner_address};
pub use tx::TxId;
