//! Convenient re-exports of commonly used types.
//!
//! ```rust,ignore
//! use tronpay::prelude::*;
//! ```

pub use crate::abi::{TRANSFER_SELECTOR, TransferCall, encode_transfer_call};
pub use crate::address::TronAddress;
pub use crate::amount::{to_padded_hex_word, to_smallest_unit};
pub use crate::config::{SignatureFormat, TransferConfig, TransferConfigBuilder};
pub use crate::error::{NodeError, Result, TransferError};
pub use crate::node::{HttpNode, LedgerNode};
pub use crate::sender::{TransferRequest, TransferResponse, Trc20Sender, owner_address};
pub use crate::tx::{
    Broadcaster, SignedTransaction, TransactionBuilder, TransactionSigner, TxId,
    UnsignedTransaction,
};
