//! ABI encoding of the TRC20 `transfer` call.
//!
//! TRON's VM is EVM compatible, so call data is the usual 4-byte selector
//! followed by 32-byte words. Addresses are encoded as their 20-byte body
//! without the `0x41` network byte.

use alloy::primitives::{Bytes, U256, hex};
use alloy::sol_types::SolCall;

use crate::address::TronAddress;

#[allow(missing_docs)]
mod bindings {
    alloy::sol! {
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

pub use bindings::transferCall;

/// Canonical signature the node expects in `function_selector`.
pub const TRANSFER_SIGNATURE: &str = "transfer(address,uint256)";

/// `keccak256("transfer(address,uint256)")[..4]`.
pub const TRANSFER_SELECTOR: [u8; 4] = transferCall::SELECTOR;

/// Length of encoded `transfer` call data: selector plus two words.
pub const TRANSFER_CALL_LEN: usize = 4 + 32 + 32;

/// Encoded call data for a TRC20 transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCall {
    data: Bytes,
}

impl TransferCall {
    /// Full call data: selector, recipient word, amount word.
    #[must_use]
    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    /// The 4-byte method selector.
    #[must_use]
    pub fn selector(&self) -> &[u8] {
        &self.data[..4]
    }

    /// The two argument words without the selector.
    #[must_use]
    pub fn arguments(&self) -> &[u8] {
        &self.data[4..]
    }

    /// Hex of [`arguments`](Self::arguments), as sent in the node's
    /// `parameter` field. The node prepends the selector itself from
    /// `function_selector`.
    #[must_use]
    pub fn parameter_hex(&self) -> String {
        hex::encode(self.arguments())
    }
}

/// Encode `transfer(recipient, amount)`.
///
/// The result is always [`TRANSFER_CALL_LEN`] bytes.
#[must_use]
pub fn encode_transfer_call(recipient: &TronAddress, amount: U256) -> TransferCall {
    let call = transferCall {
        to: recipient.evm_address(),
        amount,
    };
    TransferCall {
        data: call.abi_encode().into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::to_padded_hex_word;

    fn recipient() -> TronAddress {
        "TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC".parse().unwrap()
    }

    #[test]
    fn test_selector_constant() {
        assert_eq!(TRANSFER_SELECTOR, [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(transferCall::SIGNATURE, TRANSFER_SIGNATURE);
    }

    #[test]
    fn test_layout() {
        let call = encode_transfer_call(&recipient(), U256::from(10_500_000u64));
        let data = call.data();
        assert_eq!(data.len(), TRANSFER_CALL_LEN);
        assert_eq!(call.selector(), TRANSFER_SELECTOR);
        assert_eq!(&data[4..16], &[0u8; 12]);
        assert_eq!(&data[16..36], recipient().evm_address().as_slice());
        assert_eq!(
            hex::encode(&data[36..]),
            to_padded_hex_word(U256::from(10_500_000u64))
        );
    }

    #[test]
    fn test_fixed_length_for_any_magnitude() {
        for amount in [U256::ZERO, U256::from(1u8), U256::MAX] {
            let call = encode_transfer_call(&recipient(), amount);
            assert_eq!(call.data().len(), TRANSFER_CALL_LEN);
            assert_eq!(call.selector(), TRANSFER_SELECTOR);
        }
    }

    #[test]
    fn test_parameter_hex_omits_selector() {
        let call = encode_transfer_call(&recipient(), U256::from(1u8));
        let param = call.parameter_hex();
        assert_eq!(param.len(), 128);
        assert_eq!(
            param,
            format!(
                "{}{}{}",
                "0".repeat(24),
                "7e5f4552091a69125d5dfcb7b8c2659029395bdf",
                to_padded_hex_word(U256::from(1u8))
            )
        );
    }
}
