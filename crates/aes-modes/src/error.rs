//! Errors surfaced by the mode layer.

use aes_core::InvalidKeyLength;
use thiserror::Error;

/// Reasons a padded message fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaddingError {
    /// There was nothing to unpad.
    #[error("cannot remove padding from empty input")]
    EmptyInput,
    /// The final byte claims a padding length outside 1..=16.
    #[error("padding length byte {0} out of range 1..=16")]
    OutOfRange(u8),
    /// The trailing bytes do not all equal the claimed padding length.
    #[error("inconsistent padding bytes")]
    Inconsistent,
}

/// Errors returned by the CBC and CTR operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModeError {
    /// Key material was not 16 bytes.
    #[error(transparent)]
    InvalidKeyLength(#[from] InvalidKeyLength),
    /// CBC ciphertext was empty or not a multiple of the block size.
    #[error("ciphertext length {len} is not a positive multiple of 16")]
    InvalidLength {
        /// Length of the rejected ciphertext, in bytes.
        len: usize,
    },
    /// Decrypted plaintext did not end in valid PKCS#7 padding.
    #[error("invalid padding: {0}")]
    InvalidPadding(#[from] PaddingError),
}

/// Convenience alias for mode-layer results.
pub type Result<T> = core::result::Result<T, ModeError>;
