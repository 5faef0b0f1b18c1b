//! Error types for the cipher core.

use thiserror::Error;

/// Returned when key material is not exactly 16 bytes long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid AES-128 key length: expected 16 bytes, got {len}")]
pub struct InvalidKeyLength {
    /// Length of the rejected key, in bytes.
    pub len: usize,
}
