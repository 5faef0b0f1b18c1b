//! AES-128 block cipher built from first principles.
//!
//! This crate follows FIPS-197 and provides:
//! - GF(2^8) arithmetic and the fixed substitution tables.
//! - The AES-128 key schedule.
//! - Single-block encryption and decryption, either through free functions
//!   over a [`KeySchedule`] or through the [`Aes128`] instance type.
//!
//! The implementation aims for clarity and testability rather than constant-time
//! guarantees; it should not be treated as side-channel hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod error;
pub mod gf;
mod key;
mod round;
mod sbox;

pub use crate::block::{xor_in_place, Block, BLOCK_SIZE};
pub use crate::cipher::{decrypt_block, encrypt_block, Aes128};
pub use crate::error::InvalidKeyLength;
pub use crate::key::{expand_key, Aes128Key, KeySchedule, KEY_SIZE, ROUNDS};
pub use crate::sbox::{inv_sbox, sbox};
