//! Key types and the AES-128 key schedule.

use core::fmt;

use crate::block::Block;
use crate::error::InvalidKeyLength;
use crate::sbox::{sbox, RCON};

/// Key length in bytes.
pub const KEY_SIZE: usize = 16;
/// Number of 32-bit words in the key.
const NK: usize = 4;
/// Number of rounds.
pub const ROUNDS: usize = 10;
/// Number of words in the expanded schedule.
const SCHEDULE_WORDS: usize = 4 * (ROUNDS + 1);

/// AES-128 key wrapper. `Debug` does not print the key bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Aes128Key(pub [u8; KEY_SIZE]);

impl fmt::Debug for Aes128Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aes128Key").finish_non_exhaustive()
    }
}

impl From<[u8; KEY_SIZE]> for Aes128Key {
    fn from(value: [u8; KEY_SIZE]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for Aes128Key {
    type Error = InvalidKeyLength;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; KEY_SIZE] = value
            .try_into()
            .map_err(|_| InvalidKeyLength { len: value.len() })?;
        Ok(Self(bytes))
    }
}

/// Expanded key schedule: 44 big-endian words, four per round key.
///
/// Words 0..4 are the key itself, so `Debug` prints no words.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KeySchedule([u32; SCHEDULE_WORDS]);

impl fmt::Debug for KeySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySchedule").finish_non_exhaustive()
    }
}

impl KeySchedule {
    /// Returns the raw schedule words.
    pub fn words(&self) -> &[u32; SCHEDULE_WORDS] {
        &self.0
    }

    /// Returns the round key for `round` (0..=10) as a column-major block.
    #[inline]
    pub fn round_key(&self, round: usize) -> Block {
        let mut key = [0u8; 16];
        for (column, word) in key.chunks_exact_mut(4).zip(&self.0[round * 4..round * 4 + 4]) {
            column.copy_from_slice(&word.to_be_bytes());
        }
        key
    }
}

fn rot_word(word: u32) -> u32 {
    word.rotate_left(8)
}

fn sub_word(word: u32) -> u32 {
    u32::from_be_bytes(word.to_be_bytes().map(sbox))
}

/// Expands a 128-bit key into the 44-word schedule.
pub fn expand_key(key: &Aes128Key) -> KeySchedule {
    let mut w = [0u32; SCHEDULE_WORDS];
    for (word, chunk) in w.iter_mut().zip(key.0.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    for i in NK..SCHEDULE_WORDS {
        let mut temp = w[i - 1];
        if i % NK == 0 {
            temp = sub_word(rot_word(temp)) ^ (u32::from(RCON[i / NK]) << 24);
        }
        w[i] = w[i - NK] ^ temp;
    }

    log::trace!("expanded AES-128 key schedule ({SCHEDULE_WORDS} words)");
    KeySchedule(w)
}
