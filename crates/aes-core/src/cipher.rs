//! AES-128 block encryption and decryption.

use core::fmt;

use crate::block::Block;
use crate::error::InvalidKeyLength;
use crate::key::{expand_key, Aes128Key, KeySchedule, ROUNDS};
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};

/// Encrypts a single 16-byte block with a pre-expanded key schedule.
pub fn encrypt_block(block: &Block, schedule: &KeySchedule) -> Block {
    let mut state = *block;

    add_round_key(&mut state, &schedule.round_key(0));

    for round in 1..ROUNDS {
        sub_bytes(&mut state);
        shift_rows(&mut state);
        mix_columns(&mut state);
        add_round_key(&mut state, &schedule.round_key(round));
    }

    sub_bytes(&mut state);
    shift_rows(&mut state);
    add_round_key(&mut state, &schedule.round_key(ROUNDS));

    state
}

/// Decrypts a single 16-byte block with a pre-expanded key schedule.
pub fn decrypt_block(block: &Block, schedule: &KeySchedule) -> Block {
    let mut state = *block;

    add_round_key(&mut state, &schedule.round_key(ROUNDS));
    for round in (1..ROUNDS).rev() {
        inv_shift_rows(&mut state);
        inv_sub_bytes(&mut state);
        add_round_key(&mut state, &schedule.round_key(round));
        inv_mix_columns(&mut state);
    }
    inv_shift_rows(&mut state);
    inv_sub_bytes(&mut state);
    add_round_key(&mut state, &schedule.round_key(0));

    state
}

/// An AES-128 instance holding its expanded key schedule.
///
/// The schedule never changes after construction except through
/// [`Aes128::set_key`], so a shared reference can be used from many threads at
/// once; every call works on its own stack-resident state.
#[derive(Clone)]
pub struct Aes128 {
    schedule: KeySchedule,
}

impl fmt::Debug for Aes128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aes128").finish_non_exhaustive()
    }
}

impl Aes128 {
    /// Expands `key`, which must be exactly 16 bytes.
    pub fn new(key: &[u8]) -> Result<Self, InvalidKeyLength> {
        let key = Aes128Key::try_from(key)?;
        Ok(Self::from(key))
    }

    /// Replaces the key. On error the previous schedule is left untouched.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), InvalidKeyLength> {
        let key = Aes128Key::try_from(key)?;
        self.schedule = expand_key(&key);
        Ok(())
    }

    /// Returns the expanded key schedule.
    pub fn schedule(&self) -> &KeySchedule {
        &self.schedule
    }

    /// Encrypts one block.
    #[inline]
    pub fn encrypt_block(&self, block: &Block) -> Block {
        encrypt_block(block, &self.schedule)
    }

    /// Decrypts one block.
    #[inline]
    pub fn decrypt_block(&self, block: &Block) -> Block {
        decrypt_block(block, &self.schedule)
    }

    /// Encrypts one block in place.
    #[inline]
    pub fn encrypt_block_mut(&self, block: &mut Block) {
        *block = encrypt_block(block, &self.schedule);
    }

    /// Decrypts one block in place.
    #[inline]
    pub fn decrypt_block_mut(&self, block: &mut Block) {
        *block = decrypt_block(block, &self.schedule);
    }
}

impl From<Aes128Key> for Aes128 {
    fn from(key: Aes128Key) -> Self {
        Self {
            schedule: expand_key(&key),
        }
    }
}
