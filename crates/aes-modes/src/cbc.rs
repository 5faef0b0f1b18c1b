//! Cipher block chaining (CBC) mode with PKCS#7 padding.

use aes_core::{xor_in_place, Aes128, Block, BLOCK_SIZE};
use rayon::prelude::*;

use crate::error::{ModeError, Result};
use crate::padding::{pad, unpad_vec};

/// CBC mode over an expanded AES-128 key.
///
/// One instance can encrypt and decrypt any number of messages; the IV is
/// supplied per message and must be unpredictable.
#[derive(Clone, Debug)]
pub struct Cbc {
    cipher: Aes128,
}

impl Cbc {
    /// Expands `key` (16 bytes) into a CBC instance.
    pub fn new(key: &[u8]) -> Result<Self> {
        Ok(Self::from(Aes128::new(key)?))
    }

    /// Pads and encrypts `plaintext`. The output is always a non-empty
    /// multiple of 16 bytes.
    pub fn encrypt(&self, plaintext: &[u8], iv: &Block) -> Vec<u8> {
        let mut buf = pad(plaintext);
        let mut prev = *iv;
        for chunk in buf.chunks_exact_mut(BLOCK_SIZE) {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            xor_in_place(&mut block, &prev);
            self.cipher.encrypt_block_mut(&mut block);
            chunk.copy_from_slice(&block);
            prev = block;
        }
        log::debug!(
            "cbc: encrypted {} bytes into {} blocks",
            plaintext.len(),
            buf.len() / BLOCK_SIZE
        );
        buf
    }

    /// Decrypts `ciphertext` and strips its padding.
    ///
    /// Each plaintext block depends only on two ciphertext blocks, so blocks
    /// are decrypted in parallel. Nothing is returned unless the padding
    /// validates.
    pub fn decrypt(&self, ciphertext: &[u8], iv: &Block) -> Result<Vec<u8>> {
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(ModeError::InvalidLength {
                len: ciphertext.len(),
            });
        }

        let mut plaintext = vec![0u8; ciphertext.len()];
        plaintext
            .par_chunks_exact_mut(BLOCK_SIZE)
            .zip(ciphertext.par_chunks_exact(BLOCK_SIZE))
            .enumerate()
            .for_each(|(index, (out, block))| {
                let mut state = [0u8; BLOCK_SIZE];
                state.copy_from_slice(block);
                self.cipher.decrypt_block_mut(&mut state);
                out.copy_from_slice(&state);
                let prev = if index == 0 {
                    &iv[..]
                } else {
                    &ciphertext[(index - 1) * BLOCK_SIZE..index * BLOCK_SIZE]
                };
                xor_in_place(out, prev);
            });
        log::debug!("cbc: decrypted {} blocks", ciphertext.len() / BLOCK_SIZE);

        Ok(unpad_vec(plaintext)?)
    }
}

impl From<Aes128> for Cbc {
    fn from(cipher: Aes128) -> Self {
        Self { cipher }
    }
}

/// Encrypts `plaintext` under `key` in CBC mode with PKCS#7 padding.
pub fn encrypt_cbc(plaintext: &[u8], key: &[u8], iv: &Block) -> Result<Vec<u8>> {
    Ok(Cbc::new(key)?.encrypt(plaintext, iv))
}

/// Decrypts CBC `ciphertext` under `key` and removes its padding.
pub fn decrypt_cbc(ciphertext: &[u8], key: &[u8], iv: &Block) -> Result<Vec<u8>> {
    Cbc::new(key)?.decrypt(ciphertext, iv)
}
