//! Counter (CTR) mode.
//!
//! The whole 16-byte nonce is the initial counter block and is incremented as
//! a single 128-bit big-endian integer, wrapping silently. There is no
//! nonce/counter split, so block `i` of a message uses `nonce + i mod 2^128`.
//! Reusing a nonce under the same key leaks the XOR of the two plaintexts.

use core::fmt;

use aes_core::{xor_in_place, Aes128, Block, BLOCK_SIZE};
use rayon::prelude::*;

use crate::error::Result;

/// Adds one to `counter` as a big-endian integer, wrapping to zero.
#[inline]
pub fn increment_counter(counter: &mut Block) {
    for byte in counter.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

/// Returns the counter block used for block `index` of a message.
#[inline]
pub fn counter_at(nonce: &Block, index: u128) -> Block {
    u128::from_be_bytes(*nonce).wrapping_add(index).to_be_bytes()
}

/// CTR mode over an expanded AES-128 key.
#[derive(Clone, Debug)]
pub struct Ctr {
    cipher: Aes128,
}

impl Ctr {
    /// Expands `key` (16 bytes) into a CTR instance.
    pub fn new(key: &[u8]) -> Result<Self> {
        Ok(Self::from(Aes128::new(key)?))
    }

    /// XORs the keystream for `nonce` into a copy of `data`.
    ///
    /// Encryption and decryption are the same operation. The output has the
    /// same length as the input; a short final block uses a prefix of its
    /// keystream block.
    pub fn apply_keystream(&self, data: &[u8], nonce: &Block) -> Vec<u8> {
        let mut out = data.to_vec();
        self.apply_keystream_in_place(&mut out, nonce);
        out
    }

    /// In-place variant of [`Ctr::apply_keystream`]. Blocks are independent
    /// and processed in parallel.
    pub fn apply_keystream_in_place(&self, data: &mut [u8], nonce: &Block) {
        data.par_chunks_mut(BLOCK_SIZE)
            .enumerate()
            .for_each(|(index, chunk)| {
                let keystream = self.cipher.encrypt_block(&counter_at(nonce, index as u128));
                xor_in_place(chunk, &keystream);
            });
        log::debug!(
            "ctr: processed {} bytes ({} keystream blocks)",
            data.len(),
            data.len().div_ceil(BLOCK_SIZE)
        );
    }

    /// Starts an incremental keystream at `nonce`.
    pub fn stream(&self, nonce: &Block) -> CtrStream<'_> {
        CtrStream::new(&self.cipher, nonce)
    }
}

impl From<Aes128> for Ctr {
    fn from(cipher: Aes128) -> Self {
        Self { cipher }
    }
}

/// Sequential keystream for processing one message in arbitrary chunks.
///
/// Feeding a message through [`CtrStream::apply_keystream`] in any split
/// produces the same bytes as [`Ctr::apply_keystream`] on the whole message.
#[derive(Clone)]
pub struct CtrStream<'a> {
    cipher: &'a Aes128,
    counter: Block,
    keystream: Block,
    used: usize,
}

impl fmt::Debug for CtrStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CtrStream")
            .field("buffered", &(BLOCK_SIZE - self.used))
            .finish_non_exhaustive()
    }
}

impl<'a> CtrStream<'a> {
    /// Creates a stream whose first keystream block is `E(nonce)`.
    pub fn new(cipher: &'a Aes128, nonce: &Block) -> Self {
        Self {
            cipher,
            counter: *nonce,
            keystream: [0u8; BLOCK_SIZE],
            used: BLOCK_SIZE,
        }
    }

    /// XORs the next `data.len()` keystream bytes into `data`.
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            if self.used == BLOCK_SIZE {
                self.keystream = self.cipher.encrypt_block(&self.counter);
                increment_counter(&mut self.counter);
                self.used = 0;
            }
            *byte ^= self.keystream[self.used];
            self.used += 1;
        }
    }

    /// The counter block that will produce the next fresh keystream block.
    pub fn counter(&self) -> &Block {
        &self.counter
    }
}

/// Encrypts `plaintext` under `key` in CTR mode.
pub fn encrypt_ctr(plaintext: &[u8], key: &[u8], nonce: &Block) -> Result<Vec<u8>> {
    Ok(Ctr::new(key)?.apply_keystream(plaintext, nonce))
}

/// Decrypts CTR `ciphertext`; identical to [`encrypt_ctr`].
pub fn decrypt_ctr(ciphertext: &[u8], key: &[u8], nonce: &Block) -> Result<Vec<u8>> {
    encrypt_ctr(ciphertext, key, nonce)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    // NIST SP 800-38A F.5.1 / F.5.2.
    const KEY: &str = "2b7e151628aed2a6abf7158809cf4f3c";
    const COUNTER: &str = "f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff";
    const PLAIN: &str = "6bc1bee22e409f96e93d7e117393172a\
                         ae2d8a571e03ac9c9eb76fac45af8e51\
                         30c81c46a35ce411e5fbc1191a0a52ef\
                         f69f2445df4f9b17ad2b417be66c3710";
    const CIPHER: &str = "874d6191b620e3261bef6864990db6ce\
                          9806f66b7970fdff8617187bb9fffdff\
                          5ae4df3edbd5d35e5b4f09020db03eab\
                          1e031dda2fbe03d1792170a0f3009cee";

    fn block(hex_str: &str) -> Block {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    #[test]
    fn sp800_38a_vector() {
        let key = hex::decode(KEY).unwrap();
        let plain = hex::decode(PLAIN).unwrap();
        let ct = encrypt_ctr(&plain, &key, &block(COUNTER)).unwrap();
        assert_eq!(hex::encode(&ct), CIPHER);
        assert_eq!(decrypt_ctr(&ct, &key, &block(COUNTER)).unwrap(), plain);
    }

    #[test]
    fn truncated_message_uses_keystream_prefix() {
        let key = hex::decode(KEY).unwrap();
        let plain = hex::decode(PLAIN).unwrap();
        let ct = encrypt_ctr(&plain[..37], &key, &block(COUNTER)).unwrap();
        assert_eq!(ct.len(), 37);
        assert_eq!(hex::encode(&ct), &CIPHER[..74]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(encrypt_ctr(&[], &[0u8; 16], &[0u8; 16]).unwrap().is_empty());
    }

    #[test]
    fn increment_carries_and_wraps() {
        let mut counter = [0u8; 16];
        increment_counter(&mut counter);
        assert_eq!(counter[15], 1);

        let mut counter = [0u8; 16];
        counter[15] = 0xff;
        counter[14] = 0xff;
        increment_counter(&mut counter);
        assert_eq!(&counter[13..], &[1u8, 0, 0]);

        let mut counter = [0xffu8; 16];
        increment_counter(&mut counter);
        assert_eq!(counter, [0u8; 16]);
    }

    #[test]
    fn counter_at_matches_repeated_increment() {
        let mut counter = [0xffu8; 16];
        counter[0] = 0x12;
        counter[8] = 0xfe;
        let nonce = counter;
        for index in 0..600u128 {
            assert_eq!(counter_at(&nonce, index), counter);
            increment_counter(&mut counter);
        }
    }

    #[test]
    fn keystream_wraps_past_all_ones_counter() {
        let ctr = Ctr::new(&[3u8; 16]).unwrap();
        let aes = Aes128::new(&[3u8; 16]).unwrap();
        let keystream = ctr.apply_keystream(&[0u8; 32], &[0xff; 16]);
        assert_eq!(keystream[..16], aes.encrypt_block(&[0xff; 16]));
        assert_eq!(keystream[16..], aes.encrypt_block(&[0u8; 16]));
    }

    #[test]
    fn stream_matches_one_shot_for_any_split() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let ctr = Ctr::new(&[0x42u8; 16]).unwrap();
        let nonce = [0xfeu8; 16];
        let mut message = vec![0u8; 123];
        rng.fill_bytes(&mut message);
        let expected = ctr.apply_keystream(&message, &nonce);

        for _ in 0..20 {
            let mut stream = ctr.stream(&nonce);
            let mut data = message.clone();
            let mut rest = &mut data[..];
            while !rest.is_empty() {
                let take = rng.gen_range(1..=rest.len().min(40));
                let (head, tail) = core::mem::take(&mut rest).split_at_mut(take);
                stream.apply_keystream(head);
                rest = tail;
            }
            assert_eq!(data, expected);
            assert_eq!(stream.counter(), &counter_at(&nonce, 8));
        }
    }

    #[test]
    fn debug_output_hides_keystream() {
        let ctr = Ctr::new(&[0x41u8; 16]).unwrap();
        assert_eq!(format!("{ctr:?}"), "Ctr { cipher: Aes128 { .. } }");
        let mut stream = ctr.stream(&[0u8; 16]);
        stream.apply_keystream(&mut [0u8; 5]);
        assert_eq!(format!("{stream:?}"), "CtrStream { buffered: 11, .. }");
    }

    #[test]
    fn rejects_bad_key_length() {
        assert!(encrypt_ctr(b"abc", &[0u8; 17], &[0u8; 16]).is_err());
    }
}
