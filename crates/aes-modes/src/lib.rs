//! CBC and CTR modes of operation over the `aes-core` AES-128 block cipher.
//!
//! - [`Cbc`] chains blocks through the previous ciphertext and pads with
//!   PKCS#7; decryption validates the padding before returning anything.
//! - [`Ctr`] XORs an encrypted 128-bit counter into the message; it needs no
//!   padding and encryption equals decryption.
//!
//! Both types own one expanded key schedule and can be reused for many
//! messages. The free functions ([`encrypt_cbc`], [`decrypt_cbc`],
//! [`encrypt_ctr`], [`decrypt_ctr`]) expand the key per call.
//!
//! Neither mode authenticates its output.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cbc;
mod ctr;
mod error;
pub mod padding;

pub use aes_core::{Aes128, Block, InvalidKeyLength, BLOCK_SIZE};

pub use crate::cbc::{decrypt_cbc, encrypt_cbc, Cbc};
pub use crate::ctr::{counter_at, decrypt_ctr, encrypt_ctr, increment_counter, Ctr, CtrStream};
pub use crate::error::{ModeError, PaddingError, Result};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn mode_types_are_send_and_sync() {
        assert_send_sync::<Aes128>();
        assert_send_sync::<Cbc>();
        assert_send_sync::<Ctr>();
        assert_send_sync::<CtrStream<'static>>();
        assert_send_sync::<ModeError>();
    }

    #[test]
    fn one_instance_serves_concurrent_messages() {
        let cbc = Cbc::new(&[5u8; 16]).unwrap();
        let ctr = Ctr::new(&[5u8; 16]).unwrap();
        std::thread::scope(|scope| {
            for i in 0..4u8 {
                let (cbc, ctr) = (&cbc, &ctr);
                scope.spawn(move || {
                    let message = vec![i; 40 + usize::from(i)];
                    let iv = [i; BLOCK_SIZE];
                    let ct = cbc.encrypt(&message, &iv);
                    assert_eq!(cbc.decrypt(&ct, &iv).unwrap(), message);
                    let ct = ctr.apply_keystream(&message, &iv);
                    assert_eq!(ctr.apply_keystream(&ct, &iv), message);
                });
            }
        });
    }
}
