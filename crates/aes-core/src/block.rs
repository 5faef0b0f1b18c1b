//! Block representation helpers.

/// Size of an AES block in bytes.
pub const BLOCK_SIZE: usize = 16;

/// AES block of 16 bytes, laid out column-major: byte `i` sits at row `i % 4`,
/// column `i / 4` of the state matrix.
pub type Block = [u8; BLOCK_SIZE];

/// XORs `rhs` into `dst`. Only the overlapping prefix is touched, so a short
/// tail of a message can be combined with a full keystream block.
#[inline]
pub fn xor_in_place(dst: &mut [u8], rhs: &[u8]) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}
