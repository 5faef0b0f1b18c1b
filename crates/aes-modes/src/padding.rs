//! PKCS#7 padding.

use aes_core::BLOCK_SIZE;

use crate::error::PaddingError;

/// Appends `N` bytes of value `N`, where `N = 16 - len % 16`.
///
/// A full block of padding is added when `data` is already aligned, so the
/// result is never empty and always ends in a valid length byte.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - data.len() % BLOCK_SIZE;
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    // pad_len is in 1..=16.
    padded.resize(data.len() + pad_len, pad_len as u8);
    padded
}

/// Validates the trailing padding and returns the message without it.
pub fn unpad(data: &[u8]) -> Result<&[u8], PaddingError> {
    let &last = data.last().ok_or(PaddingError::EmptyInput)?;
    let pad_len = usize::from(last);
    if pad_len == 0 || pad_len > BLOCK_SIZE {
        return Err(PaddingError::OutOfRange(last));
    }
    if pad_len > data.len() {
        return Err(PaddingError::Inconsistent);
    }
    let (message, padding) = data.split_at(data.len() - pad_len);
    if padding.iter().any(|&b| b != last) {
        return Err(PaddingError::Inconsistent);
    }
    Ok(message)
}

/// Owning variant of [`unpad`]: truncates `data` in place.
pub fn unpad_vec(mut data: Vec<u8>) -> Result<Vec<u8>, PaddingError> {
    let len = unpad(&data)?.len();
    data.truncate(len);
    Ok(data)
}
