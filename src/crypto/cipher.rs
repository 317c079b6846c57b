//! The AES-128-CTR cipher primitive (§4.8). Grounded on the RustCrypto
//! family already present in the pack (the teacher's `sha2`,
//! `other_examples/manifests`' `ed25519-dalek`/`aes-siv`): `aes` supplies the
//! block cipher, `ctr` the streaming counter mode, matching how those crates
//! compose rather than hand-rolling a cipher.

use aes::cipher::{KeyIvInit, StreamCipher};
use aes::Aes128;
use ctr::Ctr128BE;

use crate::error::CoreError;

/// Key length in bytes, fixed by the reference AES-128 instantiation.
pub const KEY_LEN: usize = 16;
/// IV length in bytes — equal to the AES block size for CTR mode.
pub const IV_LEN: usize = 16;

type Aes128Ctr = Ctr128BE<Aes128>;

/// Encrypts (or decrypts — CTR mode is its own inverse) `data` in place
/// under `key`/`iv`, both exactly [`KEY_LEN`]/[`IV_LEN`] bytes.
pub fn apply_keystream(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN], data: &mut [u8]) {
    let mut cipher = Aes128Ctr::new(key.into(), iv.into());
    cipher.apply_keystream(data);
}

/// Validates and copies a raw UTF-8 key string into the fixed-size key array
/// the cipher requires.
pub fn key_bytes(raw_key: &str) -> Result<[u8; KEY_LEN], CoreError> {
    let bytes = raw_key.as_bytes();
    if bytes.len() != KEY_LEN {
        return Err(CoreError::EncodingError {
            row_id: String::new(),
            reason: format!("key must be exactly {KEY_LEN} bytes, got {}", bytes.len()),
        });
    }
    let mut out = [0u8; KEY_LEN];
    out.copy_from_slice(bytes);
    Ok(out)
}
