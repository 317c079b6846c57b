//! C8: the per-row encryption transport.

pub mod cipher;
pub mod encoding;
pub mod keygen;
pub mod transport;

pub use encoding::Encoding;
pub use keygen::generate_key;
pub use transport::{
    decrypt_row, decrypt_selected, decrypt_table, encrypt_row, encrypt_table, resolve_key, EncryptedEnvelope,
    EncryptionConfig,
};
