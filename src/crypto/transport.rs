//! The encrypted-row read/write pipeline (§4.8).
//!
//! An encrypted row on disk is a 2-cell outer record `(row-id, payload)`;
//! the row-id indexes a caller-supplied key map, and the payload decodes
//! and decrypts to an inner plaintext record that is itself a complete
//! record of some `R: Record` (re-lexed and parsed via C1/C3, exactly as if
//! it had been read directly from an unencrypted source).

use std::collections::HashMap;

use rand::RngCore;

use crate::crypto::cipher::{apply_keystream, key_bytes, IV_LEN, KEY_LEN};
use crate::crypto::encoding::{self, Encoding};
use crate::dialect::Dialect;
use crate::error::CoreError;
use crate::header::Header;
use crate::lexer::{tokenize_line, LexOutcome};
use crate::record::Record;
use crate::record_schema;
use crate::render::render_line;
use crate::row::Row;
use crate::table::Table;

/// Policy for the encryption transport, orthogonal to the lexical
/// [`Dialect`] used to split the inner record into cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncryptionConfig {
    encoding: Encoding,
}

impl EncryptionConfig {
    pub fn new(encoding: Encoding) -> Self {
        EncryptionConfig { encoding }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

record_schema! {
    /// The 2-cell outer record an encrypted row is stored as.
    struct EncryptedEnvelope {
        row_id: String = "row_id",
        payload: String = "payload",
    }
}

/// Encrypts `record` under `key`, returning the outer `(row_id, payload)`
/// envelope. A fresh random IV is generated per call per §4.8's write
/// pipeline.
pub fn encrypt_row<R: Record>(
    row_id: &str,
    record: &R,
    raw_key: &str,
    dialect: &Dialect,
    config: &EncryptionConfig,
) -> Result<EncryptedEnvelope, CoreError> {
    let key = key_bytes(raw_key)?;
    let inner_line = render_line(&record.render_values(dialect), dialect);

    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);

    let mut buffer = inner_line.into_bytes();
    apply_keystream(&key, &iv, &mut buffer);

    let mut wire = Vec::with_capacity(IV_LEN + buffer.len());
    wire.extend_from_slice(&iv);
    wire.extend_from_slice(&buffer);

    Ok(EncryptedEnvelope { row_id: row_id.to_string(), payload: encoding::encode(&wire, config.encoding()) })
}

/// Decrypts `envelope` under `raw_key`, re-tokenizes the recovered inner
/// record via C1, and parses it as `R` via C3.
pub fn decrypt_row<R: Record>(
    envelope: &EncryptedEnvelope,
    raw_key: &str,
    dialect: &Dialect,
    config: &EncryptionConfig,
) -> Result<R, CoreError> {
    let key = key_bytes(raw_key)?;
    let wire = encoding::decode(&envelope.payload, config.encoding(), &envelope.row_id)?;

    if wire.len() < IV_LEN {
        return Err(CoreError::TruncatedCiphertext { row_id: envelope.row_id.clone(), expected: IV_LEN });
    }
    let (iv_bytes, ciphertext) = wire.split_at(IV_LEN);
    let mut iv = [0u8; IV_LEN];
    iv.copy_from_slice(iv_bytes);

    let mut plaintext = ciphertext.to_vec();
    apply_keystream(&key, &iv, &mut plaintext);
    let inner_line = String::from_utf8(plaintext).map_err(|_| CoreError::EncodingError {
        row_id: envelope.row_id.clone(),
        reason: "decrypted payload is not valid UTF-8".to_string(),
    })?;

    let cells = match tokenize_line(&inner_line, dialect, None)? {
        LexOutcome::Complete(cells) => cells,
        LexOutcome::Incomplete => return Err(CoreError::unterminated_record(None, &inner_line)),
    };

    let header = Header::flat(R::column_names())?;
    R::parse_row(&header, &cells, dialect)
}

/// Looks up the raw key for `row_id` in `key_map`, or reports
/// [`CoreError::KeyNotFound`].
pub fn resolve_key<'a>(key_map: &'a HashMap<String, String>, row_id: &str) -> Result<&'a str, CoreError> {
    key_map.get(row_id).map(String::as_str).ok_or_else(|| CoreError::KeyNotFound { row_id: row_id.to_string() })
}

/// Decrypts every envelope in `envelopes` whose `row_id` satisfies
/// `predicate`, skipping the rest entirely (§4.8's read pipeline:
/// non-matching rows are never looked up or decrypted).
pub fn decrypt_selected<R: Record>(
    envelopes: &[EncryptedEnvelope],
    key_map: &HashMap<String, String>,
    predicate: impl Fn(&str) -> bool,
    dialect: &Dialect,
    config: &EncryptionConfig,
) -> Result<Vec<R>, CoreError> {
    let mut decrypted = Vec::new();
    for envelope in envelopes {
        if !predicate(&envelope.row_id) {
            continue;
        }
        let key = resolve_key(key_map, &envelope.row_id)?;
        decrypted.push(decrypt_row(envelope, key, dialect, config)?);
    }
    Ok(decrypted)
}

/// Encrypts every row of `table` under the key `has_key` assigns it,
/// producing the outer `(row_id, payload)` table the write pipeline
/// serializes (§4.8's write pipeline, lifted from a single row to a whole
/// table while preserving row sequence numbers).
pub fn encrypt_table<R: Record>(
    table: &Table<R>,
    key_map: &HashMap<String, String>,
    has_key: impl Fn(&R) -> String,
    dialect: &Dialect,
    config: &EncryptionConfig,
) -> Result<Table<EncryptedEnvelope>, CoreError> {
    let mut rows = Vec::with_capacity(table.size());
    for row in table.rows() {
        let row_id = has_key(row.value());
        let key = resolve_key(key_map, &row_id)?;
        let envelope = encrypt_row(&row_id, row.value(), key, dialect, config)?;
        rows.push(Row::new(row.sequence(), envelope));
    }
    let header = Header::flat(EncryptedEnvelope::column_names())?;
    Ok(Table::new(Some(header), rows))
}

/// Decrypts an already-parsed outer envelope table down to a table of `R`,
/// applying `predicate` to skip rows without ever consulting the key map
/// for them (§4.8's read pipeline, lifted to a whole table). Sequence
/// numbers of the surviving rows are preserved, matching [`Table::filter`]'s
/// ordering guarantee.
pub fn decrypt_table<R: Record>(
    table: &Table<EncryptedEnvelope>,
    key_map: &HashMap<String, String>,
    predicate: impl Fn(&str) -> bool,
    dialect: &Dialect,
    config: &EncryptionConfig,
) -> Result<Table<R>, CoreError> {
    let mut rows = Vec::new();
    for row in table.rows() {
        let envelope = row.value();
        if !predicate(&envelope.row_id) {
            continue;
        }
        let key = resolve_key(key_map, &envelope.row_id)?;
        let decrypted = decrypt_row::<R>(envelope, key, dialect, config)?;
        rows.push(Row::new(row.sequence(), decrypted));
    }
    let header = Header::flat(R::column_names())?;
    Ok(Table::new(Some(header), rows))
}
