//! The structured error taxonomy returned by every public entry point.
//!
//! Every failure kind named in the design (lexing, scalar conversion, header
//! resolution, and the encryption transport) is a distinct [`CoreError`]
//! variant rather than a stringly-typed message, so callers can match on the
//! kind of failure instead of parsing text.

use thiserror::Error;

/// Maximum number of bytes of an offending fragment kept in an error message.
///
/// Fatal errors must never embed an unbounded line from the input in their
/// `Display` output, since a pathological input could otherwise produce an
/// error message as large as the input itself.
pub const FRAGMENT_TRUNCATION_LIMIT: usize = 120;

/// Truncates `text` to [`FRAGMENT_TRUNCATION_LIMIT`] bytes on a `char`
/// boundary, appending an ellipsis when truncation occurred.
pub fn truncate_fragment(text: &str) -> String {
    if text.len() <= FRAGMENT_TRUNCATION_LIMIT {
        return text.to_string();
    }
    let mut end = FRAGMENT_TRUNCATION_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}

/// The structured error taxonomy for the typed tabular codec.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The lexer reached an illegal state while splitting a physical line
    /// into cells (an unbalanced quote outside of multiline mode, or a cell
    /// that fails a configured `cellPattern`).
    #[error("malformed record at row {row:?}: {reason} (near {fragment:?})")]
    MalformedRecord {
        row: Option<usize>,
        reason: String,
        fragment: String,
    },

    /// End-of-stream was reached while still inside a quoted field, with
    /// multiline continuation disabled (or the stream ran out while a
    /// multiline record was still incomplete).
    #[error("unterminated record at row {row:?} (near {fragment:?})")]
    UnterminatedRecord { row: Option<usize>, fragment: String },

    /// A scalar parser rejected a cell's text for the target type.
    #[error("cannot parse {fragment:?} as {target_kind} (row {row:?}, field {field:?})")]
    CellConversion {
        row: Option<usize>,
        field: Option<String>,
        target_kind: &'static str,
        fragment: String,
    },

    /// A record field had no matching header column and is not optional.
    #[error("header column missing for field {field:?}")]
    HeaderColumnMissing { field: String },

    /// Header rows did not have equal length, or produced duplicate joined
    /// names.
    #[error("header shape mismatch: {reason}")]
    HeaderShapeMismatch { reason: String },

    /// An encrypted payload was not valid hex or base64 for the configured
    /// encoding.
    #[error("encoding error for row {row_id:?}: {reason}")]
    EncodingError { row_id: String, reason: String },

    /// A row selected by the encryption predicate had no key in the caller's
    /// key map.
    #[error("no key found for row {row_id:?}")]
    KeyNotFound { row_id: String },

    /// A payload was shorter than the cipher's minimum IV length.
    #[error("ciphertext for row {row_id:?} is shorter than the {expected}-byte IV")]
    TruncatedCiphertext { row_id: String, expected: usize },

    /// An authenticated cipher mode rejected a payload. Not reachable by the
    /// default AES-128-CTR instantiation, which has no authentication tag,
    /// but part of the taxonomy for cipher implementations that do.
    #[error("authentication failed for row {row_id:?}")]
    AuthenticationFailed { row_id: String },

    /// The underlying line source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn malformed_record(row: Option<usize>, reason: impl Into<String>, fragment: &str) -> Self {
        CoreError::MalformedRecord {
            row,
            reason: reason.into(),
            fragment: truncate_fragment(fragment),
        }
    }

    pub fn unterminated_record(row: Option<usize>, fragment: &str) -> Self {
        CoreError::UnterminatedRecord {
            row,
            fragment: truncate_fragment(fragment),
        }
    }

    pub fn cell_conversion(
        row: Option<usize>,
        field: Option<&str>,
        target_kind: &'static str,
        fragment: &str,
    ) -> Self {
        CoreError::CellConversion {
            row,
            field: field.map(str::to_string),
            target_kind,
            fragment: truncate_fragment(fragment),
        }
    }

    /// The taxonomy kind as a stable identifier, useful for callers that want
    /// to branch on kind without matching the full variant (e.g. to decide
    /// whether an error is "fatal" per §7's propagation rules).
    pub fn is_per_row(&self) -> bool {
        matches!(
            self,
            CoreError::MalformedRecord { .. }
                | CoreError::UnterminatedRecord { .. }
                | CoreError::CellConversion { .. }
        )
    }
}
