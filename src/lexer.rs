//! C1: the lexical row splitter.
//!
//! Splits one logical input line into an ordered sequence of cells, honoring
//! quoting, embedded delimiters, and embedded newlines. Grounded on
//! `lazycsv::Csv`'s explicit two-state scan (outside/inside a quoted field),
//! generalized so that reaching end-of-input while still inside a quote
//! reports [`LexOutcome::Incomplete`] instead of transparently treating it as
//! an error — the multiline driver (§4.9, see [`crate::resource`]) needs that
//! signal to decide whether to pull another physical line.

use crate::dialect::Dialect;
use crate::error::CoreError;

/// The result of tokenizing one logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexOutcome {
    /// The line was a complete, well-formed record.
    Complete(Vec<String>),
    /// The line began a quoted field that was not closed by end-of-input.
    /// Only produced when [`Dialect::allows_multiline_fields`] is set;
    /// otherwise an unterminated quote is a [`CoreError::MalformedRecord`].
    Incomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Outside,
    Inside,
}

/// Splits a single logical line into cells per `dialect`.
///
/// `row` is the 0-based sequence number of the record being lexed, used only
/// to annotate errors; pass `None` when no sequence number is available yet
/// (e.g. while lexing a header row).
pub fn tokenize_line(
    line: &str,
    dialect: &Dialect,
    row: Option<usize>,
) -> Result<LexOutcome, CoreError> {
    let delimiter = dialect.delimiter() as char;
    let quote = dialect.quote() as char;

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut state = LexState::Outside;
    let mut at_cell_start = true;
    let mut cell_was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            LexState::Outside => {
                if dialect.trims_leading_whitespace() && at_cell_start && ch == ' ' {
                    continue;
                }
                if ch == quote && at_cell_start {
                    state = LexState::Inside;
                    cell_was_quoted = true;
                    at_cell_start = false;
                    continue;
                }
                if ch == delimiter {
                    if !cell_was_quoted {
                        validate_unquoted_cell(&current, dialect, row, line)?;
                    }
                    cells.push(std::mem::take(&mut current));
                    at_cell_start = true;
                    cell_was_quoted = false;
                    continue;
                }
                current.push(ch);
                at_cell_start = false;
            }
            LexState::Inside => {
                if ch == quote {
                    if chars.peek() == Some(&quote) {
                        current.push(quote);
                        chars.next();
                        continue;
                    }
                    state = LexState::Outside;
                    continue;
                }
                current.push(ch);
            }
        }
    }

    match state {
        LexState::Inside => {
            if dialect.allows_multiline_fields() {
                // Preserve what has been lexed so far by re-threading it back
                // through the driver; the driver re-invokes us with the
                // embedded newline and the next physical line appended.
                Ok(LexOutcome::Incomplete)
            } else {
                Err(CoreError::unterminated_record(row, line))
            }
        }
        LexState::Outside => {
            if !cell_was_quoted {
                validate_unquoted_cell(&current, dialect, row, line)?;
            }
            cells.push(current);
            Ok(LexOutcome::Complete(cells))
        }
    }
}

fn validate_unquoted_cell(
    cell: &str,
    dialect: &Dialect,
    row: Option<usize>,
    line: &str,
) -> Result<(), CoreError> {
    if let Some(pattern) = dialect.cell_pattern()
        && !pattern.is_match(cell)
    {
        return Err(CoreError::malformed_record(
            row,
            format!("cell {cell:?} does not match the configured cell pattern"),
            line,
        ));
    }
    Ok(())
}
