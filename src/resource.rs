//! C9: effect/resource plumbing.
//!
//! `Eff<T>` from the design is realized as a plain `Result<T, CoreError>`
//! (see SPEC_FULL.md §4.9's implementation note) — there is no bespoke type
//! here, since `?`/`Result::map`/`and_then` already give the `flatMap`/`map`
//! story for free. What remains to implement is the line-source abstraction
//! the parser drives, the scope-guard combinator, and the multiline
//! continuation driver built on top of [`crate::lexer`].

use crate::dialect::Dialect;
use crate::error::CoreError;
use crate::lexer::{tokenize_line, LexOutcome};

/// An abstract source of physical lines, one `Result` per line. Implemented
/// for any `Iterator<Item = std::io::Result<String>>` (e.g.
/// `BufRead::lines()`), mirroring the teacher's `BufReader` ownership
/// discipline in spirit without requiring a concrete reader type.
pub trait LineSource {
    fn next_line(&mut self) -> Option<std::io::Result<String>>;
}

impl<I> LineSource for I
where
    I: Iterator<Item = std::io::Result<String>>,
{
    fn next_line(&mut self) -> Option<std::io::Result<String>> {
        self.next()
    }
}

/// Runs `use_resource` over the value `acquire` produces, always invoking
/// `release` afterward regardless of whether `use_resource` returned `Ok`
/// or `Err` — the realization of the design's `using(acquire, use)`
/// combinator. Release-on-panic is handled by a drop guard rather than a
/// second call to `release` in an unwind path, so `release` only ever runs
/// once.
pub fn with_resource<A, T, E>(
    acquire: impl FnOnce() -> A,
    use_resource: impl FnOnce(&mut A) -> Result<T, E>,
    release: impl FnOnce(A),
) -> Result<T, E> {
    struct Guard<A, F: FnOnce(A)> {
        value: Option<A>,
        release: Option<F>,
    }
    impl<A, F: FnOnce(A)> Drop for Guard<A, F> {
        fn drop(&mut self) {
            if let (Some(value), Some(release)) = (self.value.take(), self.release.take()) {
                release(value);
            }
        }
    }

    let mut guard = Guard { value: Some(acquire()), release: Some(release) };
    let result = use_resource(guard.value.as_mut().expect("resource acquired above"));
    result
}

/// Reads one logical record (possibly spanning several physical lines under
/// multiline mode) from `source`, tokenizing it against `dialect`.
///
/// Returns `Ok(None)` at a clean end of stream (no partial record pending).
/// `row` is the 0-based sequence number used to annotate errors.
pub fn read_logical_record(
    source: &mut dyn LineSource,
    dialect: &Dialect,
    row: Option<usize>,
) -> Result<Option<Vec<String>>, CoreError> {
    let first = match source.next_line() {
        None => return Ok(None),
        Some(line) => line?,
    };

    let mut accumulated = first;
    loop {
        match tokenize_line(&accumulated, dialect, row)? {
            LexOutcome::Complete(cells) => return Ok(Some(cells)),
            LexOutcome::Incomplete => match source.next_line() {
                None => return Err(CoreError::unterminated_record(row, &accumulated)),
                Some(line) => {
                    accumulated.push('\n');
                    accumulated.push_str(&line?);
                }
            },
        }
    }
}
