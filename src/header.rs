//! C4: the header model.
//!
//! A header is one or more physical rows of column-name tokens. With a
//! single header row the column names are used verbatim; with more than one
//! the names at each position are joined with a separator (`.` by default)
//! to produce the fully-qualified column name the record factory (C3/C6)
//! resolves against.

use crate::error::CoreError;

/// Default separator used to join multi-row header tokens, and to namespace
/// nested-record columns (§4.3, §4.6).
pub const DEFAULT_NAME_SEPARATOR: &str = ".";

/// An ordered sequence of column names, possibly produced by joining several
/// physical header rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
}

impl Header {
    /// Builds a flat header from a single row of tokens.
    pub fn flat(names: Vec<String>) -> Result<Self, CoreError> {
        let header = Header { names };
        header.validate_uniqueness()?;
        Ok(header)
    }

    /// Builds a header by positionally joining several physical rows with
    /// `separator`. Blank tokens are skipped (not treated as empty joined
    /// components), per §4.4.
    pub fn grouped(rows: &[Vec<String>], separator: &str) -> Result<Self, CoreError> {
        if rows.is_empty() {
            return Header::flat(Vec::new());
        }
        let width = rows[0].len();
        if rows.iter().any(|row| row.len() != width) {
            return Err(CoreError::HeaderShapeMismatch {
                reason: "header rows have unequal lengths".to_string(),
            });
        }
        let mut names = Vec::with_capacity(width);
        for col in 0..width {
            let joined = rows
                .iter()
                .map(|row| row[col].as_str())
                .filter(|token| !token.is_empty())
                .collect::<Vec<_>>()
                .join(separator);
            names.push(joined);
        }
        Header::flat(names)
    }

    fn validate_uniqueness(&self) -> Result<(), CoreError> {
        let mut seen = std::collections::HashSet::new();
        for name in &self.names {
            if name.is_empty() {
                continue;
            }
            if !seen.insert(name.as_str()) {
                return Err(CoreError::HeaderShapeMismatch {
                    reason: format!("duplicate header column name '{name}'"),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of the first occurrence of `name` in the header (tie-break
    /// (a) of §4.3: on duplicate column names, the first wins; duplicates
    /// are only reachable via [`Header::subheader`], since [`Header::flat`]
    /// itself rejects them).
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }

    /// Returns the header restricted to columns whose name starts with
    /// `prefix.`, with that prefix stripped — used to rebind the header view
    /// before recursing into a nested record field (§4.3).
    pub fn subheader(&self, prefix: &str) -> Header {
        let marker = format!("{prefix}{DEFAULT_NAME_SEPARATOR}");
        let names = self
            .names
            .iter()
            .filter_map(|name| name.strip_prefix(&marker).map(str::to_string))
            .collect();
        Header { names }
    }
}
