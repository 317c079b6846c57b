//! The top-level table parser tying together the header model (C4), the
//! lexer/multiline driver (C1/C9), and the record factory (C3) into the
//! single entry point callers drive a [`crate::table::Table`] from.

use std::fmt;
use std::sync::Arc;

use crate::dialect::Dialect;
use crate::error::CoreError;
use crate::generic::CellRow;
use crate::header::{Header, DEFAULT_NAME_SEPARATOR};
use crate::record::Record;
use crate::resource::{read_logical_record, LineSource};
use crate::row::Row;
use crate::table::Table;

/// A row-sampling predicate evaluated against a record's 0-based sequence
/// number (§6's `predicate: (row-id | sequence-number) -> bool`). Rows for
/// which it returns `false` are skipped entirely — never parsed, never
/// counted as a drop — before their cells even reach the record factory.
pub type RowPredicate = Arc<dyn Fn(usize) -> bool + Send + Sync>;

/// Configuration for [`parse_table`], separate from the purely lexical
/// [`Dialect`] — mirrors the teacher's split between `CsvLayout` (lexical)
/// and `Schema`/CLI flags (parse-level policy).
#[derive(Clone)]
pub struct ParseConfig {
    dialect: Dialect,
    has_header: bool,
    header_rows_to_read: usize,
    forgiving: bool,
    trim_header: bool,
    name_separator: String,
    predicate: Option<RowPredicate>,
}

impl fmt::Debug for ParseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseConfig")
            .field("dialect", &self.dialect)
            .field("has_header", &self.has_header)
            .field("header_rows_to_read", &self.header_rows_to_read)
            .field("forgiving", &self.forgiving)
            .field("trim_header", &self.trim_header)
            .field("name_separator", &self.name_separator)
            .field("predicate", &self.predicate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            dialect: Dialect::new(),
            has_header: true,
            header_rows_to_read: 1,
            forgiving: false,
            trim_header: false,
            name_separator: DEFAULT_NAME_SEPARATOR.to_string(),
            predicate: None,
        }
    }
}

impl ParseConfig {
    pub fn new(dialect: Dialect) -> Self {
        ParseConfig { dialect, ..Default::default() }
    }

    /// Whether a leading header row (or [`ParseConfig::with_header_rows_to_read`]
    /// of them) is consumed before body rows. When `false`, a synthetic
    /// positional header is derived from the record type's own declared
    /// column names (§6's `hasHeader` option).
    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_header_rows_to_read(mut self, count: usize) -> Self {
        self.header_rows_to_read = count;
        self
    }

    /// When set, a per-row parse failure is dropped (and logged) instead of
    /// aborting the whole parse (§7's forgiveness policy).
    pub fn with_forgiving(mut self, forgiving: bool) -> Self {
        self.forgiving = forgiving;
        self
    }

    pub fn with_trim_header(mut self, trim: bool) -> Self {
        self.trim_header = trim;
        self
    }

    pub fn with_name_separator(mut self, separator: impl Into<String>) -> Self {
        self.name_separator = separator.into();
        self
    }

    /// Sets a row-sampling predicate (§6): a row whose 0-based sequence
    /// number does not satisfy `predicate` is skipped before parsing,
    /// without counting as a dropped/forgiven row.
    pub fn with_predicate(mut self, predicate: impl Fn(usize) -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    fn accepts(&self, sequence: usize) -> bool {
        self.predicate.as_ref().is_none_or(|predicate| predicate(sequence))
    }
}

/// Parses a complete table of `R` records from `source`.
///
/// In forgiving mode, rows that fail to parse are dropped from the
/// resulting table rather than aborting the parse; the dropped rows'
/// errors are returned alongside the table for the caller to inspect or
/// log, and the table's row sequence numbers still reflect original input
/// position (§5's ordering guarantee — `filter`-like dropping retains
/// numbering on the rows that remain).
pub fn parse_table<R: Record>(
    source: &mut dyn LineSource,
    config: &ParseConfig,
) -> Result<(Table<R>, Vec<CoreError>), CoreError> {
    let header = if config.has_header {
        read_header(source, config)?
    } else {
        Header::flat(R::column_names())?
    };
    let mut rows = Vec::new();
    let mut dropped = Vec::new();
    let mut sequence = 0usize;

    while let Some(cells) = read_logical_record(source, &config.dialect, Some(sequence))? {
        if !config.accepts(sequence) {
            sequence += 1;
            continue;
        }
        match R::parse_row(&header, &cells, &config.dialect) {
            Ok(value) => rows.push(Row::new(sequence, value)),
            Err(err) if config.forgiving && err.is_per_row() => {
                log::warn!("dropping row {sequence}: {err}");
                dropped.push(err);
            }
            Err(err) => return Err(err),
        }
        sequence += 1;
    }

    Ok((Table::new(Some(header), rows), dropped))
}

/// Parses a complete table of untyped [`CellRow`]s from `source`, without
/// requiring a declared [`Record`] type (§3's "Row (generic)"). A row whose
/// arity does not match the header's is a per-row [`CoreError::MalformedRecord`],
/// subject to the same `forgiving` policy as a typed parse failure.
pub fn parse_generic_table(
    source: &mut dyn LineSource,
    config: &ParseConfig,
) -> Result<(Table<CellRow>, Vec<CoreError>), CoreError> {
    let header = if config.has_header { Some(read_header(source, config)?) } else { None };
    let mut rows = Vec::new();
    let mut dropped = Vec::new();
    let mut sequence = 0usize;

    while let Some(cells) = read_logical_record(source, &config.dialect, Some(sequence))? {
        if !config.accepts(sequence) {
            sequence += 1;
            continue;
        }
        if let Some(header) = &header
            && cells.len() != header.len()
        {
            let err = CoreError::malformed_record(
                Some(sequence),
                format!("row has {} cells, header has {}", cells.len(), header.len()),
                &cells.join(","),
            );
            if config.forgiving {
                log::warn!("dropping row {sequence}: {err}");
                dropped.push(err);
                sequence += 1;
                continue;
            }
            return Err(err);
        }
        rows.push(Row::new(sequence, CellRow::new(cells)));
        sequence += 1;
    }

    Ok((Table::new(header, rows), dropped))
}

fn read_header(source: &mut dyn LineSource, config: &ParseConfig) -> Result<Header, CoreError> {
    let mut physical_rows = Vec::with_capacity(config.header_rows_to_read);
    for _ in 0..config.header_rows_to_read {
        match read_logical_record(source, &config.dialect, None)? {
            Some(mut cells) => {
                if config.trim_header {
                    for cell in &mut cells {
                        *cell = cell.trim().to_string();
                    }
                }
                physical_rows.push(cells);
            }
            None => return Err(CoreError::unterminated_record(None, "")),
        }
    }

    if physical_rows.len() == 1 {
        Header::flat(physical_rows.into_iter().next().expect("checked len == 1"))
    } else {
        Header::grouped(&physical_rows, &config.name_separator)
    }
}
