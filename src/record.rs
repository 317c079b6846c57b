//! C3: the record parser/renderer framework.
//!
//! The original system built one factory per field-count (arity 1 through
//! 12). §9 rules that out for this crate in favor of an explicit trait with a
//! field-name list the implementing type supplies itself — closer to how the
//! teacher hand-writes a `FromStr`/`Display` pair per concrete row type than
//! to a reflective or macro-generated arity ladder. [`record_schema!`] is a
//! thin declarative-macro front end over the same trait, for structs that
//! don't need anything beyond straightforward field-by-name resolution.

use crate::dialect::Dialect;
use crate::error::CoreError;
use crate::header::Header;
use crate::value::{CellParse, CellRender};

/// A type that can be parsed from, and rendered to, one logical row of cells
/// against a [`Header`] giving each position a name.
pub trait Record: Sized {
    /// The column names this record contributes to a header, in field
    /// declaration order. A nested-record field contributes its own
    /// `column_names()`, each prefixed with `"<field>."` (§4.3/§4.6); a
    /// [`Skip`] field contributes an empty name (§9's resolution of the
    /// skip-renderer open question).
    fn column_names() -> Vec<String>;

    /// Parses one row of cells into `Self`, resolving each field against
    /// `header` by name. `dialect` is threaded through to every scalar
    /// field's [`CellParse::parse_cell`] so a `Sequence T` field reads back
    /// whatever nested delimiter the caller configured.
    fn parse_row(header: &Header, cells: &[String], dialect: &Dialect) -> Result<Self, CoreError>;

    /// Renders `Self` back into one row of cells, in the same order as
    /// [`Record::column_names`].
    fn render_values(&self, dialect: &Dialect) -> Vec<String>;
}

/// A column reserved in the row shape but not modeled as data: parses any
/// cell text without inspecting it and renders back out as an empty cell
/// under an empty column name. Lets a record's field list skip over columns
/// the caller has no use for without losing the column count invariant
/// (§9's resolution of the skip-renderer open question).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Skip;

impl CellParse for Skip {
    const TARGET_KIND: &'static str = "skip";

    fn parse_cell(_raw: &str, _dialect: &Dialect) -> Result<Self, CoreError> {
        Ok(Skip)
    }
}

impl CellRender for Skip {
    fn render_cell(&self, _dialect: &Dialect) -> String {
        String::new()
    }
}

/// The "skip" variant of a nested record (§4.6): `N` positionally-reserved
/// columns that carry no data. Unlike [`project_nested`]/[`render_nested`],
/// which namespace a real nested record's columns under `"<prefix>."`, a
/// `SkipBlock`'s own [`Record::column_names`] are empty strings, so an outer
/// record that splices them in directly (rather than through
/// `render_nested`'s prefixing) emits exactly `N` empty cells and `N` empty
/// header names — enough to keep a partial projection positionally aligned
/// with a reader that expects the full schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipBlock<const N: usize>;

impl<const N: usize> Record for SkipBlock<N> {
    fn column_names() -> Vec<String> {
        vec![String::new(); N]
    }

    fn parse_row(_header: &Header, _cells: &[String], _dialect: &Dialect) -> Result<Self, CoreError> {
        Ok(SkipBlock)
    }

    fn render_values(&self, _dialect: &Dialect) -> Vec<String> {
        vec![String::new(); N]
    }
}

/// Looks `field` up in `header` and parses the cell at that position as `T`.
/// Used by hand-written and macro-generated [`Record`] impls for scalar
/// fields.
///
/// Per §4.3 point 3, a field whose column is wholly absent from the header
/// is not automatically fatal: `T::parse_cell("", dialect)` is attempted as
/// a substitute first, so an optional field (`Option<T>`, which accepts an
/// empty cell as `None`) or any other type that tolerates an empty cell
/// still resolves. Only when that substitution itself fails — as it does
/// for a genuinely required scalar like `i32` or `bool` — is the column's
/// absence reported as [`CoreError::HeaderColumnMissing`].
pub fn resolve_scalar<T: CellParse>(
    header: &Header,
    cells: &[String],
    field: &str,
    dialect: &Dialect,
) -> Result<T, CoreError> {
    match header.index_of(field) {
        Some(index) => {
            let raw = cells.get(index).map(String::as_str).unwrap_or("");
            T::parse_cell(raw, dialect).map_err(|err| attach_field(err, field))
        }
        None => T::parse_cell("", dialect)
            .map_err(|_| CoreError::HeaderColumnMissing { field: field.to_string() }),
    }
}

/// Reads the cell at `position` directly, bypassing name resolution — used
/// for [`Skip`] fields, whose column name is empty and so cannot be looked
/// up by [`Header::index_of`]. `position` is the field's 0-based index
/// among the record's own declared fields, which callers (typically
/// [`record_schema!`]) are responsible for keeping aligned with the
/// physical column position.
pub fn resolve_by_position<T: CellParse>(cells: &[String], position: usize, dialect: &Dialect) -> Result<T, CoreError> {
    let raw = cells.get(position).map(String::as_str).unwrap_or("");
    T::parse_cell(raw, dialect)
}

fn attach_field(err: CoreError, field: &str) -> CoreError {
    match err {
        CoreError::CellConversion { row, field: None, target_kind, fragment } => {
            CoreError::CellConversion { row, field: Some(field.to_string()), target_kind, fragment }
        }
        other => other,
    }
}

/// Projects `header`/`cells` down to the columns namespaced under
/// `"<prefix>."`, stripping the prefix from each retained column name —
/// the pairing a nested-record field parses and renders against (§4.3).
pub fn project_nested<'a>(header: &Header, cells: &'a [String], prefix: &str) -> (Header, Vec<String>) {
    let marker = format!("{prefix}.");
    let mut names = Vec::new();
    let mut projected = Vec::new();
    for (name, cell) in header.names().iter().zip(cells.iter()) {
        if let Some(stripped) = name.strip_prefix(&marker) {
            names.push(stripped.to_string());
            projected.push(cell.clone());
        }
    }
    (Header::flat(names).unwrap_or_else(|_| Header::flat(Vec::new()).unwrap()), projected)
}

/// Renders a nested record's values under `"<prefix>."`-namespaced column
/// names, pairing [`Record::column_names`] with [`Record::render_values`]
/// for a single combined row.
pub fn render_nested<R: Record>(record: &R, dialect: &Dialect, prefix: &str) -> (Vec<String>, Vec<String>) {
    let names = R::column_names().into_iter().map(|name| format!("{prefix}.{name}")).collect();
    let values = record.render_values(dialect);
    (names, values)
}

/// Declares a struct implementing [`Record`] by listing each field's column
/// name and type, mirroring how the teacher hand-writes one parser per
/// fixed-arity row shape — except here there is exactly one macro, and it
/// scales to any arity.
///
/// ```ignore
/// record_schema! {
///     struct Person {
///         name: String = "name",
///         age: i32 = "age",
///     }
/// }
/// ```
#[macro_export]
macro_rules! record_schema {
    (
        $(#[$meta:meta])*
        struct $name:ident {
            $( $field:ident : $ty:ty = $column:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $( pub $field: $ty ),*
        }

        impl $crate::record::Record for $name {
            fn column_names() -> Vec<String> {
                vec![ $( $column.to_string() ),* ]
            }

            fn parse_row(
                header: &$crate::header::Header,
                cells: &[String],
                dialect: &$crate::dialect::Dialect,
            ) -> Result<Self, $crate::error::CoreError> {
                Ok($name {
                    $( $field: $crate::record::resolve_scalar(header, cells, $column, dialect)?, )*
                })
            }

            fn render_values(&self, dialect: &$crate::dialect::Dialect) -> Vec<String> {
                use $crate::value::CellRender;
                vec![ $( self.$field.render_cell(dialect) ),* ]
            }
        }
    };
}
