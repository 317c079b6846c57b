//! C2/C6: scalar cell parsers and their dual renderers.
//!
//! Rather than dispatching on a runtime type tag (the teacher's
//! `ColumnType`/`Value` enum, built for a CLI that infers types from sampled
//! data), the scalar layer here is a type-class-style registry: [`CellParse`]
//! and [`CellRender`] are implemented directly on the Rust type a record
//! field declares, following §9's direction to replace implicit instance
//! resolution with an explicit trait per type. `Option<T>`/`Vec<T>` carry the
//! `Optional T`/`Sequence T` combinators.

use std::marker::PhantomData;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use itertools::Itertools;
use rust_decimal::Decimal;
use url::Url;
use uuid::Uuid;

use crate::dialect::Dialect;
use crate::error::CoreError;

/// Parses a single cell's text into a scalar value, or rejects it with a
/// [`CoreError::CellConversion`] naming `TARGET_KIND` as the attempted type.
///
/// Takes `dialect` for the same reason [`CellRender::render_cell`] does: a
/// combinator like `Sequence T` splits on `dialect.nested_delimiter()`, a
/// configurable value, so the parse side must see the same dialect the
/// render side used or the two sides disagree on what the cell means.
pub trait CellParse: Sized {
    const TARGET_KIND: &'static str;

    fn parse_cell(raw: &str, dialect: &Dialect) -> Result<Self, CoreError>;
}

/// The dual of [`CellParse`]: renders a scalar value back to its cell text.
pub trait CellRender {
    fn render_cell(&self, dialect: &Dialect) -> String;
}

fn conversion_error<T: CellParse>(raw: &str) -> CoreError {
    CoreError::cell_conversion(None, None, T::TARGET_KIND, raw)
}

impl CellParse for String {
    const TARGET_KIND: &'static str = "string";

    fn parse_cell(raw: &str, _dialect: &Dialect) -> Result<Self, CoreError> {
        Ok(raw.to_string())
    }
}

impl CellRender for String {
    fn render_cell(&self, _dialect: &Dialect) -> String {
        self.clone()
    }
}

impl CellRender for str {
    fn render_cell(&self, _dialect: &Dialect) -> String {
        self.to_string()
    }
}

impl CellParse for bool {
    const TARGET_KIND: &'static str = "boolean";

    fn parse_cell(raw: &str, _dialect: &Dialect) -> Result<Self, CoreError> {
        match raw.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(conversion_error::<bool>(raw)),
        }
    }
}

impl CellRender for bool {
    fn render_cell(&self, _dialect: &Dialect) -> String {
        if *self { "true".to_string() } else { "false".to_string() }
    }
}

macro_rules! impl_integer_cell {
    ($ty:ty, $kind:literal) => {
        impl CellParse for $ty {
            const TARGET_KIND: &'static str = $kind;

            fn parse_cell(raw: &str, _dialect: &Dialect) -> Result<Self, CoreError> {
                raw.parse::<$ty>().map_err(|_| conversion_error::<$ty>(raw))
            }
        }

        impl CellRender for $ty {
            fn render_cell(&self, _dialect: &Dialect) -> String {
                self.to_string()
            }
        }
    };
}

impl_integer_cell!(i32, "integer32");
impl_integer_cell!(i64, "integer64");

macro_rules! impl_float_cell {
    ($ty:ty, $kind:literal) => {
        impl CellParse for $ty {
            const TARGET_KIND: &'static str = $kind;

            fn parse_cell(raw: &str, _dialect: &Dialect) -> Result<Self, CoreError> {
                raw.parse::<$ty>().map_err(|_| conversion_error::<$ty>(raw))
            }
        }

        impl CellRender for $ty {
            fn render_cell(&self, _dialect: &Dialect) -> String {
                if self.fract() == 0.0 && self.is_finite() {
                    format!("{}", *self as i64)
                } else {
                    self.to_string()
                }
            }
        }
    };
}

impl_float_cell!(f32, "decimal32");
impl_float_cell!(f64, "decimal64");

impl CellParse for Decimal {
    const TARGET_KIND: &'static str = "decimal";

    fn parse_cell(raw: &str, _dialect: &Dialect) -> Result<Self, CoreError> {
        parse_decimal_literal(raw).ok_or_else(|| conversion_error::<Decimal>(raw))
    }
}

impl CellRender for Decimal {
    fn render_cell(&self, _dialect: &Dialect) -> String {
        self.normalize().to_string()
    }
}

impl CellParse for Uuid {
    const TARGET_KIND: &'static str = "guid";

    fn parse_cell(raw: &str, _dialect: &Dialect) -> Result<Self, CoreError> {
        let trimmed = raw.trim().trim_matches(|c| matches!(c, '{' | '}'));
        Uuid::parse_str(trimmed).map_err(|_| conversion_error::<Uuid>(raw))
    }
}

impl CellRender for Uuid {
    fn render_cell(&self, _dialect: &Dialect) -> String {
        self.to_string()
    }
}

impl CellParse for Url {
    const TARGET_KIND: &'static str = "url";

    fn parse_cell(raw: &str, _dialect: &Dialect) -> Result<Self, CoreError> {
        let parsed = Url::parse(raw).map_err(|_| conversion_error::<Url>(raw))?;
        if parsed.cannot_be_a_base() {
            return Err(conversion_error::<Url>(raw));
        }
        Ok(parsed)
    }
}

impl CellRender for Url {
    fn render_cell(&self, _dialect: &Dialect) -> String {
        self.to_string()
    }
}

const DEFAULT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];
const DEFAULT_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];
const DEFAULT_TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Default `Date` scalar parser: tries a small set of common formats, in the
/// same spirit as the teacher's `parse_naive_date`. Use [`FormattedDate`]
/// instead when the caller needs to pin down one exact format pattern, per
/// §4.2's "caller-supplied format pattern" contract.
impl CellParse for NaiveDate {
    const TARGET_KIND: &'static str = "date";

    fn parse_cell(raw: &str, _dialect: &Dialect) -> Result<Self, CoreError> {
        DEFAULT_DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .ok_or_else(|| conversion_error::<NaiveDate>(raw))
    }
}

impl CellRender for NaiveDate {
    fn render_cell(&self, _dialect: &Dialect) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

impl CellParse for NaiveDateTime {
    const TARGET_KIND: &'static str = "datetime";

    fn parse_cell(raw: &str, _dialect: &Dialect) -> Result<Self, CoreError> {
        DEFAULT_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .ok_or_else(|| conversion_error::<NaiveDateTime>(raw))
    }
}

impl CellRender for NaiveDateTime {
    fn render_cell(&self, _dialect: &Dialect) -> String {
        self.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl CellParse for NaiveTime {
    const TARGET_KIND: &'static str = "time";

    fn parse_cell(raw: &str, _dialect: &Dialect) -> Result<Self, CoreError> {
        DEFAULT_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
            .ok_or_else(|| conversion_error::<NaiveTime>(raw))
    }
}

impl CellRender for NaiveTime {
    fn render_cell(&self, _dialect: &Dialect) -> String {
        self.format("%H:%M:%S").to_string()
    }
}

/// A compile-time date/time format marker, letting a record declare the
/// exact pattern a `Date`/`DateTime`/`Time` field is parsed and rendered
/// with, per §4.2's "caller-supplied format pattern" Date contract.
pub trait DateFormat {
    const PATTERN: &'static str;
}

/// A `NaiveDate` parsed and rendered with a caller-chosen [`DateFormat`]
/// instead of the best-effort default format list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FormattedDate<F: DateFormat>(pub NaiveDate, PhantomData<F>);

impl<F: DateFormat> FormattedDate<F> {
    pub fn new(date: NaiveDate) -> Self {
        FormattedDate(date, PhantomData)
    }
}

impl<F: DateFormat> CellParse for FormattedDate<F> {
    const TARGET_KIND: &'static str = "date";

    fn parse_cell(raw: &str, _dialect: &Dialect) -> Result<Self, CoreError> {
        NaiveDate::parse_from_str(raw, F::PATTERN)
            .map(Self::new)
            .map_err(|_| CoreError::cell_conversion(None, None, "date", raw))
    }
}

impl<F: DateFormat> CellRender for FormattedDate<F> {
    fn render_cell(&self, _dialect: &Dialect) -> String {
        self.0.format(F::PATTERN).to_string()
    }
}

/// `Optional T`: an empty cell parses to `None`; any other text parses (and
/// rejects) exactly as `T` would.
impl<T: CellParse> CellParse for Option<T> {
    const TARGET_KIND: &'static str = T::TARGET_KIND;

    fn parse_cell(raw: &str, dialect: &Dialect) -> Result<Self, CoreError> {
        if raw.is_empty() {
            Ok(None)
        } else {
            T::parse_cell(raw, dialect).map(Some)
        }
    }
}

impl<T: CellRender> CellRender for Option<T> {
    fn render_cell(&self, dialect: &Dialect) -> String {
        match self {
            Some(value) => value.render_cell(dialect),
            None => String::new(),
        }
    }
}

/// `Sequence T`: splits the cell on `dialect.nested_delimiter()` (`|` by
/// default) and parses each element as `T`. Must read the same delimiter
/// [`CellRender`]'s `Vec<T>` impl joins on, or a caller that configures
/// [`Dialect::with_nested_delimiter`] would render with one delimiter and
/// parse with another, breaking the round-trip law (§4.7/§8 property 1).
impl<T: CellParse> CellParse for Vec<T> {
    const TARGET_KIND: &'static str = T::TARGET_KIND;

    fn parse_cell(raw: &str, dialect: &Dialect) -> Result<Self, CoreError> {
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        raw.split(dialect.nested_delimiter()).map(|item| T::parse_cell(item, dialect)).collect()
    }
}

impl<T: CellRender> CellRender for Vec<T> {
    fn render_cell(&self, dialect: &Dialect) -> String {
        self.iter().map(|item| item.render_cell(dialect)).join(&dialect.nested_delimiter().to_string())
    }
}

/// Parses a decimal literal tolerant of thousands separators, surrounding
/// whitespace, and parenthesized negatives (grounded on the teacher's
/// `parse_decimal_literal`), returning `None` instead of bailing so the
/// scalar-parser contract can attach the cell fragment and target kind.
fn parse_decimal_literal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut negative = false;
    let mut body = trimmed;
    if let Some(inner) = body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
        negative = true;
        body = inner;
    }

    body = body.trim();
    if let Some(rest) = body.strip_prefix('-') {
        negative = true;
        body = rest;
    } else if let Some(rest) = body.strip_prefix('+') {
        body = rest;
    }

    body = body.trim();
    let mut sanitized = String::with_capacity(body.len() + 1);
    let mut decimal_seen = false;
    for ch in body.chars() {
        match ch {
            '0'..='9' => sanitized.push(ch),
            '.' => {
                if decimal_seen {
                    return None;
                }
                decimal_seen = true;
                sanitized.push(ch);
            }
            ',' | '_' | ' ' => {}
            _ => return None,
        }
    }

    if !sanitized.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    if negative {
        sanitized.insert(0, '-');
    }

    Decimal::from_str(&sanitized).ok()
}
