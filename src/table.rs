//! C5: the immutable table container.
//!
//! A `Table` pairs an optional [`Header`] with an ordered sequence of
//! [`Row`]s. Every operation below returns a new `Table`; none mutates the
//! receiver, satisfying §4.5's purity invariant.

use crate::header::Header;
use crate::row::Row;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<R> {
    header: Option<Header>,
    rows: Vec<Row<R>>,
}

impl<R> Table<R> {
    pub fn new(header: Option<Header>, rows: Vec<Row<R>>) -> Self {
        Table { header, rows }
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn rows(&self) -> &[Row<R>] {
        &self.rows
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iterator(&self) -> impl Iterator<Item = &Row<R>> {
        self.rows.iter()
    }

    pub fn head(&self) -> Option<&Row<R>> {
        self.rows.first()
    }

    /// First `n` rows, keeping the header untouched.
    pub fn take(&self, n: usize) -> Table<R>
    where
        R: Clone,
    {
        Table { header: self.header.clone(), rows: self.rows.iter().take(n).cloned().collect() }
    }

    /// Maps every row's value with `f`. Arity-preserving by construction
    /// (`f` returns a single `S` per `R`); the caller decides whether the
    /// existing header still describes `S` by supplying `header_for_mapped`.
    pub fn map<S>(&self, header_for_mapped: Option<Header>, f: impl Fn(&R) -> S) -> Table<S> {
        let rows = self.rows.iter().map(|row| Row::new(row.sequence(), f(row.value()))).collect();
        Table { header: header_for_mapped, rows }
    }

    /// Keeps only rows whose value satisfies `predicate`. Header and
    /// sequence numbers are preserved (§5's ordering guarantee: `filter`
    /// retains original numbers).
    pub fn filter(&self, predicate: impl Fn(&R) -> bool) -> Table<R>
    where
        R: Clone,
    {
        let rows = self.rows.iter().filter(|row| predicate(row.value())).cloned().collect();
        Table { header: self.header.clone(), rows }
    }

    /// Maps every row to `Option<S>`, keeping only the rows that produced
    /// `Some`.
    pub fn map_optional<S>(&self, header_for_mapped: Option<Header>, f: impl Fn(&R) -> Option<S>) -> Table<S> {
        let rows = self
            .rows
            .iter()
            .filter_map(|row| f(row.value()).map(|mapped| Row::new(row.sequence(), mapped)))
            .collect();
        Table { header: header_for_mapped, rows }
    }

    /// Concatenates `self` then `other`, preserving order (self first).
    /// Both tables must share a header, or both must be headerless.
    pub fn concat(&self, other: &Table<R>) -> Result<Table<R>, String>
    where
        R: Clone,
    {
        match (&self.header, &other.header) {
            (Some(a), Some(b)) if a != b => {
                return Err("cannot concatenate tables with differing headers".to_string());
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err("cannot concatenate a headered table with a headerless one".to_string());
            }
            _ => {}
        }
        let mut rows = self.rows.clone();
        rows.extend(other.rows.iter().cloned());
        Ok(Table { header: self.header.clone(), rows })
    }

    /// Keeps rows whose key (extracted via `key_of`) satisfies `predicate` —
    /// a typed convenience over [`Table::filter`].
    pub fn filter_by_key<K>(&self, key_of: impl Fn(&R) -> K, predicate: impl Fn(&K) -> bool) -> Table<R>
    where
        R: Clone,
    {
        self.filter(|value| predicate(&key_of(value)))
    }
}
