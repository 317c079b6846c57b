//! Generic rows (§3 "Row (generic)"): an ordered, indexable sequence of
//! cells that supports lookup by column name against a table's header,
//! for callers who want to work against a `Table` without declaring a
//! typed [`crate::record::Record`] up front.

use std::ops::Index;

use crate::header::Header;

/// An untyped row: a positional sequence of cells, resolvable by name
/// against whichever [`Header`] it is paired with (typically the owning
/// [`crate::table::Table`]'s header).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellRow(Vec<String>);

impl CellRow {
    pub fn new(cells: Vec<String>) -> Self {
        CellRow(cells)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    /// Looks up the cell at `name`'s position in `header`. Returns `None`
    /// both when `header` has no such column and when the row itself is
    /// shorter than that position (the latter should not occur for a row
    /// that satisfied the table's arity invariant at parse time).
    pub fn get<'a>(&'a self, header: &Header, name: &str) -> Option<&'a str> {
        header.index_of(name).and_then(|index| self.0.get(index)).map(String::as_str)
    }
}

impl Index<usize> for CellRow {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.0[index]
    }
}

impl From<Vec<String>> for CellRow {
    fn from(cells: Vec<String>) -> Self {
        CellRow(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_resolves_by_header_position() {
        let header = Header::flat(vec!["a".into(), "b".into()]).unwrap();
        let row = CellRow::new(vec!["1".into(), "2".into()]);
        assert_eq!(row.get(&header, "b"), Some("2"));
        assert_eq!(row.get(&header, "missing"), None);
    }

    #[test]
    fn index_operator_reads_by_position() {
        let row = CellRow::new(vec!["x".into(), "y".into()]);
        assert_eq!(&row[1], "y");
    }
}
