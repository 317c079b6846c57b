//! C6/C7: scalar/record renderers and the line-oriented serializer.
//!
//! Quoting and escaping live here rather than in [`crate::dialect`] because
//! they are a function of a cell's *content*, decided independently for
//! every rendered cell (§4.7's quoting policy), whereas `Dialect` only fixes
//! which characters trigger quoting.

use crate::dialect::Dialect;
use crate::record::Record;
use crate::table::Table;

/// Quotes `cell` per `dialect` if it contains the delimiter, the quote
/// character, or a newline; a contained quote is doubled either way before
/// deciding whether quoting is needed.
pub fn render_cell_text(cell: &str, dialect: &Dialect) -> String {
    if !dialect.requires_quoting(cell) {
        return cell.to_string();
    }
    let quote = dialect.quote() as char;
    let mut escaped = String::with_capacity(cell.len() + 2);
    escaped.push(quote);
    for ch in cell.chars() {
        if ch == quote {
            escaped.push(quote);
        }
        escaped.push(ch);
    }
    escaped.push(quote);
    escaped
}

/// Joins already-rendered cell strings into one physical line, quoting each
/// per [`render_cell_text`]. Exposed for the encryption transport (C8),
/// which renders an inner plaintext record the same way the top-level
/// serializer does, without a surrounding table.
pub fn render_line(cells: &[String], dialect: &Dialect) -> String {
    let delimiter = dialect.delimiter() as char;
    cells.iter().map(|cell| render_cell_text(cell, dialect)).collect::<Vec<_>>().join(&delimiter.to_string())
}

/// Serializes `table` to a string: one header line (from `R::column_names`)
/// followed by one line per row, `\n`-terminated (§4.7).
pub fn render_table<R: Record>(table: &Table<R>, dialect: &Dialect) -> String {
    let mut output = String::new();
    output.push_str(&render_line(&R::column_names(), dialect));
    output.push('\n');
    for row in table.rows() {
        output.push_str(&render_line(&row.value().render_values(dialect), dialect));
        output.push('\n');
    }
    output
}

/// Streams `table` to `writer` instead of building the whole document in
/// memory, for large tables.
pub fn write_table<R: Record>(
    table: &Table<R>,
    dialect: &Dialect,
    writer: &mut impl std::io::Write,
) -> std::io::Result<()> {
    writeln!(writer, "{}", render_line(&R::column_names(), dialect))?;
    for row in table.rows() {
        writeln!(writer, "{}", render_line(&row.value().render_values(dialect), dialect))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_schema;
    use crate::row::Row;

    record_schema! {
        struct Point {
            x: i32 = "x",
            y: i32 = "y",
        }
    }

    #[test]
    fn cell_with_delimiter_is_quoted() {
        let dialect = Dialect::new();
        assert_eq!(render_cell_text("a,b", &dialect), "\"a,b\"");
        assert_eq!(render_cell_text("plain", &dialect), "plain");
    }

    #[test]
    fn contained_quote_is_doubled() {
        let dialect = Dialect::new();
        assert_eq!(render_cell_text(r#"he said "hi""#, &dialect), r#""he said ""hi""""#);
    }

    #[test]
    fn render_table_emits_header_then_rows() {
        let table = Table::new(None, vec![Row::new(0, Point { x: 1, y: 2 }), Row::new(1, Point { x: 3, y: 4 })]);
        let dialect = Dialect::new();
        let rendered = render_table(&table, &dialect);
        assert_eq!(rendered, "x,y\n1,2\n3,4\n");
    }
}
