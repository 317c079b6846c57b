//! Lexical dialect configuration shared by the lexer (C1) and the renderer
//! (C6/C7): delimiter, quote, escape style, and the multiline/whitespace
//! knobs that change how a physical line is split into cells.

use regex::Regex;

/// How a literal quote character is escaped inside a quoted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeStyle {
    /// A quote inside a quoted field is written as two consecutive quotes
    /// (RFC 4180's convention, and the only style this crate implements).
    #[default]
    DoubleQuote,
}

/// The lexical options governing how one physical line is split into cells,
/// and how cells are rendered back into a physical line.
///
/// Mirrors the teacher's `CsvLayout`/`Schema` split of "how to lex" from "how
/// to interpret": a `Dialect` only ever describes delimiter-level syntax.
#[derive(Debug, Clone)]
pub struct Dialect {
    delimiter: u8,
    quote: u8,
    escape_style: EscapeStyle,
    allow_multiline_fields: bool,
    trim_leading_whitespace: bool,
    cell_pattern: Option<Regex>,
    nested_delimiter: char,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect {
            delimiter: b',',
            quote: b'"',
            escape_style: EscapeStyle::DoubleQuote,
            allow_multiline_fields: false,
            trim_leading_whitespace: false,
            cell_pattern: None,
            nested_delimiter: '|',
        }
    }
}

impl Dialect {
    /// The default dialect: comma-delimited, double-quote quoted, no
    /// multiline fields, RFC 4180 compatible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tab-separated variant of the default dialect.
    pub fn tsv() -> Self {
        Dialect {
            delimiter: b'\t',
            ..Self::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_escape_style(mut self, style: EscapeStyle) -> Self {
        self.escape_style = style;
        self
    }

    pub fn with_multiline_fields(mut self, allow: bool) -> Self {
        self.allow_multiline_fields = allow;
        self
    }

    pub fn with_trim_leading_whitespace(mut self, trim: bool) -> Self {
        self.trim_leading_whitespace = trim;
        self
    }

    /// Sets the regular expression an *unquoted* cell must match. Quoted
    /// cells are never checked against this pattern (§9's resolution of the
    /// open question on quoted-cell interaction).
    pub fn with_cell_pattern(mut self, pattern: Regex) -> Self {
        self.cell_pattern = Some(pattern);
        self
    }

    /// Sets the delimiter used to split a `Sequence<T>` cell into elements.
    pub fn with_nested_delimiter(mut self, delimiter: char) -> Self {
        self.nested_delimiter = delimiter;
        self
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn quote(&self) -> u8 {
        self.quote
    }

    pub fn escape_style(&self) -> EscapeStyle {
        self.escape_style
    }

    pub fn allows_multiline_fields(&self) -> bool {
        self.allow_multiline_fields
    }

    pub fn trims_leading_whitespace(&self) -> bool {
        self.trim_leading_whitespace
    }

    pub fn cell_pattern(&self) -> Option<&Regex> {
        self.cell_pattern.as_ref()
    }

    pub fn nested_delimiter(&self) -> char {
        self.nested_delimiter
    }

    /// True iff a rendered cell containing `text` must be quoted per the
    /// quoting-minimality property (§8, property 2): the cell contains the
    /// delimiter, the quote character, or any newline.
    pub fn requires_quoting(&self, text: &str) -> bool {
        let delimiter = self.delimiter as char;
        let quote = self.quote as char;
        text.bytes().any(|b| b == self.delimiter || b == self.quote)
            || text.contains('\n')
            || text.contains('\r')
            || text.contains(delimiter)
            || text.contains(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dialect_is_comma_quoted() {
        let dialect = Dialect::new();
        assert_eq!(dialect.delimiter(), b',');
        assert_eq!(dialect.quote(), b'"');
        assert!(!dialect.allows_multiline_fields());
    }

    #[test]
    fn requires_quoting_detects_delimiter_quote_and_newline() {
        let dialect = Dialect::new();
        assert!(dialect.requires_quoting("a,b"));
        assert!(dialect.requires_quoting("a\"b"));
        assert!(dialect.requires_quoting("a\nb"));
        assert!(!dialect.requires_quoting("plain"));
    }

    #[test]
    fn tsv_dialect_uses_tab_delimiter() {
        assert_eq!(Dialect::tsv().delimiter(), b'\t');
    }
}
