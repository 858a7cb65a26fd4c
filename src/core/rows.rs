//! Delimited-text rows for the catalog file.
//!
//! Quoting follows RFC 4180:
//! - fields are separated by `,` and rows end with CRLF (LF is accepted on read)
//! - a field containing `,`, `"`, CR or LF is wrapped in double quotes
//! - a `"` inside a quoted field is written twice
//!
//! An empty line is a row with no fields. A row holding a single empty field
//! is written as `""` so the two cases survive a round trip.

use std::io::{self, Write};

use crate::domain::{CatalogError, CatalogResult};

const DELIMITER: char = ',';
const QUOTE: char = '"';
const TERMINATOR: &str = "\r\n";

/// Pull-style reader over the full text of a catalog file
pub struct RowReader<'a> {
    input: &'a str,
    pos: usize,
    row: usize,
}

impl<'a> RowReader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            row: 0,
        }
    }

    /// Number of rows consumed so far (1-based number of the last row read)
    pub fn row(&self) -> usize {
        self.row
    }

    /// Read the next row. `Ok(None)` means the input is exhausted.
    pub fn next_row(&mut self) -> CatalogResult<Option<Vec<String>>> {
        if self.pos >= self.input.len() {
            return Ok(None);
        }
        self.row += 1;

        if self.at_line_end() {
            self.consume_line_end();
            return Ok(Some(Vec::new()));
        }

        let mut fields = Vec::new();
        loop {
            let field = if self.peek() == Some(QUOTE) {
                self.quoted_field()?
            } else {
                self.bare_field()
            };
            fields.push(field);

            match self.peek() {
                Some(DELIMITER) => {
                    self.pos += 1;
                    if self.pos >= self.input.len() || self.at_line_end() {
                        // Trailing delimiter: one more empty field
                        fields.push(String::new());
                        self.consume_line_end();
                        break;
                    }
                }
                None => break,
                Some(_) => {
                    self.consume_line_end();
                    break;
                }
            }
        }

        Ok(Some(fields))
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek(), Some('\r') | Some('\n'))
    }

    fn consume_line_end(&mut self) {
        let rest = &self.input[self.pos..];
        if rest.starts_with("\r\n") {
            self.pos += 2;
        } else if rest.starts_with('\n') || rest.starts_with('\r') {
            self.pos += 1;
        }
    }

    fn bare_field(&mut self) -> String {
        let rest = &self.input[self.pos..];
        let end = rest
            .find(|c: char| c == DELIMITER || c == '\r' || c == '\n')
            .unwrap_or(rest.len());
        self.pos += end;
        rest[..end].to_string()
    }

    fn quoted_field(&mut self) -> CatalogResult<String> {
        // Skip the opening quote
        self.pos += 1;
        let mut value = String::new();

        loop {
            let rest = &self.input[self.pos..];
            let Some(close) = rest.find(QUOTE) else {
                return Err(CatalogError::format(self.row, "unterminated quoted field"));
            };
            value.push_str(&rest[..close]);
            self.pos += close + 1;

            if self.peek() == Some(QUOTE) {
                value.push(QUOTE);
                self.pos += 1;
                continue;
            }

            return match self.peek() {
                None | Some(DELIMITER) | Some('\r') | Some('\n') => Ok(value),
                Some(other) => Err(CatalogError::format(
                    self.row,
                    format!("unexpected '{}' after closing quote", other),
                )),
            };
        }
    }
}

/// Writes rows to any byte sink
pub struct RowWriter<W: Write> {
    inner: W,
    rows: usize,
}

impl<W: Write> RowWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, rows: 0 }
    }

    /// Rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Write one row
    pub fn write_row<I, S>(&mut self, fields: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<S> = fields.into_iter().collect();

        let line = match fields.as_slice() {
            [only] if only.as_ref().is_empty() => "\"\"".to_string(),
            _ => fields
                .iter()
                .map(|f| escape_field(f.as_ref()))
                .collect::<Vec<_>>()
                .join(","),
        };

        self.inner.write_all(line.as_bytes())?;
        self.inner.write_all(TERMINATOR.as_bytes())?;
        self.rows += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

fn escape_field(field: &str) -> String {
    let needs_quotes = field.contains([DELIMITER, QUOTE, '\r', '\n']);
    if !needs_quotes {
        return field.to_string();
    }
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    fn read_all(input: &str) -> Vec<Vec<String>> {
        let mut reader = RowReader::new(input);
        let mut rows = Vec::new();
        while let Some(row) = reader.next_row().unwrap() {
            rows.push(row);
        }
        rows
    }

    fn write_all(rows: &[Vec<&str>]) -> String {
        let mut writer = RowWriter::new(Vec::new());
        for row in rows {
            writer.write_row(row).unwrap();
        }
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_plain_rows() {
        let rows = read_all("Mathematics,math\r\n\r\n1134,1135\r\n");
        assert_eq!(
            rows,
            vec![
                vec!["Mathematics".to_string(), "math".to_string()],
                vec![],
                vec!["1134".to_string(), "1135".to_string()],
            ]
        );
    }

    #[test]
    fn test_lf_line_endings_accepted() {
        let rows = read_all("a,b\nc\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["c".to_string()]);
    }

    #[test]
    fn test_missing_final_terminator() {
        let rows = read_all("a,b");
        assert_eq!(rows, vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn test_quoted_fields() {
        let rows = read_all("\"Left at page 72, line 3\",\"said \"\"hi\"\"\"\r\n");
        assert_eq!(
            rows[0],
            vec![
                "Left at page 72, line 3".to_string(),
                "said \"hi\"".to_string()
            ]
        );
    }

    #[test]
    fn test_quoted_field_spans_lines() {
        let rows = read_all("\"two\r\nlines\",x\r\nnext\r\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "two\r\nlines");
        assert_eq!(rows[1], vec!["next".to_string()]);
    }

    #[test]
    fn test_trailing_delimiter_yields_empty_field() {
        let rows = read_all("a,\r\n");
        assert_eq!(rows[0], vec!["a".to_string(), String::new()]);
    }

    #[test]
    fn test_unterminated_quote_is_format_error() {
        let mut reader = RowReader::new("ok\r\n\"never closed\r\n");
        reader.next_row().unwrap();
        let err = reader.next_row().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_garbage_after_closing_quote_is_format_error() {
        let mut reader = RowReader::new("\"a\"b\r\n");
        assert_eq!(reader.next_row().unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn test_writer_quotes_only_when_needed() {
        let out = write_all(&[vec!["plain", "with,comma", "with\"quote"]]);
        assert_eq!(out, "plain,\"with,comma\",\"with\"\"quote\"\r\n");
    }

    #[test]
    fn test_empty_row_and_single_empty_field_differ() {
        let out = write_all(&[vec![], vec![""]]);
        assert_eq!(out, "\r\n\"\"\r\n");

        let rows = read_all(&out);
        assert_eq!(rows, vec![vec![], vec![String::new()]]);
    }

    #[test]
    fn test_writer_output_reads_back() {
        let original = vec![
            vec!["Title, The", "alias"],
            vec!["multi\nline", "", "\"quoted\""],
            vec!["1", "2"],
        ];
        let text = write_all(&original);
        let rows = read_all(&text);

        let expected: Vec<Vec<String>> = original
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect();
        assert_eq!(rows, expected);
    }
}
