//! Minimal RFC 4180 reading and writing.

use liftmap_core::{AppError, AppResult};

/// One parsed CSV line with the physical line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CsvRow {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Splits CSV text into rows.
///
/// Quoted fields may contain commas, line breaks, and doubled quotes.
/// Blank lines are skipped. A leading byte-order mark is ignored.
pub(crate) fn parse_rows(text: &str) -> AppResult<Vec<CsvRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut line = 1;
    let mut row_line = 1;

    let mut chars = text.chars().peekable();
    while let Some(character) = chars.next() {
        if in_quotes {
            match character {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                _ => field.push(character),
            }
            continue;
        }

        match character {
            '"' if field.is_empty() && !field_was_quoted => {
                in_quotes = true;
                field_was_quoted = true;
            }
            '"' => {
                return Err(AppError::Validation(format!(
                    "line {line}: unexpected quote inside an unquoted field"
                )));
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                field_was_quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                finish_row(&mut rows, &mut fields, &mut field, field_was_quoted, row_line);
                field_was_quoted = false;
                line += 1;
                row_line = line;
            }
            _ => field.push(character),
        }
    }

    if in_quotes {
        return Err(AppError::Validation(format!(
            "line {row_line}: quoted field is never closed"
        )));
    }
    finish_row(&mut rows, &mut fields, &mut field, field_was_quoted, row_line);

    Ok(rows)
}

fn finish_row(
    rows: &mut Vec<CsvRow>,
    fields: &mut Vec<String>,
    field: &mut String,
    field_was_quoted: bool,
    line: usize,
) {
    if fields.is_empty() && field.is_empty() && !field_was_quoted {
        return;
    }

    fields.push(std::mem::take(field));
    rows.push(CsvRow {
        line,
        fields: std::mem::take(fields),
    });
}

/// Quotes a field when it contains a delimiter, quote, or line break.
pub(crate) fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        let escaped = field.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        field.to_owned()
    }
}

/// Joins fields into one CSV line without the trailing newline.
pub(crate) fn join_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .map(escape_field)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::{escape_field, join_fields, parse_rows};

    #[test]
    fn parses_quoted_fields_and_line_endings() {
        let rows = parse_rows("\u{feff}a,b\r\n\"x, y\",\"say \"\"hi\"\"\"\n\n\"multi\nline\",z")
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].fields, vec!["a", "b"]);
        assert_eq!(rows[1].fields, vec!["x, y", "say \"hi\""]);
        assert_eq!(rows[1].line, 2);
        assert_eq!(rows[2].fields, vec!["multi\nline", "z"]);
        assert_eq!(rows[2].line, 4);
    }

    #[test]
    fn keeps_trailing_empty_fields() {
        let rows = parse_rows("a,,\n").unwrap_or_else(|_| unreachable!());
        assert_eq!(rows[0].fields, vec!["a", "", ""]);
    }

    #[test]
    fn rejects_unterminated_quote() {
        assert!(parse_rows("a,\"open\n").is_err());
    }

    #[test]
    fn rejects_stray_quote() {
        assert!(parse_rows("ab\"c,d").is_err());
    }

    #[test]
    fn escapes_only_when_needed() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(join_fields(["a", "b,c", ""]), "a,\"b,c\",");
    }
}
