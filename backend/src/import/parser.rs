//! Tabular parser: raw upload bytes to headers and rows of string cells.
//!
//! Two parser modes, selected by file extension:
//!
//! - `.csv` — delimited text. Bytes are decoded with encoding auto-detection,
//!   then split line-first (both line-ending conventions), then each line is
//!   split on commas with quote handling: `"` toggles quoting, `""` inside a
//!   quoted segment is a literal quote, a comma inside quotes is not a split
//!   point. A quoted segment never spans lines.
//! - `.xlsx` / `.xls` — spreadsheet binary. The first sheet of the workbook is
//!   decoded and every cell coerced to its string representation; missing
//!   cells become empty strings.
//!
//! Rows whose cells are all blank are dropped before mapping. The required
//! columns (Employee ID, Name, Email ID) are checked against the trimmed
//! header row up front — if any is missing, the whole import fails before a
//! single row is processed.

use calamine::{open_workbook_auto_from_rs, Reader};
use std::io::Cursor;
use std::path::Path;

use crate::error::{ParseError, ParseResult};

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: [&str; 3] = ["Employee ID", "Name", "Email ID"];

/// Parser mode derived from the uploaded file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    DelimitedText,
    Spreadsheet,
}

impl FileKind {
    pub fn from_name(file_name: &str) -> ParseResult<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(Self::DelimitedText),
            "xlsx" | "xls" => Ok(Self::Spreadsheet),
            other => Err(ParseError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Parsed tabular data: one header row plus zero or more data rows.
///
/// Cells are raw (untrimmed) strings; trimming happens during field mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Parse an uploaded file into [`SheetData`], selecting the parser mode from
/// the file name's extension.
pub fn parse_upload(bytes: &[u8], file_name: &str) -> ParseResult<SheetData> {
    match FileKind::from_name(file_name)? {
        FileKind::DelimitedText => parse_delimited(&decode_text(bytes)),
        FileKind::Spreadsheet => parse_spreadsheet(bytes),
    }
}

/// Detect the character encoding of raw bytes.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _, _) = chardet::detect(bytes);
    charset
}

/// Decode raw bytes to text using the detected encoding, falling back to
/// lossy UTF-8 when the charset is unknown.
pub fn decode_text(bytes: &[u8]) -> String {
    let charset = detect_encoding(bytes);
    let encoding = encoding_rs::Encoding::for_label(charset.as_bytes()).unwrap_or(encoding_rs::UTF_8);
    encoding.decode(bytes).0.into_owned()
}

/// Parse delimited text into headers and rows.
pub fn parse_delimited(text: &str) -> ParseResult<SheetData> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header_line = lines.next().ok_or(ParseError::Empty)?;
    let headers = split_line(header_line);
    check_required_headers(&headers)?;

    let rows = lines
        .map(split_line)
        .filter(|row| !is_blank_row(row))
        .collect();

    Ok(SheetData { headers, rows })
}

/// Parse the first sheet of a workbook into headers and rows.
pub fn parse_spreadsheet(bytes: &[u8]) -> ParseResult<SheetData> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| ParseError::Spreadsheet(e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    let first_sheet = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| ParseError::Spreadsheet("workbook has no worksheets".to_string()))?;

    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;

    let mut sheet_rows = range.rows();
    let header_row = sheet_rows.next().ok_or(ParseError::Empty)?;
    let headers: Vec<String> = header_row.iter().map(|cell| cell.to_string()).collect();
    check_required_headers(&headers)?;

    let rows = sheet_rows
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<String>>())
        .filter(|row| !is_blank_row(row))
        .collect();

    Ok(SheetData { headers, rows })
}

/// Split one line on commas, respecting quoted segments.
fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => cells.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    cells.push(current);
    cells
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

fn check_required_headers(headers: &[String]) -> ParseResult<()> {
    let trimmed: Vec<&str> = headers.iter().map(|h| h.trim()).collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !trimmed.contains(col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ParseError::MissingColumns(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Employee ID,Name,Email ID";

    #[test]
    fn test_simple_csv() {
        let csv = format!("{HEADER}\nEMP001,Alice,alice@x.com\nEMP002,Bob,bob@x.com");
        let sheet = parse_delimited(&csv).unwrap();

        assert_eq!(sheet.headers, vec!["Employee ID", "Name", "Email ID"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0], vec!["EMP001", "Alice", "alice@x.com"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let csv = format!("{HEADER}\r\nEMP001,Alice,alice@x.com\r\n");
        let sheet = parse_delimited(&csv).unwrap();
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0][0], "EMP001");
    }

    #[test]
    fn test_quoted_cell_with_comma() {
        let csv = format!("{HEADER}\nEMP001,\"Smith, Alice\",alice@x.com");
        let sheet = parse_delimited(&csv).unwrap();
        assert_eq!(sheet.rows[0][1], "Smith, Alice");
    }

    #[test]
    fn test_doubled_quote_is_literal() {
        let csv = format!("{HEADER}\nEMP001,\"Alice \"\"Ace\"\" Smith\",alice@x.com");
        let sheet = parse_delimited(&csv).unwrap();
        assert_eq!(sheet.rows[0][1], "Alice \"Ace\" Smith");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let csv = format!("{HEADER}\n\nEMP001,Alice,alice@x.com\n   \nEMP002,Bob,bob@x.com\n");
        let sheet = parse_delimited(&csv).unwrap();
        assert_eq!(sheet.rows.len(), 2);
    }

    #[test]
    fn test_all_blank_cell_rows_dropped() {
        let csv = format!("{HEADER}\nEMP001,Alice,alice@x.com\n,,\nEMP002,Bob,bob@x.com");
        let sheet = parse_delimited(&csv).unwrap();
        assert_eq!(sheet.rows.len(), 2);
    }

    #[test]
    fn test_row_count_preserved() {
        let rows: Vec<String> = (0..25)
            .map(|i| format!("EMP{i:03},Name {i},n{i}@x.com"))
            .collect();
        let csv = format!("{HEADER}\n{}", rows.join("\n"));
        let sheet = parse_delimited(&csv).unwrap();
        assert_eq!(sheet.rows.len(), 25);
        assert_eq!(sheet.headers.len(), 3);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_delimited(""), Err(ParseError::Empty));
        assert_eq!(parse_delimited("\n\n  \n"), Err(ParseError::Empty));
    }

    #[test]
    fn test_missing_columns_named_exactly() {
        let err = parse_delimited("Name,Location\nAlice,Pune").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingColumns(vec!["Employee ID".into(), "Email ID".into()])
        );
    }

    #[test]
    fn test_headers_trimmed_for_required_check() {
        let csv = " Employee ID , Name , Email ID \nEMP001,Alice,alice@x.com";
        let sheet = parse_delimited(csv).unwrap();
        // Raw headers keep their padding; only the membership check trims.
        assert_eq!(sheet.headers[0], " Employee ID ");
        assert_eq!(sheet.rows.len(), 1);
    }

    #[test]
    fn test_file_kind_from_name() {
        assert_eq!(FileKind::from_name("staff.csv").unwrap(), FileKind::DelimitedText);
        assert_eq!(FileKind::from_name("Staff.CSV").unwrap(), FileKind::DelimitedText);
        assert_eq!(FileKind::from_name("staff.xlsx").unwrap(), FileKind::Spreadsheet);
        assert_eq!(FileKind::from_name("staff.xls").unwrap(), FileKind::Spreadsheet);
        assert!(matches!(
            FileKind::from_name("staff.pdf"),
            Err(ParseError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            FileKind::from_name("staff"),
            Err(ParseError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_upload_routes_csv() {
        let csv = format!("{HEADER}\nEMP001,Alice,alice@x.com");
        let sheet = parse_upload(csv.as_bytes(), "staff.csv").unwrap();
        assert_eq!(sheet.rows.len(), 1);
    }

    #[test]
    fn test_parse_idempotent() {
        let csv = format!("{HEADER}\nEMP001,Alice,alice@x.com\nEMP002,Bob,bob@x.com");
        let first = parse_delimited(&csv).unwrap();
        let second = parse_delimited(&csv).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_latin1_bytes_decoded() {
        // "Renée" in ISO-8859-1
        let mut bytes = format!("{HEADER}\nEMP001,Ren").into_bytes();
        bytes.push(0xE9);
        bytes.extend_from_slice("e,renee@x.com".as_bytes());
        let sheet = parse_upload(&bytes, "staff.csv").unwrap();
        assert!(sheet.rows[0][1].starts_with("Ren"));
    }
}
