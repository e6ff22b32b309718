use crate::detection::charset::{convert_to_utf8, detect_charset};
use crate::error::{CsvCleanerError, Result};
use crate::types::{Cell, Table};
use crate::validation::{
    is_binary_data, is_missing, unterminated_quote_line, validate_record_width,
};
use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use std::fs;
use std::io;
use std::path::Path;

/// Read a CSV file into a table.
/// Cells equal to `text_fill` are kept even when they look like a null marker.
pub fn load_table<P: AsRef<Path>>(path: P, text_fill: &str) -> Result<Table> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(CsvCleanerError::InputNotFound(path.to_path_buf()));
    }

    info!("Reading CSV from {}", path.display());

    let data = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            CsvCleanerError::InputNotFound(path.to_path_buf())
        }
        _ => CsvCleanerError::IoError(e),
    })?;

    if data.is_empty() {
        return Err(CsvCleanerError::parse(path, "file is empty"));
    }

    if is_binary_data(&data) {
        return Err(CsvCleanerError::parse(path, "file looks binary"));
    }

    let encoding = detect_charset(&data);
    debug!("Detected charset {} for {}", encoding.name(), path.display());

    let text = convert_to_utf8(&data, encoding).map_err(CsvCleanerError::EncodingError)?;

    parse_table(&text, path, text_fill)
}

/// Parse CSV text with a header row.
/// `path` is only used in error messages.
pub fn parse_table(text: &str, path: &Path, text_fill: &str) -> Result<Table> {
    if let Some(line) = unterminated_quote_line(text) {
        return Err(CsvCleanerError::parse(
            path,
            format!("unterminated quoted field starting on line {}", line),
        ));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CsvCleanerError::parse(path, e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(CsvCleanerError::parse(path, "no header row"));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| CsvCleanerError::parse(path, e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        validate_record_width(path, headers.len(), record.len(), line)?;

        let mut row: Vec<Cell> = record.iter().map(|v| to_cell(v, text_fill)).collect();
        row.resize(headers.len(), None);
        rows.push(row);
    }

    debug!(
        "Parsed {} rows x {} columns from {}",
        rows.len(),
        headers.len(),
        path.display()
    );

    Ok(Table::new(headers, rows))
}

fn to_cell(value: &str, text_fill: &str) -> Cell {
    if is_missing(value, text_fill) {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cell(s: &str) -> Cell {
        Some(s.to_string())
    }

    #[test]
    fn test_parse_simple() {
        let table = parse_table("a,b,c\n1,,x\n2,3, \n", Path::new("t.csv"), "N/A").unwrap();
        assert_eq!(table.headers, vec!["a", "b", "c"]);
        assert_eq!(
            table.rows,
            vec![
                vec![cell("1"), None, cell("x")],
                vec![cell("2"), cell("3"), None],
            ]
        );
    }

    #[test]
    fn test_parse_quoted_fields() {
        let text = "name,note\n\"Doe, John\",\"said \"\"hi\"\"\"\n";
        let table = parse_table(text, Path::new("t.csv"), "N/A").unwrap();
        assert_eq!(table.rows, vec![vec![cell("Doe, John"), cell("said \"hi\"")]]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = parse_table("a,b,c\n1,2\n", Path::new("t.csv"), "N/A").unwrap();
        assert_eq!(table.rows, vec![vec![cell("1"), cell("2"), None]]);
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let err = parse_table("a,b\n1,2,3\n", Path::new("t.csv"), "N/A").unwrap_err();
        assert!(matches!(err, CsvCleanerError::Parse { .. }));
    }

    #[test]
    fn test_unterminated_quote_is_rejected() {
        let err = parse_table("a,b\n\"x,1\n2,3\n", Path::new("t.csv"), "N/A").unwrap_err();
        assert!(matches!(err, CsvCleanerError::Parse { .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_multiline_quoted_field() {
        let table = parse_table("a,b\n\"x\ny\",1\n", Path::new("t.csv"), "N/A").unwrap();
        assert_eq!(table.rows, vec![vec![cell("x\ny"), cell("1")]]);
    }

    #[test]
    fn test_null_markers_are_missing() {
        let table = parse_table("qty,note\n1,N/A\nNaN,NULL\n3,null\n", Path::new("t.csv"), "N/A")
            .unwrap();
        assert_eq!(
            table.rows,
            vec![
                vec![cell("1"), cell("N/A")],
                vec![None, None],
                vec![cell("3"), None],
            ]
        );
    }

    #[test]
    fn test_null_markers_with_custom_fill() {
        let table = parse_table("note\nN/A\nunknown\n", Path::new("t.csv"), "unknown").unwrap();
        assert_eq!(table.rows, vec![vec![None], vec![cell("unknown")]]);
    }

    #[test]
    fn test_header_only() {
        let table = parse_table("a,b\n", Path::new("t.csv"), "N/A").unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_missing_file() {
        let err = load_table("/definitely/not/here.csv", "N/A").unwrap_err();
        assert!(matches!(err, CsvCleanerError::InputNotFound(_)));
    }

    #[test]
    fn test_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let err = load_table(file.path(), "N/A").unwrap_err();
        assert!(matches!(err, CsvCleanerError::Parse { .. }));
    }

    #[test]
    fn test_binary_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x00, 0x01, 0x02, 0x03, 0x04, b'\n']).unwrap();
        let err = load_table(file.path(), "N/A").unwrap_err();
        assert!(matches!(err, CsvCleanerError::Parse { .. }));
    }

    #[test]
    fn test_load_with_bom() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBFid,name\n1,Ann\n").unwrap();
        let table = load_table(file.path(), "N/A").unwrap();
        assert_eq!(table.headers, vec!["id", "name"]);
        assert_eq!(table.rows, vec![vec![cell("1"), cell("Ann")]]);
    }
}
