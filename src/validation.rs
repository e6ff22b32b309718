use crate::error::{CsvCleanerError, Result};
use crate::types::constants::{BINARY_PERCENT, BINARY_SCAN_BYTES, NULL_MARKERS};
use std::path::Path;

/// Check that a record is not wider than the header.
/// Shorter records are accepted and padded by the loader.
pub fn validate_record_width(
    path: &Path,
    header_len: usize,
    record_len: usize,
    line: u64,
) -> Result<()> {
    if record_len > header_len {
        return Err(CsvCleanerError::parse(
            path,
            format!(
                "line {} has {} fields, expected at most {}",
                line, record_len, header_len
            ),
        ));
    }
    Ok(())
}

/// Whether a raw cell counts as missing: empty, whitespace-only or a null
/// marker such as `NaN` or `NULL`. A cell equal to `keep` is never missing.
pub fn is_missing(value: &str, keep: &str) -> bool {
    let value = value.trim();
    value.is_empty() || (value != keep && NULL_MARKERS.contains(&value))
}

/// Line on which a quoted field opens without ever being closed
pub fn unterminated_quote_line(text: &str) -> Option<u64> {
    let mut line = 1;
    let mut open_line = None;
    let mut field_start = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }

        if open_line.is_some() {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    open_line = None;
                }
            }
            continue;
        }

        match c {
            '"' if field_start => {
                open_line = Some(line);
                field_start = false;
            }
            ',' | '\n' | '\r' => field_start = true,
            _ => field_start = false,
        }
    }

    open_line
}

/// Check if sample data appears to be binary
pub fn is_binary_data(data: &[u8]) -> bool {
    if data.is_empty() {
        return false;
    }

    // Check first line only
    let first_line_end = data
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(data.len())
        .min(BINARY_SCAN_BYTES);

    let sample = &data[..first_line_end];

    // Skip BOM checks
    let sample = if sample.len() >= 3 && sample.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &sample[3..]
    } else if sample.len() >= 2
        && (sample.starts_with(&[0xFF, 0xFE]) || sample.starts_with(&[0xFE, 0xFF]))
    {
        // UTF-16 text is full of zero bytes
        return false;
    } else {
        sample
    };

    if sample.is_empty() {
        return false;
    }

    // Count unprintable characters, tabs and carriage returns excepted
    let unprintable_count = sample
        .iter()
        .filter(|&&b| (b < 0x20 && b != b'\t' && b != b'\r') || b == 0x7F)
        .count();

    let percentage = (unprintable_count * 100) / sample.len();
    percentage >= BINARY_PERCENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_record_width() {
        let path = Path::new("in.csv");
        assert!(validate_record_width(path, 3, 3, 2).is_ok());
        assert!(validate_record_width(path, 3, 2, 2).is_ok());

        let err = validate_record_width(path, 3, 4, 5).unwrap_err();
        assert!(err.to_string().contains("line 5 has 4 fields"));
    }

    #[test]
    fn test_is_missing() {
        assert!(is_missing("", "N/A"));
        assert!(is_missing("   ", "N/A"));
        assert!(is_missing("NaN", "N/A"));
        assert!(is_missing(" NULL ", "N/A"));
        assert!(is_missing("None", "N/A"));
        assert!(!is_missing("0", "N/A"));
        assert!(!is_missing("Nancy", "N/A"));
    }

    #[test]
    fn test_fill_value_is_not_missing() {
        assert!(!is_missing("N/A", "N/A"));
        assert!(is_missing("N/A", "unknown"));
        assert!(!is_missing("unknown", "unknown"));
    }

    #[test]
    fn test_unterminated_quote_line() {
        assert_eq!(unterminated_quote_line("a,b\n\"x,1\n2,3\n"), Some(2));
        assert_eq!(unterminated_quote_line("a,b\n1,\"say \"\"hi\"\"\n"), Some(2));
        assert_eq!(unterminated_quote_line("a,b\n\"x\ny\",1\n"), None);
        assert_eq!(unterminated_quote_line("a,b\n\"say \"\"hi\"\"\",2\n"), None);
        // a quote inside an unquoted field is literal
        assert_eq!(unterminated_quote_line("size,b\n5\",2\n"), None);
    }

    #[test]
    fn test_is_binary_data() {
        let text = b"hello,world\n";
        assert!(!is_binary_data(text));

        let binary = vec![0x00, 0x01, 0x02, 0x03, 0x04, 0x05];
        assert!(is_binary_data(&binary));

        let latin1 = b"caf\xE9,cr\xE8me\n";
        assert!(!is_binary_data(latin1));
    }
}
