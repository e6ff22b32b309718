use crate::detection::datetime::parse_datetime;
use crate::types::{ColumnClass, Table};

/// Classify one column from its name and non-missing values.
///
/// Numeric wins when every value is a number. Otherwise the column is a date
/// column if its name carries a date keyword and at least one value parses,
/// or if every value parses as a date. Everything else is text, including
/// columns with no values at all.
pub fn classify_column(name: &str, values: &[&str], keywords: &[String]) -> ColumnClass {
    if values.is_empty() {
        return ColumnClass::Text;
    }

    if values.iter().all(|v| is_numeric_value(v)) {
        return ColumnClass::Numeric;
    }

    let parsed = values
        .iter()
        .filter(|v| parse_datetime(v).is_some())
        .count();

    if parsed == values.len() || (parsed > 0 && has_date_keyword(name, keywords)) {
        ColumnClass::Date
    } else {
        ColumnClass::Text
    }
}

/// Classify every column of a table, in column order
pub fn classify_table(table: &Table, keywords: &[String]) -> Vec<ColumnClass> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: Vec<&str> = table.column(idx).flatten().collect();
            classify_column(name, &values, keywords)
        })
        .collect()
}

/// Whether the column name contains one of the date keywords
pub fn has_date_keyword(name: &str, keywords: &[String]) -> bool {
    let name_lower = name.to_lowercase();
    keywords
        .iter()
        .any(|k| !k.is_empty() && name_lower.contains(&k.to_lowercase()))
}

/// Integer or finite float with `.` as the decimal separator
pub fn is_numeric_value(value: &str) -> bool {
    let value = value.trim();

    if !value.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    try_parse_integer(value) || try_parse_float(value)
}

fn try_parse_integer(value: &str) -> bool {
    value.parse::<i64>().is_ok()
}

fn try_parse_float(value: &str) -> bool {
    value.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}
