use crate::config::CleanerConfig;
use crate::detection::datatype::classify_table;
use crate::detection::datetime::{format_datetime, parse_datetime};
use crate::error::Result;
use crate::types::{Cell, ColumnClass, Table};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashSet;

/// Per-column outcome of a cleaning run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnStats {
    pub name: String,
    pub class: ColumnClass,
    /// Missing cells replaced by the fill value
    pub filled: usize,
    /// Values of a date column that could not be parsed
    pub unparsed_dates: usize,
}

/// Counts produced by one cleaning run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningStats {
    pub original_rows: usize,
    pub rows_after_dedup: usize,
    pub duplicates_removed: usize,
    pub date_columns: Vec<String>,
    pub columns: Vec<ColumnStats>,
}

impl CleaningStats {
    pub fn total_filled(&self) -> usize {
        self.columns.iter().map(|c| c.filled).sum()
    }

    /// Columns with at least one filled cell, in column order
    pub fn filled_columns(&self) -> Vec<(&str, usize)> {
        self.columns
            .iter()
            .filter(|c| c.filled > 0)
            .map(|c| (c.name.as_str(), c.filled))
            .collect()
    }

    /// Fill count for a single column
    pub fn filled_in(&self, name: &str) -> Option<usize> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.filled)
    }

    /// Columns filled with the text value (text and date columns)
    pub fn text_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.class != ColumnClass::Numeric)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Columns filled with the numeric value
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.class == ColumnClass::Numeric)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Run the cleaning steps on a loaded table.
///
/// Duplicates are removed first, then each column is classified and
/// cleaned in column order: date columns are reformatted (unparseable
/// values become missing), then every missing cell is filled.
/// Fails with `ConfigError` when `config` does not validate.
pub fn clean_table(table: Table, config: &CleanerConfig) -> Result<(Table, CleaningStats)> {
    config.validate()?;

    let original_rows = table.row_count();

    info!("Removing duplicate rows...");
    let (mut table, duplicates_removed) = dedupe(table);

    let classes = classify_table(&table, &config.date_keywords);

    let mut stats = CleaningStats {
        original_rows,
        rows_after_dedup: table.row_count(),
        duplicates_removed,
        ..Default::default()
    };

    info!("Standardizing date columns and filling missing values...");
    for (idx, class) in classes.into_iter().enumerate() {
        let name = table.headers[idx].clone();
        debug!("Column \"{}\" classified as {}", name, class);

        let mut unparsed_dates = 0;
        if class == ColumnClass::Date {
            unparsed_dates =
                standardize_dates(&mut table, idx, &config.date_format, &config.text_fill);
            if unparsed_dates > 0 {
                warn!(
                    "{} value(s) in date column \"{}\" could not be parsed",
                    unparsed_dates, name
                );
            }
            stats.date_columns.push(name.clone());
        }

        let fill = match class {
            ColumnClass::Numeric => config.numeric_fill.as_str(),
            ColumnClass::Date | ColumnClass::Text => config.text_fill.as_str(),
        };
        let filled = fill_missing(&mut table, idx, fill);

        stats.columns.push(ColumnStats {
            name,
            class,
            filled,
            unparsed_dates,
        });
    }

    Ok((table, stats))
}

/// Keep the first occurrence of each distinct row, preserving order.
/// Returns the deduplicated table and the number of rows removed.
pub fn dedupe(table: Table) -> (Table, usize) {
    let Table { headers, rows } = table;
    let before = rows.len();

    let mut seen: HashSet<Vec<Cell>> = HashSet::with_capacity(before);
    let rows: Vec<Vec<Cell>> = rows
        .into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect();

    let removed = before - rows.len();
    (Table::new(headers, rows), removed)
}

/// Rewrite one column's dates in `format`; unparseable values become missing.
/// Cells already holding `filled_marker` are left alone.
/// Returns the number of values that failed to parse.
pub fn standardize_dates(
    table: &mut Table,
    col: usize,
    format: &str,
    filled_marker: &str,
) -> usize {
    let mut failures = 0;

    for row in table.rows.iter_mut() {
        let Some(cell) = row.get_mut(col) else {
            continue;
        };
        let Some(value) = cell.as_deref() else {
            continue;
        };
        if value == filled_marker {
            continue;
        }

        let formatted = parse_datetime(value).and_then(|dt| format_datetime(&dt, format));
        if formatted.is_none() {
            failures += 1;
        }
        *cell = formatted;
    }

    failures
}

/// Replace every missing cell in one column. Returns the number replaced.
pub fn fill_missing(table: &mut Table, col: usize, fill: &str) -> usize {
    let mut filled = 0;

    for row in table.rows.iter_mut() {
        if let Some(cell) = row.get_mut(col) {
            if cell.is_none() {
                *cell = Some(fill.to_string());
                filled += 1;
            }
        }
    }

    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> Cell {
        Some(s.to_string())
    }

    fn table(headers: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        Table::new(headers.iter().map(|h| h.to_string()).collect(), rows)
    }

    fn config() -> CleanerConfig {
        CleanerConfig::new("input.csv")
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let a = vec![cell("a"), cell("1")];
        let b = vec![cell("b"), None];
        let c = vec![cell("c"), cell("3")];
        let input = table(
            &["k", "v"],
            vec![a.clone(), b.clone(), a.clone(), c.clone(), b.clone()],
        );

        let (deduped, removed) = dedupe(input);
        assert_eq!(removed, 2);
        assert_eq!(deduped.rows, vec![a, b, c]);
    }

    #[test]
    fn test_dedupe_no_duplicates() {
        let rows = vec![
            vec![cell("x"), None],
            vec![cell("x"), cell("1")],
            vec![None, None],
        ];
        let (deduped, removed) = dedupe(table(&["a", "b"], rows.clone()));
        assert_eq!(removed, 0);
        assert_eq!(deduped.rows, rows);
    }

    #[test]
    fn test_numeric_fill() {
        let input = table(&["qty"], vec![vec![cell("1")], vec![None], vec![cell("3")]]);
        let (out, stats) = clean_table(input, &config()).unwrap();

        assert_eq!(out.rows, vec![vec![cell("1")], vec![cell("0")], vec![cell("3")]]);
        assert_eq!(stats.filled_in("qty"), Some(1));
        assert_eq!(stats.numeric_columns(), vec!["qty"]);
    }

    #[test]
    fn test_text_fill() {
        let input = table(
            &["id", "label"],
            vec![
                vec![cell("1"), None],
                vec![cell("2"), cell("x")],
                vec![cell("3"), None],
            ],
        );
        let (out, stats) = clean_table(input, &config()).unwrap();

        let labels: Vec<Cell> = out.rows.iter().map(|row| row[1].clone()).collect();
        assert_eq!(labels, vec![cell("N/A"), cell("x"), cell("N/A")]);
        assert_eq!(stats.filled_in("label"), Some(2));
        assert_eq!(stats.text_columns(), vec!["label"]);
    }

    #[test]
    fn test_date_partial_failure() {
        let input = table(
            &["event_date"],
            vec![
                vec![cell("2024-01-05")],
                vec![cell("not-a-date")],
                vec![cell("2024-03-10")],
            ],
        );
        let (out, stats) = clean_table(input, &config()).unwrap();

        assert_eq!(
            out.rows,
            vec![
                vec![cell("2024-01-05")],
                vec![cell("N/A")],
                vec![cell("2024-03-10")],
            ]
        );
        assert_eq!(stats.date_columns, vec!["event_date"]);
        assert_eq!(stats.filled_in("event_date"), Some(1));
        assert_eq!(stats.columns[0].unparsed_dates, 1);
    }

    #[test]
    fn test_dates_reformatted() {
        let input = table(
            &["joined"],
            vec![
                vec![cell("15/01/2020")],
                vec![cell("Jan 7, 2024")],
                vec![cell("2021-06-30T08:00:00Z")],
            ],
        );
        let config = config().with_date_format("dd.mm.yyyy");
        let (out, stats) = clean_table(input, &config).unwrap();

        assert_eq!(
            out.rows,
            vec![
                vec![cell("15.01.2020")],
                vec![cell("07.01.2024")],
                vec![cell("30.06.2021")],
            ]
        );
        assert_eq!(stats.date_columns, vec!["joined"]);
        assert_eq!(stats.total_filled(), 0);
    }

    #[test]
    fn test_ambiguous_dates_read_month_first() {
        let input = table(
            &["order_date"],
            vec![vec![cell("05/01/2024")], vec![cell("13/01/2024")]],
        );
        let (out, _) = clean_table(input, &config()).unwrap();
        assert_eq!(out.rows, vec![vec![cell("2024-05-01")], vec![cell("2024-01-13")]]);
    }

    #[test]
    fn test_offset_format_is_rejected() {
        let input = table(&["event_date"], vec![vec![cell("2024-01-05")]]);
        let config = config().with_date_format("%Y-%m-%d %z");
        assert!(matches!(
            clean_table(input, &config),
            Err(crate::error::CsvCleanerError::ConfigError(_))
        ));
    }

    #[test]
    fn test_counts_after_dedupe() {
        // the duplicate row's missing cell is not counted
        let input = table(
            &["name", "score"],
            vec![
                vec![cell("a"), None],
                vec![cell("a"), None],
                vec![cell("b"), cell("2")],
            ],
        );
        let (out, stats) = clean_table(input, &config()).unwrap();

        assert_eq!(stats.original_rows, 3);
        assert_eq!(stats.rows_after_dedup, 2);
        assert_eq!(stats.duplicates_removed, 1);
        assert_eq!(stats.filled_columns(), vec![("score", 1)]);
        assert_eq!(out.missing_count(), 0);
    }

    #[test]
    fn test_idempotent() {
        let input = table(
            &["id", "due_date", "note"],
            vec![
                vec![cell("1"), cell("2024-01-05"), None],
                vec![cell("2"), cell("bad"), cell("ok")],
                vec![None, cell("2024-02-01"), cell("ok")],
            ],
        );
        let config = config();
        let (once, _) = clean_table(input, &config).unwrap();
        let (twice, stats) = clean_table(once.clone(), &config).unwrap();

        assert_eq!(once.rows[1][1], cell("N/A"));
        assert_eq!(once, twice);
        assert_eq!(stats.date_columns, vec!["due_date"]);
        assert_eq!(stats.duplicates_removed, 0);
        assert_eq!(stats.total_filled(), 0);
    }

    #[test]
    fn test_column_set_preserved() {
        let input = table(
            &["b", "a", "c"],
            vec![vec![cell("1"), None, cell("z")], vec![cell("1"), None, cell("z")]],
        );
        let (out, stats) = clean_table(input, &config()).unwrap();
        assert_eq!(out.headers, vec!["b", "a", "c"]);
        assert_eq!(out.row_count(), stats.original_rows - stats.duplicates_removed);
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let input = table(&["d"], vec![vec![cell("2024-01-05")]]);
        let config = config().with_date_format("%Q");
        assert!(clean_table(input, &config).is_err());
    }

    #[test]
    fn test_stats_json() {
        let input = table(&["qty"], vec![vec![None]]);
        let (_, stats) = clean_table(input, &config()).unwrap();
        let json = stats.to_json();
        assert!(json.contains("\"duplicates_removed\":0"));
        assert!(json.contains("\"class\":\"text\""));
    }
}
