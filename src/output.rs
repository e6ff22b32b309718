use crate::config::CleanerConfig;
use crate::error::{CsvCleanerError, Result};
use crate::pipeline::CleaningStats;
use crate::types::Table;
use chrono::{Local, NaiveDateTime};
use csv::WriterBuilder;
use log::info;
use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Write the table as CSV with a header row and no index column.
/// Missing directories are not created.
pub fn write_table<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Writing cleaned CSV to {}", path.display());

    let file = File::create(path).map_err(|e| CsvCleanerError::write(path, e))?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    let to_write_err = |e: csv::Error| CsvCleanerError::write(path, io::Error::from(e));

    writer.write_record(&table.headers).map_err(to_write_err)?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))
            .map_err(to_write_err)?;
    }

    writer.flush().map_err(|e| CsvCleanerError::write(path, e))?;
    Ok(())
}

/// Build the plain-text report for one run
pub fn format_report(
    stats: &CleaningStats,
    config: &CleanerConfig,
    generated_at: NaiveDateTime,
) -> String {
    let mut lines = vec![
        format!(
            "CSV Cleaning Report - {}",
            generated_at.format("%Y-%m-%dT%H:%M:%S")
        ),
        format!("Input file: {}", config.input.display()),
        format!("Output file: {}", config.output.display()),
        format!("Rows before: {}", stats.original_rows),
        format!("Rows after deduplication: {}", stats.rows_after_dedup),
        format!("Duplicates removed: {}", stats.duplicates_removed),
        format!("Missing values filled: {}", stats.total_filled()),
        format!(
            "Date columns standardized: {}",
            join_or_none(stats.date_columns.iter().map(String::as_str))
        ),
    ];

    let filled = stats.filled_columns();
    if filled.is_empty() {
        lines.push("Missing values filled per column: none".to_string());
    } else {
        lines.push("Missing values filled per column:".to_string());
        lines.extend(
            filled
                .iter()
                .map(|(name, count)| format!("  {}: {}", name, count)),
        );
    }

    lines.push(format!(
        "Text columns filled with '{}': {}",
        config.text_fill,
        join_or_none(stats.text_columns().into_iter())
    ));
    lines.push(format!(
        "Numeric columns filled with {}: {}",
        config.numeric_fill,
        join_or_none(stats.numeric_columns().into_iter())
    ));

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

/// Write the report next to the cleaned CSV (or at the configured path)
pub fn write_report(stats: &CleaningStats, config: &CleanerConfig) -> Result<()> {
    let path = config.report_path();
    info!("Writing report to {}", path.display());

    let report = format_report(stats, config, Local::now().naive_local());
    fs::write(&path, report).map_err(|e| CsvCleanerError::write(&path, e))
}

fn join_or_none<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let joined = names.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined
    }
}
