use crate::config::CleanerConfig;
use crate::error::Result;
use crate::loader::load_table;
use crate::output::{write_report, write_table};
use crate::pipeline::{clean_table, CleaningStats};
use log::{debug, info};
use std::path::Path;

/// CSV Cleaner main struct
pub struct CsvCleaner {
    config: CleanerConfig,
}

impl CsvCleaner {
    pub fn new(config: CleanerConfig) -> Self {
        CsvCleaner { config }
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Load, clean and write the CSV, then write the report.
    ///
    /// Nothing is written when loading or cleaning fails. A report write
    /// failure leaves the cleaned CSV in place.
    pub fn run(&self) -> Result<CleaningStats> {
        // Config errors are reported before the input is touched
        self.config.validate()?;

        let table = load_table(&self.config.input, &self.config.text_fill)?;
        let (cleaned, stats) = clean_table(table, &self.config)?;

        write_table(&cleaned, &self.config.output)?;
        write_report(&stats, &self.config)?;

        info!(
            "Cleaned {} rows into {} ({} duplicates removed)",
            stats.original_rows, stats.rows_after_dedup, stats.duplicates_removed
        );
        debug!("Cleaning stats: {}", stats.to_json());

        Ok(stats)
    }
}

/// Clean `input` into `output` and write the report.
///
/// `output` defaults to `cleaned_<input name>` in the current directory,
/// `report` to `cleaned_report.txt` next to the output and `date_format`
/// to `%Y-%m-%d`.
pub fn clean_csv_file<P: AsRef<Path>>(
    input: P,
    output: Option<&Path>,
    report: Option<&Path>,
    date_format: Option<&str>,
) -> Result<CleaningStats> {
    let mut config = CleanerConfig::new(input);
    if let Some(output) = output {
        config = config.with_output(output);
    }
    if let Some(report) = report {
        config = config.with_report(report);
    }
    if let Some(date_format) = date_format {
        config = config.with_date_format(date_format);
    }

    CsvCleaner::new(config).run()
}
