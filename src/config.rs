use crate::detection::datetime::{normalize_date_format, validate_date_format};
use crate::error::{CsvCleanerError, Result};
use crate::types::constants::{
    DATE_KEYWORDS, DEFAULT_DATE_FORMAT, DEFAULT_NUMERIC_FILL, DEFAULT_TEXT_FILL, OUTPUT_PREFIX,
    REPORT_FILE_NAME,
};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone)]
pub struct CleanerConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Explicit report path; derived from `output` when unset
    pub report: Option<PathBuf>,
    /// chrono strftime pattern for standardized dates
    pub date_format: String,
    pub text_fill: String,
    pub numeric_fill: String,
    pub date_keywords: Vec<String>,
}

impl CleanerConfig {
    pub fn new<P: AsRef<Path>>(input: P) -> Self {
        let input = input.as_ref().to_path_buf();
        CleanerConfig {
            output: default_output_path(&input),
            input,
            report: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            text_fill: DEFAULT_TEXT_FILL.to_string(),
            numeric_fill: DEFAULT_NUMERIC_FILL.to_string(),
            date_keywords: DATE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn with_output<P: AsRef<Path>>(mut self, output: P) -> Self {
        self.output = output.as_ref().to_path_buf();
        self
    }

    pub fn with_report<P: AsRef<Path>>(mut self, report: P) -> Self {
        self.report = Some(report.as_ref().to_path_buf());
        self
    }

    /// Accepts a chrono pattern (`%d/%m/%Y`) or the `dd/mm/yyyy` token style
    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = normalize_date_format(format);
        self
    }

    pub fn with_fill_values(mut self, text_fill: &str, numeric_fill: &str) -> Self {
        self.text_fill = text_fill.to_string();
        self.numeric_fill = numeric_fill.to_string();
        self
    }

    /// Path of the text report
    pub fn report_path(&self) -> PathBuf {
        match &self.report {
            Some(report) => report.clone(),
            None => default_report_path(&self.output),
        }
    }

    /// Check values that would otherwise fail halfway through a run
    pub fn validate(&self) -> Result<()> {
        validate_date_format(&self.date_format)?;

        if self.numeric_fill.trim().parse::<f64>().is_err() {
            return Err(CsvCleanerError::ConfigError(format!(
                "Numeric fill value must be a number, got \"{}\"",
                self.numeric_fill
            )));
        }

        if self.text_fill.trim().is_empty() {
            return Err(CsvCleanerError::ConfigError(
                "Text fill value must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// `cleaned_<input basename>` in the current directory
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("{}{}", OUTPUT_PREFIX, name))
}

/// `cleaned_report.txt` next to the output file
pub fn default_report_path(output: &Path) -> PathBuf {
    match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(REPORT_FILE_NAME),
        _ => PathBuf::from(REPORT_FILE_NAME),
    }
}
