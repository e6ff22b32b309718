pub mod cleaner;
pub mod config;
pub mod detection;
pub mod error;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod types;
pub mod validation;

pub use cleaner::{clean_csv_file, CsvCleaner};
pub use config::CleanerConfig;
pub use error::{CsvCleanerError, Result};
pub use pipeline::{clean_table, CleaningStats, ColumnStats};
pub use types::{ColumnClass, ErrorKind, Table};
