use clap::Parser;
use csvcleaner::{CleanerConfig, CsvCleaner};

/// CSV Cleaner - Remove duplicates, standardize dates and fill missing values
#[derive(Parser, Debug)]
#[command(name = "csvcleaner")]
#[command(about = "Clean a CSV file: drop duplicate rows, standardize date columns and fill missing values")]
#[command(
    version,
    after_help = "The cleaned CSV defaults to cleaned_<input name> in the current directory.\n\
                  A text report named cleaned_report.txt is written next to the cleaned CSV.\n\
                  There is no interactive prompt: input_file must be given on the command line.\n\
                  Set RUST_LOG=debug for per-column details."
)]
struct Args {
    /// Path to the CSV file to clean
    input_file: String,

    /// Path for the cleaned CSV (default: cleaned_<input name>)
    output_file: Option<String>,

    /// Output date format, chrono style (%Y-%m-%d) or yyyy-mm-dd tokens
    date_format: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Build config
    let mut config = CleanerConfig::new(&args.input_file);
    if let Some(ref output) = args.output_file {
        config = config.with_output(output);
    }
    if let Some(ref date_format) = args.date_format {
        config = config.with_date_format(date_format);
    }

    let cleaner = CsvCleaner::new(config);
    match cleaner.run() {
        Ok(stats) => {
            let config = cleaner.config();
            println!("Cleaning finished!");
            println!(
                "  Rows processed: {} -> {}",
                stats.original_rows, stats.rows_after_dedup
            );
            println!("  Duplicates removed: {}", stats.duplicates_removed);
            println!("  Missing values filled: {}", stats.total_filled());
            println!("  Date columns: {}", stats.date_columns.len());
            println!("  CSV: {}", config.output.display());
            println!("  Report: {}", config.report_path().display());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.kind().exit_code());
        }
    }
}
