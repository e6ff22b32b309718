use serde::Serialize;
use std::fmt;

/// Classification of a column, decided per run from its values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnClass {
    #[default]
    Text,
    Numeric,
    Date,
}

impl fmt::Display for ColumnClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnClass::Text => "text",
            ColumnClass::Numeric => "numeric",
            ColumnClass::Date => "date",
        };
        write!(f, "{}", name)
    }
}

/// Error kind codes, also used as process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorKind {
    Process = 1,       // Unhandled exception
    InputNotFound = 2, // Input path missing or unreadable
    Parse = 3,         // Not valid delimited text
    Write = 4,         // Output CSV or report not writable
    Config = 5,        // Bad configuration value
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl ErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::Process => "Unhandled exception",
            ErrorKind::InputNotFound => "Input file not found",
            ErrorKind::Parse => "Input is not valid CSV",
            ErrorKind::Write => "Could not write output",
            ErrorKind::Config => "Invalid configuration",
        }
    }

    pub fn exit_code(&self) -> i32 {
        *self as i32
    }
}

/// A cell; `None` is the missing-value sentinel
pub type Cell = Option<String>;

/// In-memory table: a header row plus rows of cells aligned by column index
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Table { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Iterate over the cells of one column
    pub fn column(&self, idx: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(idx).and_then(|c| c.as_deref()))
    }

    /// Number of missing cells in one column
    pub fn missing_in_column(&self, idx: usize) -> usize {
        self.column(idx).filter(Option::is_none).count()
    }

    /// Number of missing cells in the whole table
    pub fn missing_count(&self) -> usize {
        (0..self.column_count())
            .map(|idx| self.missing_in_column(idx))
            .sum()
    }
}

/// Numeric date pattern for detection
#[derive(Debug, Clone)]
pub struct DatePattern {
    pub pattern: &'static str,
    pub separator: char,
}

/// Time pattern for detection
#[derive(Debug, Clone)]
pub struct TimePattern {
    pub pattern: &'static str,
    pub separator: char,
}

/// Constants
pub mod constants {
    pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
    pub const DEFAULT_TEXT_FILL: &str = "N/A";
    pub const DEFAULT_NUMERIC_FILL: &str = "0";
    pub const OUTPUT_PREFIX: &str = "cleaned_";
    pub const REPORT_FILE_NAME: &str = "cleaned_report.txt";

    /// Column name fragments that mark a column as a date candidate
    pub const DATE_KEYWORDS: [&str; 2] = ["date", "time"];

    /// Cell values read as missing, unless equal to the text fill value
    pub const NULL_MARKERS: &[&str] = &[
        "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
        "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
    ];

    pub const BINARY_SCAN_BYTES: usize = 1024;
    pub const BINARY_PERCENT: usize = 20;
}

/// Numeric date patterns, tried in order.
/// Month-first comes before day-first for the same separator.
pub const DATE_PATTERNS: &[DatePattern] = &[
    DatePattern {
        pattern: "yyyy-mm-dd",
        separator: '-',
    },
    DatePattern {
        pattern: "mm-dd-yyyy",
        separator: '-',
    },
    DatePattern {
        pattern: "dd-mm-yyyy",
        separator: '-',
    },
    DatePattern {
        pattern: "mm/dd/yyyy",
        separator: '/',
    },
    DatePattern {
        pattern: "dd/mm/yyyy",
        separator: '/',
    },
    DatePattern {
        pattern: "yyyy/mm/dd",
        separator: '/',
    },
    DatePattern {
        pattern: "mm.dd.yyyy",
        separator: '.',
    },
    DatePattern {
        pattern: "dd.mm.yyyy",
        separator: '.',
    },
    DatePattern {
        pattern: "yyyy.mm.dd",
        separator: '.',
    },
    DatePattern {
        pattern: "yyyy.dd.mm",
        separator: '.',
    },
];

/// Time patterns, tried in order
pub const TIME_PATTERNS: &[TimePattern] = &[
    TimePattern {
        pattern: "hh:nn:ss am/pm",
        separator: ':',
    },
    TimePattern {
        pattern: "hh:nn:ss",
        separator: ':',
    },
    TimePattern {
        pattern: "hh:nn am/pm",
        separator: ':',
    },
    TimePattern {
        pattern: "hh:nn",
        separator: ':',
    },
];

/// Dates spelling out the month, as chrono formats
pub const TEXT_DATE_FORMATS: &[&str] = &["%d %b %Y", "%b %d, %Y", "%B %d, %Y", "%d %B %Y"];
