pub mod charset;
pub mod datatype;
pub mod datetime;

pub use charset::detect_charset;
pub use datatype::{classify_column, classify_table};
pub use datetime::{could_be_datetime, format_datetime, parse_datetime};
