//! CSV reading for uploaded source files.

mod header;
mod reader;

pub use header::{normalize_header, normalize_headers};
pub use reader::{read_csv_source, read_csv_source_from_reader};
