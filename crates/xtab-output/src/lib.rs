//! Table export for the XML table explorer.
//!
//! [`write_csv`] serializes rows under a column list and [`export_csv`] hands
//! the finished text to a file or standard output. [`write_xlsx`] writes the
//! same table as a single-sheet workbook. [`ExportTarget::format`] picks
//! between the two.

mod error;
mod workbook;
mod writer;

pub use error::{OutputError, Result};
pub use workbook::{MAX_SHEET_COLUMNS, MAX_SHEET_ROWS, write_xlsx};
pub use writer::{CsvOptions, ExportFormat, ExportTarget, export_csv, write_csv};
