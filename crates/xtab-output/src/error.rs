//! Error types for serialization and export.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("{rows} rows x {columns} columns do not fit in one worksheet")]
    SheetLimit { rows: usize, columns: usize },
}

pub type Result<T> = std::result::Result<T, OutputError>;
