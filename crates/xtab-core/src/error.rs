//! Error types for table construction.

use thiserror::Error;
use xtab_ingest::IngestError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Parsing succeeded but no element was selected as a record.
    #[error("no records found (used: {path})")]
    NoRecords { path: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
