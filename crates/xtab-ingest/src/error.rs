//! Error types for XML ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading and parsing XML sources.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input path does not exist.
    #[error("input not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to walk a directory tree.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// File exceeds the size limit.
    #[error("file too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Directory contains no XML files.
    #[error("no XML files found in {path}")]
    NoXmlFiles { path: PathBuf },

    // === XML Parsing Errors ===
    /// Reader rejected the input.
    #[error("invalid XML at byte {position}: {message}")]
    XmlParse { position: u64, message: String },

    /// Input holds no root element.
    #[error("XML document has no root element")]
    EmptyDocument,

    /// Input ended inside an element.
    #[error("XML document ended inside element <{name}>")]
    UnclosedElement { name: String },

    /// Content found outside the root element.
    #[error("unexpected content outside the root element at byte {position}")]
    TrailingContent { position: u64 },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
