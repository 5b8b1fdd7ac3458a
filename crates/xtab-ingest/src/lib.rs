//! XML ingestion for the table explorer.
//!
//! This crate turns XML sources into an in-memory element tree and decides
//! which elements are records.
//!
//! # Features
//!
//! - **Document tree**: [`XmlDocument`], an arena with parent links that can be
//!   parsed from text or assembled by hand with [`XmlDocument::builder`]
//! - **Parsing**: [`parse_document`], backed by `quick-xml`
//! - **Record detection**: [`locate_records`], manual tag or path, preferred
//!   tags, then the repeated-path heuristic
//! - **Sources**: [`list_xml_files`] and [`read_xml_source`] for files and
//!   directories
//!
//! # Example
//!
//! ```ignore
//! use xtab_ingest::{LocateOptions, locate_records, parse_document};
//!
//! let doc = parse_document("<R><Item a=\"1\"/><Item a=\"2\"/></R>")?;
//! let selection = locate_records(&doc, &LocateOptions::new());
//! assert_eq!(selection.path, "R/Item");
//! ```

mod discovery;
mod document;
mod error;
mod locator;
mod names;
mod parse;
mod source;

// === Error Types ===
pub use error::{IngestError, Result};

// === Document Tree ===
pub use document::{Descendants, DocumentBuilder, NodeId, XmlDocument};
pub use names::{element_path, same_local_name, strip_namespace};
pub use parse::parse_document;

// === Record Detection ===
pub use locator::{
    LocateOptions, LocateStrategy, RecordSelection, detect_records, find_preferred_records,
    find_records_by_path, find_records_by_tag, locate_records,
};

// === Sources ===
pub use discovery::list_xml_files;
pub use source::{MAX_XML_FILE_SIZE, decode_xml_bytes, read_xml_source, read_xml_source_with_limit};
