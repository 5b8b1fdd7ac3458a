//! Reading XML sources into text.
//!
//! Bytes are decoded with BOM sniffing first, then the encoding named in the
//! XML declaration, then UTF-8. Invalid sequences are replaced rather than
//! rejected; the parser decides whether the result is usable.

use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Maximum XML file size accepted (64 MB).
pub const MAX_XML_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Reads and decodes an XML file.
pub fn read_xml_source(path: &Path) -> Result<String> {
    read_xml_source_with_limit(path, MAX_XML_FILE_SIZE)
}

/// Reads and decodes an XML file, rejecting files above `max_size` bytes.
pub fn read_xml_source_with_limit(path: &Path, max_size: u64) -> Result<String> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    let bytes = std::fs::read(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let text = decode_xml_bytes(&bytes);
    debug!(path = %path.display(), bytes = bytes.len(), "read XML source");
    Ok(text)
}

/// Decodes raw XML bytes to text.
pub fn decode_xml_bytes(bytes: &[u8]) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| declared_encoding(bytes))
        .unwrap_or(UTF_8);
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(encoding = used.name(), "replaced invalid byte sequences while decoding");
    }
    text.into_owned()
}

/// Encoding named by `encoding="..."` in the XML declaration, if any.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let declaration = head.strip_prefix("<?xml")?;
    let declaration = &declaration[..declaration.find("?>")?];
    let (_, rest) = declaration.split_once("encoding")?;
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|ch| *ch == '"' || *ch == '\'')?;
    let label = rest[1..].split(quote).next()?;
    // A declaration readable as ASCII cannot be UTF-16.
    Encoding::for_label(label.trim().as_bytes()).map(Encoding::output_encoding)
}
