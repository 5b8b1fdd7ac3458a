//! Input file discovery.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{IngestError, Result};

/// Lists the XML files behind an input path.
///
/// A file is returned as-is whatever its extension. A directory is searched
/// recursively for `.xml` files (case-insensitive); results are sorted by path.
pub fn list_xml_files(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        return Err(IngestError::InputNotFound {
            path: input.to_path_buf(),
        });
    }
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input).follow_links(true) {
        let entry = entry.map_err(|source| IngestError::DirectoryRead {
            path: input.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_xml = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if is_xml {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(IngestError::NoXmlFiles {
            path: input.to_path_buf(),
        });
    }
    files.sort();
    Ok(files)
}
