//! CSV serialization of table rows and export targets.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use xtab_model::Row;

use crate::error::{OutputError, Result};

/// CSV serialization options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter. Cells containing it are quoted.
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Serializes `rows` under the header `columns`.
///
/// A cell is quoted exactly when it contains the delimiter, a double quote or
/// a line feed, and embedded quotes are doubled. Every other cell, the empty
/// one included, is written verbatim. Lines are separated by `\n` and the
/// output has no trailing line separator. A column missing from a row is
/// written as an empty cell.
pub fn write_csv<'a, I>(rows: I, columns: &[String], options: &CsvOptions) -> String
where
    I: IntoIterator<Item = &'a Row>,
{
    let delimiter = char::from(options.delimiter);
    let mut lines = vec![join_line(columns.iter().map(String::as_str), delimiter)];
    lines.extend(
        rows.into_iter()
            .map(|row| join_line(columns.iter().map(|column| row.value(column)), delimiter)),
    );
    debug!(rows = lines.len() - 1, columns = columns.len(), "serialized CSV");
    lines.join("\n")
}

fn join_line<'a>(cells: impl Iterator<Item = &'a str>, delimiter: char) -> String {
    let mut line = String::new();
    for (index, cell) in cells.enumerate() {
        if index > 0 {
            line.push(delimiter);
        }
        push_cell(&mut line, cell, delimiter);
    }
    line
}

fn push_cell(line: &mut String, cell: &str, delimiter: char) {
    if !cell.contains([delimiter, '"', '\n']) {
        line.push_str(cell);
        return;
    }
    line.push('"');
    line.push_str(&cell.replace('"', "\"\""));
    line.push('"');
}

/// Where an export goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    Stdout,
    File(PathBuf),
}

impl ExportTarget {
    /// `-` means standard output.
    pub fn from_arg(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Self::Stdout
        } else {
            Self::File(path.to_path_buf())
        }
    }

    /// CSV for standard output and `.csv` files, a workbook otherwise.
    pub fn format(&self) -> ExportFormat {
        match self {
            Self::Stdout => ExportFormat::Csv,
            Self::File(path) => ExportFormat::for_path(path),
        }
    }
}

/// File format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// Chosen by extension: `.csv` (any case) is CSV, anything else is a
    /// workbook.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Xlsx,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Persists a finished CSV string.
///
/// Files get the text exactly; standard output gets a final newline so the
/// prompt starts on its own line.
pub fn export_csv(csv: &str, target: &ExportTarget) -> Result<()> {
    match target {
        ExportTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{csv}").map_err(|source| OutputError::Io {
                path: PathBuf::from("-"),
                source,
            })?;
        }
        ExportTarget::File(path) => {
            create_parent_dir(path)?;
            std::fs::write(path, csv).map_err(|source| OutputError::Io {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), bytes = csv.len(), "wrote CSV");
        }
    }
    Ok(())
}

/// Creates the directory an output file goes into.
pub(crate) fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
