//! Excel workbook export.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::info;
use xtab_model::Row;

use crate::error::{OutputError, Result};
use crate::writer::create_parent_dir;

/// Rows per worksheet, header included.
pub const MAX_SHEET_ROWS: usize = 1_048_576;
/// Columns per worksheet.
pub const MAX_SHEET_COLUMNS: usize = 16_384;

/// Writes `rows` under the header `columns` to a single-sheet workbook.
///
/// Every cell is stored as text with a bold header row. Empty cells are left
/// blank. Returns the number of data rows written.
pub fn write_xlsx<'a, I>(rows: I, columns: &[String], path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'a Row>,
{
    let rows: Vec<&Row> = rows.into_iter().collect();
    if rows.len() >= MAX_SHEET_ROWS || columns.len() > MAX_SHEET_COLUMNS {
        return Err(OutputError::SheetLimit {
            rows: rows.len(),
            columns: columns.len(),
        });
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    {
        let sheet = workbook.add_worksheet();
        fill_sheet(sheet, &rows, columns, &header)?;
    }

    create_parent_dir(path)?;
    workbook.save(path)?;
    info!(path = %path.display(), rows = rows.len(), "wrote workbook");
    Ok(rows.len())
}

fn fill_sheet(
    sheet: &mut Worksheet,
    rows: &[&Row],
    columns: &[String],
    header: &Format,
) -> Result<()> {
    for (col, name) in (0u16..).zip(columns) {
        sheet.write_string_with_format(0, col, name, header)?;
    }
    for (row_num, row) in (1u32..).zip(rows) {
        for (col, name) in (0u16..).zip(columns) {
            let value = row.value(name);
            if !value.is_empty() {
                sheet.write_string(row_num, col, value)?;
            }
        }
    }
    if !rows.is_empty() {
        sheet.set_freeze_panes(1, 0)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_many_columns_is_refused_before_writing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("wide.xlsx");
        let columns: Vec<String> = (0..=MAX_SHEET_COLUMNS).map(|i| format!("C{i}")).collect();
        let error = write_xlsx(&Vec::<Row>::new(), &columns, &path).expect_err("too wide");
        assert!(matches!(
            error,
            OutputError::SheetLimit { columns, .. } if columns == MAX_SHEET_COLUMNS + 1
        ));
        assert!(!path.exists());
    }
}
