//! Terminal presentation of loaded tables.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use xtab_core::{ProjectedView, RowGroup, ViewLayout};
use xtab_model::Row;
use xtab_output::ExportTarget;

use crate::commands::{ConvertResult, LoadedInput};

pub fn print_inspect(loaded: &LoadedInput) {
    for file in &loaded.files {
        let summary = &file.summary;
        let score = summary
            .score
            .map(|score| format!(", score {score}"))
            .unwrap_or_default();
        println!(
            "File: {} | Records: {} | Used: {} ({}{score})",
            file.path.display(),
            summary.records,
            summary.path,
            summary.strategy
        );
    }
    if loaded.skipped > 0 {
        println!("Skipped files: {}", loaded.skipped);
    }

    let view = loaded.session.project();
    println!("{}", meta_line(&view));
    println!("{}", view.bl_summary());
    println!("{}", build_table(&view));
}

/// Shown after a conversion when more than one file was read.
pub const DETECTION_HINT: &str = "Use --record-tag or --record-path if detection is not correct.";

/// Prints the conversion report. It goes to stderr when the table itself was
/// written to stdout.
pub fn print_convert(result: &ConvertResult) {
    let lines = convert_report(result);
    match result.target {
        ExportTarget::Stdout => lines.iter().for_each(|line| eprintln!("{line}")),
        ExportTarget::File(_) => lines.iter().for_each(|line| println!("{line}")),
    }
}

/// Output location, the record path of the first file and, for several files,
/// a reminder that detection can be overridden.
pub fn convert_report(result: &ConvertResult) -> Vec<String> {
    let mut lines = Vec::new();
    if let ExportTarget::File(path) = &result.target {
        lines.push(format!(
            "Created: {} ({} rows x {} columns)",
            path.display(),
            result.rows,
            result.columns
        ));
    }
    if let Some(first) = result.files.first() {
        lines.push(format!(
            "Record path used for {}: {}",
            first.path.display(),
            first.summary.path
        ));
        if result.files.len() > 1 {
            lines.push(DETECTION_HINT.to_string());
        }
    }
    lines
}

/// `Rows: N | Columns: C`, with the unfiltered count when filters apply.
pub fn meta_line(view: &ProjectedView<'_>) -> String {
    if view.is_filtered() {
        format!(
            "Rows: {} (filtered from {}) | Columns: {}",
            view.visible_rows,
            view.total_rows,
            view.columns.len()
        )
    } else {
        format!(
            "Rows: {} | Columns: {}",
            view.total_rows,
            view.columns.len()
        )
    }
}

pub fn build_table(view: &ProjectedView<'_>) -> Table {
    let mut table = Table::new();
    table.set_header(view.columns.iter().map(|column| header_cell(column)));
    apply_table_style(&mut table);

    match &view.layout {
        ViewLayout::Flat(rows) => {
            for row in rows {
                table.add_row(data_cells(row, view.columns, false));
            }
        }
        ViewLayout::Grouped(groups) => {
            for group in groups {
                table.add_row(group_cells(group, view.columns.len()));
                if group.collapsed {
                    continue;
                }
                for row in &group.rows {
                    table.add_row(data_cells(row, view.columns, group.checked));
                }
            }
        }
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

/// `[x] ▾ BL: key` in the first cell, the message count in the second.
fn group_cells(group: &RowGroup<'_>, width: usize) -> Vec<Cell> {
    let check = if group.checked { "[x]" } else { "[ ]" };
    let arrow = if group.collapsed { "▸" } else { "▾" };
    let mut title = Cell::new(format!("{check} {arrow} {}", group.title()))
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold);
    if group.checked {
        title = title.add_attribute(Attribute::CrossedOut);
    }
    let count = dim_cell(group.count_label());
    if width > 1 {
        vec![title, count]
    } else {
        vec![title]
    }
}

fn data_cells(row: &Row, columns: &[String], done: bool) -> Vec<Cell> {
    columns
        .iter()
        .map(|column| {
            let value = row.value(column);
            if done {
                dim_cell(value)
            } else {
                Cell::new(value)
            }
        })
        .collect()
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
