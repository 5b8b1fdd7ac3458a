use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use xtab_core::{LoadOptions, RecordSummary, TableSession, extract_rows};
use xtab_ingest::{list_xml_files, read_xml_source};
use xtab_model::{Row, ViewState};
use xtab_output::{CsvOptions, ExportFormat, ExportTarget, export_csv, write_csv, write_xlsx};

use crate::cli::{ConvertArgs, InspectArgs, SourceArgs, ValuesArgs, ViewArgs};

/// Default output name when the input is a folder.
const FOLDER_OUTPUT_NAME: &str = "xml_table.xlsx";

/// One input file that produced rows.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub summary: RecordSummary,
}

/// Rows from every readable input file, loaded into one session.
#[derive(Debug)]
pub struct LoadedInput {
    pub session: TableSession,
    pub files: Vec<LoadedFile>,
    pub skipped: usize,
}

#[derive(Debug)]
pub struct ConvertResult {
    pub target: ExportTarget,
    pub format: ExportFormat,
    pub rows: usize,
    pub columns: usize,
    /// Files that produced rows, in load order.
    pub files: Vec<LoadedFile>,
    /// The exported text, for CSV exports.
    pub csv: Option<String>,
}

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertResult> {
    let span = info_span!("convert", input = %args.source.input.display());
    let _guard = span.enter();

    let view = build_view(&args.view)?;
    let options = CsvOptions::new().with_delimiter(delimiter_byte(args.delimiter)?);
    let target = match &args.output {
        Some(path) => ExportTarget::from_arg(path),
        None => ExportTarget::File(default_output_path(&args.source.input)),
    };
    let loaded = load_input(&args.source, view)?;
    ensure_not_an_input(&target, &loaded.files)?;

    let session = &loaded.session;
    let rows = session.export_rows();
    let format = target.format();
    let csv = match (&target, format) {
        (ExportTarget::File(path), ExportFormat::Xlsx) => {
            write_xlsx(rows.iter().copied(), session.columns(), path)
                .with_context(|| format!("write workbook {}", path.display()))?;
            None
        }
        _ => {
            let csv = write_csv(rows.iter().copied(), session.columns(), &options);
            export_csv(&csv, &target).context("write CSV")?;
            Some(csv)
        }
    };
    info!(
        rows = rows.len(),
        columns = session.columns().len(),
        format = format.extension(),
        "export complete"
    );

    Ok(ConvertResult {
        target,
        format,
        rows: rows.len(),
        columns: session.columns().len(),
        files: loaded.files,
        csv,
    })
}

/// Refuses an output file that is one of the files rows were read from.
fn ensure_not_an_input(target: &ExportTarget, files: &[LoadedFile]) -> Result<()> {
    let ExportTarget::File(output) = target else {
        return Ok(());
    };
    if let Some(file) = files.iter().find(|file| same_file(&file.path, output)) {
        bail!(
            "output {} would overwrite input {}; choose another path with -o",
            output.display(),
            file.path.display()
        );
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

pub fn run_inspect(args: &InspectArgs) -> Result<LoadedInput> {
    let span = info_span!("inspect", input = %args.source.input.display());
    let _guard = span.enter();

    let view = build_view(&args.view)?;
    let mut loaded = load_input(&args.source, view)?;
    loaded.session.apply(|view| {
        let mut next = view.with_group_by_bl(!args.no_group);
        for column in &args.sort {
            next = next.toggle_sort(column);
        }
        for key in &args.expand {
            next = next.toggle_group(key);
        }
        for key in &args.check {
            next = next.toggle_checked(key);
        }
        next
    });
    Ok(loaded)
}

pub fn run_values(args: &ValuesArgs) -> Result<Vec<String>> {
    let span = info_span!("values", column = %args.column);
    let _guard = span.enter();

    let view = build_view(&args.view)?;
    let loaded = load_input(&args.source, view)?;
    let menus = loaded.session.filter_menus();
    let Some(menu) = menus.iter().find(|menu| menu.column == args.column) else {
        bail!(
            "column '{}' is not shown; available columns: {}",
            args.column,
            loaded.session.columns().join(", ")
        );
    };
    Ok(menu
        .options
        .iter()
        .map(|token| token.label().to_string())
        .collect())
}

/// Builds the requested view: saved view first, command-line flags on top.
pub fn build_view(args: &ViewArgs) -> Result<ViewState> {
    let mut view = match &args.view_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read view file {}", path.display()))?;
            serde_json::from_str::<ViewState>(&text)
                .with_context(|| format!("parse view file {}", path.display()))?
        }
        None => ViewState::default(),
    };
    if args.full_view {
        view = view.with_simple_view(false);
    }
    if args.show_status_s {
        view = view.with_hide_status_s(false);
    }
    for filter in &args.filters {
        view = view.select_filter(&filter.column, filter.token.clone());
    }
    Ok(view)
}

/// Loads every XML file under the input into one session.
///
/// Files that fail to read or parse, or that contain no records, are skipped
/// with a warning. Fails when no file produced any row.
pub fn load_input(source: &SourceArgs, view: ViewState) -> Result<LoadedInput> {
    let files = list_xml_files(&source.input)
        .with_context(|| format!("list XML files in {}", source.input.display()))?;

    let mut rows = Vec::new();
    let mut loaded = Vec::new();
    let mut skipped = 0usize;
    for path in files {
        let options = LoadOptions::new()
            .with_record_tag(source.record_tag.clone())
            .with_record_path(source.record_path.clone())
            .with_source_file(source.add_source.then(|| path.display().to_string()));
        match load_file(&path, &options) {
            Ok((file_rows, summary)) => {
                info!(
                    path = %path.display(),
                    records = summary.records,
                    used = %summary.path,
                    "loaded file"
                );
                rows.extend(file_rows);
                loaded.push(LoadedFile { path, summary });
            }
            Err(error) => {
                warn!(path = %path.display(), "skipping file: {error:#}");
                skipped += 1;
            }
        }
    }

    if rows.is_empty() {
        bail!("no records found in {}", source.input.display());
    }

    // Load with the toggles first: loading resets filters and sort.
    let mut session = TableSession::new(view.reset());
    session.load_rows(rows);
    session.update_view(view);
    Ok(LoadedInput {
        session,
        files: loaded,
        skipped,
    })
}

fn load_file(path: &Path, options: &LoadOptions) -> Result<(Vec<Row>, RecordSummary)> {
    let text = read_xml_source(path)?;
    let extraction = extract_rows(&text, options)?;
    Ok((extraction.rows, extraction.summary))
}

/// `<file>.xlsx` next to a file input, `xml_table.xlsx` inside a folder input.
pub fn default_output_path(input: &Path) -> PathBuf {
    if input.is_dir() {
        input.join(FOLDER_OUTPUT_NAME)
    } else {
        input.with_extension(ExportFormat::Xlsx.extension())
    }
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got '{delimiter}'");
    }
    u8::try_from(delimiter).context("delimiter must be a single ASCII character")
}
