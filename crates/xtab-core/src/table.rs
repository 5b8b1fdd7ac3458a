//! Building tables from XML and holding the loaded table between parses.

use tracing::{debug, info};
use xtab_ingest::{LocateOptions, LocateStrategy, NodeId, XmlDocument, locate_records, parse_document};
use xtab_model::vocabulary::SOURCE_FILE_COLUMN;
use xtab_model::{Row, ViewState};

use crate::columns::project_columns;
use crate::derive::apply_derived_fields;
use crate::error::{CoreError, Result};
use crate::flatten::flatten_element;
use crate::view::{FilterMenu, ProjectedView, filter_menus, project, visible_rows};

/// Options for turning one XML source into rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Manual record tag, matched case-insensitively.
    pub record_tag: Option<String>,
    /// Explicit slash-joined record path. Wins over `record_tag`.
    pub record_path: Option<String>,
    /// When set, every row gets a `_source_file` cell with this value.
    pub source_file: Option<String>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record_tag(mut self, tag: Option<String>) -> Self {
        self.record_tag = tag;
        self
    }

    pub fn with_record_path(mut self, path: Option<String>) -> Self {
        self.record_path = path;
        self
    }

    pub fn with_source_file(mut self, source: Option<String>) -> Self {
        self.source_file = source;
        self
    }

    pub fn locate_options(&self) -> LocateOptions {
        LocateOptions::new()
            .with_record_tag(self.record_tag.clone())
            .with_record_path(self.record_path.clone())
    }
}

/// How the records of one source were found.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSummary {
    pub path: String,
    pub tag: Option<String>,
    pub strategy: LocateStrategy,
    pub score: Option<f64>,
    pub records: usize,
}

/// Rows extracted from one source.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub rows: Vec<Row>,
    pub summary: RecordSummary,
}

/// Flattens the given records and adds derived columns.
pub fn rows_from_document(doc: &XmlDocument, records: &[NodeId]) -> Vec<Row> {
    records
        .iter()
        .map(|&record| {
            let mut row = flatten_element(doc, record).normalize();
            apply_derived_fields(&mut row, doc, record);
            row
        })
        .collect()
}

/// Parses XML text and extracts one row per record.
///
/// Fails with [`CoreError::NoRecords`] when the document parses but no
/// element is selected as a record.
pub fn extract_rows(xml: &str, options: &LoadOptions) -> Result<Extraction> {
    let doc = parse_document(xml)?;
    let selection = locate_records(&doc, &options.locate_options());
    if selection.is_empty() {
        return Err(CoreError::NoRecords {
            path: selection.path,
        });
    }

    let mut rows = rows_from_document(&doc, &selection.elements);
    if let Some(source) = &options.source_file {
        for row in &mut rows {
            row.insert(SOURCE_FILE_COLUMN, source.as_str());
        }
    }

    debug!(
        path = %selection.path,
        strategy = %selection.strategy,
        rows = rows.len(),
        "extracted rows"
    );
    Ok(Extraction {
        summary: RecordSummary {
            records: selection.len(),
            path: selection.path,
            tag: selection.tag,
            strategy: selection.strategy,
            score: selection.score,
        },
        rows,
    })
}

/// The currently loaded table and its view.
///
/// A failed parse leaves the session untouched. A parse that finds no
/// records empties it.
#[derive(Debug, Clone, Default)]
pub struct TableSession {
    rows: Vec<Row>,
    columns: Vec<String>,
    view: ViewState,
    summary: Option<RecordSummary>,
}

impl TableSession {
    /// An empty session with the given view toggles.
    pub fn new(view: ViewState) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    /// Parses `xml` and replaces the table.
    pub fn load_xml(&mut self, xml: &str, options: &LoadOptions) -> Result<&RecordSummary> {
        match extract_rows(xml, options) {
            Ok(extraction) => {
                self.load_rows(extraction.rows);
                Ok(&*self.summary.insert(extraction.summary))
            }
            Err(CoreError::NoRecords { path }) => {
                self.clear();
                Err(CoreError::NoRecords { path })
            }
            Err(error) => Err(error),
        }
    }

    /// Replaces the table with already extracted rows.
    ///
    /// Filters, sort, group and progress state start over; the view toggles
    /// are kept.
    pub fn load_rows(&mut self, rows: Vec<Row>) {
        self.columns = project_columns(&rows, self.view.simple_view);
        self.rows = rows;
        self.view = self.view.reset();
        self.summary = None;
        info!(
            rows = self.rows.len(),
            columns = self.columns.len(),
            "table loaded"
        );
    }

    /// Drops the table. View toggles are kept.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.columns.clear();
        self.view = self.view.reset();
        self.summary = None;
    }

    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn summary(&self) -> Option<&RecordSummary> {
        self.summary.as_ref()
    }

    /// Replaces the view state.
    ///
    /// Columns are recomputed before anything can read them when simple view
    /// changes.
    pub fn update_view(&mut self, view: ViewState) {
        let simple_view_changed = view.simple_view != self.view.simple_view;
        self.view = view;
        if simple_view_changed {
            self.columns = project_columns(&self.rows, self.view.simple_view);
            debug!(
                simple_view = self.view.simple_view,
                columns = self.columns.len(),
                "recomputed columns"
            );
        }
    }

    /// Applies a view transition.
    pub fn apply(&mut self, transition: impl FnOnce(&ViewState) -> ViewState) {
        let next = transition(&self.view);
        self.update_view(next);
    }

    pub fn project(&self) -> ProjectedView<'_> {
        project(&self.rows, &self.columns, &self.view)
    }

    pub fn filter_menus(&self) -> Vec<FilterMenu> {
        filter_menus(&self.rows, &self.columns, &self.view)
    }

    /// Rows to export, in load order.
    pub fn export_rows(&self) -> Vec<&Row> {
        visible_rows(&self.rows, &self.view)
    }
}
