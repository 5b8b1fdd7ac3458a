//! Filter, sort and group engine.
//!
//! Everything here is a pure function of rows, columns and a [`ViewState`].
//! The order of operations is fixed: status filter, column filters, then
//! grouping and sorting. Grouping and sorting only change presentation order;
//! [`visible_rows`] is the order exports use.

use std::collections::{BTreeSet, HashSet};

use xtab_model::vocabulary::{
    BL_COLUMN, CODE_LIST_DOC_COLUMN, CODE_LIST_HDR_COLUMN, NO_BL_GROUP, STATUS_ERROR,
    STATUS_SUCCESS, STATUS_WARNING,
};
use xtab_model::{FilterState, FilterToken, Row, SortDirection, ViewState};

use crate::compare::compare_values;

/// Status codes of a row.
///
/// Taken from the document-level code list, or from the header-level one when
/// the former is empty or absent.
pub fn code_list_set(row: &Row) -> BTreeSet<&str> {
    let doc = row.value(CODE_LIST_DOC_COLUMN);
    let raw = if doc.is_empty() {
        row.value(CODE_LIST_HDR_COLUMN)
    } else {
        doc
    };
    raw.split(';')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .collect()
}

/// True when the row's only status is success.
pub fn is_status_s_only(row: &Row) -> bool {
    let codes = code_list_set(row);
    if codes.contains(STATUS_ERROR) || codes.contains(STATUS_WARNING) {
        return false;
    }
    codes.len() == 1 && codes.contains(STATUS_SUCCESS)
}

/// Rows left after the status filter.
pub fn apply_status_filter(rows: &[Row], hide_status_s: bool) -> Vec<&Row> {
    rows.iter()
        .filter(|row| !hide_status_s || !is_status_s_only(row))
        .collect()
}

/// True when the row passes every active column filter.
pub fn row_matches_filters(row: &Row, filters: &FilterState) -> bool {
    filters
        .active()
        .all(|(column, selected)| selected.contains(&FilterToken::for_value(row.value(column))))
}

pub fn filter_rows<'a>(rows: &[&'a Row], filters: &FilterState) -> Vec<&'a Row> {
    if filters.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .copied()
        .filter(|row| row_matches_filters(row, filters))
        .collect()
}

/// Rows that pass the status filter and the column filters, in load order.
pub fn visible_rows<'a>(rows: &'a [Row], view: &ViewState) -> Vec<&'a Row> {
    let base = apply_status_filter(rows, view.hide_status_s);
    filter_rows(&base, &view.filters)
}

/// Distinct values of `column`, ordered by [`compare_values`] with the empty
/// value last.
pub fn unique_values(rows: &[&Row], column: &str) -> Vec<FilterToken> {
    let mut seen = HashSet::new();
    let mut values: Vec<&str> = Vec::new();
    let mut has_empty = false;
    for row in rows {
        let value = row.value(column);
        if value.is_empty() {
            has_empty = true;
        } else if seen.insert(value) {
            values.push(value);
        }
    }
    values.sort_by(|a, b| compare_values(a, b));
    let mut tokens: Vec<FilterToken> = values
        .into_iter()
        .map(|value| FilterToken::Value(value.to_string()))
        .collect();
    if has_empty {
        tokens.push(FilterToken::Empty);
    }
    tokens
}

/// Stable sort of rows by one column.
pub fn sort_rows(rows: &mut [&Row], column: &str, direction: SortDirection) {
    rows.sort_by(|a, b| direction.apply(compare_values(a.value(column), b.value(column))));
}

/// Rows sharing one `BL` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowGroup<'a> {
    pub key: String,
    pub rows: Vec<&'a Row>,
    pub collapsed: bool,
    pub checked: bool,
}

impl RowGroup<'_> {
    /// Header line used when presenting the group.
    pub fn title(&self) -> String {
        format!("BL: {}", self.key)
    }

    pub fn count_label(&self) -> String {
        format!("{} Message(s)", self.rows.len())
    }
}

/// Partitions rows by `BL` in first-seen order.
///
/// Rows with an empty or absent `BL` share the `(no BL)` group. Groups start
/// expanded and unchecked; [`project`] applies the view's group state.
pub fn group_rows_by_bl<'a>(rows: &[&'a Row]) -> Vec<RowGroup<'a>> {
    let mut groups: Vec<RowGroup<'a>> = Vec::new();
    for &row in rows {
        let value = row.value(BL_COLUMN);
        let key = if value.is_empty() { NO_BL_GROUP } else { value };
        match groups.iter_mut().find(|group| group.key == key) {
            Some(group) => group.rows.push(row),
            None => groups.push(RowGroup {
                key: key.to_string(),
                rows: vec![row],
                collapsed: false,
                checked: false,
            }),
        }
    }
    groups
}

/// Stable sort of groups by their key.
pub fn sort_groups(groups: &mut [RowGroup<'_>], direction: SortDirection) {
    groups.sort_by(|a, b| direction.apply(compare_values(&a.key, &b.key)));
}

/// Number of distinct non-empty `BL` values.
pub fn count_selected_bls(rows: &[&Row]) -> usize {
    rows.iter()
        .map(|row| row.value(BL_COLUMN))
        .filter(|value| !value.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

/// Presentation order of the visible rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewLayout<'a> {
    Flat(Vec<&'a Row>),
    Grouped(Vec<RowGroup<'a>>),
}

/// Everything a presentation sink needs to paint the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedView<'a> {
    pub columns: &'a [String],
    pub layout: ViewLayout<'a>,
    pub total_rows: usize,
    pub visible_rows: usize,
    pub selected_bls: usize,
}

impl<'a> ProjectedView<'a> {
    /// True when filters removed some rows.
    pub fn is_filtered(&self) -> bool {
        self.visible_rows != self.total_rows
    }

    /// `Selected BLs: N`.
    pub fn bl_summary(&self) -> String {
        format!("Selected BLs: {}", self.selected_bls)
    }

    /// Visible rows in presentation order, group headers aside.
    pub fn rows(&self) -> Vec<&'a Row> {
        match &self.layout {
            ViewLayout::Flat(rows) => rows.clone(),
            ViewLayout::Grouped(groups) => groups
                .iter()
                .flat_map(|group| group.rows.iter().copied())
                .collect(),
        }
    }
}

/// Applies the view state to rows.
pub fn project<'a>(rows: &'a [Row], columns: &'a [String], view: &ViewState) -> ProjectedView<'a> {
    let visible = visible_rows(rows, view);
    let selected_bls = count_selected_bls(&visible);
    let visible_count = visible.len();

    let layout = if view.group_by_bl {
        let mut groups = group_rows_by_bl(&visible);
        match view.sort.active() {
            Some((column, direction)) if column == BL_COLUMN => sort_groups(&mut groups, direction),
            Some((column, direction)) => {
                for group in &mut groups {
                    sort_rows(&mut group.rows, column, direction);
                }
            }
            None => {}
        }
        for group in &mut groups {
            group.collapsed = view.groups.is_collapsed(&group.key);
            group.checked = view.progress.is_checked(&group.key);
        }
        ViewLayout::Grouped(groups)
    } else {
        let mut flat = visible;
        if let Some((column, direction)) = view.sort.active() {
            sort_rows(&mut flat, column, direction);
        }
        ViewLayout::Flat(flat)
    };

    ProjectedView {
        columns,
        layout,
        total_rows: rows.len(),
        visible_rows: visible_count,
        selected_bls,
    }
}

/// One column's filter menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterMenu {
    pub column: String,
    pub options: Vec<FilterToken>,
    pub selected: BTreeSet<FilterToken>,
}

impl FilterMenu {
    /// `All` when nothing is selected, otherwise `N selected`.
    pub fn summary(&self) -> String {
        if self.selected.is_empty() {
            "All".to_string()
        } else {
            format!("{} selected", self.selected.len())
        }
    }

    pub fn is_selected(&self, token: &FilterToken) -> bool {
        self.selected.contains(token)
    }
}

/// Filter menus for every column, built from the status-filtered rows.
pub fn filter_menus(rows: &[Row], columns: &[String], view: &ViewState) -> Vec<FilterMenu> {
    let base = apply_status_filter(rows, view.hide_status_s);
    columns
        .iter()
        .map(|column| FilterMenu {
            column: column.clone(),
            options: unique_values(&base, column),
            selected: view.filters.selection(column).cloned().unwrap_or_default(),
        })
        .collect()
}
