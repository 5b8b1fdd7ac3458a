//! Table engine for the XML table explorer.
//!
//! Turns located records into normalized rows and shapes them for
//! presentation and export.
//!
//! # Pipeline
//!
//! 1. [`flatten_element`] turns one record subtree into a [`FlatRecord`]
//! 2. [`apply_derived_fields`] adds `ErrorMessage`, `BL` and the status code list
//! 3. [`project_columns`] builds the column set (hidden columns, simple view,
//!    empty-column pruning)
//! 4. [`project`] applies the status filter, column filters, grouping and
//!    sorting of a [`ViewState`](xtab_model::ViewState)
//!
//! [`TableSession`] holds the loaded table between parses.

mod columns;
mod compare;
mod derive;
mod error;
mod flatten;
mod table;
mod view;

// === Error Types ===
pub use error::{CoreError, Result};

// === Rows ===
pub use derive::{
    apply_derived_fields, derive_error_message, find_bl_key, find_bl_value, find_code_list_value,
    find_nested_tag_value, find_tag_value,
};
pub use flatten::{FlatRecord, flatten_element};

// === Columns ===
pub use columns::{
    apply_simple_view, build_columns, normalize_columns, project_columns, prune_empty_columns,
};

// === Filter / Sort / Group ===
pub use compare::{compare_values, natural_cmp};
pub use view::{
    FilterMenu, ProjectedView, RowGroup, ViewLayout, apply_status_filter, code_list_set,
    count_selected_bls, filter_menus, filter_rows, group_rows_by_bl, is_status_s_only, project,
    row_matches_filters, sort_groups, sort_rows, unique_values, visible_rows,
};

// === Sessions ===
pub use table::{Extraction, LoadOptions, RecordSummary, TableSession, extract_rows, rows_from_document};
