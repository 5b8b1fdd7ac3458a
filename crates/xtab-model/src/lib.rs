//! Shared types for the XML table explorer.
//!
//! - [`Row`]: one normalized, schema-less table row
//! - [`ViewState`]: filter, sort, group and progress state plus view toggles
//! - [`vocabulary`]: the fixed tag and column lists of the error-report feeds

pub mod error;
pub mod row;
pub mod view;
pub mod vocabulary;

pub use error::{ModelError, Result};
pub use row::Row;
pub use view::{
    EMPTY_LABEL, FilterSpec, FilterState, FilterToken, GroupState, ProgressState, SortDirection,
    SortState, ViewState,
};
