//! Interactive view state.
//!
//! Everything the user can change between two parses lives in [`ViewState`].
//! Transitions never mutate in place: each one returns the next state, and the
//! projection in `xtab-core` is a pure function of rows, columns and the state.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Label shown for the empty-token in filter menus.
pub const EMPTY_LABEL: &str = "(Empty)";

/// A filter selection.
///
/// `Empty` selects rows whose cell is the empty string. It is a variant of its
/// own, so no cell value can ever be mistaken for it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterToken {
    Empty,
    Value(String),
}

impl FilterToken {
    /// Token a cell value selects under.
    pub fn for_value(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Value(value.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Empty => EMPTY_LABEL,
            Self::Value(value) => value,
        }
    }
}

/// Per-column filter selections.
///
/// A column that is absent, or whose selection is empty, is unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    selections: BTreeMap<String, BTreeSet<FilterToken>>,
}

impl FilterState {
    /// True when no column has an active selection.
    pub fn is_empty(&self) -> bool {
        self.selections.values().all(BTreeSet::is_empty)
    }

    /// Active selection for `column`, if any.
    pub fn selection(&self, column: &str) -> Option<&BTreeSet<FilterToken>> {
        self.selections.get(column).filter(|set| !set.is_empty())
    }

    /// Columns with a non-empty selection.
    pub fn active(&self) -> impl Iterator<Item = (&str, &BTreeSet<FilterToken>)> {
        self.selections
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(column, set)| (column.as_str(), set))
    }

    #[must_use]
    pub fn with_token_toggled(&self, column: &str, token: FilterToken) -> Self {
        let mut next = self.clone();
        let set = next.selections.entry(column.to_string()).or_default();
        if !set.remove(&token) {
            set.insert(token);
        }
        if set.is_empty() {
            next.selections.remove(column);
        }
        next
    }

    #[must_use]
    pub fn with_token_selected(&self, column: &str, token: FilterToken) -> Self {
        let mut next = self.clone();
        next.selections
            .entry(column.to_string())
            .or_default()
            .insert(token);
        next
    }
}

/// A `COLUMN=VALUE` filter given on the command line.
///
/// Nothing after `=` selects the empty-token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub column: String,
    pub token: FilterToken,
}

impl FromStr for FilterSpec {
    type Err = ModelError;

    fn from_str(spec: &str) -> Result<Self> {
        let Some((column, value)) = spec.split_once('=') else {
            return Err(ModelError::InvalidFilter {
                spec: spec.to_string(),
            });
        };
        let column = column.trim();
        if column.is_empty() {
            return Err(ModelError::InvalidFilter {
                spec: spec.to_string(),
            });
        }
        Ok(Self {
            column: column.to_string(),
            token: FilterToken::for_value(value),
        })
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Orients an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// The single active sort key, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortState {
    pub column: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    /// Same column flips direction; a new column starts ascending.
    #[must_use]
    pub fn toggled(&self, column: &str) -> Self {
        match &self.column {
            Some(current) if current == column => Self {
                column: Some(current.clone()),
                direction: self.direction.flipped(),
            },
            _ => Self {
                column: Some(column.to_string()),
                direction: SortDirection::Ascending,
            },
        }
    }

    pub fn active(&self) -> Option<(&str, SortDirection)> {
        self.column
            .as_deref()
            .map(|column| (column, self.direction))
    }
}

/// Collapse state per group key. Groups start collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupState {
    collapsed: BTreeMap<String, bool>,
}

impl GroupState {
    pub fn is_collapsed(&self, key: &str) -> bool {
        self.collapsed.get(key).copied().unwrap_or(true)
    }

    #[must_use]
    pub fn with_toggled(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.collapsed
            .insert(key.to_string(), !self.is_collapsed(key));
        next
    }
}

/// Checked/done state per group key. Groups start unchecked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressState {
    checked: BTreeMap<String, bool>,
}

impl ProgressState {
    pub fn is_checked(&self, key: &str) -> bool {
        self.checked.get(key).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn with_toggled(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.checked.insert(key.to_string(), !self.is_checked(key));
        next
    }
}

/// Everything that shapes what is shown, apart from the rows themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub filters: FilterState,
    pub sort: SortState,
    pub groups: GroupState,
    pub progress: ProgressState,
    /// Restrict columns to the routing id and message.
    pub simple_view: bool,
    /// Hide rows whose status is exactly `S`.
    pub hide_status_s: bool,
    /// Partition rows by routing id.
    pub group_by_bl: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            sort: SortState::default(),
            groups: GroupState::default(),
            progress: ProgressState::default(),
            simple_view: true,
            hide_status_s: true,
            group_by_bl: true,
        }
    }
}

impl ViewState {
    /// State for a freshly parsed document: toggles survive, everything else
    /// starts over.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self {
            simple_view: self.simple_view,
            hide_status_s: self.hide_status_s,
            group_by_bl: self.group_by_bl,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn toggle_sort(&self, column: &str) -> Self {
        Self {
            sort: self.sort.toggled(column),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn toggle_filter(&self, column: &str, token: FilterToken) -> Self {
        Self {
            filters: self.filters.with_token_toggled(column, token),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn select_filter(&self, column: &str, token: FilterToken) -> Self {
        Self {
            filters: self.filters.with_token_selected(column, token),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn toggle_group(&self, key: &str) -> Self {
        Self {
            groups: self.groups.with_toggled(key),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn toggle_checked(&self, key: &str) -> Self {
        Self {
            progress: self.progress.with_toggled(key),
            ..self.clone()
        }
    }

    /// Switching simple view rebuilds the filter menus, so selections reset.
    #[must_use]
    pub fn with_simple_view(&self, enabled: bool) -> Self {
        Self {
            simple_view: enabled,
            filters: FilterState::default(),
            ..self.clone()
        }
    }

    /// Switching the status filter rebuilds the filter menus, so selections
    /// reset.
    #[must_use]
    pub fn with_hide_status_s(&self, enabled: bool) -> Self {
        Self {
            hide_status_s: enabled,
            filters: FilterState::default(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_group_by_bl(&self, enabled: bool) -> Self {
        Self {
            group_by_bl: enabled,
            ..self.clone()
        }
    }
}
