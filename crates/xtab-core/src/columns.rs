//! Column discovery and projection.

use std::collections::HashSet;

use xtab_model::Row;
use xtab_model::vocabulary::{SIMPLE_VIEW_COLUMNS, is_hidden_column};

/// Ordered union of all row keys, in first-seen order.
pub fn build_columns(rows: &[Row]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for row in rows {
        for key in row.keys() {
            if seen.insert(key) {
                columns.push(key.to_string());
            }
        }
    }
    columns
}

/// Drops hidden columns and moves `BL` and `ErrorMessage` to the front.
pub fn normalize_columns(columns: &[String]) -> Vec<String> {
    let visible: Vec<String> = columns
        .iter()
        .filter(|column| !is_hidden_column(column))
        .cloned()
        .collect();
    prioritize(visible)
}

/// Restricts the set to the simple-view pair when enabled.
///
/// Falls back to `columns` when neither column of the pair exists.
pub fn apply_simple_view(columns: &[String], enabled: bool) -> Vec<String> {
    if !enabled {
        return columns.to_vec();
    }
    let available: Vec<String> = SIMPLE_VIEW_COLUMNS
        .iter()
        .copied()
        .filter(|column| columns.iter().any(|c| c == column))
        .map(String::from)
        .collect();
    if available.is_empty() {
        columns.to_vec()
    } else {
        available
    }
}

/// Drops columns that are empty in every row.
///
/// If every column is empty the input set is returned unchanged.
pub fn prune_empty_columns(rows: &[Row], columns: &[String]) -> Vec<String> {
    let keep: Vec<String> = columns
        .iter()
        .filter(|column| rows.iter().any(|row| !row.value(column).is_empty()))
        .cloned()
        .collect();
    if keep.is_empty() {
        return columns.to_vec();
    }
    prioritize(keep)
}

/// The full projection: build, normalize, simple view, prune.
pub fn project_columns(rows: &[Row], simple_view: bool) -> Vec<String> {
    let columns = normalize_columns(&build_columns(rows));
    let columns = apply_simple_view(&columns, simple_view);
    prune_empty_columns(rows, &columns)
}

fn prioritize(columns: Vec<String>) -> Vec<String> {
    let mut ordered: Vec<String> = SIMPLE_VIEW_COLUMNS
        .iter()
        .copied()
        .filter(|column| columns.iter().any(|c| c == column))
        .map(String::from)
        .collect();
    ordered.extend(
        columns
            .into_iter()
            .filter(|column| !SIMPLE_VIEW_COLUMNS.contains(&column.as_str())),
    );
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> Row {
        cells.iter().copied().collect()
    }

    fn names(columns: &[String]) -> Vec<&str> {
        columns.iter().map(String::as_str).collect()
    }

    #[test]
    fn columns_in_first_seen_order() {
        let rows = vec![row(&[("a", "1"), ("b", "2")]), row(&[("c", "3"), ("a", "4")])];
        assert_eq!(names(&build_columns(&rows)), vec!["a", "b", "c"]);
    }

    #[test]
    fn hidden_removed_and_priority_first() {
        let columns: Vec<String> = ["X", "ErrTxtDoc.TxtEN", "ErrorMessage", "Y", "BL"]
            .iter()
            .map(|c| (*c).to_string())
            .collect();
        assert_eq!(
            names(&normalize_columns(&columns)),
            vec!["BL", "ErrorMessage", "X", "Y"]
        );
    }

    #[test]
    fn simple_view_falls_back_without_pair() {
        let columns = vec!["X".to_string(), "Y".to_string()];
        assert_eq!(apply_simple_view(&columns, true), columns);
        let with_bl = vec!["X".to_string(), "BL".to_string()];
        assert_eq!(names(&apply_simple_view(&with_bl, true)), vec!["BL"]);
        assert_eq!(apply_simple_view(&with_bl, false), with_bl);
    }

    #[test]
    fn pruning_drops_all_empty_columns() {
        let rows = vec![row(&[("a", ""), ("b", "x")]), row(&[("a", ""), ("b", "")])];
        let columns = vec!["a".to_string(), "b".to_string()];
        assert_eq!(names(&prune_empty_columns(&rows, &columns)), vec!["b"]);
    }

    #[test]
    fn pruning_keeps_everything_when_all_empty() {
        let rows = vec![row(&[("a", ""), ("b", "")])];
        let columns = vec!["a".to_string(), "b".to_string()];
        assert_eq!(prune_empty_columns(&rows, &columns), columns);
    }

    #[test]
    fn projection_pipeline() {
        let rows = vec![
            row(&[("Code", "1"), ("ErrorMessage", "m"), ("BL", ""), ("Blank", "")]),
            row(&[("Code", "2"), ("ErrorMessage", ""), ("BL", "")]),
        ];
        // BL is empty everywhere, so simple view leaves only the message.
        assert_eq!(names(&project_columns(&rows, true)), vec!["ErrorMessage"]);
        assert_eq!(
            names(&project_columns(&rows, false)),
            vec!["ErrorMessage", "Code"]
        );
    }
}
