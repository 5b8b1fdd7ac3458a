//! Record detection: which element represents one table row.
//!
//! Resolution order:
//! 1. explicit record path, below the root or from the root
//! 2. manual record tag (case-insensitive unqualified name match)
//! 3. preferred tags, in priority order
//! 4. the detection heuristic, which scores every repeated element path by
//!    `(average field count + 1) * occurrences`
//! 5. the root's children (or the root) when nothing repeats

use std::collections::HashMap;
use std::fmt;

use tracing::debug;
use xtab_model::vocabulary::PREFERRED_RECORD_TAGS;

use crate::document::{NodeId, XmlDocument};
use crate::names::{element_path, same_local_name};

/// How a [`RecordSelection`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateStrategy {
    Path,
    ManualTag,
    Preferred,
    Detected,
    Fallback,
}

impl fmt::Display for LocateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Path => "record path",
            Self::ManualTag => "record tag",
            Self::Preferred => "preferred tag",
            Self::Detected => "detected",
            Self::Fallback => "root children",
        };
        f.write_str(label)
    }
}

/// The elements chosen as records.
#[derive(Debug, Clone)]
pub struct RecordSelection {
    /// Record elements in document order.
    pub elements: Vec<NodeId>,
    /// Path (or manual tag) reported to the user.
    pub path: String,
    /// Record tag, when one is known.
    pub tag: Option<String>,
    pub strategy: LocateStrategy,
    /// Heuristic score of the winning group.
    pub score: Option<f64>,
}

impl RecordSelection {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Manual overrides for record detection.
#[derive(Debug, Clone, Default)]
pub struct LocateOptions {
    pub record_tag: Option<String>,
    pub record_path: Option<String>,
}

impl LocateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_record_tag(mut self, tag: Option<String>) -> Self {
        self.record_tag = tag;
        self
    }

    #[must_use]
    pub fn with_record_path(mut self, path: Option<String>) -> Self {
        self.record_path = path;
        self
    }

    fn manual_tag(&self) -> Option<&str> {
        self.record_tag
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }

    fn manual_path(&self) -> Option<&str> {
        self.record_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !normalize_record_path(path).is_empty())
    }
}

/// Chooses the record elements of `doc`.
pub fn locate_records(doc: &XmlDocument, options: &LocateOptions) -> RecordSelection {
    if let Some(raw) = options.manual_path() {
        let elements = find_records_by_path(doc, raw);
        let path = if descendant_suffix(raw).is_some() {
            raw.trim_end_matches('/')
        } else {
            normalize_record_path(raw)
        };
        debug!(path, records = elements.len(), "records selected by path");
        return RecordSelection {
            elements,
            path: path.to_string(),
            tag: path.rsplit('/').next().map(str::to_string),
            strategy: LocateStrategy::Path,
            score: None,
        };
    }
    if let Some(tag) = options.manual_tag() {
        let elements = find_records_by_tag(doc, tag);
        debug!(tag, records = elements.len(), "records selected by tag");
        return RecordSelection {
            elements,
            path: tag.to_string(),
            tag: Some(tag.to_string()),
            strategy: LocateStrategy::ManualTag,
            score: None,
        };
    }
    find_preferred_records(doc).unwrap_or_else(|| detect_records(doc))
}

/// Every element, root included, whose unqualified name case-insensitively
/// equals `tag`, in document order.
pub fn find_records_by_tag(doc: &XmlDocument, tag: &str) -> Vec<NodeId> {
    let target = tag.trim();
    if target.is_empty() {
        return Vec::new();
    }
    doc.nodes()
        .filter(|node| same_local_name(doc.local_name(*node), target))
        .collect()
}

/// Elements selected by a slash-separated record path, in document order.
///
/// `A/B` and `./A/B` walk down from the root's children, so the root tag is
/// left out. `.//B` matches `B` at any depth below the root. When a plain
/// path selects nothing below the root it is matched against the full path
/// instead, which lets `Root/A/B` and `/Root/A/B` name the same elements.
/// Matching is case-sensitive on unqualified names.
pub fn find_records_by_path(doc: &XmlDocument, path: &str) -> Vec<NodeId> {
    let path = path.trim();
    if let Some(suffix) = descendant_suffix(path) {
        let nested = format!("/{suffix}");
        return doc
            .nodes()
            .filter(|node| {
                path_below_root(doc, *node)
                    .is_some_and(|below| below == suffix || below.ends_with(&nested))
            })
            .collect();
    }

    let target = normalize_record_path(path);
    if target.is_empty() {
        return Vec::new();
    }
    let below_root: Vec<NodeId> = doc
        .nodes()
        .filter(|node| path_below_root(doc, *node).as_deref() == Some(target))
        .collect();
    if !below_root.is_empty() {
        return below_root;
    }
    doc.nodes()
        .filter(|node| element_path(doc, *node) == target)
        .collect()
}

/// Ancestor path without the root segment. `None` for the root itself.
fn path_below_root(doc: &XmlDocument, node: NodeId) -> Option<String> {
    element_path(doc, node)
        .split_once('/')
        .map(|(_, below)| below.to_string())
}

/// `B/C` out of `.//B/C` or `//B/C`.
fn descendant_suffix(path: &str) -> Option<&str> {
    let suffix = path
        .strip_prefix(".//")
        .or_else(|| path.strip_prefix("//"))?
        .trim_end_matches('/');
    (!suffix.is_empty()).then_some(suffix)
}

/// First preferred tag with at least one match.
pub fn find_preferred_records(doc: &XmlDocument) -> Option<RecordSelection> {
    PREFERRED_RECORD_TAGS.iter().find_map(|tag| {
        let elements: Vec<NodeId> = doc
            .nodes()
            .filter(|node| doc.local_name(*node) == *tag)
            .collect();
        let first = *elements.first()?;
        let path = element_path(doc, first);
        debug!(tag, path = %path, records = elements.len(), "preferred record tag found");
        Some(RecordSelection {
            elements,
            path,
            tag: Some((*tag).to_string()),
            strategy: LocateStrategy::Preferred,
            score: None,
        })
    })
}

struct PathGroup {
    path: String,
    elements: Vec<NodeId>,
    field_sum: usize,
}

impl PathGroup {
    fn score(&self) -> f64 {
        let count = self.elements.len() as f64;
        let average = self.field_sum as f64 / count;
        (average + 1.0) * count
    }
}

/// Runs the frequency/field-density heuristic.
///
/// Groups with fewer than two members never qualify; ties keep the group
/// encountered first in document order.
pub fn detect_records(doc: &XmlDocument) -> RecordSelection {
    let mut groups: Vec<PathGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut paths: HashMap<NodeId, String> = HashMap::new();

    for node in doc.nodes() {
        // Parents are visited before children, so their path is known.
        let path = match doc.parent(node).and_then(|parent| paths.get(&parent)) {
            Some(parent_path) => format!("{parent_path}/{}", doc.local_name(node)),
            None => doc.local_name(node).to_string(),
        };
        let slot = *index.entry(path.clone()).or_insert_with(|| {
            groups.push(PathGroup {
                path: path.clone(),
                elements: Vec::new(),
                field_sum: 0,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.elements.push(node);
        group.field_sum += doc.field_count(node);
        paths.insert(node, path);
    }

    let mut best: Option<(&PathGroup, f64)> = None;
    for group in groups.iter().filter(|group| group.elements.len() >= 2) {
        let score = group.score();
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((group, score));
        }
    }

    match best {
        Some((group, score)) => {
            debug!(path = %group.path, score, records = group.elements.len(), "detected record path");
            RecordSelection {
                elements: group.elements.clone(),
                path: group.path.clone(),
                tag: group.path.rsplit('/').next().map(str::to_string),
                strategy: LocateStrategy::Detected,
                score: Some(score),
            }
        }
        None => {
            let root = doc.root();
            let children = doc.children(root);
            let elements = if children.is_empty() {
                vec![root]
            } else {
                children.to_vec()
            };
            debug!(records = elements.len(), "no repeated element, using root children");
            RecordSelection {
                elements,
                path: doc.local_name(root).to_string(),
                tag: None,
                strategy: LocateStrategy::Fallback,
                score: None,
            }
        }
    }
}

fn normalize_record_path(path: &str) -> &str {
    let path = path.trim();
    let path = path.strip_prefix("./").unwrap_or(path);
    let path = path.strip_prefix('/').unwrap_or(path);
    path.strip_suffix('/').unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentBuilder;

    /// Root with `count` children named `name`, each with `fields` leaves.
    fn add_group(builder: &mut DocumentBuilder, parent: NodeId, name: &str, count: usize, fields: usize) {
        for _ in 0..count {
            let item = builder.child(parent, name);
            for field in 0..fields {
                builder.leaf(item, &format!("F{field}"), "x");
            }
        }
    }

    #[test]
    fn dense_group_beats_frequent_empty_group() {
        let mut builder = XmlDocument::builder("Root");
        let root = builder.root();
        let dense = builder.child(root, "DenseList");
        add_group(&mut builder, dense, "Dense", 5, 3);
        let sparse = builder.child(root, "SparseList");
        add_group(&mut builder, sparse, "Sparse", 10, 0);
        let doc = builder.build();

        let selection = detect_records(&doc);
        assert_eq!(selection.strategy, LocateStrategy::Detected);
        assert_eq!(selection.path, "Root/DenseList/Dense");
        assert_eq!(selection.tag.as_deref(), Some("Dense"));
        assert_eq!(selection.len(), 5);
        assert_eq!(selection.score, Some(20.0));
    }

    #[test]
    fn leaves_of_dense_records_do_not_win() {
        // Each Dense element has F0..F2; the F0 group repeats 5 times with no
        // fields and scores 5.
        let mut builder = XmlDocument::builder("Root");
        let root = builder.root();
        add_group(&mut builder, root, "Dense", 5, 3);
        let doc = builder.build();
        assert_eq!(detect_records(&doc).path, "Root/Dense");
    }

    #[test]
    fn ties_keep_first_group() {
        let mut builder = XmlDocument::builder("Root");
        let root = builder.root();
        add_group(&mut builder, root, "First", 2, 1);
        add_group(&mut builder, root, "Second", 2, 1);
        let doc = builder.build();
        let selection = detect_records(&doc);
        assert_eq!(selection.path, "Root/First");
    }

    #[test]
    fn falls_back_to_root_children() {
        let mut builder = XmlDocument::builder("Root");
        let root = builder.root();
        let a = builder.leaf(root, "A", "1");
        let b = builder.leaf(root, "B", "2");
        let doc = builder.build();
        let selection = detect_records(&doc);
        assert_eq!(selection.strategy, LocateStrategy::Fallback);
        assert_eq!(selection.elements, vec![a, b]);
        assert_eq!(selection.path, "Root");
        assert!(selection.tag.is_none());

        let lonely = XmlDocument::builder("Only").build();
        assert_eq!(detect_records(&lonely).elements, vec![lonely.root()]);
    }

    #[test]
    fn manual_tag_is_case_insensitive_and_includes_root() {
        let mut builder = XmlDocument::builder("ns:item");
        let root = builder.root();
        let inner = builder.child(root, "Item");
        builder.child(root, "Other");
        let doc = builder.build();
        let options = LocateOptions::new().with_record_tag(Some("  ITEM ".to_string()));
        let selection = locate_records(&doc, &options);
        assert_eq!(selection.strategy, LocateStrategy::ManualTag);
        assert_eq!(selection.elements, vec![root, inner]);
        assert_eq!(selection.path, "ITEM");
    }

    #[test]
    fn manual_tag_may_match_nothing() {
        let doc = XmlDocument::builder("Root").build();
        let options = LocateOptions::new().with_record_tag(Some("Typo".to_string()));
        assert!(locate_records(&doc, &options).is_empty());
    }

    #[test]
    fn preferred_tags_follow_priority() {
        let mut builder = XmlDocument::builder("Root");
        let root = builder.root();
        let detail = builder.child(root, "ErrPntDtlDoc");
        let wrapper = builder.child(root, "Wrap");
        let text = builder.child(wrapper, "ErrTxtDoc");
        add_group(&mut builder, root, "Noise", 20, 4);
        let doc = builder.build();

        let selection = locate_records(&doc, &LocateOptions::new());
        assert_eq!(selection.strategy, LocateStrategy::Preferred);
        assert_eq!(selection.elements, vec![text]);
        assert_eq!(selection.path, "Root/Wrap/ErrTxtDoc");
        assert_ne!(selection.elements, vec![detail]);
    }

    #[test]
    fn record_path_wins_over_tag() {
        let mut builder = XmlDocument::builder("Root");
        let root = builder.root();
        let list = builder.child(root, "List");
        let wanted = builder.child(list, "Item");
        builder.child(root, "Item");
        let doc = builder.build();
        let options = LocateOptions::new()
            .with_record_tag(Some("Item".to_string()))
            .with_record_path(Some("/Root/List/Item".to_string()));
        let selection = locate_records(&doc, &options);
        assert_eq!(selection.strategy, LocateStrategy::Path);
        assert_eq!(selection.elements, vec![wanted]);
        assert_eq!(selection.path, "Root/List/Item");
    }

    /// `<Report><Errors><ErrTxtDoc/>x2</Errors><Notes><ErrTxtDoc/></Notes></Report>`
    fn report_with_nested_errors() -> (XmlDocument, Vec<NodeId>, NodeId) {
        let mut builder = XmlDocument::builder("Report");
        let root = builder.root();
        let errors = builder.child(root, "Errors");
        let first = builder.leaf(errors, "ErrTxtDoc", "a");
        let second = builder.leaf(errors, "ErrTxtDoc", "b");
        let notes = builder.child(root, "Notes");
        let noted = builder.leaf(notes, "ErrTxtDoc", "c");
        (builder.build(), vec![first, second], noted)
    }

    #[test]
    fn record_path_is_relative_to_the_root() {
        let (doc, errors, _) = report_with_nested_errors();
        assert_eq!(find_records_by_path(&doc, "Errors/ErrTxtDoc"), errors);
        assert_eq!(find_records_by_path(&doc, "./Errors/ErrTxtDoc"), errors);

        let options = LocateOptions::new().with_record_path(Some("Errors/ErrTxtDoc".to_string()));
        let selection = locate_records(&doc, &options);
        assert_eq!(selection.elements, errors);
        assert_eq!(selection.path, "Errors/ErrTxtDoc");
        assert_eq!(selection.tag.as_deref(), Some("ErrTxtDoc"));
    }

    #[test]
    fn record_path_may_start_at_the_root_tag() {
        let (doc, errors, _) = report_with_nested_errors();
        assert_eq!(find_records_by_path(&doc, "Report/Errors/ErrTxtDoc"), errors);
        assert_eq!(find_records_by_path(&doc, "/Report/Errors/ErrTxtDoc/"), errors);
        assert!(find_records_by_path(&doc, "ErrTxtDoc").is_empty());
        assert!(find_records_by_path(&doc, "errors/errtxtdoc").is_empty());
    }

    #[test]
    fn descendant_record_path_matches_any_depth() {
        let (doc, errors, noted) = report_with_nested_errors();
        let mut all = errors.clone();
        all.push(noted);
        assert_eq!(find_records_by_path(&doc, ".//ErrTxtDoc"), all);
        assert_eq!(find_records_by_path(&doc, "//Notes/ErrTxtDoc"), vec![noted]);
        assert!(find_records_by_path(&doc, ".//Report").is_empty());

        let options = LocateOptions::new().with_record_path(Some(".//ErrTxtDoc".to_string()));
        let selection = locate_records(&doc, &options);
        assert_eq!(selection.path, ".//ErrTxtDoc");
        assert_eq!(selection.tag.as_deref(), Some("ErrTxtDoc"));
    }
}
