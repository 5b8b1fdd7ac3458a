//! Derived columns: unified message, routing id and status code list.
//!
//! Resolution never fails. Anything that cannot be found degrades to an
//! empty message or to an absent column.

use tracing::trace;
use xtab_ingest::{NodeId, XmlDocument, same_local_name};
use xtab_model::Row;
use xtab_model::vocabulary::{
    BL_COLUMN, CODE_LIST_DOC_COLUMN, CODE_LIST_HDR_COLUMN, CODE_LIST_TAG, DOC_INFO_TAG,
    ERROR_MESSAGE_COLUMN, HDR_INFO_TAG, MESSAGE_KEYS, TRANSPORT_ID_TAG,
};

/// First non-empty message among the known message keys, or `""`.
pub fn derive_error_message(row: &Row) -> &str {
    MESSAGE_KEYS
        .iter()
        .map(|key| row.value(key))
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

/// First key whose last dotted segment, minus a leading `@`, names the
/// transport id element.
pub fn find_bl_key(row: &Row) -> Option<&str> {
    row.keys().find(|key| {
        let last = key.rsplit('.').next().unwrap_or(*key);
        let clean = last.strip_prefix('@').unwrap_or(last);
        same_local_name(clean, TRANSPORT_ID_TAG)
    })
}

/// Trimmed direct text of the first descendant-or-self of `node` named `tag`
/// that has any.
pub fn find_tag_value<'a>(doc: &'a XmlDocument, node: NodeId, tag: &str) -> Option<&'a str> {
    doc.descendants_or_self(node)
        .filter(|candidate| same_local_name(doc.local_name(*candidate), tag))
        .map(|candidate| doc.direct_text(candidate))
        .find(|text| !text.is_empty())
}

/// Like [`find_tag_value`], searching only below descendant-or-self elements
/// named `parent_tag`.
pub fn find_nested_tag_value<'a>(
    doc: &'a XmlDocument,
    node: NodeId,
    parent_tag: &str,
    child_tag: &str,
) -> Option<&'a str> {
    doc.descendants_or_self(node)
        .filter(|candidate| same_local_name(doc.local_name(*candidate), parent_tag))
        .find_map(|parent| find_tag_value(doc, parent, child_tag))
}

/// Transport id from the record or its nearest ancestor that has one.
pub fn find_bl_value(doc: &XmlDocument, node: NodeId) -> Option<&str> {
    doc.ancestors_or_self(node)
        .find_map(|level| find_tag_value(doc, level, TRANSPORT_ID_TAG))
}

/// Status code list from the record or its nearest ancestor that has one.
///
/// At every level the document-level block wins over the header-level one.
pub fn find_code_list_value(doc: &XmlDocument, node: NodeId) -> Option<&str> {
    doc.ancestors_or_self(node).find_map(|level| {
        find_nested_tag_value(doc, level, DOC_INFO_TAG, CODE_LIST_TAG)
            .or_else(|| find_nested_tag_value(doc, level, HDR_INFO_TAG, CODE_LIST_TAG))
    })
}

/// Adds `ErrorMessage`, `BL` and the status code list to a flattened row.
///
/// Columns already present in the row are never overwritten.
pub fn apply_derived_fields(row: &mut Row, doc: &XmlDocument, node: NodeId) {
    if !row.contains_key(ERROR_MESSAGE_COLUMN) {
        let message = derive_error_message(row).to_string();
        row.insert(ERROR_MESSAGE_COLUMN, message);
    }

    if !row.contains_key(BL_COLUMN) {
        let from_row = find_bl_key(row).map(|key| row.value(key).to_string());
        match from_row {
            Some(value) => row.insert(BL_COLUMN, value),
            None => match find_bl_value(doc, node) {
                Some(value) => row.insert(BL_COLUMN, value),
                None => trace!(node = node.index(), "record has no transport id"),
            },
        }
    }

    if !row.contains_key(CODE_LIST_DOC_COLUMN)
        && !row.contains_key(CODE_LIST_HDR_COLUMN)
        && let Some(value) = find_code_list_value(doc, node)
    {
        row.insert(CODE_LIST_DOC_COLUMN, value);
    }
}
