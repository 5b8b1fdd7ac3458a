//! Element name and path helpers.

use crate::document::{NodeId, XmlDocument};

/// Strips a namespace from an element name.
///
/// Handles both the expanded `{uri}local` form and the prefixed
/// `prefix:local` form.
pub fn strip_namespace(name: &str) -> &str {
    if let Some((_, local)) = name.rsplit_once('}') {
        return local;
    }
    if let Some((_, local)) = name.rsplit_once(':') {
        return local;
    }
    name
}

/// Case-insensitive comparison of unqualified names.
pub fn same_local_name(name: &str, expected: &str) -> bool {
    name.eq_ignore_ascii_case(expected) || name.to_lowercase() == expected.to_lowercase()
}

/// Slash-joined unqualified names from the root down to `node`.
pub fn element_path(doc: &XmlDocument, node: NodeId) -> String {
    let mut parts: Vec<&str> = doc
        .ancestors_or_self(node)
        .map(|ancestor| doc.local_name(ancestor))
        .collect();
    parts.reverse();
    parts.join("/")
}
