//! Flattening an element subtree into one row.
//!
//! Keys are built from unqualified names: `child.grandchild` for nested
//! elements, `prefix@attr` for attributes and `prefix._text` for the direct
//! text of an element that also has children. Every key collects its values
//! in an ordered list; the list only collapses into one string when the
//! record is normalized.

use xtab_ingest::{NodeId, XmlDocument};
use xtab_model::Row;
use xtab_model::vocabulary::MULTI_VALUE_SEPARATOR;

/// A flattened record before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatRecord {
    fields: Vec<(String, Vec<String>)>,
}

impl FlatRecord {
    /// Appends `value` to the values already collected under `key`.
    pub fn push(&mut self, key: String, value: String) {
        if let Some((_, values)) = self.fields.iter_mut().find(|(name, _)| *name == key) {
            values.push(value);
        } else {
            self.fields.push((key, vec![value]));
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Collapses every key to a single string, joining repeated values with
    /// `"; "`.
    pub fn normalize(self) -> Row {
        let mut row = Row::with_capacity(self.fields.len());
        for (key, values) in self.fields {
            row.insert(key, values.join(MULTI_VALUE_SEPARATOR));
        }
        row
    }
}

/// Flattens the subtree rooted at `node`.
pub fn flatten_element(doc: &XmlDocument, node: NodeId) -> FlatRecord {
    let mut record = FlatRecord::default();
    flatten_into(doc, node, "", &mut record);
    record
}

fn flatten_into(doc: &XmlDocument, node: NodeId, prefix: &str, out: &mut FlatRecord) {
    for (name, value) in doc.attributes(node) {
        out.push(format!("{prefix}@{name}"), value.trim().to_string());
    }

    let children = doc.children(node);
    if children.is_empty() {
        let text = doc.direct_text(node);
        if !text.is_empty() {
            let key = if prefix.is_empty() {
                doc.local_name(node)
            } else {
                prefix
            };
            out.push(key.to_string(), text.to_string());
        }
        return;
    }

    for child in children {
        let tag = doc.local_name(*child);
        let child_prefix = if prefix.is_empty() {
            tag.to_string()
        } else {
            format!("{prefix}.{tag}")
        };
        flatten_into(doc, *child, &child_prefix, out);
    }

    let text = doc.direct_text(node);
    if !text.is_empty() {
        let key = if prefix.is_empty() {
            "_text".to_string()
        } else {
            format!("{prefix}._text")
        };
        out.push(key, text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_with_attribute() {
        // <Item id="1">Value</Item>
        let mut builder = XmlDocument::builder("Item");
        let root = builder.root();
        builder.attribute(root, "id", " 1 ").text(root, "Value");
        let doc = builder.build();

        let row = flatten_element(&doc, root).normalize();
        let cells: Vec<(&str, &str)> = row.iter().collect();
        assert_eq!(cells, vec![("@id", "1"), ("Item", "Value")]);
    }

    #[test]
    fn repeated_children_become_one_cell() {
        let mut builder = XmlDocument::builder("Parent");
        let root = builder.root();
        builder.leaf(root, "Child", "a");
        builder.leaf(root, "Child", "b");
        let doc = builder.build();

        let record = flatten_element(&doc, root);
        assert_eq!(
            record.get("Child"),
            Some(&["a".to_string(), "b".to_string()][..])
        );
        assert_eq!(record.normalize().value("Child"), "a; b");
    }

    #[test]
    fn mixed_content_keeps_own_text() {
        let mut builder = XmlDocument::builder("Node");
        let root = builder.root();
        builder.attribute(root, "type", "A").text(root, "Main");
        builder.leaf(root, "Sub", "Text");
        let doc = builder.build();

        let row = flatten_element(&doc, root).normalize();
        let cells: Vec<(&str, &str)> = row.iter().collect();
        assert_eq!(cells, vec![("@type", "A"), ("Sub", "Text"), ("_text", "Main")]);
    }

    #[test]
    fn nested_keys_are_dotted_and_namespaces_stripped() {
        let mut builder = XmlDocument::builder("ns:Record");
        let root = builder.root();
        let doc_info = builder.child(root, "ns:AppErrInfDoc");
        builder.attribute(doc_info, "lang", "en");
        builder.leaf(doc_info, "ns:CodeLstId", "E");
        let nested = builder.child(doc_info, "Inner");
        builder.text(nested, "deep").leaf(nested, "Leaf", "x");
        builder.child(root, "Empty");
        let doc = builder.build();

        let row = flatten_element(&doc, root).normalize();
        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(
            keys,
            vec![
                "AppErrInfDoc@lang",
                "AppErrInfDoc.CodeLstId",
                "AppErrInfDoc.Inner.Leaf",
                "AppErrInfDoc.Inner._text",
            ]
        );
        assert_eq!(row.value("AppErrInfDoc.Inner._text"), "deep");
    }

    #[test]
    fn empty_leaves_contribute_nothing() {
        let mut builder = XmlDocument::builder("R");
        let root = builder.root();
        builder.leaf(root, "Blank", "   ");
        let doc = builder.build();
        assert!(flatten_element(&doc, root).is_empty());
    }
}
