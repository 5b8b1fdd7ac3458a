//! XML text to [`XmlDocument`] using `quick-xml`.
//!
//! This is the only place that touches the XML reader. Comments, processing
//! instructions, the prolog, DOCTYPE and namespace declarations are dropped;
//! CDATA counts as text; predefined entities and character references are
//! resolved.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::document::{DocumentBuilder, NodeId, XmlDocument};
use crate::error::{IngestError, Result};

/// Parses XML text into a document tree.
///
/// # Errors
///
/// Returns an error for ill-formed XML: mismatched or unclosed tags, bad
/// attributes, unknown entities, no root element, or content outside the root.
pub fn parse_document(xml: &str) -> Result<XmlDocument> {
    let mut reader = Reader::from_str(xml);
    let decoder = reader.decoder();
    let mut tree = TreeState::default();

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|err| parse_error(reader.buffer_position(), err))?;
        match event {
            Event::Start(start) => {
                let node = tree.open(&start, decoder, position)?;
                tree.stack.push(node);
            }
            Event::Empty(start) => {
                tree.open(&start, decoder, position)?;
            }
            Event::End(_) => {
                tree.stack.pop();
            }
            Event::Text(text) => {
                let value = decoder
                    .decode(&text)
                    .map_err(|err| parse_error(position, err))?;
                tree.append_text(&value, position)?;
            }
            Event::CData(data) => {
                let value = decoder
                    .decode(&data)
                    .map_err(|err| parse_error(position, err))?;
                tree.append_text(&value, position)?;
            }
            Event::GeneralRef(reference) => {
                let name = decoder
                    .decode(&reference)
                    .map_err(|err| parse_error(position, err))?;
                let value = resolve_reference(&name).ok_or_else(|| IngestError::XmlParse {
                    position,
                    message: format!("unknown entity reference '&{name};'"),
                })?;
                tree.append_text(&value, position)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = tree.stack.last() {
        let name = tree
            .builder
            .as_ref()
            .map(|builder| builder.name(*open).to_string())
            .unwrap_or_default();
        return Err(IngestError::UnclosedElement { name });
    }
    let doc = tree
        .builder
        .map(DocumentBuilder::build)
        .ok_or(IngestError::EmptyDocument)?;
    debug!(elements = doc.len(), "parsed XML document");
    Ok(doc)
}

#[derive(Default)]
struct TreeState {
    builder: Option<DocumentBuilder>,
    stack: Vec<NodeId>,
}

impl TreeState {
    fn open(&mut self, start: &BytesStart<'_>, decoder: Decoder, position: u64) -> Result<NodeId> {
        let qname = start.name();
        let name = decoder
            .decode(qname.as_ref())
            .map_err(|err| parse_error(position, err))?;
        let node = if let Some(builder) = self.builder.as_mut() {
            let Some(parent) = self.stack.last().copied() else {
                return Err(IngestError::TrailingContent { position });
            };
            builder.child(parent, &name)
        } else {
            let builder = DocumentBuilder::new(&name);
            let root = builder.root();
            self.builder = Some(builder);
            root
        };
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|err| parse_error(position, err))?;
            let key = decoder
                .decode(attribute.key.as_ref())
                .map_err(|err| parse_error(position, err))?;
            if is_namespace_declaration(&key) {
                continue;
            }
            let value = attribute
                .unescape_value()
                .map_err(|err| parse_error(position, err))?;
            if let Some(builder) = self.builder.as_mut() {
                builder.attribute(node, &key, &value);
            }
        }
        Ok(node)
    }

    fn append_text(&mut self, text: &str, position: u64) -> Result<()> {
        match (&mut self.builder, self.stack.last()) {
            (Some(builder), Some(node)) => {
                builder.text(*node, text);
                Ok(())
            }
            _ if text.trim().is_empty() => Ok(()),
            _ => Err(IngestError::TrailingContent { position }),
        }
    }
}

fn is_namespace_declaration(key: &str) -> bool {
    key == "xmlns" || key.starts_with("xmlns:")
}

/// Resolves the body of `&...;`: a predefined entity or a character reference.
fn resolve_reference(name: &str) -> Option<Cow<'static, str>> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(|ch| Cow::Owned(ch.to_string()));
    }
    resolve_predefined_entity(name).map(Cow::Borrowed)
}

fn parse_error(position: u64, err: impl std::fmt::Display) -> IngestError {
    IngestError::XmlParse {
        position,
        message: err.to_string(),
    }
}
