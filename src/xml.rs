//! Permissive XML decoding and model mapping.
//!
//! Kayako answers every call with an XML document. Responses are not always
//! well-formed (stray end tags, unknown entities, truncated bodies), so
//! [`XmlDocument::parse`] never stops at the first structural problem: it
//! records an [`XmlDiagnostic`] and keeps building the tree. Only input that
//! yields no element at all is rejected.
//!
//! [`XmlDocument::collect`] maps the children of the root that carry a
//! given tag into domain models. The result is a [`Parsed`], which keeps
//! the "one item vs. many items" distinction explicit: exactly one match is
//! returned as [`Parsed::Single`], anything else (including nothing) as
//! [`Parsed::Many`].

use std::fmt;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::Serialize;

use crate::error::KayakoError;

/// A well-formedness problem found while scanning a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDiagnostic {
    /// Byte offset in the input where the problem was noticed.
    pub position: u64,
    /// What went wrong.
    pub message: String,
}

impl fmt::Display for XmlDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at byte {}: {}", self.position, self.message)
    }
}

/// One element of a decoded document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Tag name, including any namespace prefix.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Concatenated, unescaped text and CDATA content.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an empty element with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the text content of this element.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the first child with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Iterates over the children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Returns the text of the first child with the given name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(XmlElement::text)
    }

    fn from_start(start: &BytesStart<'_>, position: u64, diagnostics: &mut Vec<XmlDiagnostic>) -> Self {
        let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
        for attr in start.attributes() {
            match attr {
                Ok(attr) => {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = match attr.unescape_value() {
                        Ok(value) => value.into_owned(),
                        Err(e) => {
                            diagnostics.push(XmlDiagnostic {
                                position,
                                message: format!("attribute {}: {}", key, e),
                            });
                            String::from_utf8_lossy(&attr.value).into_owned()
                        }
                    };
                    element.attributes.push((key, value));
                }
                Err(e) => diagnostics.push(XmlDiagnostic {
                    position,
                    message: format!("malformed attribute in <{}>: {}", element.name, e),
                }),
            }
        }
        element
    }
}

/// A decoded document plus everything that was wrong with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
    diagnostics: Vec<XmlDiagnostic>,
}

impl XmlDocument {
    /// Decodes `text` into a best-effort tree.
    ///
    /// # Errors
    ///
    /// Returns `KayakoError::Parse` only when no element could be
    /// recovered; the collected diagnostics are attached.
    pub fn parse(text: &str) -> Result<Self, KayakoError> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);
        // End tags are matched below so that mismatches become diagnostics.
        reader.config_mut().check_end_names = false;
        reader.config_mut().allow_unmatched_ends = true;

        let mut builder = TreeBuilder::default();

        loop {
            let position = reader.buffer_position() as u64;
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    let element = XmlElement::from_start(&start, position, &mut builder.diagnostics);
                    builder.open.push(element);
                }
                Ok(Event::Empty(start)) => {
                    let element = XmlElement::from_start(&start, position, &mut builder.diagnostics);
                    builder.attach(element);
                }
                Ok(Event::End(end)) => {
                    let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    builder.close(&name, position);
                }
                Ok(Event::Text(content)) => {
                    let text = match content.unescape() {
                        Ok(text) => text.into_owned(),
                        Err(e) => {
                            builder.diagnose(position, format!("invalid text content: {}", e));
                            String::from_utf8_lossy(&content).into_owned()
                        }
                    };
                    builder.push_text(&text, position);
                }
                Ok(Event::CData(content)) => {
                    let text = String::from_utf8_lossy(&content.into_inner()).into_owned();
                    builder.push_text(&text, position);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    builder.diagnose(position, e.to_string());
                    break;
                }
            }
        }

        builder.finish(reader.buffer_position() as u64)
    }

    /// Returns the root element.
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Returns the problems found while decoding.
    pub fn diagnostics(&self) -> &[XmlDiagnostic] {
        &self.diagnostics
    }

    /// Returns true if no problems were found.
    pub fn is_well_formed(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Maps the root's `collection_tag` children through `factory`, in
    /// document order.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `factory`.
    pub fn collect<T, F>(&self, collection_tag: &str, factory: F) -> Result<Parsed<T>, KayakoError>
    where
        F: FnMut(&XmlElement) -> Result<T, KayakoError>,
    {
        let models = self
            .root
            .children_named(collection_tag)
            .map(factory)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Parsed::from_vec(models))
    }
}

#[derive(Default)]
struct TreeBuilder {
    open: Vec<XmlElement>,
    roots: Vec<XmlElement>,
    diagnostics: Vec<XmlDiagnostic>,
}

impl TreeBuilder {
    fn diagnose(&mut self, position: u64, message: impl Into<String>) {
        self.diagnostics.push(XmlDiagnostic {
            position,
            message: message.into(),
        });
    }

    fn attach(&mut self, element: XmlElement) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(element),
            None => self.roots.push(element),
        }
    }

    fn close(&mut self, name: &str, position: u64) {
        let Some(depth) = self.open.iter().rposition(|e| e.name == name) else {
            self.diagnose(position, format!("unexpected end tag </{}>", name));
            return;
        };

        while self.open.len() > depth + 1 {
            if let Some(unclosed) = self.open.pop() {
                self.diagnose(
                    position,
                    format!("end tag </{}> closes unclosed <{}>", name, unclosed.name),
                );
                self.attach(unclosed);
            }
        }
        if let Some(element) = self.open.pop() {
            self.attach(element);
        }
    }

    fn push_text(&mut self, text: &str, position: u64) {
        match self.open.last_mut() {
            Some(element) => element.text.push_str(text),
            None if text.trim().is_empty() => {}
            None => self.diagnose(position, "text outside of the root element"),
        }
    }

    fn finish(mut self, position: u64) -> Result<XmlDocument, KayakoError> {
        while let Some(unclosed) = self.open.pop() {
            self.diagnose(position, format!("element <{}> is never closed", unclosed.name));
            self.attach(unclosed);
        }

        if self.roots.len() > 1 {
            self.diagnose(position, "document has more than one root element");
        }

        let mut roots = self.roots.into_iter();
        match roots.next() {
            Some(root) => Ok(XmlDocument {
                root,
                diagnostics: self.diagnostics,
            }),
            None => Err(KayakoError::Parse {
                message: "document contains no elements".to_string(),
                diagnostics: self.diagnostics,
            }),
        }
    }
}

/// Domain models that can be built from one XML element.
pub trait FromXml: Sized {
    /// Builds a model from `element`.
    ///
    /// # Errors
    ///
    /// Returns `KayakoError::Parse` when a required field is missing or invalid.
    fn from_xml(element: &XmlElement) -> Result<Self, KayakoError>;
}

/// Result of mapping a collection, with the arity made explicit.
///
/// Exactly one mapped element is `Single`; zero or several are `Many`.
/// Callers must match on the variant to tell "one ticket" from "a list of
/// tickets".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Parsed<T> {
    /// Exactly one element matched.
    Single(T),
    /// Zero or more than one element matched, in document order.
    Many(Vec<T>),
}

impl<T> Parsed<T> {
    /// Collapses a one-element vector into `Single`.
    pub fn from_vec(mut items: Vec<T>) -> Self {
        if items.len() == 1 {
            if let Some(item) = items.pop() {
                return Parsed::Single(item);
            }
        }
        Parsed::Many(items)
    }

    /// Returns the number of models.
    pub fn len(&self) -> usize {
        match self {
            Parsed::Single(_) => 1,
            Parsed::Many(items) => items.len(),
        }
    }

    /// Returns true if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the model if exactly one matched.
    pub fn into_single(self) -> Option<T> {
        match self {
            Parsed::Single(item) => Some(item),
            Parsed::Many(_) => None,
        }
    }

    /// Flattens into a vector regardless of arity.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Parsed::Single(item) => vec![item],
            Parsed::Many(items) => items,
        }
    }

    /// Iterates over the models.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Parsed::Single(item) => std::slice::from_ref(item).iter(),
            Parsed::Many(items) => items.iter(),
        }
    }
}

/// Decodes `body` and maps its `collection_tag` children through `factory`.
///
/// # Errors
///
/// Returns `KayakoError::Parse` when the body holds no element, or the
/// first error from `factory`.
pub fn parse_collection<T, F>(body: &str, collection_tag: &str, factory: F) -> Result<Parsed<T>, KayakoError>
where
    F: FnMut(&XmlElement) -> Result<T, KayakoError>,
{
    XmlDocument::parse(body)?.collect(collection_tag, factory)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(element: &XmlElement) -> Result<String, KayakoError> {
        Ok(element.text().to_string())
    }

    #[test]
    fn test_single_match_is_scalar() {
        let parsed = parse_collection("<root><item>A</item></root>", "item", text_of).unwrap();
        assert_eq!(parsed, Parsed::Single("A".to_string()));
    }

    #[test]
    fn test_no_match_is_empty_sequence() {
        let parsed = parse_collection("<root></root>", "item", text_of).unwrap();
        assert_eq!(parsed, Parsed::Many(vec![]));
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_many_matches_keep_document_order() {
        let parsed =
            parse_collection("<root><item>A</item><item>B</item></root>", "item", text_of).unwrap();
        assert_eq!(parsed, Parsed::Many(vec!["A".to_string(), "B".to_string()]));
    }

    #[test]
    fn test_only_direct_children_of_root_match() {
        let parsed = parse_collection(
            "<root><group><item>nested</item></group><item>top</item><other/></root>",
            "item",
            text_of,
        )
        .unwrap();
        assert_eq!(parsed, Parsed::Single("top".to_string()));
    }

    #[test]
    fn test_factory_error_propagates() {
        let result: Result<Parsed<()>, _> =
            parse_collection("<root><item/></root>", "item", |_| Err(KayakoError::parse("bad")));
        assert!(matches!(result, Err(KayakoError::Parse { .. })));
    }

    #[test]
    fn test_attributes_text_and_cdata() {
        let doc = XmlDocument::parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <tickets>
                <ticket id="7" flagtype="0">
                    <subject><![CDATA[Printer <broken>]]></subject>
                    <note>Tom &amp; Jerry</note>
                </ticket>
            </tickets>"#,
        )
        .unwrap();
        assert!(doc.is_well_formed());
        let ticket = doc.root().child("ticket").unwrap();
        assert_eq!(ticket.attribute("id"), Some("7"));
        assert_eq!(ticket.attribute("missing"), None);
        assert_eq!(ticket.child_text("subject"), Some("Printer <broken>"));
        assert_eq!(ticket.child_text("note"), Some("Tom & Jerry"));
    }

    #[test]
    fn test_mismatched_end_tag_is_collected() {
        let doc = XmlDocument::parse("<root><item><b>x</item><item>y</item></root>").unwrap();
        assert!(!doc.is_well_formed());
        assert!(doc.diagnostics()[0].message.contains("closes unclosed <b>"));
        let items: Vec<&str> = doc.root().children_named("item").map(XmlElement::text).collect();
        assert_eq!(items, vec!["", "y"]);
        assert_eq!(doc.root().children[0].child_text("b"), Some("x"));
    }

    #[test]
    fn test_stray_end_tag_is_ignored() {
        let doc = XmlDocument::parse("<root><item>A</item></extra></root>").unwrap();
        assert_eq!(doc.diagnostics().len(), 1);
        assert!(doc.diagnostics()[0].message.contains("</extra>"));
        assert_eq!(doc.root().children.len(), 1);
    }

    #[test]
    fn test_truncated_document_keeps_partial_tree() {
        let doc = XmlDocument::parse("<users><user><id>1</id></user><user><id>2</id>").unwrap();
        assert!(!doc.is_well_formed());
        let parsed = doc
            .collect("user", |e| Ok(e.child_text("id").unwrap_or_default().to_string()))
            .unwrap();
        assert_eq!(parsed, Parsed::Many(vec!["1".to_string(), "2".to_string()]));
    }

    #[test]
    fn test_unknown_entity_is_collected() {
        let doc = XmlDocument::parse("<root><item>a&nbsp;b</item></root>").unwrap();
        assert!(!doc.is_well_formed());
        assert_eq!(doc.root().child_text("item"), Some("a&nbsp;b"));
    }

    #[test]
    fn test_no_elements_is_parse_error() {
        for input in ["", "   ", "not xml at all"] {
            let err = XmlDocument::parse(input).unwrap_err();
            assert!(matches!(err, KayakoError::Parse { .. }), "input {:?}", input);
        }
    }

    #[test]
    fn test_parsed_helpers() {
        let single = Parsed::from_vec(vec![1]);
        assert_eq!(single.len(), 1);
        assert_eq!(single.iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(single.clone().into_single(), Some(1));
        assert_eq!(single.into_vec(), vec![1]);

        let many = Parsed::from_vec(vec![1, 2]);
        assert_eq!(many.len(), 2);
        assert_eq!(many.clone().into_single(), None);
        assert_eq!(many.into_vec(), vec![1, 2]);
    }

    #[test]
    fn test_parsed_serializes_by_arity() {
        let single = serde_json::to_string(&Parsed::Single("A")).unwrap();
        let many = serde_json::to_string(&Parsed::Many(vec!["A", "B"])).unwrap();
        assert_eq!(single, "\"A\"");
        assert_eq!(many, "[\"A\",\"B\"]");
    }
}
