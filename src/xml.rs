//! Minimal XML element tree.
//!
//! The element constructors in [`crate::parser`] work over a plain tree of
//! names, attributes, text, and children rather than a raw token stream.
//! This module is the boundary to `quick-xml`: it tokenizes a document and
//! builds that tree, nothing more.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::ProjectError;

/// One XML element with its attributes, merged text content, and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlNode {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

fn node_from_start(e: &BytesStart) -> XmlNode {
    let mut node = XmlNode {
        name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        ..Default::default()
    };
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        node.attrs.push((key, value));
    }
    node
}

/// Parse a document into its root element tree.
pub fn parse_document(xml: &str) -> Result<XmlNode, ProjectError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                stack.push(node_from_start(e));
            }
            Ok(Event::Empty(ref e)) => {
                let node = node_from_start(e);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None if root.is_none() => root = Some(node),
                    None => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::End(_)) => {
                if let Some(node) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None if root.is_none() => root = Some(node),
                        None => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ProjectError::Xml {
                    message: e.to_string(),
                });
            }
            _ => {}
        }
        buf.clear();
    }

    root.ok_or_else(|| ProjectError::Xml {
        message: "no root element found".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_tree_with_attrs_and_text() {
        let doc = r#"<Root A="1"><Child B="x">hello</Child><Child B="y"/></Root>"#;
        let root = parse_document(doc).unwrap();
        assert_eq!(root.name, "Root");
        assert_eq!(root.attr("A"), Some("1"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].text, "hello");
        assert_eq!(root.children[1].attr("B"), Some("y"));
        assert_eq!(root.children_named("Child").count(), 2);
    }

    #[test]
    fn attribute_entities_are_unescaped() {
        let root = parse_document(r#"<Notes Notes="a &lt; b &amp; c"/>"#).unwrap();
        assert_eq!(root.attr("Notes"), Some("a < b & c"));
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(matches!(
            parse_document("   "),
            Err(ProjectError::Xml { .. })
        ));
    }
}
