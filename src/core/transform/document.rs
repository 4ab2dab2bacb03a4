//! In-memory XML element tree
//!
//! The source document is parsed once into a small owned tree so that column
//! selectors can walk children, descendants and attributes freely. Namespace
//! prefixes are dropped: elements and attributes are matched by local name.

use crate::domain::errors::MalformedInputError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Deepest element nesting accepted by [`parse_document`]
pub const MAX_DEPTH: usize = 1024;

/// Child of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Unescaped character data (text or CDATA)
    Text(String),
}

/// One XML element with its attributes and children in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Local name of the element
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by local name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct child elements
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// All descendant elements in document order, excluding `self`
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            out.push(child);
            child.collect_descendants(out);
        }
    }

    /// Concatenated text of this element and all of its descendants
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }
}

/// Parses a complete XML document and returns its root element
///
/// Bytes are decoded as UTF-8 with invalid sequences replaced.
///
/// # Errors
///
/// Returns [`MalformedInputError`] if the input is not a single well-formed
/// element tree: unclosed or mismatched tags, bad attributes or entity
/// references, a missing root, several roots, or text outside the root.
/// Documents nested deeper than [`MAX_DEPTH`] elements are rejected too.
pub fn parse_document(input: &[u8]) -> Result<Element, MalformedInputError> {
    let source = String::from_utf8_lossy(input);
    let mut reader = Reader::from_str(&source);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            MalformedInputError::new(e.to_string()).at(reader.buffer_position() as u64)
        })?;
        let position = reader.buffer_position() as u64;

        if matches!(event, Event::Start(_) | Event::Empty(_)) && stack.len() >= MAX_DEPTH {
            return Err(MalformedInputError::new(format!(
                "elements nested deeper than {MAX_DEPTH} levels"
            ))
            .at(position));
        }

        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(MalformedInputError::new("more than one root element").at(position));
                }
                stack.push(open_element(&start).map_err(|e| e.at(position))?);
            }
            Event::Empty(start) => {
                let element = open_element(&start).map_err(|e| e.at(position))?;
                attach(element, &mut stack, &mut root).map_err(|e| e.at(position))?;
            }
            Event::End(end) => {
                let closing = String::from_utf8_lossy(end.local_name().as_ref()).into_owned();
                let element = stack.pop().ok_or_else(|| {
                    MalformedInputError::new(format!("unexpected closing tag </{closing}>"))
                        .at(position)
                })?;
                if element.name != closing {
                    return Err(MalformedInputError::new(format!(
                        "expected </{}>, found </{closing}>",
                        element.name
                    ))
                    .at(position));
                }
                attach(element, &mut stack, &mut root).map_err(|e| e.at(position))?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| MalformedInputError::new(e.to_string()).at(position))?;
                push_text(text.into_owned(), &mut stack).map_err(|e| e.at(position))?;
            }
            Event::CData(cdata) => {
                let text = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                push_text(text, &mut stack).map_err(|e| e.at(position))?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(unclosed) = stack.last() {
        return Err(MalformedInputError::new(format!(
            "unclosed element <{}> at end of input",
            unclosed.name
        ))
        .at(reader.buffer_position() as u64));
    }

    root.ok_or_else(|| MalformedInputError::new("document has no root element"))
}

fn open_element(start: &BytesStart<'_>) -> Result<Element, MalformedInputError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| {
            MalformedInputError::new(format!("invalid attribute on <{name}>: {e}"))
        })?;
        let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| {
                MalformedInputError::new(format!("invalid attribute value on <{name}>: {e}"))
            })?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), MalformedInputError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_some() => {
            return Err(MalformedInputError::new("more than one root element"));
        }
        None => *root = Some(element),
    }
    Ok(())
}

fn push_text(text: String, stack: &mut [Element]) -> Result<(), MalformedInputError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Text(text)),
        None if text.trim().is_empty() => {}
        None => {
            return Err(MalformedInputError::new(
                "character data outside the root element",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_document() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<REPONSE>
  <PROGRAMME id="7">
    <NOM>Les Jardins &amp; Co</NOM>
    <DESC><![CDATA[<p>Vue mer</p>]]></DESC>
  </PROGRAMME>
</REPONSE>"#;

        let root = parse_document(xml).unwrap();
        assert_eq!(root.name(), "REPONSE");

        let programme = root.child_elements().next().unwrap();
        assert_eq!(programme.name(), "PROGRAMME");
        assert_eq!(programme.attribute("id"), Some("7"));
        assert_eq!(programme.attribute("missing"), None);

        let names: Vec<&str> = programme.descendants().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["NOM", "DESC"]);

        let nom = programme.child_elements().next().unwrap();
        assert_eq!(nom.text(), "Les Jardins & Co");

        let desc = programme.child_elements().nth(1).unwrap();
        assert_eq!(desc.text(), "<p>Vue mer</p>");
    }

    #[test]
    fn test_text_concatenates_descendants() {
        let root = parse_document(b"<a>one <b>two</b> three</a>").unwrap();
        assert_eq!(root.text(), "one two three");
    }

    #[test]
    fn test_namespace_prefixes_are_dropped() {
        let root = parse_document(br#"<ns:feed xmlns:ns="urn:x"><ns:item ns:id="1"/></ns:feed>"#)
            .unwrap();
        assert_eq!(root.name(), "feed");
        let item = root.child_elements().next().unwrap();
        assert_eq!(item.name(), "item");
        assert_eq!(item.attribute("id"), Some("1"));
    }

    #[test]
    fn test_unclosed_tag_is_malformed() {
        let err = parse_document(b"<REPONSE><PROGRAMME><NOM>x</NOM></REPONSE>").unwrap_err();
        assert!(!err.message.is_empty());

        let err = parse_document(b"<REPONSE><PROGRAMME>").unwrap_err();
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_structural_errors_are_malformed() {
        assert!(parse_document(b"").is_err());
        assert!(parse_document(b"   ").is_err());
        assert!(parse_document(b"just text").is_err());
        assert!(parse_document(b"</a>").is_err());
        assert!(parse_document(b"<a/><b/>").is_err());
        assert!(parse_document(b"<a>x &bogus y</a>").is_err());
        assert!(parse_document(b"<a id=1/>").is_err());
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "<x>".repeat(depth), "</x>".repeat(depth))
    }

    #[test]
    fn test_nesting_up_to_limit_is_accepted() {
        let root = parse_document(nested(MAX_DEPTH).as_bytes()).unwrap();
        assert_eq!(root.descendants().len(), MAX_DEPTH - 1);

        let with_empty_leaf = format!(
            "{}<y/>{}",
            "<x>".repeat(MAX_DEPTH - 1),
            "</x>".repeat(MAX_DEPTH - 1)
        );
        assert!(parse_document(with_empty_leaf.as_bytes()).is_ok());
    }

    #[test]
    fn test_excessive_nesting_is_malformed() {
        let err = parse_document(nested(MAX_DEPTH + 1).as_bytes()).unwrap_err();
        assert!(err.message.contains("nested deeper"));

        let err = parse_document(nested(50_000).as_bytes()).unwrap_err();
        assert!(err.position.is_some());
    }

    #[test]
    fn test_prolog_and_comments_are_ignored() {
        let xml = b"<?xml version=\"1.0\"?>\n<!-- feed -->\n<a><!-- inner -->x</a>\n";
        let root = parse_document(xml).unwrap();
        assert_eq!(root.text(), "x");
    }
}
