//! XML parser that builds [`XmlElement`] trees.

use crate::{Error, Result, XmlAttribute, XmlChild, XmlChildren, XmlElement};
use quick_xml::Reader;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

/// Parse XML from a string, returning the root element.
///
/// Comments, processing instructions, the XML declaration and DOCTYPE are
/// skipped. CDATA sections are read as text.
///
/// # Example
///
/// ```rust
/// use arbor_xml::parse;
///
/// let root = parse("<root><child/></root>").unwrap();
/// assert_eq!(root.name, "root");
/// ```
///
/// # Errors
///
/// Returns an error if the XML is malformed, empty, or has more than one
/// root element.
pub fn parse(content: &str) -> Result<XmlElement> {
    let mut parser = XmlParser::new(content);
    parser.parse()
}

/// Internal parser state.
struct XmlParser<'a> {
    /// The quick-xml reader.
    reader: Reader<&'a [u8]>,

    /// Stack of elements being built.
    stack: Vec<BuildNode>,
}

/// A node being constructed during parsing.
struct BuildNode {
    name: String,
    attributes: Vec<XmlAttribute>,

    /// Child elements and text accumulated so far.
    children: Vec<XmlChild>,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            reader,
            stack: Vec::new(),
        }
    }

    fn parse(&mut self) -> Result<XmlElement> {
        let mut root: Option<XmlElement> = None;

        loop {
            let event_start = self.reader.buffer_position();

            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    self.handle_start(&e, event_start)?;
                }
                Ok(Event::End(e)) => {
                    let element = self.handle_end(&e)?;
                    self.place(element, &mut root)?;
                }
                Ok(Event::Empty(e)) => {
                    let attributes = self.parse_attributes(&e, event_start)?;
                    let element = XmlElement::new(name_of(&e), attributes);
                    self.place(element, &mut root)?;
                }
                Ok(Event::Text(e)) => {
                    self.handle_text(&e, event_start)?;
                }
                Ok(Event::CData(e)) => {
                    self.handle_cdata(&e);
                }
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {
                    // Skip comments, processing instructions, declarations
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlSyntax {
                        message: e.to_string(),
                        position: Some(self.reader.error_position()),
                    });
                }
            }
        }

        // Check for unclosed elements
        if let Some(node) = self.stack.last() {
            return Err(Error::UnexpectedEof {
                expected: format!("closing tag </{}>", node.name),
            });
        }

        root.ok_or(Error::EmptyDocument)
    }

    /// Add a finished element to its parent, or make it the root.
    fn place(&mut self, element: XmlElement, root: &mut Option<XmlElement>) -> Result<()> {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.children.push(XmlChild::Element(element));
                Ok(())
            }
            None if root.is_some() => Err(Error::MultipleRoots),
            None => {
                *root = Some(element);
                Ok(())
            }
        }
    }

    fn handle_start(&mut self, e: &BytesStart<'_>, event_start: u64) -> Result<()> {
        let attributes = self.parse_attributes(e, event_start)?;
        self.stack.push(BuildNode {
            name: name_of(e),
            attributes,
            children: Vec::new(),
        });
        Ok(())
    }

    fn handle_end(&mut self, e: &BytesEnd<'_>) -> Result<XmlElement> {
        let end_name = String::from_utf8_lossy(e.name().as_ref()).to_string();

        let node = self.stack.pop().ok_or_else(|| Error::InvalidStructure {
            message: format!("Unexpected closing tag </{}>", end_name),
        })?;

        // Verify tag names match
        if node.name != end_name {
            return Err(Error::MismatchedEndTag {
                expected: node.name,
                found: end_name,
            });
        }

        Ok(XmlElement {
            name: node.name,
            attributes: node.attributes,
            children: finalize_children(node.children),
        })
    }

    fn handle_text(&mut self, e: &BytesText<'_>, event_start: u64) -> Result<()> {
        let text = e.unescape().map_err(|err| Error::XmlSyntax {
            message: format!("Invalid text content: {}", err),
            position: Some(event_start),
        })?;

        if let Some(node) = self.stack.last_mut() {
            node.children.push(XmlChild::Text(text.into_owned()));
        }
        Ok(())
    }

    fn handle_cdata(&mut self, e: &BytesCData<'_>) {
        let text = String::from_utf8_lossy(e.as_ref()).to_string();
        if let Some(node) = self.stack.last_mut() {
            node.children.push(XmlChild::Text(text));
        }
    }

    fn parse_attributes(&self, e: &BytesStart<'_>, tag_start: u64) -> Result<Vec<XmlAttribute>> {
        let mut attributes = Vec::new();

        for attr_result in e.attributes() {
            let attr = attr_result?;
            let name = String::from_utf8_lossy(attr.key.as_ref()).to_string();

            let value = attr.unescape_value().map_err(|err| Error::XmlSyntax {
                message: format!("Invalid attribute value: {}", err),
                position: Some(tag_start),
            })?;

            attributes.push(XmlAttribute {
                name,
                value: value.into_owned(),
            });
        }

        Ok(attributes)
    }
}

fn name_of(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

/// Collapse accumulated children. Whitespace between elements is
/// formatting and is dropped; adjacent text pieces (text and CDATA) merge.
fn finalize_children(children: Vec<XmlChild>) -> XmlChildren {
    let has_elements = children.iter().any(|c| matches!(c, XmlChild::Element(_)));

    let mut merged: Vec<XmlChild> = Vec::with_capacity(children.len());
    for child in children {
        match child {
            XmlChild::Text(text) if has_elements && text.trim().is_empty() => {}
            XmlChild::Text(text) => match merged.last_mut() {
                Some(XmlChild::Text(previous)) => previous.push_str(&text),
                _ => merged.push(XmlChild::Text(text)),
            },
            element => merged.push(element),
        }
    }

    if merged.is_empty() {
        return XmlChildren::Empty;
    }

    if merged.iter().all(|c| matches!(c, XmlChild::Element(_))) {
        let elements = merged
            .into_iter()
            .filter_map(|c| match c {
                XmlChild::Element(e) => Some(e),
                XmlChild::Text(_) => None,
            })
            .collect();
        return XmlChildren::Elements(elements);
    }

    match <[XmlChild; 1]>::try_from(merged) {
        Ok([XmlChild::Text(content)]) => XmlChildren::Text(content),
        Ok(single) => XmlChildren::Mixed(single.into()),
        Err(mixed) => XmlChildren::Mixed(mixed),
    }
}
