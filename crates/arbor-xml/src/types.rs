//! Core types for the XML element tree.

/// An XML element.
///
/// Element and attribute names keep their namespace prefix (`csl:text`);
/// [`XmlElement::local_name`] and [`XmlElement::prefix`] split it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// The qualified name of the element.
    pub name: String,

    /// Attributes of this element, in document order.
    pub attributes: Vec<XmlAttribute>,

    /// Child content of this element.
    pub children: XmlChildren,
}

/// An XML attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// The qualified name of the attribute.
    pub name: String,

    /// The attribute value (after unescaping XML entities).
    pub value: String,
}

/// Children of an XML element.
///
/// XML elements can contain:
/// - Only child elements
/// - Only text content
/// - Mixed content (text and elements interleaved)
/// - Nothing (empty element)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlChildren {
    /// Element contains only child elements.
    Elements(Vec<XmlElement>),

    /// Element contains only text content (after unescaping XML entities).
    Text(String),

    /// Element contains mixed content (text and elements).
    Mixed(Vec<XmlChild>),

    /// Element is empty (no content).
    Empty,
}

/// A single child in mixed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlChild {
    /// A child element.
    Element(XmlElement),

    /// Text content.
    Text(String),
}

impl XmlElement {
    /// Create a new empty element.
    pub fn new(name: impl Into<String>, attributes: Vec<XmlAttribute>) -> Self {
        Self {
            name: name.into(),
            attributes,
            children: XmlChildren::Empty,
        }
    }

    /// Create an element with child elements.
    pub fn with_elements(
        name: impl Into<String>,
        attributes: Vec<XmlAttribute>,
        children: Vec<XmlElement>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            children: XmlChildren::Elements(children),
        }
    }

    /// Create an element with text content.
    pub fn with_text(
        name: impl Into<String>,
        attributes: Vec<XmlAttribute>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            children: XmlChildren::Text(text.into()),
        }
    }

    /// The name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// The namespace prefix, if any (e.g., "csl" in `<csl:text>`).
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Get an attribute value by name.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Check if this element has child elements.
    pub fn has_elements(&self) -> bool {
        match &self.children {
            XmlChildren::Elements(e) => !e.is_empty(),
            XmlChildren::Mixed(children) => {
                children.iter().any(|c| matches!(c, XmlChild::Element(_)))
            }
            _ => false,
        }
    }

    /// Check if this element has text content.
    pub fn has_text(&self) -> bool {
        matches!(&self.children, XmlChildren::Text(_))
    }

    /// Check if this element is empty.
    pub fn is_empty(&self) -> bool {
        matches!(&self.children, XmlChildren::Empty)
    }

    /// Get child elements, if this element contains only elements.
    pub fn elements(&self) -> Option<&[XmlElement]> {
        match &self.children {
            XmlChildren::Elements(elements) => Some(elements),
            _ => None,
        }
    }

    /// Get text content, if this element contains only text.
    pub fn text(&self) -> Option<&str> {
        match &self.children {
            XmlChildren::Text(content) => Some(content),
            _ => None,
        }
    }

    /// All text of this element and its descendants, concatenated.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.children {
            XmlChildren::Text(content) => out.push_str(content),
            XmlChildren::Elements(elements) => {
                elements.iter().for_each(|e| e.collect_text(out));
            }
            XmlChildren::Mixed(children) => {
                for child in children {
                    match child {
                        XmlChild::Element(e) => e.collect_text(out),
                        XmlChild::Text(text) => out.push_str(text),
                    }
                }
            }
            XmlChildren::Empty => {}
        }
    }

    /// Get child elements by name.
    pub fn get_children(&self, name: &str) -> Vec<&XmlElement> {
        self.all_children()
            .into_iter()
            .filter(|e| e.name == name)
            .collect()
    }

    /// Get all child elements (ignoring text in mixed content).
    pub fn all_children(&self) -> Vec<&XmlElement> {
        match &self.children {
            XmlChildren::Elements(elements) => elements.iter().collect(),
            XmlChildren::Mixed(children) => children
                .iter()
                .filter_map(|c| match c {
                    XmlChild::Element(e) => Some(e),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        }
    }
}

impl XmlAttribute {
    /// Create a new attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_get_attribute() {
        let element = XmlElement::new("test", vec![XmlAttribute::new("name", "value")]);

        assert_eq!(element.get_attribute("name"), Some("value"));
        assert_eq!(element.get_attribute("missing"), None);
    }

    #[test]
    fn test_element_children() {
        let parent = XmlElement::with_elements("parent", vec![], vec![XmlElement::new("child", vec![])]);

        assert!(parent.has_elements());
        assert!(!parent.has_text());
        assert_eq!(parent.elements().unwrap().len(), 1);
        assert_eq!(parent.get_children("child").len(), 1);
    }

    #[test]
    fn test_element_text() {
        let element = XmlElement::with_text("text", vec![], "Hello, world!");

        assert!(element.has_text());
        assert!(!element.has_elements());
        assert_eq!(element.text(), Some("Hello, world!"));
    }

    #[test]
    fn test_prefixed_name() {
        let element = XmlElement::new("csl:style", vec![]);
        assert_eq!(element.local_name(), "style");
        assert_eq!(element.prefix(), Some("csl"));
        assert_eq!(XmlElement::new("style", vec![]).prefix(), None);
    }

    #[test]
    fn test_text_content_of_mixed() {
        let element = XmlElement {
            name: "p".to_string(),
            attributes: vec![],
            children: XmlChildren::Mixed(vec![
                XmlChild::Text("Hello, ".to_string()),
                XmlChild::Element(XmlElement::with_text("b", vec![], "world")),
            ]),
        };
        assert_eq!(element.text_content(), "Hello, world");
    }
}
