//! Serializing [`XmlElement`] trees.

use crate::{Result, XmlChild, XmlChildren, XmlElement, XmlOptions};
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use std::io::Write;

/// Write `element` as a complete document to `out`, ending with a newline.
///
/// # Errors
///
/// Fails only when `out` does.
pub fn write_xml<W: Write>(element: &XmlElement, out: W, options: &XmlOptions) -> Result<()> {
    let mut writer = if options.indent() > 0 {
        Writer::new_with_indent(out, b' ', options.indent())
    } else {
        Writer::new(out)
    };

    if options.write_declaration() {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }
    write_element(&mut writer, element)?;
    writer.get_mut().write_all(b"\n")?;
    Ok(())
}

/// Write `element` to a string.
pub fn to_xml_string(element: &XmlElement, options: &XmlOptions) -> Result<String> {
    let mut buffer = Vec::new();
    write_xml(element, &mut buffer, options)?;
    // Every piece written came from a `String`
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for attribute in &element.attributes {
        start.push_attribute((attribute.name.as_str(), attribute.value.as_str()));
    }

    match &element.children {
        XmlChildren::Empty => {
            writer.write_event(Event::Empty(start))?;
        }
        XmlChildren::Text(text) if text.is_empty() => {
            writer.write_event(Event::Empty(start))?;
        }
        XmlChildren::Elements(elements) if elements.is_empty() => {
            writer.write_event(Event::Empty(start))?;
        }
        XmlChildren::Text(text) => {
            writer.write_event(Event::Start(start.borrow()))?;
            write_text(writer, text)?;
            writer.write_event(Event::End(start.to_end()))?;
        }
        XmlChildren::Elements(elements) => {
            writer.write_event(Event::Start(start.borrow()))?;
            for child in elements {
                write_element(writer, child)?;
            }
            writer.write_event(Event::End(start.to_end()))?;
        }
        XmlChildren::Mixed(children) => {
            writer.write_event(Event::Start(start.borrow()))?;
            for child in children {
                match child {
                    XmlChild::Element(child) => write_element(writer, child)?,
                    XmlChild::Text(text) => write_text(writer, text)?,
                }
            }
            writer.write_event(Event::End(start.to_end()))?;
        }
    }
    Ok(())
}

fn write_text<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<()> {
    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XmlAttribute;

    fn note() -> XmlElement {
        XmlElement::with_elements(
            "note",
            vec![XmlAttribute::new("id", "501")],
            vec![
                XmlElement::with_text("to", vec![], "Tove"),
                XmlElement::with_text("from", vec![], "Jani"),
            ],
        )
    }

    #[test]
    fn test_write_indented() {
        let text = to_xml_string(&note(), &XmlOptions::default()).unwrap();
        insta::assert_snapshot!(text.trim_end(), @r#"
        <note id="501">
          <to>Tove</to>
          <from>Jani</from>
        </note>
        "#);
    }

    #[test]
    fn test_write_compact() {
        let text = to_xml_string(&note(), &XmlOptions::new().with_indent(0)).unwrap();
        assert_eq!(text, "<note id=\"501\"><to>Tove</to><from>Jani</from></note>\n");
    }

    #[test]
    fn test_escaping() {
        let element = XmlElement::with_text(
            "expr",
            vec![XmlAttribute::new("op", "a<b")],
            "1 < 2 & \"quoted\"",
        );
        let text = to_xml_string(&element, &XmlOptions::default()).unwrap();
        assert_eq!(text, "<expr op=\"a&lt;b\">1 &lt; 2 &amp; \"quoted\"</expr>\n");
    }

    #[test]
    fn test_empty_elements() {
        let element = XmlElement::with_elements(
            "list",
            vec![],
            vec![
                XmlElement::new("a", vec![]),
                XmlElement::with_text("b", vec![], ""),
            ],
        );
        let text = to_xml_string(&element, &XmlOptions::new().with_indent(0)).unwrap();
        assert_eq!(text, "<list><a/><b/></list>\n");
    }

    #[test]
    fn test_declaration() {
        let text = to_xml_string(&note(), &XmlOptions::new().with_declaration(true)).unwrap();
        assert!(
            text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"),
            "{text}"
        );
        assert!(text.contains("<to>Tove</to>"), "{text}");
    }
}
