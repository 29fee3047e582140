//! Writing configuration trees as XML documents.

use crate::{Error, Result, XmlAttribute, XmlChildren, XmlElement, XmlOptions, to_xml_string};
use arbor_config::ConfigNode;

/// Serialize `node` as an XML document.
pub fn write_document(node: &ConfigNode, options: &XmlOptions) -> Result<String> {
    let element = to_element(node, options)?;
    tracing::debug!(root = %element.name, "Writing XML document");
    to_xml_string(&element, options)
}

/// Build the element tree for `node`.
///
/// Attributed nodes keep their tag and attributes; plain nodes use the
/// default tag of `options`. Map entries are tagged with their key, list
/// entries with their own tag. Scalars become text and virtual nodes empty
/// elements.
///
/// # Errors
///
/// Fails with [`Error::InvalidStructure`] when a tag, map key or attribute
/// name is not a valid XML name.
pub fn to_element(node: &ConfigNode, options: &XmlOptions) -> Result<XmlElement> {
    build_element(node, None, options)
}

fn build_element(
    node: &ConfigNode,
    forced_tag: Option<&str>,
    options: &XmlOptions,
) -> Result<XmlElement> {
    let (tag_name, attributes) = match node.element() {
        Some(element) => (
            element.tag_name().to_string(),
            element
                .attributes()
                .iter()
                .map(|(name, value)| XmlAttribute::new(name, value))
                .collect::<Vec<_>>(),
        ),
        None => (options.default_tag_name().to_string(), Vec::new()),
    };
    let name = forced_tag.map_or(tag_name, str::to_string);

    if !is_xml_name(&name) {
        return Err(Error::InvalidStructure {
            message: format!("`{}` at {} is not a valid element name", name, node.path()),
        });
    }
    if let Some(attribute) = attributes.iter().find(|a| !is_xml_name(&a.name)) {
        return Err(Error::InvalidStructure {
            message: format!(
                "`{}` at {} is not a valid attribute name",
                attribute.name,
                node.path()
            ),
        });
    }

    let children = if node.has_map_children() {
        XmlChildren::Elements(
            node.get_children_map()
                .iter()
                .map(|(key, child)| build_element(child, Some(key), options))
                .collect::<Result<_>>()?,
        )
    } else if node.has_list_children() {
        XmlChildren::Elements(
            node.get_children_list()
                .iter()
                .map(|child| build_element(child, None, options))
                .collect::<Result<_>>()?,
        )
    } else {
        match node.get_value() {
            Some(value) => XmlChildren::Text(value.to_string()),
            None => XmlChildren::Empty,
        }
    };

    Ok(XmlElement {
        name,
        attributes,
        children,
    })
}

/// Whether `name` can be written as an element or attribute name.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}
