//! Reading XML documents into attributed trees.

use crate::{Result, XmlElement, parse};
use arbor_config::{AttributedNode, ScalarValue};
use std::collections::HashSet;

/// Parse `text` and load its root element into `node`.
///
/// The node takes the root's tag name and attributes.
pub fn read_document(text: &str, node: &AttributedNode) -> Result<()> {
    let root = parse(text)?;
    tracing::debug!(root = %root.name, "Loading XML document");
    read_element(&root, node)
}

/// Load `element` into `node`.
///
/// When no tag repeats among the element's children they load as map
/// children keyed by tag. A single repeated tag switches every child to a
/// list entry, in document order. Leaf elements load their text through
/// [`parse_value`].
pub fn read_element(element: &XmlElement, node: &AttributedNode) -> Result<()> {
    node.set_tag_name(element.name.as_str())?;
    node.set_attributes(
        element
            .attributes
            .iter()
            .map(|attribute| (attribute.name.as_str(), attribute.value.as_str())),
    )?;

    let children = element.all_children();
    if children.is_empty() {
        node.set_value(parse_value(&element.text_content()))?;
        return Ok(());
    }

    let mut tags = HashSet::new();
    let as_map = children.iter().all(|child| tags.insert(child.name.as_str()));
    for child in children {
        let target = if as_map {
            node.child(child.name.as_str())
        } else {
            node.get_appended_node()
        };
        read_element(child, &target)?;
    }
    Ok(())
}

/// Interpret the text of a leaf element.
///
/// Exactly `true` and `false` are booleans. Integral numbers become `Int`
/// when they fit 32 bits and `Long` otherwise; other finite numbers become
/// `Double`. Everything else, including `NaN` and infinities, stays a
/// string.
pub fn parse_value(text: &str) -> ScalarValue {
    match text {
        "true" => return ScalarValue::Boolean(true),
        "false" => return ScalarValue::Boolean(false),
        _ => {}
    }

    let trimmed = text.trim();
    if let Ok(long) = trimmed.parse::<i64>() {
        return integral(long);
    }

    match trimmed.parse::<f64>() {
        Ok(double) if double.is_finite() => {
            if double.fract() == 0.0 && double >= i64::MIN as f64 && double < i64::MAX as f64 {
                integral(double as i64)
            } else {
                ScalarValue::Double(double)
            }
        }
        _ => ScalarValue::String(text.to_string()),
    }
}

fn integral(long: i64) -> ScalarValue {
    i32::try_from(long).map_or(ScalarValue::Long(long), ScalarValue::Int)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_config::ConfigOptions;

    fn root() -> AttributedNode {
        AttributedNode::root("root", ConfigOptions::default())
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("true"), ScalarValue::Boolean(true));
        assert_eq!(parse_value("false"), ScalarValue::Boolean(false));
        assert_eq!(parse_value("True"), ScalarValue::String("True".to_string()));
        assert_eq!(parse_value("42"), ScalarValue::Int(42));
        assert_eq!(parse_value("2.0"), ScalarValue::Int(2));
        assert_eq!(parse_value("1e3"), ScalarValue::Int(1000));
        assert_eq!(parse_value("3000000000"), ScalarValue::Long(3_000_000_000));
        assert_eq!(parse_value("2.5"), ScalarValue::Double(2.5));
        assert_eq!(parse_value("1e300"), ScalarValue::Double(1e300));
        assert_eq!(parse_value("NaN"), ScalarValue::String("NaN".to_string()));
        assert_eq!(parse_value("inf"), ScalarValue::String("inf".to_string()));
        assert_eq!(parse_value(""), ScalarValue::String(String::new()));
        assert_eq!(parse_value("Tove"), ScalarValue::String("Tove".to_string()));
    }

    #[test]
    fn test_unique_tags_load_as_map() {
        let node = root();
        read_document(
            r#"<note id="501"><to>Tove</to><from>Jani</from></note>"#,
            &node,
        )
        .unwrap();

        assert_eq!(node.tag_name(), "note");
        assert_eq!(node.attribute("id").as_deref(), Some("501"));
        assert!(node.has_map_children());
        assert_eq!(node.child("to").get_string().as_deref(), Some("Tove"));
        assert_eq!(node.child("from").tag_name(), "from");
    }

    #[test]
    fn test_repeated_tag_loads_everything_as_list() {
        let node = root();
        read_document(
            "<doc><heading>A</heading><body>x</body><heading>B</heading></doc>",
            &node,
        )
        .unwrap();

        assert!(node.has_list_children());
        let tags: Vec<String> = node
            .get_children_list()
            .iter()
            .map(AttributedNode::tag_name)
            .collect();
        assert_eq!(tags, ["heading", "body", "heading"]);
        assert_eq!(node.child(2).get_string().as_deref(), Some("B"));
    }

    #[test]
    fn test_leaf_values_are_typed() {
        let node = root();
        read_document(
            "<server><port>8080</port><debug>true</debug><ratio>0.5</ratio><empty/></server>",
            &node,
        )
        .unwrap();

        assert_eq!(node.child("port").get_value(), Some(ScalarValue::Int(8080)));
        assert_eq!(node.child("debug").get_value(), Some(ScalarValue::Boolean(true)));
        assert_eq!(node.child("ratio").get_value(), Some(ScalarValue::Double(0.5)));
        assert_eq!(node.child("empty").get_value(), Some(ScalarValue::String(String::new())));
    }

    #[test]
    fn test_attributes_on_leaf_and_nested_lists() {
        let node = root();
        read_document(
            r#"<messages><message lang="en">Hi</message><message lang="fr">Salut</message></messages>"#,
            &node,
        )
        .unwrap();

        let messages = node.get_children_list();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].attribute("lang").as_deref(), Some("fr"));
        assert_eq!(messages[1].get_string().as_deref(), Some("Salut"));
    }

    #[test]
    fn test_malformed_document() {
        assert!(read_document("<a><b></a>", &root()).is_err());
    }
}
