//! Nodes that carry a tag name and attributes, for element-based formats.

use crate::error::ConfigError;
use crate::node::ConfigNode;
use crate::options::ConfigOptions;
use crate::path::NodeKey;
use indexmap::IndexMap;
use std::ops::Deref;
use std::rc::Rc;

/// Tag name and attributes of an attributed node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    tag_name: String,
    attributes: IndexMap<String, String>,
}

impl ElementInfo {
    pub(crate) fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: IndexMap::new(),
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Add the attributes of `other` that this element does not have yet.
    pub(crate) fn fill_attributes_from(&mut self, other: &ElementInfo) {
        for (name, value) in &other.attributes {
            if !self.attributes.contains_key(name) {
                self.attributes.insert(name.clone(), value.clone());
            }
        }
    }

    pub(crate) fn set_tag_name(&mut self, tag_name: String) {
        self.tag_name = tag_name;
    }
}

/// A [`ConfigNode`] with a tag name and a set of attributes.
///
/// All nodes of an attributed tree are attributed; new children start with
/// the tree's default tag name and no attributes. Everything a plain node
/// can do is reachable through `Deref`.
#[derive(Clone, PartialEq)]
pub struct AttributedNode(ConfigNode);

impl AttributedNode {
    /// Create an empty root element. An empty `tag_name` falls back to the
    /// default tag name of `options`.
    pub fn root(tag_name: &str, options: ConfigOptions) -> Self {
        let tag_name = if tag_name.is_empty() {
            options.default_tag_name().to_string()
        } else {
            tag_name.to_string()
        };
        AttributedNode(ConfigNode::new_root(
            Rc::new(options),
            Some(ElementInfo::new(tag_name)),
        ))
    }

    /// View a node as attributed, if it belongs to an attributed tree.
    pub fn from_node(node: ConfigNode) -> Option<Self> {
        node.is_attributed().then_some(AttributedNode(node))
    }

    pub fn as_node(&self) -> &ConfigNode {
        &self.0
    }

    pub fn into_node(self) -> ConfigNode {
        self.0
    }

    // ==================== Tag & attributes ====================

    pub fn tag_name(&self) -> String {
        self.0
            .with_element(|element| element.tag_name().to_string())
            .unwrap_or_default()
    }

    pub fn set_tag_name(&self, tag_name: impl Into<String>) -> Result<(), ConfigError> {
        let tag_name = tag_name.into();
        if tag_name.is_empty() {
            return Err(ConfigError::EmptyTagName);
        }
        self.0.with_element_mut(|element| element.set_tag_name(tag_name));
        Ok(())
    }

    /// Set an attribute, replacing any previous value.
    pub fn add_attribute(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::EmptyAttributeName);
        }
        let value = value.into();
        self.0.with_element_mut(|element| {
            element.attributes.insert(name, value);
        });
        Ok(())
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        self.0
            .with_element_mut(|element| element.attributes.shift_remove(name))
            .flatten()
    }

    /// Replace all attributes at once. Nothing changes if any name is empty.
    pub fn set_attributes<I, K, V>(&self, attributes: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let attributes: IndexMap<String, String> = attributes
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        if attributes.keys().any(String::is_empty) {
            return Err(ConfigError::EmptyAttributeName);
        }
        self.0
            .with_element_mut(|element| element.attributes = attributes);
        Ok(())
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0
            .with_element(|element| element.attributes.get(name).cloned())
            .flatten()
    }

    pub fn attributes(&self) -> IndexMap<String, String> {
        self.0
            .with_element(|element| element.attributes.clone())
            .unwrap_or_default()
    }

    pub fn has_attributes(&self) -> bool {
        self.0
            .with_element(|element| !element.attributes.is_empty())
            .unwrap_or(false)
    }

    // ==================== Navigation ====================

    pub fn child(&self, key: impl Into<NodeKey>) -> AttributedNode {
        AttributedNode(self.0.child(key))
    }

    pub fn get_node<I>(&self, path: I) -> AttributedNode
    where
        I: IntoIterator,
        I::Item: Into<NodeKey>,
    {
        AttributedNode(self.0.get_node(path))
    }

    pub fn get_appended_node(&self) -> AttributedNode {
        AttributedNode(self.0.get_appended_node())
    }

    pub fn get_children_list(&self) -> Vec<AttributedNode> {
        self.0
            .get_children_list()
            .into_iter()
            .map(AttributedNode)
            .collect()
    }

    pub fn get_children_map(&self) -> IndexMap<String, AttributedNode> {
        self.0
            .get_children_map()
            .into_iter()
            .map(|(key, node)| (key, AttributedNode(node)))
            .collect()
    }

    pub fn parent(&self) -> Option<AttributedNode> {
        self.0.parent().map(AttributedNode)
    }

    /// Deep copy into a new attributed root.
    pub fn copy(&self) -> AttributedNode {
        AttributedNode(self.0.copy())
    }
}

impl Deref for AttributedNode {
    type Target = ConfigNode;

    fn deref(&self) -> &ConfigNode {
        &self.0
    }
}

impl AsRef<ConfigNode> for AttributedNode {
    fn as_ref(&self) -> &ConfigNode {
        &self.0
    }
}

impl std::fmt::Debug for AttributedNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn element(tag: &str) -> AttributedNode {
        AttributedNode::root(tag, ConfigOptions::default())
    }

    #[test]
    fn test_root_tag_name() {
        assert_eq!(element("note").tag_name(), "note");
        assert_eq!(element("").tag_name(), "element");

        let custom = AttributedNode::root("", ConfigOptions::new().with_default_tag_name("item"));
        assert_eq!(custom.tag_name(), "item");
    }

    #[test]
    fn test_children_are_attributed() {
        let root = element("root");
        let child = root.child("name");
        assert!(child.is_attributed());
        assert_eq!(child.tag_name(), "element");
        assert!(AttributedNode::from_node(child.into_node()).is_some());
        assert!(AttributedNode::from_node(ConfigNode::default()).is_none());
    }

    #[test]
    fn test_attributes() {
        let node = element("note");
        node.add_attribute("lang", "en").unwrap();
        node.add_attribute("id", "1").unwrap();
        assert!(node.has_attributes());
        assert_eq!(node.attribute("lang").as_deref(), Some("en"));

        assert_eq!(node.remove_attribute("lang").as_deref(), Some("en"));
        assert_eq!(node.remove_attribute("lang"), None);
        assert_eq!(node.attributes().len(), 1);

        assert_eq!(
            node.add_attribute("", "x"),
            Err(ConfigError::EmptyAttributeName)
        );
        assert_eq!(
            node.set_attributes([("a", "1"), ("", "2")]),
            Err(ConfigError::EmptyAttributeName)
        );
        assert_eq!(node.attribute("id").as_deref(), Some("1"));

        node.set_attributes([("a", "1"), ("b", "2")]).unwrap();
        let names: Vec<_> = node.attributes().keys().cloned().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_tag_name_rejected() {
        let node = element("note");
        assert_eq!(node.set_tag_name(""), Err(ConfigError::EmptyTagName));
        node.set_tag_name("memo").unwrap();
        assert_eq!(node.tag_name(), "memo");
    }

    #[test]
    fn test_element_survives_value_changes() {
        let node = element("note");
        node.add_attribute("id", "7").unwrap();
        node.set_value("hello").unwrap();
        node.set_value(Value::map([("to", "Tove")])).unwrap();
        assert_eq!(node.attribute("id").as_deref(), Some("7"));
        assert_eq!(node.child("to").tag_name(), "element");
    }

    #[test]
    fn test_set_node_copies_element() {
        let source = element("note");
        source.add_attribute("id", "1").unwrap();
        source.child("to").set_value("Tove").unwrap();
        source.child("to").set_tag_name("recipient").unwrap();

        let target = element("root");
        let slot = target.child("copy");
        slot.set_node(&source).unwrap();

        assert_eq!(slot.tag_name(), "note");
        assert_eq!(slot.attribute("id").as_deref(), Some("1"));
        assert_eq!(slot.child("to").tag_name(), "recipient");
    }

    #[test]
    fn test_plain_copy_strips_elements() {
        let source = element("note");
        source.child("to").set_value("Tove").unwrap();

        let plain = ConfigNode::default();
        plain.child("copy").set_node(&source).unwrap();
        assert!(!plain.get_node(["copy", "to"]).is_attributed());
        assert!(plain.child("copy").element().is_none());
    }
}
