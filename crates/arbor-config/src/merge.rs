//! Fill-in merging of configuration trees.
//!
//! Merging copies values from a source tree into places where the target
//! has none. Values already present in the target always win; lists are
//! extended rather than replaced.
//!
//! # Example
//!
//! ```rust
//! use arbor_config::{ConfigNode, Value};
//!
//! let target = ConfigNode::default();
//! target.set_value(Value::map([("a", 1)])).unwrap();
//!
//! let defaults = ConfigNode::default();
//! defaults.set_value(Value::map([("a", 2), ("b", 3)])).unwrap();
//!
//! target.merge_values_from(&defaults).unwrap();
//! assert_eq!(target.child("a").get_int(), Some(1));
//! assert_eq!(target.child("b").get_int(), Some(3));
//! ```

use crate::error::ConfigError;
use crate::node::{ConfigNode, NodeValue};
use crate::value::Value;

impl ConfigNode {
    /// Merge the values of `other` into this node.
    ///
    /// - Scalars are only written where this node is virtual.
    /// - Map entries merge recursively, key by key.
    /// - List items are appended to this node's list.
    /// - Attributed nodes gain the source's missing attributes, and take its
    ///   tag name only if this node had no value.
    ///
    /// A map merging into a list (or the other way around) and a container
    /// merging into a scalar are skipped. Merging a node into itself does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if a copied value is not accepted by this tree's
    /// options.
    pub fn merge_values_from(&self, other: &ConfigNode) -> Result<(), ConfigError> {
        if self.ptr_eq(other) {
            return Ok(());
        }
        // Work from a snapshot so merging an ancestor into a descendant
        // terminates.
        merge_into(self, &other.copy())
    }
}

/// Merge `layers` into a new root, ordered from lowest to highest priority.
pub fn merge_layers<'a, I>(layers: I) -> Result<ConfigNode, ConfigError>
where
    I: IntoIterator<Item = &'a ConfigNode>,
    I::IntoIter: DoubleEndedIterator,
{
    let mut layers = layers.into_iter().rev();
    let Some(top) = layers.next() else {
        return Ok(ConfigNode::default());
    };
    let merged = top.copy();
    for layer in layers {
        merged.merge_values_from(layer)?;
    }
    Ok(merged)
}

fn merge_into(target: &ConfigNode, source: &ConfigNode) -> Result<(), ConfigError> {
    let target_was_virtual = target.is_virtual();
    let value = source.snapshot();

    let mismatched = match &value {
        NodeValue::Virtual => return Ok(()),
        NodeValue::Scalar(_) => target.has_list_children() || target.has_map_children(),
        NodeValue::Map(_) => target.has_list_children() || target.get_value().is_some(),
        NodeValue::List(_) => target.has_map_children() || target.get_value().is_some(),
    };
    if mismatched {
        tracing::trace!(path = %target.path(), "Skipping merge into node of another shape");
        return Ok(());
    }

    if let Some(element) = source.element() {
        target.with_element_mut(|target_element| {
            target_element.fill_attributes_from(&element);
            if target_was_virtual {
                target_element.set_tag_name(element.tag_name().to_string());
            }
        });
    }

    match value {
        NodeValue::Virtual => Ok(()),
        NodeValue::Scalar(scalar) => {
            if target_was_virtual {
                target.set_value(scalar)?;
            }
            Ok(())
        }
        NodeValue::Map(entries) => {
            if entries.is_empty() {
                if target_was_virtual {
                    target.set_value(Value::Map(Default::default()))?;
                }
                return Ok(());
            }
            for (key, child) in &entries {
                merge_into(&target.child(key), child)?;
            }
            Ok(())
        }
        NodeValue::List(items) => {
            if items.is_empty() {
                if target_was_virtual {
                    target.set_value(Value::List(Vec::new()))?;
                }
                return Ok(());
            }
            for item in &items {
                target.get_appended_node().set_node(item)?;
            }
            Ok(())
        }
    }
}
