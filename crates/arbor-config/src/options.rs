//! Options shared by every node of a tree.

use crate::value::{ScalarValue, ValueType};
use std::collections::BTreeSet;

/// Tag name given to attributed nodes that were never assigned one.
pub const DEFAULT_TAG_NAME: &str = "element";

/// How map children are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapOrdering {
    /// Keys keep the order in which they were first inserted.
    #[default]
    Insertion,

    /// Keys are kept in lexicographic order.
    Sorted,
}

/// Immutable options shared (by reference) by all nodes of one tree.
///
/// Format adapters narrow the accepted type set to what their native
/// writer can represent; `set_value` checks every scalar against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOptions {
    accepted_types: Option<BTreeSet<ValueType>>,
    map_ordering: MapOrdering,
    default_tag_name: String,
    prune_empty_containers: bool,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            accepted_types: None,
            map_ordering: MapOrdering::default(),
            default_tag_name: DEFAULT_TAG_NAME.to_string(),
            prune_empty_containers: false,
        }
    }
}

impl ConfigOptions {
    /// Options that accept every value type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the tree to the given value types.
    pub fn with_accepted_types(mut self, types: impl IntoIterator<Item = ValueType>) -> Self {
        self.accepted_types = Some(types.into_iter().collect());
        self
    }

    /// Restrict the tree to the given value types, keeping any narrower
    /// restriction already in place.
    pub fn narrowed_to(mut self, types: impl IntoIterator<Item = ValueType>) -> Self {
        let types: BTreeSet<ValueType> = types.into_iter().collect();
        self.accepted_types = Some(match self.accepted_types.take() {
            None => types,
            Some(current) => current.intersection(&types).copied().collect(),
        });
        self
    }

    /// Lift any accepted type restriction.
    pub fn accepting_all_types(mut self) -> Self {
        self.accepted_types = None;
        self
    }

    pub fn with_map_ordering(mut self, ordering: MapOrdering) -> Self {
        self.map_ordering = ordering;
        self
    }

    pub fn with_default_tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.default_tag_name = tag_name.into();
        self
    }

    /// When set, removing the last child of a list or map reverts the
    /// container to a virtual node and detaches it from its own parent.
    pub fn with_prune_empty_containers(mut self, prune: bool) -> Self {
        self.prune_empty_containers = prune;
        self
    }

    /// The accepted type set, or `None` when every type is accepted.
    pub fn accepted_types(&self) -> Option<&BTreeSet<ValueType>> {
        self.accepted_types.as_ref()
    }

    pub fn map_ordering(&self) -> MapOrdering {
        self.map_ordering
    }

    pub fn default_tag_name(&self) -> &str {
        &self.default_tag_name
    }

    pub fn prune_empty_containers(&self) -> bool {
        self.prune_empty_containers
    }

    /// Check whether values of `value_type` may be stored.
    ///
    /// A `Number` entry admits every numeric type.
    pub fn accepts(&self, value_type: ValueType) -> bool {
        match &self.accepted_types {
            None => true,
            Some(types) => {
                types.contains(&value_type)
                    || (value_type.is_numeric() && types.contains(&ValueType::Number))
            }
        }
    }

    /// Check whether `value` may be stored.
    pub fn accepts_scalar(&self, value: &ScalarValue) -> bool {
        self.accepts(value.value_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accepts_everything() {
        let options = ConfigOptions::default();
        assert!(options.accepts(ValueType::Instant));
        assert!(options.accepts(ValueType::Map));
        assert!(options.accepted_types().is_none());
        assert_eq!(options.default_tag_name(), "element");
    }

    #[test]
    fn test_restricted_types() {
        let options =
            ConfigOptions::new().with_accepted_types([ValueType::String, ValueType::Boolean]);
        assert!(options.accepts(ValueType::String));
        assert!(!options.accepts(ValueType::Int));
        assert!(!options.accepts_scalar(&ScalarValue::Double(1.0)));
    }

    #[test]
    fn test_narrowing_intersects() {
        let options = ConfigOptions::new().narrowed_to([ValueType::String, ValueType::Int]);
        assert!(options.accepts(ValueType::Int));

        let options = options.narrowed_to([ValueType::String, ValueType::Boolean]);
        assert!(options.accepts(ValueType::String));
        assert!(!options.accepts(ValueType::Int));
        assert!(!options.accepts(ValueType::Boolean));
    }

    #[test]
    fn test_number_admits_all_numerics() {
        let options = ConfigOptions::new().with_accepted_types([ValueType::Number]);
        assert!(options.accepts(ValueType::Float));
        assert!(options.accepts(ValueType::Long));
        assert!(!options.accepts(ValueType::String));
        assert!(!options.accepts(ValueType::List));
    }
}
