//! The configuration node tree.
//!
//! A [`ConfigNode`] is a cheap, clonable handle to one node of a tree. Nodes
//! own their children; a child refers back to its parent through a weak
//! pointer that is only used to compute paths and to attach the child on
//! first write.
//!
//! # Virtual nodes
//!
//! Navigating to a path that does not exist yet returns a *virtual* node.
//! It is not part of its parent's children until something is written to
//! it (or to one of its descendants), at which point it attaches itself and
//! every unattached ancestor on its path.
//!
//! ```rust
//! use arbor_config::{ConfigNode, ConfigOptions};
//!
//! let root = ConfigNode::root(ConfigOptions::default());
//! let theme = root.get_node(["format", "html", "theme"]);
//! assert!(theme.is_virtual());
//! assert!(!root.has_map_children());
//!
//! theme.set_value("cosmo").unwrap();
//! assert!(root.has_map_children());
//! assert_eq!(root.get_node(["format", "html", "theme"]).get_string().as_deref(), Some("cosmo"));
//! ```

use crate::attributed::ElementInfo;
use crate::coerce;
use crate::error::{ConfigError, ContainerShape};
use crate::options::{ConfigOptions, MapOrdering};
use crate::path::{NodeKey, NodePath};
use crate::value::{ScalarValue, Value, ValueType};
use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Where a node sits relative to its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Position {
    Root,
    Child(NodeKey),
    /// Not attached yet; attaching appends to the parent's list.
    Appended,
}

/// The payload of a node.
#[derive(Clone)]
pub(crate) enum NodeValue {
    Virtual,
    Scalar(ScalarValue),
    List(Vec<ConfigNode>),
    Map(IndexMap<String, ConfigNode>),
}

impl NodeValue {
    fn children(&self) -> Vec<ConfigNode> {
        match self {
            NodeValue::List(items) => items.clone(),
            NodeValue::Map(entries) => entries.values().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

pub(crate) struct NodeData {
    pub(crate) position: Position,
    parent: Weak<RefCell<NodeData>>,
    attached: bool,
    pub(crate) value: NodeValue,
    pub(crate) element: Option<ElementInfo>,
    options: Rc<ConfigOptions>,
}

/// A handle to a node in a configuration tree.
///
/// Cloning the handle does not copy the node; use [`ConfigNode::copy`] for
/// a deep copy. Equality (`==`) compares structure and values, while
/// [`ConfigNode::ptr_eq`] compares identity.
#[derive(Clone)]
pub struct ConfigNode {
    pub(crate) inner: Rc<RefCell<NodeData>>,
}

impl Default for ConfigNode {
    fn default() -> Self {
        Self::root(ConfigOptions::default())
    }
}

impl ConfigNode {
    /// Create an empty root node.
    pub fn root(options: ConfigOptions) -> Self {
        Self::new_root(Rc::new(options), None)
    }

    pub(crate) fn new_root(options: Rc<ConfigOptions>, element: Option<ElementInfo>) -> Self {
        Self::from_data(NodeData {
            position: Position::Root,
            parent: Weak::new(),
            attached: true,
            value: NodeValue::Virtual,
            element,
            options,
        })
    }

    fn from_data(data: NodeData) -> Self {
        ConfigNode {
            inner: Rc::new(RefCell::new(data)),
        }
    }

    /// Create an unattached child of this node. Children of attributed nodes
    /// are attributed too.
    fn new_child(&self, position: Position) -> Self {
        let data = self.inner.borrow();
        let element = data
            .element
            .as_ref()
            .map(|_| ElementInfo::new(data.options.default_tag_name()));
        Self::from_data(NodeData {
            position,
            parent: Rc::downgrade(&self.inner),
            attached: false,
            value: NodeValue::Virtual,
            element,
            options: Rc::clone(&data.options),
        })
    }

    // ==================== Identity & location ====================

    /// Check whether two handles refer to the same node.
    pub fn ptr_eq(&self, other: &ConfigNode) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn options(&self) -> Rc<ConfigOptions> {
        Rc::clone(&self.inner.borrow().options)
    }

    /// The key used to reach this node from its parent.
    ///
    /// `None` for roots and for appended nodes that are not attached yet.
    pub fn key(&self) -> Option<NodeKey> {
        match &self.inner.borrow().position {
            Position::Child(key) => Some(key.clone()),
            Position::Root | Position::Appended => None,
        }
    }

    /// The parent node, if it is still alive.
    pub fn parent(&self) -> Option<ConfigNode> {
        self.inner
            .borrow()
            .parent
            .upgrade()
            .map(|inner| ConfigNode { inner })
    }

    /// The path from the root to this node.
    pub fn path(&self) -> NodePath {
        let mut segments = Vec::new();
        let mut current = Some(self.clone());
        while let Some(node) = current {
            let data = node.inner.borrow();
            match &data.position {
                Position::Root => {}
                Position::Child(key) => segments.push(key.clone()),
                Position::Appended => {
                    // Appended nodes report the index they would attach at.
                    let index = data
                        .parent
                        .upgrade()
                        .map_or(0, |parent| match &parent.borrow().value {
                            NodeValue::List(items) => items.len(),
                            _ => 0,
                        });
                    segments.push(NodeKey::Index(index));
                }
            }
            current = data.parent.upgrade().map(|inner| ConfigNode { inner });
        }
        segments.reverse();
        NodePath::new(segments)
    }

    // ==================== Variant predicates ====================

    /// A node is virtual while it holds neither a value nor children.
    pub fn is_virtual(&self) -> bool {
        matches!(self.inner.borrow().value, NodeValue::Virtual)
    }

    pub fn has_list_children(&self) -> bool {
        matches!(self.inner.borrow().value, NodeValue::List(_))
    }

    pub fn has_map_children(&self) -> bool {
        matches!(self.inner.borrow().value, NodeValue::Map(_))
    }

    /// Whether this node is part of its parent's children (roots always are).
    pub fn is_attached(&self) -> bool {
        self.inner.borrow().attached
    }

    // ==================== Reading ====================

    /// The scalar held by this node, or `None` for virtual and container
    /// nodes.
    pub fn get_value(&self) -> Option<ScalarValue> {
        match &self.inner.borrow().value {
            NodeValue::Scalar(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn get_value_or(&self, default: impl Into<ScalarValue>) -> ScalarValue {
        self.get_value().unwrap_or_else(|| default.into())
    }

    /// Snapshot of the list children; empty unless this node holds a list.
    pub fn get_children_list(&self) -> Vec<ConfigNode> {
        match &self.inner.borrow().value {
            NodeValue::List(items) => items.clone(),
            _ => Vec::new(),
        }
    }

    /// Snapshot of the map children; empty unless this node holds a map.
    pub fn get_children_map(&self) -> IndexMap<String, ConfigNode> {
        match &self.inner.borrow().value {
            NodeValue::Map(entries) => entries.clone(),
            _ => IndexMap::new(),
        }
    }

    /// Convert the subtree into a detached [`Value`].
    pub fn to_value(&self) -> Value {
        match &self.inner.borrow().value {
            NodeValue::Virtual => Value::Null,
            NodeValue::Scalar(value) => Value::Scalar(value.clone()),
            NodeValue::List(items) => Value::List(items.iter().map(ConfigNode::to_value).collect()),
            NodeValue::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_value()))
                    .collect(),
            ),
        }
    }

    fn coerced<T>(&self, convert: impl FnOnce(&ScalarValue) -> Option<T>) -> Option<T> {
        match &self.inner.borrow().value {
            NodeValue::Scalar(value) => convert(value),
            _ => None,
        }
    }

    pub fn get_string(&self) -> Option<String> {
        self.coerced(coerce::as_string)
    }

    pub fn get_string_or(&self, default: &str) -> String {
        self.get_string().unwrap_or_else(|| default.to_string())
    }

    pub fn get_int(&self) -> Option<i32> {
        self.coerced(coerce::as_int)
    }

    pub fn get_int_or(&self, default: i32) -> i32 {
        self.get_int().unwrap_or(default)
    }

    pub fn get_long(&self) -> Option<i64> {
        self.coerced(coerce::as_long)
    }

    pub fn get_long_or(&self, default: i64) -> i64 {
        self.get_long().unwrap_or(default)
    }

    pub fn get_float(&self) -> Option<f32> {
        self.coerced(coerce::as_float)
    }

    pub fn get_float_or(&self, default: f32) -> f32 {
        self.get_float().unwrap_or(default)
    }

    pub fn get_double(&self) -> Option<f64> {
        self.coerced(coerce::as_double)
    }

    pub fn get_double_or(&self, default: f64) -> f64 {
        self.get_double().unwrap_or(default)
    }

    pub fn get_bool(&self) -> Option<bool> {
        self.coerced(coerce::as_bool)
    }

    pub fn get_bool_or(&self, default: bool) -> bool {
        self.get_bool().unwrap_or(default)
    }

    pub fn get_instant(&self) -> Option<DateTime<Utc>> {
        self.coerced(coerce::as_instant)
    }

    pub fn get_date(&self) -> Option<DateTime<FixedOffset>> {
        self.coerced(coerce::as_date)
    }

    /// Convert list children with `convert`, skipping those that do not
    /// convert. A scalar node yields a one-element list.
    pub fn get_list<T>(&self, convert: impl Fn(&ScalarValue) -> Option<T>) -> Vec<T> {
        match &self.inner.borrow().value {
            NodeValue::List(items) => items
                .iter()
                .filter_map(|item| item.coerced(&convert))
                .collect(),
            NodeValue::Scalar(value) => convert(value).into_iter().collect(),
            _ => Vec::new(),
        }
    }

    // ==================== Navigation ====================

    /// The child at `key`, or a new virtual child if there is none.
    pub fn child(&self, key: impl Into<NodeKey>) -> ConfigNode {
        let key = key.into();
        let existing = match (&self.inner.borrow().value, &key) {
            (NodeValue::Map(entries), NodeKey::Key(k)) => entries.get(k).cloned(),
            (NodeValue::List(items), NodeKey::Index(i)) => items.get(*i).cloned(),
            _ => None,
        };
        existing.unwrap_or_else(|| self.new_child(Position::Child(key)))
    }

    /// The descendant along `path`, creating virtual nodes for missing
    /// segments. An empty path returns this node.
    pub fn get_node<I>(&self, path: I) -> ConfigNode
    where
        I: IntoIterator,
        I::Item: Into<NodeKey>,
    {
        path.into_iter()
            .fold(self.clone(), |node, key| node.child(key))
    }

    /// A virtual child that appends itself to this node's list when written.
    pub fn get_appended_node(&self) -> ConfigNode {
        self.new_child(Position::Appended)
    }

    // ==================== Writing ====================

    /// Assign a value to this node, attaching it (and any virtual ancestors)
    /// to the tree.
    ///
    /// Lists and maps replace any existing children with new ones built from
    /// their elements. [`Value::Null`] removes the node instead.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnsupportedValueType`] if the tree's options reject a
    /// value, [`ConfigError::ShapeConflict`] if an ancestor on the path is a
    /// container of the other shape. Nothing is modified on error.
    pub fn set_value(&self, value: impl Into<Value>) -> Result<(), ConfigError> {
        let value = value.into();
        if value.is_null() {
            self.remove();
            return Ok(());
        }

        let options = self.options();
        let mut path = self.path().segments().to_vec();
        check_value(&options, &value, &mut path)?;
        self.check_attachable()?;

        self.attach();
        let new_value = self.build_value(value);
        self.replace_value(new_value);
        Ok(())
    }

    /// Replace this node's contents with a deep copy of `other`.
    ///
    /// If both nodes are attributed, the tag name and attributes are copied
    /// too. Copying a virtual node removes this node.
    pub fn set_node(&self, other: &ConfigNode) -> Result<(), ConfigError> {
        if self.ptr_eq(other) {
            return Ok(());
        }
        if other.is_virtual() {
            if let Some(element) = other.element() {
                self.replace_element(element);
            }
            self.remove();
            return Ok(());
        }

        let snapshot = other.copy();
        let options = self.options();
        let mut path = self.path().segments().to_vec();
        check_tree(&options, &snapshot, &mut path)?;
        self.check_attachable()?;

        self.attach();
        self.adopt(&snapshot);
        Ok(())
    }

    /// Detach this node from its parent and make it virtual.
    ///
    /// Returns `true` if the node was attached to a parent. Removing a root
    /// only clears it.
    pub fn remove(&self) -> bool {
        let parent = self.parent();
        let detached = match &parent {
            Some(parent) if self.is_attached() => parent.detach_child(self),
            _ => false,
        };

        self.replace_value(NodeValue::Virtual);

        if detached
            && let Some(parent) = parent
            && parent.options().prune_empty_containers()
            && parent.is_empty_container()
        {
            parent.remove();
        }
        detached
    }

    /// Remove the child at `key`, returning `true` if it existed.
    pub fn remove_child(&self, key: impl Into<NodeKey>) -> bool {
        let child = self.child(key);
        child.is_attached() && child.remove()
    }

    /// Deep copy this subtree into a new root sharing the same options.
    pub fn copy(&self) -> ConfigNode {
        self.duplicate(Weak::new(), Position::Root, true)
    }

    // ==================== Element info ====================

    /// A copy of the tag name and attributes, for attributed nodes.
    pub fn element(&self) -> Option<ElementInfo> {
        self.inner.borrow().element.clone()
    }

    pub fn is_attributed(&self) -> bool {
        self.inner.borrow().element.is_some()
    }

    pub(crate) fn with_element<R>(&self, f: impl FnOnce(&ElementInfo) -> R) -> Option<R> {
        self.inner.borrow().element.as_ref().map(f)
    }

    pub(crate) fn with_element_mut<R>(&self, f: impl FnOnce(&mut ElementInfo) -> R) -> Option<R> {
        self.inner.borrow_mut().element.as_mut().map(f)
    }

    /// Overwrite the element info of an attributed node.
    pub(crate) fn replace_element(&self, element: ElementInfo) {
        if let Some(current) = self.inner.borrow_mut().element.as_mut() {
            *current = element;
        }
    }

    // ==================== Internals ====================

    fn is_empty_container(&self) -> bool {
        match &self.inner.borrow().value {
            NodeValue::List(items) => items.is_empty(),
            NodeValue::Map(entries) => entries.is_empty(),
            _ => false,
        }
    }

    /// The attached node standing at this node's location, if any.
    ///
    /// Virtual handles obtained before a sibling write may point at a
    /// location that has since been filled; writes through them go to the
    /// node that is already there. A node holding contents stands for
    /// itself.
    fn resolve(&self) -> Option<ConfigNode> {
        let (attached, position, parent) = {
            let data = self.inner.borrow();
            (data.attached, data.position.clone(), data.parent.upgrade())
        };
        if attached || !self.is_virtual() {
            return Some(self.clone());
        }
        let parent = ConfigNode { inner: parent? }.resolve()?;
        let data = parent.inner.borrow();
        match (&data.value, position) {
            (NodeValue::Map(entries), Position::Child(NodeKey::Key(key))) => entries.get(&key).cloned(),
            (NodeValue::List(items), Position::Child(NodeKey::Index(index))) => {
                items.get(index).cloned()
            }
            _ => None,
        }
    }

    /// Verify that this node and every virtual ancestor can be attached
    /// without changing the shape of an existing container.
    fn check_attachable(&self) -> Result<(), ConfigError> {
        let mut current = self.clone();
        loop {
            let (attached, position, parent) = {
                let data = current.inner.borrow();
                (data.attached, data.position.clone(), data.parent.upgrade())
            };
            if attached {
                return Ok(());
            }
            let Some(parent) = parent.map(|inner| ConfigNode { inner }) else {
                return Ok(());
            };

            let Some(existing) = parent.resolve() else {
                // The parent will be created with the shape this key asks for.
                current = parent;
                continue;
            };
            let found = match (&existing.inner.borrow().value, &position) {
                (NodeValue::Map(_), Position::Child(NodeKey::Index(_)) | Position::Appended) => {
                    Some(ContainerShape::Map)
                }
                (NodeValue::List(_), Position::Child(NodeKey::Key(_))) => Some(ContainerShape::List),
                _ => None,
            };
            return match found {
                Some(found) => Err(ConfigError::ShapeConflict {
                    path: current.path(),
                    found,
                }),
                None => Ok(()),
            };
        }
    }

    /// Attach this node and its unattached ancestors. Callers must run
    /// `check_attachable` first.
    fn attach(&self) {
        let (attached, parent) = {
            let data = self.inner.borrow();
            (data.attached, data.parent.upgrade())
        };
        if attached {
            return;
        }
        match parent {
            Some(inner) => {
                let parent = ConfigNode { inner }.materialize();
                self.inner.borrow_mut().parent = Rc::downgrade(&parent.inner);
                parent.insert_child(self);
            }
            // The parent is gone; the node stands alone as a root.
            None => self.inner.borrow_mut().attached = true,
        }
    }

    /// The attached node at this location, attaching this one if the
    /// location is empty.
    fn materialize(&self) -> ConfigNode {
        match self.resolve() {
            Some(existing) if !existing.ptr_eq(self) => existing,
            _ => {
                self.attach();
                self.clone()
            }
        }
    }

    /// Insert `child` into this node's children, converting a virtual or
    /// scalar node into the container its key calls for.
    fn insert_child(&self, child: &ConfigNode) {
        let ordering = self.options().map_ordering();
        let mut displaced = None;
        {
            let mut data = self.inner.borrow_mut();
            let mut child_data = child.inner.borrow_mut();
            match child_data.position.clone() {
                Position::Child(NodeKey::Key(key)) => {
                    if !matches!(data.value, NodeValue::Map(_)) {
                        data.value = NodeValue::Map(IndexMap::new());
                    }
                    if let NodeValue::Map(entries) = &mut data.value {
                        displaced = entries.insert(key, child.clone());
                        if ordering == MapOrdering::Sorted {
                            entries.sort_keys();
                        }
                    }
                }
                Position::Child(NodeKey::Index(index)) => {
                    if !matches!(data.value, NodeValue::List(_)) {
                        data.value = NodeValue::List(Vec::new());
                    }
                    if let NodeValue::List(items) = &mut data.value {
                        if index < items.len() {
                            displaced = Some(std::mem::replace(&mut items[index], child.clone()));
                        } else {
                            child_data.position = Position::Child(NodeKey::Index(items.len()));
                            items.push(child.clone());
                        }
                    }
                }
                Position::Appended => {
                    if !matches!(data.value, NodeValue::List(_)) {
                        data.value = NodeValue::List(Vec::new());
                    }
                    if let NodeValue::List(items) = &mut data.value {
                        child_data.position = Position::Child(NodeKey::Index(items.len()));
                        items.push(child.clone());
                    }
                }
                Position::Root => {}
            }
            child_data.attached = true;
        }
        if let Some(previous) = displaced {
            previous.inner.borrow_mut().attached = false;
        }
    }

    /// Remove `child` from this node's children. Later list siblings are
    /// re-indexed.
    fn detach_child(&self, child: &ConfigNode) -> bool {
        let removed = {
            let mut data = self.inner.borrow_mut();
            match &mut data.value {
                NodeValue::Map(entries) => {
                    let key = entries
                        .iter()
                        .find(|(_, candidate)| candidate.ptr_eq(child))
                        .map(|(key, _)| key.clone());
                    key.and_then(|key| entries.shift_remove(&key)).is_some()
                }
                NodeValue::List(items) => {
                    match items.iter().position(|candidate| candidate.ptr_eq(child)) {
                        Some(index) => {
                            items.remove(index);
                            for (i, item) in items.iter().enumerate().skip(index) {
                                item.inner.borrow_mut().position =
                                    Position::Child(NodeKey::Index(i));
                            }
                            true
                        }
                        None => false,
                    }
                }
                _ => false,
            }
        };

        if removed {
            let mut child_data = child.inner.borrow_mut();
            child_data.attached = false;
            if matches!(child_data.position, Position::Child(NodeKey::Index(_))) {
                child_data.position = Position::Appended;
            }
        }
        removed
    }

    /// Turn a [`Value`] into node contents owned by this node.
    fn build_value(&self, value: Value) -> NodeValue {
        match value {
            Value::Null => NodeValue::Virtual,
            Value::Scalar(scalar) => NodeValue::Scalar(scalar),
            Value::List(items) => {
                let mut children = Vec::with_capacity(items.len());
                for item in items.into_iter().filter(|item| !item.is_null()) {
                    let child = self.new_child(Position::Child(NodeKey::Index(children.len())));
                    child.inner.borrow_mut().attached = true;
                    let contents = child.build_value(item);
                    child.inner.borrow_mut().value = contents;
                    children.push(child);
                }
                NodeValue::List(children)
            }
            Value::Map(entries) => {
                let mut children = IndexMap::with_capacity(entries.len());
                for (key, item) in entries.into_iter().filter(|(_, item)| !item.is_null()) {
                    let child = self.new_child(Position::Child(NodeKey::Key(key.clone())));
                    child.inner.borrow_mut().attached = true;
                    let contents = child.build_value(item);
                    child.inner.borrow_mut().value = contents;
                    children.insert(key, child);
                }
                if self.options().map_ordering() == MapOrdering::Sorted {
                    children.sort_keys();
                }
                NodeValue::Map(children)
            }
        }
    }

    /// Swap in new contents; previous children become detached.
    fn replace_value(&self, value: NodeValue) {
        let previous = std::mem::replace(&mut self.inner.borrow_mut().value, value);
        for child in previous.children() {
            child.inner.borrow_mut().attached = false;
        }
    }

    /// Take over the contents (and element info) of a detached copy.
    fn adopt(&self, source: &ConfigNode) {
        let (mut value, element) = {
            let mut data = source.inner.borrow_mut();
            (
                std::mem::replace(&mut data.value, NodeValue::Virtual),
                data.element.take(),
            )
        };
        if let Some(element) = element {
            self.replace_element(element);
        }

        let options = self.options();
        if options.map_ordering() == MapOrdering::Sorted
            && let NodeValue::Map(entries) = &mut value
        {
            entries.sort_keys();
        }
        let attributed = self.is_attributed();
        for child in value.children() {
            child.conform(self, &options, attributed);
        }
        self.replace_value(value);
    }

    /// Re-home an adopted subtree: new parent, this tree's options, and this
    /// tree's plain/attributed flavour.
    fn conform(&self, parent: &ConfigNode, options: &Rc<ConfigOptions>, attributed: bool) {
        {
            let mut data = self.inner.borrow_mut();
            data.parent = Rc::downgrade(&parent.inner);
            data.options = Rc::clone(options);
            match (&data.element, attributed) {
                (Some(_), false) => data.element = None,
                (None, true) => data.element = Some(ElementInfo::new(options.default_tag_name())),
                _ => {}
            }
            if options.map_ordering() == MapOrdering::Sorted
                && let NodeValue::Map(entries) = &mut data.value
            {
                entries.sort_keys();
            }
        }
        let children = self.inner.borrow().value.children();
        for child in children {
            child.conform(self, options, attributed);
        }
    }

    fn duplicate(
        &self,
        parent: Weak<RefCell<NodeData>>,
        position: Position,
        attached: bool,
    ) -> ConfigNode {
        let data = self.inner.borrow();
        let copy = Self::from_data(NodeData {
            position,
            parent,
            attached,
            value: NodeValue::Virtual,
            element: data.element.clone(),
            options: Rc::clone(&data.options),
        });
        let value = match &data.value {
            NodeValue::Virtual => NodeValue::Virtual,
            NodeValue::Scalar(value) => NodeValue::Scalar(value.clone()),
            NodeValue::List(items) => NodeValue::List(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        item.duplicate(
                            Rc::downgrade(&copy.inner),
                            Position::Child(NodeKey::Index(i)),
                            true,
                        )
                    })
                    .collect(),
            ),
            NodeValue::Map(entries) => NodeValue::Map(
                entries
                    .iter()
                    .map(|(key, item)| {
                        let child = item.duplicate(
                            Rc::downgrade(&copy.inner),
                            Position::Child(NodeKey::Key(key.clone())),
                            true,
                        );
                        (key.clone(), child)
                    })
                    .collect(),
            ),
        };
        copy.inner.borrow_mut().value = value;
        copy
    }

    pub(crate) fn snapshot(&self) -> NodeValue {
        self.inner.borrow().value.clone()
    }
}

/// Check the scalars of a value (recursively) against the accepted type set.
/// Lists and maps are structure, not values, and always pass. `path` is the
/// location of `value` and is extended while descending.
fn check_value(
    options: &ConfigOptions,
    value: &Value,
    path: &mut Vec<NodeKey>,
) -> Result<(), ConfigError> {
    let rejected = |value_type: ValueType, path: &[NodeKey]| ConfigError::UnsupportedValueType {
        value_type,
        path: NodePath::new(path.to_vec()),
    };
    match value {
        Value::Null => Ok(()),
        Value::Scalar(scalar) => {
            if options.accepts_scalar(scalar) {
                Ok(())
            } else {
                Err(rejected(scalar.value_type(), path))
            }
        }
        Value::List(items) => {
            for (i, item) in items.iter().enumerate() {
                path.push(NodeKey::Index(i));
                check_value(options, item, path)?;
                path.pop();
            }
            Ok(())
        }
        Value::Map(entries) => {
            for (key, item) in entries {
                path.push(NodeKey::Key(key.clone()));
                check_value(options, item, path)?;
                path.pop();
            }
            Ok(())
        }
    }
}

/// Check the scalars of a subtree against the accepted type set.
fn check_tree(
    options: &ConfigOptions,
    node: &ConfigNode,
    path: &mut Vec<NodeKey>,
) -> Result<(), ConfigError> {
    match node.snapshot() {
        NodeValue::Virtual => Ok(()),
        NodeValue::Scalar(scalar) => {
            if options.accepts_scalar(&scalar) {
                Ok(())
            } else {
                Err(ConfigError::UnsupportedValueType {
                    value_type: scalar.value_type(),
                    path: NodePath::new(path.clone()),
                })
            }
        }
        NodeValue::List(items) => {
            for (i, item) in items.iter().enumerate() {
                path.push(NodeKey::Index(i));
                check_tree(options, item, path)?;
                path.pop();
            }
            Ok(())
        }
        NodeValue::Map(entries) => {
            for (key, item) in &entries {
                path.push(NodeKey::Key(key.clone()));
                check_tree(options, item, path)?;
                path.pop();
            }
            Ok(())
        }
    }
}

impl AsRef<ConfigNode> for ConfigNode {
    fn as_ref(&self) -> &ConfigNode {
        self
    }
}

impl PartialEq for ConfigNode {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let a = self.inner.borrow();
        let b = other.inner.borrow();
        a.element == b.element
            && match (&a.value, &b.value) {
                (NodeValue::Virtual, NodeValue::Virtual) => true,
                (NodeValue::Scalar(x), NodeValue::Scalar(y)) => x == y,
                (NodeValue::List(x), NodeValue::List(y)) => x == y,
                (NodeValue::Map(x), NodeValue::Map(y)) => {
                    x.len() == y.len() && x.iter().zip(y.iter()).all(|(l, r)| l == r)
                }
                _ => false,
            }
    }
}

impl fmt::Debug for ConfigNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.inner.borrow();
        let mut out = f.debug_struct("ConfigNode");
        out.field("position", &data.position);
        if let Some(element) = &data.element {
            out.field("element", element);
        }
        match &data.value {
            NodeValue::Virtual => out.field("value", &"<virtual>"),
            NodeValue::Scalar(value) => out.field("value", value),
            NodeValue::List(items) => out.field("list", items),
            NodeValue::Map(entries) => out.field("map", entries),
        };
        out.finish()
    }
}
