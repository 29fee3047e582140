//! Hierarchical configuration trees for Arbor.
//!
//! This crate provides the format-independent core: a tree of nodes holding
//! scalars, lists and maps, plus the plumbing format crates use to load and
//! save documents.
//!
//! # Key Features
//!
//! - **Virtual nodes**: navigating to a missing path never fails; the path
//!   materializes on first write
//! - **Lenient typed reads**: `get_int`, `get_bool`, ... convert between
//!   compatible representations and return `None` otherwise
//! - **Fill-in merging**: `merge_values_from` copies defaults without
//!   overwriting existing values
//! - **Attributed nodes**: tag names and attributes for element-based formats
//!
//! # Architecture
//!
//! - [`ConfigNode`]: a shared handle to one node of a tree
//! - [`AttributedNode`]: a node that also carries an [`ElementInfo`]
//! - [`ConfigOptions`]: options shared by every node of a tree
//! - [`FormatAdapter`] and [`ConfigLoader`]: reading and writing documents
//!
//! # Example
//!
//! ```rust
//! use arbor_config::{ConfigNode, ConfigOptions, Value};
//!
//! let config = ConfigNode::root(ConfigOptions::default());
//! config.get_node(["server", "port"]).set_value(8080).unwrap();
//! config.child("hosts").set_value(vec!["a.example", "b.example"]).unwrap();
//!
//! assert_eq!(config.get_node(["server", "port"]).get_long(), Some(8080));
//! assert_eq!(config.get_node(["server", "host"]).get_string_or("localhost"), "localhost");
//! assert_eq!(config.child("hosts").get_children_list().len(), 2);
//! ```

mod attributed;
pub mod coerce;
mod error;
mod loader;
mod merge;
mod node;
mod options;
mod path;
mod value;

pub use attributed::{
    AttributedNode,
    ElementInfo,
};

pub use error::{
    ConfigError,
    ContainerShape,
    LoaderError,
};

pub use loader::{
    ConfigLoader,
    FormatAdapter,
};

pub use merge::merge_layers;

pub use node::ConfigNode;

pub use options::{
    ConfigOptions,
    DEFAULT_TAG_NAME,
    MapOrdering,
};

pub use path::{
    NodeKey,
    NodePath,
};

pub use value::{
    ScalarValue,
    Value,
    ValueType,
};
