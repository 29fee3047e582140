//! Error types for tree mutation and loading.

use crate::path::NodePath;
use crate::value::ValueType;
use std::fmt;
use std::io;
use thiserror::Error;

/// The two container shapes a node can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerShape {
    List,
    Map,
}

impl fmt::Display for ContainerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerShape::List => f.write_str("list"),
            ContainerShape::Map => f.write_str("map"),
        }
    }
}

/// Errors raised by structural operations on a tree.
///
/// Reading values never produces these; a missing or unconvertible value
/// is reported as `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The tree's options do not accept this kind of value.
    #[error("Values of type {value_type} are not accepted by this configuration (at {path})")]
    UnsupportedValueType {
        /// Type of the rejected value
        value_type: ValueType,
        /// Where the value was being stored
        path: NodePath,
    },

    /// A write through a virtual path hit a container of the other shape.
    #[error("Cannot attach {path}: its parent already holds {found} children")]
    ShapeConflict {
        /// Node that could not be attached
        path: NodePath,
        /// Shape its parent holds
        found: ContainerShape,
    },

    #[error("Attribute name cannot be empty")]
    EmptyAttributeName,

    #[error("Tag name cannot be empty")]
    EmptyTagName,
}

/// Errors raised while loading or saving a document.
///
/// Parser and writer failures of every format are reported through the
/// `Io` variant so callers see one channel regardless of the format.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("No source is configured for this loader")]
    NoSource,

    #[error("No sink is configured for this loader")]
    NoSink,

    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LoaderError {
    /// Wrap a parser or writer error as invalid data.
    pub fn invalid_data<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        LoaderError::Io(io::Error::new(io::ErrorKind::InvalidData, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_value_message() {
        let err = ConfigError::UnsupportedValueType {
            value_type: ValueType::Instant,
            path: NodePath::new(vec!["a".into(), "b".into()]),
        };
        assert_eq!(
            err.to_string(),
            "Values of type instant are not accepted by this configuration (at a.b)"
        );
    }

    #[test]
    fn test_invalid_data_is_io() {
        let err = LoaderError::invalid_data("bad document");
        match err {
            LoaderError::Io(io) => assert_eq!(io.kind(), io::ErrorKind::InvalidData),
            other => panic!("expected Io, got {other:?}"),
        }
    }
}
