//! Error types for XML reading and writing.

use arbor_config::{ConfigError, LoaderError};
use std::io;
use thiserror::Error;

/// Result type alias for arbor-xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing XML.
#[derive(Debug, Error)]
pub enum Error {
    /// XML syntax error from quick-xml.
    #[error("XML syntax error: {message}{}", at_byte(.position))]
    XmlSyntax {
        message: String,
        /// Byte offset where the error occurred.
        position: Option<u64>,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What was expected when EOF was encountered.
        expected: String,
    },

    /// Mismatched end tag.
    #[error("Mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag {
        /// The expected tag name.
        expected: String,
        /// The actual tag name found.
        found: String,
    },

    /// Invalid XML structure.
    #[error("Invalid XML structure: {message}")]
    InvalidStructure { message: String },

    /// Empty document (no root element).
    #[error("Empty XML document: no root element found")]
    EmptyDocument,

    /// Multiple root elements.
    #[error("Invalid XML: multiple root elements")]
    MultipleRoots,

    #[error("I/O failure while writing XML: {0}")]
    Io(#[from] io::Error),

    /// A loaded value was rejected by the target tree.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn at_byte(position: &Option<u64>) -> String {
    position.map(|p| format!(" at byte {p}")).unwrap_or_default()
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(io) => Error::Io(io::Error::new(io.kind(), io.to_string())),
            other => Error::XmlSyntax {
                message: other.to_string(),
                position: None,
            },
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlSyntax {
            message: format!("Attribute error: {}", err),
            position: None,
        }
    }
}

impl From<Error> for LoaderError {
    fn from(error: Error) -> Self {
        match error {
            Error::Io(io) => LoaderError::Io(io),
            Error::Config(config) => LoaderError::Config(config),
            other => LoaderError::invalid_data(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_message() {
        let err = Error::XmlSyntax {
            message: "bad".to_string(),
            position: Some(12),
        };
        assert_eq!(err.to_string(), "XML syntax error: bad at byte 12");

        let err = Error::XmlSyntax {
            message: "bad".to_string(),
            position: None,
        };
        assert_eq!(err.to_string(), "XML syntax error: bad");
    }

    #[test]
    fn test_loader_error_conversion() {
        match LoaderError::from(Error::EmptyDocument) {
            LoaderError::Io(io) => assert_eq!(io.kind(), io::ErrorKind::InvalidData),
            other => panic!("expected invalid data, got {other:?}"),
        }
        assert!(matches!(
            LoaderError::from(Error::Config(ConfigError::EmptyTagName)),
            LoaderError::Config(ConfigError::EmptyTagName)
        ));
    }
}
