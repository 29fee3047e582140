//! XML support for Arbor configuration trees.
//!
//! Documents load into [`AttributedNode`] trees: every element keeps its tag
//! name and attributes. Children whose tags are all distinct load as map
//! children keyed by tag; if any tag repeats, all children load as list
//! entries in document order. Leaf text is typed on the way in (see
//! [`parse_value`]).
//!
//! The crate also exposes the element tree it reads through: [`parse`]
//! builds [`XmlElement`]s with [`quick-xml`], and [`write_xml`] writes them
//! back out.
//!
//! # Example
//!
//! ```rust
//! let loader = arbor_xml::loader();
//! let note = loader
//!     .load_from_str(r#"<note id="501"><to>Tove</to><from>Jani</from></note>"#)
//!     .unwrap();
//!
//! assert_eq!(note.tag_name(), "note");
//! assert_eq!(note.attribute("id").as_deref(), Some("501"));
//! assert_eq!(note.child("to").get_string().as_deref(), Some("Tove"));
//!
//! let text = loader.save_to_string(&note).unwrap();
//! assert_eq!(
//!     text,
//!     "<note id=\"501\">\n  <to>Tove</to>\n  <from>Jani</from>\n</note>\n"
//! );
//! ```
//!
//! [`quick-xml`]: quick_xml

mod error;
mod load;
mod options;
mod parser;
mod save;
mod types;
mod writer;

pub use error::{Error, Result};
pub use load::{parse_value, read_document, read_element};
pub use options::XmlOptions;
pub use parser::parse;
pub use save::{to_element, write_document};
pub use types::{XmlAttribute, XmlChild, XmlChildren, XmlElement};
pub use writer::{to_xml_string, write_xml};

use arbor_config::{
    AttributedNode, ConfigLoader, ConfigNode, ConfigOptions, FormatAdapter, LoaderError, ValueType,
};
use std::io::Write;

/// Value types an XML document can hold.
pub const ACCEPTED_TYPES: [ValueType; 6] = [
    ValueType::Double,
    ValueType::Long,
    ValueType::Int,
    ValueType::Boolean,
    ValueType::String,
    ValueType::Number,
];

/// The XML document format.
#[derive(Debug, Clone, Default)]
pub struct XmlFormat {
    options: XmlOptions,
}

impl XmlFormat {
    pub fn new(options: XmlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &XmlOptions {
        &self.options
    }
}

impl FormatAdapter for XmlFormat {
    type Node = AttributedNode;

    fn create_empty_node(&self, options: ConfigOptions) -> AttributedNode {
        let options = options
            .narrowed_to(ACCEPTED_TYPES)
            .with_default_tag_name(self.options.default_tag_name());
        AttributedNode::root(self.options.root_tag_name(), options)
    }

    fn read(&self, text: &str, node: &AttributedNode) -> std::result::Result<(), LoaderError> {
        Ok(read_document(text, node)?)
    }

    fn write(&self, node: &ConfigNode, out: &mut dyn Write) -> std::result::Result<(), LoaderError> {
        let element = to_element(node, &self.options)?;
        tracing::debug!(root = %element.name, "Writing XML document");
        write_xml(&element, out, &self.options)?;
        Ok(())
    }
}

/// A loader for XML documents.
pub type XmlLoader = ConfigLoader<XmlFormat>;

/// An XML loader with default options and no source or sink.
pub fn loader() -> XmlLoader {
    ConfigLoader::new(XmlFormat::default())
}
