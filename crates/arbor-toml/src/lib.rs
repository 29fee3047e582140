//! TOML support for Arbor configuration trees.
//!
//! Tables load as map children and arrays as list children. Integers load
//! as `Long` and floats as `Double`; date-times load as `Date` values.
//!
//! # Example
//!
//! ```rust
//! let loader = arbor_toml::loader();
//! let config = loader.load_from_str("[server]\nport = 8080\n").unwrap();
//! assert_eq!(config.get_node(["server", "port"]).get_int(), Some(8080));
//!
//! config.get_node(["server", "host"]).set_value("localhost").unwrap();
//! let text = loader.save_to_string(&config).unwrap();
//! assert_eq!(text, "[server]\nport = 8080\nhost = \"localhost\"\n");
//! ```

mod error;
mod load;
mod options;
mod save;

pub use error::TomlError;
pub use load::read_document;
pub use options::TomlOptions;
pub use save::write_document;

use arbor_config::{
    ConfigLoader, ConfigNode, ConfigOptions, FormatAdapter, LoaderError, ValueType,
};
use std::io::Write;

/// Value types a TOML document can hold. Only the scalar entries restrict
/// what a tree accepts; lists and maps are always allowed.
pub const ACCEPTED_TYPES: [ValueType; 10] = [
    ValueType::List,
    ValueType::Map,
    ValueType::Double,
    ValueType::Instant,
    ValueType::Float,
    ValueType::Int,
    ValueType::Boolean,
    ValueType::String,
    ValueType::Long,
    ValueType::Date,
];

/// The TOML document format.
#[derive(Debug, Clone, Default)]
pub struct TomlFormat {
    options: TomlOptions,
}

impl TomlFormat {
    pub fn new(options: TomlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TomlOptions {
        &self.options
    }
}

impl FormatAdapter for TomlFormat {
    type Node = ConfigNode;

    fn create_empty_node(&self, options: ConfigOptions) -> ConfigNode {
        ConfigNode::root(options.narrowed_to(ACCEPTED_TYPES))
    }

    fn read(&self, text: &str, node: &ConfigNode) -> Result<(), LoaderError> {
        Ok(read_document(text, node, &self.options)?)
    }

    fn write(&self, node: &ConfigNode, out: &mut dyn Write) -> Result<(), LoaderError> {
        let text = write_document(node, &self.options)?;
        out.write_all(text.as_bytes())?;
        Ok(())
    }
}

/// A loader for TOML documents.
pub type TomlLoader = ConfigLoader<TomlFormat>;

/// A TOML loader with default options and no source or sink.
pub fn loader() -> TomlLoader {
    ConfigLoader::new(TomlFormat::default())
}
