use arbor_config::{ConfigError, LoaderError};
use thiserror::Error;

/// Errors raised while reading or writing TOML.
#[derive(Debug, Error)]
pub enum TomlError {
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// TOML documents are tables; a scalar or list root has no
    /// representation.
    #[error("Cannot write a {found} as a TOML document, the root must be a table")]
    RootNotTable { found: &'static str },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<TomlError> for LoaderError {
    fn from(error: TomlError) -> Self {
        match error {
            TomlError::Config(error) => LoaderError::Config(error),
            other => LoaderError::invalid_data(other),
        }
    }
}
