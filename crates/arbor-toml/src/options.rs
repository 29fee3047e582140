//! Writer options for TOML documents.

use chrono::{FixedOffset, Offset, Utc};

/// Options controlling how TOML documents are read and written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TomlOptions {
    zone_offset: FixedOffset,
    fractional_seconds: bool,
    pretty: bool,
}

impl Default for TomlOptions {
    fn default() -> Self {
        Self {
            zone_offset: Utc.fix(),
            fractional_seconds: false,
            pretty: false,
        }
    }
}

impl TomlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset used to write instants, and to place local date-times and
    /// local dates when reading.
    pub fn with_zone_offset(mut self, offset: FixedOffset) -> Self {
        self.zone_offset = offset;
        self
    }

    /// Keep sub-second precision when writing date-times.
    pub fn with_fractional_seconds(mut self, fractional: bool) -> Self {
        self.fractional_seconds = fractional;
        self
    }

    /// Write arrays over multiple lines.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn zone_offset(&self) -> FixedOffset {
        self.zone_offset
    }

    pub fn fractional_seconds(&self) -> bool {
        self.fractional_seconds
    }

    pub fn pretty(&self) -> bool {
        self.pretty
    }
}
