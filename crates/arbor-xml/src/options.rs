//! Options for reading and writing XML documents.

use arbor_config::DEFAULT_TAG_NAME;

/// Options controlling how XML documents are read and written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlOptions {
    indent: usize,
    default_tag_name: String,
    root_tag_name: String,
    write_declaration: bool,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            default_tag_name: DEFAULT_TAG_NAME.to_string(),
            root_tag_name: "root".to_string(),
            write_declaration: false,
        }
    }
}

impl XmlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spaces per nesting level. Zero writes the document on one line.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Tag for new elements and for nodes that carry no tag of their own.
    /// An empty name keeps the current one.
    pub fn with_default_tag_name(mut self, tag_name: impl Into<String>) -> Self {
        let tag_name = tag_name.into();
        if !tag_name.is_empty() {
            self.default_tag_name = tag_name;
        }
        self
    }

    /// Tag of the root of a newly created empty tree.
    pub fn with_root_tag_name(mut self, tag_name: impl Into<String>) -> Self {
        let tag_name = tag_name.into();
        if !tag_name.is_empty() {
            self.root_tag_name = tag_name;
        }
        self
    }

    /// Start written documents with `<?xml version="1.0" encoding="UTF-8"?>`.
    pub fn with_declaration(mut self, write: bool) -> Self {
        self.write_declaration = write;
        self
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn default_tag_name(&self) -> &str {
        &self.default_tag_name
    }

    pub fn root_tag_name(&self) -> &str {
        &self.root_tag_name
    }

    pub fn write_declaration(&self) -> bool {
        self.write_declaration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = XmlOptions::default();
        assert_eq!(options.indent(), 2);
        assert_eq!(options.default_tag_name(), "element");
        assert_eq!(options.root_tag_name(), "root");
        assert!(!options.write_declaration());
    }

    #[test]
    fn test_empty_tag_names_are_ignored() {
        let options = XmlOptions::new()
            .with_default_tag_name("")
            .with_root_tag_name("config");
        assert_eq!(options.default_tag_name(), "element");
        assert_eq!(options.root_tag_name(), "config");
    }
}
