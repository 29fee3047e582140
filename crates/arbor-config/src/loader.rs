//! Loading and saving trees through a document format.
//!
//! A [`FormatAdapter`] knows how to read one document format into a node
//! and write a node back out. A [`ConfigLoader`] pairs an adapter with a
//! source to read from and a sink to write to.

use crate::error::LoaderError;
use crate::node::ConfigNode;
use crate::options::ConfigOptions;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// A document format.
pub trait FormatAdapter {
    /// The root node type this format produces.
    type Node: AsRef<ConfigNode>;

    /// Create an empty root carrying `options`, narrowed to what this
    /// format can represent.
    fn create_empty_node(&self, options: ConfigOptions) -> Self::Node;

    /// Parse `text` into `node`.
    fn read(&self, text: &str, node: &Self::Node) -> Result<(), LoaderError>;

    /// Serialize `node` to `out`.
    fn write(&self, node: &ConfigNode, out: &mut dyn Write) -> Result<(), LoaderError>;
}

type ReaderFn = Box<dyn Fn() -> io::Result<Box<dyn BufRead>>>;
type SinkFn = Box<dyn Fn() -> io::Result<Box<dyn Write>>>;

enum Source {
    Path(PathBuf),
    Reader(ReaderFn),
}

/// Reads and writes documents of one format.
///
/// # Example
///
/// ```rust,ignore
/// let loader = ConfigLoader::new(TomlFormat::default()).with_path("settings.toml");
/// let node = loader.load()?;
/// node.child("theme").set_value("dark")?;
/// loader.save(&node)?;
/// ```
pub struct ConfigLoader<F: FormatAdapter> {
    format: F,
    source: Option<Source>,
    sink: Option<SinkFn>,
    default_options: ConfigOptions,
}

impl<F: FormatAdapter> ConfigLoader<F> {
    /// A loader with neither source nor sink.
    pub fn new(format: F) -> Self {
        Self {
            format,
            source: None,
            sink: None,
            default_options: ConfigOptions::default(),
        }
    }

    /// Read from and write to the file at `path`. A missing file loads as an
    /// empty tree.
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        self.source = Some(Source::Path(path.clone()));
        self.sink = Some(Box::new(move || {
            let file = File::create(&path)?;
            Ok(Box::new(BufWriter::new(file)) as Box<dyn Write>)
        }));
        self
    }

    /// Read from readers produced by `source`, called once per load.
    pub fn with_source<R, S>(mut self, source: S) -> Self
    where
        R: Read + 'static,
        S: Fn() -> io::Result<R> + 'static,
    {
        self.source = Some(Source::Reader(Box::new(move || {
            let reader = source()?;
            Ok(Box::new(BufReader::new(reader)) as Box<dyn BufRead>)
        })));
        self
    }

    /// Write to writers produced by `sink`, called once per save.
    pub fn with_sink<W, S>(mut self, sink: S) -> Self
    where
        W: Write + 'static,
        S: Fn() -> io::Result<W> + 'static,
    {
        self.sink = Some(Box::new(move || {
            let writer = sink()?;
            Ok(Box::new(writer) as Box<dyn Write>)
        }));
        self
    }

    /// Options used by [`ConfigLoader::load`] and
    /// [`ConfigLoader::create_empty_node`].
    pub fn with_default_options(mut self, options: ConfigOptions) -> Self {
        self.default_options = options;
        self
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    pub fn default_options(&self) -> &ConfigOptions {
        &self.default_options
    }

    pub fn can_load(&self) -> bool {
        self.source.is_some()
    }

    pub fn can_save(&self) -> bool {
        self.sink.is_some()
    }

    pub fn create_empty_node(&self) -> F::Node {
        self.format.create_empty_node(self.default_options.clone())
    }

    /// Load with the default options.
    pub fn load(&self) -> Result<F::Node, LoaderError> {
        self.load_with_options(self.default_options.clone())
    }

    pub fn load_with_options(&self, options: ConfigOptions) -> Result<F::Node, LoaderError> {
        let text = match &self.source {
            None => return Err(LoaderError::NoSource),
            Some(Source::Path(path)) => match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "Configuration file not found, starting empty");
                    return Ok(self.format.create_empty_node(options));
                }
                Err(err) => return Err(err.into()),
            },
            Some(Source::Reader(open)) => {
                let mut text = String::new();
                open()?.read_to_string(&mut text)?;
                text
            }
        };
        self.parse(&text, options)
    }

    /// Parse a document held in memory, with the default options.
    pub fn load_from_str(&self, text: &str) -> Result<F::Node, LoaderError> {
        self.parse(text, self.default_options.clone())
    }

    fn parse(&self, text: &str, options: ConfigOptions) -> Result<F::Node, LoaderError> {
        let node = self.format.create_empty_node(options);
        self.format.read(text, &node)?;
        tracing::trace!(bytes = text.len(), "Loaded configuration");
        Ok(node)
    }

    /// Write `node` to the configured sink.
    pub fn save(&self, node: &ConfigNode) -> Result<(), LoaderError> {
        let sink = self.sink.as_ref().ok_or(LoaderError::NoSink)?;
        // Render first: a path sink truncates its file when opened.
        let mut buffer = Vec::new();
        self.format.write(node, &mut buffer)?;
        let mut out = sink()?;
        out.write_all(&buffer)?;
        out.flush()?;
        Ok(())
    }

    /// Serialize `node` to a string.
    pub fn save_to_string(&self, node: &ConfigNode) -> Result<String, LoaderError> {
        let mut buffer = Vec::new();
        self.format.write(node, &mut buffer)?;
        String::from_utf8(buffer).map_err(LoaderError::invalid_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ScalarValue;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// `key=value` lines, one per root entry.
    struct LineFormat;

    impl FormatAdapter for LineFormat {
        type Node = ConfigNode;

        fn create_empty_node(&self, options: ConfigOptions) -> ConfigNode {
            ConfigNode::root(options)
        }

        fn read(&self, text: &str, node: &ConfigNode) -> Result<(), LoaderError> {
            for line in text.lines().filter(|line| !line.is_empty()) {
                let (key, value) = line
                    .split_once('=')
                    .ok_or_else(|| LoaderError::invalid_data(format!("bad line: {line}")))?;
                node.child(key).set_value(value)?;
            }
            Ok(())
        }

        fn write(&self, node: &ConfigNode, out: &mut dyn Write) -> Result<(), LoaderError> {
            for (key, child) in node.get_children_map() {
                let value = child.get_value().unwrap_or(ScalarValue::from(""));
                writeln!(out, "{key}={value}")?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_no_source_or_sink() {
        let loader = ConfigLoader::new(LineFormat);
        assert!(!loader.can_load());
        assert!(!loader.can_save());
        assert!(matches!(loader.load(), Err(LoaderError::NoSource)));
        assert!(matches!(
            loader.save(&ConfigNode::default()),
            Err(LoaderError::NoSink)
        ));
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(LineFormat).with_path(dir.path().join("missing.conf"));
        let node = loader.load().unwrap();
        assert!(node.is_virtual());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(LineFormat).with_path(dir.path().join("app.conf"));

        let node = loader.create_empty_node();
        node.child("name").set_value("arbor").unwrap();
        node.child("port").set_value(8080).unwrap();
        loader.save(&node).unwrap();

        let loaded = loader.load().unwrap();
        assert_eq!(loaded.child("name").get_string().as_deref(), Some("arbor"));
        assert_eq!(loaded.child("port").get_int(), Some(8080));
    }

    #[test]
    fn test_reader_source_and_sink() {
        let written = Rc::new(RefCell::new(Vec::new()));

        struct Shared(Rc<RefCell<Vec<u8>>>);
        impl Write for Shared {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.borrow_mut().write(buf)
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let sink = Rc::clone(&written);
        let loader = ConfigLoader::new(LineFormat)
            .with_source(|| Ok(io::Cursor::new("a=1\nb=two\n")))
            .with_sink(move || Ok(Shared(Rc::clone(&sink))));

        let node = loader.load().unwrap();
        assert_eq!(node.child("a").get_long(), Some(1));
        loader.save(&node).unwrap();
        assert_eq!(String::from_utf8(written.borrow().clone()).unwrap(), "a=1\nb=two\n");
    }

    #[test]
    fn test_parse_error_is_invalid_data() {
        let loader = ConfigLoader::new(LineFormat);
        match loader.load_from_str("no separator") {
            Err(LoaderError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::InvalidData),
            other => panic!("expected invalid data, got {other:?}"),
        }
        assert_eq!(loader.save_to_string(&ConfigNode::default()).unwrap(), "");
    }
}
