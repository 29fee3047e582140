//! Keys and paths used to address nodes.

use std::fmt;

/// A single path segment: a map key or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Key(String),
    Index(usize),
}

impl NodeKey {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            NodeKey::Key(key) => Some(key),
            NodeKey::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            NodeKey::Key(_) => None,
            NodeKey::Index(index) => Some(*index),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Key(key) => f.write_str(key),
            NodeKey::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for NodeKey {
    fn from(key: &str) -> Self {
        NodeKey::Key(key.to_string())
    }
}

impl From<String> for NodeKey {
    fn from(key: String) -> Self {
        NodeKey::Key(key)
    }
}

impl From<&String> for NodeKey {
    fn from(key: &String) -> Self {
        NodeKey::Key(key.clone())
    }
}

impl From<usize> for NodeKey {
    fn from(index: usize) -> Self {
        NodeKey::Index(index)
    }
}

/// The sequence of keys leading from a root to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<NodeKey>);

impl NodePath {
    pub fn new(segments: Vec<NodeKey>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[NodeKey] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let path = NodePath::new(vec!["format".into(), 2.into(), "theme".into()]);
        assert_eq!(path.to_string(), "format.2.theme");
        assert_eq!(NodePath::default().to_string(), "<root>");
    }
}
