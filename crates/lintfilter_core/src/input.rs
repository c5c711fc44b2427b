//! Input node resolution.
//!
//! Configuration lookup needs one unambiguous filesystem root, so the input
//! of a filter must resolve to exactly one source directory. Chains of
//! single-input transforms are followed down to their source; a node that
//! merges several trees is rejected.

use std::path::{Path, PathBuf};

use crate::FilterError;

/// A directory-producing node of a build pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputNode {
    /// A plain directory path.
    Path(PathBuf),
    /// A source node reading a directory on disk.
    Source { source_directory: PathBuf },
    /// A node deriving its tree from upstream nodes.
    Transform {
        node_type: String,
        inputs: Vec<InputNode>,
    },
}

impl InputNode {
    /// Creates a source node for `dir`.
    pub fn source(dir: impl Into<PathBuf>) -> Self {
        Self::Source {
            source_directory: dir.into(),
        }
    }

    /// Creates a transform node over `inputs`.
    pub fn transform(node_type: impl Into<String>, inputs: Vec<InputNode>) -> Self {
        Self::Transform {
            node_type: node_type.into(),
            inputs,
        }
    }

    /// Resolves this node to the directory it ultimately reads from.
    pub fn resolve_directory(&self) -> Result<&Path, FilterError> {
        let mut node = self;
        loop {
            match node {
                InputNode::Path(path) => return Ok(path.as_path()),
                InputNode::Source { source_directory } => return Ok(source_directory.as_path()),
                InputNode::Transform { node_type, inputs } => match inputs.as_slice() {
                    [single] => node = single,
                    [] => {
                        return Err(FilterError::MissingInput {
                            node_type: node_type.clone(),
                        });
                    }
                    many => {
                        return Err(FilterError::ManyToOne {
                            node_type: node_type.clone(),
                            inputs: many.len(),
                        });
                    }
                },
            }
        }
    }
}

impl From<PathBuf> for InputNode {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for InputNode {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for InputNode {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

/// Resolves `node` to an owned directory path.
pub fn resolve_directory(node: &InputNode) -> Result<PathBuf, FilterError> {
    node.resolve_directory().map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path() {
        let node = InputNode::from("test/fixture");
        assert_eq!(resolve_directory(&node).unwrap(), PathBuf::from("test/fixture"));
    }

    #[test]
    fn test_source_node() {
        let node = InputNode::source("/srv/app");
        assert_eq!(resolve_directory(&node).unwrap(), PathBuf::from("/srv/app"));
    }

    #[test]
    fn test_nested_single_input_transforms() {
        let node = InputNode::transform(
            "funnel",
            vec![InputNode::transform("move", vec![InputNode::source("/srv/app")])],
        );
        assert_eq!(resolve_directory(&node).unwrap(), PathBuf::from("/srv/app"));
    }

    #[test]
    fn test_many_to_one_is_rejected() {
        let node = InputNode::transform(
            "merge",
            vec![InputNode::source("/srv/a"), InputNode::source("/srv/b")],
        );

        let err = resolve_directory(&node).unwrap_err();
        assert!(matches!(err, FilterError::ManyToOne { inputs: 2, .. }));

        let message = err.to_string();
        assert!(message.contains("many:*"), "{message}");
        assert!(message.contains("after linting"), "{message}");
    }

    #[test]
    fn test_many_to_one_below_single_transform() {
        let node = InputNode::transform(
            "move",
            vec![InputNode::transform(
                "merge",
                vec![InputNode::from("a"), InputNode::from("b"), InputNode::from("c")],
            )],
        );
        assert!(matches!(
            resolve_directory(&node),
            Err(FilterError::ManyToOne { inputs: 3, .. })
        ));
    }

    #[test]
    fn test_transform_without_input() {
        let node = InputNode::transform("empty", vec![]);
        assert!(matches!(
            resolve_directory(&node),
            Err(FilterError::MissingInput { .. })
        ));
    }
}
