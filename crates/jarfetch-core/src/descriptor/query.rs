//! Absolute element-path queries such as `/project/properties/name`.
//!
//! Supports only the child-axis subset needed for build descriptors. The
//! result of evaluating a path is the string value of the first matching
//! element in document order, or the empty string when nothing matches.
//! Elements are matched by local name so a default namespace (as in Maven
//! POMs) does not hide them.

use crate::error::{Error, Result};
use roxmltree::{Document, Node};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath {
    steps: Vec<String>,
}

impl NodePath {
    pub fn parse(expr: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidQuery {
            expr: expr.to_string(),
            reason,
        };
        let rest = expr
            .strip_prefix('/')
            .ok_or_else(|| invalid("path must be absolute"))?;
        let steps: Vec<String> = rest.split('/').map(str::to_string).collect();
        if steps.iter().any(|s| s.is_empty()) {
            return Err(invalid("empty path step"));
        }
        if steps.iter().any(|s| s.contains(['*', '[', '@', ':'])) {
            return Err(invalid("only plain element names are supported"));
        }
        Ok(Self { steps })
    }

    /// String value of the first element reached by this path.
    pub fn evaluate(&self, doc: &Document<'_>) -> String {
        let root = doc.root_element();
        match self.steps.split_first() {
            Some((first, rest)) if root.tag_name().name() == first => {
                find_first(root, rest).map(string_value).unwrap_or_default()
            }
            _ => String::new(),
        }
    }
}

/// Depth-first over matching children keeps document order.
fn find_first<'a, 'input>(node: Node<'a, 'input>, steps: &[String]) -> Option<Node<'a, 'input>> {
    let Some((step, rest)) = steps.split_first() else {
        return Some(node);
    };
    node.children()
        .filter(|c| c.is_element() && c.tag_name().name() == step)
        .find_map(|c| find_first(c, rest))
}

fn string_value(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
