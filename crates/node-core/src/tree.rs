//! Dot-path addressing and layered merge over a [`Node`].
//!
//! A path such as `"server.tls.port"` descends one Mapping child per segment.
//! The empty path addresses the root; any other empty segment (`"a..b"`,
//! `".a"`) is invalid. There is no escape for a literal dot inside a key.
//!
//! # Merge
//!
//! [`Tree::merge`] combines two trees into a new one without touching either
//! input:
//!
//! - Nil on either side yields the other side.
//! - Two Sequences concatenate, left elements first.
//! - Two Mappings take the union of their keys, merging shared keys recursively.
//! - Any other pair (two scalars, or mismatched kinds) keeps the **left**
//!   operand.
//!
//! ```
//! use node_core::{Node, Tree};
//! use serde_json::json;
//!
//! let defaults: Tree = serde_json::from_value(json!({"port": 80, "hosts": ["a"]})).unwrap();
//! let site: Tree = serde_json::from_value(json!({"hosts": ["b"], "tls": true})).unwrap();
//!
//! let merged = defaults.merge(&site);
//! assert_eq!(merged.get::<u16>("port").unwrap(), 80);
//! assert_eq!(merged.find("hosts").unwrap().unwrap().len().unwrap(), 2);
//! assert!(merged.contains("tls"));
//! ```

use crate::de::FromNode;
use crate::error::{NodeError, Result};
use crate::node::{Mapping, Node};
use crate::ser::ToNode;
use std::ops::{Deref, DerefMut};

/// A [`Node`] with dot-path access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tree(Node);

fn segments(path: &str) -> Result<Vec<&str>> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let parts: Vec<&str> = path.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(NodeError::InvalidPath(path.to_string()));
    }
    Ok(parts)
}

impl Tree {
    pub fn new(root: impl Into<Node>) -> Self {
        Tree(root.into())
    }

    pub fn root(&self) -> &Node {
        &self.0
    }

    pub fn into_node(self) -> Node {
        self.0
    }

    /// The node at `path`, or `None` if some segment is missing or descends
    /// into a non-Mapping.
    pub fn find(&self, path: &str) -> Result<Option<&Node>> {
        let mut current = &self.0;
        for segment in segments(path)? {
            match current {
                Node::Mapping(map) => match map.get(segment) {
                    Some(child) => current = child,
                    None => return Ok(None),
                },
                _ => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    pub fn find_mut(&mut self, path: &str) -> Result<Option<&mut Node>> {
        let mut current = &mut self.0;
        for segment in segments(path)? {
            match current {
                Node::Mapping(map) => match map.get_mut(segment) {
                    Some(child) => current = child,
                    None => return Ok(None),
                },
                _ => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Deserialize the node at `path` into `T`.
    pub fn get<T: FromNode>(&self, path: &str) -> Result<T> {
        match self.find(path)? {
            Some(node) => T::from_node(node),
            None => Err(NodeError::PathNotFound(path.to_string())),
        }
    }

    /// Like [`Tree::get`], but any failure yields `None`.
    pub fn opt<T: FromNode>(&self, path: &str) -> Option<T> {
        self.get(path).ok()
    }

    /// Whether `path` resolves. Invalid paths resolve nowhere.
    pub fn contains(&self, path: &str) -> bool {
        matches!(self.find(path), Ok(Some(_)))
    }

    /// Write `value` at `path`, creating intermediate Mappings. A Nil along the
    /// way is replaced by a Mapping; any other non-Mapping is an error.
    pub fn set(&mut self, path: &str, value: impl ToNode) -> Result<()> {
        let parts = segments(path)?;
        let value = value.to_node()?;
        let Some((last, parents)) = parts.split_last() else {
            self.0 = value;
            return Ok(());
        };

        let mut current = &mut self.0;
        for segment in parents {
            if current.is_nil() {
                *current = Node::mapping();
            }
            current = current
                .as_mapping_mut()?
                .entry(segment.to_string())
                .or_insert(Node::Nil);
        }
        if current.is_nil() {
            *current = Node::mapping();
        }
        current.as_mapping_mut()?.insert(last.to_string(), value);
        Ok(())
    }

    /// Detach and return the node at `path`. The root cannot be removed.
    pub fn remove(&mut self, path: &str) -> Result<Option<Node>> {
        let parts = segments(path)?;
        let Some((last, parents)) = parts.split_last() else {
            return Err(NodeError::InvalidPath(path.to_string()));
        };
        let parent = parents.join(".");
        match self.find_mut(&parent)? {
            Some(Node::Mapping(map)) => Ok(map.remove(*last)),
            _ => Ok(None),
        }
    }

    /// Every leaf path in dot syntax. Sequences, scalars and empty Mappings
    /// are leaves.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_paths(&self.0, String::new(), &mut out);
        out
    }

    /// Combine `self` with `other`; see the module docs for the rules.
    pub fn merge(&self, other: &Tree) -> Tree {
        Tree(merge_nodes(&self.0, &other.0))
    }
}

fn collect_paths(node: &Node, prefix: String, out: &mut Vec<String>) {
    match node {
        Node::Mapping(map) if !map.is_empty() => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect_paths(child, path, out);
            }
        }
        _ if prefix.is_empty() => {}
        _ => out.push(prefix),
    }
}

fn merge_nodes(left: &Node, right: &Node) -> Node {
    match (left, right) {
        (Node::Nil, other) | (other, Node::Nil) => other.clone(),
        (Node::Sequence(a), Node::Sequence(b)) => {
            Node::Sequence(a.iter().chain(b.iter()).cloned().collect())
        }
        (Node::Mapping(a), Node::Mapping(b)) => {
            let mut out: Mapping = a.clone();
            for (key, value) in b {
                match out.get_mut(key) {
                    Some(existing) => *existing = merge_nodes(existing, value),
                    None => {
                        out.insert(key.clone(), value.clone());
                    }
                }
            }
            Node::Mapping(out)
        }
        (keep, dropped) => {
            tracing::debug!(kept = %keep, dropped = %dropped, "merge conflict: keeping left operand");
            keep.clone()
        }
    }
}

impl Deref for Tree {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.0
    }
}

impl DerefMut for Tree {
    fn deref_mut(&mut self) -> &mut Node {
        &mut self.0
    }
}

impl From<Node> for Tree {
    fn from(node: Node) -> Self {
        Tree(node)
    }
}

impl From<Tree> for Node {
    fn from(tree: Tree) -> Self {
        tree.0
    }
}

impl ToNode for Tree {
    fn to_node(&self) -> Result<Node> {
        Ok(self.0.clone())
    }
}

impl FromNode for Tree {
    fn from_node(node: &Node) -> Result<Self> {
        Ok(Tree(node.clone()))
    }
}
