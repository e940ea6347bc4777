//! # Encoding Parameters
//!
//! Request-scoped filters, already parsed from the query string by the caller:
//! include paths (`?include=author,comments.author`) and sparse fieldsets
//! (`?fields[people]=first_name,last_name`).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Include paths and sparse fieldsets for one encode call.
///
/// `include_paths` distinguishes "not given" (`None`, schemas' default include
/// paths apply) from "given and empty" (`Some(vec![])`, nothing is included).
/// A type missing from `field_sets` is not filtered; a type present with an
/// empty set shows no attributes and no relationships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    #[serde(default)]
    include_paths: Option<Vec<String>>,
    #[serde(default)]
    field_sets: HashMap<String, BTreeSet<String>>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_include_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.include_paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_field_set<I, F>(mut self, resource_type: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.field_sets.insert(
            resource_type.into(),
            fields.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn include_paths(&self) -> Option<&[String]> {
        self.include_paths.as_deref()
    }

    pub fn field_set(&self, resource_type: &str) -> Option<&BTreeSet<String>> {
        self.field_sets.get(resource_type)
    }

    /// Whether `field` of `resource_type` survives the sparse fieldset.
    pub fn is_visible(&self, resource_type: &str, field: &str) -> bool {
        self.field_set(resource_type)
            .map_or(true, |fields| fields.contains(field))
    }
}

// =============================================================================
// INCLUDE PATH TREE
// =============================================================================

#[derive(Debug, Clone)]
struct IncludeNode {
    segment: String,
    path: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Dot-delimited include paths merged into a prefix tree.
///
/// `comments.author` and `comments.post` share the `comments` node. Node `ROOT`
/// stands for the primary resources; its children are first path segments.
#[derive(Debug, Clone)]
pub(crate) struct IncludeTree {
    nodes: Vec<IncludeNode>,
}

impl IncludeTree {
    pub(crate) const ROOT: usize = 0;

    pub(crate) fn parse<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let mut tree = Self {
            nodes: vec![IncludeNode {
                segment: String::new(),
                path: String::new(),
                parent: None,
                children: Vec::new(),
            }],
        };
        for path in paths {
            let mut node = Self::ROOT;
            for segment in path.as_ref().split('.').map(str::trim) {
                if segment.is_empty() {
                    break;
                }
                node = match tree.child(node, segment) {
                    Some(existing) => existing,
                    None => tree.add_child(node, segment),
                };
            }
        }
        tree
    }

    pub(crate) fn child(&self, node: usize, segment: &str) -> Option<usize> {
        self.nodes[node]
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child].segment == segment)
    }

    pub(crate) fn has_children(&self, node: usize) -> bool {
        !self.nodes[node].children.is_empty()
    }

    pub(crate) fn parent(&self, node: usize) -> Option<usize> {
        self.nodes[node].parent
    }

    /// Full dotted path from the root to `node`.
    pub(crate) fn path(&self, node: usize) -> &str {
        &self.nodes[node].path
    }

    /// All nodes except the root, in insertion order.
    pub(crate) fn nodes(&self) -> impl Iterator<Item = usize> {
        1..self.nodes.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    fn add_child(&mut self, parent: usize, segment: &str) -> usize {
        let path = if parent == Self::ROOT {
            segment.to_string()
        } else {
            format!("{}.{}", self.nodes[parent].path, segment)
        };
        self.nodes.push(IncludeNode {
            segment: segment.to_string(),
            path,
            parent: Some(parent),
            children: Vec::new(),
        });
        let index = self.nodes.len() - 1;
        self.nodes[parent].children.push(index);
        index
    }
}
