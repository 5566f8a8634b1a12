//! Access to real, persisted repository nodes.

use crate::error::{FacetNavError, Result};
use indexmap::IndexMap;
use std::sync::RwLock;

pub const DOCBASE: &str = "hippo:docbase";
pub const FACETS: &str = "hippo:facets";
pub const FACET_NODE_NAMES: &str = "hippo:facetnodenames";
pub const LIMIT: &str = "hippo:limit";
pub const SORT_BY: &str = "hippo:sortby";
pub const SORT_ORDER: &str = "hippo:sortorder";

/// Read access to persisted node properties. Every property is multi-valued.
pub trait Repository: Send + Sync {
    /// Values of `property` on the node at `node_path`; `None` when the node
    /// has no such property.
    ///
    /// # Errors
    ///
    /// [`FacetNavError::NodeNotFound`] when no node lives at `node_path`.
    fn get_property(&self, node_path: &str, property: &str) -> Result<Option<Vec<String>>>;
}

/// Repository keeping nodes in memory, keyed by absolute path.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    nodes: RwLock<IndexMap<String, IndexMap<String, Vec<String>>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the node at `path` if needed and set `property` on it.
    pub fn set_property<I, S>(&self, path: &str, property: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut nodes = self
            .nodes
            .write()
            .map_err(|_| FacetNavError::Repository("repository lock poisoned".to_string()))?;
        nodes
            .entry(normalize(path))
            .or_default()
            .insert(property.to_string(), values.into_iter().map(Into::into).collect());
        Ok(())
    }

    pub fn add_node(&self, path: &str) -> Result<()> {
        let mut nodes = self
            .nodes
            .write()
            .map_err(|_| FacetNavError::Repository("repository lock poisoned".to_string()))?;
        nodes.entry(normalize(path)).or_default();
        Ok(())
    }

    pub fn node_paths(&self) -> Vec<String> {
        match self.nodes.read() {
            Ok(nodes) => nodes.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Repository for MemoryRepository {
    fn get_property(&self, node_path: &str, property: &str) -> Result<Option<Vec<String>>> {
        let nodes = self
            .nodes
            .read()
            .map_err(|_| FacetNavError::Repository("repository lock poisoned".to_string()))?;
        let node = nodes
            .get(&normalize(node_path))
            .ok_or_else(|| FacetNavError::NodeNotFound(node_path.to_string()))?;
        Ok(node.get(property).cloned())
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
