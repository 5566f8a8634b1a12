//! Lazily materialized virtual node tree.
//!
//! Nodes live in an arena and are addressed by opaque [`NodeId`]s; the
//! navigation state of each node sits in a side table next to the arena.
//! A node's children are computed the first time they are asked for.

use crate::error::{FacetNavError, Result};
use crate::name::decode_node_name;
use crate::provider::{FacetNavigation, PropertyValue, COUNT_PROPERTY};
use crate::state::{NodeContext, RootContext};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
struct VirtualNode {
    name: String,
    parent: Option<NodeId>,
    properties: IndexMap<String, PropertyValue>,
    children: Option<Vec<NodeId>>,
}

/// Serializable view of a subtree.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub name: String,
    /// Decoded name, when it differs from the node name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

pub struct VirtualTree {
    navigation: Arc<FacetNavigation>,
    nodes: Vec<VirtualNode>,
    contexts: Vec<NodeContext>,
}

impl VirtualTree {
    pub fn new(navigation: Arc<FacetNavigation>) -> Self {
        Self {
            navigation,
            nodes: Vec::new(),
            contexts: Vec::new(),
        }
    }

    /// Add a real facet-navigation node as a tree root.
    pub fn mount(&mut self, root: RootContext) -> NodeId {
        let name = root
            .path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        self.push(name, None, NodeContext::Root(root))
    }

    fn push(&mut self, name: String, parent: Option<NodeId>, context: NodeContext) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(VirtualNode {
            name,
            parent,
            properties: IndexMap::new(),
            children: None,
        });
        self.contexts.push(context);
        id
    }

    fn node(&self, id: NodeId) -> Result<&VirtualNode> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| FacetNavError::NodeNotFound(format!("{:?}", id)))
    }

    fn ensure_populated(&mut self, id: NodeId) -> Result<()> {
        if self.node(id)?.children.is_some() {
            return Ok(());
        }
        let state = self.navigation.populate(&self.contexts[id.0])?;
        let mut children = Vec::with_capacity(state.children.len());
        for child in state.children {
            children.push(self.push(child.name, Some(id), child.context));
        }
        let node = &mut self.nodes[id.0];
        node.properties = state.properties;
        node.children = Some(children);
        Ok(())
    }

    /// Children of `id`, populating it first if needed.
    pub fn children(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        self.ensure_populated(id)?;
        Ok(self.node(id)?.children.clone().unwrap_or_default())
    }

    /// First child of `id` named `name`.
    pub fn child(&mut self, id: NodeId, name: &str) -> Result<Option<NodeId>> {
        let children = self.children(id)?;
        Ok(children.into_iter().find(|c| self.nodes[c.0].name == name))
    }

    /// Walk `relative_path` (slash-separated encoded names) down from `id`.
    pub fn resolve(&mut self, id: NodeId, relative_path: &str) -> Result<Option<NodeId>> {
        let mut current = id;
        for segment in relative_path.split('/').filter(|s| !s.is_empty()) {
            match self.child(current, segment)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    pub fn property(&mut self, id: NodeId, name: &str) -> Result<Option<PropertyValue>> {
        self.ensure_populated(id)?;
        Ok(self.node(id)?.properties.get(name).cloned())
    }

    /// The `hippo:count` property of `id`.
    pub fn count(&mut self, id: NodeId) -> Result<Option<i64>> {
        Ok(self
            .property(id, COUNT_PROPERTY)?
            .and_then(|p| p.as_long()))
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.0).map(|n| n.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn context(&self, id: NodeId) -> Option<&NodeContext> {
        self.contexts.get(id.0)
    }

    /// Absolute path: the mounted real node's path followed by the virtual
    /// names below it.
    pub fn path(&self, id: NodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(node_id.0)?;
            match (&self.contexts[node_id.0], node.parent) {
                (NodeContext::Root(root), None) => {
                    names.push(root.path.trim_end_matches('/').to_string());
                }
                _ => names.push(node.name.clone()),
            }
            current = node.parent;
        }
        names.reverse();
        Some(names.join("/"))
    }

    /// Number of nodes materialized so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Snapshot of `id` and `depth` levels below it.
    pub fn snapshot(&mut self, id: NodeId, depth: usize) -> Result<NodeSnapshot> {
        let count = self.count(id)?;
        let children = if depth == 0 {
            Vec::new()
        } else {
            let ids = self.children(id)?;
            let mut out = Vec::with_capacity(ids.len());
            for child in ids {
                out.push(self.snapshot(child, depth - 1)?);
            }
            out
        };
        let name = self.nodes[id.0].name.clone();
        let decoded = decode_node_name(&name);
        Ok(NodeSnapshot {
            label: (decoded != name).then_some(decoded),
            name,
            kind: self.contexts[id.0].kind(),
            count,
            children,
        })
    }
}
