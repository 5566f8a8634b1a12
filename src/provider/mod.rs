//! Population of faceted-navigation virtual nodes.
//!
//! [`FacetNavigation`] bundles the three navigation providers (root,
//! available-values, sub-navigation) and the result-set provider. It holds
//! no per-request state: everything a population step needs comes in through
//! the [`NodeContext`] and everything it produces goes out as a
//! [`VirtualNodeState`], so one instance serves any number of concurrent
//! resolutions.

mod available;
mod entry;
mod resultset;
mod root;
mod sub;

pub use entry::FacetNavigationEntry;
pub use resultset::{FacetResultSetProvider, ResultSetProvider};

use crate::engine::FacetedNavigationEngine;
use crate::error::Result;
use crate::name::NameResolver;
use crate::repository::Repository;
use crate::state::NodeContext;
use indexmap::IndexMap;
use std::sync::Arc;

/// Count property set on every populated navigation node.
pub const COUNT_PROPERTY: &str = "hippo:count";
/// Name of the result-set child.
pub const RESULT_SET_NODE: &str = "hippo:resultset";

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Long(i64),
    Strings(Vec<String>),
}

impl PropertyValue {
    pub fn as_long(&self) -> Option<i64> {
        match self {
            PropertyValue::Long(v) => Some(*v),
            PropertyValue::Strings(_) => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            PropertyValue::Strings(v) => Some(v),
            PropertyValue::Long(_) => None,
        }
    }
}

/// A child a population step attaches to its node.
#[derive(Debug, Clone)]
pub struct ChildNodeEntry {
    pub name: String,
    pub context: NodeContext,
}

/// Properties and children produced by populating one virtual node.
#[derive(Debug, Clone, Default)]
pub struct VirtualNodeState {
    pub properties: IndexMap<String, PropertyValue>,
    pub children: Vec<ChildNodeEntry>,
}

impl VirtualNodeState {
    pub fn set_property(&mut self, name: &str, value: PropertyValue) {
        self.properties.insert(name.to_string(), value);
    }

    pub fn set_count(&mut self, count: u64) {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        self.set_property(COUNT_PROPERTY, PropertyValue::Long(count));
    }

    pub fn count(&self) -> Option<i64> {
        self.properties.get(COUNT_PROPERTY).and_then(|p| p.as_long())
    }

    /// Attach a child. A name a sibling already has gets a `[n]` index, the
    /// same-name-sibling form, so every child stays reachable by name.
    pub fn add_child(&mut self, name: impl Into<String>, context: NodeContext) {
        let mut name = name.into();
        if self.has_child(&name) {
            let base = name.clone();
            let mut index = 2;
            loop {
                name = format!("{}[{}]", base, index);
                if !self.has_child(&name) {
                    break;
                }
                index += 1;
            }
            tracing::debug!("[FACETNAV] sibling name '{}' taken, using '{}'", base, name);
        }
        self.children.push(ChildNodeEntry { name, context });
    }

    fn has_child(&self, name: &str) -> bool {
        self.children.iter().any(|c| c.name == name)
    }

    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }
}

/// The faceted-navigation providers, wired together at construction.
pub struct FacetNavigation {
    engine: Arc<dyn FacetedNavigationEngine>,
    repository: Arc<dyn Repository>,
    names: Arc<dyn NameResolver>,
    result_sets: Arc<dyn ResultSetProvider>,
}

impl FacetNavigation {
    pub fn new(
        engine: Arc<dyn FacetedNavigationEngine>,
        repository: Arc<dyn Repository>,
        names: Arc<dyn NameResolver>,
    ) -> Self {
        Self {
            engine,
            repository,
            names,
            result_sets: Arc::new(FacetResultSetProvider),
        }
    }

    pub fn with_result_set_provider(mut self, provider: Arc<dyn ResultSetProvider>) -> Self {
        self.result_sets = provider;
        self
    }

    pub fn engine(&self) -> &dyn FacetedNavigationEngine {
        self.engine.as_ref()
    }

    /// Populate the node standing for `context`.
    ///
    /// Name problems are absorbed (logged, degraded output); engine and
    /// repository failures propagate.
    pub fn populate(&self, context: &NodeContext) -> Result<VirtualNodeState> {
        match context {
            NodeContext::Root(root) => self.populate_root(root),
            NodeContext::Available(nav) => self.populate_available(nav),
            NodeContext::Sub(nav) => self.populate_sub(nav),
            NodeContext::ResultSet(rs) => self.result_sets.populate(self.engine.as_ref(), rs),
            NodeContext::Document(doc) => {
                let mut state = VirtualNodeState::default();
                for (name, values) in &doc.properties {
                    state.set_property(name, PropertyValue::Strings(values.clone()));
                }
                Ok(state)
            }
        }
    }
}
