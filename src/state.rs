//! Navigation state carried by virtual nodes.
//!
//! Contexts are immutable. List fields are `Arc<[T]>`: a child shares every
//! list it does not change with its parent and receives a fresh list for
//! every list it extends.

use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

/// Inherited property-name to value filter.
pub type ViewFilter = IndexMap<String, String>;

/// A facet-value combination materialized somewhere along a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FacetValueCombi {
    pub facet: String,
    pub value: String,
}

impl FacetValueCombi {
    pub fn new(facet: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            facet: facet.into(),
            value: value.into(),
        }
    }
}

/// One search constraint: `facet` must carry the term `value`, or merely
/// exist when `value` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SearchConstraint {
    pub facet: String,
    pub value: Option<String>,
}

impl SearchConstraint {
    pub fn term(facet: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            facet: facet.into(),
            value: Some(term.into()),
        }
    }

    pub fn exists(facet: impl Into<String>) -> Self {
        Self {
            facet: facet.into(),
            value: None,
        }
    }
}

/// Result-set ordering on one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    pub property: String,
    pub descending: bool,
}

impl OrderBy {
    /// `direction` is matched case-insensitively against `descending`;
    /// anything else sorts ascending.
    pub fn new(property: impl Into<String>, direction: Option<&str>) -> Self {
        Self {
            property: property.into(),
            descending: direction
                .map(|d| d.trim().eq_ignore_ascii_case("descending"))
                .unwrap_or(false),
        }
    }
}

/// Copy of `list` with `item` appended.
pub fn appended<T: Clone>(list: &Arc<[T]>, item: T) -> Arc<[T]> {
    let mut items = Vec::with_capacity(list.len() + 1);
    items.extend_from_slice(list);
    items.push(item);
    items.into()
}

/// Recursion state of an "available" or "sub" navigation node.
#[derive(Debug, Clone)]
pub struct NavigationContext {
    /// Every configured facet; all stay eligible at every level.
    pub available_facets: Arc<[String]>,
    /// Display-name overrides parallel to `available_facets`.
    pub facet_node_names: Option<Arc<[String]>>,
    /// The facet an "available" node drills into.
    pub current_facet: Option<String>,
    pub current_search: Arc<[SearchConstraint]>,
    pub ancestor_and_self_used_terms: Arc<[String]>,
    pub used_facet_value_combis: Arc<[FacetValueCombi]>,
    pub docbase: Option<String>,
    pub view: Arc<ViewFilter>,
    /// Preferred property values when a singled view collapses variants.
    pub order: Arc<ViewFilter>,
    pub order_by: Arc<[OrderBy]>,
    pub limit: Option<usize>,
    pub singled_view: bool,
    pub stop_sub_navigation: bool,
}

impl NavigationContext {
    /// Display name of the facet at `index` of `available_facets`: the
    /// override when present and non-blank, else the facet name itself.
    pub fn display_name(&self, index: usize) -> Option<&str> {
        let facet = self.available_facets.get(index)?;
        let name = self
            .facet_node_names
            .as_ref()
            .and_then(|names| names.get(index))
            .map(|n| n.as_str())
            .filter(|n| !n.trim().is_empty());
        Some(name.unwrap_or(facet.as_str()))
    }

    /// True when `(facet, term)` is in `used_facet_value_combis`.
    pub fn is_used(&self, facet: &str, term: &str) -> bool {
        self.used_facet_value_combis
            .iter()
            .any(|c| c.facet == facet && c.value == term)
    }

    /// Result-set state for the given search.
    pub fn result_set(
        &self,
        search: Arc<[SearchConstraint]>,
        count: Option<u64>,
    ) -> ResultSetContext {
        ResultSetContext {
            docbase: self.docbase.clone(),
            search,
            view: self.view.clone(),
            order: self.order.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            singled_view: self.singled_view,
            count,
        }
    }
}

/// State of a result-set node.
#[derive(Debug, Clone)]
pub struct ResultSetContext {
    pub docbase: Option<String>,
    pub search: Arc<[SearchConstraint]>,
    pub view: Arc<ViewFilter>,
    pub order: Arc<ViewFilter>,
    pub order_by: Arc<[OrderBy]>,
    pub limit: Option<usize>,
    pub singled_view: bool,
    /// Count already computed by the parent, if any.
    pub count: Option<u64>,
}

/// A real facet-navigation node plus what its parent passes down.
#[derive(Debug, Clone)]
pub struct RootContext {
    pub path: String,
    pub view: Arc<ViewFilter>,
    pub order: Arc<ViewFilter>,
    pub singled_view: bool,
}

impl RootContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            view: Arc::new(ViewFilter::new()),
            order: Arc::new(ViewFilter::new()),
            singled_view: false,
        }
    }

    pub fn with_view(mut self, view: ViewFilter) -> Self {
        self.view = Arc::new(view);
        self
    }

    pub fn with_order(mut self, order: ViewFilter) -> Self {
        self.order = Arc::new(order);
        self
    }

    pub fn with_singled_view(mut self, singled_view: bool) -> Self {
        self.singled_view = singled_view;
        self
    }
}

/// A document in a result set.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    pub id: String,
    pub path: String,
    pub properties: IndexMap<String, Vec<String>>,
}

/// What a virtual node stands for.
#[derive(Debug, Clone)]
pub enum NodeContext {
    Root(RootContext),
    Available(NavigationContext),
    Sub(NavigationContext),
    ResultSet(ResultSetContext),
    Document(DocumentContext),
}

impl NodeContext {
    pub fn kind(&self) -> &'static str {
        match self {
            NodeContext::Root(_) => "root",
            NodeContext::Available(_) => "available",
            NodeContext::Sub(_) => "sub",
            NodeContext::ResultSet(_) => "resultset",
            NodeContext::Document(_) => "document",
        }
    }
}
