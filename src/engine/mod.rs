//! The search engine the navigation tree is computed against.

pub mod memory;
#[cfg(feature = "tantivy-engine")]
pub mod tantivy_engine;

pub use memory::MemoryEngine;
#[cfg(feature = "tantivy-engine")]
pub use tantivy_engine::TantivyEngine;

use crate::error::{FacetNavError, Result};
use crate::state::{OrderBy, SearchConstraint, ViewFilter};
use crate::term;
use crate::types::Document;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Parsed docbase: the scope every count and result set is limited to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub docbase: String,
}

/// Facet to per-term count requests. The caller inserts an empty map for every
/// facet it wants counted; the engine fills them in.
pub type FacetCountRequest = IndexMap<String, BTreeMap<String, u64>>;

/// One invocation of [`FacetedNavigationEngine::view`].
#[derive(Debug, Clone, Copy)]
pub struct ViewRequest<'a> {
    pub query: Option<&'a Query>,
    pub constraints: &'a [SearchConstraint],
    pub view: &'a ViewFilter,
    pub limit: Option<usize>,
    pub order_by: &'a [OrderBy],
    pub hits_requested: bool,
}

impl<'a> ViewRequest<'a> {
    /// Counts-only request.
    pub fn counts(
        query: Option<&'a Query>,
        constraints: &'a [SearchConstraint],
        view: &'a ViewFilter,
    ) -> Self {
        Self {
            query,
            constraints,
            view,
            limit: None,
            order_by: &[],
            hits_requested: false,
        }
    }

    /// Drill-down constraints plus the view filter as text-term constraints.
    pub fn effective_constraints(&self) -> Vec<SearchConstraint> {
        let mut all = self.constraints.to_vec();
        all.extend(
            self.view
                .iter()
                .map(|(property, value)| SearchConstraint::term(property, term::text_term(value))),
        );
        all
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavigationResult {
    /// Number of matching documents.
    pub length: u64,
    /// Matching documents, only filled when hits were requested.
    pub hits: Vec<Document>,
}

pub trait FacetedNavigationEngine: Send + Sync {
    /// Parse a docbase into a query; `None` docbase means unscoped.
    fn parse(&self, docbase: Option<&str>) -> Result<Option<Query>> {
        parse_docbase(docbase)
    }

    /// Count (and optionally fetch) the documents matching `request`, filling
    /// the per-term counts of every facet present in `facet_counts`.
    /// A document counts once for each distinct term of a multi-valued facet.
    fn view(
        &self,
        request: &ViewRequest<'_>,
        facet_counts: Option<&mut FacetCountRequest>,
    ) -> Result<NavigationResult>;

    /// Display form of an indexed term.
    fn resolve_lucene_term_to_property_string(&self, facet: &str, term: &str) -> Result<String> {
        term::term_to_property_string(term).map_err(|e| {
            FacetNavError::InvalidQuery(format!("facet '{}': {}", facet, e))
        })
    }
}

pub(crate) fn parse_docbase(docbase: Option<&str>) -> Result<Option<Query>> {
    let Some(docbase) = docbase else {
        return Ok(None);
    };
    if !docbase.starts_with('/') {
        return Err(FacetNavError::InvalidQuery(format!(
            "docbase '{}' is not an absolute path",
            docbase
        )));
    }
    let trimmed = docbase.trim_end_matches('/');
    Ok(Some(Query {
        docbase: if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        },
    }))
}

/// Terms of `facet` on `doc`.
pub(crate) fn document_terms(doc: &Document, facet: &str) -> Vec<String> {
    doc.fields
        .get(facet)
        .map(term::encode_terms)
        .unwrap_or_default()
}

/// Sort hits by document id, then stably by each `order_by` key from the
/// last to the first. Documents without the property sort last.
pub(crate) fn sort_hits(hits: &mut [Document], order_by: &[OrderBy]) {
    hits.sort_by(|a, b| a.id.cmp(&b.id));
    for order in order_by.iter().rev() {
        hits.sort_by(|a, b| {
            let ka = sort_key(a, &order.property);
            let kb = sort_key(b, &order.property);
            match (ka, kb) {
                (Some(x), Some(y)) => {
                    if order.descending {
                        y.cmp(&x)
                    } else {
                        x.cmp(&y)
                    }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
    }
}

fn sort_key(doc: &Document, property: &str) -> Option<String> {
    doc.fields
        .get(property)
        .and_then(|v| v.values().first().and_then(|first| term::encode_single(first)))
}
