use super::{
    document_terms, sort_hits, FacetCountRequest, FacetedNavigationEngine, NavigationResult,
    ViewRequest,
};
use crate::error::Result;
use crate::state::SearchConstraint;
use crate::types::Document;

/// Engine scanning an in-memory document list. Suited to small content sets
/// and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    documents: Vec<Document>,
}

impl MemoryEngine {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn add_document(&mut self, document: Document) {
        self.documents.push(document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn matches(doc: &Document, docbase: Option<&str>, constraints: &[SearchConstraint]) -> bool {
        if let Some(base) = docbase {
            if !doc.is_under(base) {
                return false;
            }
        }
        constraints.iter().all(|c| {
            let terms = document_terms(doc, &c.facet);
            match &c.value {
                Some(term) => terms.iter().any(|t| t == term),
                None => !terms.is_empty(),
            }
        })
    }
}

impl FacetedNavigationEngine for MemoryEngine {
    fn view(
        &self,
        request: &ViewRequest<'_>,
        facet_counts: Option<&mut FacetCountRequest>,
    ) -> Result<NavigationResult> {
        let constraints = request.effective_constraints();
        let docbase = request.query.map(|q| q.docbase.as_str());
        let matching: Vec<&Document> = self
            .documents
            .iter()
            .filter(|doc| Self::matches(doc, docbase, &constraints))
            .collect();

        if let Some(counts) = facet_counts {
            for (facet, buckets) in counts.iter_mut() {
                for doc in &matching {
                    for term in document_terms(doc, facet) {
                        *buckets.entry(term).or_insert(0) += 1;
                    }
                }
            }
        }

        let mut hits = Vec::new();
        if request.hits_requested {
            hits = matching.iter().map(|d| (*d).clone()).collect();
            sort_hits(&mut hits, request.order_by);
            if let Some(limit) = request.limit {
                hits.truncate(limit);
            }
        }

        tracing::debug!(
            "[MEMORY] constraints={} matched={} hits={}",
            constraints.len(),
            matching.len(),
            hits.len()
        );

        Ok(NavigationResult {
            length: matching.len() as u64,
            hits,
        })
    }
}
