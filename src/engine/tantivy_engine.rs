//! Engine backed by an in-RAM tantivy index.
//!
//! Every property term is indexed as the facet `/<property>/<term>` in the
//! `_facets` field, so a term query on `/<property>` matches every document
//! carrying the property and a [`FacetCollector`] on it yields per-term
//! counts. The document path is indexed as a facet in `_path`; a docbase
//! therefore matches itself and everything below it.

use super::{
    sort_hits, FacetCountRequest, FacetedNavigationEngine, NavigationResult, ViewRequest,
};
use crate::error::{FacetNavError, Result};
use crate::state::SearchConstraint;
use crate::term;
use crate::types::Document;
use tantivy::collector::{Count, DocSetCollector, FacetCollector};
use tantivy::query::{AllQuery, BooleanQuery, Occur, Query as TantivyQuery, TermQuery};
use tantivy::schema::{Facet, FacetOptions, Field, IndexRecordOption, Schema, Value, STORED};
use tantivy::{Index, IndexReader, IndexWriter, TantivyDocument, Term};

const FACETS_FIELD: &str = "_facets";
const PATH_FIELD: &str = "_path";
const SOURCE_FIELD: &str = "_source";
const WRITER_HEAP_BYTES: usize = 50_000_000;

pub struct TantivyEngine {
    index: Index,
    reader: IndexReader,
    facets: Field,
    path: Field,
    source: Field,
}

impl TantivyEngine {
    pub fn from_documents(documents: &[Document]) -> Result<Self> {
        let mut builder = Schema::builder();
        let facets = builder.add_facet_field(FACETS_FIELD, FacetOptions::default());
        let path = builder.add_facet_field(PATH_FIELD, FacetOptions::default());
        let source = builder.add_text_field(SOURCE_FIELD, STORED);
        let schema = builder.build();

        let index = Index::create_in_ram(schema);
        let mut writer: IndexWriter = index.writer(WRITER_HEAP_BYTES)?;
        for doc in documents {
            let mut tdoc = TantivyDocument::default();
            for (property, value) in &doc.fields {
                for t in term::encode_terms(value) {
                    tdoc.add_facet(facets, Facet::from_path([property.as_str(), t.as_str()]));
                }
            }
            tdoc.add_facet(path, path_facet(&doc.path));
            tdoc.add_text(source, serde_json::to_string(&doc.to_json())?);
            writer.add_document(tdoc)?;
        }
        writer.commit()?;

        let reader = index.reader()?;
        tracing::info!("[TANTIVY] indexed {} documents", documents.len());

        Ok(Self {
            index,
            reader,
            facets,
            path,
            source,
        })
    }

    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    fn build_query(
        &self,
        docbase: Option<&str>,
        constraints: &[SearchConstraint],
    ) -> Box<dyn TantivyQuery> {
        let mut clauses: Vec<(Occur, Box<dyn TantivyQuery>)> = Vec::new();
        if let Some(base) = docbase.filter(|b| *b != "/") {
            clauses.push((
                Occur::Must,
                Box::new(TermQuery::new(
                    Term::from_facet(self.path, &path_facet(base)),
                    IndexRecordOption::Basic,
                )),
            ));
        }
        for c in constraints {
            let facet = match &c.value {
                Some(t) => Facet::from_path([c.facet.as_str(), t.as_str()]),
                None => Facet::from_path([c.facet.as_str()]),
            };
            clauses.push((
                Occur::Must,
                Box::new(TermQuery::new(
                    Term::from_facet(self.facets, &facet),
                    IndexRecordOption::Basic,
                )),
            ));
        }
        if clauses.is_empty() {
            Box::new(AllQuery)
        } else {
            Box::new(BooleanQuery::new(clauses))
        }
    }

    fn load_document(
        &self,
        searcher: &tantivy::Searcher,
        addr: tantivy::DocAddress,
    ) -> Result<Document> {
        let stored: TantivyDocument = searcher.doc(addr)?;
        let json = stored
            .get_first(self.source)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                FacetNavError::Tantivy(format!("stored document {:?} has no source", addr))
            })?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        Document::from_json(&value)
    }
}

impl FacetedNavigationEngine for TantivyEngine {
    fn view(
        &self,
        request: &ViewRequest<'_>,
        facet_counts: Option<&mut FacetCountRequest>,
    ) -> Result<NavigationResult> {
        let t0 = std::time::Instant::now();
        let constraints = request.effective_constraints();
        let query = self.build_query(request.query.map(|q| q.docbase.as_str()), &constraints);
        let searcher = self.reader.searcher();

        let length = match facet_counts {
            Some(counts) if !counts.is_empty() => {
                let mut collector = FacetCollector::for_field(FACETS_FIELD);
                for facet in counts.keys() {
                    collector.add_facet(Facet::from_path([facet.as_str()]));
                }
                let (length, facet_counts) = searcher.search(query.as_ref(), &(Count, collector))?;
                for (facet, buckets) in counts.iter_mut() {
                    for (child, count) in facet_counts.get(Facet::from_path([facet.as_str()])) {
                        if let Some(t) = child.to_path().last() {
                            *buckets.entry((*t).to_string()).or_insert(0) += count;
                        }
                    }
                }
                length
            }
            _ => searcher.search(query.as_ref(), &Count)?,
        };

        let mut hits = Vec::new();
        if request.hits_requested {
            let addresses = searcher.search(query.as_ref(), &DocSetCollector)?;
            for addr in addresses {
                hits.push(self.load_document(&searcher, addr)?);
            }
            sort_hits(&mut hits, request.order_by);
            if let Some(limit) = request.limit {
                hits.truncate(limit);
            }
        }

        tracing::debug!(
            "[TANTIVY] constraints={} length={} hits={} took={:?}",
            constraints.len(),
            length,
            hits.len(),
            t0.elapsed()
        );

        Ok(NavigationResult {
            length: length as u64,
            hits,
        })
    }
}

fn path_facet(path: &str) -> Facet {
    Facet::from_path(path.split('/').filter(|s| !s.is_empty()))
}
