use super::VirtualNodeState;
use crate::engine::{FacetedNavigationEngine, ViewRequest};
use crate::error::Result;
use crate::name::{encode_node_name, NameKind};
use crate::state::{DocumentContext, NodeContext, ResultSetContext, ViewFilter};
use crate::types::Document;
use indexmap::IndexMap;

/// Materializes the documents matching a result-set node's constraints.
pub trait ResultSetProvider: Send + Sync {
    fn populate(
        &self,
        engine: &dyn FacetedNavigationEngine,
        ctx: &ResultSetContext,
    ) -> Result<VirtualNodeState>;
}

/// Emits one document child per hit, in engine order.
///
/// In a singled view only one variant per handle (parent path) is shown: the
/// one matching most of the preferred `order` values, the first hit on ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacetResultSetProvider;

impl ResultSetProvider for FacetResultSetProvider {
    fn populate(
        &self,
        engine: &dyn FacetedNavigationEngine,
        ctx: &ResultSetContext,
    ) -> Result<VirtualNodeState> {
        let mut state = VirtualNodeState::default();

        let query = engine.parse(ctx.docbase.as_deref())?;
        let request = ViewRequest {
            query: query.as_ref(),
            constraints: &ctx.search,
            view: &ctx.view,
            limit: if ctx.singled_view { None } else { ctx.limit },
            order_by: &ctx.order_by,
            hits_requested: true,
        };
        let result = engine.view(&request, None)?;

        let (hits, count) = if ctx.singled_view {
            let mut collapsed = collapse_variants(result.hits, &ctx.order);
            let count = collapsed.len() as u64;
            if let Some(limit) = ctx.limit {
                collapsed.truncate(limit);
            }
            (collapsed, count)
        } else {
            (result.hits, ctx.count.unwrap_or(result.length))
        };
        state.set_count(count);

        for doc in hits {
            let name = match encode_node_name(&doc.id, NameKind::Literal) {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!("[RESULTSET] skipping document '{}': {}", doc.id, e);
                    continue;
                }
            };
            state.add_child(name, NodeContext::Document(document_context(doc)));
        }

        tracing::debug!(
            "[RESULTSET] constraints={} count={} shown={}",
            ctx.search.len(),
            count,
            state.children.len()
        );
        Ok(state)
    }
}

fn document_context(doc: Document) -> DocumentContext {
    let mut names: Vec<&String> = doc.fields.keys().collect();
    names.sort();
    let properties: IndexMap<String, Vec<String>> = names
        .into_iter()
        .map(|name| {
            let values = doc.fields[name]
                .values()
                .into_iter()
                .map(|v| v.to_display_string())
                .collect();
            (name.clone(), values)
        })
        .collect();
    DocumentContext {
        id: doc.id,
        path: doc.path,
        properties,
    }
}

fn preference_score(doc: &Document, order: &ViewFilter) -> usize {
    order
        .iter()
        .filter(|(property, wanted)| {
            doc.fields
                .get(property.as_str())
                .map(|v| v.values().iter().any(|x| x.to_display_string() == **wanted))
                .unwrap_or(false)
        })
        .count()
}

/// One document per handle, keeping the order handles first appear in.
fn collapse_variants(hits: Vec<Document>, order: &ViewFilter) -> Vec<Document> {
    let mut by_handle: IndexMap<String, (usize, Document)> = IndexMap::new();
    for doc in hits {
        let score = preference_score(&doc, order);
        match by_handle.get_mut(doc.handle()) {
            Some(best) if score > best.0 => *best = (score, doc),
            Some(_) => {}
            None => {
                by_handle.insert(doc.handle().to_string(), (score, doc));
            }
        }
    }
    by_handle.into_values().map(|(_, doc)| doc).collect()
}
