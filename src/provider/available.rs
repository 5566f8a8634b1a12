use super::{ChildNodeEntry, FacetNavigation, FacetNavigationEntry, VirtualNodeState, RESULT_SET_NODE};
use crate::engine::{FacetCountRequest, ViewRequest};
use crate::error::Result;
use crate::name::{encode_node_name, NameKind};
use crate::state::{appended, FacetValueCombi, NavigationContext, NodeContext, SearchConstraint};
use std::collections::BTreeMap;

impl FacetNavigation {
    /// Populate a "which values exist for this facet" node: one sub-navigation
    /// child per value bucket, sorted by count, plus the result set of
    /// everything carrying the facet.
    pub(crate) fn populate_available(&self, ctx: &NavigationContext) -> Result<VirtualNodeState> {
        let mut state = VirtualNodeState::default();

        let Some(facet) = ctx.current_facet.as_deref() else {
            tracing::warn!("[AVAILABLE] node has no current facet; nothing to expand");
            return Ok(state);
        };

        let resolved = match self.names.resolve_name(facet) {
            Ok(name) => name.to_string(),
            Err(e) if e.is_name_error() => {
                tracing::warn!("[AVAILABLE] cannot resolve facet '{}': {}", facet, e);
                return Ok(state);
            }
            Err(e) => return Err(e),
        };

        let query = self.engine.parse(ctx.docbase.as_deref())?;
        let request = ViewRequest::counts(query.as_ref(), &ctx.current_search, &ctx.view);

        let mut counts = FacetCountRequest::new();
        counts.insert(resolved.clone(), BTreeMap::new());
        self.engine.view(&request, Some(&mut counts))?;

        let total = self.engine.view(&request, None)?;
        state.set_count(total.length);

        let buckets = counts.swap_remove(&resolved).unwrap_or_default();
        for entry in FacetNavigationEntry::sorted(buckets) {
            if entry.term.chars().count() <= 1 {
                tracing::debug!(
                    "[AVAILABLE] skipping valueless term '{}' of facet '{}'",
                    entry.term,
                    facet
                );
                continue;
            }
            match self.value_child(ctx, facet, &resolved, &entry) {
                Ok(child) => state.add_child(child.name, child.context),
                Err(e) if e.is_name_error() => {
                    tracing::warn!(
                        "[AVAILABLE] skipping value '{}' of facet '{}': {}",
                        entry.term,
                        facet,
                        e
                    );
                }
                Err(e) => {
                    tracing::error!(
                        "[AVAILABLE] failed to build value '{}' of facet '{}', skipping: {}",
                        entry.term,
                        facet,
                        e
                    );
                }
            }
        }

        let search = appended(&ctx.current_search, SearchConstraint::exists(resolved.as_str()));
        state.add_child(
            RESULT_SET_NODE,
            NodeContext::ResultSet(ctx.result_set(search, None)),
        );

        tracing::debug!(
            "[AVAILABLE] facet={} count={} values={}",
            facet,
            total.length,
            state.children.len() - 1
        );
        Ok(state)
    }

    fn value_child(
        &self,
        ctx: &NavigationContext,
        facet: &str,
        resolved: &str,
        entry: &FacetNavigationEntry,
    ) -> Result<ChildNodeEntry> {
        let display = self
            .engine
            .resolve_lucene_term_to_property_string(resolved, &entry.term)?;
        let name = encode_node_name(&display, NameKind::Literal)?;

        // A combination already materialized higher up stops expansion below
        // it; a new one always gets expanded, whatever the parent decided.
        let (used, stop) = if ctx.is_used(facet, &entry.term) {
            (ctx.used_facet_value_combis.clone(), true)
        } else {
            (
                appended(
                    &ctx.used_facet_value_combis,
                    FacetValueCombi::new(facet, entry.term.as_str()),
                ),
                false,
            )
        };

        let child = NavigationContext {
            available_facets: ctx.available_facets.clone(),
            facet_node_names: ctx.facet_node_names.clone(),
            current_facet: Some(facet.to_string()),
            current_search: appended(
                &ctx.current_search,
                SearchConstraint::term(resolved, entry.term.as_str()),
            ),
            ancestor_and_self_used_terms: appended(
                &ctx.ancestor_and_self_used_terms,
                entry.term.clone(),
            ),
            used_facet_value_combis: used,
            docbase: ctx.docbase.clone(),
            view: ctx.view.clone(),
            order: ctx.order.clone(),
            order_by: ctx.order_by.clone(),
            limit: ctx.limit,
            singled_view: ctx.singled_view,
            stop_sub_navigation: stop,
        };

        Ok(ChildNodeEntry {
            name,
            context: NodeContext::Sub(child),
        })
    }
}
