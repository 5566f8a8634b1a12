use super::{ChildNodeEntry, FacetNavigation, VirtualNodeState, RESULT_SET_NODE};
use crate::engine::ViewRequest;
use crate::error::{FacetNavError, Result};
use crate::name::{encode_node_name, NameKind};
use crate::state::{NavigationContext, NodeContext};

impl FacetNavigation {
    /// Populate a "facet = value" node: its own count, then (unless stopped)
    /// one "available" child per configured facet, plus the result set.
    pub(crate) fn populate_sub(&self, ctx: &NavigationContext) -> Result<VirtualNodeState> {
        let mut state = VirtualNodeState::default();

        let query = self.engine.parse(ctx.docbase.as_deref())?;
        let request = ViewRequest::counts(query.as_ref(), &ctx.current_search, &ctx.view);
        let result = self.engine.view(&request, None)?;
        state.set_count(result.length);

        if !ctx.stop_sub_navigation {
            for (index, facet) in ctx.available_facets.iter().enumerate() {
                match self.facet_child(ctx, index, facet) {
                    Ok(child) => state.add_child(child.name, child.context),
                    Err(e) if e.is_name_error() => {
                        tracing::warn!("[SUBNAV] skipping facet '{}': {}", facet, e);
                    }
                    Err(e) => {
                        tracing::error!("[SUBNAV] failed to build facet '{}', skipping: {}", facet, e);
                    }
                }
            }
        } else {
            tracing::debug!(
                "[SUBNAV] combination {:?} already expanded above; not drilling further",
                ctx.ancestor_and_self_used_terms
            );
        }

        state.add_child(
            RESULT_SET_NODE,
            NodeContext::ResultSet(ctx.result_set(ctx.current_search.clone(), Some(result.length))),
        );
        Ok(state)
    }

    fn facet_child(
        &self,
        ctx: &NavigationContext,
        index: usize,
        facet: &str,
    ) -> Result<ChildNodeEntry> {
        let display = ctx.display_name(index).ok_or_else(|| {
            FacetNavError::IllegalName(format!("no display name for facet '{}'", facet))
        })?;
        let name = encode_node_name(display, NameKind::Qualified)?;

        let stop = ctx
            .ancestor_and_self_used_terms
            .iter()
            .any(|term| ctx.is_used(facet, term));

        let child = NavigationContext {
            current_facet: Some(facet.to_string()),
            stop_sub_navigation: stop,
            ..ctx.clone()
        };
        Ok(ChildNodeEntry {
            name,
            context: NodeContext::Available(child),
        })
    }
}
