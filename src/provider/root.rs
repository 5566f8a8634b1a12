use super::{FacetNavigation, VirtualNodeState};
use crate::error::Result;
use crate::name::{encode_node_name, NameKind};
use crate::repository;
use crate::state::{NavigationContext, NodeContext, OrderBy, RootContext};
use std::sync::Arc;

impl FacetNavigation {
    /// Populate a real facet-navigation node: one "available" child per
    /// configured facet, in configured order.
    pub(crate) fn populate_root(&self, root: &RootContext) -> Result<VirtualNodeState> {
        let mut state = VirtualNodeState::default();
        let path = root.path.as_str();

        let docbase = self
            .repository
            .get_property(path, repository::DOCBASE)?
            .and_then(|values| values.into_iter().next());

        let facets = match self.repository.get_property(path, repository::FACETS)? {
            Some(facets) if !facets.is_empty() => facets,
            _ => {
                tracing::debug!("[FACETNAV] {} has no facets configured", path);
                return Ok(state);
            }
        };

        let facet_node_names = self
            .repository
            .get_property(path, repository::FACET_NODE_NAMES)?;
        if let Some(names) = &facet_node_names {
            if names.len() != facets.len() {
                tracing::error!(
                    "[FACETNAV] {}: {} has {} entries but {} has {}; no facet nodes will be shown",
                    path,
                    repository::FACET_NODE_NAMES,
                    names.len(),
                    repository::FACETS,
                    facets.len()
                );
                return Ok(state);
            }
        }

        let limit = self
            .repository
            .get_property(path, repository::LIMIT)?
            .and_then(|values| values.into_iter().next())
            .and_then(|raw| match raw.trim().parse::<usize>() {
                Ok(limit) => Some(limit),
                Err(e) => {
                    tracing::warn!(
                        "[FACETNAV] {}: ignoring {} '{}': {}",
                        path,
                        repository::LIMIT,
                        raw,
                        e
                    );
                    None
                }
            });

        let sort_by = self
            .repository
            .get_property(path, repository::SORT_BY)?
            .unwrap_or_default();
        let sort_order = self
            .repository
            .get_property(path, repository::SORT_ORDER)?
            .unwrap_or_default();
        let order_by: Arc<[OrderBy]> = sort_by
            .iter()
            .enumerate()
            .map(|(i, property)| OrderBy::new(property.as_str(), sort_order.get(i).map(|s| s.as_str())))
            .collect();

        let base = NavigationContext {
            available_facets: facets.into(),
            facet_node_names: facet_node_names.map(Into::into),
            current_facet: None,
            current_search: Arc::from(Vec::new()),
            ancestor_and_self_used_terms: Arc::from(Vec::new()),
            used_facet_value_combis: Arc::from(Vec::new()),
            docbase,
            view: root.view.clone(),
            order: root.order.clone(),
            order_by,
            limit,
            singled_view: root.singled_view,
            stop_sub_navigation: false,
        };

        for (index, facet) in base.available_facets.iter().enumerate() {
            let display = base.display_name(index).unwrap_or(facet.as_str());
            match encode_node_name(display, NameKind::Qualified) {
                Ok(name) => {
                    let child = NavigationContext {
                        current_facet: Some(facet.clone()),
                        ..base.clone()
                    };
                    state.add_child(name, NodeContext::Available(child));
                }
                Err(e) => {
                    tracing::warn!(
                        "[FACETNAV] {}: skipping facet '{}': {}",
                        path,
                        facet,
                        e
                    );
                }
            }
        }

        Ok(state)
    }
}
