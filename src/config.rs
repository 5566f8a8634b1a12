use crate::error::{FacetNavError, Result};
use crate::name::NamespaceRegistry;
use crate::repository::{self, MemoryRepository};
use crate::state::{RootContext, ViewFilter};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One persisted facet-navigation node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationDefinition {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docbase: Option<String>,
    #[serde(default)]
    pub facets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet_node_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort_order: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub view: ViewFilter,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub order: ViewFilter,
    #[serde(default)]
    pub singled_view: bool,
}

impl NavigationDefinition {
    pub fn root_context(&self) -> RootContext {
        RootContext::new(self.path.clone())
            .with_view(self.view.clone())
            .with_order(self.order.clone())
            .with_singled_view(self.singled_view)
    }
}

/// Navigator configuration file: extra namespaces plus the facet-navigation
/// nodes to expose.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigatorConfig {
    #[serde(default)]
    pub namespaces: IndexMap<String, String>,
    #[serde(default)]
    pub navigations: Vec<NavigationDefinition>,
}

impl NavigatorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NavigatorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for nav in &self.navigations {
            if !nav.path.starts_with('/') {
                return Err(FacetNavError::Config(format!(
                    "navigation path '{}' is not absolute",
                    nav.path
                )));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for nav in &self.navigations {
            if !seen.insert(nav.path.trim_end_matches('/')) {
                return Err(FacetNavError::Config(format!(
                    "navigation path '{}' is defined twice",
                    nav.path
                )));
            }
        }
        Ok(())
    }

    /// Built-in prefixes plus the configured ones.
    pub fn namespace_registry(&self) -> Result<NamespaceRegistry> {
        let mut registry = NamespaceRegistry::new();
        for (prefix, uri) in &self.namespaces {
            registry
                .register(prefix, uri)
                .map_err(|e| FacetNavError::Config(e.to_string()))?;
        }
        Ok(registry)
    }

    /// Persist every navigation definition as a real node.
    pub fn into_repository(&self) -> Result<MemoryRepository> {
        let repo = MemoryRepository::new();
        for nav in &self.navigations {
            repo.add_node(&nav.path)?;
            if let Some(docbase) = &nav.docbase {
                repo.set_property(&nav.path, repository::DOCBASE, [docbase.as_str()])?;
            }
            if !nav.facets.is_empty() {
                repo.set_property(&nav.path, repository::FACETS, nav.facets.iter().cloned())?;
            }
            if let Some(names) = &nav.facet_node_names {
                repo.set_property(&nav.path, repository::FACET_NODE_NAMES, names.iter().cloned())?;
            }
            if let Some(limit) = nav.limit {
                repo.set_property(&nav.path, repository::LIMIT, [limit.to_string()])?;
            }
            if !nav.sort_by.is_empty() {
                repo.set_property(&nav.path, repository::SORT_BY, nav.sort_by.iter().cloned())?;
            }
            if !nav.sort_order.is_empty() {
                repo.set_property(
                    &nav.path,
                    repository::SORT_ORDER,
                    nav.sort_order.iter().cloned(),
                )?;
            }
        }
        Ok(repo)
    }
}
