//! Scenario tests driving the whole navigation tree, lib-inline so they run
//! in-process with `cargo test --lib`.

mod test_navigation;
#[cfg(feature = "tantivy-engine")]
mod test_tantivy;

use crate::config::NavigatorConfig;
use crate::engine::FacetedNavigationEngine;
use crate::provider::FacetNavigation;
use crate::tree::{NodeId, VirtualTree};
use crate::types::Document;
use serde_json::json;
use std::sync::Arc;

pub(crate) const NAV: &str = "/content/facets/products";

pub(crate) fn catalog() -> Vec<Document> {
    let docs = json!([
        {"objectID": "p1", "_path": "/content/documents/p1/p1",
         "shop:brand": "Acme", "color": "red", "size": "L", "tags": ["new", "sale"], "price": 30},
        {"objectID": "p2", "_path": "/content/documents/p2/p2",
         "shop:brand": "Acme", "color": "blue", "size": "M", "tags": ["new"], "price": 20},
        {"objectID": "p3", "_path": "/content/documents/p3/p3",
         "shop:brand": "Globex", "color": "red", "size": "L", "tags": ["sale"], "price": 10},
        {"objectID": "p4", "_path": "/content/documents/p4/p4",
         "shop:brand": "Globex", "color": "red", "size": "S", "price": 50},
        {"objectID": "p5", "_path": "/content/documents/p5/p5",
         "shop:brand": "Initech", "color": "green", "size": "M", "price": 40},
        {"objectID": "x1", "_path": "/content/archive/x1/x1",
         "shop:brand": "Acme", "color": "red", "size": "L", "price": 99}
    ]);
    Document::list_from_json(&docs).unwrap()
}

pub(crate) fn config(extra: serde_json::Value) -> NavigatorConfig {
    let mut nav = json!({
        "path": NAV,
        "docbase": "/content/documents",
        "facets": ["shop:brand", "color", "size", "tags"]
    });
    if let (Some(base), Some(extra)) = (nav.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    serde_json::from_value(json!({
        "namespaces": {"shop": "http://example.org/shop/1.0"},
        "navigations": [nav]
    }))
    .unwrap()
}

pub(crate) fn mount(
    engine: Arc<dyn FacetedNavigationEngine>,
    config: &NavigatorConfig,
) -> (VirtualTree, NodeId) {
    let navigation = FacetNavigation::new(
        engine,
        Arc::new(config.into_repository().unwrap()),
        Arc::new(config.namespace_registry().unwrap()),
    );
    let mut tree = VirtualTree::new(Arc::new(navigation));
    let root = tree.mount(config.navigations[0].root_context());
    (tree, root)
}

pub(crate) fn child_names(tree: &mut VirtualTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .unwrap()
        .into_iter()
        .map(|c| tree.name(c).unwrap().to_string())
        .collect()
}

pub(crate) fn node(tree: &mut VirtualTree, root: NodeId, path: &str) -> NodeId {
    tree.resolve(root, path)
        .unwrap()
        .unwrap_or_else(|| panic!("{} does not resolve", path))
}
