//! Drill-down scenarios over a small product catalog.
//!
//! The `check_*` functions take the engine as a parameter so every engine
//! backend runs the same scenarios; the tests at the bottom run them against
//! the in-memory engine.

use super::{catalog, child_names, config, mount, node, NAV};
use crate::engine::FacetedNavigationEngine;
use crate::provider::{PropertyValue, RESULT_SET_NODE};
use crate::state::NodeContext;
use crate::types::Document;
use serde_json::json;
use std::sync::Arc;

const ALL_FACETS: [&str; 5] = ["shop:brand", "color", "size", "tags", RESULT_SET_NODE];

pub(super) fn check_facets_in_configured_order(engine: Arc<dyn FacetedNavigationEngine>) {
    let (mut tree, root) = mount(engine, &config(json!({})));
    assert_eq!(
        child_names(&mut tree, root),
        vec!["shop:brand", "color", "size", "tags"]
    );
    assert_eq!(tree.path(root).as_deref(), Some(NAV));
}

pub(super) fn check_display_names_override_facets(engine: Arc<dyn FacetedNavigationEngine>) {
    let cfg = config(json!({"facetNodeNames": ["Brand", "", "Size", "Tags"]}));
    let (mut tree, root) = mount(engine, &cfg);
    assert_eq!(
        child_names(&mut tree, root),
        vec!["Brand", "color", "Size", "Tags"]
    );
    let brand = node(&mut tree, root, "Brand");
    assert_eq!(
        child_names(&mut tree, brand),
        vec!["Acme", "Globex", "Initech", RESULT_SET_NODE]
    );
}

pub(super) fn check_mismatched_display_names_hide_facets(engine: Arc<dyn FacetedNavigationEngine>) {
    let cfg = config(json!({"facetNodeNames": ["Brand"]}));
    let (mut tree, root) = mount(engine, &cfg);
    assert!(child_names(&mut tree, root).is_empty());
}

pub(super) fn check_values_sorted_by_count(engine: Arc<dyn FacetedNavigationEngine>) {
    let (mut tree, root) = mount(engine, &config(json!({})));

    let color = node(&mut tree, root, "color");
    assert_eq!(
        child_names(&mut tree, color),
        vec!["red", "blue", "green", RESULT_SET_NODE]
    );
    assert_eq!(tree.count(color).unwrap(), Some(5));

    let size = node(&mut tree, root, "size");
    assert_eq!(
        child_names(&mut tree, size),
        vec!["L", "M", "S", RESULT_SET_NODE]
    );
    let counts: Vec<Option<i64>> = tree
        .children(size)
        .unwrap()
        .into_iter()
        .take(3)
        .map(|id| tree.count(id).unwrap())
        .collect();
    assert_eq!(counts, vec![Some(2), Some(2), Some(1)]);
}

pub(super) fn check_drill_down_narrows_counts(engine: Arc<dyn FacetedNavigationEngine>) {
    let (mut tree, root) = mount(engine, &config(json!({})));

    let red = node(&mut tree, root, "color/red");
    assert_eq!(tree.count(red).unwrap(), Some(3));
    assert_eq!(child_names(&mut tree, red), ALL_FACETS.to_vec());

    let sizes = node(&mut tree, root, "color/red/size");
    assert_eq!(
        child_names(&mut tree, sizes),
        vec!["L", "S", RESULT_SET_NODE]
    );

    let large = node(&mut tree, root, "color/red/size/L");
    assert_eq!(tree.count(large).unwrap(), Some(2));
    assert_eq!(
        tree.path(large).unwrap(),
        format!("{}/color/red/size/L", NAV)
    );
}

pub(super) fn check_repeated_combination_is_not_expanded(engine: Arc<dyn FacetedNavigationEngine>) {
    let (mut tree, root) = mount(engine, &config(json!({})));

    let again = node(&mut tree, root, "color/red/color/red");
    assert_eq!(child_names(&mut tree, again), vec![RESULT_SET_NODE]);
    assert_eq!(tree.count(again).unwrap(), Some(3));

    let deeper = node(&mut tree, root, "color/red/size/L/color/red");
    assert_eq!(child_names(&mut tree, deeper), vec![RESULT_SET_NODE]);

    let deeper_size = node(&mut tree, root, "color/red/size/L/size/L");
    assert_eq!(child_names(&mut tree, deeper_size), vec![RESULT_SET_NODE]);
}

pub(super) fn check_new_value_under_stopped_facet_expands(
    engine: Arc<dyn FacetedNavigationEngine>,
) {
    let (mut tree, root) = mount(engine, &config(json!({})));

    let tags = node(&mut tree, root, "tags/new/tags");
    match tree.context(tags) {
        Some(NodeContext::Available(ctx)) => assert!(ctx.stop_sub_navigation),
        other => panic!("expected available node, got {:?}", other.map(|c| c.kind())),
    }
    assert_eq!(
        child_names(&mut tree, tags),
        vec!["new", "sale", RESULT_SET_NODE]
    );

    let repeated = node(&mut tree, root, "tags/new/tags/new");
    assert_eq!(child_names(&mut tree, repeated), vec![RESULT_SET_NODE]);

    let sale = node(&mut tree, root, "tags/new/tags/sale");
    assert_eq!(child_names(&mut tree, sale), ALL_FACETS.to_vec());
    assert_eq!(tree.count(sale).unwrap(), Some(1));
}

pub(super) fn check_every_level_has_one_result_set(engine: Arc<dyn FacetedNavigationEngine>) {
    let (mut tree, root) = mount(engine, &config(json!({})));
    for path in [
        "color",
        "color/red",
        "color/red/size",
        "color/red/size/L",
        "color/red/color/red",
    ] {
        let id = node(&mut tree, root, path);
        let names = child_names(&mut tree, id);
        let result_sets = names.iter().filter(|n| *n == RESULT_SET_NODE).count();
        assert_eq!(result_sets, 1, "{} should have one result set", path);
        assert_eq!(names.last().map(|s| s.as_str()), Some(RESULT_SET_NODE));
    }
}

pub(super) fn check_result_sets_list_matching_documents(engine: Arc<dyn FacetedNavigationEngine>) {
    let (mut tree, root) = mount(engine, &config(json!({})));

    let red = node(&mut tree, root, "color/red/hippo:resultset");
    assert_eq!(child_names(&mut tree, red), vec!["p1", "p3", "p4"]);
    assert_eq!(tree.count(red).unwrap(), Some(3));

    let tagged = node(&mut tree, root, "tags/hippo:resultset");
    assert_eq!(child_names(&mut tree, tagged), vec!["p1", "p2", "p3"]);

    let p3 = node(&mut tree, root, "color/red/hippo:resultset/p3");
    match tree.property(p3, "shop:brand").unwrap() {
        Some(PropertyValue::Strings(values)) => assert_eq!(values, vec!["Globex".to_string()]),
        other => panic!("unexpected brand property {:?}", other),
    }
}

pub(super) fn check_limit_and_sort_apply_to_result_sets(
    engine: Arc<dyn FacetedNavigationEngine>,
) {
    let cfg = config(json!({"limit": 2, "sortBy": ["price"], "sortOrder": ["descending"]}));
    let (mut tree, root) = mount(engine, &cfg);

    let red = node(&mut tree, root, "color/red/hippo:resultset");
    assert_eq!(child_names(&mut tree, red), vec!["p4", "p1"]);
    assert_eq!(tree.count(red).unwrap(), Some(3));

    let nested = node(&mut tree, root, "color/red/size/hippo:resultset");
    assert_eq!(child_names(&mut tree, nested), vec!["p4", "p1"]);
}

pub(super) fn check_view_filter_restricts_everything(engine: Arc<dyn FacetedNavigationEngine>) {
    let cfg = config(json!({"view": {"shop:brand": "Acme"}}));
    let (mut tree, root) = mount(engine, &cfg);

    let color = node(&mut tree, root, "color");
    assert_eq!(
        child_names(&mut tree, color),
        vec!["blue", "red", RESULT_SET_NODE]
    );
    assert_eq!(tree.count(color).unwrap(), Some(2));

    let results = node(&mut tree, root, "color/hippo:resultset");
    assert_eq!(child_names(&mut tree, results), vec!["p1", "p2"]);
}

pub(super) fn check_valueless_terms_are_skipped(engine: Arc<dyn FacetedNavigationEngine>) {
    let (mut tree, root) = mount(engine, &config(json!({})));
    let color = node(&mut tree, root, "color");
    assert_eq!(
        child_names(&mut tree, color),
        vec!["red", "blue", "green", RESULT_SET_NODE]
    );
    // the blank-colored document still counts as carrying the facet
    let results = node(&mut tree, root, "color/hippo:resultset");
    assert_eq!(tree.count(results).unwrap(), Some(6));
}

pub(super) fn check_docbase_scopes_counts(engine: Arc<dyn FacetedNavigationEngine>) {
    let (mut tree, root) = mount(engine.clone(), &config(json!({})));
    let red = node(&mut tree, root, "color/red");
    assert_eq!(tree.count(red).unwrap(), Some(3));

    let cfg = config(json!({"docbase": "/content"}));
    let (mut tree, root) = mount(engine, &cfg);
    let red = node(&mut tree, root, "color/red");
    assert_eq!(tree.count(red).unwrap(), Some(4));
}

/// Two text sizes "42" and one numeric size 42: same display name, different terms.
pub(super) fn catalog_with_clashing_sizes() -> Vec<Document> {
    let docs = json!([
        {"objectID": "t1", "_path": "/content/documents/t1/t1", "size": "42"},
        {"objectID": "t2", "_path": "/content/documents/t2/t2", "size": "42"},
        {"objectID": "n1", "_path": "/content/documents/n1/n1", "size": 42}
    ]);
    Document::list_from_json(&docs).unwrap()
}

pub(super) fn check_clashing_value_names_stay_reachable(engine: Arc<dyn FacetedNavigationEngine>) {
    let (mut tree, root) = mount(engine, &config(json!({})));
    let size = node(&mut tree, root, "size");
    assert_eq!(
        child_names(&mut tree, size),
        vec!["42", "42[2]", RESULT_SET_NODE]
    );

    let text = node(&mut tree, root, "size/42/hippo:resultset");
    assert_eq!(child_names(&mut tree, text), vec!["t1", "t2"]);
    let numeric = node(&mut tree, root, "size/42[2]");
    assert_eq!(tree.count(numeric).unwrap(), Some(1));
    let numeric_docs = node(&mut tree, root, "size/42[2]/hippo:resultset");
    assert_eq!(child_names(&mut tree, numeric_docs), vec!["n1"]);
}

/// Catalog plus one product whose color is blank.
pub(super) fn catalog_with_blank_color() -> Vec<Document> {
    let mut docs = catalog();
    docs.push(
        Document::from_json(&json!({
            "objectID": "p6", "_path": "/content/documents/p6/p6",
            "shop:brand": "Acme", "color": "", "size": "M"
        }))
        .unwrap(),
    );
    docs
}

mod memory_engine {
    use super::*;
    use crate::engine::MemoryEngine;

    fn engine() -> Arc<dyn FacetedNavigationEngine> {
        Arc::new(MemoryEngine::new(catalog()))
    }

    #[test]
    fn test_facets_in_configured_order() {
        check_facets_in_configured_order(engine());
    }

    #[test]
    fn test_display_names_override_facets() {
        check_display_names_override_facets(engine());
    }

    #[test]
    fn test_mismatched_display_names_hide_facets() {
        check_mismatched_display_names_hide_facets(engine());
    }

    #[test]
    fn test_values_sorted_by_count() {
        check_values_sorted_by_count(engine());
    }

    #[test]
    fn test_drill_down_narrows_counts() {
        check_drill_down_narrows_counts(engine());
    }

    #[test]
    fn test_repeated_combination_is_not_expanded() {
        check_repeated_combination_is_not_expanded(engine());
    }

    #[test]
    fn test_new_value_under_stopped_facet_expands() {
        check_new_value_under_stopped_facet_expands(engine());
    }

    #[test]
    fn test_every_level_has_one_result_set() {
        check_every_level_has_one_result_set(engine());
    }

    #[test]
    fn test_result_sets_list_matching_documents() {
        check_result_sets_list_matching_documents(engine());
    }

    #[test]
    fn test_limit_and_sort_apply_to_result_sets() {
        check_limit_and_sort_apply_to_result_sets(engine());
    }

    #[test]
    fn test_view_filter_restricts_everything() {
        check_view_filter_restricts_everything(engine());
    }

    #[test]
    fn test_valueless_terms_are_skipped() {
        check_valueless_terms_are_skipped(Arc::new(MemoryEngine::new(catalog_with_blank_color())));
    }

    #[test]
    fn test_docbase_scopes_counts() {
        check_docbase_scopes_counts(engine());
    }

    #[test]
    fn test_clashing_value_names_stay_reachable() {
        check_clashing_value_names_stay_reachable(Arc::new(MemoryEngine::new(
            catalog_with_clashing_sizes(),
        )));
    }

    #[test]
    fn test_snapshot_serializes_counts() {
        let (mut tree, root) = mount(engine(), &config(json!({})));
        let color = node(&mut tree, root, "color");
        let snapshot = serde_json::to_value(tree.snapshot(color, 1).unwrap()).unwrap();
        assert_eq!(snapshot["name"], "color");
        assert_eq!(snapshot["kind"], "available");
        assert_eq!(snapshot["count"], 5);
        assert_eq!(snapshot["children"][0]["name"], "red");
        assert_eq!(snapshot["children"][0]["count"], 3);
        assert!(snapshot["children"][0].get("children").is_none());
    }
}
