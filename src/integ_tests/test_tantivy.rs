//! The drill-down scenarios again, counted by the tantivy engine.

use super::catalog;
use super::test_navigation::*;
use crate::engine::{FacetedNavigationEngine, MemoryEngine, TantivyEngine};
use crate::types::Document;
use std::sync::Arc;

fn engine_for(docs: &[Document]) -> Arc<dyn FacetedNavigationEngine> {
    Arc::new(TantivyEngine::from_documents(docs).unwrap())
}

fn engine() -> Arc<dyn FacetedNavigationEngine> {
    engine_for(&catalog())
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
    check_valueless_terms_are_skipped(engine_for(&catalog_with_blank_color()));
}

#[test]
fn test_docbase_scopes_counts() {
    check_docbase_scopes_counts(engine());
}

#[test]
fn test_clashing_value_names_stay_reachable() {
    check_clashing_value_names_stay_reachable(engine_for(&catalog_with_clashing_sizes()));
}

#[test]
fn test_engines_agree_on_every_count() {
    let memory: Arc<dyn FacetedNavigationEngine> = Arc::new(MemoryEngine::new(catalog()));
    let config = super::config(serde_json::json!({}));
    let (mut by_memory, memory_root) = super::mount(memory, &config);
    let (mut by_tantivy, tantivy_root) = super::mount(engine(), &config);
    let expected = serde_json::to_value(by_memory.snapshot(memory_root, 4).unwrap()).unwrap();
    let actual = serde_json::to_value(by_tantivy.snapshot(tantivy_root, 4).unwrap()).unwrap();
    assert_eq!(expected, actual);
}
