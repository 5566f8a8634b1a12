//! Faceted navigation as virtual repository nodes.
//!
//! A faceted-navigation node stored in the repository names a docbase and a
//! list of facets. Below it this crate synthesizes a drill-down tree on
//! demand: one node per facet, one node per value of that facet (with its
//! document count), again one node per facet below each value, and so on,
//! with a result-set node at every level listing the matching documents.
//!
//! ```text
//! /content/facets/products            real node (hippo:docbase, hippo:facets)
//!   brand                             available values of "brand"
//!     Acme          (hippo:count=12)  brand = Acme
//!       color                         available values of "color" within Acme
//!         red       (hippo:count=4)   brand = Acme AND color = red
//!       hippo:resultset               the 12 Acme documents
//!     hippo:resultset                 everything that has a brand
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod name;
pub mod provider;
pub mod repository;
pub mod state;
pub mod term;
pub mod tree;
pub mod types;

#[cfg(test)]
mod integ_tests;

pub use config::{NavigationDefinition, NavigatorConfig};
pub use engine::{FacetedNavigationEngine, MemoryEngine};
#[cfg(feature = "tantivy-engine")]
pub use engine::TantivyEngine;
pub use error::{FacetNavError, Result};
pub use provider::{FacetNavigation, VirtualNodeState, COUNT_PROPERTY, RESULT_SET_NODE};
pub use tree::{NodeId, NodeSnapshot, VirtualTree};
pub use types::{Document, FieldValue};
