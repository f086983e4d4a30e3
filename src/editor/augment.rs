//! Attach raw source modules to generated doc routes.
//!
//! Routes are matched by path prefix and component identity, not by their
//! position in the tree:
//!
//! ```text
//! /docs                      candidate: under docs root, not tags, has children
//! ├── /docs/intro  DocItem   gets modules.rawContent if the mapping has /docs/intro
//! └── /docs/guides Category  untouched (not a doc item)
//! /docs/tags                 untouched (tags root)
//! /docs/tags/rust            untouched (tags root)
//! ```

use super::key::PathMapping;
use crate::plugin::RouteConfig;

/// What a doc route looks like for the wrapped pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentTarget {
    /// Docs root route path (`/docs`)
    pub docs_path: String,
    /// Tags root route path (`/docs/tags`)
    pub tags_path: String,
    /// Component identifier of single-document routes
    pub doc_item_component: String,
    /// Module name the raw source is attached under
    pub module_key: String,
}

impl AugmentTarget {
    /// Whether a top-level route's children should be rewritten.
    pub fn is_candidate(&self, route: &RouteConfig) -> bool {
        route.path.starts_with(&self.docs_path)
            && !route.path.starts_with(&self.tags_path)
            && !route.routes.is_empty()
    }
}

/// Counters describing what one or more `augment` calls did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AugmentStats {
    /// Top-level routes whose children were inspected
    pub candidates: usize,
    /// Child routes rendered by the doc item component
    pub doc_items: usize,
    /// Doc item routes that received a raw source module
    pub matched: usize,
    /// Doc item routes with no mapping entry
    pub missed: usize,
}

impl AugmentStats {
    pub fn merge(&mut self, other: Self) {
        self.candidates += other.candidates;
        self.doc_items += other.doc_items;
        self.matched += other.matched;
        self.missed += other.missed;
    }
}

/// Rewrite one top-level route.
///
/// Non-candidates are returned as-is. For candidates only the `routes`
/// list changes, and within it only doc item children gain a module entry.
pub fn augment(
    mut route: RouteConfig,
    mapping: &PathMapping,
    target: &AugmentTarget,
) -> (RouteConfig, AugmentStats) {
    let mut stats = AugmentStats::default();
    if !target.is_candidate(&route) {
        return (route, stats);
    }
    stats.candidates = 1;

    route.routes = std::mem::take(&mut route.routes)
        .into_iter()
        .map(|child| attach_raw_source(child, mapping, target, &mut stats))
        .collect();

    (route, stats)
}

/// Rewrite a list of top-level routes, summing the stats.
pub fn augment_all(
    routes: Vec<RouteConfig>,
    mapping: &PathMapping,
    target: &AugmentTarget,
) -> (Vec<RouteConfig>, AugmentStats) {
    let mut total = AugmentStats::default();
    let routes = routes
        .into_iter()
        .map(|route| {
            let (route, stats) = augment(route, mapping, target);
            total.merge(stats);
            route
        })
        .collect();
    (routes, total)
}

fn attach_raw_source(
    mut child: RouteConfig,
    mapping: &PathMapping,
    target: &AugmentTarget,
    stats: &mut AugmentStats,
) -> RouteConfig {
    if child.component != target.doc_item_component {
        return child;
    }
    stats.doc_items += 1;

    match mapping.get(&child.path) {
        Some(artifact) => {
            stats.matched += 1;
            child
                .modules
                .insert(target.module_key.clone(), artifact.clone());
        }
        None => {
            stats.missed += 1;
            crate::debug!("editor"; "no raw source for route {}", child.path);
        }
    }
    child
}
