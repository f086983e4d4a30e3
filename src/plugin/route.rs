//! Route tree emitted by content plugins.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle to a persisted data artifact.
///
/// Returned by [`Actions::create_data`](super::Actions::create_data) and
/// resolved by the render runtime when a route's modules are loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactRef(String);

impl ArtifactRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Module name -> artifact reference, in stable key order.
pub type RouteModules = BTreeMap<String, ArtifactRef>;

/// One node of the generated route tree.
///
/// ```text
/// /docs               (DocPage)
/// ├── /docs/intro     (DocItem, modules: content, metadata)
/// └── /docs/guides    (DocCategoryGeneratedIndexPage)
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    /// URL path (e.g., `/docs/intro`)
    pub path: String,
    /// Component identifier rendered for this route
    pub component: String,
    /// Whether the path must match exactly
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exact: bool,
    /// Data modules loaded alongside the component
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub modules: RouteModules,
    /// Nested child routes, in emission order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteConfig>,
}

impl RouteConfig {
    pub fn new(path: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            component: component.into(),
            ..Self::default()
        }
    }

    pub fn exact(mut self) -> Self {
        self.exact = true;
        self
    }

    pub fn with_module(mut self, name: impl Into<String>, artifact: ArtifactRef) -> Self {
        self.modules.insert(name.into(), artifact);
        self
    }

    pub fn with_routes(mut self, routes: Vec<RouteConfig>) -> Self {
        self.routes = routes;
        self
    }

    /// Count this node and all descendants.
    pub fn count(&self) -> usize {
        1 + self.routes.iter().map(RouteConfig::count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_serialization_skips_empty_fields() {
        let route = RouteConfig::new("/docs/tags", "@theme/DocTagsListPage");
        let json = serde_json::to_string(&route).unwrap();
        assert_eq!(
            json,
            r#"{"path":"/docs/tags","component":"@theme/DocTagsListPage"}"#
        );
    }

    #[test]
    fn test_route_roundtrip_with_modules() {
        let route = RouteConfig::new("/docs", "@theme/DocPage").with_routes(vec![
            RouteConfig::new("/docs/intro", "@theme/DocItem")
                .exact()
                .with_module("content", ArtifactRef::new("@site/docs/intro.md")),
        ]);
        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["routes"][0]["modules"]["content"], "@site/docs/intro.md");
        assert_eq!(json["routes"][0]["exact"], true);

        let back: RouteConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, route);
    }

    #[test]
    fn test_route_count() {
        let route = RouteConfig::new("/docs", "DocPage").with_routes(vec![
            RouteConfig::new("/docs/a", "DocItem"),
            RouteConfig::new("/docs/b", "DocItem"),
        ]);
        assert_eq!(route.count(), 3);
    }
}
