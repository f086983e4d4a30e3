//! `[docs]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [docs]
//! path = "docs"                  # Docs directory (relative to site root)
//! route_base_path = "docs"       # URL prefix of doc pages
//! tags_base_path = "tags"        # URL segment of tag pages, under route_base_path
//! extensions = ["md", "mdx"]     # Document file extensions
//! doc_item_component = "@theme/DocItem"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Docs source directory.
    pub path: PathBuf,

    /// URL prefix for doc pages (without leading slash).
    pub route_base_path: String,

    /// URL segment for tag pages, nested under `route_base_path`.
    pub tags_base_path: String,

    /// File extensions treated as documents.
    pub extensions: Vec<String>,

    /// Component rendering the docs root route.
    pub doc_page_component: String,

    /// Component rendering a single document.
    pub doc_item_component: String,

    /// Component rendering a generated category index.
    pub doc_category_component: String,

    /// Component rendering the list of all tags.
    pub tags_list_component: String,

    /// Component rendering the docs of one tag.
    pub tag_doc_list_component: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            path: "docs".into(),
            route_base_path: "docs".to_string(),
            tags_base_path: "tags".to_string(),
            extensions: vec!["md".to_string(), "mdx".to_string()],
            doc_page_component: "@theme/DocPage".to_string(),
            doc_item_component: "@theme/DocItem".to_string(),
            doc_category_component: "@theme/DocCategoryGeneratedIndexPage".to_string(),
            tags_list_component: "@theme/DocTagsListPage".to_string(),
            tag_doc_list_component: "@theme/DocTagDocListPage".to_string(),
        }
    }
}

impl DocsConfig {
    /// Docs root route path: `/` + route_base_path (`/docs`, or `/` when empty).
    pub fn docs_route_path(&self) -> String {
        let base = self.route_base_path.trim_matches('/');
        if base.is_empty() {
            "/".to_string()
        } else {
            format!("/{base}")
        }
    }

    /// Tags root route path (`/docs/tags`).
    pub fn tags_route_path(&self) -> String {
        let docs = self.docs_route_path();
        let tags = self.tags_base_path.trim_matches('/');
        if docs == "/" {
            format!("/{tags}")
        } else {
            format!("{docs}/{tags}")
        }
    }

    /// Whether `ext` (without dot) is a document extension.
    pub fn is_doc_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extensions.is_empty() {
            diag.error_with_hint(
                "docs.extensions",
                "no document extensions configured",
                "use extensions = [\"md\", \"mdx\"]",
            );
        }
        if self.route_base_path.split('/').any(|s| s == "..") {
            diag.error("docs.route_base_path", "must not contain `..`");
        }
        if self.tags_base_path.trim_matches('/').is_empty() {
            diag.error("docs.tags_base_path", "must not be empty");
        }
        if self.doc_item_component.is_empty() {
            diag.error("docs.doc_item_component", "must not be empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths_default() {
        let docs = DocsConfig::default();
        assert_eq!(docs.docs_route_path(), "/docs");
        assert_eq!(docs.tags_route_path(), "/docs/tags");
    }

    #[test]
    fn test_route_paths_root_base() {
        let docs = DocsConfig {
            route_base_path: "/".into(),
            ..DocsConfig::default()
        };
        assert_eq!(docs.docs_route_path(), "/");
        assert_eq!(docs.tags_route_path(), "/tags");
    }

    #[test]
    fn test_is_doc_extension() {
        let docs = DocsConfig::default();
        assert!(docs.is_doc_extension("md"));
        assert!(docs.is_doc_extension("MDX"));
        assert!(!docs.is_doc_extension("typ"));
    }

    #[test]
    fn test_validate() {
        let docs = DocsConfig {
            extensions: vec![],
            route_base_path: "../docs".into(),
            ..DocsConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        docs.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
