//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! alias = "@site"     # Prefix standing for the site root in document sources
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Alias standing for the site root in aliased source paths.
    pub alias: String,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            alias: "@site".to_string(),
        }
    }
}

impl SiteSectionConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.alias.is_empty() || self.alias.contains('/') {
            diag.error_with_hint(
                "site.alias",
                format!("invalid alias `{}`", self.alias),
                "use a single path segment such as \"@site\"",
            );
        }
    }
}
