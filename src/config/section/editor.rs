//! `[editor]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [editor]
//! module_key = "rawContent"   # Module name the raw source is attached under
//! artifact_prefix = "raw"     # Prefix of raw source artifact file names
//! strict = false              # Fail the cycle when no doc route gets a raw source
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Route module name holding the raw source reference.
    pub module_key: String,

    /// Prefix for raw source artifact names. Must differ from anything the
    /// wrapped pipeline uses, since both hash the same source paths.
    pub artifact_prefix: String,

    /// Turn "documents loaded but no doc route matched" into an error.
    pub strict: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            module_key: "rawContent".to_string(),
            artifact_prefix: "raw".to_string(),
            strict: false,
        }
    }
}

impl EditorConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.module_key.is_empty() {
            diag.error("editor.module_key", "must not be empty");
        }
        if self.artifact_prefix.is_empty() {
            diag.error_with_hint(
                "editor.artifact_prefix",
                "must not be empty",
                "an empty prefix collides with the docs pipeline's own data files",
            );
        } else if self.artifact_prefix.contains(['/', '\\']) {
            diag.error("editor.artifact_prefix", "must not contain path separators");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_valid() {
        let mut diag = ConfigDiagnostics::new();
        EditorConfig::default().validate(&mut diag);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_empty_fields_rejected() {
        let editor = EditorConfig {
            module_key: String::new(),
            artifact_prefix: String::new(),
            strict: true,
        };
        let mut diag = ConfigDiagnostics::new();
        editor.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_prefix_with_separator_rejected() {
        let editor = EditorConfig {
            artifact_prefix: "raw/x".into(),
            ..EditorConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        editor.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
