//! Content data exchanged across the plugin lifecycle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata for one loaded document.
///
/// `source` is the aliased, site-relative identifier of the backing file
/// (e.g. `@site/docs/guides/setup.md`). The raw text is not kept here; it is
/// read from disk when a consumer needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocMetadata {
    /// Document id, relative to the docs dir without extension (`guides/setup`)
    pub id: String,
    /// Aliased source path (`@site/docs/guides/setup.md`)
    pub source: String,
    /// Public URL path of the rendered page (`/docs/guides/setup`)
    pub permalink: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One content version produced by `load_content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedVersion {
    /// Version label (`current` for the unversioned docs)
    pub version_name: String,
    /// Docs root route path (`/docs`)
    pub path: String,
    /// Tags root route path (`/docs/tags`)
    pub tags_path: String,
    /// Documents in load order
    pub docs: Vec<DocMetadata>,
}

/// Output of the load stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedContent {
    pub loaded_versions: Vec<LoadedVersion>,
}

impl LoadedContent {
    /// Total number of documents across all versions.
    pub fn doc_count(&self) -> usize {
        self.loaded_versions.iter().map(|v| v.docs.len()).sum()
    }
}

/// Every plugin's loaded content, keyed by plugin name.
pub type AllContent = BTreeMap<String, serde_json::Value>;

/// A translation file: message id -> message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationFile {
    /// Logical file path, relative to the plugin's i18n directory
    pub path: String,
    pub content: BTreeMap<String, TranslationMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Opaque bundler configuration document.
pub type WebpackConfig = serde_json::Value;

/// Helpers the host passes to `configure_webpack`.
#[derive(Debug, Clone, Default)]
pub struct WebpackUtils {
    /// Site root directory
    pub site_dir: std::path::PathBuf,
    /// Directory generated data artifacts are written to
    pub generated_dir: std::path::PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loaded_content_camel_case() {
        let content = LoadedContent {
            loaded_versions: vec![LoadedVersion {
                version_name: "current".into(),
                path: "/docs".into(),
                tags_path: "/docs/tags".into(),
                docs: vec![],
            }],
        };
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["loadedVersions"][0]["tagsPath"], "/docs/tags");
        assert_eq!(json["loadedVersions"][0]["versionName"], "current");
    }

    #[test]
    fn test_doc_count() {
        let doc = DocMetadata {
            id: "intro".into(),
            source: "@site/docs/intro.md".into(),
            permalink: "/docs/intro".into(),
            title: "Intro".into(),
            tags: vec![],
        };
        let version = LoadedVersion {
            version_name: "current".into(),
            path: "/docs".into(),
            tags_path: "/docs/tags".into(),
            docs: vec![doc.clone(), doc],
        };
        let content = LoadedContent {
            loaded_versions: vec![version.clone(), version],
        };
        assert_eq!(content.doc_count(), 4);
    }
}
