//! Raw source artifacts.
//!
//! Each document's unprocessed source text is read from disk, encoded as a
//! JSON string and written through [`Actions::create_data`]. Artifact names
//! embed a hash of the source path behind a configurable prefix:
//!
//! ```text
//! @site/docs/intro.md -> raw-site-docs-intro-md-1a2b3c4d.json
//! ```
//!
//! The wrapped docs pipeline hashes the same source paths for its own
//! metadata files, so the prefix is what keeps the two namespaces apart.

use std::path::{Path, PathBuf};

use anyhow::Result;
use futures::future::try_join_all;

use super::error::EditorError;
use super::key::PathMapping;
use crate::plugin::{Actions, ArtifactRef, DocMetadata};
use crate::utils::hash::doc_hash;

/// Persists raw document sources for one site.
#[derive(Debug, Clone, Copy)]
pub struct RawArtifactStore<'a> {
    site_dir: &'a Path,
    alias: &'a str,
    prefix: &'a str,
}

impl<'a> RawArtifactStore<'a> {
    pub fn new(site_dir: &'a Path, alias: &'a str, prefix: &'a str) -> Self {
        Self {
            site_dir,
            alias,
            prefix,
        }
    }

    /// Filesystem path behind an aliased source path.
    pub fn resolve(&self, source: &str) -> PathBuf {
        match source.strip_prefix(self.alias) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => {
                self.site_dir.join(rest.trim_start_matches('/'))
            }
            _ => self.site_dir.join(source),
        }
    }

    /// Artifact file name for a source path.
    pub fn artifact_name(&self, source: &str) -> String {
        format!("{}-{}.json", self.prefix, doc_hash(source))
    }

    /// Read one document's source and persist it as a JSON string artifact.
    pub async fn persist<A: Actions>(&self, doc: &DocMetadata, actions: &A) -> Result<ArtifactRef> {
        let path = self.resolve(&doc.source);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| EditorError::FileRead {
                source_path: doc.source.clone(),
                path: path.clone(),
                source,
            })?;

        let payload = serde_json::to_string(&raw)?;
        actions
            .create_data(&self.artifact_name(&doc.source), &payload)
            .await
    }

    /// Persist every document concurrently and build the cycle's mapping.
    ///
    /// The first failure aborts the whole batch; no mapping is returned
    /// unless every document was persisted.
    pub async fn persist_all<A: Actions>(
        &self,
        docs: &[DocMetadata],
        actions: &A,
    ) -> Result<PathMapping> {
        let persisted = try_join_all(docs.iter().map(|doc| async move {
            let artifact = self.persist(doc, actions).await?;
            crate::debug!("editor"; "raw source {} -> {}", doc.source, artifact);
            Ok::<_, anyhow::Error>((doc.source.clone(), artifact))
        }))
        .await?;

        Ok(PathMapping::build(persisted, self.alias)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::testing::{RecordingActions, doc};
    use tempfile::TempDir;

    #[test]
    fn test_resolve_aliased_source() {
        let store = RawArtifactStore::new(Path::new("/site"), "@site", "raw");
        assert_eq!(
            store.resolve("@site/docs/intro.md"),
            PathBuf::from("/site/docs/intro.md")
        );
        assert_eq!(store.resolve("docs/a.md"), PathBuf::from("/site/docs/a.md"));
    }

    #[test]
    fn test_artifact_name_is_prefixed_and_deterministic() {
        let store = RawArtifactStore::new(Path::new("/site"), "@site", "raw");
        let name = store.artifact_name("@site/docs/intro.md");
        assert!(name.starts_with("raw-site-docs-intro-md-"));
        assert!(name.ends_with(".json"));
        assert_eq!(name, store.artifact_name("@site/docs/intro.md"));
        assert_ne!(name, store.artifact_name("@site/docs/other.md"));
        assert_eq!(
            name.trim_start_matches("raw-"),
            format!("{}.json", doc_hash("@site/docs/intro.md"))
        );
    }

    #[tokio::test]
    async fn test_persist_writes_json_string() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("docs")).unwrap();
        std::fs::write(tmp.path().join("docs/intro.md"), "# Intro\n\n\"quoted\" text\n").unwrap();

        let store = RawArtifactStore::new(tmp.path(), "@site", "raw");
        let actions = RecordingActions::default();
        let artifact = store
            .persist(&doc("@site/docs/intro.md", "/docs/intro"), &actions)
            .await
            .unwrap();

        let data = actions.data();
        assert_eq!(data.len(), 1);
        let (name, payload) = &data[0];
        assert_eq!(artifact.as_str(), format!("@generated/{name}"));

        let decoded: String = serde_json::from_str(payload).unwrap();
        assert_eq!(decoded, "# Intro\n\n\"quoted\" text\n");
    }

    #[tokio::test]
    async fn test_persist_missing_file() {
        let tmp = TempDir::new().unwrap();
        let store = RawArtifactStore::new(tmp.path(), "@site", "raw");
        let actions = RecordingActions::default();

        let err = store
            .persist(&doc("@site/docs/missing.md", "/docs/missing"), &actions)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<EditorError>(),
            Some(EditorError::FileRead { .. })
        ));
        assert!(actions.data().is_empty());
    }

    #[tokio::test]
    async fn test_persist_all_builds_mapping() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("docs/guides")).unwrap();
        std::fs::write(tmp.path().join("docs/intro.md"), "intro").unwrap();
        std::fs::write(tmp.path().join("docs/guides/setup.md"), "setup").unwrap();

        let store = RawArtifactStore::new(tmp.path(), "@site", "raw");
        let actions = RecordingActions::default();
        let docs = vec![
            doc("@site/docs/intro.md", "/docs/intro"),
            doc("@site/docs/guides/setup.md", "/docs/guides/setup"),
        ];

        let mapping = store.persist_all(&docs, &actions).await.unwrap();
        assert_eq!(mapping.len(), 2);
        assert!(mapping.get("/docs/intro").is_some());
        assert!(mapping.get("/docs/guides/setup").is_some());
        assert_eq!(actions.data().len(), 2);
    }

    #[tokio::test]
    async fn test_persist_all_fails_without_mapping() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("docs")).unwrap();
        std::fs::write(tmp.path().join("docs/intro.md"), "intro").unwrap();

        let store = RawArtifactStore::new(tmp.path(), "@site", "raw");
        let actions = RecordingActions::default();
        let docs = vec![
            doc("@site/docs/intro.md", "/docs/intro"),
            doc("@site/docs/gone.md", "/docs/gone"),
        ];

        let err = store.persist_all(&docs, &actions).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EditorError>(),
            Some(EditorError::FileRead { .. })
        ));
    }
}
