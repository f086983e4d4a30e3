//! Route lookup keys derived from document source paths.
//!
//! A document's source path (`@site/docs/guides/setup.md`) becomes its key
//! by dropping the site alias and the file extension (`/docs/guides/setup`).
//! Doc routes whose path equals a key receive that document's raw source.

use std::borrow::Borrow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;

use super::error::EditorError;
use crate::plugin::ArtifactRef;

/// Trailing extension: the shortest suffix starting at a dot with no `/` or `.`.
static EXTENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.[^/.]+$").unwrap());

/// Canonical lookup key for one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey(String);

impl Borrow<str> for PathKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the lookup key for `source`.
///
/// `alias` is only stripped when it is a whole leading path segment, so
/// `@site-extra/x.md` keeps its prefix.
///
/// ```text
/// normalize("@site/docs/intro.md", "@site")      -> /docs/intro
/// normalize("@site/docs/v1.2/notes.md", "@site") -> /docs/v1.2/notes
/// normalize("@site/docs/README", "@site")        -> /docs/README
/// ```
pub fn normalize(source: &str, alias: &str) -> PathKey {
    let without_alias = match source.strip_prefix(alias) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => source,
    };
    PathKey(EXTENSION.replace(without_alias, "").into_owned())
}

#[derive(Debug, Clone)]
struct MappingEntry {
    artifact: ArtifactRef,
    source: String,
}

/// Immutable key -> raw source artifact mapping for one load cycle.
///
/// Built once from every persisted document, then only read.
#[derive(Debug, Clone, Default)]
pub struct PathMapping {
    entries: FxHashMap<PathKey, MappingEntry>,
}

impl PathMapping {
    /// Build the mapping from `(source, artifact)` pairs in document order.
    ///
    /// Fails on the first pair of distinct sources that share a key; later
    /// documents never silently replace earlier ones.
    pub fn build<I>(persisted: I, alias: &str) -> Result<Self, EditorError>
    where
        I: IntoIterator<Item = (String, ArtifactRef)>,
    {
        let mut entries: FxHashMap<PathKey, MappingEntry> = FxHashMap::default();

        for (source, artifact) in persisted {
            let key = normalize(&source, alias);
            if let Some(existing) = entries.get(&key)
                && existing.source != source
            {
                return Err(EditorError::KeyCollision {
                    key: key.to_string(),
                    first: existing.source.clone(),
                    second: source,
                });
            }
            entries.insert(key, MappingEntry { artifact, source });
        }

        Ok(Self { entries })
    }

    /// Artifact for a route path (exact match).
    #[inline]
    pub fn get(&self, route_path: &str) -> Option<&ArtifactRef> {
        self.entries.get(route_path).map(|e| &e.artifact)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
