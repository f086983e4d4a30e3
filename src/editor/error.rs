//! Raw source plugin errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    /// Anything other than exactly one content version was loaded.
    #[error("exactly one content version is supported, found {versions}")]
    Precondition { versions: usize },

    /// A document's source file could not be read.
    #[error("failed to read raw source `{source_path}` ({})", .path.display())]
    FileRead {
        source_path: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two documents normalize to the same lookup key.
    #[error("documents `{first}` and `{second}` both map to route key `{key}`")]
    KeyCollision {
        key: String,
        first: String,
        second: String,
    },

    /// Documents were loaded but no doc route received a raw source.
    #[error("{docs} documents loaded but none matched a doc route (checked {doc_items} doc routes)")]
    NoRouteMatched { docs: usize, doc_items: usize },
}
