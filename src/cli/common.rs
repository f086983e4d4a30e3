//! Helpers shared by the cycle-running commands.

use anyhow::{Context, Result};
use tokio::runtime::{Builder, Runtime};

use crate::config::SiteConfig;
use crate::docs::DocsPlugin;
use crate::editor::{EditorPlugin, EditorSettings};
use crate::host::CycleReport;
use crate::utils::plural_count;

/// The plugin stack every command drives: docs wrapped by the raw source editor.
pub type SitePlugin = EditorPlugin<DocsPlugin>;

pub fn site_plugin(config: &SiteConfig) -> SitePlugin {
    EditorPlugin::new(
        DocsPlugin::from_config(config),
        EditorSettings::from_config(config),
    )
}

/// Multi-threaded runtime the load cycles are driven on.
pub fn runtime() -> Result<Runtime> {
    Builder::new_multi_thread()
        .enable_all()
        .thread_name("rawdocs-worker")
        .build()
        .context("failed to start async runtime")
}

/// One-line cycle summary: `3 docs, 5 routes, 6 artifacts in 12ms`.
pub fn describe(report: &CycleReport) -> String {
    format!(
        "{}, {}, {} in {}ms",
        plural_count(report.docs, "doc"),
        plural_count(report.routes, "route"),
        plural_count(report.artifacts, "artifact"),
        report.elapsed.as_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_describe() {
        let report = CycleReport {
            plugin: "docs".into(),
            docs: 1,
            artifacts: 2,
            routes: 3,
            elapsed: Duration::from_millis(12),
        };
        assert_eq!(describe(&report), "1 doc, 3 routes, 2 artifacts in 12ms");
    }
}
