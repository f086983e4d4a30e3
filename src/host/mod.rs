//! Host build runtime.
//!
//! Drives one content plugin through a full load cycle:
//!
//! ```text
//! load_content -> translation_files -> translate_content
//!   -> content_loaded (BuildActions, staged) -> configure_webpack -> commit
//! ```
//!
//! Every cycle starts from scratch. A failing cycle leaves the previous
//! cycle's published output untouched.

pub mod actions;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub use actions::BuildActions;

use crate::config::SiteConfig;
use crate::plugin::{AllContent, ContentLoadedArgs, ContentPlugin, WebpackUtils};

/// Outcome of one successful load cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub plugin: String,
    pub docs: usize,
    pub artifacts: usize,
    pub routes: usize,
    pub elapsed: Duration,
}

/// Run one complete load cycle of `plugin` and publish its output.
pub async fn run_cycle<P: ContentPlugin>(plugin: &P, config: &SiteConfig) -> Result<CycleReport> {
    let start = Instant::now();
    let generated_dir = config.generated_dir();
    tokio::fs::create_dir_all(&generated_dir)
        .await
        .with_context(|| format!("failed to create {}", generated_dir.display()))?;

    let content = plugin.load_content().await?;
    let translation_files = plugin.translation_files(&content)?;
    let content = plugin.translate_content(content, &translation_files);
    crate::debug!(
        "build";
        "{} translation file(s) for {}",
        translation_files.len(),
        plugin.name()
    );

    let mut all_content = AllContent::new();
    all_content.insert(plugin.name().to_string(), serde_json::to_value(&content)?);

    let actions = BuildActions::new(&generated_dir, plugin.name()).await?;
    plugin
        .content_loaded(ContentLoadedArgs {
            content: &content,
            all_content: &all_content,
            actions: &actions,
        })
        .await?;

    let utils = WebpackUtils {
        site_dir: config.get_root().to_path_buf(),
        generated_dir: generated_dir.clone(),
    };
    let webpack = plugin.configure_webpack(&serde_json::json!({}), false, &utils, Some(&content));

    let summary = actions.commit(webpack.as_ref()).await?;
    Ok(CycleReport {
        plugin: plugin.name().to_string(),
        docs: content.doc_count(),
        artifacts: summary.artifacts,
        routes: summary.routes,
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use anyhow::Result;
    use tempfile::TempDir;

    use super::*;
    use crate::config::test_config;
    use crate::docs::DocsPlugin;
    use crate::editor::{EditorError, EditorPlugin, EditorSettings};
    use crate::plugin::{Actions, DocMetadata, LoadedContent, LoadedVersion, RouteConfig};

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn editor(config: &SiteConfig) -> EditorPlugin<DocsPlugin> {
        EditorPlugin::new(
            DocsPlugin::from_config(config),
            EditorSettings::from_config(config),
        )
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    /// Claims a document whose file does not exist.
    struct GhostDocs;

    impl ContentPlugin for GhostDocs {
        fn name(&self) -> &str {
            "docs"
        }

        async fn load_content(&self) -> Result<LoadedContent> {
            Ok(LoadedContent {
                loaded_versions: vec![LoadedVersion {
                    version_name: "current".into(),
                    path: "/docs".into(),
                    tags_path: "/docs/tags".into(),
                    docs: vec![DocMetadata {
                        id: "ghost".into(),
                        source: "@site/docs/ghost.md".into(),
                        permalink: "/docs/ghost".into(),
                        title: "Ghost".into(),
                        tags: vec![],
                    }],
                }],
            })
        }

        async fn content_loaded<A: Actions>(&self, args: ContentLoadedArgs<'_, A>) -> Result<()> {
            args.actions.add_route(RouteConfig::new("/docs", "@theme/DocPage"));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cycle_publishes_augmented_routes() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "docs/intro.md", "# Intro\n\nraw *text*\n");
        let config = test_config(tmp.path(), "");

        let report = run_cycle(&editor(&config), &config).await.unwrap();
        assert_eq!(report.plugin, "docs");
        assert_eq!(report.docs, 1);
        assert_eq!(report.routes, 2);
        // raw source + metadata
        assert_eq!(report.artifacts, 2);

        let generated = config.generated_dir();
        let routes = read_json(&generated.join("routes.json"));
        let intro = &routes[0]["routes"][0];
        assert_eq!(intro["path"], "/docs/intro");

        let raw_ref = intro["modules"]["rawContent"].as_str().unwrap();
        let raw_name = raw_ref.strip_prefix("@generated/docs/").unwrap();
        let raw_file = generated.join("data/docs").join(raw_name);
        let raw: String = serde_json::from_str(&fs::read_to_string(raw_file).unwrap()).unwrap();
        assert_eq!(raw, "# Intro\n\nraw *text*\n");

        let global = read_json(&generated.join("globalData.json"));
        assert_eq!(global["docs"]["path"], "/docs");
        let webpack = read_json(&generated.join("webpack.json"));
        assert!(webpack["resolve"]["modules"].is_array());
    }

    #[tokio::test]
    async fn test_failed_cycle_keeps_previous_output() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "docs/intro.md", "intro");
        let config = test_config(tmp.path(), "");
        run_cycle(&editor(&config), &config).await.unwrap();

        let generated = config.generated_dir();
        let before = fs::read_to_string(generated.join("routes.json")).unwrap();

        let ghost = EditorPlugin::new(GhostDocs, EditorSettings::from_config(&config));
        let err = run_cycle(&ghost, &config).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EditorError>(),
            Some(EditorError::FileRead { .. })
        ));

        assert_eq!(fs::read_to_string(generated.join("routes.json")).unwrap(), before);
        let staging: Vec<_> = fs::read_dir(&generated)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                name.starts_with("staging-") || name.starts_with("retired-")
            })
            .collect();
        assert!(staging.is_empty());
    }

    /// Raw source references in the published route table whose file is missing.
    fn dangling_raw_refs(config: &SiteConfig) -> Vec<String> {
        let generated = config.generated_dir();
        let routes = read_json(&generated.join("routes.json"));
        let mut dangling = Vec::new();
        for child in routes[0]["routes"].as_array().unwrap() {
            let Some(raw_ref) = child["modules"]["rawContent"].as_str() else {
                continue;
            };
            let name = raw_ref.strip_prefix("@generated/docs/").unwrap();
            if !generated.join("data/docs").join(name).exists() {
                dangling.push(raw_ref.to_string());
            }
        }
        dangling
    }

    #[tokio::test]
    async fn test_failed_publish_keeps_route_table_consistent() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "docs/intro.md", "intro");
        write(tmp.path(), "docs/old.md", "old");
        let config = test_config(tmp.path(), "");
        run_cycle(&editor(&config), &config).await.unwrap();

        let generated = config.generated_dir();
        let before = fs::read_to_string(generated.join("routes.json")).unwrap();

        fs::remove_file(tmp.path().join("docs/old.md")).unwrap();
        fs::create_dir(generated.join("routes.json.tmp")).unwrap();
        assert!(run_cycle(&editor(&config), &config).await.is_err());

        assert_eq!(fs::read_to_string(generated.join("routes.json")).unwrap(), before);
        assert!(before.contains("/docs/old"));
        assert_eq!(dangling_raw_refs(&config), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_strict_cycle_without_matches_fails() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "docs/intro.md", "intro");
        let config = test_config(
            tmp.path(),
            "[editor]\nstrict = true\n[docs]\ndoc_item_component = \"Custom\"\n",
        );

        // The docs plugin still emits the default component name
        let mut docs_config = config.clone();
        docs_config.docs.doc_item_component = "@theme/DocItem".into();
        let plugin = EditorPlugin::new(
            DocsPlugin::from_config(&docs_config),
            EditorSettings::from_config(&config),
        );
        let err = run_cycle(&plugin, &config).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EditorError>(),
            Some(EditorError::NoRouteMatched { docs: 1, .. })
        ));
        assert!(!config.generated_dir().join("routes.json").exists());
    }
}
