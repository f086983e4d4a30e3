//! Docs content plugin.
//!
//! Loads Markdown documents from the docs directory and emits their routes:
//!
//! ```text
//! load_content     scan docs/ -> one "current" version
//! content_loaded   metadata artifact per doc, tag artifacts,
//!                  docs root route, tag routes, global data
//! ```

pub mod routes;
pub mod scan;
pub mod translate;


use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Command;
use owo_colors::OwoColorize;
use serde_json::json;

pub use scan::DocScanner;

use crate::config::SiteConfig;
use crate::plugin::{
    Actions, ArtifactRef, ContentLoadedArgs, ContentPlugin, DocMetadata, LoadedContent,
    LoadedVersion, PluginCli, RouteConfig, TranslationFile, WebpackConfig, WebpackUtils,
};
use crate::utils::hash::doc_hash;
use crate::utils::plural_count;
use crate::{debug, log};

/// Name the docs plugin registers under.
pub const PLUGIN_NAME: &str = "docs";

/// Version label of the unversioned docs.
const CURRENT_VERSION: &str = "current";

pub struct DocsPlugin {
    scanner: DocScanner,
}

impl DocsPlugin {
    pub fn new(scanner: DocScanner) -> Self {
        Self { scanner }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(DocScanner::from_config(config))
    }

    fn current_version(&self, docs: Vec<DocMetadata>) -> LoadedVersion {
        LoadedVersion {
            version_name: CURRENT_VERSION.to_string(),
            path: self.scanner.docs.docs_route_path(),
            tags_path: self.scanner.docs.tags_route_path(),
            docs,
        }
    }

    /// Persist per-doc metadata and emit every route of one version.
    async fn emit_version<A: Actions>(&self, version: &LoadedVersion, actions: &A) -> Result<()> {
        let mut metadata = BTreeMap::new();
        for doc in &version.docs {
            let payload = serde_json::to_string(doc)?;
            let artifact = actions
                .create_data(&format!("{}.json", doc_hash(&doc.source)), &payload)
                .await?;
            metadata.insert(doc.source.clone(), artifact);
        }

        actions.add_route(routes::docs_root_route(
            version,
            &metadata,
            &self.scanner.docs,
        ));

        let tags = routes::collect_tags(version);
        if tags.is_empty() {
            return Ok(());
        }

        let list: Vec<_> = tags
            .iter()
            .map(|t| json!({ "label": t.label, "permalink": t.permalink, "count": t.docs.len() }))
            .collect();
        let list_ref = self
            .tag_artifact("tags", &version.tags_path, &serde_json::Value::from(list), actions)
            .await?;
        actions.add_route(
            RouteConfig::new(&version.tags_path, &self.scanner.docs.tags_list_component)
                .exact()
                .with_module("tags", list_ref),
        );

        for tag in &tags {
            let tag_ref = self
                .tag_artifact("tag", &tag.permalink, &tag.to_json(), actions)
                .await?;
            actions.add_route(
                RouteConfig::new(&tag.permalink, &self.scanner.docs.tag_doc_list_component)
                    .exact()
                    .with_module("tag", tag_ref),
            );
        }
        debug!("docs"; "emitted {}", plural_count(tags.len(), "tag route"));
        Ok(())
    }

    async fn tag_artifact<A: Actions>(
        &self,
        kind: &str,
        permalink: &str,
        data: &serde_json::Value,
        actions: &A,
    ) -> Result<ArtifactRef> {
        let filename = format!("{kind}-{}.json", doc_hash(permalink));
        actions.create_data(&filename, &data.to_string()).await
    }
}

impl ContentPlugin for DocsPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn extend_cli(&self, cli: &mut PluginCli) {
        let scanner = self.scanner.clone();
        cli.command(
            Command::new("docs:list").about("List every document with its permalink"),
            move |_| {
                for doc in scanner.scan()? {
                    println!("{}  {}", doc.permalink.bright_green(), doc.source.dimmed());
                }
                Ok(())
            },
        );
    }

    fn paths_to_watch(&self) -> Vec<PathBuf> {
        vec![self.scanner.docs_dir.clone()]
    }

    async fn load_content(&self) -> Result<LoadedContent> {
        let scanner = self.scanner.clone();
        let docs = tokio::task::spawn_blocking(move || scanner.scan())
            .await
            .context("docs scan task failed")??;

        log!("docs"; "loaded {}", plural_count(docs.len(), "document"));
        Ok(LoadedContent {
            loaded_versions: vec![self.current_version(docs)],
        })
    }

    async fn content_loaded<A: Actions>(&self, args: ContentLoadedArgs<'_, A>) -> Result<()> {
        for version in &args.content.loaded_versions {
            self.emit_version(version, args.actions).await?;
        }
        args.actions.set_global_data(routes::global_data(
            &self.scanner.docs.docs_route_path(),
            &args.content.loaded_versions,
        ));
        Ok(())
    }

    fn translation_files(&self, content: &LoadedContent) -> Result<Vec<TranslationFile>> {
        Ok(translate::translation_files(content))
    }

    fn translate_content(
        &self,
        content: LoadedContent,
        translation_files: &[TranslationFile],
    ) -> LoadedContent {
        translate::translate_content(content, translation_files)
    }

    fn configure_webpack(
        &self,
        _config: &WebpackConfig,
        _is_server: bool,
        _utils: &WebpackUtils,
        _content: Option<&LoadedContent>,
    ) -> Option<WebpackConfig> {
        Some(json!({
            "resolve": { "modules": [self.scanner.docs_dir.to_string_lossy()] }
        }))
    }
}
