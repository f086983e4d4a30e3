//! Raw source plugin.
//!
//! [`EditorPlugin`] wraps a docs content plugin and forwards every lifecycle
//! stage to it unchanged, except `content_loaded`:
//!
//! ```text
//! content_loaded
//!   1. require exactly one loaded version
//!   2. persist each doc's raw source      (store)   -> PathMapping
//!   3. run the wrapped content_loaded with AugmentingActions
//!        add_route(route) -> buffered
//!   4. augment_all(buffered routes) -> check matches -> host add_route
//! ```
//!
//! The mapping lives only for the duration of one `content_loaded` call.

mod actions;
pub mod augment;
pub mod error;
pub mod key;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

use std::path::PathBuf;

use anyhow::Result;

pub use actions::AugmentingActions;
pub use augment::{AugmentStats, AugmentTarget};
pub use error::EditorError;
pub use store::RawArtifactStore;

use key::PathMapping;

use crate::config::SiteConfig;
use crate::plugin::{
    Actions, ContentLoadedArgs, ContentPlugin, LoadedContent, LoadedVersion, PluginCli,
    TranslationFile, WebpackConfig, WebpackUtils,
};
use crate::utils::plural_count;
use crate::{debug, log};

/// Settings for the raw source plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    /// Site root that the source alias stands for
    pub site_dir: PathBuf,
    /// Source path alias (`@site`)
    pub alias: String,
    /// Raw source artifact name prefix
    pub artifact_prefix: String,
    /// Route module name for the raw source
    pub module_key: String,
    /// Component identifier of doc item routes
    pub doc_item_component: String,
    /// Fail when no doc route matched
    pub strict: bool,
}

impl EditorSettings {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            site_dir: config.get_root().to_path_buf(),
            alias: config.site.alias.clone(),
            artifact_prefix: config.editor.artifact_prefix.clone(),
            module_key: config.editor.module_key.clone(),
            doc_item_component: config.docs.doc_item_component.clone(),
            strict: config.editor.strict,
        }
    }
}

/// Decorator adding a raw source module to every doc route of `P`.
pub struct EditorPlugin<P> {
    inner: P,
    settings: EditorSettings,
}

impl<P: ContentPlugin> EditorPlugin<P> {
    pub fn new(inner: P, settings: EditorSettings) -> Self {
        Self { inner, settings }
    }

    #[cfg(test)]
    pub fn inner(&self) -> &P {
        &self.inner
    }

    fn store(&self) -> RawArtifactStore<'_> {
        RawArtifactStore::new(
            &self.settings.site_dir,
            &self.settings.alias,
            &self.settings.artifact_prefix,
        )
    }

    fn target(&self, version: &LoadedVersion) -> AugmentTarget {
        AugmentTarget {
            docs_path: version.path.clone(),
            tags_path: version.tags_path.clone(),
            doc_item_component: self.settings.doc_item_component.clone(),
            module_key: self.settings.module_key.clone(),
        }
    }

    /// Report (or, in strict mode, reject) a cycle where nothing matched.
    fn check_matches(&self, mapping: &PathMapping, stats: AugmentStats) -> Result<()> {
        debug!(
            "editor";
            "{} inspected, {} doc routes, {} matched, {} missed",
            plural_count(stats.candidates, "route"),
            stats.doc_items,
            stats.matched,
            stats.missed
        );

        if mapping.is_empty() || stats.matched > 0 {
            return Ok(());
        }

        let docs = mapping.len();
        if self.settings.strict {
            return Err(EditorError::NoRouteMatched {
                docs,
                doc_items: stats.doc_items,
            }
            .into());
        }

        log!(
            "warning";
            "{} loaded but no doc route received a raw source (checked {} doc routes)",
            plural_count(docs, "document"),
            stats.doc_items
        );
        Ok(())
    }
}

/// The single loaded version, or a precondition error.
fn single_version(content: &LoadedContent) -> Result<&LoadedVersion, EditorError> {
    match content.loaded_versions.as_slice() {
        [version] => Ok(version),
        versions => Err(EditorError::Precondition {
            versions: versions.len(),
        }),
    }
}

impl<P: ContentPlugin> ContentPlugin for EditorPlugin<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn extend_cli(&self, cli: &mut PluginCli) {
        self.inner.extend_cli(cli);
    }

    fn paths_to_watch(&self) -> Vec<PathBuf> {
        self.inner.paths_to_watch()
    }

    async fn load_content(&self) -> Result<LoadedContent> {
        self.inner.load_content().await
    }

    async fn content_loaded<A: Actions>(&self, args: ContentLoadedArgs<'_, A>) -> Result<()> {
        let version = single_version(args.content)?;

        let mapping = self.store().persist_all(&version.docs, args.actions).await?;
        debug!("editor"; "persisted {}", plural_count(mapping.len(), "raw source"));

        let target = self.target(version);
        let actions = AugmentingActions::new(args.actions, &mapping, &target);
        self.inner
            .content_loaded(ContentLoadedArgs {
                content: args.content,
                all_content: args.all_content,
                actions: &actions,
            })
            .await?;

        let (routes, stats) = actions.finish();
        self.check_matches(&mapping, stats)?;
        for route in routes {
            args.actions.add_route(route);
        }
        Ok(())
    }

    fn translation_files(&self, content: &LoadedContent) -> Result<Vec<TranslationFile>> {
        self.inner.translation_files(content)
    }

    fn translate_content(
        &self,
        content: LoadedContent,
        translation_files: &[TranslationFile],
    ) -> LoadedContent {
        self.inner.translate_content(content, translation_files)
    }

    fn configure_webpack(
        &self,
        config: &WebpackConfig,
        is_server: bool,
        utils: &WebpackUtils,
        content: Option<&LoadedContent>,
    ) -> Option<WebpackConfig> {
        self.inner
            .configure_webpack(config, is_server, utils, content)
    }
}
