//! Content plugin lifecycle.
//!
//! A content plugin moves through these stages once per load cycle:
//!
//! ```text
//! load_content ─> translation_files ─> translate_content ─> content_loaded
//!                                                              │
//!                                             actions.create_data / add_route
//! ```
//!
//! `extend_cli`, `paths_to_watch` and `configure_webpack` are queried by the
//! host outside the cycle.
//!
//! Plugins compose by wrapping: a decorator holds an inner plugin and
//! forwards each stage explicitly (see `editor::EditorPlugin`).

pub mod cli;
pub mod route;
pub mod types;

use std::path::PathBuf;

use anyhow::Result;

pub use cli::PluginCli;
pub use route::{ArtifactRef, RouteConfig};
pub use types::{
    AllContent, DocMetadata, LoadedContent, LoadedVersion, TranslationFile, TranslationMessage,
    WebpackConfig, WebpackUtils,
};

/// Side effects a plugin may perform while its content is being emitted.
#[allow(async_fn_in_trait)]
pub trait Actions {
    /// Persist `payload` as a data artifact named `filename`.
    ///
    /// The returned reference resolves to the artifact at render time.
    async fn create_data(&self, filename: &str, payload: &str) -> Result<ArtifactRef>;

    /// Emit one top-level route.
    fn add_route(&self, route: RouteConfig);

    /// Publish plugin-global data to the render runtime.
    fn set_global_data(&self, data: serde_json::Value);
}

/// Arguments for [`ContentPlugin::content_loaded`].
pub struct ContentLoadedArgs<'a, A: Actions> {
    pub content: &'a LoadedContent,
    pub all_content: &'a AllContent,
    pub actions: &'a A,
}

/// The full lifecycle contract of a content plugin.
#[allow(async_fn_in_trait)]
pub trait ContentPlugin {
    /// Plugin name; also namespaces its generated data.
    fn name(&self) -> &str;

    /// Register plugin-specific subcommands.
    fn extend_cli(&self, _cli: &mut PluginCli) {}

    /// Filesystem roots whose changes should start a new load cycle.
    fn paths_to_watch(&self) -> Vec<PathBuf> {
        Vec::new()
    }

    async fn load_content(&self) -> Result<LoadedContent>;

    async fn content_loaded<A: Actions>(&self, args: ContentLoadedArgs<'_, A>) -> Result<()>;

    fn translation_files(&self, _content: &LoadedContent) -> Result<Vec<TranslationFile>> {
        Ok(Vec::new())
    }

    fn translate_content(
        &self,
        content: LoadedContent,
        _translation_files: &[TranslationFile],
    ) -> LoadedContent {
        content
    }

    /// Return a configuration patch to merge into the bundler config.
    fn configure_webpack(
        &self,
        _config: &WebpackConfig,
        _is_server: bool,
        _utils: &WebpackUtils,
        _content: Option<&LoadedContent>,
    ) -> Option<WebpackConfig> {
        None
    }
}
