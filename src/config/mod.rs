//! Site configuration management for `rawdocs.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── docs       # [docs]
//! │   ├── editor     # [editor]
//! │   ├── site       # [site]
//! │   └── watch      # [watch]
//! ├── types/         # ConfigError, global handle
//! └── mod.rs         # SiteConfig (this file)
//! ```

pub mod section;
pub mod types;
mod util;

pub use section::{
    BuildSectionConfig, DocsConfig, EditorConfig, SiteSectionConfig, WatchConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, cfg, init_config, reload_config};

use crate::{cli::BuildArgs, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::{find_config_file, resolve_config_path};

/// Directory under the output dir holding everything rawdocs generates.
const GENERATED_DIR: &str = ".rawdocs";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing rawdocs.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Site root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// CLI overrides applied on top of the file (re-applied on reload)
    #[serde(skip)]
    pub overrides: Option<BuildArgs>,

    #[serde(default)]
    pub site: SiteSectionConfig,

    #[serde(default)]
    pub docs: DocsConfig,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub build: BuildSectionConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl SiteConfig {
    /// Search upward from the current directory for `config_name` and load it.
    pub fn discover(config_name: &Path) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let path = find_config_file(config_name, &cwd).ok_or_else(|| {
            ConfigError::Validation(format!(
                "config file '{}' not found in {} or any parent directory",
                config_name.display(),
                cwd.display()
            ))
        })?;
        Self::load(&path)
    }

    /// Load, normalize and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.config_path = crate::utils::path::normalize_path(path);
        let root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.finalize(&root);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string (no path normalization).
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Anchor every configured path at `root`.
    pub fn finalize(&mut self, root: &Path) {
        self.root = crate::utils::path::normalize_path(root);
        self.docs.path = resolve_config_path(&self.docs.path, &self.root);
        self.build.output = resolve_config_path(&self.build.output, &self.root);
    }

    /// Apply `build`/`watch` command options on top of the file config.
    pub fn apply_build_args(&mut self, args: &BuildArgs) {
        if let Some(output) = &args.output {
            self.build.output = resolve_config_path(output, &self.root);
        }
        if let Some(strict) = args.strict {
            self.editor.strict = strict;
        }
        self.build.clean |= args.clean;
        self.overrides = Some(args.clone());
    }

    /// Validate all sections, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.site.validate(&mut diag);
        self.docs.validate(&mut diag);
        self.editor.validate(&mut diag);
        diag.into_result()
    }

    // ========================================================================
    // paths
    // ========================================================================

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Absolute docs source directory.
    pub fn docs_dir(&self) -> &Path {
        &self.docs.path
    }

    /// Absolute build output directory.
    pub fn output_dir(&self) -> &Path {
        &self.build.output
    }

    /// Directory holding generated data, routes and staging areas.
    pub fn generated_dir(&self) -> PathBuf {
        self.build.output.join(GENERATED_DIR)
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Build a config rooted at `root` from TOML text.
/// Panics on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_config(root: &Path, toml: &str) -> SiteConfig {
    let (mut config, ignored) = SiteConfig::parse_with_ignored(toml).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    config.config_path = root.join("rawdocs.toml");
    config.finalize(root);
    config
}

// ============================================================================
// tests
// ============================================================================
