//! Global config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement, so
//! watch mode can pick up edits to `rawdocs.toml` between load cycles.
//! Each cycle takes one snapshot via [`cfg`] and uses it throughout.

use crate::config::SiteConfig;
use anyhow::Result;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

static CONFIG: LazyLock<ArcSwap<SiteConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(SiteConfig::default()));

/// Hash of the config file content currently loaded.
static CONFIG_HASH: AtomicU64 = AtomicU64::new(0);

#[inline]
pub fn cfg() -> Arc<SiteConfig> {
    CONFIG.load_full()
}

/// Publish the initial configuration.
pub fn init_config(config: SiteConfig) -> Arc<SiteConfig> {
    if let Ok(content) = std::fs::read_to_string(&config.config_path) {
        CONFIG_HASH.store(crate::utils::hash::compute(&content), Ordering::Relaxed);
    }

    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}

/// Reload config from disk if content changed.
///
/// CLI overrides recorded on the current config are re-applied to the new
/// one. Returns `Ok(true)` if config was updated, `Ok(false)` if unchanged.
pub fn reload_config() -> Result<bool> {
    let current = cfg();

    let content = std::fs::read_to_string(&current.config_path)?;
    let new_hash = crate::utils::hash::compute(&content);
    if new_hash == CONFIG_HASH.load(Ordering::Relaxed) {
        return Ok(false);
    }

    let mut next = SiteConfig::load(&current.config_path)?;
    if let Some(args) = &current.overrides {
        next.apply_build_args(args);
    }

    CONFIG.store(Arc::new(next));
    CONFIG_HASH.store(new_hash, Ordering::Relaxed);
    Ok(true)
}
