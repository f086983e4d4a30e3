//! `rawdocs build`: one load cycle.

use std::fs;

use anyhow::{Context, Result};

use super::common::{describe, runtime, site_plugin};
use crate::config::SiteConfig;
use crate::host::{CycleReport, run_cycle};
use crate::log;
use crate::utils::path::display_relative;

/// Remove everything rawdocs generated under the output dir.
pub fn clean_generated(config: &SiteConfig) -> Result<()> {
    let generated = config.generated_dir();
    if generated.exists() {
        fs::remove_dir_all(&generated).with_context(|| {
            format!("Failed to clear generated directory: {}", generated.display())
        })?;
        log!("build"; "cleaned {}", display_relative(&generated, config.get_root()));
    }
    Ok(())
}

/// Run a single load cycle with `config`.
pub fn build_site(config: &SiteConfig) -> Result<CycleReport> {
    if config.build.clean {
        clean_generated(config)?;
    }

    let plugin = site_plugin(config);
    let report = runtime()?.block_on(run_cycle(&plugin, config))?;

    log!(
        "build";
        "{} -> {}",
        describe(&report),
        display_relative(&config.generated_dir(), config.get_root())
    );
    Ok(report)
}
