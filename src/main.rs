//! rawdocs - a docs pipeline that ships each doc's raw source with its page.

#![allow(dead_code)]

mod cli;
mod config;
mod docs;
mod editor;
mod host;
mod logger;
mod plugin;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgMatches, ColorChoice, CommandFactory, FromArgMatches};
use cli::{Cli, Commands};
use config::{SiteConfig, init_config};
use plugin::{ContentPlugin, PluginCli};

fn main() -> Result<()> {
    let (plugin_cli, preloaded) = plugin_commands();
    let matches = plugin_cli.augment(Cli::command()).get_matches();
    apply_output_flags(&matches);

    if let Some((name, sub)) = matches.subcommand()
        && let Some(result) = plugin_cli.dispatch(name, sub)
    {
        return result;
    }

    let cli = Cli::from_arg_matches(&matches)?;
    let mut config = match preloaded {
        Some((path, config)) if path == cli.config => config,
        _ => SiteConfig::discover(&cli.config)?,
    };
    config.apply_build_args(cli.command.build_args());
    let config = init_config(config);

    match &cli.command {
        Commands::Build { .. } => cli::build::build_site(&config).map(|_| ()),
        Commands::Watch { .. } => cli::watch::watch_site(),
        Commands::Routes { json, .. } => cli::routes::print_routes(&config, *json),
    }
}

/// Subcommands contributed by the plugin stack of the site in scope.
///
/// Registration needs the site config, whose location is itself a CLI
/// option, so the config path comes from a lenient pre-parse. Without a
/// loadable config no plugin commands are offered. The loaded config is
/// returned with the path it was discovered from.
fn plugin_commands() -> (PluginCli, Option<(PathBuf, SiteConfig)>) {
    let mut plugin_cli = PluginCli::new();

    let config_path = Cli::command()
        .allow_external_subcommands(true)
        .ignore_errors(true)
        .try_get_matches()
        .ok()
        .and_then(|m| m.get_one::<PathBuf>("config").cloned())
        .unwrap_or_else(|| PathBuf::from("rawdocs.toml"));

    match SiteConfig::discover(&config_path) {
        Ok(config) => {
            cli::common::site_plugin(&config).extend_cli(&mut plugin_cli);
            (plugin_cli, Some((config_path, config)))
        }
        Err(_) => (plugin_cli, None),
    }
}

/// Apply `--color` and `--verbose`, which every command shares.
fn apply_output_flags(matches: &ArgMatches) {
    match matches.get_one::<ColorChoice>("color") {
        Some(ColorChoice::Always) => owo_colors::set_override(true),
        Some(ColorChoice::Never) => owo_colors::set_override(false),
        _ => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(matches.get_flag("verbose"));
}
