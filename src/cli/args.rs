//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Documentation builder that ships each doc's raw source with its page
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: rawdocs.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, default_value = "rawdocs.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run one load cycle and write routes and data artifacts
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Build, then start a new load cycle whenever watched sources change
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Build and print the emitted route tree
    #[command(visible_alias = "r")]
    Routes {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Print routes as JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
}

/// Shared arguments for commands that run load cycles
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Output directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Remove previously generated data before the first cycle
    #[arg(short, long)]
    pub clean: bool,

    /// Fail when documents load but no doc route receives a raw source
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub strict: Option<bool>,
}

impl Commands {
    pub const fn build_args(&self) -> &BuildArgs {
        match self {
            Self::Build { build_args }
            | Self::Watch { build_args }
            | Self::Routes { build_args, .. } => build_args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from(["rawdocs", "build", "-o", "dist", "--strict"]).unwrap();
        let args = cli.command.build_args();
        assert_eq!(args.output.as_deref(), Some(std::path::Path::new("dist")));
        assert_eq!(args.strict, Some(true));
        assert!(!args.clean);
    }

    #[test]
    fn test_parse_routes_json_global_flags() {
        let cli = Cli::try_parse_from(["rawdocs", "r", "--json", "-v", "-C", "site.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
        assert!(matches!(cli.command, Commands::Routes { json: true, .. }));
    }

    #[test]
    fn test_strict_explicit_false() {
        let cli = Cli::try_parse_from(["rawdocs", "watch", "--strict", "false"]).unwrap();
        assert_eq!(cli.command.build_args().strict, Some(false));
    }
}
