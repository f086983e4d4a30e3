//! Plugin-contributed CLI subcommands.
//!
//! Plugins register extra subcommands during `extend_cli`. The host merges
//! them into its own clap command tree and dispatches matched subcommands
//! back to the registering handler.

use anyhow::Result;
use clap::{ArgMatches, Command};

type CliHandler = Box<dyn Fn(&ArgMatches) -> Result<()> + Send + Sync>;

struct PluginCommand {
    command: Command,
    handler: CliHandler,
}

/// Registry of subcommands contributed by plugins.
#[derive(Default)]
pub struct PluginCli {
    commands: Vec<PluginCommand>,
}

impl PluginCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subcommand and the handler run when it is invoked.
    pub fn command<F>(&mut self, command: Command, handler: F) -> &mut Self
    where
        F: Fn(&ArgMatches) -> Result<()> + Send + Sync + 'static,
    {
        self.commands.push(PluginCommand {
            command,
            handler: Box::new(handler),
        });
        self
    }

    /// Names of all registered subcommands, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|c| c.command.get_name())
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Attach every registered subcommand to the host command tree.
    pub fn augment(&self, cli: Command) -> Command {
        self.commands
            .iter()
            .fold(cli, |cli, c| cli.subcommand(c.command.clone()))
    }

    /// Run the handler for `name`, if a plugin registered it.
    pub fn dispatch(&self, name: &str, matches: &ArgMatches) -> Option<Result<()>> {
        self.commands
            .iter()
            .find(|c| c.command.get_name() == name)
            .map(|c| (c.handler)(matches))
    }
}

impl std::fmt::Debug for PluginCli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
