//! This module defines the command line arguments Folio accepts.

use std::{io::IsTerminal, path::PathBuf};
use termcolor::ColorChoice;

use crate::cmd;


#[derive(Debug, clap::Parser)]
#[command(about = "GraphQL demo server for paginated books and posts.")]
pub(crate) struct Args {
    #[command(subcommand)]
    pub(crate) cmd: Command,

    /// Whether to use colors in terminal output. One of "auto", "always"
    /// and "never".
    #[arg(long, global = true, default_value = "auto", value_parser = parse_color_choice)]
    pub(crate) color: ColorChoice,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum Command {
    /// Starts the backend HTTP server.
    Serve {
        #[command(flatten)]
        shared: Shared,
    },

    /// Checks the config and the seed data to find problems before actually
    /// starting the server. Exits with 0 if everything is Ok, and with 1
    /// otherwise.
    Check {
        #[command(flatten)]
        shared: Shared,
    },

    /// Outputs a template for the configuration file (which includes
    /// descriptions or all options).
    WriteConfig {
        /// Target file. If not specified, the template is written to stdout.
        target: Option<PathBuf>,
    },

    /// Exports the API as GraphQL schema.
    ExportApiSchema {
        #[command(flatten)]
        args: cmd::export_api_schema::Args,
    },
}

#[derive(Debug, clap::Args)]
pub(crate) struct Shared {
    /// Path to the configuration file. If this is not specified, Folio will
    /// try `$FOLIO_CONFIG_PATH`, `config.toml` and `/etc/folio/config.toml`
    /// and use default values if none of those exist.
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,
}

impl Args {
    pub(crate) fn stdout_color(&self) -> ColorChoice {
        resolve_auto(self.color, std::io::stdout().is_terminal())
    }

    pub(crate) fn stderr_color(&self) -> ColorChoice {
        resolve_auto(self.color, std::io::stderr().is_terminal())
    }
}

fn resolve_auto(choice: ColorChoice, is_terminal: bool) -> ColorChoice {
    match choice {
        ColorChoice::Auto if !is_terminal => ColorChoice::Never,
        other => other,
    }
}

fn parse_color_choice(s: &str) -> Result<ColorChoice, String> {
    match s {
        "auto" => Ok(ColorChoice::Auto),
        "always" => Ok(ColorChoice::Always),
        "never" => Ok(ColorChoice::Never),
        other => Err(format!("invalid color choice '{other}' (expected 'auto', 'always' or 'never')")),
    }
}
