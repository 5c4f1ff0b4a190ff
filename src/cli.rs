//! CLI definitions for webnav.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// webnav CLI.
#[derive(Parser)]
#[command(name = "webnav")]
#[command(about = "Browser automation tools for agent loops")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Run the browser without a window (overrides the config file)
    #[arg(long, global = true)]
    pub headless: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List the available tools
    Tools {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Invoke one tool and print its result as JSON
    Call {
        /// Tool id, e.g. getPageText
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(default_value = "{}")]
        args: String,
    },

    /// Open a link and print the cleaned page content
    Open {
        /// Absolute URL
        url: String,
    },

    /// Read one JSON invocation per stdin line, write one JSON result per line
    Repl,
}
