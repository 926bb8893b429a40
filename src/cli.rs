use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

mod commands;
mod interactive_menu;

use crate::output::OutputMode;

/// Read one line from a fresh stdin handle after flushing the prompt.
pub(crate) fn read_line_from_stdin() -> io::Result<String> {
    io::stdout().flush()?;

    let mut input = String::new();
    let stdin = io::stdin();
    let mut handle = stdin.lock();
    handle.read_line(&mut input)?;

    Ok(input)
}

#[derive(Parser)]
#[command(name = "webpurge")]
#[command(version)]
#[command(about = "Strip injected scripts and junk files from static web trees")]
#[command(
    long_about = "Webpurge walks a directory of static pages, removes injected ad/malware \
    <script> and banner blocks from .html, .htm and .xml files, and deletes the \
    machine-generated files and folders (including .s folders) the injection leaves behind.\n\n\
    Examples:\n  \
    webpurge scan ./public_html          # Report what would change, touch nothing\n  \
    webpurge clean ./public_html         # Clean after confirmation\n  \
    webpurge clean -y --json .           # Clean without asking, print a JSON summary\n  \
    webpurge clean --exclude 'cgi-bin/**' ./site"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase output verbosity (-v, -vv for more)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a web tree in place (permanent, asks for confirmation)
    #[command(visible_alias = "c")]
    Clean {
        /// Directory to clean (defaults to the current directory)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// Abort on the first directory listing or removal error
        #[arg(long)]
        fail_fast: bool,

        /// Leave paths matching this glob alone (repeatable)
        #[arg(long, value_name = "GLOB")]
        exclude: Vec<String>,
    },

    /// Report what clean would change (dry run, safe to run anytime)
    #[command(visible_alias = "s")]
    Scan {
        /// Directory to scan (defaults to the current directory)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// Leave paths matching this glob alone (repeatable)
        #[arg(long, value_name = "GLOB")]
        exclude: Vec<String>,
    },

    /// View or reset the configuration file
    Config {
        /// Print the current configuration
        #[arg(long)]
        show: bool,

        /// Overwrite the configuration with defaults
        #[arg(long)]
        reset: bool,

        /// Print the configuration file location
        #[arg(long)]
        path: bool,
    },
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.verbose >= 2 {
            OutputMode::VeryVerbose
        } else if self.verbose == 1 {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }

    /// Default filter for `env_logger`, overridden by `RUST_LOG`.
    pub fn log_filter(&self) -> &'static str {
        match self.output_mode() {
            OutputMode::Quiet => "error",
            OutputMode::Normal | OutputMode::Json => "warn",
            OutputMode::Verbose => "info",
            OutputMode::VeryVerbose => "debug",
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        let output_mode = self.output_mode();
        let config_file = self.config;

        match self.command {
            None => {
                Self::show_interactive_menu();
                Ok(())
            }
            Some(Commands::Clean {
                path,
                yes,
                json,
                fail_fast,
                exclude,
            }) => commands::clean_command::handle_clean(
                path,
                config_file,
                yes,
                json,
                fail_fast,
                exclude,
                output_mode,
            ),
            Some(Commands::Scan {
                path,
                json,
                exclude,
            }) => commands::scan_command::handle_scan(
                path,
                config_file,
                json,
                exclude,
                output_mode,
            ),
            Some(Commands::Config { show, reset, path }) => {
                commands::config_command::handle_config(config_file, show, reset, path)
            }
        }
    }
}
