//! Command-line interface.

use std::ffi::OsString;

use clap::{CommandFactory, Parser};
use erebos_core::LogConfig;

/// Editor for the Erebos engine
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "erebos-editor", disable_help_flag = true)]
pub struct Cli {
    /// Get help
    #[arg(short, long)]
    pub help: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Logging configuration requested by the flags.
    ///
    /// Usage text is logged at info level, so printing help ignores any
    /// `RUST_LOG` filter that would hide it.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            verbose: self.verbose,
            ignore_env: self.help,
        }
    }
}

/// What the command line asks the editor to do.
#[derive(Debug)]
pub enum Invocation {
    /// Start the editor.
    Run(Cli),
    /// Print usage and exit successfully.
    Help(Cli),
    /// The arguments could not be parsed.
    Invalid(clap::Error),
}

impl Invocation {
    /// Interpret `args`, including the program name in the first position.
    pub fn parse<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) if cli.help => Self::Help(cli),
            Ok(cli) => Self::Run(cli),
            Err(err) => Self::Invalid(err),
        }
    }
}

/// Usage text, one entry per line.
pub fn help_lines() -> Vec<String> {
    Cli::command()
        .render_help()
        .to_string()
        .lines()
        .map(str::to_string)
        .collect()
}
