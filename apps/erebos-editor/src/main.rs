//! Erebos Editor
//!
//! Opens the editor window, brings up Vulkan on the GPU with the most
//! device-local memory and runs the window event loop.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p erebos-editor -- [OPTIONS]
//! ```
//!
//! ## Options
//!
//! - `-v, --verbose`: Log everything down to trace level
//! - `-h, --help`: Print help message
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Log filter used when `--verbose` is not given (default: info)

mod cli;

use std::ffi::OsString;

use anyhow::{anyhow, Context as _};
use erebos_core::constants::{ENGINE_NAME, ENGINE_VERSION};
use erebos_core::{init_logging, LogConfig};
use erebos_gpu::{find_preferred_device, ContextBuilder};
use erebos_platform::Window;
use tracing::{error, info};

use crate::cli::{help_lines, Cli, Invocation};

const WINDOW_TITLE: &str = "Erebos Editor";

/// Process exit code for a clean shutdown or printed help.
const EXIT_SUCCESS: i32 = 0;
/// Process exit code for any startup or event loop failure.
const EXIT_FAILURE: i32 = -1;

fn main() {
    std::process::exit(run_with_args(std::env::args_os()));
}

/// Run the editor for `args` and return the process exit code.
fn run_with_args<I>(args: I) -> i32
where
    I: IntoIterator<Item = OsString>,
{
    match Invocation::parse(args) {
        Invocation::Help(cli) => {
            init_logging(cli.log_config());
            for line in help_lines() {
                info!("{line}");
            }
            EXIT_SUCCESS
        }
        Invocation::Invalid(err) => {
            if let Err(print_err) = err.print() {
                init_logging(LogConfig::default());
                error!("{err}");
                error!("Unable to print usage error: {print_err}");
            }
            EXIT_FAILURE
        }
        Invocation::Run(cli) => {
            init_logging(cli.log_config());
            match run(&cli) {
                Ok(()) => EXIT_SUCCESS,
                Err(err) => {
                    error!("{err:#}");
                    EXIT_FAILURE
                }
            }
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    info!(
        "Starting {} editor {} (verbose: {})",
        ENGINE_NAME, ENGINE_VERSION, cli.verbose
    );

    let window = Window::new(WINDOW_TITLE).context("Unable to open window")?;
    let context = ContextBuilder::new()
        .app_name(WINDOW_TITLE)
        .build(&window)?;

    let device = find_preferred_device(&context)?.ok_or_else(|| anyhow!("No device found"))?;

    let format = device
        .find_preferred_surface_format()?
        .ok_or_else(|| anyhow!("No acceptable surface format found"))?;
    info!(
        "Format: {}/{}",
        format.format.as_raw(),
        format.color_space.as_raw()
    );

    info!("Entering window event loop");
    window.run_loop()?;

    // Device goes before the context it borrows
    drop(device);
    drop(context);
    info!("Editor closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn help_exits_without_gpu_work() {
        assert_eq!(run_with_args(args(&["erebos-editor", "--help"])), EXIT_SUCCESS);
        assert_eq!(run_with_args(args(&["erebos-editor", "-h"])), EXIT_SUCCESS);
    }

    #[test]
    fn verbose_help_exits_without_gpu_work() {
        assert_eq!(
            run_with_args(args(&["erebos-editor", "-v", "--help"])),
            EXIT_SUCCESS
        );
    }

    #[test]
    fn bad_arguments_fail() {
        assert_eq!(run_with_args(args(&["erebos-editor", "--bogus"])), EXIT_FAILURE);
        assert_eq!(run_with_args(args(&["erebos-editor", "extra"])), EXIT_FAILURE);
    }
}
