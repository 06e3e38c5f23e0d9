// hevcify-cli/src/main.rs
//
// Entry point for the hevcify binary.
//
// Responsibilities:
// - Parsing arguments and initialising logging.
// - Installing the Ctrl+C / SIGTERM handler that requests a graceful abort.
// - Dispatching to the subcommand and turning its outcome into an exit code.

use anyhow::{Context, Result};
use clap::Parser;
use hevcify_cli::logging::init_logging;
use hevcify_cli::{Cli, Commands, EXIT_ABORTED, EXIT_FATAL, run_convert, run_encoders};
use hevcify_core::temp_files::remove_active_workspaces;
use hevcify_core::terminal_output::{print_error, print_warning};
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// First Ctrl+C or SIGTERM sets the abort flag; a second one removes the
/// workspace and exits immediately.
fn install_interrupt_handler() -> Result<Arc<AtomicBool>> {
    let abort = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&abort);

    ctrlc::set_handler(move || {
        if handler_flag.swap(true, Ordering::SeqCst) {
            // Second signal: exit skips destructors, so clean up first
            for path in remove_active_workspaces() {
                log::debug!("Removed workspace {}", path.display());
            }
            process::exit(EXIT_ABORTED);
        }
        print_warning("Interrupted, stopping the current conversion...");
    })
    .context("Failed to set interrupt handler")?;

    Ok(abort)
}

fn run(cli: &Cli) -> Result<i32> {
    match cli.command_or_default() {
        Commands::Convert(args) => {
            let abort = install_interrupt_handler()?;
            run_convert(&args, &cli.global, &abort)
        }
        Commands::Encoders => run_encoders(&cli.global),
    }
}

fn main() {
    let cli = Cli::parse();

    match init_logging(cli.global.verbose, cli.global.log_dir.as_deref()) {
        Ok(Some(path)) => log::debug!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(EXIT_FATAL);
        }
    }

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            print_error(&format!("{e:#}"));
            EXIT_FATAL
        }
    };
    process::exit(code);
}
