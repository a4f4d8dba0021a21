//! Quickzip CLI - create and extract zip archives with predictable layouts.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use clap::Parser;
use progress::CliProgress;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    for extension in &cli.custom_extensions {
        quickzip_core::add_custom_file_extension(extension);
    }

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
    let show_progress = !cli.quiet && !cli.json && CliProgress::should_show();

    let result = match &cli.command {
        cli::Commands::Zip(args) => commands::zip::execute(args, &*formatter, show_progress),
        cli::Commands::Unzip(args) => commands::unzip::execute(args, &*formatter, show_progress),
        cli::Commands::Ext(command) => commands::ext::execute(command, &*formatter),
        cli::Commands::Completion { shell } => {
            commands::completion::execute(*shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(cli.command.name(), &err);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the level picked from the flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
