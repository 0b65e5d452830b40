//! obselt CLI - checks and inspects annotated ELT SQL scripts

mod args;
mod config;
mod output;

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use obselt_core::{split, CommandRegistry, Error};

use crate::args::{Args, Command, SourceArgs};
use crate::config::Config;
use crate::output::OutputFormatter;

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match (args.quiet, args.verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::WARN,
        (false, 1) => tracing::Level::INFO,
        (false, _) => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Resolve configuration from the config file, environment and CLI arguments
fn load_config(args: &Args, source: &SourceArgs) -> Result<Config> {
    let config = if let Some(path) = &args.config {
        Config::from_file(path)?
    } else {
        Config::find_and_load()?.unwrap_or_default()
    };
    Ok(config.merge_with_args(source, args.format))
}

/// Load the configured directory; a load failure is reported and yields `None`
fn load_registry(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<Option<CommandRegistry>> {
    let loader = config.loader()?;
    let dir = config.sql_dir()?;
    match loader.load(&dir) {
        Ok(registry) => Ok(Some(registry)),
        // Not a directory is a usage problem, not a lint failure
        Err(e @ Error::Configuration { .. }) => Err(e.into()),
        Err(e) => {
            formatter.print_error(&e);
            Ok(None)
        }
    }
}

fn run(args: Args) -> Result<bool> {
    match &args.command {
        Command::Check { source } => {
            let config = load_config(&args, source)?;
            let formatter = OutputFormatter::new(
                config.output_format(),
                config.sql_dir()?.display().to_string(),
            );

            match load_registry(&config, &formatter)? {
                Some(registry) => {
                    formatter.print_summary(&registry, args.quiet);
                    Ok(false)
                }
                None => Ok(true),
            }
        }

        Command::List { source } => {
            let config = load_config(&args, source)?;
            let formatter = OutputFormatter::new(
                config.output_format(),
                config.sql_dir()?.display().to_string(),
            );

            match load_registry(&config, &formatter)? {
                Some(registry) => {
                    formatter.print_commands(&registry);
                    Ok(false)
                }
                None => Ok(true),
            }
        }

        Command::Show { name, source } => {
            let config = load_config(&args, source)?;
            let formatter = OutputFormatter::new(
                config.output_format(),
                config.sql_dir()?.display().to_string(),
            );

            let registry = match load_registry(&config, &formatter)? {
                Some(registry) => registry,
                None => return Ok(true),
            };
            match registry.get(name) {
                Ok(command) => {
                    formatter.print_command(name, command);
                    Ok(false)
                }
                Err(e) => {
                    formatter.print_error(&e);
                    Ok(true)
                }
            }
        }

        Command::Split { file } => {
            let content = fs::read_to_string(file).into_diagnostic()?;
            let config = load_config(&args, &SourceArgs::default())?;
            let formatter =
                OutputFormatter::new(config.output_format(), file.display().to_string());

            let blocks: Vec<_> = split(&content).collect();
            if blocks.is_empty() && !args.quiet {
                eprintln!("No terminated statements found in {}", file.display());
            }
            formatter.print_blocks(&blocks);
            Ok(false)
        }
    }
}
