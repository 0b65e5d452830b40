//! CLI argument definitions

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "obselt")]
#[command(author, version, about = "Check and inspect annotated ELT SQL scripts")]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to obselt.toml in this or a parent directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Where to load scripts from
#[derive(ClapArgs, Clone, Default)]
pub struct SourceArgs {
    /// Directory containing .sql scripts
    #[arg(short, long, env = "OBSELT_SQL_DIR", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Extra directive verbs, in addition to ddl, etl and elt
    #[arg(long = "verb", value_name = "VERB")]
    pub verbs: Vec<String>,

    /// Fail when two statements declare the same command name
    #[arg(long)]
    pub reject_duplicates: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load every script and report the first problem found
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// List loaded commands with their verbs and params
    List {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the SQL of one command
    Show {
        /// Command name
        name: String,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Split one script and display its statements (for debugging)
    Split {
        /// SQL file to split
        file: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output
    Json,
}
