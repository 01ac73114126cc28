//! Command-line argument definitions for the Trellis CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects the operation; configuration file
//! selection and logging verbosity apply to every subcommand.

use clap::{Parser, Subcommand, ValueEnum};

use trellis_parser::Syntax;

/// Command-line arguments for the Trellis architecture tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

/// The operation to run.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve imports and validate a document
    Check {
        /// Path to the input Trellis file
        input: String,
    },

    /// Render a document in the given syntax
    Convert {
        /// Path to the input Trellis file
        input: String,

        /// Target syntax
        #[arg(long, value_enum)]
        to: Target,

        /// Output file; standard output when omitted
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Render a document in the syntax opposite to its dominant one
    Toggle {
        /// Path to the input Trellis file
        input: String,

        /// Output file; standard output when omitted
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Report which syntax a document is written in
    Detect {
        /// Path to the input Trellis file
        input: String,
    },

    /// Print the grammar table
    Grammar,
}

/// A target syntax on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Operator-based shortform
    Short,
    /// Keyword and brace longform
    Long,
}

impl From<Target> for Syntax {
    fn from(target: Target) -> Self {
        match target {
            Target::Short => Syntax::Shortform,
            Target::Long => Syntax::Longform,
        }
    }
}
