// src/cli.rs
//! CLI definitions for recipebook
//!
//! This module contains the command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recipebook")]
#[command(author = "Recipebook Contributors")]
#[command(version)]
#[command(about = "Inspect and resolve build recipes for source packages", long_about = None)]
pub struct Cli {
    /// Config file (default: $RECIPEBOOK_CONFIG or <config dir>/recipebook/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered recipes
    List,

    /// Show a recipe's versions, variants, dependencies and arguments
    Info {
        /// Recipe name
        name: String,
    },

    /// Resolve a build request: variants, dependencies, arguments, source
    Resolve {
        /// Request such as "dakota@6.13 +mpi ~hdf5"
        #[arg(num_args = 1.., required = true)]
        spec: Vec<String>,
    },

    /// Print the CMake arguments for a build request, one per line
    Args {
        /// Request such as "dakota@6.13 ~mpi"
        #[arg(num_args = 1.., required = true)]
        spec: Vec<String>,

        /// Also print the standard prefix and build type arguments
        #[arg(long)]
        prefix: Option<PathBuf>,
    },

    /// Print the source URL and integrity for a version
    Fetch {
        /// Request such as "dakota@6.12"
        spec: String,
    },

    /// Verify a downloaded archive against its declared digest
    Verify {
        /// Request such as "dakota@6.12"
        spec: String,

        /// Archive to check
        file: PathBuf,
    },

    /// Check recipes and report errors and warnings
    Validate {
        /// Recipe files to check (default: every registered recipe)
        files: Vec<PathBuf>,
    },

    /// Show or run the install steps of a recipe
    InstallPlan {
        /// Request such as "perl-star-fusion"
        spec: String,

        /// Installation prefix
        #[arg(long)]
        prefix: PathBuf,

        /// Unpacked source directory (required with --execute)
        #[arg(long)]
        source: Option<PathBuf>,

        /// Copy files instead of only printing the plan
        #[arg(long, requires = "source")]
        execute: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
