//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{EnvCommand, Md5Command, MetapipelineCommand, SetupCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Metagenomics pipeline orchestrator
#[derive(Debug, Parser, Clone)]
#[command(name = "metapipeline")]
#[command(version)]
#[command(about = "Orchestrates a multi-stage metagenomics workflow", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the pipeline configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Create the tool environment with a package manager
    Env(EnvCommand),

    /// Check md5 sums of the reads used for the analysis
    Md5(Md5Command),

    /// Set up the project directory layout
    Setup(SetupCommand),

    /// Run the pipeline, or a single stage of it
    Metapipeline(MetapipelineCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse_from(commands::normalize_legacy_flags(std::env::args_os()))
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(commands::normalize_legacy_flags(itr))
    }
}
