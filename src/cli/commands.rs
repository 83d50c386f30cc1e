//! CLI command definitions

use crate::core::{
    task::{Md5Check, ProjectSetup, DEFAULT_ENVIRONMENT_FILE, DEFAULT_PACKAGE_MANAGER},
    RunContext,
};
use clap::Args;
use std::ffi::OsString;
use std::path::PathBuf;

/// Usage line printed when `env` gets an unknown package manager
pub const ENV_USAGE: &str = "usage: metapipeline env [package_manager] [config_file]";

/// Multi-letter flags written with a single dash, e.g. `-bDB`
const LEGACY_FLAGS: &[&str] = &[
    "p1", "p2", "bDB", "kDB", "pDB", "opt", "eDB", "profile", "kL", "prefix",
];

/// Create the tool environment
#[derive(Debug, Args, Clone)]
pub struct EnvCommand {
    /// Package manager (conda|mamba|micromamba)
    #[arg(default_value = DEFAULT_PACKAGE_MANAGER)]
    pub package_manager: String,

    /// YAML environment file
    #[arg(default_value = DEFAULT_ENVIRONMENT_FILE)]
    pub config_file: PathBuf,
}

/// Check md5 sums of raw reads
#[derive(Debug, Args, Clone)]
pub struct Md5Command {
    /// Directory containing the reads
    pub reads: String,

    /// Text file with md5sum info
    pub md5_file: String,

    /// File extension [fastq|fq|fastq.gz|fq.gz]
    pub extension: String,

    /// Output file name
    pub output: String,
}

impl Md5Command {
    pub fn to_check(&self) -> Md5Check {
        Md5Check {
            reads_dir: self.reads.clone(),
            md5_file: self.md5_file.clone(),
            extension: self.extension.clone(),
            output: self.output.clone(),
        }
    }
}

/// Set up the project directory layout
#[derive(Debug, Args, Clone)]
pub struct SetupCommand {
    /// Directory containing the reads
    pub reads: String,

    /// Working directory path
    pub working_dir: String,

    /// Read pattern (e.g. _R1, _L1, _F)
    pub pattern: String,

    /// Read file extension
    pub extension: String,

    /// Sample prefix
    #[arg(long)]
    pub prefix: Option<String>,
}

impl SetupCommand {
    pub fn to_setup(&self) -> ProjectSetup {
        ProjectSetup {
            reads_dir: self.reads.clone(),
            working_dir: self.working_dir.clone(),
            pattern: self.pattern.clone(),
            extension: self.extension.clone(),
            prefix: self.prefix.clone(),
        }
    }
}

/// Run the pipeline
#[derive(Debug, Args, Clone)]
pub struct MetapipelineCommand {
    /// Pipeline mode: all, qc, rmHost, taxAssignment, assembly, taxMags,
    /// geneAnnotation or funcAnnotation
    #[arg(short, long)]
    pub mode: String,

    /// Number of threads
    #[arg(short = 't', long = "threads", visible_alias = "cpus", value_parser = parse_thread_count)]
    pub threads: Option<String>,

    /// Forward read pattern
    #[arg(long = "p1", visible_alias = "pForward")]
    pub forward_pattern: Option<String>,

    /// Reverse read pattern
    #[arg(long = "p2", visible_alias = "pReverse")]
    pub reverse_pattern: Option<String>,

    /// Read file extension
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Bowtie2 database path
    #[arg(long = "bDB", visible_alias = "bowtieDB")]
    pub host_db: Option<String>,

    /// Kraken2 database path
    #[arg(long = "kDB", visible_alias = "krakenDB")]
    pub taxonomy_db: Option<String>,

    /// PhyloPhlAn database path
    #[arg(long = "pDB", visible_alias = "phylophlanDB")]
    pub phylo_db: Option<String>,

    /// Taxonomic assignment option: 1) MAGs; 2) reads; 3) contigs
    #[arg(long = "opt", visible_alias = "option")]
    pub tax_option: Option<String>,

    /// Sample prefix
    #[arg(short = 'n', long)]
    pub prefix: Option<String>,

    /// eggNOG database path
    #[arg(long = "eDB", visible_alias = "eggNOGDB")]
    pub functional_db: Option<String>,

    /// KofamDB profiles path
    #[arg(long = "profile", visible_alias = "koProfiles")]
    pub profiles: Option<String>,

    /// KofamDB ko list path
    #[arg(long = "kL", visible_alias = "koList")]
    pub ko_list: Option<String>,
}

impl MetapipelineCommand {
    /// Parameters for the run, with the already-resolved thread count
    pub fn run_context(&self, threads: String) -> RunContext {
        RunContext {
            threads,
            forward_pattern: self.forward_pattern.clone(),
            reverse_pattern: self.reverse_pattern.clone(),
            extension: self.extension.clone(),
            host_db: self.host_db.clone(),
            taxonomy_db: self.taxonomy_db.clone(),
            phylo_db: self.phylo_db.clone(),
            functional_db: self.functional_db.clone(),
            profiles: self.profiles.clone(),
            ko_list: self.ko_list.clone(),
            prefix: self.prefix.clone(),
            tax_option: self.tax_option.clone(),
        }
    }
}

/// Accept a positive integer, kept as the string the user typed
pub fn parse_thread_count(s: &str) -> Result<String, String> {
    match s.parse::<u32>() {
        Ok(n) if n > 0 => Ok(s.to_string()),
        _ => Err(format!("threads must be a positive integer, got '{}'", s)),
    }
}

/// Rewrite single-dash multi-letter flags (`-bDB`) to their long form (`--bDB`).
///
/// Everything after a `--` separator is passed through untouched.
pub fn normalize_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if arg.as_os_str() == "--" {
                passthrough = true;
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(flag) = text.strip_prefix('-').filter(|rest| !rest.starts_with('-')) else {
                return arg;
            };
            let name = flag.split_once('=').map_or(flag, |(name, _)| name);
            if LEGACY_FLAGS.contains(&name) {
                OsString::from(format!("-{}", text))
            } else {
                arg
            }
        })
        .collect()
}
