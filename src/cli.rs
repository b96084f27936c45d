// src/cli.rs
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use codonsmith::{OptimizationConfig, DEFAULT_DATA_DIR};

#[derive(Parser)]
#[command(name = "codonsmith", author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(help_template = "\
{before-help}{name} v{version}
{author-with-newline}{about-with-newline}
{usage-heading}
{usage}

{all-args}{after-help}
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set the number of threads for batch optimization.
    ///
    /// - 0: Auto-detect (Use all available cores).
    /// - 1: Sequential (Single-threaded, good for debugging).
    /// - >1: Force specific thread count.
    #[arg(short = 'j', long, global = true, default_value_t = 0, value_name = "THREADS")]
    pub jobs: usize,

    /// Enable debug logging (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Settings shared by the commands that run the optimizer.
#[derive(Args)]
pub struct OptimizeOptions {
    /// JSON file with an OptimizationConfig; flags below override its fields
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Target organism (selects <DATA_DIR>/<ORGANISM>.json)
    #[arg(long, value_name = "ORGANISM")]
    pub organism: Option<String>,

    /// Codon selection strategy: frequency, cai or gc (unknown names use frequency)
    #[arg(short, long, value_name = "NAME")]
    pub strategy: Option<String>,

    /// Lower GC bound in percent
    #[arg(long, value_name = "PERCENT")]
    pub gc_min: Option<f64>,

    /// Upper GC bound in percent
    #[arg(long, value_name = "PERCENT")]
    pub gc_max: Option<f64>,

    /// GC target in percent; narrows the bounds symmetrically around it
    #[arg(long, value_name = "PERCENT")]
    pub gc_target: Option<f64>,

    /// Codons weighted below this are reported (0.0 - 1.0)
    #[arg(long, value_name = "WEIGHT")]
    pub cai_threshold: Option<f64>,

    /// Directory holding <organism>.json codon tables
    #[arg(long, default_value = DEFAULT_DATA_DIR, value_name = "DIR")]
    pub data_dir: PathBuf,
}

impl OptimizeOptions {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn to_config(&self) -> codonsmith::Result<OptimizationConfig> {
        let mut config = match &self.config {
            Some(path) => OptimizationConfig::from_json_path(path)?,
            None => OptimizationConfig::default(),
        };

        if let Some(organism) = &self.organism {
            config.organism = organism.clone();
        }
        if let Some(strategy) = &self.strategy {
            config.strategy_name = strategy.clone();
        }
        if let Some(lower) = self.gc_min {
            config.gc_bounds.0 = lower;
        }
        if let Some(upper) = self.gc_max {
            config.gc_bounds.1 = upper;
        }
        if self.gc_target.is_some() {
            config.gc_target = self.gc_target;
        }
        if let Some(threshold) = self.cai_threshold {
            config.cai_threshold = threshold;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Optimize a single protein sequence.
    #[command(visible_alias = "opt")]
    Optimize {
        /// Protein sequence (one-letter amino acid codes)
        #[arg(value_name = "PROTEIN")]
        protein: String,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        options: OptimizeOptions,
    },

    /// Optimize every record of a protein FASTA file.
    Batch {
        /// Input protein FASTA file
        #[arg(value_name = "FASTA_FILE")]
        input: PathBuf,

        /// Output DNA FASTA file
        #[arg(short, long, default_value = "optimized.fasta", value_name = "OUT_FILE")]
        output: PathBuf,

        /// Wrap output sequences at this many bases (0 = single line)
        #[arg(long, default_value_t = 60, value_name = "WIDTH")]
        line_width: usize,

        #[command(flatten)]
        options: OptimizeOptions,
    },

    /// Show per-codon CAI weights for an organism.
    Weights {
        /// Target organism
        #[arg(long, default_value = "e_coli", value_name = "ORGANISM")]
        organism: String,

        /// Directory holding <organism>.json codon tables
        #[arg(long, default_value = DEFAULT_DATA_DIR, value_name = "DIR")]
        data_dir: PathBuf,
    },

    /// List organisms with a codon table in the data directory.
    Organisms {
        /// Directory holding <organism>.json codon tables
        #[arg(long, default_value = DEFAULT_DATA_DIR, value_name = "DIR")]
        data_dir: PathBuf,
    },
}
