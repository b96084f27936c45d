// src/lib.rs
pub mod analysis;
pub mod codon_table;
pub mod config;
pub mod error;
pub mod fasta;
pub mod optimizer;
pub mod parallel;
pub mod sequence;
pub mod strategy;
pub mod weights;

pub use codon_table::CodonTable;
pub use config::OptimizationConfig;
pub use error::{OptimizeError, Result};
pub use optimizer::{CodonOptimizer, OptimizationReport};
pub use sequence::{Sequence, SequenceKind};

/// Where per-organism codon tables live unless told otherwise.
pub const DEFAULT_DATA_DIR: &str = "data/codon_table";

/// FASTA batch limits: records per batch and approximate bytes per batch.
pub const BATCH_MAX_RECORDS: usize = 2000;
pub const BATCH_MAX_BYTES: usize = 32 * 1024 * 1024;
