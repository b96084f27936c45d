// src/error.rs
// Error taxonomy for the codon-selection engine.

use std::path::PathBuf;
use thiserror::Error;

/// Every failure the engine can report to its caller.
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// A sequence contains a character outside its alphabet.
    #[error("invalid {kind} character '{character}' at position {position}")]
    Validation {
        kind: &'static str,
        character: char,
        position: usize,
    },

    /// A strategy was handed a sequence of the wrong kind.
    #[error("expected a {expected} sequence, got {found}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A residue of the input has no entry in the codon table.
    #[error("unknown amino acid '{residue}' at position {position}: not present in codon table")]
    UnknownResidue { residue: char, position: usize },

    /// No codon assignment meets the GC bounds.
    #[error(
        "no feasible solution: GC content must lie in [{lower:.2}%, {upper:.2}%], \
         closest achievable is {best_achievable_percent:.2}%"
    )]
    InfeasibleConstraint {
        lower: f64,
        upper: f64,
        best_achievable_percent: f64,
    },

    /// Malformed or contradictory configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed codon usage table.
    #[error("codon table error: {0}")]
    Table(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A strategy failed; carries the original cause.
    #[error("optimization failed (strategy '{strategy}', organism '{organism}')")]
    OptimizationFailed {
        strategy: String,
        organism: String,
        #[source]
        source: Box<OptimizeError>,
    },
}

impl OptimizeError {
    /// The innermost error, skipping `OptimizationFailed` wrappers.
    pub fn root_cause(&self) -> &OptimizeError {
        match self {
            OptimizeError::OptimizationFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, OptimizeError>;
