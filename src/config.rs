// src/config.rs
// OPTIMIZATION PARAMETERS: organism, strategy, GC window and CAI floor.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationConfig {
    /// Selects the codon table (`<organism>.json`).
    pub organism: String,
    /// One of `frequency`, `cai`, `gc`.
    pub strategy_name: String,
    /// Accepted GC window in percent, `(lower, upper)`, inclusive.
    pub gc_bounds: (f64, f64),
    /// Optional GC centre in percent; narrows `gc_bounds` symmetrically around it.
    pub gc_target: Option<f64>,
    /// Codons weighted below this are reported (advisory only).
    pub cai_threshold: f64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            organism: "e_coli".to_string(),
            strategy_name: "cai".to_string(),
            gc_bounds: (40.0, 60.0),
            gc_target: None,
            cai_threshold: 0.8,
        }
    }
}

impl OptimizationConfig {
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| OptimizeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|e| {
            OptimizeError::Configuration(format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects contradictory settings before any search begins.
    pub fn validate(&self) -> Result<()> {
        let (lower, upper) = self.gc_bounds;
        if !lower.is_finite() || !upper.is_finite() {
            return Err(OptimizeError::Configuration(
                "GC bounds must be finite numbers".into(),
            ));
        }
        if lower < 0.0 || upper > 100.0 || lower > upper {
            return Err(OptimizeError::Configuration(format!(
                "GC bounds ({}, {}) must satisfy 0 <= lower <= upper <= 100",
                lower, upper
            )));
        }
        if let Some(target) = self.gc_target {
            if !target.is_finite() || target < lower || target > upper {
                return Err(OptimizeError::Configuration(format!(
                    "GC target {} lies outside the GC bounds ({}, {})",
                    target, lower, upper
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.cai_threshold) {
            return Err(OptimizeError::Configuration(format!(
                "CAI threshold {} must lie in [0, 1]",
                self.cai_threshold
            )));
        }
        if self.organism.trim().is_empty() {
            return Err(OptimizeError::Configuration("organism must not be empty".into()));
        }
        Ok(())
    }

    /// The GC window actually enforced.
    ///
    /// With a target, the window is `target ± tol` where `tol` is the distance from the
    /// target to the nearer bound.
    pub fn effective_gc_bounds(&self) -> (f64, f64) {
        let (lower, upper) = self.gc_bounds;
        match self.gc_target {
            Some(target) => {
                let tolerance = (target - lower).min(upper - target);
                (target - tolerance, target + tolerance)
            }
            None => (lower, upper),
        }
    }
}
