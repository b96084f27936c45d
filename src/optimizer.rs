// src/optimizer.rs
// FACADE: owns a codon table and configuration, resolves the strategy once,
// and turns protein text into an optimized DNA sequence.

use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::{analyze_stability, StabilityReport};
use crate::codon_table::CodonTable;
use crate::config::OptimizationConfig;
use crate::error::{OptimizeError, Result};
use crate::sequence::Sequence;
use crate::strategy::{self, CodonStrategy, ThresholdWarning};
use crate::weights::CodonWeights;

/// Everything known about one optimized sequence.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationReport {
    #[serde(flatten)]
    pub sequence: Sequence,
    pub strategy: &'static str,
    pub organism: String,
    #[serde(flatten)]
    pub stability: StabilityReport,
    /// Geometric mean of codon weights; `None` for an empty sequence.
    pub cai: Option<f64>,
    pub warnings: Vec<ThresholdWarning>,
}

pub struct CodonOptimizer {
    config: OptimizationConfig,
    table: CodonTable,
    strategy: &'static dyn CodonStrategy,
}

impl CodonOptimizer {
    /// Validates `config` eagerly and resolves its strategy.
    pub fn new(config: OptimizationConfig, table: CodonTable) -> Result<Self> {
        config.validate()?;
        let strategy = strategy::get(&config.strategy_name);
        info!(
            organism = %config.organism,
            strategy = strategy.name(),
            amino_acids = table.len(),
            "codon optimizer ready"
        );
        Ok(Self { config, table, strategy })
    }

    /// Loads the table for `config.organism` from `<data_dir>/<organism>.json`.
    pub fn from_data_dir(config: OptimizationConfig, data_dir: impl AsRef<Path>) -> Result<Self> {
        config.validate()?;
        let table = CodonTable::load_organism(&config.organism, data_dir)?;
        Self::new(config, table)
    }

    pub fn config(&self) -> &OptimizationConfig {
        &self.config
    }

    pub fn table(&self) -> &CodonTable {
        &self.table
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Protein text -> DNA. Invalid characters fail with `Validation`; strategy
    /// failures are wrapped in `OptimizationFailed`.
    pub fn optimize(&self, protein: &str) -> Result<Sequence> {
        let sequence = Sequence::protein(protein)?;
        self.optimize_sequence(&sequence)
    }

    pub fn optimize_sequence(&self, protein: &Sequence) -> Result<Sequence> {
        debug!(residues = protein.len(), strategy = self.strategy.name(), "optimizing");
        self.strategy
            .select(protein, &self.table, &self.config)
            .map_err(|source| self.wrap(source))
    }

    pub fn optimize_with_report(&self, protein: &str) -> Result<OptimizationReport> {
        let protein = Sequence::protein(protein)?;
        let (sequence, warnings) = self
            .strategy
            .select_with_warnings(&protein, &self.table, &self.config)
            .map_err(|source| self.wrap(source))?;

        let weights = CodonWeights::from_table(&self.table);
        let cai = weights.cai(sequence.codons());
        let stability = analyze_stability(&sequence);

        Ok(OptimizationReport {
            sequence,
            strategy: self.strategy.name(),
            organism: self.config.organism.clone(),
            stability,
            cai,
            warnings,
        })
    }

    /// Optimizes many proteins in parallel. Results keep the input order.
    pub fn optimize_batch<S>(&self, proteins: &[S]) -> Vec<Result<OptimizationReport>>
    where
        S: AsRef<str> + Sync,
    {
        proteins
            .par_iter()
            .map(|p| self.optimize_with_report(p.as_ref()))
            .collect()
    }

    fn wrap(&self, source: OptimizeError) -> OptimizeError {
        OptimizeError::OptimizationFailed {
            strategy: self.strategy.name().to_string(),
            organism: self.config.organism.clone(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CodonTable {
        CodonTable::from_groups([
            ('M', vec![("ATG", 1.0)]),
            ('A', vec![("GCT", 0.6), ("GCC", 0.4)]),
        ])
        .unwrap()
    }

    fn optimizer(strategy: &str, gc_bounds: (f64, f64)) -> CodonOptimizer {
        let config = OptimizationConfig {
            strategy_name: strategy.into(),
            gc_bounds,
            ..Default::default()
        };
        CodonOptimizer::new(config, table()).unwrap()
    }

    #[test]
    fn every_strategy_yields_three_bases_per_residue() {
        for name in ["frequency", "cai", "gc"] {
            let dna = optimizer(name, (0.0, 100.0)).optimize("MAMA").unwrap();
            assert_eq!(dna.len(), 12, "{}", name);
            assert_eq!(dna.kind().name(), "DNA");
        }
    }

    #[test]
    fn invalid_protein_is_a_validation_error() {
        let err = optimizer("cai", (40.0, 60.0)).optimize("MA7").unwrap_err();
        assert!(matches!(err, OptimizeError::Validation { .. }));
    }

    #[test]
    fn strategy_errors_are_wrapped_with_context() {
        let err = optimizer("gc", (70.0, 100.0)).optimize("MA").unwrap_err();
        match &err {
            OptimizeError::OptimizationFailed { strategy, organism, .. } => {
                assert_eq!(strategy, "gc");
                assert_eq!(organism, "e_coli");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(matches!(err.root_cause(), OptimizeError::InfeasibleConstraint { .. }));
    }

    #[test]
    fn bad_config_is_rejected_at_construction() {
        let config = OptimizationConfig { gc_bounds: (80.0, 20.0), ..Default::default() };
        assert!(matches!(
            CodonOptimizer::new(config, table()),
            Err(OptimizeError::Configuration(_))
        ));
    }

    #[test]
    fn unknown_strategy_uses_frequency() {
        assert_eq!(optimizer("nonsense", (40.0, 60.0)).strategy_name(), "frequency");
    }

    #[test]
    fn report_carries_gc_and_cai() {
        let report = optimizer("cai", (40.0, 60.0)).optimize_with_report("MA").unwrap();
        assert_eq!(report.sequence.value(), "ATGGCT");
        assert_eq!(report.stability.gc_content, 50.0);
        assert_eq!(report.cai, Some(1.0));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn batch_keeps_input_order() {
        let results = optimizer("frequency", (0.0, 100.0)).optimize_batch(&["M", "MA", "XX", "AM"]);
        let values: Vec<Option<String>> = results
            .iter()
            .map(|r| r.as_ref().ok().map(|rep| rep.sequence.value().to_string()))
            .collect();
        assert_eq!(
            values,
            vec![
                Some("ATG".to_string()),
                Some("ATGGCT".to_string()),
                None,
                Some("GCTATG".to_string()),
            ]
        );
    }

    #[test]
    fn optimizer_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<CodonOptimizer>();
    }
}
