// src/strategy/cai.rs
// CAI-WEIGHTED: the synonym with the highest relative adaptiveness.
// Codons below the configured CAI threshold are still used but reported.

use serde::Serialize;
use tracing::{debug, warn};

use super::{first_max, require_protein, CodonStrategy};
use crate::codon_table::CodonTable;
use crate::config::OptimizationConfig;
use crate::error::Result;
use crate::sequence::Sequence;
use crate::weights::CodonWeights;

/// A chosen codon whose weight fell below `cai_threshold`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdWarning {
    pub position: usize,
    pub residue: char,
    pub codon: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CaiWeighted;

impl CodonStrategy for CaiWeighted {
    fn name(&self) -> &'static str {
        "cai"
    }

    fn select(
        &self,
        sequence: &Sequence,
        table: &CodonTable,
        config: &OptimizationConfig,
    ) -> Result<Sequence> {
        let (dna, warnings) = self.select_with_warnings(sequence, table, config)?;
        log_warnings(&warnings, config.cai_threshold);
        Ok(dna)
    }

    fn select_with_warnings(
        &self,
        sequence: &Sequence,
        table: &CodonTable,
        config: &OptimizationConfig,
    ) -> Result<(Sequence, Vec<ThresholdWarning>)> {
        require_protein(sequence)?;

        let weights = CodonWeights::from_table(table);
        debug!(residues = sequence.len(), "selecting codons by CAI weight");

        let mut dna = String::with_capacity(sequence.len() * 3);
        for (position, residue) in sequence.symbols().enumerate() {
            let synonyms = table.synonyms_at(residue, position)?;
            let residue_weights = weights.for_residue(residue).unwrap_or_default();
            let best = first_max(residue_weights.iter().copied()).unwrap_or(0);
            dna.push_str(&synonyms[best].codon);
        }

        let dna = Sequence::dna(dna)?;
        let warnings = threshold_warnings(sequence, &dna, &weights, config.cai_threshold);
        Ok((dna, warnings))
    }
}

/// Pairs each residue with its codon and reports those weighted below `threshold`.
pub(crate) fn threshold_warnings(
    protein: &Sequence,
    dna: &Sequence,
    weights: &CodonWeights,
    threshold: f64,
) -> Vec<ThresholdWarning> {
    protein
        .symbols()
        .zip(dna.codons())
        .enumerate()
        .filter_map(|(position, (residue, codon))| {
            let weight = weights.get(codon).unwrap_or(0.0);
            (weight < threshold).then(|| ThresholdWarning {
                position,
                residue,
                codon: codon.to_string(),
                weight,
            })
        })
        .collect()
}

/// Logs each warning at WARN level.
pub(crate) fn log_warnings(warnings: &[ThresholdWarning], threshold: f64) {
    for w in warnings {
        warn!(
            position = w.position,
            residue = %w.residue,
            codon = %w.codon,
            weight = w.weight,
            threshold,
            "codon weight below CAI threshold"
        );
    }
}
