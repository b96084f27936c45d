// src/strategy/frequency.rs
// MAX-FREQUENCY: the most used synonym for every residue.

use tracing::debug;

use super::{first_max, require_protein, CodonStrategy};
use crate::codon_table::CodonTable;
use crate::config::OptimizationConfig;
use crate::error::Result;
use crate::sequence::Sequence;

#[derive(Debug, Clone, Copy, Default)]
pub struct MaxFrequency;

impl CodonStrategy for MaxFrequency {
    fn name(&self) -> &'static str {
        "frequency"
    }

    fn select(
        &self,
        sequence: &Sequence,
        table: &CodonTable,
        _config: &OptimizationConfig,
    ) -> Result<Sequence> {
        require_protein(sequence)?;
        debug!(residues = sequence.len(), "selecting codons by maximum frequency");

        let mut dna = String::with_capacity(sequence.len() * 3);
        for (position, residue) in sequence.symbols().enumerate() {
            let synonyms = table.synonyms_at(residue, position)?;
            // synonyms_at never yields an empty slice
            let best = first_max(synonyms.iter().map(|u| u.frequency)).unwrap_or(0);
            dna.push_str(&synonyms[best].codon);
        }

        Sequence::dna(dna)
    }
}
