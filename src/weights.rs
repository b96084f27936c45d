// src/weights.rs
// RELATIVE ADAPTIVENESS: w(codon) = freq(codon) / max freq among its synonyms.
// Recomputed from the table on every call; nothing is cached here.

use std::collections::{BTreeMap, HashMap};

use crate::codon_table::{CodonTable, CodonUsage};

/// Weights for one synonym set, parallel to its order in the table.
pub fn relative_adaptiveness(synonyms: &[CodonUsage]) -> Vec<f64> {
    let max = synonyms
        .iter()
        .map(|u| u.frequency)
        .fold(0.0f64, f64::max);
    if max <= 0.0 {
        return vec![0.0; synonyms.len()];
    }
    synonyms.iter().map(|u| u.frequency / max).collect()
}

/// Derived codon -> weight table for a whole codon table.
#[derive(Debug, Clone, PartialEq)]
pub struct CodonWeights {
    by_residue: BTreeMap<char, Vec<f64>>,
    by_codon: HashMap<String, f64>,
}

impl CodonWeights {
    pub fn from_table(table: &CodonTable) -> Self {
        let mut by_residue = BTreeMap::new();
        let mut by_codon = HashMap::new();

        for (amino_acid, synonyms) in table.iter() {
            let weights = relative_adaptiveness(synonyms);
            for (usage, &w) in synonyms.iter().zip(&weights) {
                by_codon.insert(usage.codon.clone(), w);
            }
            by_residue.insert(amino_acid, weights);
        }

        Self { by_residue, by_codon }
    }

    pub fn get(&self, codon: &str) -> Option<f64> {
        self.by_codon.get(&codon.to_ascii_uppercase()).copied()
    }

    /// Weights for `amino_acid`, in the same order as `CodonTable::synonyms`.
    pub fn for_residue(&self, amino_acid: char) -> Option<&[f64]> {
        self.by_residue
            .get(&amino_acid.to_ascii_uppercase())
            .map(Vec::as_slice)
    }

    /// Codon Adaptation Index of a coding sequence: geometric mean of its codon weights.
    ///
    /// Codons missing from the table are skipped. Returns `None` when no codon is known.
    pub fn cai<'a>(&self, codons: impl IntoIterator<Item = &'a str>) -> Option<f64> {
        let mut log_sum = 0.0f64;
        let mut n = 0u64;
        for codon in codons {
            if let Some(w) = self.get(codon).filter(|w| *w > 0.0) {
                log_sum += w.ln();
                n += 1;
            }
        }
        if n == 0 {
            return None;
        }
        Some((log_sum / n as f64).exp())
    }
}
