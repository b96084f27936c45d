// src/analysis.rs
// SEQUENCE ANALYSIS: GC content and melting temperature of a produced coding sequence.

use serde::Serialize;

use crate::sequence::Sequence;

/// Standard 50mM Na+ concentration used for the Tm estimate.
const NA_CONCENTRATION: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StabilityReport {
    pub gc_content: f64,
    pub melting_temp: f64,
}

impl StabilityReport {
    pub fn gc_within(&self, (lower, upper): (f64, f64)) -> bool {
        self.gc_content >= lower && self.gc_content <= upper
    }
}

/// GC% and Tm of a DNA strand.
///
/// Tm = 81.5 + 16.6 * log10([Na+]) + 0.41 * (%GC) - 600/length
pub fn analyze_stability(dna: &Sequence) -> StabilityReport {
    if dna.is_empty() {
        return StabilityReport { gc_content: 0.0, melting_temp: 0.0 };
    }

    let len = dna.len() as f64;
    let gc_content = dna.gc_content();
    let salt_adjust = 16.6 * NA_CONCENTRATION.log10();
    let melting_temp = 81.5 + salt_adjust + (0.41 * gc_content) - (600.0 / len);

    StabilityReport { gc_content, melting_temp }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strand_reports_zero() {
        let report = analyze_stability(&Sequence::dna("").unwrap());
        assert_eq!(report, StabilityReport { gc_content: 0.0, melting_temp: 0.0 });
    }

    #[test]
    fn tm_rises_with_gc() {
        let at = analyze_stability(&Sequence::dna("ATATATATATAT").unwrap());
        let gc = analyze_stability(&Sequence::dna("GCGCGCGCGCGC").unwrap());
        assert_eq!(at.gc_content, 0.0);
        assert_eq!(gc.gc_content, 100.0);
        assert!((gc.melting_temp - at.melting_temp - 41.0).abs() < 1e-9);
        assert!(gc.gc_within((40.0, 100.0)));
        assert!(!at.gc_within((40.0, 60.0)));
    }
}
