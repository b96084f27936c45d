// src/strategy/mod.rs
// CODON SELECTION STRATEGIES and the name -> strategy registry.
//
// Every strategy turns a PROTEIN sequence into a DNA sequence, one codon per residue,
// and fails as a whole (no partial output) when any residue cannot be encoded.

mod cai;
mod frequency;
mod gc;

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::codon_table::CodonTable;
use crate::config::OptimizationConfig;
use crate::error::{OptimizeError, Result};
use crate::sequence::{Sequence, SequenceKind};

pub use cai::{CaiWeighted, ThresholdWarning};
pub use frequency::MaxFrequency;
pub use gc::{search_gc_window, GcChoice, GcConstrained, GcPlan};

/// One way of choosing codons.
pub trait CodonStrategy: Send + Sync {
    /// Registry name (`frequency`, `cai`, `gc`).
    fn name(&self) -> &'static str;

    fn select(
        &self,
        sequence: &Sequence,
        table: &CodonTable,
        config: &OptimizationConfig,
    ) -> Result<Sequence>;

    /// Like `select`, also returning codons weighted below `cai_threshold`.
    /// Max-frequency never reports any.
    fn select_with_warnings(
        &self,
        sequence: &Sequence,
        table: &CodonTable,
        config: &OptimizationConfig,
    ) -> Result<(Sequence, Vec<ThresholdWarning>)> {
        Ok((self.select(sequence, table, config)?, Vec::new()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Frequency,
    Cai,
    Gc,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [StrategyKind::Frequency, StrategyKind::Cai, StrategyKind::Gc];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Frequency => "frequency",
            StrategyKind::Cai => "cai",
            StrategyKind::Gc => "gc",
        }
    }

    pub fn strategy(self) -> &'static dyn CodonStrategy {
        match self {
            StrategyKind::Frequency => &MaxFrequency,
            StrategyKind::Cai => &CaiWeighted,
            StrategyKind::Gc => &GcConstrained,
        }
    }
}

impl FromStr for StrategyKind {
    type Err = OptimizeError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        StrategyKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                OptimizeError::Configuration(format!(
                    "unknown strategy '{}' (expected one of: frequency, cai, gc)",
                    name
                ))
            })
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves a strategy by name. Unrecognized names fall back to max-frequency.
pub fn get(name: &str) -> &'static dyn CodonStrategy {
    match name.parse::<StrategyKind>() {
        Ok(kind) => kind.strategy(),
        Err(_) => {
            warn!(strategy = %name, "unknown strategy name, falling back to 'frequency'");
            StrategyKind::Frequency.strategy()
        }
    }
}

pub(crate) fn require_protein(sequence: &Sequence) -> Result<()> {
    match sequence.kind() {
        SequenceKind::Protein => Ok(()),
        other => Err(OptimizeError::KindMismatch {
            expected: SequenceKind::Protein.name(),
            found: other.name(),
        }),
    }
}

/// Index of the first maximum. Later equal values never win.
pub(crate) fn first_max(values: impl IntoIterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.into_iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
