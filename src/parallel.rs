// src/parallel.rs
// PARALLEL PROCESSING ENGINE
// Optimizes a batch of FASTA records across the Rayon pool and formats the output entries.

use rayon::prelude::*;

use crate::error::Result;
use crate::fasta::{write_record, FastaRecord};
use crate::optimizer::{CodonOptimizer, OptimizationReport};

pub struct ParallelProcessor;

/// Outcome for one input record.
pub struct RecordResult {
    pub header: String,
    pub outcome: Result<OptimizationReport>,
}

impl RecordResult {
    /// FASTA text for a successful record, with strategy, GC% and CAI appended to the header.
    pub fn fasta_entry(&self, line_width: usize) -> Option<String> {
        let report = self.outcome.as_ref().ok()?;
        let header = match report.cai {
            Some(cai) => format!(
                "{} strategy={} gc={:.2} cai={:.4}",
                self.header, report.strategy, report.stability.gc_content, cai
            ),
            None => format!("{} strategy={} gc={:.2}", self.header, report.strategy, report.stability.gc_content),
        };

        let mut out = Vec::with_capacity(header.len() + report.sequence.len() + 16);
        write_record(&mut out, &header, report.sequence.value(), line_width).ok()?;
        String::from_utf8(out).ok()
    }
}

impl ParallelProcessor {
    /// Runs every record through `optimizer`. Output order matches input order.
    pub fn optimize_records(optimizer: &CodonOptimizer, records: Vec<FastaRecord>) -> Vec<RecordResult> {
        records
            .into_par_iter()
            .map(|record| {
                let outcome = optimizer.optimize_with_report(&record.sequence);
                RecordResult { header: record.header, outcome }
            })
            .collect()
    }
}
