// src/strategy/gc.rs
// GC-CONSTRAINED SELECTION: exact dynamic program over accumulated GC count.
//
// State (i, g): after the first i residues, exactly g of the 3i bases are G/C.
//   best[0][0] = 0, every other best[0][g] unreachable
//   best[i][g] = max_j best[i-1][g - gc_j] + w_j
// The answer is the best reachable g inside the GC window after the last residue,
// retraced through one back-pointer per (i, g).
// Cost: O(n * 3n * k) time, O(n * 3n) back-pointers.

use tracing::debug;

use super::cai::{log_warnings, threshold_warnings};
use super::{require_protein, CodonStrategy, ThresholdWarning};
use crate::codon_table::CodonTable;
use crate::config::OptimizationConfig;
use crate::error::{OptimizeError, Result};
use crate::sequence::Sequence;
use crate::weights::CodonWeights;

const UNREACHABLE: u8 = u8::MAX;

/// One candidate codon for a residue, reduced to what the search needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GcChoice {
    pub gc: usize,
    pub weight: f64,
}

/// Result of the search: one codon index per residue.
#[derive(Debug, Clone, PartialEq)]
pub struct GcPlan {
    pub choices: Vec<usize>,
    pub gc_count: usize,
    pub total_weight: f64,
}

/// GC percentage of `gc` G/C bases out of `total_bases`, as `Sequence::gc_content` measures it.
pub(crate) fn gc_percent(gc: usize, total_bases: usize) -> f64 {
    if total_bases == 0 {
        return 0.0;
    }
    gc as f64 / total_bases as f64 * 100.0
}

/// Integer GC-count window: the smallest and largest `g` whose measured percentage lies in
/// `[lower, upper]`. An empty window comes back with `lo > hi`. Zero bases always fit.
pub(crate) fn gc_count_window(total_bases: usize, lower: f64, upper: f64) -> (usize, usize) {
    if total_bases == 0 {
        return (0, 0);
    }
    let lo = (0..=total_bases)
        .find(|&g| gc_percent(g, total_bases) >= lower)
        .unwrap_or(total_bases + 1);
    let hi = (0..=total_bases)
        .rev()
        .find(|&g| gc_percent(g, total_bases) <= upper);
    match hi {
        Some(hi) => (lo, hi),
        None => (1, 0),
    }
}

/// Finds the maximum-weight assignment whose GC percentage lies in `[lower, upper]`.
///
/// `options[i]` lists the candidates for residue `i` in table order. Ties keep the smallest
/// codon index, then the smallest final GC count.
pub fn search_gc_window(options: &[Vec<GcChoice>], lower: f64, upper: f64) -> Result<GcPlan> {
    let n = options.len();
    let g_max = 3 * n;
    let (g_lo, g_hi) = gc_count_window(g_max, lower, upper);

    // Layer i only spans [offset_i, offset_i + len_i): the GC counts residue sums can reach.
    let mut offsets = Vec::with_capacity(n + 1);
    let mut back: Vec<Vec<u8>> = Vec::with_capacity(n + 1);
    offsets.push(0usize);
    back.push(vec![UNREACHABLE]);
    let mut score = vec![0.0f64];

    for (i, choices) in options.iter().enumerate() {
        if choices.is_empty() || choices.len() >= UNREACHABLE as usize {
            return Err(OptimizeError::Table(format!(
                "residue {} has {} codon choices",
                i,
                choices.len()
            )));
        }
        let min_gc = choices.iter().map(|c| c.gc).min().unwrap_or(0);
        let max_gc = choices.iter().map(|c| c.gc).max().unwrap_or(0);

        let prev_offset = offsets[i];
        let prev_len = score.len();
        let offset = prev_offset + min_gc;
        let len = prev_len + (max_gc - min_gc);

        let mut next_score = vec![f64::NEG_INFINITY; len];
        let mut next_back = vec![UNREACHABLE; len];

        for slot in 0..len {
            let g = offset + slot;
            for (j, choice) in choices.iter().enumerate() {
                // Predecessor GC count must exist in the previous layer
                let Some(prev_g) = g.checked_sub(choice.gc) else { continue };
                let Some(prev_slot) = prev_g.checked_sub(prev_offset) else { continue };
                if prev_slot >= prev_len || score[prev_slot] == f64::NEG_INFINITY {
                    continue;
                }

                let candidate = score[prev_slot] + choice.weight;
                if candidate > next_score[slot] {
                    next_score[slot] = candidate;
                    next_back[slot] = j as u8;
                }
            }
        }

        offsets.push(offset);
        back.push(next_back);
        score = next_score;
    }

    // Pick the best reachable final GC count inside the window
    let final_offset = offsets[n];
    let mut best: Option<(usize, f64)> = None;
    for (slot, &s) in score.iter().enumerate() {
        let g = final_offset + slot;
        if g < g_lo || g > g_hi || s == f64::NEG_INFINITY {
            continue;
        }
        if best.map_or(true, |(_, b)| s > b) {
            best = Some((g, s));
        }
    }

    let Some((gc_count, total_weight)) = best else {
        return Err(OptimizeError::InfeasibleConstraint {
            lower,
            upper,
            best_achievable_percent: closest_reachable_percent(&score, final_offset, g_lo, g_hi, g_max),
        });
    };

    // Traceback: walk the back-pointers from the last residue to the first
    let mut choices = vec![0usize; n];
    let mut g = gc_count;
    for i in (1..=n).rev() {
        let j = back[i][g - offsets[i]] as usize;
        choices[i - 1] = j;
        g -= options[i - 1][j].gc;
    }

    Ok(GcPlan { choices, gc_count, total_weight })
}

/// GC percentage of the reachable final count nearest to the window.
fn closest_reachable_percent(score: &[f64], offset: usize, g_lo: usize, g_hi: usize, g_max: usize) -> f64 {
    let distance = |g: usize| {
        if g < g_lo {
            g_lo - g
        } else {
            g.saturating_sub(g_hi)
        }
    };
    score
        .iter()
        .enumerate()
        .filter(|(_, s)| **s != f64::NEG_INFINITY)
        .map(|(slot, _)| offset + slot)
        .min_by_key(|&g| distance(g))
        .map(|g| gc_percent(g, g_max))
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GcConstrained;

impl CodonStrategy for GcConstrained {
    fn name(&self) -> &'static str {
        "gc"
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
        config.validate()?;
        let (lower, upper) = config.effective_gc_bounds();

        let weights = CodonWeights::from_table(table);
        let mut synonyms = Vec::with_capacity(sequence.len());
        let mut options = Vec::with_capacity(sequence.len());
        for (position, residue) in sequence.symbols().enumerate() {
            let usages = table.synonyms_at(residue, position)?;
            let residue_weights = weights.for_residue(residue).unwrap_or_default();
            options.push(
                usages
                    .iter()
                    .zip(residue_weights)
                    .map(|(u, &weight)| GcChoice { gc: u.gc_count(), weight })
                    .collect::<Vec<_>>(),
            );
            synonyms.push(usages);
        }

        debug!(
            residues = sequence.len(),
            lower, upper, "searching codon assignment within GC window"
        );
        let plan = search_gc_window(&options, lower, upper)?;
        debug!(gc_count = plan.gc_count, total_weight = plan.total_weight, "GC search finished");

        let mut dna = String::with_capacity(sequence.len() * 3);
        for (usages, &j) in synonyms.iter().zip(&plan.choices) {
            dna.push_str(&usages[j].codon);
        }

        let dna = Sequence::dna(dna)?;
        let warnings = threshold_warnings(sequence, &dna, &weights, config.cai_threshold);
        Ok((dna, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::test_support::{ma_table, mixed_table};
    use crate::strategy::CaiWeighted;
    use proptest::prelude::*;

    fn config(lower: f64, upper: f64) -> OptimizationConfig {
        OptimizationConfig {
            strategy_name: "gc".into(),
            gc_bounds: (lower, upper),
            ..Default::default()
        }
    }

    fn run(protein: &str, table: &CodonTable, config: &OptimizationConfig) -> Result<Sequence> {
        GcConstrained.select(&Sequence::protein(protein).unwrap(), table, config)
    }

    /// Exhaustive reference: best total weight over all assignments inside the window.
    fn brute_force(options: &[Vec<GcChoice>], lower: f64, upper: f64) -> Option<f64> {
        let total = 3 * options.len();
        let mut best: Option<f64> = None;
        let mut idx = vec![0usize; options.len()];
        loop {
            let gc: usize = idx.iter().zip(options).map(|(&j, o)| o[j].gc).sum();
            let w: f64 = idx.iter().zip(options).map(|(&j, o)| o[j].weight).sum();
            let pct = gc_percent(gc, total);
            let inside = total == 0 || (pct >= lower && pct <= upper);
            if inside && best.map_or(true, |b| w > b) {
                best = Some(w);
            }
            // Odometer increment
            let mut pos = 0;
            loop {
                if pos == idx.len() {
                    return best;
                }
                idx[pos] += 1;
                if idx[pos] < options[pos].len() {
                    break;
                }
                idx[pos] = 0;
                pos += 1;
            }
        }
    }

    #[test]
    fn ma_example_feasible_at_fifty_percent() {
        let dna = run("MA", &ma_table(), &config(0.0, 50.0)).unwrap();
        assert_eq!(dna.value(), "ATGGCT");
        assert_eq!(dna.gc_content(), 50.0);
    }

    #[test]
    fn ma_example_reaches_two_thirds_with_gcc() {
        // ATG (1 GC) + GCC (3 GC) = 4 of 6 bases
        let dna = run("MA", &ma_table(), &config(60.0, 100.0)).unwrap();
        assert_eq!(dna.value(), "ATGGCC");
    }

    #[test]
    fn ma_example_infeasible_above_two_thirds() {
        let err = run("MA", &ma_table(), &config(70.0, 100.0)).unwrap_err();
        match err {
            OptimizeError::InfeasibleConstraint { best_achievable_percent, .. } => {
                assert!((best_achievable_percent - 400.0 / 6.0).abs() < 1e-9);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn unreachable_high_window_is_infeasible() {
        // K only has AAA/AAG, so "KKK" tops out at 3 of 9 bases
        let err = run("KKK", &mixed_table(), &config(99.0, 100.0)).unwrap_err();
        assert!(matches!(err, OptimizeError::InfeasibleConstraint { .. }));
    }

    #[test]
    fn trades_weight_for_gc() {
        // Unconstrained best is AAA+TTT (0% GC); a 30-40% window forces GC-rich synonyms
        let dna = run("KF", &mixed_table(), &config(30.0, 40.0)).unwrap();
        let gc = dna.gc_content();
        assert!((30.0..=40.0).contains(&gc), "gc {} for {}", gc, dna);
        assert_eq!(dna.value(), "AAGTTC");
    }

    #[test]
    fn wide_window_matches_cai_choice() {
        let table = mixed_table();
        let seq = Sequence::protein("MAKLFGW").unwrap();
        let cfg = config(0.0, 100.0);
        assert_eq!(
            GcConstrained.select(&seq, &table, &cfg).unwrap(),
            CaiWeighted.select(&seq, &table, &cfg).unwrap()
        );
    }

    #[test]
    fn target_centres_the_window() {
        // Bounds (0, 100) with target 50 keep the full window: tolerance 50
        let cfg = OptimizationConfig { gc_target: Some(50.0), ..config(0.0, 100.0) };
        assert!(run("MAKLFGW", &mixed_table(), &cfg).is_ok());

        // Target 10 in (0, 60) narrows to (0, 20): "KK" has 0..=2 GC of 6 (<= 33%)
        let cfg = OptimizationConfig { gc_target: Some(10.0), ..config(0.0, 60.0) };
        let dna = run("KK", &mixed_table(), &cfg).unwrap();
        assert!(dna.gc_content() <= 20.0);
    }

    #[test]
    fn empty_protein_is_trivially_feasible() {
        let dna = run("", &ma_table(), &config(40.0, 60.0)).unwrap();
        assert!(dna.is_empty());
    }

    #[test]
    fn single_synonym_residues_are_fixed() {
        let dna = run("MMM", &ma_table(), &config(33.0, 34.0)).unwrap();
        assert_eq!(dna.value(), "ATGATGATG");
        assert!(run("MMM", &ma_table(), &config(40.0, 60.0)).is_err());
    }

    #[test]
    fn invalid_configuration_fails_before_search() {
        let err = run("MA", &ma_table(), &config(70.0, 20.0)).unwrap_err();
        assert!(matches!(err, OptimizeError::Configuration(_)));
    }

    #[test]
    fn unknown_residue_aborts() {
        let err = run("MAW", &ma_table(), &config(0.0, 100.0)).unwrap_err();
        assert!(matches!(err, OptimizeError::UnknownResidue { residue: 'W', .. }));
    }

    #[test]
    fn low_weight_choices_are_reported() {
        let seq = Sequence::protein("KF").unwrap();
        let (_, warnings) = GcConstrained
            .select_with_warnings(&seq, &mixed_table(), &config(30.0, 40.0))
            .unwrap();
        // AAG (0.35) and TTC (0.72) both sit below the default 0.8 floor
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn ties_prefer_first_codon() {
        let options = vec![vec![
            GcChoice { gc: 2, weight: 1.0 },
            GcChoice { gc: 2, weight: 1.0 },
        ]];
        let plan = search_gc_window(&options, 0.0, 100.0).unwrap();
        assert_eq!(plan.choices, vec![0]);
    }

    #[test]
    fn window_rounding_is_exact_at_boundaries() {
        assert_eq!(gc_count_window(6, 50.0, 50.0), (3, 3));
        let third = gc_percent(3, 9);
        assert_eq!(gc_count_window(9, third, gc_percent(6, 9)), (3, 6));
        assert_eq!(gc_count_window(9, third + 1e-9, 100.0).0, 4);
        assert_eq!(gc_count_window(0, 40.0, 60.0), (0, 0));
    }

    #[test]
    fn lower_bound_just_above_reachable_percent_is_not_rounded_down() {
        let options = vec![
            vec![GcChoice { gc: 1, weight: 1.0 }],
            vec![GcChoice { gc: 2, weight: 1.0 }, GcChoice { gc: 1, weight: 0.5 }],
        ];
        // 3 of 6 bases is exactly 50%, which sits below the bound
        let err = search_gc_window(&options, 50.00000001, 100.0).unwrap_err();
        assert!(matches!(err, OptimizeError::InfeasibleConstraint { .. }));

        let plan = search_gc_window(&options, 50.0, 100.0).unwrap();
        assert_eq!(plan.gc_count, 3);
        assert_eq!(plan.choices, vec![0, 0]);

        let err = search_gc_window(&options, 0.0, 33.33333332).unwrap_err();
        assert!(matches!(err, OptimizeError::InfeasibleConstraint { .. }));
    }

    fn options_strategy() -> impl Strategy<Value = Vec<Vec<GcChoice>>> {
        let choice = (0usize..=3, 1u32..=100).prop_map(|(gc, w)| GcChoice {
            gc,
            weight: w as f64 / 100.0,
        });
        proptest::collection::vec(proptest::collection::vec(choice, 1..=4), 0..=6)
    }

    proptest! {
        #[test]
        fn dp_matches_brute_force(
            options in options_strategy(),
            a in 0.0f64..=100.0,
            b in 0.0f64..=100.0,
        ) {
            let (lower, upper) = if a <= b { (a, b) } else { (b, a) };
            let expected = brute_force(&options, lower, upper);
            match (search_gc_window(&options, lower, upper), expected) {
                (Ok(plan), Some(best)) => {
                    prop_assert!((plan.total_weight - best).abs() < 1e-9);
                    let gc: usize = plan.choices.iter().zip(&options).map(|(&j, o)| o[j].gc).sum();
                    prop_assert_eq!(gc, plan.gc_count);
                    if !options.is_empty() {
                        let pct = gc_percent(gc, 3 * options.len());
                        prop_assert!(pct >= lower && pct <= upper);
                    }
                }
                (Err(OptimizeError::InfeasibleConstraint { .. }), None) => {}
                (got, want) => prop_assert!(false, "dp {:?} vs brute force {:?}", got, want),
            }
        }

        #[test]
        fn output_respects_gc_window(
            protein in "[MAKLFGW]{1,30}",
            a in 0.0f64..=100.0,
            b in 0.0f64..=100.0,
        ) {
            let (lower, upper) = if a <= b { (a, b) } else { (b, a) };
            if let Ok(dna) = run(&protein, &mixed_table(), &config(lower, upper)) {
                prop_assert_eq!(dna.len(), protein.len() * 3);
                let gc = dna.gc_content();
                prop_assert!(gc >= lower && gc <= upper, "gc {} outside [{}, {}]", gc, lower, upper);
            }
        }
    }
}
