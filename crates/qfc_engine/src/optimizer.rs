//! Gate direction optimizer for QFC
//!
//! Gantree: L4_Optimization → DirectionOptimizer
//!
//! Three greedy passes over the three-qubit categories (5, 6, 7). Each
//! listed instance tries four direction candidates and adopts the one with
//! the lowest target count among those that raise no other category.

use crate::category::{CategoryCounts, CollisionCategory};
use crate::classifier::CollisionClassifier;
use crate::extractor::{CollisionExtractor, CollisionTriple};
use log::{debug, info, trace, warn};
use qfc_core::categories::CANDIDATES_PER_STEP;
use qfc_core::{GateSet, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Candidates
// ============================================================================

/// Direction candidate for one instance
/// Gantree: Candidate // 4종 후보
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Candidate {
    /// Leave the set as is
    Unchanged,
    /// Reverse the control-target gate
    FlipFirst,
    /// Reverse the control-spectator gate, whichever orientation is present
    FlipSecond,
    /// Both reversals
    FlipBoth,
}

impl Candidate {
    /// Construction order; earlier wins a tie
    pub const ALL: [Candidate; CANDIDATES_PER_STEP] = [
        Candidate::Unchanged,
        Candidate::FlipFirst,
        Candidate::FlipSecond,
        Candidate::FlipBoth,
    ];

    /// True for any candidate that changes the set
    pub fn is_flip(self) -> bool {
        self != Candidate::Unchanged
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Candidate::Unchanged => "unchanged",
            Candidate::FlipFirst => "flip (C,T)",
            Candidate::FlipSecond => "flip (C,S)",
            Candidate::FlipBoth => "flip both",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// Results
// ============================================================================

/// Outcome of one optimizer step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDecision {
    /// Adopted candidate
    pub chosen: Candidate,
    /// Gate set after the step
    pub gates: GateSet,
    /// Counts of the adopted set
    pub counts: CategoryCounts,
    /// Reversals that found no gate on their edge
    pub noop_flips: usize,
}

/// Summary of one pass
/// Gantree: PassReport // 패스별 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassReport {
    /// Target category
    pub target: CollisionCategory,
    /// Instances listed at pass entry
    pub instances: Vec<CollisionTriple>,
    /// Steps that adopted a flip
    pub flips_accepted: usize,
    /// Reversals that found no gate
    pub noop_flips: usize,
    /// Counts at pass entry
    pub counts_before: CategoryCounts,
    /// Counts at pass exit
    pub counts_after: CategoryCounts,
}

impl PassReport {
    /// Target collisions removed by this pass
    pub fn reduction(&self) -> usize {
        self.counts_before
            .get(self.target)
            .saturating_sub(self.counts_after.get(self.target))
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type {} pass: {} instances, {} flips, {} -> {}",
            self.target.number(),
            self.instances.len(),
            self.flips_accepted,
            self.counts_before.get(self.target),
            self.counts_after.get(self.target)
        )
    }
}

/// Result of a full optimization
/// Gantree: DirectionOutcome // 최종 방향 집합
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionOutcome {
    /// Final gate direction set
    pub gates: GateSet,
    /// Counts before the first pass
    pub initial_counts: CategoryCounts,
    /// Counts after the last pass
    pub final_counts: CategoryCounts,
    /// One report per pass, in pass order
    pub passes: Vec<PassReport>,
}

impl DirectionOutcome {
    /// Total flips adopted
    pub fn flips_accepted(&self) -> usize {
        self.passes.iter().map(|p| p.flips_accepted).sum()
    }

    /// No category ended above its initial count
    pub fn is_non_regressing(&self) -> bool {
        self.final_counts.no_worse_than(&self.initial_counts)
    }
}

// ============================================================================
// Optimizer
// ============================================================================

/// Greedy gate direction optimizer
/// Gantree: DirectionOptimizer // 방향 최적화
#[derive(Debug, Clone)]
pub struct DirectionOptimizer<'c, 'a> {
    classifier: &'c CollisionClassifier<'a>,
    quiet: bool,
}

impl<'c, 'a> DirectionOptimizer<'c, 'a> {
    /// Optimizer over `classifier`'s lattice, table and bounds
    pub fn new(classifier: &'c CollisionClassifier<'a>) -> Self {
        Self {
            classifier,
            quiet: false,
        }
    }

    /// Report not-found flips at `debug` instead of `warn`
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Run the three passes starting from `gates`
    /// Gantree: optimize(gates) -> DirectionOutcome // 3단계 탐욕 최적화
    pub fn optimize(&self, gates: GateSet) -> DirectionOutcome {
        let initial_counts = self.classifier.counts(&gates);
        let mut current = gates;
        let mut passes = Vec::with_capacity(CollisionCategory::OPTIMIZED.len());

        for target in CollisionCategory::OPTIMIZED {
            let (next, report) = self.run_pass(current, target);
            info!("{}", report);
            current = next;
            passes.push(report);
        }

        let final_counts = passes
            .last()
            .map(|p| p.counts_after)
            .unwrap_or(initial_counts);

        DirectionOutcome {
            gates: current,
            initial_counts,
            final_counts,
            passes,
        }
    }

    /// One pass over the instances of `target` listed at entry
    pub fn run_pass(&self, gates: GateSet, target: CollisionCategory) -> (GateSet, PassReport) {
        let extractor = CollisionExtractor::new(self.classifier);
        let (tensor, list) = extractor.classify_and_extract(&gates);
        let instances = list.triples(target);
        let counts_before = tensor.counts();

        let mut current = gates;
        let mut snapshot = counts_before;
        let mut flips_accepted = 0;
        let mut noop_flips = 0;

        for triple in &instances {
            let decision = self.step(&current, target, triple, &snapshot);
            if decision.chosen.is_flip() {
                flips_accepted += 1;
            }
            noop_flips += decision.noop_flips;
            snapshot = decision.counts;
            current = decision.gates;
        }

        let report = PassReport {
            target,
            instances,
            flips_accepted,
            noop_flips,
            counts_before,
            counts_after: snapshot,
        };
        (current, report)
    }

    /// Evaluate the four candidates for one instance
    ///
    /// `snapshot` holds the counts of `gates`. A candidate survives only if
    /// no category other than `target` exceeds it. `Unchanged` always
    /// survives, so the target count never rises.
    pub fn step(
        &self,
        gates: &GateSet,
        target: CollisionCategory,
        triple: &CollisionTriple,
        snapshot: &CategoryCounts,
    ) -> StepDecision {
        let CollisionTriple {
            control,
            target: t,
            spectator,
        } = *triple;

        let mut noop_flips = 0;
        let (flip_first, missing) = self.reverse_or_keep(gates, control, t);
        noop_flips += missing as usize;
        let flip_second = if gates.contains(control, spectator) {
            let (set, missing) = self.reverse_or_keep(gates, control, spectator);
            noop_flips += missing as usize;
            set
        } else {
            let (set, missing) = self.reverse_or_keep(gates, spectator, control);
            noop_flips += missing as usize;
            set
        };
        let (flip_both, missing) = self.reverse_or_keep(&flip_second, control, t);
        noop_flips += missing as usize;

        let mut best = StepDecision {
            chosen: Candidate::Unchanged,
            gates: gates.clone(),
            counts: *snapshot,
            noop_flips,
        };

        for (candidate, set) in [
            (Candidate::FlipFirst, flip_first),
            (Candidate::FlipSecond, flip_second),
            (Candidate::FlipBoth, flip_both),
        ] {
            let counts = self.classifier.counts(&set);
            trace!("{} {}: {}", triple, candidate, counts);
            if !counts.no_worse_except(snapshot, target) {
                continue;
            }
            if counts.get(target) < best.counts.get(target) {
                best.chosen = candidate;
                best.gates = set;
                best.counts = counts;
            }
        }

        debug!("{} type {}: {}", triple, target.number(), best.chosen);
        best
    }

    /// Reverse `(control, target)` or return the set unchanged
    ///
    /// The flag is true when the gate was absent.
    fn reverse_or_keep(&self, gates: &GateSet, control: QubitId, target: QubitId) -> (GateSet, bool) {
        match gates.reversed(control, target) {
            Some(set) => (set, false),
            None => {
                if self.quiet {
                    debug!("Gate ({}, {}) not found; flip skipped", control, target);
                } else {
                    warn!("Gate ({}, {}) not found; flip skipped", control, target);
                }
                (gates.clone(), true)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qfc_core::{FrequencyTable, Lattice};

    fn chain(f1: f64) -> (Lattice, FrequencyTable) {
        (
            Lattice::linear(3),
            FrequencyTable::uniform(vec![5.0, f1, 5.005], -0.33),
        )
    }

    #[test]
    fn test_flip_both_clears_through_control() {
        let (lattice, table) = chain(5.1);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let gates = classifier.default_gates();
        assert_eq!(gates, GateSet::from_pairs(&[(1, 0), (1, 2)]));

        let outcome = DirectionOptimizer::new(&classifier).optimize(gates);
        assert_eq!(outcome.initial_counts.as_array(), &[0, 0, 0, 0, 1, 0, 0]);
        assert_eq!(outcome.final_counts.total(), 0);
        assert_eq!(outcome.gates, GateSet::from_pairs(&[(0, 1), (2, 1)]));

        let first = &outcome.passes[0];
        assert_eq!(first.instances, vec![CollisionTriple::new(1, 0, 2)]);
        assert_eq!(first.flips_accepted, 1);
        assert_eq!(first.reduction(), 1);
        assert!(outcome.is_non_regressing());
    }

    #[test]
    fn test_step_choice() {
        let (lattice, table) = chain(5.1);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let optimizer = DirectionOptimizer::new(&classifier).with_quiet(true);
        let target = CollisionCategory::ThroughControl0101;
        let triple = CollisionTriple::new(1, 0, 2);

        let gates = classifier.default_gates();
        let decision = optimizer.step(&gates, target, &triple, &classifier.counts(&gates));
        assert_eq!(decision.chosen, Candidate::FlipBoth);
        assert_eq!(decision.noop_flips, 0);

        // (C,S) stored as (2,1): reversing (C,T) alone already clears it
        let gates = GateSet::from_pairs(&[(1, 0), (2, 1)]);
        let decision = optimizer.step(&gates, target, &triple, &classifier.counts(&gates));
        assert_eq!(decision.chosen, Candidate::FlipFirst);
        assert_eq!(decision.counts.get(target), 0);
    }

    #[test]
    fn test_rejects_slow_gate_regression() {
        // Every flip pushes a control 0.25 GHz below its target
        let (lattice, table) = chain(5.25);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let gates = classifier.default_gates();

        let outcome = DirectionOptimizer::new(&classifier).optimize(gates.clone());
        assert_eq!(outcome.gates, gates);
        assert_eq!(outcome.final_counts, outcome.initial_counts);
        assert_eq!(outcome.final_counts.get(CollisionCategory::ThroughControl0101), 1);
        assert_eq!(outcome.flips_accepted(), 0);
    }

    #[test]
    fn test_missing_edges_are_noops() {
        let (lattice, table) = chain(5.1);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let optimizer = DirectionOptimizer::new(&classifier).with_quiet(true);

        let gates = GateSet::new();
        let snapshot = classifier.counts(&gates);
        let decision = optimizer.step(
            &gates,
            CollisionCategory::Spectator,
            &CollisionTriple::new(0, 1, 2),
            &snapshot,
        );
        // Three reversals attempted, none found; ties keep the unchanged set
        assert_eq!(decision.chosen, Candidate::Unchanged);
        assert_eq!(decision.noop_flips, 3);
        assert!(decision.gates.is_empty());
    }

    #[test]
    fn test_idempotent_when_clean() {
        let lattice = Lattice::ring(4);
        let table = FrequencyTable::uniform(vec![5.00, 5.02, 5.10, 4.90], -0.33);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let gates = classifier.default_gates();

        let first = DirectionOptimizer::new(&classifier).optimize(gates);
        let second = DirectionOptimizer::new(&classifier).optimize(first.gates.clone());
        assert_eq!(second.gates, first.gates);
        assert_eq!(second.final_counts, first.final_counts);
        assert_eq!(second.flips_accepted(), 0);
    }

    #[test]
    fn test_rerun_keeps_resolved_chain() {
        // A second run is not a no-op in general; this fixpoint is
        let (lattice, table) = chain(5.1);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let optimizer = DirectionOptimizer::new(&classifier).with_quiet(true);

        let first = optimizer.optimize(classifier.default_gates());
        assert_eq!(first.flips_accepted(), 1);

        let second = optimizer.optimize(first.gates.clone());
        assert_eq!(second.gates, first.gates);
        assert_eq!(second.initial_counts, first.final_counts);
        assert_eq!(second.flips_accepted(), 0);
    }

    #[test]
    fn test_pass_order() {
        let (lattice, table) = chain(5.1);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let outcome = DirectionOptimizer::new(&classifier).optimize(classifier.default_gates());
        let targets: Vec<_> = outcome.passes.iter().map(|p| p.target).collect();
        assert_eq!(targets, CollisionCategory::OPTIMIZED.to_vec());
        for pass in &outcome.passes {
            assert!(pass.counts_after.get(pass.target) <= pass.counts_before.get(pass.target));
            assert!(pass.counts_after.no_worse_except(&pass.counts_before, pass.target));
        }
    }
}
