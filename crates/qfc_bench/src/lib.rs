//! # QFC Bench
//!
//! Random lattice generators and optimizer benchmarking.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qfc_bench // L7: Benchmark (완료)
//!     LatticeGenerator // 격자 생성기 (완료)
//!         random_connected() - 스패닝 트리 + 추가 결합
//!         random_frequencies() - NaN 비율 포함
//!     OptimizerSuite // 최적화 벤치마크 (완료)
//!         bench_case() - 비회귀 및 일치 검사
//!         run_random(), run_shapes(), run_per_qubit()
//!     Reporter // 결과 리포팅 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qfc_bench::prelude::*;
//!
//! let mut suite = OptimizerSuite::with_seed(42);
//! let results = suite.run_quick().unwrap();
//!
//! let report = Reporter::to_markdown(&results);
//! println!("{}", report);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Generators (Gantree: L7_Benchmark → Generators)
pub mod generators;

/// Optimizer suite (Gantree: L7_Benchmark → OptimizerSuite)
pub mod suite;

/// Reporting (Gantree: L7_Benchmark → Reporter)
pub mod reporter;

// ============================================================================
// Re-exports
// ============================================================================

pub use generators::{LatticeGenerator, RandomCase};
pub use reporter::{ReportFormat, Reporter};
pub use suite::{triples_consistent, CaseResult, OptimizerSuite, SuiteStatistics, DEFAULT_BAND};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qfc_bench::prelude::*;
    //! ```

    pub use crate::generators::{LatticeGenerator, RandomCase};
    pub use crate::reporter::{ReportFormat, Reporter};
    pub use crate::suite::{CaseResult, OptimizerSuite, SuiteStatistics, DEFAULT_BAND};
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use super::triples_consistent;
    use qfc_core::{GateSet, Lattice};
    use qfc_engine::{CollisionCategory, CollisionClassifier, CollisionExtractor, DirectionOptimizer};

    #[test]
    fn test_pairs_and_heavy_roundtrip() {
        for seed in 0..20 {
            let lattice = LatticeGenerator::with_seed(seed)
                .random_connected(9, 5)
                .unwrap();
            let pairs = lattice.to_pairs();
            assert_eq!(Lattice::from_pairs(&pairs, None).unwrap().to_pairs(), pairs);
            assert_eq!(Lattice::from_heavy(&lattice.to_heavy()).unwrap(), lattice);

            let adj = lattice.adjacency();
            for i in 0..9 {
                assert_eq!(adj[[i, i]], 0);
                for j in 0..9 {
                    assert_eq!(adj[[i, j]], adj[[j, i]]);
                }
            }
        }
    }

    #[test]
    fn test_spectator_bits_always_listed() {
        // Dense lattices in a narrow band to force spectator collisions
        let band = qfc_core::Interval::new(4.95, 5.05);
        for seed in 0..25 {
            let gen = LatticeGenerator::with_seed(seed);
            let case = gen.random_case(8, 8, band, 0.05, -0.33).unwrap();
            let classifier = CollisionClassifier::with_defaults(&case.lattice, &case.table).unwrap();
            let (tensor, list) =
                CollisionExtractor::new(&classifier).classify_and_extract(&classifier.default_gates());

            assert!(triples_consistent(&tensor, &list));
            assert!(
                list.count(CollisionCategory::Spectator)
                    >= tensor.count(CollisionCategory::Spectator)
            );
        }
    }

    #[test]
    fn test_random_optimizer_invariants() {
        let mut suite = OptimizerSuite::with_seed(7);
        let mut results = suite.run_random(20, 10, 6, 0.1).unwrap();
        results.extend(suite.run_per_qubit(5, 8).unwrap());

        for r in &results {
            assert!(r.non_regressing, "{} regressed", r.name);
            assert!(r.passes_monotone, "{} pass not monotone", r.name);
            assert!(r.triples_consistent, "{} tensor/list mismatch", r.name);
            assert!(r.targeted_after() <= r.targeted_before());
        }
        assert_eq!(suite.statistics().unsound_cases, 0);
    }

    #[test]
    fn test_reoptimizing_never_regresses() {
        for seed in 0..10 {
            let case = LatticeGenerator::with_seed(seed)
                .random_case(8, 4, DEFAULT_BAND, 0.0, -0.33)
                .unwrap();
            let classifier = CollisionClassifier::with_defaults(&case.lattice, &case.table).unwrap();
            let optimizer = DirectionOptimizer::new(&classifier).with_quiet(true);

            let first = optimizer.optimize(classifier.default_gates());
            let second = optimizer.optimize(first.gates.clone());
            assert!(second.final_counts.no_worse_than(&first.final_counts));
            second.gates.validate_against(&case.lattice).unwrap();
        }
    }

    #[test]
    fn test_empty_gate_set_on_empty_lattice() {
        let lattice = Lattice::from_pairs(&[], Some(0)).unwrap();
        let table = qfc_core::FrequencyTable::uniform(Vec::new(), -0.33);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let outcome = DirectionOptimizer::new(&classifier).optimize(GateSet::new());
        assert_eq!(outcome.final_counts.total(), 0);
        assert_eq!(outcome.passes.len(), 3);
    }

    #[test]
    fn test_suite_reproducible() {
        let a = OptimizerSuite::with_seed(11).run_random(3, 7, 2, 0.0).unwrap();
        let b = OptimizerSuite::with_seed(11).run_random(3, 7, 2, 0.0).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.initial_counts, y.initial_counts);
            assert_eq!(x.final_counts, y.final_counts);
        }
    }
}
