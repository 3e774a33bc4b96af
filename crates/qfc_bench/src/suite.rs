//! Optimizer benchmark suite for QFC
//!
//! Gantree: L7_Benchmark → OptimizerSuite
//!
//! Runs the classifier and direction optimizer over generated cases and
//! records before/after counts together with invariant checks.

use crate::generators::{LatticeGenerator, RandomCase};
use log::info;
use qfc_core::{FrequencyTable, Interval, Lattice, QfcResult};
use qfc_engine::{
    CategoryCounts, CollisionCategory, CollisionClassifier, CollisionConfig, CollisionExtractor,
    CollisionList, CollisionTensor, DirectionOptimizer,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Default qubit frequency band (GHz)
pub const DEFAULT_BAND: Interval = Interval::new(4.8, 5.4);

/// Every three-qubit tensor bit has a listed triple covering its pair
/// Gantree: triples_consistent(tensor, list) -> bool // 텐서-목록 일치
pub fn triples_consistent(tensor: &CollisionTensor, list: &CollisionList) -> bool {
    CollisionCategory::OPTIMIZED.iter().all(|&category| {
        let triples = list.triples(category);
        tensor.flagged_pairs(category).into_iter().all(|(i, j)| {
            triples.iter().any(|t| {
                let roles = t.to_array();
                roles.contains(&i) && roles.contains(&j)
            })
        })
    })
}

/// Single case result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    /// Case name
    pub name: String,

    /// Number of qubits
    pub num_qubits: usize,

    /// Number of couplers
    pub num_edges: usize,

    /// Counts for the control-higher assignment
    pub initial_counts: CategoryCounts,

    /// Counts after optimization
    pub final_counts: CategoryCounts,

    /// Flips adopted over all passes
    pub flips_accepted: usize,

    /// No category ended above its initial count
    pub non_regressing: bool,

    /// Every pass kept its target and all other categories from rising
    pub passes_monotone: bool,

    /// Tensor bits and listed triples agree, before and after
    pub triples_consistent: bool,

    /// Execution time (milliseconds)
    pub time_ms: u64,
}

impl CaseResult {
    /// Categories 5 to 7 before optimization
    pub fn targeted_before(&self) -> usize {
        targeted(&self.initial_counts)
    }

    /// Categories 5 to 7 after optimization
    pub fn targeted_after(&self) -> usize {
        targeted(&self.final_counts)
    }

    /// All invariant checks passed
    pub fn is_sound(&self) -> bool {
        self.non_regressing && self.passes_monotone && self.triples_consistent
    }
}

fn targeted(counts: &CategoryCounts) -> usize {
    CollisionCategory::OPTIMIZED
        .iter()
        .map(|&c| counts.get(c))
        .sum()
}

/// Optimizer benchmark suite
/// Gantree: OptimizerSuite // 최적화 벤치마크
pub struct OptimizerSuite {
    /// Base seed for reproducibility
    seed: u64,

    /// Collision configuration
    config: CollisionConfig,

    /// Results
    results: Vec<CaseResult>,
}

impl OptimizerSuite {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create new suite
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    /// Create with seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            config: CollisionConfig::default().with_quiet_diagnostics(true),
            results: Vec::new(),
        }
    }

    /// Use `config` for every case
    pub fn with_config(mut self, config: CollisionConfig) -> Self {
        self.config = config;
        self
    }

    // ========================================================================
    // Individual Cases
    // ========================================================================

    /// Classify, optimize and check one lattice
    pub fn bench_case(
        &mut self,
        name: &str,
        lattice: &Lattice,
        table: &FrequencyTable,
    ) -> QfcResult<CaseResult> {
        let start = Instant::now();

        let classifier = CollisionClassifier::from_config(lattice, table, &self.config, None)?;
        let extractor = CollisionExtractor::new(&classifier);
        let gates = classifier.default_gates();
        let (tensor, list) = extractor.classify_and_extract(&gates);

        let outcome = DirectionOptimizer::new(&classifier)
            .with_quiet(self.config.quiet_diagnostics)
            .optimize(gates);
        let (final_tensor, final_list) = extractor.classify_and_extract(&outcome.gates);

        let passes_monotone = outcome.passes.iter().all(|p| {
            p.counts_after.get(p.target) <= p.counts_before.get(p.target)
                && p.counts_after.no_worse_except(&p.counts_before, p.target)
        });

        let result = CaseResult {
            name: name.to_string(),
            num_qubits: lattice.num_qubits(),
            num_edges: lattice.num_edges(),
            initial_counts: tensor.counts(),
            final_counts: final_tensor.counts(),
            flips_accepted: outcome.flips_accepted(),
            non_regressing: outcome.is_non_regressing(),
            passes_monotone,
            triples_consistent: triples_consistent(&tensor, &list)
                && triples_consistent(&final_tensor, &final_list),
            time_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "{}: {} -> {} targeted collisions, {} flips",
            name,
            result.targeted_before(),
            result.targeted_after(),
            result.flips_accepted
        );
        self.results.push(result.clone());
        Ok(result)
    }

    // ========================================================================
    // Suites
    // ========================================================================

    /// `cases` random connected lattices of `num_qubits`
    pub fn run_random(
        &mut self,
        cases: usize,
        num_qubits: usize,
        extra_edges: usize,
        nan_fraction: f64,
    ) -> QfcResult<Vec<CaseResult>> {
        let anharmonicity = self.config.default_anharmonicity;
        let mut results = Vec::with_capacity(cases);
        for n in 0..cases {
            let gen = LatticeGenerator::with_seed(self.seed.wrapping_add(n as u64));
            let RandomCase { lattice, table } =
                gen.random_case(num_qubits, extra_edges, DEFAULT_BAND, nan_fraction, anharmonicity)?;
            let name = format!("random_{}q_case{}", num_qubits, n);
            results.push(self.bench_case(&name, &lattice, &table)?);
        }
        Ok(results)
    }

    /// Standard device shapes with random frequencies
    pub fn run_shapes(&mut self) -> QfcResult<Vec<CaseResult>> {
        let gen = LatticeGenerator::with_seed(self.seed);
        let anharmonicity = self.config.default_anharmonicity;
        let mut results = Vec::new();
        for lattice in gen.standard_shapes() {
            let table = gen.uniform_table(lattice.num_qubits(), DEFAULT_BAND, anharmonicity);
            let name = lattice.name().unwrap_or("unnamed").to_string();
            results.push(self.bench_case(&name, &lattice, &table)?);
        }
        Ok(results)
    }

    /// Per-qubit anharmonicity cases
    pub fn run_per_qubit(&mut self, cases: usize, num_qubits: usize) -> QfcResult<Vec<CaseResult>> {
        let mut results = Vec::with_capacity(cases);
        for n in 0..cases {
            let gen = LatticeGenerator::with_seed(self.seed.wrapping_add(n as u64));
            let lattice = gen.random_connected(num_qubits, num_qubits / 2)?;
            let table = gen.per_qubit_table(num_qubits, DEFAULT_BAND, Interval::new(-0.35, -0.30))?;
            let name = format!("per_qubit_{}q_case{}", num_qubits, n);
            results.push(self.bench_case(&name, &lattice, &table)?);
        }
        Ok(results)
    }

    /// Run quick suite
    pub fn run_quick(&mut self) -> QfcResult<Vec<CaseResult>> {
        let mut results = self.run_shapes()?;
        results.extend(self.run_random(3, 8, 3, 0.1)?);
        Ok(results)
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// All recorded results
    pub fn results(&self) -> &[CaseResult] {
        &self.results
    }

    /// Clear results
    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// Statistics over recorded results
    pub fn statistics(&self) -> SuiteStatistics {
        SuiteStatistics::from_results(&self.results)
    }
}

impl Default for OptimizerSuite {
    fn default() -> Self {
        Self::new()
    }
}

/// Suite statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteStatistics {
    /// Number of cases
    pub count: usize,

    /// All collisions before optimization
    pub total_before: usize,

    /// All collisions after optimization
    pub total_after: usize,

    /// Categories 5 to 7 before optimization
    pub targeted_before: usize,

    /// Categories 5 to 7 after optimization
    pub targeted_after: usize,

    /// Flips adopted
    pub total_flips: usize,

    /// Cases failing any invariant check
    pub unsound_cases: usize,

    /// Average time per case
    pub avg_time_ms: f64,
}

impl SuiteStatistics {
    /// Compute from results
    pub fn from_results(results: &[CaseResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let count = results.len();
        let total_time: u64 = results.iter().map(|r| r.time_ms).sum();

        Self {
            count,
            total_before: results.iter().map(|r| r.initial_counts.total()).sum(),
            total_after: results.iter().map(|r| r.final_counts.total()).sum(),
            targeted_before: results.iter().map(|r| r.targeted_before()).sum(),
            targeted_after: results.iter().map(|r| r.targeted_after()).sum(),
            total_flips: results.iter().map(|r| r.flips_accepted).sum(),
            unsound_cases: results.iter().filter(|r| !r.is_sound()).count(),
            avg_time_ms: total_time as f64 / count as f64,
        }
    }

    /// Fraction of targeted collisions removed
    pub fn reduction_rate(&self) -> f64 {
        if self.targeted_before == 0 {
            0.0
        } else {
            self.targeted_before.saturating_sub(self.targeted_after) as f64 / self.targeted_before as f64
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_new() {
        let suite = OptimizerSuite::new();
        assert!(suite.results().is_empty());
        assert_eq!(suite.statistics().count, 0);
    }

    #[test]
    fn test_bench_case() {
        let mut suite = OptimizerSuite::with_seed(1);
        let lattice = Lattice::linear(3);
        let table = FrequencyTable::uniform(vec![5.0, 5.1, 5.005], -0.33);
        let result = suite.bench_case("chain", &lattice, &table).unwrap();

        assert_eq!(result.targeted_before(), 1);
        assert_eq!(result.targeted_after(), 0);
        assert_eq!(result.flips_accepted, 1);
        assert!(result.is_sound());
        assert_eq!(suite.results().len(), 1);
    }

    #[test]
    fn test_run_random() {
        let mut suite = OptimizerSuite::with_seed(42);
        let results = suite.run_random(5, 8, 3, 0.1).unwrap();
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.num_qubits == 8 && r.num_edges == 10));
        assert!(results.iter().all(CaseResult::is_sound));
    }

    #[test]
    fn test_statistics() {
        let mut suite = OptimizerSuite::with_seed(42);
        suite.run_quick().unwrap();
        let stats = suite.statistics();

        assert_eq!(stats.count, 8);
        assert_eq!(stats.unsound_cases, 0);
        assert!(stats.targeted_after <= stats.targeted_before);
        assert!((0.0..=1.0).contains(&stats.reduction_rate()));

        suite.clear();
        assert!(suite.results().is_empty());
    }

    #[test]
    fn test_consistency_rejects_missing_triple() {
        let lattice = Lattice::linear(3);
        let table = FrequencyTable::uniform(vec![5.0, 5.1, 5.005], -0.33);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let tensor = classifier.classify(&classifier.default_gates());

        assert!(!triples_consistent(&tensor, &CollisionList::empty()));
        assert!(triples_consistent(&CollisionTensor::zeros(3), &CollisionList::empty()));
    }
}
