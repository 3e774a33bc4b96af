//! Lattice and frequency generators for benchmarking
//!
//! Gantree: L7_Benchmark → Generators
//!
//! Seeded random lattices and frequency tables for exercising the
//! classifier and the direction optimizer.

use qfc_core::{FrequencyTable, Ghz, Interval, Lattice, QfcResult, QubitPair};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Lattice and frequency table for one benchmark case
#[derive(Debug, Clone)]
pub struct RandomCase {
    /// Coupling lattice
    pub lattice: Lattice,
    /// Frequencies and anharmonicities
    pub table: FrequencyTable,
}

/// Random lattice generator
/// Gantree: LatticeGenerator // 격자 생성기
#[derive(Debug, Clone)]
pub struct LatticeGenerator {
    /// Random seed
    seed: Option<u64>,
}

impl LatticeGenerator {
    /// Create new generator
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Create generator with seed
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    // ========================================================================
    // Standard Lattices
    // ========================================================================

    /// Named device shapes
    pub fn standard_shapes(&self) -> Vec<Lattice> {
        vec![
            Lattice::linear(5),
            Lattice::ring(8),
            Lattice::grid(3, 3),
            Lattice::heavy_hex_7(),
            Lattice::all_to_all(4),
        ]
    }

    // ========================================================================
    // Random Lattices
    // ========================================================================

    /// Connected lattice: random spanning tree plus `extra_edges` couplers
    pub fn random_connected(&self, num_qubits: usize, extra_edges: usize) -> QfcResult<Lattice> {
        let mut rng = self.get_rng();
        Self::connected_with(&mut rng, num_qubits, extra_edges)
    }

    fn connected_with(
        rng: &mut StdRng,
        num_qubits: usize,
        extra_edges: usize,
    ) -> QfcResult<Lattice> {
        let mut pairs: Vec<QubitPair> = (1..num_qubits)
            .map(|q| (rng.gen_range(0..q), q))
            .collect();

        let mut spare: Vec<QubitPair> = (0..num_qubits)
            .flat_map(|i| (i + 1..num_qubits).map(move |j| (i, j)))
            .filter(|p| !pairs.contains(p))
            .collect();
        spare.shuffle(rng);
        pairs.extend(spare.into_iter().take(extra_edges));
        pairs.sort_unstable();

        Ok(Lattice::from_pairs(&pairs, Some(num_qubits))?
            .with_name(format!("random_{}q_{}e", num_qubits, pairs.len())))
    }

    // ========================================================================
    // Frequencies
    // ========================================================================

    /// Uniform frequencies in `range`; each qubit is NaN with `nan_fraction`
    pub fn random_frequencies(
        &self,
        num_qubits: usize,
        range: Interval,
        nan_fraction: f64,
    ) -> Vec<Ghz> {
        let mut rng = self.get_rng();
        Self::frequencies_with(&mut rng, num_qubits, range, nan_fraction)
    }

    fn frequencies_with(
        rng: &mut StdRng,
        num_qubits: usize,
        range: Interval,
        nan_fraction: f64,
    ) -> Vec<Ghz> {
        let nan_fraction = nan_fraction.clamp(0.0, 1.0);
        (0..num_qubits)
            .map(|_| {
                if rng.gen_bool(nan_fraction) {
                    f64::NAN
                } else {
                    rng.gen_range(range.low..=range.high)
                }
            })
            .collect()
    }

    /// Random frequencies with one shared anharmonicity
    pub fn uniform_table(&self, num_qubits: usize, range: Interval, anharmonicity: Ghz) -> FrequencyTable {
        FrequencyTable::uniform(self.random_frequencies(num_qubits, range, 0.0), anharmonicity)
    }

    /// Random frequencies with per-qubit anharmonicities drawn from `anharmonicities`
    pub fn per_qubit_table(
        &self,
        num_qubits: usize,
        range: Interval,
        anharmonicities: Interval,
    ) -> QfcResult<FrequencyTable> {
        let mut rng = self.get_rng();
        let frequencies = Self::frequencies_with(&mut rng, num_qubits, range, 0.0);
        let anharm = (0..num_qubits)
            .map(|_| rng.gen_range(anharmonicities.low..=anharmonicities.high))
            .collect();
        FrequencyTable::per_qubit(frequencies, anharm)
    }

    /// Connected lattice with matching random frequencies
    pub fn random_case(
        &self,
        num_qubits: usize,
        extra_edges: usize,
        range: Interval,
        nan_fraction: f64,
        anharmonicity: Ghz,
    ) -> QfcResult<RandomCase> {
        let mut rng = self.get_rng();
        let lattice = Self::connected_with(&mut rng, num_qubits, extra_edges)?;
        let frequencies = Self::frequencies_with(&mut rng, num_qubits, range, nan_fraction);
        Ok(RandomCase {
            lattice,
            table: FrequencyTable::uniform(frequencies, anharmonicity),
        })
    }

    // ========================================================================
    // Utility
    // ========================================================================

    /// Get RNG with optional seed
    fn get_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for LatticeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
