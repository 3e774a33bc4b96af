//! Collision classifier for QFC
//!
//! Gantree: L3_Classification → CollisionClassifier
//!
//! Evaluates every qubit pair `i < j` of a lattice against the collision
//! windows and produces the N×N×7 [`CollisionTensor`].
//!
//! Coupled pairs run the ordered chain NearNbr_01_01 → NearNbr_01_022 →
//! NearNbr_01_12 → SlowGate, first match wins. The spectator test runs
//! independently of that chain. Two-hop pairs sharing a control run
//! TviaC_01_01 → TviaC_01_12.

use crate::category::{CategoryCounts, CollisionCategory};
use crate::config::CollisionConfig;
use crate::extractor::CollisionTriple;
use crate::tensor::CollisionTensor;
use log::debug;
use qfc_calibration::{BoundarySpec, CollisionBounds, QubitBounds};
use qfc_core::{
    DirectionMatrix, FrequencyTable, GateSet, Ghz, Interval, Lattice, QfcError, QfcResult, QubitId,
};

/// Pair classifier bound to one lattice and one frequency table
/// Gantree: CollisionClassifier // 충돌 분류기
#[derive(Debug, Clone)]
pub struct CollisionClassifier<'a> {
    lattice: &'a Lattice,
    table: &'a FrequencyTable,
    bounds: QubitBounds,
}

impl<'a> CollisionClassifier<'a> {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create with already-broadcast bounds
    /// Gantree: new(lattice, table, bounds) -> Result<Self> // 크기 검증
    pub fn new(lattice: &'a Lattice, table: &'a FrequencyTable, bounds: QubitBounds) -> QfcResult<Self> {
        let n = lattice.num_qubits();
        table.expect_len(n)?;
        if let QubitBounds::PerQubit { bounds: per_qubit, .. } = &bounds {
            if per_qubit.len() != n {
                return Err(QfcError::ShapeMismatch {
                    what: "per-qubit bounds",
                    expected: n,
                    actual: per_qubit.len(),
                });
            }
        }
        Ok(Self {
            lattice,
            table,
            bounds,
        })
    }

    /// Default preset and absolute range
    pub fn with_defaults(lattice: &'a Lattice, table: &'a FrequencyTable) -> QfcResult<Self> {
        let bounds = QubitBounds::resolve(table, None, &BoundarySpec::default(), None);
        Self::new(lattice, table, bounds)
    }

    /// Bounds derived from a configuration
    ///
    /// `explicit` bounds are used only for uniform-anharmonicity tables.
    pub fn from_config(
        lattice: &'a Lattice,
        table: &'a FrequencyTable,
        config: &CollisionConfig,
        explicit: Option<&CollisionBounds>,
    ) -> QfcResult<Self> {
        let bounds = QubitBounds::resolve(
            table,
            explicit,
            &config.boundaries,
            config.absolute_range,
        );
        Self::new(lattice, table, bounds)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Lattice
    pub fn lattice(&self) -> &'a Lattice {
        self.lattice
    }

    /// Frequency table
    pub fn table(&self) -> &'a FrequencyTable {
        self.table
    }

    /// Broadcast bounds
    pub fn bounds(&self) -> &QubitBounds {
        &self.bounds
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.lattice.num_qubits()
    }

    /// Higher-frequency-is-control assignment over this lattice
    pub fn default_gates(&self) -> GateSet {
        GateSet::control_higher(&self.lattice.to_pairs(), self.table)
    }

    // ========================================================================
    // Classification
    // ========================================================================

    /// Build the collision tensor for `gates`
    /// Gantree: classify(gates) -> CollisionTensor // N×N×7 분류
    pub fn classify(&self, gates: &GateSet) -> CollisionTensor {
        let n = self.num_qubits();
        let dir = gates.direction_matrix(n);
        let mut tensor = CollisionTensor::zeros(n);

        for i in 0..n {
            for j in i + 1..n {
                if self.lattice.is_adjacent(i, j) {
                    if let Some(category) = self.near_neighbor_category(i, j, &dir) {
                        tensor.set(i, j, category);
                    }
                    if !self.spectator_triples(i, j, &dir).is_empty() {
                        tensor.set(i, j, CollisionCategory::Spectator);
                    }
                } else if self.lattice.is_two_hop(i, j) {
                    if let Some(category) = self.through_control_category(i, j, &dir) {
                        tensor.set(i, j, category);
                    }
                }
            }
        }

        debug!(
            "Classified {} qubits, {} gates: counts {}",
            n,
            gates.len(),
            tensor.counts()
        );
        tensor
    }

    /// Category counts for `gates`
    pub fn counts(&self, gates: &GateSet) -> CategoryCounts {
        self.classify(gates).counts()
    }

    /// First matching category for a coupled pair, excluding the spectator
    fn near_neighbor_category(
        &self,
        i: QubitId,
        j: QubitId,
        dir: &DirectionMatrix,
    ) -> Option<CollisionCategory> {
        if self.pair_in(i, j, |b| b.near_nbr_01_01) {
            return Some(CollisionCategory::NearNbr0101);
        }
        if self.pair_in(i, j, |b| b.near_nbr_01_022) {
            return Some(CollisionCategory::NearNbr01022);
        }
        if self.pair_in(i, j, |b| b.near_nbr_01_12) {
            return Some(CollisionCategory::NearNbr0112);
        }

        let d1 = self.detuning(i, j);
        if dir.is_gate(i, j) && self.bounds.for_qubit(i).slow_gate.excludes(d1) {
            return Some(CollisionCategory::SlowGate);
        }
        if dir.is_gate(j, i) && self.bounds.for_qubit(j).slow_gate.excludes(-d1) {
            return Some(CollisionCategory::SlowGate);
        }
        None
    }

    /// Category for a two-hop pair that shares a control qubit
    fn through_control_category(
        &self,
        i: QubitId,
        j: QubitId,
        dir: &DirectionMatrix,
    ) -> Option<CollisionCategory> {
        if self.through_controls(i, j, dir).is_empty() {
            return None;
        }
        if self.pair_in(i, j, |b| b.tvia_c_01_01) {
            Some(CollisionCategory::ThroughControl0101)
        } else if self.pair_in(i, j, |b| b.tvia_c_01_12) {
            Some(CollisionCategory::ThroughControl0112)
        } else {
            None
        }
    }

    /// `f_i - f_j ∈ window(bounds_i)` or `f_j - f_i ∈ window(bounds_j)`
    #[inline]
    fn pair_in<W>(&self, i: QubitId, j: QubitId, window: W) -> bool
    where
        W: Fn(&CollisionBounds) -> Interval,
    {
        let d1 = self.detuning(i, j);
        window(self.bounds.for_qubit(i)).contains(d1) || window(self.bounds.for_qubit(j)).contains(-d1)
    }

    #[inline]
    fn detuning(&self, i: QubitId, j: QubitId) -> Ghz {
        self.table.frequency(i) - self.table.frequency(j)
    }

    // ========================================================================
    // Three-Qubit Helpers
    // Shared with the extractor so listed triples always match tensor bits
    // ========================================================================

    /// Common neighbors `k` (ascending) that control `i` or `j`
    pub(crate) fn through_controls(&self, i: QubitId, j: QubitId, dir: &DirectionMatrix) -> Vec<QubitId> {
        self.lattice
            .common_neighbors(i, j)
            .into_iter()
            .filter(|&k| dir.is_gate(k, i) || dir.is_gate(k, j))
            .collect()
    }

    /// Spectator triples `(control, target, k)` of the gate on coupler `{i, j}`
    ///
    /// `k` ranges over qubits adjacent to the control, ascending. The
    /// two-photon detuning `|2 f_c + anharm_c - f_t - f_k|` must fall inside
    /// the control's spectator window.
    pub(crate) fn spectator_triples(
        &self,
        i: QubitId,
        j: QubitId,
        dir: &DirectionMatrix,
    ) -> Vec<CollisionTriple> {
        let (control, target) = if dir.is_gate(i, j) {
            (i, j)
        } else if dir.is_gate(j, i) {
            (j, i)
        } else {
            return Vec::new();
        };

        let window = self.bounds.for_qubit(control).spectator;
        let two_photon = 2.0 * self.table.frequency(control) + self.table.anharmonicity(control)
            - self.table.frequency(target);

        self.lattice
            .neighbors(control)
            .into_iter()
            .filter(|&k| k != target)
            .filter(|&k| window.contains((two_photon - self.table.frequency(k)).abs()))
            .map(|k| CollisionTriple::new(control, target, k))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
