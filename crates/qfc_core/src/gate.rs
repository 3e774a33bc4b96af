//! Two-qubit gate directions for QFC
//!
//! Gantree: L1_Lattice → GateDirection
//!
//! A [`GateSet`] assigns one `(control, target)` orientation to every coupler.
//! The initial assignment puts the higher-frequency qubit in the control role.

use crate::error::{QfcError, QfcResult};
use crate::lattice::Lattice;
use crate::types::{Ghz, QubitId, QubitPair};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Gate
// ============================================================================

/// Directed two-qubit gate
/// Gantree: Gate // (control, target)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Gate {
    /// Control qubit
    pub control: QubitId,
    /// Target qubit
    pub target: QubitId,
}

impl Gate {
    /// Create a gate
    #[inline]
    pub const fn new(control: QubitId, target: QubitId) -> Self {
        Self { control, target }
    }

    /// Same coupler, roles swapped
    #[inline]
    pub const fn reversed(self) -> Self {
        Self::new(self.target, self.control)
    }

    /// As a `(control, target)` tuple
    #[inline]
    pub const fn as_pair(&self) -> QubitPair {
        (self.control, self.target)
    }
}

impl From<QubitPair> for Gate {
    fn from((control, target): QubitPair) -> Self {
        Self::new(control, target)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.control, self.target)
    }
}

// ============================================================================
// GateSet
// ============================================================================

/// Ordered list of directed gates
/// Gantree: GateSet // 게이트 방향 집합
///
/// Order is preserved because a flip removes the gate and appends its reverse.
/// Equality compares membership only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GateSet {
    gates: Vec<Gate>,
}

impl GateSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an explicit list of gates
    pub fn from_gates(gates: Vec<Gate>) -> Self {
        Self { gates }
    }

    /// Wrap `(control, target)` tuples
    pub fn from_pairs(pairs: &[QubitPair]) -> Self {
        Self {
            gates: pairs.iter().copied().map(Gate::from).collect(),
        }
    }

    /// Higher-frequency qubit becomes control
    /// Gantree: control_higher(pairs, freqs) -> GateSet // 고주파 = control
    ///
    /// For `(a, b)`: `(a, b)` when `f[a] > f[b]`, `(b, a)` otherwise. Equal or
    /// missing frequencies therefore pick `b` as control.
    pub fn control_higher<F>(pairs: &[QubitPair], frequencies: &F) -> Self
    where
        F: AsRef<[Ghz]> + ?Sized,
    {
        let freqs = frequencies.as_ref();
        let freq = |q: QubitId| freqs.get(q).copied().unwrap_or(f64::NAN);

        let gates = pairs
            .iter()
            .map(|&(a, b)| {
                if freq(a) > freq(b) {
                    Gate::new(a, b)
                } else {
                    Gate::new(b, a)
                }
            })
            .collect();

        Self { gates }
    }

    /// Number of gates
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// True when no gate is present
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Iterate in stored order
    pub fn iter(&self) -> impl Iterator<Item = &Gate> {
        self.gates.iter()
    }

    /// Gates as a slice
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// `(control, target)` tuples
    pub fn to_pairs(&self) -> Vec<QubitPair> {
        self.gates.iter().map(Gate::as_pair).collect()
    }

    /// True if `control → target` is present
    #[inline]
    pub fn contains(&self, control: QubitId, target: QubitId) -> bool {
        self.gates.contains(&Gate::new(control, target))
    }

    /// Orientation present on the coupler `{a, b}`, if any
    pub fn orientation(&self, a: QubitId, b: QubitId) -> Option<Gate> {
        self.gates
            .iter()
            .copied()
            .find(|g| (g.control == a && g.target == b) || (g.control == b && g.target == a))
    }

    /// Copy with `control → target` replaced by `target → control`
    /// Gantree: reversed(c, t) -> Option<GateSet> // 방향 반전
    ///
    /// The reversed gate is appended at the end. Returns `None` if the gate is
    /// not present.
    pub fn reversed(&self, control: QubitId, target: QubitId) -> Option<Self> {
        let gate = Gate::new(control, target);
        let position = self.gates.iter().position(|g| *g == gate)?;

        let mut gates = self.gates.clone();
        gates.remove(position);
        gates.push(gate.reversed());
        Some(Self { gates })
    }

    /// Dense `is_gate[control][target]` lookup for `num_qubits`
    pub fn direction_matrix(&self, num_qubits: usize) -> DirectionMatrix {
        let mut matrix = Array2::<bool>::from_elem((num_qubits, num_qubits), false);
        for g in &self.gates {
            if g.control < num_qubits && g.target < num_qubits {
                matrix[[g.control, g.target]] = true;
            }
        }
        DirectionMatrix { matrix }
    }

    /// Check every gate sits on a coupler and every coupler has one gate
    /// Gantree: validate_against(lattice) -> Result // 격자 검증
    pub fn validate_against(&self, lattice: &Lattice) -> QfcResult<()> {
        let n = lattice.num_qubits();
        for g in &self.gates {
            if g.control >= n || g.target >= n {
                return Err(QfcError::QubitOutOfRange {
                    qubit: g.control.max(g.target),
                    num_qubits: n,
                });
            }
            if !lattice.is_adjacent(g.control, g.target) {
                return Err(QfcError::GateNotOnLattice {
                    control: g.control,
                    target: g.target,
                });
            }
        }

        for (a, b) in lattice.to_pairs() {
            let count = self
                .gates
                .iter()
                .filter(|g| (g.control == a && g.target == b) || (g.control == b && g.target == a))
                .count();
            if count != 1 {
                return Err(QfcError::GateCoverage { q1: a, q2: b, count });
            }
        }

        Ok(())
    }
}

impl PartialEq for GateSet {
    fn eq(&self, other: &Self) -> bool {
        let mut a = self.gates.clone();
        let mut b = other.gates.clone();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }
}

impl FromIterator<Gate> for GateSet {
    fn from_iter<I: IntoIterator<Item = Gate>>(iter: I) -> Self {
        Self {
            gates: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a GateSet {
    type Item = &'a Gate;
    type IntoIter = std::slice::Iter<'a, Gate>;

    fn into_iter(self) -> Self::IntoIter {
        self.gates.iter()
    }
}

impl fmt::Display for GateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, g) in self.gates.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", g)?;
        }
        write!(f, "]")
    }
}

// ============================================================================
// DirectionMatrix
// ============================================================================

/// Dense gate-direction lookup
#[derive(Debug, Clone)]
pub struct DirectionMatrix {
    matrix: Array2<bool>,
}

impl DirectionMatrix {
    /// True if `control → target` is a gate (false out of range)
    #[inline]
    pub fn is_gate(&self, control: QubitId, target: QubitId) -> bool {
        self.matrix
            .get([control, target])
            .copied()
            .unwrap_or(false)
    }

    /// Matrix dimension
    pub fn num_qubits(&self) -> usize {
        self.matrix.nrows()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_higher() {
        let freqs = [5.00, 5.02, 5.10, 4.90];
        let gates = GateSet::control_higher(&[(0, 1), (1, 2), (2, 3), (0, 3)], &freqs[..]);
        assert_eq!(gates.to_pairs(), vec![(1, 0), (2, 1), (2, 3), (0, 3)]);
    }

    #[test]
    fn test_control_higher_equal_frequencies_pick_second() {
        let freqs = vec![5.0, 5.0];
        let gates = GateSet::control_higher(&[(0, 1)], &freqs);
        assert_eq!(gates.to_pairs(), vec![(1, 0)]);

        // Order of the input pair decides the tie
        let gates = GateSet::control_higher(&[(1, 0)], &freqs);
        assert_eq!(gates.to_pairs(), vec![(0, 1)]);
    }

    #[test]
    fn test_control_higher_nan() {
        let freqs = vec![f64::NAN, 5.0];
        let gates = GateSet::control_higher(&[(0, 1), (1, 0)], &freqs);
        assert_eq!(gates.to_pairs(), vec![(1, 0), (0, 1)]);
    }

    #[test]
    fn test_control_higher_accepts_table() {
        let table = crate::types::FrequencyTable::uniform(vec![4.9, 5.1], -0.33);
        let gates = GateSet::control_higher(&[(0, 1)], &table);
        assert!(gates.contains(1, 0));
    }

    #[test]
    fn test_reversed_appends() {
        let gates = GateSet::from_pairs(&[(0, 1), (2, 1), (2, 3)]);
        let flipped = gates.reversed(0, 1).unwrap();
        assert_eq!(flipped.to_pairs(), vec![(2, 1), (2, 3), (1, 0)]);
        assert!(gates.reversed(1, 0).is_none());
        // Original untouched
        assert!(gates.contains(0, 1));
    }

    #[test]
    fn test_set_equality_ignores_order() {
        let a = GateSet::from_pairs(&[(0, 1), (2, 1)]);
        let b = GateSet::from_pairs(&[(2, 1), (0, 1)]);
        assert_eq!(a, b);
        assert_ne!(a, GateSet::from_pairs(&[(1, 0), (2, 1)]));
    }

    #[test]
    fn test_direction_matrix() {
        let gates = GateSet::from_pairs(&[(1, 0), (2, 1)]);
        let dir = gates.direction_matrix(3);
        assert!(dir.is_gate(1, 0));
        assert!(!dir.is_gate(0, 1));
        assert!(!dir.is_gate(7, 0));
    }

    #[test]
    fn test_validate_against() {
        let lattice = Lattice::linear(3);
        assert!(GateSet::from_pairs(&[(1, 0), (1, 2)])
            .validate_against(&lattice)
            .is_ok());

        let err = GateSet::from_pairs(&[(1, 0)])
            .validate_against(&lattice)
            .unwrap_err();
        assert_eq!(err, QfcError::GateCoverage { q1: 1, q2: 2, count: 0 });

        let err = GateSet::from_pairs(&[(0, 2), (1, 0), (1, 2)])
            .validate_against(&lattice)
            .unwrap_err();
        assert!(matches!(err, QfcError::GateNotOnLattice { control: 0, target: 2 }));

        let err = GateSet::from_pairs(&[(1, 0), (0, 1), (1, 2)])
            .validate_against(&lattice)
            .unwrap_err();
        assert!(matches!(err, QfcError::GateCoverage { count: 2, .. }));
    }

    #[test]
    fn test_serde_transparent() {
        let gates = GateSet::from_pairs(&[(1, 0)]);
        let json = serde_json::to_string(&gates).unwrap();
        assert_eq!(json, r#"[{"control":1,"target":0}]"#);
        let back: GateSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, gates);
    }
}
