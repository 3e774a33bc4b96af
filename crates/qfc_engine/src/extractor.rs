//! Collision list extraction for QFC
//!
//! Gantree: L3_Classification → CollisionExtractor
//!
//! Converts a [`CollisionTensor`] into role-tagged instances. Pairs for
//! categories 1 to 4, `[Control, Target, Spectator]` triples for 5 to 7, plus
//! the qubits outside the absolute frequency range.

use crate::category::{CategoryCounts, CollisionCategory};
use crate::classifier::CollisionClassifier;
use crate::tensor::CollisionTensor;
use log::debug;
use qfc_core::{GateSet, Interval, QubitId, QubitPair};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Instances
// ============================================================================

/// Three-qubit collision roles
/// Gantree: CollisionTriple // [Control, Target, Spectator]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollisionTriple {
    /// Control qubit
    pub control: QubitId,
    /// Target qubit
    pub target: QubitId,
    /// Spectator qubit
    pub spectator: QubitId,
}

impl CollisionTriple {
    /// Create a triple
    pub const fn new(control: QubitId, target: QubitId, spectator: QubitId) -> Self {
        Self {
            control,
            target,
            spectator,
        }
    }

    /// `[control, target, spectator]`
    pub const fn to_array(&self) -> [QubitId; 3] {
        [self.control, self.target, self.spectator]
    }
}

impl fmt::Display for CollisionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.control, self.target, self.spectator)
    }
}

/// One listed collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CollisionInstance {
    /// Coupled pair (categories 1 to 4)
    Pair(QubitPair),
    /// Role-tagged triple (categories 5 to 7)
    Triple(CollisionTriple),
}

impl CollisionInstance {
    /// Qubits involved, in role order
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            CollisionInstance::Pair((a, b)) => vec![*a, *b],
            CollisionInstance::Triple(t) => t.to_array().to_vec(),
        }
    }

    /// The triple, if this is one
    pub fn as_triple(&self) -> Option<&CollisionTriple> {
        match self {
            CollisionInstance::Triple(t) => Some(t),
            CollisionInstance::Pair(_) => None,
        }
    }
}

impl fmt::Display for CollisionInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionInstance::Pair((a, b)) => write!(f, "[{}, {}]", a, b),
            CollisionInstance::Triple(t) => write!(f, "{}", t),
        }
    }
}

// ============================================================================
// CollisionList
// ============================================================================

/// Role-tagged collisions plus out-of-range qubits
/// Gantree: CollisionList // type1..type7 + QBsAboveMax/QBsBelowMin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionList {
    /// Instances per category; every category has an entry
    pub entries: BTreeMap<CollisionCategory, Vec<CollisionInstance>>,
    /// Qubits with `f > max`
    pub qubits_above_max: Vec<QubitId>,
    /// Qubits with `f < min` or missing
    pub qubits_below_min: Vec<QubitId>,
}

impl CollisionList {
    /// Empty list with every category present
    pub fn empty() -> Self {
        Self {
            entries: CollisionCategory::ALL
                .iter()
                .map(|&c| (c, Vec::new()))
                .collect(),
            qubits_above_max: Vec::new(),
            qubits_below_min: Vec::new(),
        }
    }

    /// Instances of `category`
    pub fn get(&self, category: CollisionCategory) -> &[CollisionInstance] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Triples of a three-qubit category
    pub fn triples(&self, category: CollisionCategory) -> Vec<CollisionTriple> {
        self.get(category)
            .iter()
            .filter_map(|inst| inst.as_triple().copied())
            .collect()
    }

    /// Number of listed instances of `category`
    pub fn count(&self, category: CollisionCategory) -> usize {
        self.get(category).len()
    }

    /// Listed instance counts
    ///
    /// May exceed tensor counts for category 5 and 7, where one flagged pair
    /// can list several triples.
    pub fn counts(&self) -> CategoryCounts {
        let mut counts = CategoryCounts::zero();
        for c in CollisionCategory::ALL {
            counts[c] = self.count(c);
        }
        counts
    }

    /// Total listed instances
    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// No collisions and every qubit in range
    pub fn is_clean(&self) -> bool {
        self.total() == 0 && self.qubits_above_max.is_empty() && self.qubits_below_min.is_empty()
    }

    fn push(&mut self, category: CollisionCategory, instance: CollisionInstance) {
        self.entries.entry(category).or_default().push(instance);
    }
}

impl Default for CollisionList {
    fn default() -> Self {
        Self::empty()
    }
}

// ============================================================================
// CollisionExtractor
// ============================================================================

/// Tensor → list conversion
/// Gantree: CollisionExtractor // 충돌 목록 추출
#[derive(Debug, Clone)]
pub struct CollisionExtractor<'c, 'a> {
    classifier: &'c CollisionClassifier<'a>,
    abs_range: Option<Interval>,
}

impl<'c, 'a> CollisionExtractor<'c, 'a> {
    /// Extractor reading the absolute range from the classifier's bounds
    pub fn new(classifier: &'c CollisionClassifier<'a>) -> Self {
        Self {
            classifier,
            abs_range: None,
        }
    }

    /// Override the absolute frequency range
    pub fn with_abs_range(mut self, abs_range: Interval) -> Self {
        self.abs_range = Some(abs_range);
        self
    }

    /// Absolute range in effect
    pub fn abs_range(&self) -> Interval {
        self.abs_range
            .unwrap_or_else(|| self.classifier.bounds().abs_range())
    }

    /// Build the list for `tensor` under `gates`
    /// Gantree: extract(tensor, gates) -> CollisionList // 역할 태깅
    pub fn extract(&self, tensor: &CollisionTensor, gates: &GateSet) -> CollisionList {
        let n = self.classifier.num_qubits();
        let lattice = self.classifier.lattice();
        let dir = gates.direction_matrix(n);
        let mut list = CollisionList::empty();

        for category in [
            CollisionCategory::NearNbr0101,
            CollisionCategory::NearNbr01022,
            CollisionCategory::NearNbr0112,
            CollisionCategory::SlowGate,
        ] {
            for pair in tensor.flagged_pairs(category) {
                list.push(category, CollisionInstance::Pair(pair));
            }
        }

        for (i, j) in tensor.flagged_pairs(CollisionCategory::ThroughControl0101) {
            for k in self.classifier.through_controls(i, j, &dir) {
                list.push(
                    CollisionCategory::ThroughControl0101,
                    CollisionInstance::Triple(CollisionTriple::new(k, i, j)),
                );
            }
        }

        for (i, j) in tensor.flagged_pairs(CollisionCategory::ThroughControl0112) {
            for k in lattice.common_neighbors(i, j) {
                let triple = if dir.is_gate(k, i) {
                    CollisionTriple::new(k, i, j)
                } else if dir.is_gate(k, j) {
                    CollisionTriple::new(k, j, i)
                } else {
                    continue;
                };
                list.push(
                    CollisionCategory::ThroughControl0112,
                    CollisionInstance::Triple(triple),
                );
            }
        }

        for (i, j) in tensor.flagged_pairs(CollisionCategory::Spectator) {
            for triple in self.classifier.spectator_triples(i, j, &dir) {
                list.push(CollisionCategory::Spectator, CollisionInstance::Triple(triple));
            }
        }

        let (above, below) = self.out_of_range();
        list.qubits_above_max = above;
        list.qubits_below_min = below;

        debug!(
            "Extracted {} collision instances; {} qubits above max, {} below min",
            list.total(),
            list.qubits_above_max.len(),
            list.qubits_below_min.len()
        );
        list
    }

    /// Classify and extract in one step
    pub fn classify_and_extract(&self, gates: &GateSet) -> (CollisionTensor, CollisionList) {
        let tensor = self.classifier.classify(gates);
        let list = self.extract(&tensor, gates);
        (tensor, list)
    }

    /// `(above_max, below_min_or_missing)`
    fn out_of_range(&self) -> (Vec<QubitId>, Vec<QubitId>) {
        let range = self.abs_range();
        let table = self.classifier.table();
        let mut above = Vec::new();
        let mut below = Vec::new();
        for q in 0..table.num_qubits() {
            let f = table.frequency(q);
            if f > range.high {
                above.push(q);
            } else if f < range.low || f.is_nan() {
                below.push(q);
            }
        }
        (above, below)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qfc_core::{FrequencyTable, Lattice};

    #[test]
    fn test_empty_tensor_fills_range_lists() {
        let lattice = Lattice::linear(4);
        let table = FrequencyTable::uniform(vec![5.0, 5.5, f64::NAN, 4.7], -0.33);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let extractor = CollisionExtractor::new(&classifier);

        let list = extractor.extract(&CollisionTensor::zeros(4), &classifier.default_gates());
        assert_eq!(list.total(), 0);
        assert_eq!(list.entries.len(), 7);
        assert_eq!(list.qubits_above_max, vec![1]);
        assert_eq!(list.qubits_below_min, vec![2, 3]);
    }

    #[test]
    fn test_nan_only_below_min() {
        let lattice = Lattice::linear(2);
        let table = FrequencyTable::uniform(vec![f64::NAN, 5.0], -0.33);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let (_, list) = CollisionExtractor::new(&classifier)
            .classify_and_extract(&classifier.default_gates());
        assert_eq!(list.qubits_below_min, vec![0]);
        assert!(list.qubits_above_max.is_empty());
    }

    #[test]
    fn test_abs_range_override() {
        let lattice = Lattice::linear(2);
        let table = FrequencyTable::uniform(vec![5.0, 5.3], -0.33);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let extractor = CollisionExtractor::new(&classifier).with_abs_range(Interval::new(5.1, 5.2));
        let list = extractor.extract(&CollisionTensor::zeros(2), &GateSet::new());
        assert_eq!(list.qubits_above_max, vec![1]);
        assert_eq!(list.qubits_below_min, vec![0]);
    }

    #[test]
    fn test_through_control_roles() {
        // Star: 1 is the only neighbor of 0 and 2
        let lattice = Lattice::linear(3);
        let table = FrequencyTable::uniform(vec![5.0, 5.2, 5.005], -0.33);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let gates = GateSet::from_pairs(&[(1, 0), (2, 1)]);
        let (_, list) = CollisionExtractor::new(&classifier).classify_and_extract(&gates);

        assert_eq!(
            list.triples(CollisionCategory::ThroughControl0101),
            vec![CollisionTriple::new(1, 0, 2)]
        );
    }

    #[test]
    fn test_through_control_01_12_target_first() {
        let lattice = Lattice::linear(3);
        let table = FrequencyTable::uniform(vec![5.0, 5.2, 5.33], -0.33);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();

        // 1 controls 2 only: the controlled qubit is listed as target
        let gates = GateSet::from_pairs(&[(0, 1), (1, 2)]);
        let (tensor, list) = CollisionExtractor::new(&classifier).classify_and_extract(&gates);
        assert!(tensor.get(0, 2, CollisionCategory::ThroughControl0112));
        assert_eq!(
            list.triples(CollisionCategory::ThroughControl0112),
            vec![CollisionTriple::new(1, 2, 0)]
        );
    }

    #[test]
    fn test_spectator_roles() {
        let lattice = Lattice::from_pairs(&[(0, 1), (0, 2)], None).unwrap();
        let table = FrequencyTable::uniform(vec![5.0, 4.99, 4.68], -0.33);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let gates = GateSet::from_pairs(&[(0, 1), (0, 2)]);
        let (tensor, list) = CollisionExtractor::new(&classifier).classify_and_extract(&gates);

        assert_eq!(tensor.count(CollisionCategory::Spectator), 2);
        assert_eq!(
            list.triples(CollisionCategory::Spectator),
            vec![CollisionTriple::new(0, 1, 2), CollisionTriple::new(0, 2, 1)]
        );
        assert_eq!(
            list.get(CollisionCategory::NearNbr0101),
            &[CollisionInstance::Pair((0, 1))]
        );
    }

    #[test]
    fn test_list_serde_shape() {
        let mut list = CollisionList::empty();
        list.push(CollisionCategory::NearNbr0101, CollisionInstance::Pair((0, 1)));
        list.push(
            CollisionCategory::Spectator,
            CollisionInstance::Triple(CollisionTriple::new(0, 1, 2)),
        );
        let json = serde_json::to_string(&list).unwrap();
        assert!(json.contains("[0,1]"));
        let back: CollisionList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }
}
