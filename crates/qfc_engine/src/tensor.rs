//! Collision tensor for QFC
//!
//! Gantree: L3_Classification → CollisionTensor
//!
//! N×N×7 binary tensor. Only the upper triangle (`i < j`) is ever set.

use crate::category::{CategoryCounts, CollisionCategory};
use ndarray::{s, Array3};
use qfc_core::categories::NUM_CATEGORIES;
use qfc_core::{QubitId, QubitPair};
use serde::{Deserialize, Serialize};

/// Binary collision tensor
/// Gantree: CollisionTensor // Array3<u8> N×N×7
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionTensor {
    data: Array3<u8>,
}

impl CollisionTensor {
    /// All-zero tensor for `num_qubits`
    pub fn zeros(num_qubits: usize) -> Self {
        Self {
            data: Array3::zeros((num_qubits, num_qubits, NUM_CATEGORIES)),
        }
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.data.shape()[0]
    }

    /// Bit for pair `(i, j)` in `category` (false out of range)
    #[inline]
    pub fn get(&self, i: QubitId, j: QubitId, category: CollisionCategory) -> bool {
        self.data
            .get([i, j, category.index()])
            .map(|&v| v != 0)
            .unwrap_or(false)
    }

    /// Set bit for pair `(i, j)`
    #[inline]
    pub(crate) fn set(&mut self, i: QubitId, j: QubitId, category: CollisionCategory) {
        self.data[[i, j, category.index()]] = 1;
    }

    /// Number of flagged pairs in `category`
    pub fn count(&self, category: CollisionCategory) -> usize {
        self.data
            .slice(s![.., .., category.index()])
            .iter()
            .filter(|&&v| v != 0)
            .count()
    }

    /// Counts for every category
    /// Gantree: counts() -> CategoryCounts // 유형별 합계
    pub fn counts(&self) -> CategoryCounts {
        let mut counts = CategoryCounts::zero();
        for c in CollisionCategory::ALL {
            counts[c] = self.count(c);
        }
        counts
    }

    /// Flagged pairs of `category` in row-major order
    pub fn flagged_pairs(&self, category: CollisionCategory) -> Vec<QubitPair> {
        let n = self.num_qubits();
        let k = category.index();
        let mut pairs = Vec::new();
        for i in 0..n {
            for j in 0..n {
                if self.data[[i, j, k]] != 0 {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Sum of all bits
    pub fn total(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// True when no bit is set
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }

    /// Underlying array
    pub fn as_array(&self) -> &Array3<u8> {
        &self.data
    }
}

/// Serialized as per-category flagged pairs
#[derive(Serialize, Deserialize)]
struct TensorRepr {
    num_qubits: usize,
    flagged: Vec<Vec<QubitPair>>,
}

impl Serialize for CollisionTensor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TensorRepr {
            num_qubits: self.num_qubits(),
            flagged: CollisionCategory::ALL
                .iter()
                .map(|&c| self.flagged_pairs(c))
                .collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CollisionTensor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let repr = TensorRepr::deserialize(deserializer)?;
        if repr.flagged.len() != NUM_CATEGORIES {
            return Err(D::Error::invalid_length(
                repr.flagged.len(),
                &"seven category lists",
            ));
        }
        let mut tensor = CollisionTensor::zeros(repr.num_qubits);
        for (category, pairs) in CollisionCategory::ALL.iter().zip(&repr.flagged) {
            for &(i, j) in pairs {
                if i >= repr.num_qubits || j >= repr.num_qubits {
                    return Err(D::Error::custom(format!(
                        "pair ({}, {}) outside {} qubits",
                        i, j, repr.num_qubits
                    )));
                }
                tensor.set(i, j, *category);
            }
        }
        Ok(tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_pairs() {
        let mut t = CollisionTensor::zeros(4);
        assert!(t.is_empty());
        t.set(0, 1, CollisionCategory::NearNbr0101);
        t.set(2, 3, CollisionCategory::NearNbr0101);
        t.set(0, 1, CollisionCategory::Spectator);

        assert_eq!(t.count(CollisionCategory::NearNbr0101), 2);
        assert_eq!(t.total(), 3);
        assert_eq!(
            t.flagged_pairs(CollisionCategory::NearNbr0101),
            vec![(0, 1), (2, 3)]
        );
        let counts = t.counts();
        assert_eq!(counts.as_array(), &[2, 0, 0, 0, 0, 0, 1]);
        assert!(t.get(0, 1, CollisionCategory::Spectator));
        assert!(!t.get(9, 1, CollisionCategory::Spectator));
    }

    #[test]
    fn test_zero_qubits() {
        let t = CollisionTensor::zeros(0);
        assert!(t.is_empty());
        assert_eq!(t.counts().total(), 0);
    }

    #[test]
    fn test_serde() {
        let mut t = CollisionTensor::zeros(3);
        t.set(0, 2, CollisionCategory::ThroughControl0101);
        let json = serde_json::to_string(&t).unwrap();
        let back: CollisionTensor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);

        let bad = r#"{"num_qubits": 2, "flagged": [[[0, 5]], [], [], [], [], [], []]}"#;
        assert!(serde_json::from_str::<CollisionTensor>(bad).is_err());
    }
}
