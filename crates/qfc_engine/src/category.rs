//! Collision categories for QFC
//!
//! Gantree: L3_Classification → CollisionCategory
//!
//! Seven failure modes, numbered 1 to 7. Categories 1 to 4 involve a coupled
//! pair; 5 to 7 involve a third qubit.

use qfc_core::categories::NUM_CATEGORIES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Collision failure mode
/// Gantree: CollisionCategory // 7종 충돌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CollisionCategory {
    /// 1: coupled qubits with degenerate 0→1 transitions
    NearNbr0101,
    /// 2: 0→1 of one qubit at half the 0→2 of its neighbor
    NearNbr01022,
    /// 3: 0→1 of one qubit on the 1→2 of its neighbor
    NearNbr0112,
    /// 4: control-target detuning outside the fast cross-resonance range
    SlowGate,
    /// 5: two targets of a shared control with degenerate 0→1
    ThroughControl0101,
    /// 6: two targets of a shared control, 0→1 on 1→2
    ThroughControl0112,
    /// 7: control 0→2 degenerate with target plus spectator 0→1
    Spectator,
}

impl CollisionCategory {
    /// In category-number order
    pub const ALL: [CollisionCategory; NUM_CATEGORIES] = [
        CollisionCategory::NearNbr0101,
        CollisionCategory::NearNbr01022,
        CollisionCategory::NearNbr0112,
        CollisionCategory::SlowGate,
        CollisionCategory::ThroughControl0101,
        CollisionCategory::ThroughControl0112,
        CollisionCategory::Spectator,
    ];

    /// Categories the direction optimizer targets, in pass order
    pub const OPTIMIZED: [CollisionCategory; 3] = [
        CollisionCategory::ThroughControl0101,
        CollisionCategory::ThroughControl0112,
        CollisionCategory::Spectator,
    ];

    /// Zero-based tensor slice
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Category number 1..=7
    #[inline]
    pub const fn number(self) -> usize {
        self as usize + 1
    }

    /// From a 1..=7 category number
    pub fn from_number(number: usize) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Collision-list key, e.g. `type5`
    pub const fn label(self) -> &'static str {
        match self {
            CollisionCategory::NearNbr0101 => "type1",
            CollisionCategory::NearNbr01022 => "type2",
            CollisionCategory::NearNbr0112 => "type3",
            CollisionCategory::SlowGate => "type4",
            CollisionCategory::ThroughControl0101 => "type5",
            CollisionCategory::ThroughControl0112 => "type6",
            CollisionCategory::Spectator => "type7",
        }
    }

    /// Bounds-window name
    pub const fn window_name(self) -> &'static str {
        match self {
            CollisionCategory::NearNbr0101 => "NearNbr_01_01",
            CollisionCategory::NearNbr01022 => "NearNbr_01_022",
            CollisionCategory::NearNbr0112 => "NearNbr_01_12",
            CollisionCategory::SlowGate => "SlowGate",
            CollisionCategory::ThroughControl0101 => "TviaC_01_01",
            CollisionCategory::ThroughControl0112 => "TviaC_01_12",
            CollisionCategory::Spectator => "Spectator",
        }
    }

    /// Instances are `[Control, Target, Spectator]` triples
    #[inline]
    pub const fn is_three_qubit(self) -> bool {
        matches!(
            self,
            CollisionCategory::ThroughControl0101
                | CollisionCategory::ThroughControl0112
                | CollisionCategory::Spectator
        )
    }
}

impl fmt::Display for CollisionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type {} ({})", self.number(), self.window_name())
    }
}

// ============================================================================
// CategoryCounts
// ============================================================================

/// Collision count per category
/// Gantree: CategoryCounts // [usize; 7]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryCounts([usize; NUM_CATEGORIES]);

impl CategoryCounts {
    /// All zero
    pub const fn zero() -> Self {
        Self([0; NUM_CATEGORIES])
    }

    /// Wrap raw counts
    pub const fn from_array(counts: [usize; NUM_CATEGORIES]) -> Self {
        Self(counts)
    }

    /// Count for `category`
    #[inline]
    pub fn get(&self, category: CollisionCategory) -> usize {
        self.0[category.index()]
    }

    /// Sum over all categories
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Raw counts in category order
    pub fn as_array(&self) -> &[usize; NUM_CATEGORIES] {
        &self.0
    }

    /// No category other than `except` is higher than in `baseline`
    /// Gantree: no_worse_except(baseline, target) -> bool // 비회귀 검사
    pub fn no_worse_except(&self, baseline: &CategoryCounts, except: CollisionCategory) -> bool {
        CollisionCategory::ALL
            .iter()
            .filter(|&&c| c != except)
            .all(|&c| self.get(c) <= baseline.get(c))
    }

    /// No category is higher than in `baseline`
    pub fn no_worse_than(&self, baseline: &CategoryCounts) -> bool {
        CollisionCategory::ALL
            .iter()
            .all(|&c| self.get(c) <= baseline.get(c))
    }
}

impl Index<CollisionCategory> for CategoryCounts {
    type Output = usize;

    fn index(&self, category: CollisionCategory) -> &usize {
        &self.0[category.index()]
    }
}

impl IndexMut<CollisionCategory> for CategoryCounts {
    fn index_mut(&mut self, category: CollisionCategory) -> &mut usize {
        &mut self.0[category.index()]
    }
}

impl fmt::Display for CategoryCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "] total={}", self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering() {
        for (i, c) in CollisionCategory::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
            assert_eq!(c.number(), i + 1);
            assert_eq!(CollisionCategory::from_number(i + 1), Some(*c));
        }
        assert_eq!(CollisionCategory::from_number(0), None);
        assert_eq!(CollisionCategory::from_number(8), None);
        assert_eq!(CollisionCategory::Spectator.label(), "type7");
    }

    #[test]
    fn test_three_qubit() {
        let three: Vec<_> = CollisionCategory::ALL
            .into_iter()
            .filter(|c| c.is_three_qubit())
            .collect();
        assert_eq!(three, CollisionCategory::OPTIMIZED.to_vec());
    }

    #[test]
    fn test_no_worse_except() {
        let base = CategoryCounts::from_array([1, 0, 0, 2, 3, 0, 1]);
        let better_target = CategoryCounts::from_array([1, 0, 0, 2, 1, 0, 1]);
        let worse_other = CategoryCounts::from_array([1, 0, 0, 3, 1, 0, 1]);
        let worse_target = CategoryCounts::from_array([1, 0, 0, 2, 4, 0, 1]);

        let target = CollisionCategory::ThroughControl0101;
        assert!(better_target.no_worse_except(&base, target));
        assert!(!worse_other.no_worse_except(&base, target));
        // Target category is not part of the filter
        assert!(worse_target.no_worse_except(&base, target));
        assert!(!worse_target.no_worse_than(&base));
    }

    #[test]
    fn test_index_mut() {
        let mut counts = CategoryCounts::zero();
        counts[CollisionCategory::SlowGate] += 2;
        assert_eq!(counts.get(CollisionCategory::SlowGate), 2);
        assert_eq!(counts.total(), 2);
    }
}
