//! Collision reports and participation scores
//!
//! Gantree: L5_Reporting → CollisionReport
//!
//! Text summaries of a [`CollisionList`] and weighted collision scores for a
//! subset of qubits.

use crate::category::CollisionCategory;
use crate::extractor::{CollisionInstance, CollisionList};
use qfc_core::categories::NUM_CATEGORIES;
use qfc_core::{Interval, QubitId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write;

// ============================================================================
// Text Reports
// ============================================================================

/// `[[a, b], [c, d, e]]`
fn format_instances(instances: &[CollisionInstance]) -> String {
    let mut out = String::from("[");
    for (n, instance) in instances.iter().enumerate() {
        if n > 0 {
            out.push_str(", ");
        }
        out.push_str(&format_qubits(&instance.qubits()));
    }
    out.push(']');
    out
}

fn format_qubits(qubits: &[QubitId]) -> String {
    let items: Vec<String> = qubits.iter().map(|q| q.to_string()).collect();
    format!("[{}]", items.join(", "))
}

/// Per-category summary, one line per category plus a total
/// Gantree: format_summary(list) -> String // 유형별 요약
///
/// ```text
/// Type 5:  1 collisions.	[[1, 0, 2]]. Format [Contr,Target,Spec].
/// Total: 1 collisions.
/// ```
pub fn format_summary(list: &CollisionList) -> String {
    let mut out = String::new();
    for category in CollisionCategory::ALL {
        let instances = list.get(category);
        let suffix = if category.is_three_qubit() && !instances.is_empty() {
            ". Format [Contr,Target,Spec]."
        } else {
            "."
        };
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "Type {}:  {} collisions.\t{}{}",
            category.number(),
            instances.len(),
            format_instances(instances),
            suffix
        );
    }
    let _ = write!(out, "Total: {} collisions.", list.total());
    out
}

/// Qubits outside `range`, as listed in `list`
/// Gantree: range_report(list, range) -> String // 범위 초과 보고
pub fn range_report(list: &CollisionList, range: Interval) -> String {
    format!(
        "Qubits exceeding absolute frequency bounds:\n  \
         Qubits having f01 below {} GHz, or blank: {}\n  \
         Qubits having f01 above {} GHz: {}",
        range.low,
        format_qubits(&list.qubits_below_min),
        range.high,
        format_qubits(&list.qubits_above_max)
    )
}

// ============================================================================
// Participation Scores
// ============================================================================

/// Per-category score weights
/// Gantree: CategoryWeights // 유형별 가중치
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights([f64; NUM_CATEGORIES]);

impl CategoryWeights {
    /// Same weight for every category
    pub const fn uniform(weight: f64) -> Self {
        Self([weight; NUM_CATEGORIES])
    }

    /// Explicit weights in category order
    pub const fn from_array(weights: [f64; NUM_CATEGORIES]) -> Self {
        Self(weights)
    }

    /// Set one weight
    pub fn with_weight(mut self, category: CollisionCategory, weight: f64) -> Self {
        self.0[category.index()] = weight;
        self
    }

    /// Weight of `category`
    pub fn get(&self, category: CollisionCategory) -> f64 {
        self.0[category.index()]
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

fn weighted_score<P>(list: &CollisionList, weights: Option<&CategoryWeights>, mut keep: P) -> f64
where
    P: FnMut(&[QubitId]) -> bool,
{
    let weights = weights.copied().unwrap_or_default();
    CollisionCategory::ALL
        .iter()
        .map(|&category| {
            let hits = list
                .get(category)
                .iter()
                .filter(|instance| keep(&instance.qubits()))
                .count();
            hits as f64 * weights.get(category)
        })
        .sum()
}

/// Weighted count of instances touching any qubit of `subset`
/// Gantree: participation_score(list, subset, weights) -> f64 // FC 점수 v1
pub fn participation_score(
    list: &CollisionList,
    subset: &[QubitId],
    weights: Option<&CategoryWeights>,
) -> f64 {
    let subset: BTreeSet<QubitId> = subset.iter().copied().collect();
    weighted_score(list, weights, |qubits| qubits.iter().any(|q| subset.contains(q)))
}

/// Weighted count of instances whose qubits all lie in `subset`
/// Gantree: containment_score(list, subset, weights) -> f64 // FC 점수 v2
pub fn containment_score(
    list: &CollisionList,
    subset: &[QubitId],
    weights: Option<&CategoryWeights>,
) -> f64 {
    let subset: BTreeSet<QubitId> = subset.iter().copied().collect();
    weighted_score(list, weights, |qubits| qubits.iter().all(|q| subset.contains(q)))
}

/// Score at or below `threshold`
pub fn within_threshold(score: f64, threshold: f64) -> bool {
    score <= threshold
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::CollisionClassifier;
    use approx::assert_abs_diff_eq;
    use crate::extractor::CollisionExtractor;
    use qfc_core::{FrequencyTable, Lattice};

    fn chain_list() -> CollisionList {
        let lattice = Lattice::linear(3);
        let table = FrequencyTable::uniform(vec![5.0, 5.1, f64::NAN], -0.33);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let extractor = CollisionExtractor::new(&classifier);
        extractor.classify_and_extract(&classifier.default_gates()).1
    }

    fn through_control_list() -> CollisionList {
        let lattice = Lattice::linear(3);
        let table = FrequencyTable::uniform(vec![5.0, 5.1, 5.005], -0.33);
        let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
        let extractor = CollisionExtractor::new(&classifier);
        extractor.classify_and_extract(&classifier.default_gates()).1
    }

    #[test]
    fn test_summary_format() {
        let text = format_summary(&through_control_list());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "Type 1:  0 collisions.\t[].");
        assert_eq!(
            lines[4],
            "Type 5:  1 collisions.\t[[1, 0, 2]]. Format [Contr,Target,Spec]."
        );
        assert_eq!(lines[6], "Type 7:  0 collisions.\t[].");
        assert_eq!(lines[7], "Total: 1 collisions.");
    }

    #[test]
    fn test_range_report() {
        let text = range_report(&chain_list(), Interval::new(4.8, 5.4));
        assert!(text.starts_with("Qubits exceeding absolute frequency bounds:"));
        assert!(text.contains("below 4.8 GHz, or blank: [2]"));
        assert!(text.contains("above 5.4 GHz: []"));
    }

    #[test]
    fn test_scores() {
        let list = through_control_list();
        // Single instance [1, 0, 2]
        assert_eq!(participation_score(&list, &[0], None), 1.0);
        assert_eq!(containment_score(&list, &[0], None), 0.0);
        assert_eq!(containment_score(&list, &[0, 1, 2], None), 1.0);
        assert_eq!(participation_score(&list, &[], None), 0.0);

        let weights = CategoryWeights::default()
            .with_weight(CollisionCategory::ThroughControl0101, 2.5);
        assert_abs_diff_eq!(participation_score(&list, &[2], Some(&weights)), 2.5);
        assert_abs_diff_eq!(containment_score(&list, &[0, 1, 2], Some(&weights)), 2.5);
        assert!(within_threshold(2.5, 4.0));
        assert!(!within_threshold(4.5, 4.0));
    }

    #[test]
    fn test_empty_list() {
        let text = format_summary(&CollisionList::empty());
        assert!(text.ends_with("Total: 0 collisions."));
        assert!(!text.contains("Format"));
    }
}
