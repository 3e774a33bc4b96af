//! Frequency statistics for QFC
//!
//! Gantree: L2_Calibration → FrequencyStats
//!
//! Summary statistics over measured qubits; missing (NaN) qubits are skipped.

use qfc_core::Ghz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// f01 summary over measured qubits
/// Gantree: FrequencyStats // count/mean/median/max/min/std
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyStats {
    /// Number of non-NaN qubits
    pub count: usize,
    /// Mean frequency
    pub mean: Ghz,
    /// Median frequency
    pub median: Ghz,
    /// Maximum frequency
    pub max: Ghz,
    /// Minimum frequency
    pub min: Ghz,
    /// Population standard deviation
    pub std: Ghz,
}

impl FrequencyStats {
    /// Compute statistics, `None` if every qubit is missing
    /// Gantree: from_frequencies(fs) -> Option<Self> // NaN 제외 통계
    pub fn from_frequencies(frequencies: &[Ghz]) -> Option<Self> {
        let mut values: Vec<Ghz> = frequencies.iter().copied().filter(|f| !f.is_nan()).collect();
        if values.is_empty() {
            return None;
        }
        values.sort_by(|a, b| a.total_cmp(b));

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 1 {
            values[count / 2]
        } else {
            (values[count / 2 - 1] + values[count / 2]) / 2.0
        };
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            mean,
            median,
            max: values[count - 1],
            min: values[0],
            std: variance.sqrt(),
        })
    }
}

impl fmt::Display for FrequencyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "f01 statistics:")?;
        writeln!(f, "Num QBs: {}", self.count)?;
        writeln!(f, "Mean frequency (GHz): {:.4}", self.mean)?;
        writeln!(f, "Median frequency (GHz): {:.4}", self.median)?;
        writeln!(f, "Max frequency (GHz): {:.4}", self.max)?;
        writeln!(f, "Min frequency (GHz): {:.4}", self.min)?;
        write!(f, "Std frequency (GHz): {:.4}", self.std)
    }
}
