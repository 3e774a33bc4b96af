//! Core types for QFC
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Type aliases, the closed frequency [`Interval`], and the per-qubit
//! [`FrequencyTable`] consumed by every collision computation.

use crate::error::{QfcError, QfcResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed)
/// Gantree: QubitId // pub type QubitId = usize
pub type QubitId = usize;

/// Frequency or frequency difference in GHz
/// Gantree: Ghz // pub type Ghz = f64
pub type Ghz = f64;

/// Coupler between two qubits
pub type QubitPair = (QubitId, QubitId);

// ============================================================================
// Interval
// ============================================================================

/// Closed interval `[low, high]` in GHz
/// Gantree: Interval // 닫힌 구간
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower edge (inclusive)
    pub low: Ghz,
    /// Upper edge (inclusive)
    pub high: Ghz,
}

impl Interval {
    /// Create an interval without validation
    #[inline]
    pub const fn new(low: Ghz, high: Ghz) -> Self {
        Self { low, high }
    }

    /// Create from a two-element array
    #[inline]
    pub const fn from_array(edges: [Ghz; 2]) -> Self {
        Self::new(edges[0], edges[1])
    }

    /// Create with validation (finite, ordered)
    pub fn checked(low: Ghz, high: Ghz) -> QfcResult<Self> {
        if !low.is_finite() || !high.is_finite() {
            return Err(QfcError::InvalidInterval {
                low,
                high,
                reason: "edges must be finite",
            });
        }
        if low > high {
            return Err(QfcError::InvalidInterval {
                low,
                high,
                reason: "low edge exceeds high edge",
            });
        }
        Ok(Self::new(low, high))
    }

    /// `low <= x <= high`; false for NaN
    #[inline]
    pub fn contains(&self, x: Ghz) -> bool {
        x >= self.low && x <= self.high
    }

    /// `x < low || x > high`; false for NaN
    #[inline]
    pub fn excludes(&self, x: Ghz) -> bool {
        x < self.low || x > self.high
    }

    /// Both edges moved by `offset`
    #[inline]
    pub fn shifted(&self, offset: Ghz) -> Self {
        Self::new(self.low + offset, self.high + offset)
    }

    /// Interval width
    #[inline]
    pub fn width(&self) -> Ghz {
        self.high - self.low
    }

    /// As a two-element array
    #[inline]
    pub fn to_array(&self) -> [Ghz; 2] {
        [self.low, self.high]
    }
}

impl From<[Ghz; 2]> for Interval {
    fn from(edges: [Ghz; 2]) -> Self {
        Self::from_array(edges)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.low, self.high)
    }
}

// ============================================================================
// Anharmonicity
// ============================================================================

/// Anharmonicity source for a frequency table
/// Gantree: Anharmonicity // 균일 | 큐비트별
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Anharmonicity {
    /// One value applies to every qubit
    Uniform(Ghz),
    /// One value per qubit; NaN for unmeasured qubits
    PerQubit(Vec<Ghz>),
}

// ============================================================================
// FrequencyTable
// ============================================================================

/// Per-qubit 0→1 frequencies with their anharmonicities
/// Gantree: FrequencyTable // f01 + anharm 표
///
/// Missing qubits carry `NaN` as their frequency. NaN never falls inside a
/// collision window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable {
    frequencies: Vec<Ghz>,
    anharmonicity: Anharmonicity,
}

impl FrequencyTable {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Bare frequencies with one anharmonicity for every qubit
    /// Gantree: uniform(freqs, anharm) -> Self // 균일 anharm
    pub fn uniform(frequencies: Vec<Ghz>, anharmonicity: Ghz) -> Self {
        Self {
            frequencies,
            anharmonicity: Anharmonicity::Uniform(anharmonicity),
        }
    }

    /// Frequencies paired with per-qubit anharmonicities
    /// Gantree: per_qubit(freqs, anharms) -> Result<Self> // 큐비트별 anharm
    pub fn per_qubit(frequencies: Vec<Ghz>, anharmonicities: Vec<Ghz>) -> QfcResult<Self> {
        if frequencies.len() != anharmonicities.len() {
            return Err(QfcError::ShapeMismatch {
                what: "anharmonicities",
                expected: frequencies.len(),
                actual: anharmonicities.len(),
            });
        }
        Ok(Self {
            frequencies,
            anharmonicity: Anharmonicity::PerQubit(anharmonicities),
        })
    }

    /// Two-column rows `(frequency, anharmonicity)`
    pub fn from_rows(rows: &[(Ghz, Ghz)]) -> Self {
        let (frequencies, anharmonicities) = rows.iter().copied().unzip();
        Self {
            frequencies,
            anharmonicity: Anharmonicity::PerQubit(anharmonicities),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of qubits covered
    pub fn num_qubits(&self) -> usize {
        self.frequencies.len()
    }

    /// Frequency column
    pub fn frequencies(&self) -> &[Ghz] {
        &self.frequencies
    }

    /// Frequency of `qubit` (NaN if out of range)
    #[inline]
    pub fn frequency(&self, qubit: QubitId) -> Ghz {
        self.frequencies.get(qubit).copied().unwrap_or(f64::NAN)
    }

    /// Anharmonicity of `qubit` (NaN if out of range)
    #[inline]
    pub fn anharmonicity(&self, qubit: QubitId) -> Ghz {
        match &self.anharmonicity {
            Anharmonicity::Uniform(a) => *a,
            Anharmonicity::PerQubit(values) => values.get(qubit).copied().unwrap_or(f64::NAN),
        }
    }

    /// Anharmonicity source
    pub fn anharmonicity_source(&self) -> &Anharmonicity {
        &self.anharmonicity
    }

    /// True when anharmonicities were supplied qubit by qubit
    pub fn is_per_qubit(&self) -> bool {
        matches!(self.anharmonicity, Anharmonicity::PerQubit(_))
    }

    /// Qubits whose frequency is missing
    pub fn missing_qubits(&self) -> Vec<QubitId> {
        self.frequencies
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_nan())
            .map(|(q, _)| q)
            .collect()
    }

    /// Require the table to cover exactly `num_qubits`
    /// Gantree: expect_len(n) -> Result // 크기 검증
    pub fn expect_len(&self, num_qubits: usize) -> QfcResult<()> {
        if self.frequencies.len() != num_qubits {
            return Err(QfcError::ShapeMismatch {
                what: "frequencies",
                expected: num_qubits,
                actual: self.frequencies.len(),
            });
        }
        Ok(())
    }
}

impl AsRef<[Ghz]> for FrequencyTable {
    fn as_ref(&self) -> &[Ghz] {
        &self.frequencies
    }
}

impl fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_per_qubit() {
            "per-qubit"
        } else {
            "uniform"
        };
        write!(
            f,
            "FrequencyTable({} qubits, {} anharmonicity, {} missing)",
            self.num_qubits(),
            kind,
            self.missing_qubits().len()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
