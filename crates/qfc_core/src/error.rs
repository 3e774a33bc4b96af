//! Error types for QFC
//!
//! Gantree: L0_Foundation → Errors
//!
//! Error taxonomy shared by every QFC crate.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for QFC
/// Gantree: QfcError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QfcError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Qubit index out of range
    /// Gantree: QubitOutOfRange{{q,max}} // 큐비트 범위
    #[error("Qubit {qubit} out of range: lattice has {num_qubits} qubits")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },

    /// Array length inconsistent with lattice size
    /// Gantree: ShapeMismatch{{what,expected,actual}} // 크기 불일치
    #[error("Shape mismatch for {what}: expected {expected} entries, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Interval with low > high or non-finite edges
    #[error("Invalid interval [{low}, {high}]: {reason}")]
    InvalidInterval {
        low: f64,
        high: f64,
        reason: &'static str,
    },

    // ========================================================================
    // Lattice Errors
    // ========================================================================
    /// Self-coupling
    /// Gantree: InvalidCoupling(q1,q2) // 자기 연결
    #[error("Invalid coupling ({0}, {1}): qubits must be different")]
    InvalidCoupling(usize, usize),

    // ========================================================================
    // Gate Direction Errors
    // ========================================================================
    /// Gate on a pair with no coupler
    #[error("Gate ({control}, {target}) does not correspond to a lattice edge")]
    GateNotOnLattice { control: usize, target: usize },

    /// Edge without exactly one orientation in the gate set
    /// Gantree: GateCoverage{{q1,q2,count}} // 방향 누락/중복
    #[error("Edge ({q1}, {q2}) has {count} gate orientations, expected exactly 1")]
    GateCoverage { q1: usize, q2: usize, count: usize },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Unknown boundary preset name (strict lookup)
    #[error("Unknown boundary preset '{0}'")]
    UnknownPreset(String),

    /// Unknown device name
    /// Gantree: UnknownDevice(String) // 미등록 디바이스
    #[error("Unknown device '{0}'")]
    UnknownDevice(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for QFC operations
/// Gantree: QfcResult<T> // type alias
pub type QfcResult<T> = Result<T, QfcError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for QfcError {
    fn from(err: serde_json::Error) -> Self {
        QfcError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for QfcError {
    fn from(err: std::io::Error) -> Self {
        QfcError::FileError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl QfcError {
    /// Check if the caller can continue with a different input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            QfcError::UnknownPreset(_) | QfcError::UnknownDevice(_) | QfcError::ConfigError(_)
        )
    }

    /// Check if error is an input-contract violation
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            QfcError::QubitOutOfRange { .. }
                | QfcError::ShapeMismatch { .. }
                | QfcError::InvalidInterval { .. }
                | QfcError::InvalidCoupling(..)
                | QfcError::GateNotOnLattice { .. }
                | QfcError::GateCoverage { .. }
        )
    }

    /// Check if error comes from a configuration lookup
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            QfcError::UnknownPreset(_) | QfcError::UnknownDevice(_) | QfcError::ConfigError(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
