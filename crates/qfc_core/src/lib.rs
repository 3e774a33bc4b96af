//! # QFC Core
//!
//! Foundation types, lattice adjacency, and gate directions for the Qubit
//! Frequency Collision engine.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qfc_core // L0+L1: Foundation + Lattice (완료)
//!     L0_Foundation // 기반 타입/상수/에러 (완료)
//!         CoreTypes // Interval, FrequencyTable (완료)
//!         Constants // 충돌 경계/디바이스 상수 (완료)
//!         Errors // 에러 타입 (완료)
//!     L1_Lattice // 격자 구조 (완료)
//!         Lattice // 인접 행렬 + 2-hop (완료)
//!         GateDirection // control/target 방향 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qfc_core::prelude::*;
//!
//! let lattice = Lattice::ring(4);
//! assert_eq!(lattice.num_edges(), 4);
//! assert!(lattice.is_two_hop(0, 2));
//!
//! let table = FrequencyTable::uniform(vec![5.00, 5.02, 5.10, 4.90], -0.33);
//! let gates = GateSet::control_higher(&lattice.to_pairs(), &table);
//! assert!(gates.validate_against(&lattice).is_ok());
//! ```
//!
//! ## Heavy Coupling Form
//!
//! ```rust
//! use qfc_core::prelude::*;
//!
//! let lattice = Lattice::from_pairs(&[(0, 1), (1, 2)], None).unwrap();
//! let heavy = lattice.to_heavy();
//! assert_eq!(heavy[&1], vec![0, 2]);
//! assert_eq!(Lattice::from_heavy(&heavy).unwrap(), lattice);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Qubit lattice (Gantree: L1_Lattice → Lattice)
pub mod lattice;

/// Gate directions (Gantree: L1_Lattice → GateDirection)
pub mod gate;

// ============================================================================
// Re-exports
// ============================================================================

pub use constants::{categories, device, windows};
pub use error::{QfcError, QfcResult};
pub use gate::{DirectionMatrix, Gate, GateSet};
pub use lattice::{CouplingMap, HeavyCoupling, Lattice};
pub use types::{Anharmonicity, FrequencyTable, Ghz, Interval, QubitId, QubitPair};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qfc_core::prelude::*;
    //! ```

    pub use crate::constants::{categories, device, windows};
    pub use crate::error::{QfcError, QfcResult};
    pub use crate::gate::{DirectionMatrix, Gate, GateSet};
    pub use crate::lattice::{CouplingMap, HeavyCoupling, Lattice};
    pub use crate::types::{Anharmonicity, FrequencyTable, Ghz, Interval, QubitId, QubitPair};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_ring_gates_cover_every_edge() {
        let lattice = Lattice::ring(6);
        let freqs: Vec<f64> = (0..6).map(|q| 5.0 + 0.03 * q as f64).collect();
        let gates = GateSet::control_higher(&lattice.to_pairs(), &freqs);

        assert_eq!(gates.len(), lattice.num_edges());
        assert!(gates.validate_against(&lattice).is_ok());
        for g in &gates {
            assert!(freqs[g.control] > freqs[g.target]);
        }
    }

    #[test]
    fn test_heavy_hex_roundtrip() {
        let lattice = Lattice::heavy_hex_7();
        let pairs = lattice.to_pairs();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (1, 3), (3, 5), (4, 5), (5, 6)]);

        let from_pairs = Lattice::from_pairs(&pairs, None).unwrap();
        let from_heavy = Lattice::from_heavy(&lattice.to_heavy()).unwrap();
        assert_eq!(from_pairs, lattice);
        assert_eq!(from_heavy, lattice);
    }

    #[test]
    fn test_flip_keeps_coverage() {
        let lattice = Lattice::grid(2, 2);
        let gates = GateSet::control_higher(&lattice.to_pairs(), &[5.0, 5.1, 5.2, 5.3][..]);
        let first = gates.gates()[0];
        let flipped = gates.reversed(first.control, first.target).unwrap();

        assert!(flipped.validate_against(&lattice).is_ok());
        assert!(flipped.contains(first.target, first.control));
        assert_ne!(flipped, gates);
    }

    #[test]
    fn test_constants() {
        assert_eq!(windows::NEAR_NBR_01_01, [0.0, 0.017]);
        assert!((device::ABS_MIN_GHZ - 4.8).abs() < 1e-10);
        assert!((device::ABS_MAX_GHZ - 5.4).abs() < 1e-10);
        assert_eq!(categories::NUM_CATEGORIES, 7);
    }
}
