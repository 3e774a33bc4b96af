//! # QFC Calibration
//!
//! Collision bounds, device correlations, and frequency statistics.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qfc_calibration // L2: Calibration (완료)
//!     CollisionBounds // 충돌 경계 계산 (완료)
//!         BoundaryPreset, BoundaryOverrides, BoundarySpec
//!         compute(), QubitBounds::resolve()
//!     DeviceRegistry // 디바이스 정의 (완료)
//!         from_json(), get(), lattice()
//!         anharmonicities_from_frequencies(), frequencies_from_resistances()
//!     FrequencyStats // NaN 제외 통계 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qfc_calibration::prelude::*;
//!
//! let bounds = CollisionBounds::with_defaults(-0.33);
//! assert!(bounds.near_nbr_01_01.contains(0.01));
//! assert!(bounds.slow_gate.contains(0.2));
//!
//! let half = CollisionBounds::compute(
//!     -0.33,
//!     &BoundarySpec::new(BoundaryPreset::GateErrHalfPct),
//!     None,
//! );
//! assert!(half.near_nbr_01_01.contains(0.03));
//! ```
//!
//! ## Device Lookup
//!
//! ```rust
//! use qfc_calibration::prelude::*;
//!
//! let registry = DeviceRegistry::builtin();
//! let lattice = registry.lattice("heavy_hex_7").unwrap();
//! assert_eq!(lattice.num_qubits(), 7);
//! assert!(registry.get("unknown").is_err());
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Collision bounds (Gantree: L2_Calibration → CollisionBounds)
pub mod bounds;

/// Device definitions (Gantree: L2_Calibration → DeviceRegistry)
pub mod device;

/// Frequency statistics (Gantree: L2_Calibration → FrequencyStats)
pub mod stats;

// ============================================================================
// Re-exports
// ============================================================================

pub use bounds::{
    default_abs_range, BoundaryOverrides, BoundaryPreset, BoundarySpec, Boundaries,
    CollisionBounds, QubitBounds,
};
pub use device::{DeviceDefinition, DeviceRegistry, LinearCorrelation, ResistanceCorrelation};
pub use stats::FrequencyStats;

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qfc_calibration::prelude::*;
    //! ```

    pub use crate::bounds::{
        BoundaryOverrides, BoundaryPreset, BoundarySpec, CollisionBounds, QubitBounds,
    };
    pub use crate::device::{
        DeviceDefinition, DeviceRegistry, LinearCorrelation, ResistanceCorrelation,
    };
    pub use crate::stats::FrequencyStats;
    pub use qfc_core::prelude::*;
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_device_to_per_qubit_bounds() {
        let device = DeviceDefinition::new("pair", 2, vec![(0, 1)])
            .with_anharmonicity_model(vec![LinearCorrelation::new(-0.1, -0.04)]);

        let table = device.anharmonicities_from_frequencies(&[5.0, 5.5]).unwrap();
        let bounds = QubitBounds::resolve(&table, None, &BoundarySpec::default(), None);

        // -0.30 and -0.32 anharmonicity shift the 01-12 window differently
        let w0 = bounds.for_qubit(0).near_nbr_01_12;
        let w1 = bounds.for_qubit(1).near_nbr_01_12;
        assert!((w0.low - 0.27).abs() < 1e-10);
        assert!((w1.low - 0.29).abs() < 1e-10);
    }

    #[test]
    fn test_stats_over_device_table() {
        let registry = DeviceRegistry::builtin();
        let lattice = registry.lattice("linear_5").unwrap();
        let freqs: Vec<f64> = (0..lattice.num_qubits()).map(|q| 5.0 + 0.1 * q as f64).collect();
        let stats = FrequencyStats::from_frequencies(&freqs).unwrap();
        assert_eq!(stats.count, 5);
        assert!((stats.median - 5.2).abs() < 1e-10);
    }

    #[test]
    fn test_preset_from_config_string() {
        let spec = BoundarySpec::from_preset_name("gate_err_0.5%");
        assert_eq!(spec.preset, BoundaryPreset::GateErrHalfPct);
        let spec = BoundarySpec::from_preset_name("nonsense");
        assert_eq!(spec.preset, BoundaryPreset::Default);
    }
}
