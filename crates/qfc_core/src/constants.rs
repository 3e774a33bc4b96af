//! Constants for QFC
//!
//! Gantree: L0_Foundation → Constants
//!
//! Collision windows, absolute frequency range, and transmon defaults.
//! All frequencies are in GHz.

// ============================================================================
// Collision Window Constants
// Gantree: windows // 충돌 경계
// ============================================================================

pub mod windows {
    //! Base detuning windows before the anharmonicity shift is applied.
    //!
    //! The default set and the `gate_err_1%` set are identical; both target
    //! roughly 1% two-qubit gate error.

    /// Near-neighbor 01-01 degeneracy window
    /// Gantree: NEAR_NBR_01_01: [f64;2] = [0, 0.017]
    pub const NEAR_NBR_01_01: [f64; 2] = [0.0, 0.017];

    /// Near-neighbor 01-02/2 window, centered on |anharm|/2
    pub const NEAR_NBR_01_022: [f64; 2] = [-0.004, 0.004];

    /// Near-neighbor 01-12 window, centered on |anharm|
    pub const NEAR_NBR_01_12: [f64; 2] = [-0.03, 0.03];

    /// Through-control 01-12 window, centered on |anharm|
    pub const TVIA_C_01_12: [f64; 2] = [-0.025, 0.025];

    pub mod half_pct {
        //! Windows for a 0.5% two-qubit gate error target

        /// Near-neighbor 01-01 degeneracy window
        pub const NEAR_NBR_01_01: [f64; 2] = [0.0, 0.04];

        /// Near-neighbor 01-02/2 window
        pub const NEAR_NBR_01_022: [f64; 2] = [-0.01, 0.02];

        /// Near-neighbor 01-12 window
        pub const NEAR_NBR_01_12: [f64; 2] = [-0.04, 0.04];
    }
}

// ============================================================================
// Device Constants
// Gantree: device // 디바이스 기본값
// ============================================================================

pub mod device {
    //! Transmon defaults

    /// Minimum acceptable qubit frequency
    /// Gantree: ABS_MIN_GHZ: f64 = 4.8
    pub const ABS_MIN_GHZ: f64 = 4.8;

    /// Maximum acceptable qubit frequency
    /// Gantree: ABS_MAX_GHZ: f64 = 5.4
    pub const ABS_MAX_GHZ: f64 = 5.4;

    /// Anharmonicity used when a collision list has no bounds to read the
    /// absolute range from
    pub const FALLBACK_ANHARMONICITY_GHZ: f64 = -0.34;

    /// Typical fixed-frequency transmon anharmonicity
    pub const TYPICAL_ANHARMONICITY_GHZ: f64 = -0.33;
}

// ============================================================================
// Category Constants
// ============================================================================

pub mod categories {
    //! Collision category bookkeeping

    /// Number of collision categories tracked in the tensor
    pub const NUM_CATEGORIES: usize = 7;

    /// Maximum number of candidate direction sets per optimizer step
    pub const CANDIDATES_PER_STEP: usize = 4;
}

// ============================================================================
// Tests
// ============================================================================
