//! Collision engine configuration
//!
//! Gantree: L4_Integration → CollisionConfig
//!
//! Boundary preset and overrides, absolute frequency range, default
//! anharmonicity for bare-frequency input, and diagnostic verbosity.

use qfc_calibration::{BoundaryOverrides, BoundaryPreset, BoundarySpec};
use qfc_core::{device, FrequencyTable, Ghz, Interval, QfcError, QfcResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Collision engine configuration
/// Gantree: CollisionConfig // 통합 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    // ========================================================================
    // Bounds Parameters
    // ========================================================================
    /// Preset plus partial overrides
    pub boundaries: BoundarySpec,

    /// Absolute frequency range; `[4.8, 5.4]` GHz when unset
    pub absolute_range: Option<Interval>,

    /// Anharmonicity applied to bare frequency lists (GHz)
    pub default_anharmonicity: Ghz,

    // ========================================================================
    // Diagnostics
    // ========================================================================
    /// Demote not-found flip diagnostics from `warn` to `debug`
    pub quiet_diagnostics: bool,
}

impl CollisionConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Built-in windows, typical transmon anharmonicity
    pub fn standard() -> Self {
        Self {
            boundaries: BoundarySpec::default(),
            absolute_range: None,
            default_anharmonicity: device::TYPICAL_ANHARMONICITY_GHZ,
            quiet_diagnostics: false,
        }
    }

    /// 1% two-qubit gate error windows
    pub fn gate_err_1pct() -> Self {
        Self {
            boundaries: BoundarySpec::new(BoundaryPreset::GateErr1Pct),
            ..Self::standard()
        }
    }

    /// 0.5% two-qubit gate error windows
    pub fn gate_err_half_pct() -> Self {
        Self {
            boundaries: BoundarySpec::new(BoundaryPreset::GateErrHalfPct),
            ..Self::standard()
        }
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set preset
    pub fn with_preset(mut self, preset: BoundaryPreset) -> Self {
        self.boundaries.preset = preset;
        self
    }

    /// Set overrides
    pub fn with_overrides(mut self, overrides: BoundaryOverrides) -> Self {
        self.boundaries.overrides = overrides;
        self
    }

    /// Set absolute range
    pub fn with_absolute_range(mut self, range: Interval) -> Self {
        self.absolute_range = Some(range);
        self
    }

    /// Set default anharmonicity
    pub fn with_default_anharmonicity(mut self, anharmonicity: Ghz) -> Self {
        self.default_anharmonicity = anharmonicity;
        self
    }

    /// Set quiet diagnostics
    pub fn with_quiet_diagnostics(mut self, quiet: bool) -> Self {
        self.quiet_diagnostics = quiet;
        self
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Uniform table from bare frequencies
    pub fn table_from_frequencies(&self, frequencies: Vec<Ghz>) -> FrequencyTable {
        FrequencyTable::uniform(frequencies, self.default_anharmonicity)
    }

    /// Absolute range in effect
    pub fn effective_absolute_range(&self) -> Interval {
        self.absolute_range
            .unwrap_or_else(qfc_calibration::default_abs_range)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    pub fn validate(&self) -> QfcResult<()> {
        if let Some(range) = self.absolute_range {
            Interval::checked(range.low, range.high)?;
        }

        if !self.default_anharmonicity.is_finite() {
            return Err(QfcError::ConfigError(format!(
                "default_anharmonicity must be finite, got {}",
                self.default_anharmonicity
            )));
        }

        self.boundaries.overrides.validate()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Parse from JSON
    pub fn from_json(json: &str) -> QfcResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> QfcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> QfcResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for CollisionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CollisionConfig({}, overrides={}, range={}, anharm={:.3})",
            self.boundaries.preset,
            if self.boundaries.overrides.is_empty() {
                "none"
            } else {
                "custom"
            },
            self.effective_absolute_range(),
            self.default_anharmonicity
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
