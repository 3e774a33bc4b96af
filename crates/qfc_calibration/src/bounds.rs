//! Collision bounds for QFC
//!
//! Gantree: L2_Calibration → CollisionBounds
//!
//! Turns an anharmonicity plus a boundary preset (or partial overrides) into
//! the seven detuning windows used by the classifier, and broadcasts them over
//! a frequency table.

use log::warn;
use qfc_core::{device, windows, FrequencyTable, Ghz, Interval, QfcError, QfcResult, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// BoundaryPreset
// ============================================================================

/// Named base-window set
/// Gantree: BoundaryPreset // default | gate_err_1% | gate_err_0.5%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BoundaryPreset {
    /// Built-in defaults
    #[default]
    #[serde(rename = "default")]
    Default,
    /// Roughly 1% two-qubit gate error (same windows as the default)
    #[serde(rename = "gate_err_1%")]
    GateErr1Pct,
    /// Roughly 0.5% two-qubit gate error
    #[serde(rename = "gate_err_0.5%")]
    GateErrHalfPct,
}

impl BoundaryPreset {
    /// All presets
    pub const ALL: [BoundaryPreset; 3] = [
        BoundaryPreset::Default,
        BoundaryPreset::GateErr1Pct,
        BoundaryPreset::GateErrHalfPct,
    ];

    /// Preset name as accepted by [`FromStr`]
    pub const fn name(&self) -> &'static str {
        match self {
            BoundaryPreset::Default => "default",
            BoundaryPreset::GateErr1Pct => "gate_err_1%",
            BoundaryPreset::GateErrHalfPct => "gate_err_0.5%",
        }
    }

    /// Lenient lookup: unknown names fall back to the default windows
    /// Gantree: from_name_or_default(name) -> Self // 관대한 조회
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(
                "Unknown boundary preset '{}', using default collision windows",
                name
            );
            BoundaryPreset::Default
        })
    }

    /// Base windows before the anharmonicity shift
    /// Gantree: base() -> Boundaries // 기본 경계
    pub fn base(&self) -> Boundaries {
        let (w0101, w022, w12) = match self {
            BoundaryPreset::Default | BoundaryPreset::GateErr1Pct => (
                windows::NEAR_NBR_01_01,
                windows::NEAR_NBR_01_022,
                windows::NEAR_NBR_01_12,
            ),
            BoundaryPreset::GateErrHalfPct => (
                windows::half_pct::NEAR_NBR_01_01,
                windows::half_pct::NEAR_NBR_01_022,
                windows::half_pct::NEAR_NBR_01_12,
            ),
        };
        let near_nbr_01_01 = Interval::from_array(w0101);
        let near_nbr_01_022 = Interval::from_array(w022);
        let near_nbr_01_12 = Interval::from_array(w12);

        Boundaries {
            near_nbr_01_01,
            near_nbr_01_022,
            near_nbr_01_12,
            slow_gate_below_neg_anh_ov2: near_nbr_01_022.low,
            slow_gate_above_anh: near_nbr_01_12.high,
            tvia_c_01_01: near_nbr_01_01,
            tvia_c_01_12: self.through_control_01_12(near_nbr_01_12),
            spectator: near_nbr_01_01,
        }
    }

    /// TviaC_01_12 follows NearNbr_01_12 only under the 0.5% preset
    fn through_control_01_12(&self, near_nbr_01_12: Interval) -> Interval {
        match self {
            BoundaryPreset::GateErrHalfPct => near_nbr_01_12,
            _ => Interval::from_array(windows::TVIA_C_01_12),
        }
    }
}

impl FromStr for BoundaryPreset {
    type Err = QfcError;

    fn from_str(s: &str) -> QfcResult<Self> {
        match s.trim() {
            "" | "default" => Ok(BoundaryPreset::Default),
            "gate_err_1%" => Ok(BoundaryPreset::GateErr1Pct),
            "gate_err_0.5%" => Ok(BoundaryPreset::GateErrHalfPct),
            other => Err(QfcError::UnknownPreset(other.to_string())),
        }
    }
}

impl fmt::Display for BoundaryPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Boundaries
// ============================================================================

/// Base windows, not yet shifted by the anharmonicity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundaries {
    /// NearNbr_01_01 base window
    pub near_nbr_01_01: Interval,
    /// NearNbr_01_022 base window
    pub near_nbr_01_022: Interval,
    /// NearNbr_01_12 base window
    pub near_nbr_01_12: Interval,
    /// Slow-gate lower offset from -|anharm|/2
    pub slow_gate_below_neg_anh_ov2: Ghz,
    /// Slow-gate upper offset from |anharm|
    pub slow_gate_above_anh: Ghz,
    /// TviaC_01_01 base window
    pub tvia_c_01_01: Interval,
    /// TviaC_01_12 base window
    pub tvia_c_01_12: Interval,
    /// Spectator two-photon window
    pub spectator: Interval,
}

impl Default for Boundaries {
    fn default() -> Self {
        BoundaryPreset::Default.base()
    }
}

// ============================================================================
// BoundaryOverrides
// ============================================================================

/// Partial replacement of base windows
/// Gantree: BoundaryOverrides // 부분 재정의
///
/// Overriding a base window also moves the fields derived from it unless
/// those are overridden too.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryOverrides {
    /// NearNbr_01_01
    pub near_nbr_01_01: Option<Interval>,
    /// NearNbr_01_022
    pub near_nbr_01_022: Option<Interval>,
    /// NearNbr_01_12
    pub near_nbr_01_12: Option<Interval>,
    /// SlowGateBelowNegAnhOv2
    pub slow_gate_below_neg_anh_ov2: Option<Ghz>,
    /// SlowGateAboveAnh
    pub slow_gate_above_anh: Option<Ghz>,
    /// TviaC_01_01
    pub tvia_c_01_01: Option<Interval>,
    /// TviaC_01_12
    pub tvia_c_01_12: Option<Interval>,
    /// Spectator
    pub spectator: Option<Interval>,
}

impl BoundaryOverrides {
    /// No overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing is overridden
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Override NearNbr_01_01
    pub fn with_near_nbr_01_01(mut self, window: Interval) -> Self {
        self.near_nbr_01_01 = Some(window);
        self
    }

    /// Override NearNbr_01_022
    pub fn with_near_nbr_01_022(mut self, window: Interval) -> Self {
        self.near_nbr_01_022 = Some(window);
        self
    }

    /// Override NearNbr_01_12
    pub fn with_near_nbr_01_12(mut self, window: Interval) -> Self {
        self.near_nbr_01_12 = Some(window);
        self
    }

    /// Override both slow-gate offsets
    pub fn with_slow_gate_offsets(mut self, below: Ghz, above: Ghz) -> Self {
        self.slow_gate_below_neg_anh_ov2 = Some(below);
        self.slow_gate_above_anh = Some(above);
        self
    }

    /// Override TviaC_01_01
    pub fn with_tvia_c_01_01(mut self, window: Interval) -> Self {
        self.tvia_c_01_01 = Some(window);
        self
    }

    /// Override TviaC_01_12
    pub fn with_tvia_c_01_12(mut self, window: Interval) -> Self {
        self.tvia_c_01_12 = Some(window);
        self
    }

    /// Override Spectator
    pub fn with_spectator(mut self, window: Interval) -> Self {
        self.spectator = Some(window);
        self
    }

    /// Check override windows are ordered and finite
    pub fn validate(&self) -> QfcResult<()> {
        let windows = [
            self.near_nbr_01_01,
            self.near_nbr_01_022,
            self.near_nbr_01_12,
            self.tvia_c_01_01,
            self.tvia_c_01_12,
            self.spectator,
        ];
        for w in windows.into_iter().flatten() {
            Interval::checked(w.low, w.high)?;
        }
        for offset in [self.slow_gate_below_neg_anh_ov2, self.slow_gate_above_anh]
            .into_iter()
            .flatten()
        {
            if !offset.is_finite() {
                return Err(QfcError::ConfigError(format!(
                    "slow-gate offset must be finite, got {}",
                    offset
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// BoundarySpec
// ============================================================================

/// Preset plus overrides
/// Gantree: BoundarySpec // 경계 사양
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundarySpec {
    /// Base preset
    pub preset: BoundaryPreset,
    /// Partial overrides on top of the preset
    pub overrides: BoundaryOverrides,
}

impl BoundarySpec {
    /// Preset without overrides
    pub fn new(preset: BoundaryPreset) -> Self {
        Self {
            preset,
            overrides: BoundaryOverrides::default(),
        }
    }

    /// Preset looked up by name, lenient
    pub fn from_preset_name(name: &str) -> Self {
        Self::new(BoundaryPreset::from_name_or_default(name))
    }

    /// Default preset with the given overrides
    pub fn overridden(overrides: BoundaryOverrides) -> Self {
        Self {
            preset: BoundaryPreset::Default,
            overrides,
        }
    }

    /// Replace the overrides
    pub fn with_overrides(mut self, overrides: BoundaryOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Final base windows
    /// Gantree: resolve() -> Boundaries // 재정의 적용
    pub fn resolve(&self) -> Boundaries {
        let base = self.preset.base();
        let o = &self.overrides;

        let near_nbr_01_01 = o.near_nbr_01_01.unwrap_or(base.near_nbr_01_01);
        let near_nbr_01_022 = o.near_nbr_01_022.unwrap_or(base.near_nbr_01_022);
        let near_nbr_01_12 = o.near_nbr_01_12.unwrap_or(base.near_nbr_01_12);

        Boundaries {
            near_nbr_01_01,
            near_nbr_01_022,
            near_nbr_01_12,
            slow_gate_below_neg_anh_ov2: o
                .slow_gate_below_neg_anh_ov2
                .unwrap_or(near_nbr_01_022.low),
            slow_gate_above_anh: o.slow_gate_above_anh.unwrap_or(near_nbr_01_12.high),
            tvia_c_01_01: o.tvia_c_01_01.unwrap_or(near_nbr_01_01),
            tvia_c_01_12: o
                .tvia_c_01_12
                .unwrap_or_else(|| self.preset.through_control_01_12(near_nbr_01_12)),
            spectator: o.spectator.unwrap_or(near_nbr_01_01),
        }
    }
}

impl From<BoundaryPreset> for BoundarySpec {
    fn from(preset: BoundaryPreset) -> Self {
        Self::new(preset)
    }
}

// ============================================================================
// CollisionBounds
// ============================================================================

/// Anharmonicity-shifted collision windows
/// Gantree: CollisionBounds // 7종 충돌 경계 + AbsMinMax
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionBounds {
    /// Category 1 window on signed detuning
    pub near_nbr_01_01: Interval,
    /// Category 2 window, centered on |anharm|/2
    pub near_nbr_01_022: Interval,
    /// Category 3 window, centered on |anharm|
    pub near_nbr_01_12: Interval,
    /// Category 4 allowed control-minus-target detuning
    pub slow_gate: Interval,
    /// Category 5 window
    pub tvia_c_01_01: Interval,
    /// Category 6 window, centered on |anharm|
    pub tvia_c_01_12: Interval,
    /// Category 7 window on the two-photon detuning magnitude
    pub spectator: Interval,
    /// Acceptable absolute frequency range
    pub abs_min_max: Interval,
}

impl CollisionBounds {
    /// Compute bounds
    /// Gantree: compute(anharm, spec, abs_range?) -> Self // 경계 계산
    ///
    /// Never fails. `abs_range` defaults to `[4.8, 5.4]` GHz.
    pub fn compute(anharmonicity: Ghz, spec: &BoundarySpec, abs_range: Option<Interval>) -> Self {
        Self::from_boundaries(anharmonicity, &spec.resolve(), abs_range)
    }

    /// Compute from already-resolved base windows
    pub fn from_boundaries(
        anharmonicity: Ghz,
        base: &Boundaries,
        abs_range: Option<Interval>,
    ) -> Self {
        let a = anharmonicity.abs();

        Self {
            near_nbr_01_01: base.near_nbr_01_01,
            near_nbr_01_022: base.near_nbr_01_022.shifted(a / 2.0),
            near_nbr_01_12: base.near_nbr_01_12.shifted(a),
            slow_gate: Interval::new(
                -a / 2.0 + base.slow_gate_below_neg_anh_ov2,
                a + base.slow_gate_above_anh,
            ),
            tvia_c_01_01: base.tvia_c_01_01,
            tvia_c_01_12: base.tvia_c_01_12.shifted(a),
            spectator: base.spectator,
            abs_min_max: abs_range.unwrap_or_else(default_abs_range),
        }
    }

    /// Default preset, default absolute range
    pub fn with_defaults(anharmonicity: Ghz) -> Self {
        Self::compute(anharmonicity, &BoundarySpec::default(), None)
    }

    /// Replace the absolute range
    pub fn with_abs_range(mut self, abs_range: Interval) -> Self {
        self.abs_min_max = abs_range;
        self
    }
}

impl fmt::Display for CollisionBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CollisionBounds:")?;
        writeln!(f, "  NearNbr_01_01:  {}", self.near_nbr_01_01)?;
        writeln!(f, "  NearNbr_01_022: {}", self.near_nbr_01_022)?;
        writeln!(f, "  NearNbr_01_12:  {}", self.near_nbr_01_12)?;
        writeln!(f, "  SlowGate:       {}", self.slow_gate)?;
        writeln!(f, "  TviaC_01_01:    {}", self.tvia_c_01_01)?;
        writeln!(f, "  TviaC_01_12:    {}", self.tvia_c_01_12)?;
        writeln!(f, "  Spectator:      {}", self.spectator)?;
        write!(f, "  AbsMinMax:      {}", self.abs_min_max)
    }
}

/// `[4.8, 5.4]` GHz
pub fn default_abs_range() -> Interval {
    Interval::new(device::ABS_MIN_GHZ, device::ABS_MAX_GHZ)
}

// ============================================================================
// QubitBounds
// ============================================================================

/// Collision bounds broadcast over a lattice
/// Gantree: QubitBounds // Uniform | PerQubit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QubitBounds {
    /// One set for every qubit
    Uniform(CollisionBounds),
    /// One set per qubit, derived from each qubit's anharmonicity
    PerQubit {
        /// Bounds indexed by qubit
        bounds: Vec<CollisionBounds>,
        /// Shared absolute range
        abs_range: Interval,
    },
}

impl QubitBounds {
    /// Broadcast bounds over `table`
    /// Gantree: resolve(table, explicit?, spec, abs_range?) -> Self // 경계 브로드캐스트
    ///
    /// Uniform anharmonicity uses `explicit` when given. Per-qubit
    /// anharmonicity always recomputes bounds per qubit from `spec` and
    /// ignores `explicit`.
    pub fn resolve(
        table: &FrequencyTable,
        explicit: Option<&CollisionBounds>,
        spec: &BoundarySpec,
        abs_range: Option<Interval>,
    ) -> Self {
        if table.is_per_qubit() {
            if explicit.is_some() {
                warn!(
                    "Explicit collision bounds ignored: table carries per-qubit anharmonicities"
                );
            }
            let base = spec.resolve();
            let abs_range = abs_range.unwrap_or_else(default_abs_range);
            let bounds = (0..table.num_qubits())
                .map(|q| {
                    CollisionBounds::from_boundaries(table.anharmonicity(q), &base, Some(abs_range))
                })
                .collect();
            QubitBounds::PerQubit { bounds, abs_range }
        } else {
            match explicit {
                Some(b) => QubitBounds::Uniform(*b),
                None => QubitBounds::Uniform(CollisionBounds::compute(
                    table.anharmonicity(0),
                    spec,
                    abs_range,
                )),
            }
        }
    }

    /// Bounds for `qubit`
    ///
    /// # Panics
    /// Per-qubit bounds panic when `qubit` is outside the table.
    #[inline]
    pub fn for_qubit(&self, qubit: QubitId) -> &CollisionBounds {
        match self {
            QubitBounds::Uniform(b) => b,
            QubitBounds::PerQubit { bounds, .. } => &bounds[qubit],
        }
    }

    /// Absolute frequency range used for out-of-range lists
    pub fn abs_range(&self) -> Interval {
        match self {
            QubitBounds::Uniform(b) => b.abs_min_max,
            QubitBounds::PerQubit { abs_range, .. } => *abs_range,
        }
    }

    /// True for per-qubit broadcast
    pub fn is_per_qubit(&self) -> bool {
        matches!(self, QubitBounds::PerQubit { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
