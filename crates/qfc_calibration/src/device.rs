//! Device definitions for QFC
//!
//! Gantree: L2_Calibration → DeviceRegistry
//!
//! A device bundles its coupler list with optional fabrication correlations:
//! anharmonicity versus frequency, and frequency versus junction resistance.
//! Devices are loaded from JSON and looked up by name.

use log::debug;
use qfc_core::{FrequencyTable, Ghz, Lattice, QfcError, QfcResult, QubitPair};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

// ============================================================================
// Correlations
// ============================================================================

/// `anharmonicity = offset + coef * frequency`
/// Gantree: LinearCorrelation // anh vs f
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearCorrelation {
    /// Offset (GHz)
    pub offset: f64,
    /// Slope (dimensionless)
    pub coef: f64,
}

impl LinearCorrelation {
    /// Create a correlation
    pub const fn new(offset: f64, coef: f64) -> Self {
        Self { offset, coef }
    }

    /// Predicted anharmonicity for `frequency` (NaN propagates)
    #[inline]
    pub fn predict(&self, frequency: Ghz) -> Ghz {
        self.offset + self.coef * frequency
    }
}

/// `frequency = offset + coef * resistance^exponent`
/// Gantree: ResistanceCorrelation // f vs R
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResistanceCorrelation {
    /// Offset (GHz)
    pub offset: f64,
    /// Coefficient (GHz / kOhm^exponent)
    pub coef: f64,
    /// Exponent on resistance
    pub exponent: f64,
}

impl ResistanceCorrelation {
    /// Create a correlation
    pub const fn new(offset: f64, coef: f64, exponent: f64) -> Self {
        Self {
            offset,
            coef,
            exponent,
        }
    }

    /// Predicted frequency for a junction resistance in kOhm
    #[inline]
    pub fn predict(&self, resistance_kohm: f64) -> Ghz {
        self.offset + self.coef * resistance_kohm.powf(self.exponent)
    }
}

/// Entry for `qubit`, or the first entry when the model was fitted on a
/// lattice of a different size
fn model_entry<T: Copy>(model: &[T], qubit: usize, num_qubits: usize) -> Option<T> {
    if model.len() == num_qubits {
        model.get(qubit).copied()
    } else {
        model.first().copied()
    }
}

// ============================================================================
// DeviceDefinition
// ============================================================================

/// Named device: couplers plus optional correlations
/// Gantree: DeviceDefinition // 디바이스 정의
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDefinition {
    /// Device name (filled from the registry key when loaded)
    #[serde(default)]
    pub name: String,

    /// Number of qubits
    pub num_qubits: usize,

    /// Pairwise couplers
    pub connections: Vec<QubitPair>,

    /// Per-qubit anharmonicity-vs-frequency fits
    #[serde(default)]
    pub anharmonicity_model: Vec<LinearCorrelation>,

    /// Per-qubit frequency-vs-resistance fits
    #[serde(default)]
    pub frequency_model: Vec<ResistanceCorrelation>,
}

impl DeviceDefinition {
    /// Device with couplers only
    pub fn new(name: &str, num_qubits: usize, connections: Vec<QubitPair>) -> Self {
        Self {
            name: name.to_string(),
            num_qubits,
            connections,
            anharmonicity_model: Vec::new(),
            frequency_model: Vec::new(),
        }
    }

    /// Attach an anharmonicity model
    pub fn with_anharmonicity_model(mut self, model: Vec<LinearCorrelation>) -> Self {
        self.anharmonicity_model = model;
        self
    }

    /// Attach a frequency model
    pub fn with_frequency_model(mut self, model: Vec<ResistanceCorrelation>) -> Self {
        self.frequency_model = model;
        self
    }

    /// Coupling lattice
    /// Gantree: lattice() -> Result<Lattice> // 격자 생성
    pub fn lattice(&self) -> QfcResult<Lattice> {
        Ok(Lattice::from_pairs(&self.connections, Some(self.num_qubits))?.with_name(&self.name))
    }

    /// Anharmonicities predicted from frequencies with this device's model
    /// Gantree: anharmonicities_from_frequencies(fs) -> Result<FrequencyTable>
    pub fn anharmonicities_from_frequencies(&self, frequencies: &[Ghz]) -> QfcResult<FrequencyTable> {
        self.anharmonicities_with_correlation(frequencies, self)
    }

    /// Anharmonicities predicted with another device's model
    ///
    /// When `correlation` covers a different number of qubits, its first
    /// qubit's fit is applied to every qubit.
    pub fn anharmonicities_with_correlation(
        &self,
        frequencies: &[Ghz],
        correlation: &DeviceDefinition,
    ) -> QfcResult<FrequencyTable> {
        self.check_len("frequencies", frequencies.len())?;
        let model = require_model(&correlation.anharmonicity_model, &correlation.name, "anharmonicity")?;
        self.note_fallback(model.len(), &correlation.name);

        let anharmonicities = frequencies
            .iter()
            .enumerate()
            .map(|(q, &f)| {
                model_entry(model, q, self.num_qubits)
                    .map(|c| c.predict(f))
                    .unwrap_or(f64::NAN)
            })
            .collect();

        FrequencyTable::per_qubit(frequencies.to_vec(), anharmonicities)
    }

    /// Frequencies and anharmonicities predicted from junction resistances
    /// Gantree: frequencies_from_resistances(rs) -> Result<FrequencyTable>
    pub fn frequencies_from_resistances(&self, resistances_kohm: &[f64]) -> QfcResult<FrequencyTable> {
        self.frequencies_with_correlation(resistances_kohm, self)
    }

    /// Resistance prediction with another device's models
    pub fn frequencies_with_correlation(
        &self,
        resistances_kohm: &[f64],
        correlation: &DeviceDefinition,
    ) -> QfcResult<FrequencyTable> {
        self.check_len("resistances", resistances_kohm.len())?;
        let fmodel = require_model(&correlation.frequency_model, &correlation.name, "frequency")?;
        self.note_fallback(fmodel.len(), &correlation.name);

        let frequencies: Vec<Ghz> = resistances_kohm
            .iter()
            .enumerate()
            .map(|(q, &r)| {
                model_entry(fmodel, q, self.num_qubits)
                    .map(|c| c.predict(r))
                    .unwrap_or(f64::NAN)
            })
            .collect();

        self.anharmonicities_with_correlation(&frequencies, correlation)
    }

    fn check_len(&self, what: &'static str, actual: usize) -> QfcResult<()> {
        if actual != self.num_qubits {
            return Err(QfcError::ShapeMismatch {
                what,
                expected: self.num_qubits,
                actual,
            });
        }
        Ok(())
    }

    fn note_fallback(&self, model_len: usize, source: &str) {
        if model_len != self.num_qubits {
            debug!(
                "Correlation from '{}' covers {} qubits, device '{}' has {}; using first-qubit fit",
                source, model_len, self.name, self.num_qubits
            );
        }
    }
}

fn require_model<'a, T>(model: &'a [T], device: &str, kind: &str) -> QfcResult<&'a [T]> {
    if model.is_empty() {
        return Err(QfcError::ConfigError(format!(
            "device '{}' defines no {} correlation",
            device, kind
        )));
    }
    Ok(model)
}

impl fmt::Display for DeviceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} qubits, {} couplers",
            self.name,
            self.num_qubits,
            self.connections.len()
        )
    }
}

// ============================================================================
// DeviceRegistry
// ============================================================================

/// Name → device lookup
/// Gantree: DeviceRegistry // 디바이스 레지스트리
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceRegistry {
    devices: BTreeMap<String, DeviceDefinition>,
}

impl DeviceRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of standard lattice shapes (couplers only)
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for lattice in [
            Lattice::linear(5),
            Lattice::ring(8),
            Lattice::heavy_hex_7(),
            Lattice::grid(4, 4),
        ] {
            let name = lattice.name().unwrap_or_default().to_string();
            registry.insert(DeviceDefinition::new(&name, lattice.num_qubits(), lattice.to_pairs()));
        }
        registry
    }

    /// Parse a JSON object of `name → definition`
    /// Gantree: from_json(json) -> Result<Self> // JSON 로드
    pub fn from_json(json: &str) -> QfcResult<Self> {
        let mut registry: Self = serde_json::from_str(json)?;
        for (name, def) in registry.devices.iter_mut() {
            if def.name.is_empty() {
                def.name = name.clone();
            }
        }
        Ok(registry)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> QfcResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> QfcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add or replace a device under its own name
    pub fn insert(&mut self, device: DeviceDefinition) {
        self.devices.insert(device.name.clone(), device);
    }

    /// Look up a device
    /// Gantree: get(name) -> Result<&DeviceDefinition> // 이름 조회
    pub fn get(&self, name: &str) -> QfcResult<&DeviceDefinition> {
        self.devices
            .get(name)
            .ok_or_else(|| QfcError::UnknownDevice(name.to_string()))
    }

    /// Lattice of a named device
    pub fn lattice(&self, name: &str) -> QfcResult<Lattice> {
        self.get(name)?.lattice()
    }

    /// True if `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.devices.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.devices.keys().map(String::as_str).collect()
    }

    /// Number of devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// True when empty
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const REGISTRY_JSON: &str = r#"{
        "test_3q": {
            "num_qubits": 3,
            "connections": [[0, 1], [1, 2]],
            "anharmonicity_model": [
                {"offset": -0.10, "coef": -0.04},
                {"offset": -0.12, "coef": -0.04},
                {"offset": -0.11, "coef": -0.04}
            ],
            "frequency_model": [
                {"offset": 0.0, "coef": 20.0, "exponent": -0.5},
                {"offset": 0.0, "coef": 20.0, "exponent": -0.5},
                {"offset": 0.0, "coef": 20.0, "exponent": -0.5}
            ]
        },
        "bare_2q": {
            "num_qubits": 2,
            "connections": [[0, 1]]
        }
    }"#;

    #[test]
    fn test_registry_lookup() {
        let registry = DeviceRegistry::from_json(REGISTRY_JSON).unwrap();
        assert_eq!(registry.names(), vec!["bare_2q", "test_3q"]);
        assert_eq!(registry.get("test_3q").unwrap().name, "test_3q");

        let err = registry.get("Falcon 27Q").unwrap_err();
        assert_eq!(err, QfcError::UnknownDevice("Falcon 27Q".into()));
    }

    #[test]
    fn test_device_lattice() {
        let registry = DeviceRegistry::from_json(REGISTRY_JSON).unwrap();
        let lattice = registry.lattice("test_3q").unwrap();
        assert_eq!(lattice.num_qubits(), 3);
        assert_eq!(lattice.to_pairs(), vec![(0, 1), (1, 2)]);
        assert_eq!(lattice.name(), Some("test_3q"));
    }

    #[test]
    fn test_anharmonicities_from_frequencies() {
        let registry = DeviceRegistry::from_json(REGISTRY_JSON).unwrap();
        let dev = registry.get("test_3q").unwrap();
        let table = dev
            .anharmonicities_from_frequencies(&[5.0, 5.0, f64::NAN])
            .unwrap();
        assert_abs_diff_eq!(table.anharmonicity(0), -0.30, epsilon = 1e-12);
        assert_abs_diff_eq!(table.anharmonicity(1), -0.32, epsilon = 1e-12);
        assert!(table.anharmonicity(2).is_nan());
    }

    #[test]
    fn test_borrowed_correlation_uses_first_qubit() {
        let registry = DeviceRegistry::from_json(REGISTRY_JSON).unwrap();
        let target = DeviceDefinition::new("ring_4", 4, vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
        let source = registry.get("test_3q").unwrap();
        let table = target
            .anharmonicities_with_correlation(&[5.0, 5.1, 5.2, 5.3], source)
            .unwrap();
        for q in 0..4 {
            let expected = -0.10 - 0.04 * table.frequency(q);
            assert_abs_diff_eq!(table.anharmonicity(q), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_frequencies_from_resistances() {
        let registry = DeviceRegistry::from_json(REGISTRY_JSON).unwrap();
        let dev = registry.get("test_3q").unwrap();
        let table = dev.frequencies_from_resistances(&[16.0, 16.0, 16.0]).unwrap();
        assert_abs_diff_eq!(table.frequency(0), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(table.anharmonicity(0), -0.30, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_model_and_shape() {
        let registry = DeviceRegistry::from_json(REGISTRY_JSON).unwrap();
        let bare = registry.get("bare_2q").unwrap();
        assert!(matches!(
            bare.anharmonicities_from_frequencies(&[5.0, 5.1]),
            Err(QfcError::ConfigError(_))
        ));
        let dev = registry.get("test_3q").unwrap();
        assert!(matches!(
            dev.anharmonicities_from_frequencies(&[5.0]),
            Err(QfcError::ShapeMismatch { expected: 3, actual: 1, .. })
        ));
    }

    #[test]
    fn test_builtin_registry() {
        let registry = DeviceRegistry::builtin();
        assert!(registry.contains("heavy_hex_7"));
        assert_eq!(registry.lattice("grid_4x4").unwrap().num_edges(), 24);
    }

    #[test]
    fn test_registry_json_roundtrip() {
        let registry = DeviceRegistry::from_json(REGISTRY_JSON).unwrap();
        let json = registry.to_json().unwrap();
        assert_eq!(DeviceRegistry::from_json(&json).unwrap(), registry);
    }
}
