//! Pipeline for staged collision analysis
//!
//! Gantree: L6_Integration → CollisionPipeline
//!
//! Resolve bounds → assign gates → classify → extract → optimize, keeping
//! every intermediate result.

use crate::category::CategoryCounts;
use crate::classifier::CollisionClassifier;
use crate::config::CollisionConfig;
use crate::extractor::{CollisionExtractor, CollisionList};
use crate::optimizer::{DirectionOptimizer, DirectionOutcome};
use crate::tensor::CollisionTensor;
use log::debug;
use qfc_calibration::{CollisionBounds, QubitBounds};
use qfc_core::{FrequencyTable, GateSet, Lattice, QfcResult};
use serde::{Deserialize, Serialize};

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PipelineStage {
    /// Initial state
    Initial,
    /// Bounds broadcast over the table
    BoundsResolved,
    /// Gate directions chosen
    GatesAssigned,
    /// Tensor computed
    Classified,
    /// Collision list built
    Extracted,
    /// Direction optimization completed
    Optimized,
}

/// Pipeline state holding intermediate results
#[derive(Debug, Clone)]
pub struct PipelineState {
    /// Current stage
    pub stage: PipelineStage,

    /// Configuration
    pub config: CollisionConfig,

    /// Broadcast bounds
    pub bounds: Option<QubitBounds>,

    /// Initial gate directions
    pub gates: Option<GateSet>,

    /// Tensor for the initial gates
    pub tensor: Option<CollisionTensor>,

    /// List for the initial gates
    pub list: Option<CollisionList>,

    /// Optimizer outcome
    pub outcome: Option<DirectionOutcome>,
}

impl PipelineState {
    /// Create new pipeline state
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            stage: PipelineStage::Initial,
            config,
            bounds: None,
            gates: None,
            tensor: None,
            list: None,
            outcome: None,
        }
    }

    /// Check if classified
    pub fn is_classified(&self) -> bool {
        self.tensor.is_some()
    }

    /// Check if optimized
    pub fn is_optimized(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Full analysis result
/// Gantree: CollisionAnalysis // 분석 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionAnalysis {
    /// Initial gate directions
    pub gates: GateSet,
    /// Counts for the initial gates
    pub tensor_counts: CategoryCounts,
    /// List for the initial gates
    pub list: CollisionList,
    /// Optimizer outcome
    pub optimized: DirectionOutcome,
    /// List for the optimized gates
    pub final_list: CollisionList,
}

impl CollisionAnalysis {
    /// Collisions removed by the optimizer
    pub fn reduction(&self) -> usize {
        self.tensor_counts
            .total()
            .saturating_sub(self.optimized.final_counts.total())
    }
}

/// Collision analysis pipeline
/// Gantree: CollisionPipeline // 단계별 실행
#[derive(Debug, Clone)]
pub struct CollisionPipeline {
    lattice: Lattice,
    table: FrequencyTable,
    explicit_gates: Option<GateSet>,
    explicit_bounds: Option<CollisionBounds>,
    state: PipelineState,
}

impl CollisionPipeline {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create pipeline; the table must match the lattice size
    pub fn new(lattice: Lattice, table: FrequencyTable, config: CollisionConfig) -> QfcResult<Self> {
        config.validate()?;
        table.expect_len(lattice.num_qubits())?;
        Ok(Self {
            lattice,
            table,
            explicit_gates: None,
            explicit_bounds: None,
            state: PipelineState::new(config),
        })
    }

    /// Start from explicit gate directions instead of control-higher
    pub fn with_gates(mut self, gates: GateSet) -> QfcResult<Self> {
        gates.validate_against(&self.lattice)?;
        self.explicit_gates = Some(gates);
        Ok(self)
    }

    /// Explicit bounds for uniform-anharmonicity tables
    pub fn with_bounds(mut self, bounds: CollisionBounds) -> Self {
        self.explicit_bounds = Some(bounds);
        self
    }

    // ========================================================================
    // Stage Accessors
    // ========================================================================

    /// Get current stage
    pub fn stage(&self) -> PipelineStage {
        self.state.stage
    }

    /// Get current state
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Get lattice
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Get frequency table
    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    fn classifier(&self, bounds: QubitBounds) -> QfcResult<CollisionClassifier<'_>> {
        CollisionClassifier::new(&self.lattice, &self.table, bounds)
    }

    fn extractor<'c, 'a>(&self, classifier: &'c CollisionClassifier<'a>) -> CollisionExtractor<'c, 'a> {
        let extractor = CollisionExtractor::new(classifier);
        match self.state.config.absolute_range {
            Some(range) => extractor.with_abs_range(range),
            None => extractor,
        }
    }

    // ========================================================================
    // Pipeline Stages
    // ========================================================================

    /// Stage 1: Broadcast bounds over the table
    pub fn resolve_bounds(&mut self) -> QfcResult<&QubitBounds> {
        let config = &self.state.config;
        let bounds = QubitBounds::resolve(
            &self.table,
            self.explicit_bounds.as_ref(),
            &config.boundaries,
            config.absolute_range,
        );
        debug!(
            "Pipeline: bounds resolved ({})",
            if bounds.is_per_qubit() { "per qubit" } else { "uniform" }
        );
        self.state.stage = PipelineStage::BoundsResolved;
        Ok(&*self.state.bounds.insert(bounds))
    }

    /// Stage 2: Initial gate directions
    pub fn assign_gates(&mut self) -> QfcResult<&GateSet> {
        let gates = match &self.explicit_gates {
            Some(gates) => gates.clone(),
            None => GateSet::control_higher(&self.lattice.to_pairs(), &self.table),
        };
        debug!("Pipeline: {} gates assigned", gates.len());
        self.state.stage = PipelineStage::GatesAssigned;
        Ok(&*self.state.gates.insert(gates))
    }

    /// Stage 3: Classify the initial gates
    pub fn classify(&mut self) -> QfcResult<&CollisionTensor> {
        let bounds = self.bounds_or_resolve()?;
        let gates = self.gates_or_assign()?;
        let tensor = self.classifier(bounds)?.classify(&gates);
        self.state.stage = PipelineStage::Classified;
        Ok(&*self.state.tensor.insert(tensor))
    }

    /// Stage 4: Extract the collision list
    pub fn extract(&mut self) -> QfcResult<&CollisionList> {
        let tensor = match &self.state.tensor {
            Some(tensor) => tensor.clone(),
            None => self.classify()?.clone(),
        };
        let bounds = self.bounds_or_resolve()?;
        let gates = self.gates_or_assign()?;
        let classifier = self.classifier(bounds)?;
        let list = self.extractor(&classifier).extract(&tensor, &gates);
        self.state.stage = PipelineStage::Extracted;
        Ok(&*self.state.list.insert(list))
    }

    /// Stage 5: Optimize gate directions
    pub fn optimize(&mut self) -> QfcResult<&DirectionOutcome> {
        let bounds = self.bounds_or_resolve()?;
        let gates = self.gates_or_assign()?;
        let classifier = self.classifier(bounds)?;
        let outcome = DirectionOptimizer::new(&classifier)
            .with_quiet(self.state.config.quiet_diagnostics)
            .optimize(gates);
        self.state.stage = PipelineStage::Optimized;
        Ok(&*self.state.outcome.insert(outcome))
    }

    /// Run full pipeline
    pub fn run(&mut self) -> QfcResult<CollisionAnalysis> {
        self.resolve_bounds()?;
        self.assign_gates()?;
        self.classify()?;
        let list = self.extract()?.clone();
        let optimized = self.optimize()?.clone();

        let bounds = self.bounds_or_resolve()?;
        let classifier = self.classifier(bounds)?;
        let (_, final_list) = self.extractor(&classifier).classify_and_extract(&optimized.gates);

        Ok(CollisionAnalysis {
            gates: self.gates_or_assign()?,
            tensor_counts: optimized.initial_counts,
            list,
            optimized,
            final_list,
        })
    }

    fn bounds_or_resolve(&mut self) -> QfcResult<QubitBounds> {
        match &self.state.bounds {
            Some(bounds) => Ok(bounds.clone()),
            None => self.resolve_bounds().cloned(),
        }
    }

    fn gates_or_assign(&mut self) -> QfcResult<GateSet> {
        match &self.state.gates {
            Some(gates) => Ok(gates.clone()),
            None => self.assign_gates().cloned(),
        }
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Reset pipeline to initial state
    pub fn reset(&mut self) {
        let config = self.state.config.clone();
        self.state = PipelineState::new(config);
    }

    /// Reset and reconfigure
    pub fn reconfigure(&mut self, config: CollisionConfig) -> QfcResult<()> {
        config.validate()?;
        self.state = PipelineState::new(config);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CollisionCategory;
    use qfc_core::QfcError;

    fn chain_pipeline() -> CollisionPipeline {
        CollisionPipeline::new(
            Lattice::linear(3),
            FrequencyTable::uniform(vec![5.0, 5.1, 5.005], -0.33),
            CollisionConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_pipeline_new() {
        let pipeline = chain_pipeline();
        assert_eq!(pipeline.stage(), PipelineStage::Initial);
        assert!(!pipeline.state().is_classified());
    }

    #[test]
    fn test_shape_checked() {
        let err = CollisionPipeline::new(
            Lattice::ring(4),
            FrequencyTable::uniform(vec![5.0; 3], -0.33),
            CollisionConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, QfcError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_stages_in_order() {
        let mut pipeline = chain_pipeline();
        pipeline.resolve_bounds().unwrap();
        assert_eq!(pipeline.stage(), PipelineStage::BoundsResolved);
        pipeline.assign_gates().unwrap();
        assert_eq!(pipeline.stage(), PipelineStage::GatesAssigned);
        let counts = pipeline.classify().unwrap().counts();
        assert_eq!(counts.get(CollisionCategory::ThroughControl0101), 1);
        assert_eq!(pipeline.extract().unwrap().count(CollisionCategory::ThroughControl0101), 1);
        assert_eq!(pipeline.stage(), PipelineStage::Extracted);
    }

    #[test]
    fn test_extract_runs_earlier_stages() {
        let mut pipeline = chain_pipeline();
        let list = pipeline.extract().unwrap();
        assert_eq!(list.total(), 1);
        assert!(pipeline.state().is_classified());
        assert!(pipeline.state().gates.is_some());
    }

    #[test]
    fn test_full_run() {
        let mut pipeline = chain_pipeline();
        let analysis = pipeline.run().unwrap();
        assert_eq!(analysis.tensor_counts.total(), 1);
        assert!(analysis.final_list.is_clean());
        assert_eq!(analysis.reduction(), 1);
        assert_eq!(pipeline.stage(), PipelineStage::Optimized);
    }

    #[test]
    fn test_explicit_gates() {
        let err = chain_pipeline()
            .with_gates(GateSet::from_pairs(&[(0, 2)]))
            .unwrap_err();
        assert!(matches!(err, QfcError::GateNotOnLattice { .. }));

        let mut pipeline = chain_pipeline()
            .with_gates(GateSet::from_pairs(&[(0, 1), (2, 1)]))
            .unwrap();
        assert_eq!(pipeline.classify().unwrap().total(), 0);
    }

    #[test]
    fn test_reset() {
        let mut pipeline = chain_pipeline();
        pipeline.run().unwrap();
        assert!(pipeline.state().is_optimized());

        pipeline.reset();
        assert_eq!(pipeline.stage(), PipelineStage::Initial);
        assert!(!pipeline.state().is_optimized());
    }

    #[test]
    fn test_reconfigure() {
        let mut pipeline = chain_pipeline();
        pipeline.run().unwrap();

        let config = CollisionConfig::gate_err_1pct();
        pipeline.reconfigure(config.clone()).unwrap();
        assert_eq!(pipeline.stage(), PipelineStage::Initial);
        assert_eq!(pipeline.state().config, config);
        assert!(pipeline.run().is_ok());

        let bad = CollisionConfig::standard().with_default_anharmonicity(f64::NAN);
        assert!(pipeline.reconfigure(bad).is_err());
        assert_eq!(pipeline.state().config, config);
        assert!(pipeline.state().is_optimized());
    }
}
