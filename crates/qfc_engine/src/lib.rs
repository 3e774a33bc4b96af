//! # QFC Engine
//!
//! Frequency-collision classification and gate direction optimization.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qfc_engine // L3-L6: Classification → Integration (완료)
//!     CollisionCategory // 7종 충돌 (완료)
//!         NearNbr 01_01, 01_022, 01_12, SlowGate
//!         TviaC 01_01, 01_12, Spectator
//!     CollisionTensor // N×N×7 이진 텐서 (완료)
//!     CollisionClassifier // 충돌 분류기 (완료)
//!         classify(gates) - 텐서 생성
//!         counts(gates) - 유형별 합계
//!     CollisionExtractor // 충돌 목록 추출 (완료)
//!         extract(tensor, gates) - 역할 태깅
//!     DirectionOptimizer // 방향 최적화 (완료)
//!         optimize(gates) - 유형 5, 6, 7 탐욕 패스
//!         step() - 4종 후보 평가
//!     CollisionConfig // 통합 설정 (완료)
//!     report // 보고서 및 FC 점수 (완료)
//!     CollisionPipeline // 단계별 실행 (완료)
//!         resolve_bounds() → assign_gates() → classify() → extract() → optimize()
//!         run() - 전체 파이프라인
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qfc_engine::prelude::*;
//!
//! let lattice = Lattice::linear(3);
//! let table = FrequencyTable::uniform(vec![5.0, 5.1, 5.005], -0.33);
//!
//! let classifier = CollisionClassifier::with_defaults(&lattice, &table).unwrap();
//! let gates = classifier.default_gates();
//! assert_eq!(classifier.counts(&gates).get(CollisionCategory::ThroughControl0101), 1);
//!
//! let outcome = DirectionOptimizer::new(&classifier).optimize(gates);
//! assert_eq!(outcome.final_counts.total(), 0);
//! ```
//!
//! ## Using Pipeline
//!
//! ```rust
//! use qfc_engine::prelude::*;
//!
//! let config = CollisionConfig::gate_err_half_pct();
//! let table = config.table_from_frequencies(vec![5.00, 5.02, 5.10, 4.90]);
//!
//! let mut pipeline = CollisionPipeline::new(Lattice::ring(4), table, config).unwrap();
//! let analysis = pipeline.run().unwrap();
//! println!("{}", format_summary(&analysis.final_list));
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Collision categories (Gantree: L3_Classification → CollisionCategory)
pub mod category;

/// Collision tensor (Gantree: L3_Classification → CollisionTensor)
pub mod tensor;

/// Classifier (Gantree: L3_Classification → CollisionClassifier)
pub mod classifier;

/// List extraction (Gantree: L3_Classification → CollisionExtractor)
pub mod extractor;

/// Direction optimizer (Gantree: L4_Optimization → DirectionOptimizer)
pub mod optimizer;

/// Configuration (Gantree: L4_Integration → CollisionConfig)
pub mod config;

/// Reports and scores (Gantree: L5_Reporting → CollisionReport)
pub mod report;

/// Pipeline (Gantree: L6_Integration → CollisionPipeline)
pub mod pipeline;

// ============================================================================
// Re-exports
// ============================================================================

pub use category::{CategoryCounts, CollisionCategory};
pub use classifier::CollisionClassifier;
pub use config::CollisionConfig;
pub use extractor::{CollisionExtractor, CollisionInstance, CollisionList, CollisionTriple};
pub use optimizer::{Candidate, DirectionOptimizer, DirectionOutcome, PassReport, StepDecision};
pub use pipeline::{CollisionAnalysis, CollisionPipeline, PipelineStage, PipelineState};
pub use report::{
    containment_score, format_summary, participation_score, range_report, within_threshold,
    CategoryWeights,
};
pub use tensor::CollisionTensor;

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qfc_engine::prelude::*;
    //! ```

    pub use crate::category::{CategoryCounts, CollisionCategory};
    pub use crate::classifier::CollisionClassifier;
    pub use crate::config::CollisionConfig;
    pub use crate::extractor::{CollisionExtractor, CollisionList, CollisionTriple};
    pub use crate::optimizer::{DirectionOptimizer, DirectionOutcome, PassReport};
    pub use crate::pipeline::{CollisionAnalysis, CollisionPipeline, PipelineStage};
    pub use crate::report::{format_summary, range_report, CategoryWeights};
    pub use crate::tensor::CollisionTensor;
    pub use qfc_calibration::prelude::*;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "QFC Engine";

// ============================================================================
// Integration Tests
// ============================================================================
