//! Expected plasma methadone and EDDP concentrations, metabolizer phenotype,
//! and dosing risk for therapeutic drug monitoring.
//!
//! - [`model`]: one-compartment concentration model (single dose and
//!   once-daily steady state)
//! - [`classify`]: risk policies and metabolism strategies
//! - [`evaluate`]: request/response entry point composing both
//!
//! All computations are pure and synchronous.

pub mod classify;
pub mod error;
pub mod evaluate;
pub mod model;

pub use error::MethadoneError;

pub mod prelude {
    pub use crate::classify::{
        assess_risk, ClassifierOptions, MetabolismAssessment, MetabolismStrategy, Phenotype,
        PhenotypeProbabilities, ProbabilisticStrategy, ProfileStrategy, RatioStrategy,
        RatioThresholds, RiskLevel, RiskPolicy, SampleObservation, StrategyKind,
    };
    pub use crate::error::MethadoneError;
    pub use crate::evaluate::{
        evaluate, evaluate_batch, Evaluation, EvaluationOptions, EvaluationRequest,
        StrategyComparison,
    };
    pub use crate::model::{
        concentration_curve, confidence_interval, eddp_from_methadone, estimate,
        ConcentrationEstimate, DoseProfile, DosingMode, ModelOptions,
    };
}
