//! Metabolizer phenotype and dosing-risk classification
//!
//! Two independent judgments are made on a measured sample:
//!
//! - **Risk**: [`assess_risk`] compares measured methadone either to fixed
//!   thresholds or to the confidence band of the model expectation
//!   ([`RiskPolicy`]).
//! - **Metabolism**: one of three [`MetabolismStrategy`] implementations
//!   labels the patient's phenotype.
//!
//! | Strategy | Inputs | Output |
//! |----------|--------|--------|
//! | [`RatioStrategy`] | methadone / EDDP ratio (+ expected EDDP band if enabled) | slow, normal, fast, very slow |
//! | [`ProbabilisticStrategy`] | ratio + expected EDDP band | distribution over slow/normal/fast |
//! | [`ProfileStrategy`] | sample time + absolute bands | profile label or inconclusive |
//!
//! Every function here is total: any non-negative sample maps to exactly one
//! label.

mod metabolism;
mod profile;
mod risk;
mod types;


use serde::{Deserialize, Serialize};

use crate::error::MethadoneError;

pub use metabolism::{
    EddpNudges, MetabolismStrategy, ProbabilisticStrategy, RatioStrategy, RatioThresholds,
};
pub use profile::ProfileStrategy;
pub use risk::{assess_risk, assess_risk_with};
pub use types::{
    MetabolismAssessment, Phenotype, PhenotypeProbabilities, RiskLevel, RiskPolicy,
    RiskThresholds, SampleObservation, StrategyKind,
};

/// Parameters for every classifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    pub risk: RiskThresholds,
    pub ratio: RatioStrategy,
    pub probabilistic: ProbabilisticStrategy,
    pub profile: ProfileStrategy,
}

impl ClassifierOptions {
    /// The configured strategy for `kind`
    pub fn strategy(&self, kind: StrategyKind) -> &dyn MetabolismStrategy {
        match kind {
            StrategyKind::Ratio => &self.ratio,
            StrategyKind::Probabilistic => &self.probabilistic,
            StrategyKind::Profile => &self.profile,
        }
    }

    /// Check every threshold, nudge and window
    pub fn validate(&self) -> Result<(), MethadoneError> {
        self.risk.validate()?;
        self.ratio.validate()?;
        self.probabilistic.validate()?;
        self.profile.validate()
    }

    pub fn with_risk_thresholds(mut self, thresholds: RiskThresholds) -> Self {
        self.risk = thresholds;
        self
    }

    pub fn with_ratio(mut self, strategy: RatioStrategy) -> Self {
        self.ratio = strategy;
        self
    }

    pub fn with_probabilistic(mut self, strategy: ProbabilisticStrategy) -> Self {
        self.probabilistic = strategy;
        self
    }

    pub fn with_profile(mut self, strategy: ProfileStrategy) -> Self {
        self.profile = strategy;
        self
    }
}
