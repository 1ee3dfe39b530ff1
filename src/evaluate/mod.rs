//! Request/response contract between the calculator core and its front end
//!
//! A front end collects six numbers plus three selectors into an
//! [`EvaluationRequest`] and receives an [`Evaluation`]: the expected
//! methadone and EDDP concentrations with their bands, a metabolism
//! assessment, and a risk verdict.
//!
//! ```rust
//! use methadone_tdm::evaluate::{evaluate, EvaluationOptions, EvaluationRequest};
//! use methadone_tdm::classify::{Phenotype, RiskLevel};
//!
//! let request = EvaluationRequest::new(60.0, 70.0, 24.0, 12.0, 350.0, 120.0);
//! let result = evaluate(&request, &EvaluationOptions::default()).unwrap();
//!
//! assert_eq!(result.metabolism.phenotype, Phenotype::Slow);
//! assert_eq!(result.risk, RiskLevel::Therapeutic);
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classify::{
    assess_risk_with, ClassifierOptions, MetabolismAssessment, MetabolismStrategy, RiskLevel,
    RiskPolicy, SampleObservation, StrategyKind,
};
use crate::error::MethadoneError;
use crate::model::{ConcentrationEstimate, DoseProfile, DosingMode, ModelOptions};


// ============================================================================
// Request
// ============================================================================

/// Everything needed to evaluate one methadone sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Daily dose (mg)
    pub dose_mg: f64,
    /// Body weight (kg)
    pub weight_kg: f64,
    /// Elimination half-life (h)
    pub half_life_h: f64,
    /// Time since the last dose (h)
    pub time_since_dose_h: f64,
    /// Measured methadone (ng/mL)
    pub methadone_measured_ng_ml: f64,
    /// Measured EDDP (ng/mL)
    pub eddp_measured_ng_ml: f64,
    /// Dosing regimen (default: steady state)
    #[serde(default)]
    pub mode: DosingMode,
    /// Risk policy (default: relative to expected)
    #[serde(default)]
    pub risk_policy: RiskPolicy,
    /// Strategy that determines the reported phenotype (default: ratio)
    #[serde(default)]
    pub metabolism_strategy: StrategyKind,
}

impl EvaluationRequest {
    /// Request with default selectors (steady state, relative risk, ratio strategy)
    pub fn new(
        dose_mg: f64,
        weight_kg: f64,
        half_life_h: f64,
        time_since_dose_h: f64,
        methadone_measured_ng_ml: f64,
        eddp_measured_ng_ml: f64,
    ) -> Self {
        Self {
            dose_mg,
            weight_kg,
            half_life_h,
            time_since_dose_h,
            methadone_measured_ng_ml,
            eddp_measured_ng_ml,
            mode: DosingMode::default(),
            risk_policy: RiskPolicy::default(),
            metabolism_strategy: StrategyKind::default(),
        }
    }

    pub fn with_mode(mut self, mode: DosingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_risk_policy(mut self, policy: RiskPolicy) -> Self {
        self.risk_policy = policy;
        self
    }

    pub fn with_metabolism_strategy(mut self, strategy: StrategyKind) -> Self {
        self.metabolism_strategy = strategy;
        self
    }

    /// Parse a request from JSON; selectors may be omitted
    pub fn from_json(json: &str) -> Result<Self, MethadoneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn dose_profile(&self) -> Result<DoseProfile, MethadoneError> {
        DoseProfile::new(self.dose_mg, self.weight_kg, self.half_life_h)
    }

    pub fn sample(&self) -> Result<SampleObservation, MethadoneError> {
        SampleObservation::new(
            self.time_since_dose_h,
            self.methadone_measured_ng_ml,
            self.eddp_measured_ng_ml,
        )
    }
}

// ============================================================================
// Options
// ============================================================================

/// Complete evaluation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationOptions {
    /// Concentration model constants
    pub model: ModelOptions,
    /// Risk thresholds and strategy parameters
    pub classifier: ClassifierOptions,
    /// Also run every metabolism strategy and report them side by side
    pub compare_strategies: bool,
}

impl EvaluationOptions {
    pub fn with_model(mut self, model: ModelOptions) -> Self {
        self.model = model;
        self
    }

    pub fn with_classifier(mut self, classifier: ClassifierOptions) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_comparison(mut self, compare: bool) -> Self {
        self.compare_strategies = compare;
        self
    }
}

// ============================================================================
// Result
// ============================================================================

/// Output of every metabolism strategy for the same sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub ratio: MetabolismAssessment,
    pub probabilistic: MetabolismAssessment,
    pub profile: MetabolismAssessment,
}

impl StrategyComparison {
    pub fn get(&self, kind: StrategyKind) -> &MetabolismAssessment {
        match kind {
            StrategyKind::Ratio => &self.ratio,
            StrategyKind::Probabilistic => &self.probabilistic,
            StrategyKind::Profile => &self.profile,
        }
    }
}

/// Result of evaluating one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Expected concentrations and their bands
    pub expected: ConcentrationEstimate,
    /// Assessment from the requested strategy
    pub metabolism: MetabolismAssessment,
    /// Risk verdict under the requested policy
    pub risk: RiskLevel,
    /// All strategies, if [`EvaluationOptions::compare_strategies`] is set
    pub comparison: Option<StrategyComparison>,
}

impl Evaluation {
    pub fn to_json(&self) -> Result<String, MethadoneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Expected methadone: {:.2} ng/mL ({:.2}-{:.2})",
            self.expected.methadone_ng_ml,
            self.expected.methadone_band.low,
            self.expected.methadone_band.high
        )?;
        writeln!(
            f,
            "Expected EDDP: {:.2} ng/mL ({:.2}-{:.2})",
            self.expected.eddp_ng_ml, self.expected.eddp_band.low, self.expected.eddp_band.high
        )?;
        writeln!(f, "Metabolic profile: {}", self.metabolism.phenotype)?;
        if let Some(p) = self.metabolism.probabilities {
            writeln!(
                f,
                "  slow {:.0}%, normal {:.0}%, fast {:.0}%",
                p.slow * 100.0,
                p.normal * 100.0,
                p.fast * 100.0
            )?;
        }
        write!(f, "Risk: {}", self.risk)
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Estimate expected concentrations and classify the measured sample
pub fn evaluate(
    request: &EvaluationRequest,
    options: &EvaluationOptions,
) -> Result<Evaluation, MethadoneError> {
    let profile = request.dose_profile()?;
    let sample = request.sample()?;
    options.classifier.validate()?;

    let expected = ConcentrationEstimate::compute(
        &profile,
        sample.time_since_dose_h,
        request.mode,
        &options.model,
    )?;

    let classifier = &options.classifier;
    let metabolism = classifier
        .strategy(request.metabolism_strategy)
        .classify(&sample, &expected);

    let risk = assess_risk_with(
        sample.methadone_measured_ng_ml,
        expected.methadone_band,
        request.risk_policy,
        &classifier.risk,
    );

    let comparison = options.compare_strategies.then(|| StrategyComparison {
        ratio: classifier.ratio.classify(&sample, &expected),
        probabilistic: classifier.probabilistic.classify(&sample, &expected),
        profile: classifier.profile.classify(&sample, &expected),
    });

    tracing::debug!(
        "evaluated sample at {} h: {} / {} ({} strategy)",
        sample.time_since_dose_h,
        metabolism.phenotype,
        risk,
        request.metabolism_strategy
    );

    Ok(Evaluation {
        expected,
        metabolism,
        risk,
        comparison,
    })
}

/// Evaluate independent requests in parallel, preserving input order
pub fn evaluate_batch(
    requests: &[EvaluationRequest],
    options: &EvaluationOptions,
) -> Vec<Result<Evaluation, MethadoneError>> {
    requests
        .par_iter()
        .map(|request| evaluate(request, options))
        .collect()
}
