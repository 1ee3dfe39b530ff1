//! Classifier types: observations, labels, and policy selectors

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{require_non_negative, MethadoneError};
use crate::model::{input_range, warn_if_outside};

// ============================================================================
// Inputs
// ============================================================================

/// A measured plasma sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleObservation {
    /// Time between the last dose and the blood draw (h)
    pub time_since_dose_h: f64,
    /// Measured methadone (ng/mL)
    pub methadone_measured_ng_ml: f64,
    /// Measured EDDP (ng/mL)
    pub eddp_measured_ng_ml: f64,
}

impl SampleObservation {
    /// Create a validated observation; all values must be non-negative
    pub fn new(
        time_since_dose_h: f64,
        methadone_measured_ng_ml: f64,
        eddp_measured_ng_ml: f64,
    ) -> Result<Self, MethadoneError> {
        let sample = Self {
            time_since_dose_h,
            methadone_measured_ng_ml,
            eddp_measured_ng_ml,
        };
        sample.validate()?;
        Ok(sample)
    }

    pub fn validate(&self) -> Result<(), MethadoneError> {
        require_non_negative("time_since_dose_h", self.time_since_dose_h)?;
        require_non_negative("methadone_measured_ng_ml", self.methadone_measured_ng_ml)?;
        require_non_negative("eddp_measured_ng_ml", self.eddp_measured_ng_ml)?;
        warn_if_outside(
            "methadone_measured_ng_ml",
            self.methadone_measured_ng_ml,
            input_range::MEASURED_NG_ML,
        );
        warn_if_outside(
            "eddp_measured_ng_ml",
            self.eddp_measured_ng_ml,
            input_range::MEASURED_NG_ML,
        );
        Ok(())
    }

    /// Methadone / EDDP ratio, `None` when no EDDP was measured
    pub fn ratio(&self) -> Option<f64> {
        if self.eddp_measured_ng_ml == 0.0 {
            None
        } else {
            Some(self.methadone_measured_ng_ml / self.eddp_measured_ng_ml)
        }
    }
}

// ============================================================================
// Risk
// ============================================================================

/// Dosing-risk verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Measured concentration too low: risk of withdrawal
    Underdose,
    /// Measured concentration within the therapeutic range
    Therapeutic,
    /// Measured concentration too high: toxicity risk
    Overdose,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Underdose => write!(f, "Underdose (risk of withdrawal)"),
            RiskLevel::Therapeutic => write!(f, "Dose within the therapeutic range"),
            RiskLevel::Overdose => write!(f, "Overdose (toxicity risk)"),
        }
    }
}

/// How the measured methadone is judged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskPolicy {
    /// Absolute thresholds (default: < 100 underdose, > 600 overdose)
    Fixed,
    /// Outside the confidence band of the expected concentration
    #[default]
    Relative,
}

/// Threshold values used by the risk policies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Fixed policy: underdose strictly below this value (ng/mL, default: 100)
    pub underdose_below: f64,
    /// Fixed policy: overdose strictly above this value (ng/mL, default: 600)
    pub overdose_above: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            underdose_below: crate::model::LOW_THRESHOLD,
            overdose_above: crate::model::TOXIC_THRESHOLD,
        }
    }
}

impl RiskThresholds {
    /// Both thresholds non-negative with `underdose_below <= overdose_above`
    pub fn validate(&self) -> Result<(), MethadoneError> {
        require_non_negative("risk.underdose_below", self.underdose_below)?;
        require_non_negative("risk.overdose_above", self.overdose_above)?;
        if self.underdose_below > self.overdose_above {
            return Err(MethadoneError::invalid(
                "risk.underdose_below",
                self.underdose_below,
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Metabolism
// ============================================================================

/// Metabolizer phenotype or concentration profile label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phenotype {
    /// No measurable EDDP
    VerySlow,
    Slow,
    Normal,
    Fast,
    /// High methadone with ample EDDP: drug building up across doses
    PossibleAccumulation,
    /// Low methadone and low EDDP
    MalabsorptionOrHepaticImpairment,
    /// No rule matched
    Inconclusive,
}

impl fmt::Display for Phenotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phenotype::VerySlow => write!(f, "Very slow metabolizer"),
            Phenotype::Slow => write!(f, "Slow metabolizer"),
            Phenotype::Normal => write!(f, "Normal metabolizer"),
            Phenotype::Fast => write!(f, "Fast metabolizer"),
            Phenotype::PossibleAccumulation => write!(f, "Possible accumulation"),
            Phenotype::MalabsorptionOrHepaticImpairment => {
                write!(f, "Suspected malabsorption or hepatic impairment")
            }
            Phenotype::Inconclusive => write!(f, "Inconclusive"),
        }
    }
}

/// Probability distribution over {slow, normal, fast}
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhenotypeProbabilities {
    pub slow: f64,
    pub normal: f64,
    pub fast: f64,
}

impl PhenotypeProbabilities {
    pub const fn new(slow: f64, normal: f64, fast: f64) -> Self {
        Self { slow, normal, fast }
    }

    pub fn sum(&self) -> f64 {
        self.slow + self.normal + self.fast
    }

    /// Floor every component at zero and rescale to sum to one
    ///
    /// A distribution with no positive mass becomes uniform.
    pub fn normalized(self) -> Self {
        let floored = Self::new(self.slow.max(0.0), self.normal.max(0.0), self.fast.max(0.0));
        let total = floored.sum();
        if total > 0.0 && total.is_finite() {
            Self::new(
                floored.slow / total,
                floored.normal / total,
                floored.fast / total,
            )
        } else {
            Self::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
        }
    }

    /// The most probable phenotype; ties resolve to normal, then slow, then fast
    pub fn most_likely(&self) -> Phenotype {
        if self.normal >= self.slow && self.normal >= self.fast {
            Phenotype::Normal
        } else if self.slow >= self.fast {
            Phenotype::Slow
        } else {
            Phenotype::Fast
        }
    }
}

/// Which metabolism strategy to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Thresholds on the methadone / EDDP ratio
    #[default]
    Ratio,
    /// Ratio bins adjusted by the expected EDDP band
    Probabilistic,
    /// Absolute concentration bands by sampling time
    Profile,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Ratio,
        StrategyKind::Probabilistic,
        StrategyKind::Profile,
    ];
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Ratio => write!(f, "ratio"),
            StrategyKind::Probabilistic => write!(f, "probabilistic"),
            StrategyKind::Profile => write!(f, "profile"),
        }
    }
}

/// Outcome of a metabolism strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetabolismAssessment {
    /// Strategy that produced this assessment
    pub strategy: StrategyKind,
    /// Reported label
    pub phenotype: Phenotype,
    /// Methadone / EDDP ratio (None if EDDP was zero or the strategy does not use it)
    pub ratio: Option<f64>,
    /// Distribution over slow/normal/fast (probabilistic strategy only)
    pub probabilities: Option<PhenotypeProbabilities>,
}
