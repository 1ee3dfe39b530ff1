//! Ratio-based metabolism strategies
//!
//! Both strategies here read the methadone / EDDP ratio of the measured
//! sample. A sample without measurable EDDP never fails: the ratio strategy
//! reports [`Phenotype::VerySlow`] and the probabilistic strategy puts all of
//! its mass on slow.
//!
//! Both can also consult the expected EDDP band: the probabilistic strategy
//! always nudges its distribution by it, while the ratio strategy only does so
//! when [`RatioStrategy::check_eddp_band`] is set (see [`RatioStrategy::strict`]).

use serde::{Deserialize, Serialize};

use super::types::{
    MetabolismAssessment, Phenotype, PhenotypeProbabilities, SampleObservation, StrategyKind,
};
use crate::error::{require_non_negative, MethadoneError};
use crate::model::{ConcentrationEstimate, ConfidenceBand};

/// A rule set that turns a measured sample into a phenotype
pub trait MetabolismStrategy {
    /// Which strategy this is
    fn kind(&self) -> StrategyKind;

    /// Classify a sample against the model expectation for the same time point
    fn classify(
        &self,
        sample: &SampleObservation,
        expected: &ConcentrationEstimate,
    ) -> MetabolismAssessment;
}

/// Ratio cut-offs: above `slow_above` is slow, below `fast_below` is fast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioThresholds {
    pub slow_above: f64,
    pub fast_below: f64,
}

impl RatioThresholds {
    /// 2.0 / 0.5
    pub const STANDARD: Self = Self {
        slow_above: 2.0,
        fast_below: 0.5,
    };
    /// 2.5 / 1.0
    pub const WIDE: Self = Self {
        slow_above: 2.5,
        fast_below: 1.0,
    };
    /// 3.5 / 1.5
    pub const STRICT: Self = Self {
        slow_above: 3.5,
        fast_below: 1.5,
    };

    /// Both cut-offs non-negative with `fast_below <= slow_above`
    pub fn validate(&self, prefix: &str) -> Result<(), MethadoneError> {
        require_non_negative(&format!("{prefix}.slow_above"), self.slow_above)?;
        require_non_negative(&format!("{prefix}.fast_below"), self.fast_below)?;
        if self.fast_below > self.slow_above {
            return Err(MethadoneError::invalid(
                &format!("{prefix}.fast_below"),
                self.fast_below,
            ));
        }
        Ok(())
    }
}

/// Where a measured EDDP value falls relative to the expected EDDP band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BandPosition {
    Below,
    Inside,
    Above,
}

impl BandPosition {
    fn of(eddp: f64, band: ConfidenceBand) -> Self {
        if eddp < band.low {
            BandPosition::Below
        } else if eddp > band.high {
            BandPosition::Above
        } else {
            BandPosition::Inside
        }
    }
}

// ============================================================================
// Ratio-only
// ============================================================================

/// Classify by the methadone / EDDP ratio
///
/// With `check_eddp_band` set, a ratio inside the thresholds is refined by the
/// measured EDDP: below the expected EDDP band reads as slow, above it as fast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioStrategy {
    pub thresholds: RatioThresholds,
    /// Refine a normal ratio with the expected EDDP band (default: false)
    #[serde(default)]
    pub check_eddp_band: bool,
}

impl Default for RatioStrategy {
    fn default() -> Self {
        Self {
            thresholds: RatioThresholds::STANDARD,
            check_eddp_band: false,
        }
    }
}

impl RatioStrategy {
    /// Cut-offs at 3.5 / 1.5 with the expected EDDP band check enabled
    pub fn strict() -> Self {
        Self {
            thresholds: RatioThresholds::STRICT,
            check_eddp_band: true,
        }
    }

    pub fn with_thresholds(mut self, thresholds: RatioThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_eddp_band_check(mut self, enabled: bool) -> Self {
        self.check_eddp_band = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), MethadoneError> {
        self.thresholds.validate("ratio.thresholds")
    }

    /// Phenotype for a ratio (None = no EDDP)
    pub fn phenotype(&self, ratio: Option<f64>) -> Phenotype {
        match ratio {
            None => Phenotype::VerySlow,
            Some(r) if r > self.thresholds.slow_above => Phenotype::Slow,
            Some(r) if r < self.thresholds.fast_below => Phenotype::Fast,
            Some(_) => Phenotype::Normal,
        }
    }

    /// Phenotype for a sample, refined by the expected EDDP band when enabled
    pub fn phenotype_for(
        &self,
        sample: &SampleObservation,
        expected: &ConcentrationEstimate,
    ) -> Phenotype {
        let phenotype = self.phenotype(sample.ratio());
        if !self.check_eddp_band || phenotype != Phenotype::Normal {
            return phenotype;
        }
        match BandPosition::of(sample.eddp_measured_ng_ml, expected.eddp_band) {
            BandPosition::Below => Phenotype::Slow,
            BandPosition::Inside => Phenotype::Normal,
            BandPosition::Above => Phenotype::Fast,
        }
    }
}

impl MetabolismStrategy for RatioStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Ratio
    }

    fn classify(
        &self,
        sample: &SampleObservation,
        expected: &ConcentrationEstimate,
    ) -> MetabolismAssessment {
        MetabolismAssessment {
            strategy: self.kind(),
            phenotype: self.phenotype_for(sample, expected),
            ratio: sample.ratio(),
            probabilities: None,
        }
    }
}

// ============================================================================
// Probabilistic ratio
// ============================================================================

/// Base distribution when the ratio is above `slow_above`
const SLOW_BIN: PhenotypeProbabilities = PhenotypeProbabilities::new(0.7, 0.2, 0.1);
/// Base distribution when the ratio lies within the thresholds
const NORMAL_BIN: PhenotypeProbabilities = PhenotypeProbabilities::new(0.15, 0.7, 0.15);
/// Base distribution when the ratio is below `fast_below`
const FAST_BIN: PhenotypeProbabilities = PhenotypeProbabilities::new(0.1, 0.2, 0.7);

/// Adjustments applied according to where the measured EDDP falls relative to
/// the expected EDDP band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EddpNudges {
    /// Added to slow (and subtracted from fast) when EDDP is below the band
    pub below_band: f64,
    /// Added to normal when EDDP is inside the band
    pub inside_band: f64,
    /// Added to fast (and subtracted from slow) when EDDP is above the band
    pub above_band: f64,
}

impl Default for EddpNudges {
    fn default() -> Self {
        Self {
            below_band: 0.3,
            inside_band: 0.2,
            above_band: 0.3,
        }
    }
}

impl EddpNudges {
    pub fn validate(&self) -> Result<(), MethadoneError> {
        require_non_negative("probabilistic.nudges.below_band", self.below_band)?;
        require_non_negative("probabilistic.nudges.inside_band", self.inside_band)?;
        require_non_negative("probabilistic.nudges.above_band", self.above_band)?;
        Ok(())
    }
}

/// Map the ratio to a distribution over slow/normal/fast, nudged by the
/// expected EDDP band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilisticStrategy {
    /// Bin edges (default: 2.5 / 1.0)
    pub thresholds: RatioThresholds,
    pub nudges: EddpNudges,
}

impl Default for ProbabilisticStrategy {
    fn default() -> Self {
        Self {
            thresholds: RatioThresholds::WIDE,
            nudges: EddpNudges::default(),
        }
    }
}

impl ProbabilisticStrategy {
    /// Bins at 3.5 / 1.5
    pub fn strict() -> Self {
        Self {
            thresholds: RatioThresholds::STRICT,
            ..Default::default()
        }
    }

    pub fn with_thresholds(mut self, thresholds: RatioThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_nudges(mut self, nudges: EddpNudges) -> Self {
        self.nudges = nudges;
        self
    }

    pub fn validate(&self) -> Result<(), MethadoneError> {
        self.thresholds.validate("probabilistic.thresholds")?;
        self.nudges.validate()
    }

    /// Distribution for a sample; always non-negative and summing to one
    pub fn distribution(
        &self,
        sample: &SampleObservation,
        expected: &ConcentrationEstimate,
    ) -> PhenotypeProbabilities {
        let Some(ratio) = sample.ratio() else {
            return PhenotypeProbabilities::new(1.0, 0.0, 0.0);
        };

        let mut p = if ratio > self.thresholds.slow_above {
            SLOW_BIN
        } else if ratio < self.thresholds.fast_below {
            FAST_BIN
        } else {
            NORMAL_BIN
        };

        let eddp = sample.eddp_measured_ng_ml;
        let band = expected.eddp_band;
        match BandPosition::of(eddp, band) {
            BandPosition::Below => {
                p.slow += self.nudges.below_band;
                p.fast -= self.nudges.below_band;
            }
            BandPosition::Inside => p.normal += self.nudges.inside_band,
            BandPosition::Above => {
                p.fast += self.nudges.above_band;
                p.slow -= self.nudges.above_band;
            }
        }

        let p = p.normalized();
        tracing::debug!(
            "ratio {:.3}, EDDP {:.1} vs band [{:.1}, {:.1}] -> slow {:.3}, normal {:.3}, fast {:.3}",
            ratio,
            eddp,
            band.low,
            band.high,
            p.slow,
            p.normal,
            p.fast
        );
        p
    }
}

impl MetabolismStrategy for ProbabilisticStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Probabilistic
    }

    fn classify(
        &self,
        sample: &SampleObservation,
        expected: &ConcentrationEstimate,
    ) -> MetabolismAssessment {
        let probabilities = self.distribution(sample, expected);
        MetabolismAssessment {
            strategy: self.kind(),
            phenotype: probabilities.most_likely(),
            ratio: sample.ratio(),
            probabilities: Some(probabilities),
        }
    }
}
