//! Time-and-threshold profile strategy
//!
//! Samples drawn inside the trough window (20–24 h after the dose by default)
//! are judged against trough bands; every other sample is judged against the
//! wider post-dose bands. Within each table the rules are tried in order and
//! the first match wins, so overlapping bands resolve by position:
//!
//! | # | Trough methadone | Trough EDDP | Other methadone | Other EDDP | Label |
//! |---|------------------|-------------|-----------------|------------|-------|
//! | 1 | > 600 | < 30 | > 800 | < 50 | slow |
//! | 2 | > 600 | ≥ 30 | > 800 | ≥ 50 | possible accumulation |
//! | 3 | < 100 | > 100 | < 150 | > 150 | fast |
//! | 4 | < 100 | < 30 | < 150 | < 50 | malabsorption / hepatic impairment |
//! | 5 | 100–400 | 30–150 | 150–800 | 50–250 | normal |
//! | 6 | (400, 600] | < 30 | | | slow |
//!
//! Anything else is inconclusive.

use serde::{Deserialize, Serialize};

use super::metabolism::MetabolismStrategy;
use super::types::{MetabolismAssessment, Phenotype, SampleObservation, StrategyKind};
use crate::error::{require_non_negative, MethadoneError};
use crate::model::ConcentrationEstimate;

/// Concentration interval with independently open or closed ends
#[derive(Debug, Clone, Copy, PartialEq)]
struct Band {
    min: f64,
    min_inclusive: bool,
    max: f64,
    max_inclusive: bool,
}

impl Band {
    /// (x, ∞)
    const fn above(x: f64) -> Self {
        Self {
            min: x,
            min_inclusive: false,
            max: f64::INFINITY,
            max_inclusive: true,
        }
    }

    /// [x, ∞)
    const fn at_least(x: f64) -> Self {
        Self {
            min: x,
            min_inclusive: true,
            max: f64::INFINITY,
            max_inclusive: true,
        }
    }

    /// [0, x)
    const fn below(x: f64) -> Self {
        Self {
            min: 0.0,
            min_inclusive: true,
            max: x,
            max_inclusive: false,
        }
    }

    /// [a, b]
    const fn between(a: f64, b: f64) -> Self {
        Self {
            min: a,
            min_inclusive: true,
            max: b,
            max_inclusive: true,
        }
    }

    /// (a, b]
    const fn above_up_to(a: f64, b: f64) -> Self {
        Self {
            min: a,
            min_inclusive: false,
            max: b,
            max_inclusive: true,
        }
    }

    fn contains(&self, x: f64) -> bool {
        let lower = if self.min_inclusive {
            x >= self.min
        } else {
            x > self.min
        };
        let upper = if self.max_inclusive {
            x <= self.max
        } else {
            x < self.max
        };
        lower && upper
    }
}

struct BandRule {
    methadone: Band,
    eddp: Band,
    phenotype: Phenotype,
}

impl BandRule {
    fn matches(&self, methadone: f64, eddp: f64) -> bool {
        self.methadone.contains(methadone) && self.eddp.contains(eddp)
    }
}

const TROUGH_RULES: &[BandRule] = &[
    BandRule {
        methadone: Band::above(600.0),
        eddp: Band::below(30.0),
        phenotype: Phenotype::Slow,
    },
    BandRule {
        methadone: Band::above(600.0),
        eddp: Band::at_least(30.0),
        phenotype: Phenotype::PossibleAccumulation,
    },
    BandRule {
        methadone: Band::below(100.0),
        eddp: Band::above(100.0),
        phenotype: Phenotype::Fast,
    },
    BandRule {
        methadone: Band::below(100.0),
        eddp: Band::below(30.0),
        phenotype: Phenotype::MalabsorptionOrHepaticImpairment,
    },
    BandRule {
        methadone: Band::between(100.0, 400.0),
        eddp: Band::between(30.0, 150.0),
        phenotype: Phenotype::Normal,
    },
    BandRule {
        methadone: Band::above_up_to(400.0, 600.0),
        eddp: Band::below(30.0),
        phenotype: Phenotype::Slow,
    },
];

const POST_DOSE_RULES: &[BandRule] = &[
    BandRule {
        methadone: Band::above(800.0),
        eddp: Band::below(50.0),
        phenotype: Phenotype::Slow,
    },
    BandRule {
        methadone: Band::above(800.0),
        eddp: Band::at_least(50.0),
        phenotype: Phenotype::PossibleAccumulation,
    },
    BandRule {
        methadone: Band::below(150.0),
        eddp: Band::above(150.0),
        phenotype: Phenotype::Fast,
    },
    BandRule {
        methadone: Band::below(150.0),
        eddp: Band::below(50.0),
        phenotype: Phenotype::MalabsorptionOrHepaticImpairment,
    },
    BandRule {
        methadone: Band::between(150.0, 800.0),
        eddp: Band::between(50.0, 250.0),
        phenotype: Phenotype::Normal,
    },
];

fn first_match(rules: &[BandRule], methadone: f64, eddp: f64) -> Phenotype {
    rules
        .iter()
        .find(|rule| rule.matches(methadone, eddp))
        .map(|rule| rule.phenotype)
        .unwrap_or(Phenotype::Inconclusive)
}

/// Classify by absolute concentration bands chosen by sampling time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStrategy {
    /// Inclusive trough window in hours after the dose (default: 20–24 h)
    pub trough_window_h: (f64, f64),
}

impl Default for ProfileStrategy {
    fn default() -> Self {
        Self {
            trough_window_h: (20.0, 24.0),
        }
    }
}

impl ProfileStrategy {
    pub fn with_trough_window(mut self, start_h: f64, end_h: f64) -> Self {
        self.trough_window_h = (start_h, end_h);
        self
    }

    /// Window bounds non-negative with start <= end
    pub fn validate(&self) -> Result<(), MethadoneError> {
        let (start, end) = self.trough_window_h;
        require_non_negative("profile.trough_window_h.0", start)?;
        require_non_negative("profile.trough_window_h.1", end)?;
        if start > end {
            return Err(MethadoneError::invalid("profile.trough_window_h.0", start));
        }
        Ok(())
    }

    /// Whether a sample drawn `t` hours after the dose is a trough sample
    pub fn is_trough(&self, t: f64) -> bool {
        (self.trough_window_h.0..=self.trough_window_h.1).contains(&t)
    }

    pub fn phenotype(&self, sample: &SampleObservation) -> Phenotype {
        let rules = if self.is_trough(sample.time_since_dose_h) {
            TROUGH_RULES
        } else {
            POST_DOSE_RULES
        };
        first_match(
            rules,
            sample.methadone_measured_ng_ml,
            sample.eddp_measured_ng_ml,
        )
    }
}

impl MetabolismStrategy for ProfileStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Profile
    }

    fn classify(
        &self,
        sample: &SampleObservation,
        _expected: &ConcentrationEstimate,
    ) -> MetabolismAssessment {
        MetabolismAssessment {
            strategy: self.kind(),
            phenotype: self.phenotype(sample),
            ratio: sample.ratio(),
            probabilities: None,
        }
    }
}
