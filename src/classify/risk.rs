//! Dosing-risk assessment

use super::types::{RiskLevel, RiskPolicy, RiskThresholds};
use crate::model::{default_confidence_interval, ConfidenceBand};

/// Judge a measured methadone concentration with default thresholds
///
/// - [`RiskPolicy::Fixed`]: below 100 ng/mL is an underdose, above 600 ng/mL
///   an overdose.
/// - [`RiskPolicy::Relative`]: outside ±20% of `expected` is an under- or
///   overdose.
///
/// Values exactly on a boundary are therapeutic.
pub fn assess_risk(measured: f64, expected: f64, policy: RiskPolicy) -> RiskLevel {
    assess_risk_with(
        measured,
        default_confidence_interval(expected).into(),
        policy,
        &RiskThresholds::default(),
    )
}

/// Judge a measured methadone concentration against an expected band
///
/// The relative policy uses `expected_band` as is, so a verdict always agrees
/// with the band reported in the same [`ConcentrationEstimate`](crate::model::ConcentrationEstimate).
pub fn assess_risk_with(
    measured: f64,
    expected_band: ConfidenceBand,
    policy: RiskPolicy,
    thresholds: &RiskThresholds,
) -> RiskLevel {
    let (low, high) = match policy {
        RiskPolicy::Fixed => (thresholds.underdose_below, thresholds.overdose_above),
        RiskPolicy::Relative => (expected_band.low, expected_band.high),
    };

    if measured < low {
        RiskLevel::Underdose
    } else if measured > high {
        RiskLevel::Overdose
    } else {
        RiskLevel::Therapeutic
    }
}
