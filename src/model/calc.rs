//! Pure calculation functions for the one-compartment methadone model
//!
//! All functions are stateless. Functions that accept a [`DoseProfile`]
//! validate it and fail with [`MethadoneError::InvalidParameter`].

use std::f64::consts::LN_2;

use super::types::{
    input_range, warn_if_outside, ConcentrationEstimate, CurvePoint, DoseProfile, DosingMode,
    ModelOptions, DEFAULT_ERROR_PCT, MG_PER_L_TO_NG_PER_ML,
};
use crate::error::{require_non_negative, require_positive, MethadoneError};

/// First-order decay fraction remaining after `t` hours
#[inline]
fn decay(t: f64, half_life_h: f64) -> f64 {
    (-LN_2 * t / half_life_h).exp()
}

/// Accumulation factor for repeated dosing every `tau_h` hours
///
/// `1 / (1 - exp(-ln2 · τ / t½))`, always ≥ 1.
#[inline]
pub fn accumulation_factor(half_life_h: f64, tau_h: f64) -> f64 {
    1.0 / (1.0 - decay(tau_h, half_life_h))
}

/// Expected methadone (ng/mL) with default model options
///
/// ```rust
/// use methadone_tdm::model::{estimate, DoseProfile, DosingMode};
///
/// let profile = DoseProfile::new(60.0, 70.0, 24.0).unwrap();
/// let c = estimate(&profile, 12.0, DosingMode::SteadyState).unwrap();
/// assert!((c - 303.05).abs() < 0.01);
/// ```
pub fn estimate(
    profile: &DoseProfile,
    time_since_dose_h: f64,
    mode: DosingMode,
) -> Result<f64, MethadoneError> {
    estimate_with(profile, time_since_dose_h, mode, &ModelOptions::default())
}

/// Expected methadone (ng/mL) for the given model options
pub fn estimate_with(
    profile: &DoseProfile,
    time_since_dose_h: f64,
    mode: DosingMode,
    options: &ModelOptions,
) -> Result<f64, MethadoneError> {
    profile.validate()?;
    options.validate()?;
    require_non_negative("time_since_dose_h", time_since_dose_h)?;
    concentration_at(profile, time_since_dose_h, mode, options)
}

/// Model evaluation on already-validated inputs
///
/// Inputs that are individually finite can still overflow: a half-life so
/// long that no elimination happens within τ has no steady state. Such
/// results are rejected rather than returned as infinity.
fn concentration_at(
    profile: &DoseProfile,
    t: f64,
    mode: DosingMode,
    options: &ModelOptions,
) -> Result<f64, MethadoneError> {
    let vd = options.volume_of_distribution_l_per_kg * profile.weight_kg;
    let mut c0 = profile.dose_mg / vd;
    if mode == DosingMode::SteadyState {
        let factor = accumulation_factor(profile.half_life_h, options.dosing_interval_h);
        if !factor.is_finite() {
            return Err(MethadoneError::invalid("half_life_h", profile.half_life_h));
        }
        c0 *= factor;
    }

    let concentration = (c0 * decay(t, profile.half_life_h) * MG_PER_L_TO_NG_PER_ML).max(0.0);
    if !concentration.is_finite() {
        return Err(MethadoneError::invalid("dose_mg", profile.dose_mg));
    }

    Ok(match (mode, options.steady_state_ceiling) {
        (DosingMode::SteadyState, Some(ceiling)) if concentration > ceiling => {
            tracing::warn!(
                "Steady-state estimate {:.2} ng/mL truncated to ceiling {:.2} ng/mL",
                concentration,
                ceiling
            );
            ceiling
        }
        _ => concentration,
    })
}

/// Expected EDDP from methadone using the population-average ratio (0.3)
#[inline]
pub fn eddp_from_methadone(methadone_ng_ml: f64) -> f64 {
    eddp_from_methadone_with(methadone_ng_ml, super::types::EDDP_RATIO)
}

/// Expected EDDP from methadone using a custom ratio
#[inline]
pub fn eddp_from_methadone_with(methadone_ng_ml: f64, ratio: f64) -> f64 {
    methadone_ng_ml * ratio
}

/// Symmetric band `value · (1 ± error_pct / 100)`
///
/// For non-negative `value` the result satisfies `low <= value <= high`.
#[inline]
pub fn confidence_interval(value: f64, error_pct: f64) -> (f64, f64) {
    let e = error_pct / 100.0;
    (value * (1.0 - e), value * (1.0 + e))
}

/// [`confidence_interval`] at the default 20% width
#[inline]
pub fn default_confidence_interval(value: f64) -> (f64, f64) {
    confidence_interval(value, DEFAULT_ERROR_PCT)
}

impl ConcentrationEstimate {
    /// Compute expected methadone, EDDP and their bands
    pub fn compute(
        profile: &DoseProfile,
        time_since_dose_h: f64,
        mode: DosingMode,
        options: &ModelOptions,
    ) -> Result<Self, MethadoneError> {
        let methadone = estimate_with(profile, time_since_dose_h, mode, options)?;
        warn_if_outside(
            "time_since_dose_h",
            time_since_dose_h,
            input_range::TIME_SINCE_DOSE_H,
        );
        let eddp = eddp_from_methadone_with(methadone, options.eddp_ratio);

        Ok(Self {
            time_since_dose_h,
            mode,
            methadone_ng_ml: methadone,
            methadone_band: confidence_interval(methadone, options.error_pct).into(),
            eddp_ng_ml: eddp,
            eddp_band: confidence_interval(eddp, options.error_pct).into(),
        })
    }
}

/// Expected methadone at `n_points` evenly spaced times over `[0, t_end_h]`
///
/// The presentation layer plots this curve against the
/// [`LOW_THRESHOLD`](super::LOW_THRESHOLD), [`THERAPEUTIC_THRESHOLD`](super::THERAPEUTIC_THRESHOLD)
/// and [`TOXIC_THRESHOLD`](super::TOXIC_THRESHOLD) reference lines.
pub fn concentration_curve(
    profile: &DoseProfile,
    mode: DosingMode,
    options: &ModelOptions,
    t_end_h: f64,
    n_points: usize,
) -> Result<Vec<CurvePoint>, MethadoneError> {
    profile.validate()?;
    options.validate()?;
    require_positive("t_end_h", t_end_h)?;
    if n_points < 2 {
        return Err(MethadoneError::invalid("n_points", n_points as f64));
    }

    (0..n_points)
        .map(|i| {
            let t = i as f64 * t_end_h / (n_points - 1) as f64;
            Ok(CurvePoint {
                time_h: t,
                methadone_ng_ml: concentration_at(profile, t, mode, options)?,
            })
        })
        .collect()
}
