//! One-compartment concentration model for methadone
//!
//! Expected plasma methadone is computed from dose, body weight and elimination
//! half-life under first-order elimination, either after a single dose or at
//! steady state under once-daily dosing. Expected EDDP is derived from the
//! methadone estimate by a fixed population-average ratio.
//!
//! # Model
//!
//! | Quantity | Expression |
//! |----------|------------|
//! | Vd | 4 L/kg · weight |
//! | Decay | exp(-ln2 · t / t½) |
//! | Single dose | dose / Vd · decay · 1000 |
//! | Accumulation (τ = 24 h) | 1 / (1 - exp(-ln2 · τ / t½)) |
//! | Steady state | single dose at t · accumulation |
//! | EDDP | 0.3 · methadone |
//!
//! Concentrations are in ng/mL.
//!
//! # Usage
//!
//! ```rust
//! use methadone_tdm::model::{ConcentrationEstimate, DoseProfile, DosingMode, ModelOptions};
//!
//! let profile = DoseProfile::new(60.0, 70.0, 24.0).unwrap();
//! let est = ConcentrationEstimate::compute(
//!     &profile,
//!     12.0,
//!     DosingMode::SteadyState,
//!     &ModelOptions::default(),
//! )
//! .unwrap();
//!
//! assert!(est.methadone_band.contains(est.methadone_ng_ml));
//! ```

mod calc;
mod types;


pub use calc::{
    accumulation_factor, concentration_curve, confidence_interval, default_confidence_interval,
    eddp_from_methadone, eddp_from_methadone_with, estimate, estimate_with,
};
pub use types::{
    input_range, ConcentrationEstimate, ConfidenceBand, CurvePoint, DoseProfile, DosingMode,
    ModelOptions, DEFAULT_ERROR_PCT, DOSING_INTERVAL_H, EDDP_RATIO, LOW_THRESHOLD,
    STEADY_STATE_CEILING_NG_ML, THERAPEUTIC_THRESHOLD, TOXIC_THRESHOLD,
    VOLUME_OF_DISTRIBUTION_L_PER_KG,
};

pub(crate) use types::warn_if_outside;
