//! Concentration model types: dosing inputs, options, and estimates
//!
//! - [`DoseProfile`]: dose, weight and half-life of a patient
//! - [`DosingMode`]: single dose or once-daily steady state
//! - [`ModelOptions`]: model constants and the optional steady-state ceiling
//! - [`ConcentrationEstimate`]: expected methadone and EDDP with their bands

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{require_non_negative, require_positive, MethadoneError};

// ============================================================================
// Constants
// ============================================================================

/// Volume of distribution (L/kg)
pub const VOLUME_OF_DISTRIBUTION_L_PER_KG: f64 = 4.0;

/// Dosing interval for steady-state accumulation (h)
pub const DOSING_INTERVAL_H: f64 = 24.0;

/// Population-average EDDP / methadone ratio
pub const EDDP_RATIO: f64 = 0.3;

/// Default relative width of the confidence band (%)
pub const DEFAULT_ERROR_PCT: f64 = 20.0;

/// Ceiling applied to steady-state estimates by [`ModelOptions::capped`] (ng/mL)
pub const STEADY_STATE_CEILING_NG_ML: f64 = 400.0;

/// mg/L to ng/mL
pub(crate) const MG_PER_L_TO_NG_PER_ML: f64 = 1000.0;

/// Lower reference line of the concentration curve (ng/mL)
pub const LOW_THRESHOLD: f64 = 100.0;

/// Therapeutic reference line of the concentration curve (ng/mL)
pub const THERAPEUTIC_THRESHOLD: f64 = 400.0;

/// Toxicity reference line of the concentration curve (ng/mL)
pub const TOXIC_THRESHOLD: f64 = 600.0;

/// Input ranges the presentation layer is expected to enforce before calling
/// into the model. Values outside these ranges are still computed, but logged.
pub mod input_range {
    pub const DOSE_MG: (f64, f64) = (1.0, 300.0);
    pub const WEIGHT_KG: (f64, f64) = (30.0, 150.0);
    pub const HALF_LIFE_H: (f64, f64) = (10.0, 60.0);
    pub const TIME_SINCE_DOSE_H: (f64, f64) = (1.0, 48.0);
    pub const MEASURED_NG_ML: (f64, f64) = (0.0, 2000.0);
}

pub(crate) fn warn_if_outside(param: &str, value: f64, range: (f64, f64)) {
    if value < range.0 || value > range.1 {
        tracing::warn!(
            "{} = {} is outside the expected range [{}, {}]",
            param,
            value,
            range.0,
            range.1
        );
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// Dose, body weight and elimination half-life of a patient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseProfile {
    /// Daily methadone dose (mg)
    pub dose_mg: f64,
    /// Body weight (kg)
    pub weight_kg: f64,
    /// Elimination half-life (h)
    pub half_life_h: f64,
}

impl DoseProfile {
    /// Create a validated dose profile
    ///
    /// Fails with [`MethadoneError::InvalidParameter`] if any value is not
    /// strictly positive.
    pub fn new(dose_mg: f64, weight_kg: f64, half_life_h: f64) -> Result<Self, MethadoneError> {
        let profile = Self {
            dose_mg,
            weight_kg,
            half_life_h,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check that dose, weight and half-life are strictly positive
    pub fn validate(&self) -> Result<(), MethadoneError> {
        require_positive("dose_mg", self.dose_mg)?;
        require_positive("weight_kg", self.weight_kg)?;
        require_positive("half_life_h", self.half_life_h)?;
        warn_if_outside("dose_mg", self.dose_mg, input_range::DOSE_MG);
        warn_if_outside("weight_kg", self.weight_kg, input_range::WEIGHT_KG);
        warn_if_outside("half_life_h", self.half_life_h, input_range::HALF_LIFE_H);
        Ok(())
    }

    /// First-order elimination rate constant ke = ln(2) / t½ (1/h)
    pub fn elimination_rate(&self) -> f64 {
        std::f64::consts::LN_2 / self.half_life_h
    }

    /// Apparent clearance CL = ke · Vd (L/h), with Vd = `vd_l_per_kg` · weight
    pub fn clearance_l_per_h(&self, vd_l_per_kg: f64) -> f64 {
        self.elimination_rate() * vd_l_per_kg * self.weight_kg
    }
}

/// Dosing regimen assumed by the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DosingMode {
    /// Repeated once-daily dosing at plasma equilibrium
    #[default]
    SteadyState,
    /// A single isolated dose
    SingleDose,
}

impl From<bool> for DosingMode {
    /// `true` selects [`DosingMode::SteadyState`]
    fn from(steady_state: bool) -> Self {
        if steady_state {
            DosingMode::SteadyState
        } else {
            DosingMode::SingleDose
        }
    }
}

impl fmt::Display for DosingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DosingMode::SteadyState => write!(f, "steady state"),
            DosingMode::SingleDose => write!(f, "single dose"),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Concentration model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    /// Volume of distribution (L/kg, default: 4.0)
    pub volume_of_distribution_l_per_kg: f64,

    /// Dosing interval used for the accumulation factor (h, default: 24.0)
    pub dosing_interval_h: f64,

    /// EDDP / methadone ratio (default: 0.3)
    pub eddp_ratio: f64,

    /// Relative width of the confidence bands (%, default: 20.0)
    pub error_pct: f64,

    /// Upper bound applied to steady-state estimates (None = no ceiling)
    ///
    /// One revision of the calculator capped steady-state output at
    /// 400 ng/mL. The cap hides exactly the concentrations the toxicity
    /// threshold is meant to catch, so it is off unless requested.
    pub steady_state_ceiling: Option<f64>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            volume_of_distribution_l_per_kg: VOLUME_OF_DISTRIBUTION_L_PER_KG,
            dosing_interval_h: DOSING_INTERVAL_H,
            eddp_ratio: EDDP_RATIO,
            error_pct: DEFAULT_ERROR_PCT,
            steady_state_ceiling: None,
        }
    }
}

impl ModelOptions {
    /// Defaults plus the historical 400 ng/mL steady-state ceiling
    pub fn capped() -> Self {
        Self {
            steady_state_ceiling: Some(STEADY_STATE_CEILING_NG_ML),
            ..Default::default()
        }
    }

    /// Set the steady-state ceiling
    pub fn with_steady_state_ceiling(mut self, ceiling: f64) -> Self {
        self.steady_state_ceiling = Some(ceiling);
        self
    }

    /// Set the confidence band width (%)
    pub fn with_error_pct(mut self, error_pct: f64) -> Self {
        self.error_pct = error_pct;
        self
    }

    /// Set the dosing interval (h)
    pub fn with_dosing_interval(mut self, tau_h: f64) -> Self {
        self.dosing_interval_h = tau_h;
        self
    }

    /// Set the volume of distribution (L/kg)
    pub fn with_volume_of_distribution(mut self, vd_l_per_kg: f64) -> Self {
        self.volume_of_distribution_l_per_kg = vd_l_per_kg;
        self
    }

    pub fn validate(&self) -> Result<(), MethadoneError> {
        require_positive(
            "volume_of_distribution_l_per_kg",
            self.volume_of_distribution_l_per_kg,
        )?;
        require_positive("dosing_interval_h", self.dosing_interval_h)?;
        require_non_negative("eddp_ratio", self.eddp_ratio)?;
        require_non_negative("error_pct", self.error_pct)?;
        if self.error_pct > 100.0 {
            return Err(MethadoneError::invalid("error_pct", self.error_pct));
        }
        if let Some(ceiling) = self.steady_state_ceiling {
            require_non_negative("steady_state_ceiling", ceiling)?;
        }
        Ok(())
    }
}

// ============================================================================
// Results
// ============================================================================

/// Symmetric confidence band around an expected value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBand {
    pub low: f64,
    pub high: f64,
}

impl ConfidenceBand {
    /// Whether `value` lies within the band (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

impl From<(f64, f64)> for ConfidenceBand {
    fn from((low, high): (f64, f64)) -> Self {
        Self { low, high }
    }
}

/// Expected methadone and EDDP concentrations at the sampling time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationEstimate {
    /// Time since the last dose (h)
    pub time_since_dose_h: f64,
    /// Dosing regimen the estimate assumes
    pub mode: DosingMode,
    /// Expected methadone (ng/mL)
    pub methadone_ng_ml: f64,
    /// Band around the expected methadone
    pub methadone_band: ConfidenceBand,
    /// Expected EDDP (ng/mL)
    pub eddp_ng_ml: f64,
    /// Band around the expected EDDP
    pub eddp_band: ConfidenceBand,
}

impl fmt::Display for ConcentrationEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "methadone {:.2} ng/mL [{:.2}, {:.2}], EDDP {:.2} ng/mL [{:.2}, {:.2}] at {} h ({})",
            self.methadone_ng_ml,
            self.methadone_band.low,
            self.methadone_band.high,
            self.eddp_ng_ml,
            self.eddp_band.low,
            self.eddp_band.high,
            self.time_since_dose_h,
            self.mode
        )
    }
}

/// A point on the expected concentration-time curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Time since dose (h)
    pub time_h: f64,
    /// Expected methadone (ng/mL)
    pub methadone_ng_ml: f64,
}
