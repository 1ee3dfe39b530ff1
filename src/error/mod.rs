use thiserror::Error;

/// Errors that can occur while estimating or classifying a methadone sample
#[derive(Error, Debug)]
pub enum MethadoneError {
    /// Invalid parameter value
    #[error("Invalid parameter: {param} = {value}")]
    InvalidParameter { param: String, value: String },

    /// A request or result could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MethadoneError {
    pub(crate) fn invalid(param: &str, value: f64) -> Self {
        MethadoneError::InvalidParameter {
            param: param.to_string(),
            value: value.to_string(),
        }
    }
}

/// Require `value` to be finite and strictly positive
pub(crate) fn require_positive(param: &str, value: f64) -> Result<f64, MethadoneError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MethadoneError::invalid(param, value))
    }
}

/// Require `value` to be finite and non-negative
pub(crate) fn require_non_negative(param: &str, value: f64) -> Result<f64, MethadoneError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MethadoneError::invalid(param, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_names_field() {
        let err = require_positive("weight_kg", 0.0).unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameter: weight_kg = 0");
    }

    #[test]
    fn test_nan_is_rejected() {
        assert!(require_positive("dose_mg", f64::NAN).is_err());
        assert!(require_non_negative("time_since_dose_h", f64::NAN).is_err());
        assert!(require_non_negative("time_since_dose_h", 0.0).is_ok());
    }
}
