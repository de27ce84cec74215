//! Error types for voltage-sizing

use thiserror::Error;

/// Sizing configuration errors
///
/// The voltage computation itself never fails; these are raised only while
/// building a [`StringSizer`](crate::StringSizer).
#[derive(Debug, Clone, Error)]
pub enum SizingError {
    #[error("Non-finite value for {field}: {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("Invalid MPPT window for inverter '{model}': min {min} V is above max {max} V")]
    InvalidMpptWindow { model: String, min: f64, max: f64 },
}

impl SizingError {
    pub fn non_finite(field: &'static str, value: f64) -> Self {
        Self::NonFinite { field, value }
    }

    pub fn invalid_mppt_window(model: impl Into<String>, min: f64, max: f64) -> Self {
        Self::InvalidMpptWindow {
            model: model.into(),
            min,
            max,
        }
    }
}

pub type Result<T> = std::result::Result<T, SizingError>;

/// Reject NaN and infinities for a named configuration field
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SizingError::non_finite(field, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SizingError::non_finite("panel.voc", f64::NAN);
        assert_eq!(err.to_string(), "Non-finite value for panel.voc: NaN");

        let err = SizingError::invalid_mppt_window("SG-10", 600.0, 200.0);
        assert_eq!(
            err.to_string(),
            "Invalid MPPT window for inverter 'SG-10': min 600 V is above max 200 V"
        );
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite("x", -0.29).is_ok());
        assert!(ensure_finite("x", f64::INFINITY).is_err());
        assert!(matches!(
            ensure_finite("min_temp_c", f64::NEG_INFINITY),
            Err(SizingError::NonFinite {
                field: "min_temp_c",
                ..
            })
        ));
    }
}
