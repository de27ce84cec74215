//! Common error types for VoltageEMS sizing tools

use thiserror::Error;
use voltage_sizing::SizingError;

/// Error type shared by configuration loading and logging setup
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/Deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Design values rejected by the sizer
    #[error("Sizing error: {0}")]
    Sizing(#[from] SizingError),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("missing panel section");
        assert_eq!(err.to_string(), "Configuration error: missing panel section");
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<String>("invalid json");
        assert!(json_err.is_err());
        let err: Error = json_err.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));

        let err: Error = SizingError::non_finite("min_temp_c", f64::NAN).into();
        assert!(matches!(err, Error::Sizing(_)));
        assert_eq!(
            err.to_string(),
            "Sizing error: Non-finite value for min_temp_c: NaN"
        );
    }
}
