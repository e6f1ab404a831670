//! Error types for Flare

use thiserror::Error;

/// The main error type for Flare operations
#[derive(Debug, Error)]
pub enum FlareError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Invalid setting `{field}`: {reason}")]
    InvalidSetting { field: String, reason: String },

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
}

impl FlareError {
    pub fn invalid_setting(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FlareError::InvalidSetting {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for Flare operations
pub type Result<T> = std::result::Result<T, FlareError>;

impl From<toml::de::Error> for FlareError {
    fn from(err: toml::de::Error) -> Self {
        FlareError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for FlareError {
    fn from(err: toml::ser::Error) -> Self {
        FlareError::TomlSerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_errors_convert() {
        let err: FlareError = toml::from_str::<toml::Table>("= broken").unwrap_err().into();
        assert!(matches!(err, FlareError::TomlParseError(_)));
    }

    #[test]
    fn invalid_setting_message() {
        let err = FlareError::invalid_setting("max_active", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid setting `max_active`: must be at least 1"
        );
    }
}
