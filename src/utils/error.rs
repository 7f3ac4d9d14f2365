use thiserror::Error;

#[derive(Error, Debug)]
pub enum KindError {
    #[error("Invalid value `{value}` for `{field}`, expected one of: {expected}")]
    InvalidEnumValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Missing required field `{field}`")]
    MissingField { field: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value `{value}` for `{field}`: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The document does not match the declared shape.
    Decode,
    Config,
    Io,
}

impl KindError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        KindError::MissingField {
            field: field.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            KindError::InvalidEnumValue { .. }
            | KindError::MissingField { .. }
            | KindError::SerializationError(_) => ErrorCategory::Decode,
            KindError::TomlError(_)
            | KindError::ConfigError { .. }
            | KindError::InvalidConfigValueError { .. }
            | KindError::ValidationError { .. } => ErrorCategory::Config,
            KindError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            KindError::InvalidEnumValue { field, value, .. } => {
                format!("`{}` is not an allowed value for `{}`", value, field)
            }
            KindError::MissingField { field } => {
                format!("The document is missing the required field `{}`", field)
            }
            KindError::SerializationError(e) => format!("The document is not valid JSON: {}", e),
            KindError::TomlError(e) => format!("The manifest is not valid TOML: {}", e),
            KindError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            KindError::InvalidEnumValue { .. } => {
                "Use one of the listed values exactly as written (lowercase, snake_case)"
            }
            KindError::MissingField { .. } => "Add the field to the document",
            KindError::SerializationError(_) => "Check the JSON syntax and field types",
            KindError::TomlError(_) => "Check the manifest syntax and section names",
            KindError::IoError(_) => "Make sure the path exists and is readable/writable",
            KindError::ConfigError { .. } | KindError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again"
            }
            KindError::ValidationError { .. } => "Fix the reported entry and run again",
        }
    }
}

pub type Result<T> = std::result::Result<T, KindError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            KindError::missing_field("xxx").category(),
            ErrorCategory::Decode
        );
        assert_eq!(
            KindError::ConfigError {
                message: "bad".to_string()
            }
            .category(),
            ErrorCategory::Config
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(KindError::from(io).category(), ErrorCategory::Io);
    }

    #[test]
    fn test_invalid_enum_message_lists_expected() {
        let err = KindError::InvalidEnumValue {
            field: "state".to_string(),
            value: "paused".to_string(),
            expected: "success, in_progress, failed".to_string(),
        };
        assert!(err.to_string().contains("paused"));
        assert!(err.to_string().contains("in_progress"));
        assert!(err.user_friendly_message().contains("`state`"));
    }
}
