use thiserror::Error;

/// Top-level error type returned by the enum registry and config loader.
#[derive(Debug, Error)]
pub enum EnumError {
    /// Lookup addressed a model/field pair that was never registered.
    #[error("unknown enum field '{field}' on model '{model}'")]
    UnknownField { model: String, field: String },

    /// One or more enum declarations were rejected at registration time.
    #[error("invalid enum configuration")]
    Configuration(#[from] ConfigurationError),

    /// A checked record failed one or more enum rules.
    #[error("validation failed")]
    Validation(#[from] ValidationError),

    /// Reading a configuration file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration file is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EnumError {
    pub(crate) fn unknown_field(model: &str, field: &str) -> Self {
        Self::UnknownField {
            model: model.to_string(),
            field: field.to_string(),
        }
    }
}

/// Collection of declaration problems found while registering a model.
///
/// Each issue names the field whose registration was aborted; fields not
/// listed here were registered normally.
#[derive(Debug, Error)]
#[error("configuration errors: {issues:?}")]
pub struct ConfigurationError {
    pub issues: Vec<ConfigurationIssue>,
}

impl ConfigurationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ConfigurationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ConfigurationIssue::new(field, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Names of the fields that failed, in the order they were encountered.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().map(|issue| issue.field.as_str())
    }
}

/// A single malformed declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationIssue {
    pub field: String,
    pub message: String,
}

impl ConfigurationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigurationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collection of rule failures produced when a host checks a record.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Detailed validation failure for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type EnumResult<T> = Result<T, EnumError>;

/// Convenience alias used by rule checks.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_lists_failed_fields() {
        let err = ConfigurationError::new([
            ConfigurationIssue::new("status", "duplicate key '1'"),
            ConfigurationIssue::new("kind", "label must be a string or null"),
        ]);
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["status", "kind"]);
        assert!(!err.is_empty());
    }

    #[test]
    fn unknown_field_message_names_model_and_field() {
        let err = EnumError::unknown_field("Article", "status");
        assert_eq!(err.to_string(), "unknown enum field 'status' on model 'Article'");
    }
}
