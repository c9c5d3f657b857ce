//! Error types for washdesk domain operations

use thiserror::Error;

/// Form validation errors.
///
/// Raised before any network call. The display string is the exact message
/// shown to the operator, so each variant names one specific field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} {reason}")]
    Invalid { field: String, reason: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        Self::Required {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field } | ValidationError::Invalid { field, .. } => field,
        }
    }
}

/// Errors turning wire values into domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown day of week: {0}")]
    UnknownDay(String),

    #[error("Unknown {kind} status: {value}")]
    UnknownStatus { kind: &'static str, value: String },

    #[error("Attendance record {id} has neither a worker nor a staff subject")]
    MissingSubject { id: String },
}
