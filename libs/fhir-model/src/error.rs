//! Error types for model construction and validation

use thiserror::Error;

/// Failure raised while building or checking a model object.
///
/// Every builder reports the first violated rule; nothing is partially
/// constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Missing required element: '{field}'")]
    MissingRequiredField { field: &'static str },

    #[error(
        "Invalid type: {found} for choice element: '{field}' must be one of: {}",
        .allowed.join(", ")
    )]
    InvalidChoiceType {
        field: &'static str,
        found: &'static str,
        allowed: &'static [&'static str],
    },

    #[error("ele-1: {element} must have a value or children")]
    EmptyElement { element: &'static str },

    #[error("Invalid {kind} value '{value}': {reason}")]
    InvalidValue {
        kind: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid reference '{reference}' for element '{field}': {reason}")]
    InvalidReference {
        field: &'static str,
        reference: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Name of the field the error is about, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::MissingRequiredField { field }
            | Error::InvalidChoiceType { field, .. }
            | Error::InvalidReference { field, .. } => Some(field),
            _ => None,
        }
    }

    pub(crate) fn invalid_value(
        kind: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidValue {
            kind,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_error_lists_allowed_types() {
        let err = Error::InvalidChoiceType {
            field: "doseNumber",
            found: "Quantity",
            allowed: &["positiveInt", "string"],
        };
        assert_eq!(
            err.to_string(),
            "Invalid type: Quantity for choice element: 'doseNumber' must be one of: positiveInt, string"
        );
        assert_eq!(err.field(), Some("doseNumber"));
    }

    #[test]
    fn missing_field_message() {
        let err = Error::MissingRequiredField { field: "status" };
        assert_eq!(err.to_string(), "Missing required element: 'status'");
    }
}
