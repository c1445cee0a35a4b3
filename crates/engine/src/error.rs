//! The module contains the errors the calculators can return.
//!
//! The errors are:
//!
//! - [`Validation`] returned when a supplied value is missing, malformed or
//!   outside its allowed range.
//! - [`DomainConstraint`] returned when every input is valid on its own but
//!   a derived quantity (e.g. the repayment duration) breaks a business rule.
//! - [`Usage`] returned when the caller combines parameters incorrectly, e.g.
//!   supplying neither or both of two mutually exclusive fields.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`DomainConstraint`]: EngineError::DomainConstraint
//!  [`Usage`]: EngineError::Usage
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    DomainConstraint(String),
    #[error("{0}")]
    Usage(String),
}

impl EngineError {
    /// Stable machine-readable discriminator of the error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::DomainConstraint(_) => "domain_constraint",
            Self::Usage(_) => "usage",
        }
    }

    /// Prefix the message with a label, keeping the kind.
    pub(crate) fn context(self, label: &str) -> Self {
        match self {
            Self::Validation(msg) => Self::Validation(format!("{label}: {msg}")),
            Self::DomainConstraint(msg) => Self::DomainConstraint(format!("{label}: {msg}")),
            Self::Usage(msg) => Self::Usage(format!("{label}: {msg}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_stable() {
        assert_eq!(EngineError::Validation("x".into()).kind(), "validation");
        assert_eq!(
            EngineError::DomainConstraint("x".into()).kind(),
            "domain_constraint"
        );
        assert_eq!(EngineError::Usage("x".into()).kind(), "usage");
    }

    #[test]
    fn context_prefixes_message() {
        let err = EngineError::Validation("amount must be positive".into()).context("loan_amount");
        assert_eq!(err.to_string(), "loan_amount: amount must be positive");
        assert_eq!(err.kind(), "validation");
    }
}
