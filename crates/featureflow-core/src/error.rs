//! Plan construction errors

use crate::model::ExternalKind;
use thiserror::Error;

/// Errors raised while validating inputs or assembling a plan.
///
/// All of these are non-retryable: calling `build` again with the same
/// inputs fails the same way. The leading token of each message matches
/// [`ValidationError::reason`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid-name: {0}")]
    InvalidName(String),

    #[error("missing-reference: no {0} reference supplied")]
    MissingReference(ExternalKind),

    #[error("invalid-config: {0}")]
    InvalidConfig(String),

    #[error("invalid-plan: duplicate logical name '{0}'")]
    DuplicateResource(String),

    #[error("invalid-plan: '{resource}' depends on unknown resource '{dependency}'")]
    UnknownDependency {
        resource: String,
        dependency: String,
    },

    #[error("invalid-plan: '{resource}' references {target} without a dependency edge")]
    UndeclaredReference { resource: String, target: String },

    #[error("invalid-plan: circular dependency between {0}")]
    CircularDependency(String),
}

impl ValidationError {
    /// Stable machine-readable reason token
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::InvalidName(_) => "invalid-name",
            ValidationError::MissingReference(_) => "missing-reference",
            ValidationError::InvalidConfig(_) => "invalid-config",
            ValidationError::DuplicateResource(_)
            | ValidationError::UnknownDependency { .. }
            | ValidationError::UndeclaredReference { .. }
            | ValidationError::CircularDependency(_) => "invalid-plan",
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_tokens() {
        assert_eq!(
            ValidationError::InvalidName("x".into()).reason(),
            "invalid-name"
        );
        assert_eq!(
            ValidationError::MissingReference(ExternalKind::DnsZone).reason(),
            "missing-reference"
        );
        assert_eq!(
            ValidationError::CircularDependency("a, b".into()).reason(),
            "invalid-plan"
        );
    }

    #[test]
    fn test_display_starts_with_reason() {
        let err = ValidationError::MissingReference(ExternalKind::Identity);
        assert!(err.to_string().starts_with(err.reason()));
        assert_eq!(
            err.to_string(),
            "missing-reference: no identity reference supplied"
        );
    }
}
