//! Error types for permission evaluation.
//!
//! Denial is not an error for `has_permission`; it is an ordinary `false`.
//! `AccessError::PermissionDenied` is only produced by the assert helper, where
//! a denial has to stop the caller's control flow.

use thiserror::Error;

use crate::resource::ResourceKind;

/// Failure raised by a dynamic rule that was handed data it cannot judge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// A field the rule compares against is absent or empty.
    #[error("required attribute '{field}' is missing")]
    MissingAttribute { field: &'static str },

    /// The entity or principal is structurally inconsistent.
    #[error("malformed input: {reason}")]
    Malformed { reason: String },
}

/// The unified error type for the access-control crates.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The principal may not perform `action` on `resource`.
    #[error(
        "permission denied: '{action}' on '{resource}'{}",
        entity_suffix(.entity_id)
    )]
    PermissionDenied {
        resource: ResourceKind,
        action: &'static str,
        entity_id: Option<String>,
    },

    /// A dynamic rule failed while evaluating. Never collapsed into a denial.
    #[error("failed to evaluate '{action}' on '{resource}': {source}")]
    Evaluation {
        resource: ResourceKind,
        action: &'static str,
        #[source]
        source: EvaluationError,
    },

    /// A string-based query named a role, resource or action that does not exist.
    #[error("invalid permission query: {reason}")]
    InvalidQuery { reason: String },

    /// Override configuration is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

fn entity_suffix(entity_id: &Option<String>) -> String {
    match entity_id {
        Some(id) => format!(" (entity '{}')", id),
        None => String::new(),
    }
}

/// Convenience alias used throughout the access-control crates.
pub type AccessResult<T> = Result<T, AccessError>;
