//! Error types for policy validation

use thiserror::Error;

/// Result type alias for policy operations
pub type Result<T> = std::result::Result<T, PolicyError>;

/// Errors raised while validating and compiling a policy document.
///
/// Every variant is a construction-time failure: once a
/// [`PermissionResolver`](crate::PermissionResolver) has been built, all of
/// its operations are total and cannot fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The `roles` list declares the same identifier twice
    #[error("duplicate role '{role}' in policy")]
    DuplicateRole { role: String },

    /// A role, resource, or action identifier fails the configured
    /// identifier pattern
    #[error("invalid {kind} identifier '{ident}'")]
    InvalidIdentifier { kind: &'static str, ident: String },

    /// A `permissions` entry is keyed by a role the policy never declares
    #[error("permissions entry '{role}' does not name a declared role")]
    UnknownRole { role: String },

    /// An `inherits` entry names a role the policy never declares
    #[error("role '{role}' inherits undeclared role '{inherits}'")]
    UnknownInheritedRole { role: String, inherits: String },

    /// A `can` entry matches none of the three grant pattern forms
    #[error("role '{role}' has invalid permission pattern '{pattern}': {reason}")]
    InvalidPattern {
        role: String,
        pattern: String,
        reason: String,
    },

    /// Strict mode only: a literal grant names a permission outside the catalog
    #[error("role '{role}' grants permission '{pattern}' which is not in the catalog")]
    UnknownPermission { role: String, pattern: String },
}
