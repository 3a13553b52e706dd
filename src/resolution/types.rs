//! Permission and grant pattern types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, Result};

/// A concrete `(resource, action)` pair, canonically rendered as
/// `"resource:action"`.
///
/// Permissions order by resource, then action, so resolved sets iterate
/// deterministically.
///
/// # Examples
///
/// ```rust
/// use rbac::Permission;
///
/// let perm = Permission::new("posts", "read");
/// assert_eq!(perm.to_string(), "posts:read");
/// assert_eq!(Permission::parse("posts:read"), Some(perm));
/// assert_eq!(Permission::parse("posts"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Permission {
    /// The protected resource
    pub resource: String,

    /// The operation on that resource
    pub action: String,
}

impl Permission {
    /// Creates a permission from its resource and action parts
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// Parses the canonical `"resource:action"` form.
    ///
    /// Splits on the first `:`; the action keeps any further colons.
    /// Returns `None` when either part is empty or the separator is
    /// missing.
    pub fn parse(s: &str) -> Option<Self> {
        let (resource, action) = s.split_once(':')?;
        if resource.is_empty() || action.is_empty() {
            return None;
        }
        Some(Self::new(resource, action))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

/// A role's direct grant expression.
///
/// Three forms exist:
///
/// - [`Any`](PermissionPattern::Any): `"*"`, every catalog entry
/// - [`Resource`](PermissionPattern::Resource): `"resource:*"`, every
///   catalog entry for that resource
/// - [`Literal`](PermissionPattern::Literal): `"resource:action"`, exactly
///   that permission
///
/// Strings matching none of the forms are rejected when the policy is
/// compiled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionPattern {
    /// The global wildcard `"*"`
    Any,

    /// A resource wildcard `"resource:*"`
    Resource(String),

    /// A single `"resource:action"` permission
    Literal(Permission),
}

impl PermissionPattern {
    /// Parses a grant pattern string.
    ///
    /// `role` is the granting role, carried into the error for diagnosis.
    ///
    /// # Errors
    ///
    /// [`PolicyError::InvalidPattern`] when the string is empty, lacks the
    /// `resource:action` separator, or places a `*` anywhere other than the
    /// two wildcard forms.
    pub fn parse(role: &str, pattern: &str) -> Result<Self> {
        let invalid = |reason: &str| PolicyError::InvalidPattern {
            role: role.to_string(),
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if pattern == "*" {
            return Ok(Self::Any);
        }

        if let Some(resource) = pattern.strip_suffix(":*") {
            if resource.is_empty() {
                return Err(invalid("resource wildcard has no resource"));
            }
            if resource.contains('*') || resource.contains(':') {
                return Err(invalid("resource wildcard allows exactly one resource name"));
            }
            return Ok(Self::Resource(resource.to_string()));
        }

        if pattern.contains('*') {
            return Err(invalid("'*' is only valid as '*' or 'resource:*'"));
        }

        match Permission::parse(pattern) {
            Some(permission) => Ok(Self::Literal(permission)),
            None => Err(invalid("expected '*', 'resource:*', or 'resource:action'")),
        }
    }
}

impl fmt::Display for PermissionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "*"),
            Self::Resource(resource) => write!(f, "{resource}:*"),
            Self::Literal(permission) => write!(f, "{permission}"),
        }
    }
}
