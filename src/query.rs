//! Active-role query view
//!
//! An [`AccessQuery`] is an immutable snapshot of what one active-role set
//! can do, built once per query context by
//! [`PermissionResolver::query`](crate::PermissionResolver::query) and
//! passed explicitly to whatever consumes it.

use std::collections::BTreeSet;

use crate::resolution::Permission;

/// What a set of active roles can do, resolved once at construction.
///
/// Predicates over the empty input follow set algebra: every "all" check
/// holds vacuously, no "any" check does.
///
/// # Examples
///
/// ```rust
/// use rbac::{PermissionResolver, Policy};
///
/// # fn example() -> Result<(), rbac::PolicyError> {
/// let policy: Policy = serde_json::from_value(serde_json::json!({
///     "roles": ["viewer"],
///     "resources": { "posts": ["read", "write"] },
///     "permissions": { "viewer": { "can": ["posts:read"] } }
/// })).unwrap();
/// let resolver = PermissionResolver::new(&policy)?;
///
/// let query = resolver.query(&["viewer".to_string()]);
/// assert!(query.can("posts:read"));
/// assert!(!query.can("posts:write"));
/// assert!(query.can_all(&[]));
/// assert!(!query.can_any(&[]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessQuery {
    /// The active roles, deduplicated by value
    roles: BTreeSet<String>,

    /// Every permission the active roles resolve to
    permissions: BTreeSet<Permission>,
}

impl AccessQuery {
    pub(crate) fn new(roles: BTreeSet<String>, permissions: BTreeSet<Permission>) -> Self {
        Self { roles, permissions }
    }

    /// Checks whether the active roles hold `permission`
    /// (`"resource:action"` form; an unparsable string holds never).
    pub fn can(&self, permission: &str) -> bool {
        Permission::parse(permission)
            .map(|permission| self.permissions.contains(&permission))
            .unwrap_or(false)
    }

    /// Checks whether every listed permission is held.
    ///
    /// Vacuously `true` for an empty list.
    pub fn can_all(&self, permissions: &[&str]) -> bool {
        permissions.iter().all(|permission| self.can(permission))
    }

    /// Checks whether at least one listed permission is held.
    ///
    /// Vacuously `false` for an empty list.
    pub fn can_any(&self, permissions: &[&str]) -> bool {
        permissions.iter().any(|permission| self.can(permission))
    }

    /// Checks whether `role` is among the active roles
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Checks whether every listed role is active.
    ///
    /// Vacuously `true` for an empty list.
    pub fn has_all_roles(&self, roles: &[&str]) -> bool {
        roles.iter().all(|role| self.roles.contains(*role))
    }

    /// Checks whether at least one listed role is active.
    ///
    /// Vacuously `false` for an empty list.
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.roles.contains(*role))
    }

    /// Returns the active roles
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// Returns the resolved permissions
    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }
}
