//! Declarative policy document types
//!
//! A policy names the roles that exist, the resources and their actions,
//! and the grants each role carries. It is plain data: validation and
//! compilation happen in
//! [`PermissionResolver`](crate::resolution::PermissionResolver).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The declarative policy document an engine is built from.
///
/// Deserializes from the JSON shape:
///
/// ```json
/// {
///   "roles": ["admin", "editor", "viewer"],
///   "resources": {
///     "posts": ["create", "read", "update", "delete"],
///     "users": ["read"]
///   },
///   "permissions": {
///     "admin":  { "can": ["*"] },
///     "editor": { "can": ["posts:*"], "inherits": ["viewer"] },
///     "viewer": { "can": ["posts:read", "users:read"] }
///   }
/// }
/// ```
///
/// Declaration order of resources and permission entries is preserved
/// (`IndexMap`), so a round-tripped document reads the way it was written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Policy {
    /// Declared role identifiers, unique within the policy
    #[serde(default)]
    pub roles: Vec<String>,

    /// Resource identifier to the actions it supports
    #[serde(default)]
    pub resources: IndexMap<String, Vec<String>>,

    /// Role identifier to the grants it carries
    #[serde(default)]
    pub permissions: IndexMap<String, RoleRules>,
}

/// The grants one role carries: direct permission patterns and the roles
/// it inherits from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleRules {
    /// Permission patterns granted directly: `"*"`, `"resource:*"`, or
    /// `"resource:action"`
    #[serde(default)]
    pub can: Vec<String>,

    /// Roles whose resolved permissions this role also receives
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inherits: Vec<String>,
}
