//! # Role-Based Permission Resolution (rbac)
//!
//! Resolves the effective permission set a set of roles grants under a
//! declarative policy:
//! - Permission catalog derived from resource/action declarations
//! - Wildcard grants (`"*"`, `"resource:*"`) expanded against the catalog
//! - Role inheritance with cycle-safe closure traversal
//! - Active-role query view (`can`, `can_all`, `can_any`, `has_role`, ...)
//! - Reverse lookup from a permission to the roles granting it
//! - Thread-safe, memoized resolution over an immutable policy
//!
//! ## Example
//!
//! ```rust
//! use rbac::{PermissionResolver, Policy};
//!
//! # fn example() -> Result<(), rbac::PolicyError> {
//! let policy: Policy = serde_json::from_value(serde_json::json!({
//!     "roles": ["admin", "editor", "viewer"],
//!     "resources": {
//!         "posts": ["create", "read", "update", "delete"],
//!         "users": ["read"]
//!     },
//!     "permissions": {
//!         "admin":  { "can": ["*"] },
//!         "editor": { "can": ["posts:*"], "inherits": ["viewer"] },
//!         "viewer": { "can": ["posts:read", "users:read"] }
//!     }
//! })).unwrap();
//!
//! let resolver = PermissionResolver::new(&policy)?;
//!
//! let query = resolver.query(&["editor".to_string()]);
//! assert!(query.can("posts:update"));
//! assert!(query.can("users:read"));
//! assert!(!query.can("users:invite"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod policy;
pub mod query;
pub mod resolution;

pub use error::{PolicyError, Result};
pub use policy::{Policy, RoleRules};
pub use query::AccessQuery;
pub use resolution::{
    Permission, PermissionCatalog, PermissionPattern, PermissionResolver, ResolverConfig, RoleGraph,
};
