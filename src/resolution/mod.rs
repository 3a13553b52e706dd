//! # Permission Resolution Module
//!
//! Turns a declarative policy into concrete permission sets:
//! - **Catalog**: every declarable permission from resource/action
//!   declarations
//! - **Wildcard expansion**: `"*"` and `"resource:*"` grants
//! - **Inheritance closure**: cycle-safe iterative DFS over the role graph
//! - **Memoization**: per-role results cached against the immutable policy
//! - **Reverse lookup**: from a permission to the roles whose closure
//!   contains it
//!
//! ## Example
//!
//! ```rust
//! use rbac::{PermissionResolver, Policy};
//!
//! # fn example() -> Result<(), rbac::PolicyError> {
//! let policy: Policy = serde_json::from_value(serde_json::json!({
//!     "roles": ["editor", "viewer"],
//!     "resources": { "posts": ["read", "write"] },
//!     "permissions": {
//!         "editor": { "can": ["posts:*"], "inherits": ["viewer"] },
//!         "viewer": { "can": ["posts:read"] }
//!     }
//! })).unwrap();
//!
//! let resolver = PermissionResolver::new(&policy)?;
//! let writers = resolver.roles_with_permission("posts:write");
//! assert!(writers.contains("editor"));
//! assert!(!writers.contains("viewer"));
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod graph;
pub mod resolver;
pub mod types;

pub use catalog::PermissionCatalog;
pub use graph::RoleGraph;
pub use resolver::{PermissionResolver, ResolverConfig};
pub use types::{Permission, PermissionPattern};
