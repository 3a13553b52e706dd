//! Permission catalog and wildcard expansion

use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};

use super::types::{Permission, PermissionPattern};

/// The set of all permissions declarable under a policy.
///
/// Built once from the resource/action declarations and never mutated.
/// Wildcard grants are expanded against it: the global wildcard covers the
/// whole catalog, a resource wildcard covers that resource's entries, and a
/// literal passes through as itself whether or not it is declared.
///
/// # Examples
///
/// ```rust
/// use indexmap::IndexMap;
/// use rbac::{Permission, PermissionCatalog, PermissionPattern};
///
/// let mut resources = IndexMap::new();
/// resources.insert("posts".to_string(), vec!["read".to_string(), "write".to_string()]);
/// let catalog = PermissionCatalog::new(&resources);
///
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog.expand(&PermissionPattern::Any).len(), 2);
/// assert!(catalog.contains(&Permission::new("posts", "read")));
/// ```
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    /// Resource to its declared actions, declaration order preserved
    by_resource: IndexMap<String, IndexSet<String>>,

    /// Every declarable permission
    all: BTreeSet<Permission>,
}

impl PermissionCatalog {
    /// Builds the catalog from resource/action declarations.
    ///
    /// Duplicate actions on one resource collapse (set semantics).
    pub fn new(resources: &IndexMap<String, Vec<String>>) -> Self {
        let mut by_resource: IndexMap<String, IndexSet<String>> = IndexMap::new();
        let mut all = BTreeSet::new();

        for (resource, actions) in resources {
            let entry = by_resource.entry(resource.clone()).or_default();
            for action in actions {
                entry.insert(action.clone());
                all.insert(Permission::new(resource.clone(), action.clone()));
            }
        }

        Self { by_resource, all }
    }

    /// Expands a grant pattern into the permissions it matches.
    ///
    /// - `Any` matches the entire catalog.
    /// - `Resource(r)` matches every catalog entry for `r`; an undeclared
    ///   resource matches nothing (empty set, not an error).
    /// - `Literal(p)` matches exactly `{p}`, with no catalog check.
    pub fn expand(&self, pattern: &PermissionPattern) -> BTreeSet<Permission> {
        match pattern {
            PermissionPattern::Any => self.all.clone(),
            PermissionPattern::Resource(resource) => self
                .by_resource
                .get(resource)
                .map(|actions| {
                    actions
                        .iter()
                        .map(|action| Permission::new(resource.clone(), action.clone()))
                        .collect()
                })
                .unwrap_or_default(),
            PermissionPattern::Literal(permission) => {
                let mut single = BTreeSet::new();
                single.insert(permission.clone());
                single
            }
        }
    }

    /// Checks whether a permission is declarable under this catalog
    pub fn contains(&self, permission: &Permission) -> bool {
        self.all.contains(permission)
    }

    /// Checks whether a resource is declared
    pub fn has_resource(&self, resource: &str) -> bool {
        self.by_resource.contains_key(resource)
    }

    /// Iterates the declared resources in declaration order
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.by_resource.keys().map(String::as_str)
    }

    /// Iterates every declarable permission
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.all.iter()
    }

    /// Returns the number of declarable permissions
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Checks if no permissions are declarable
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}
