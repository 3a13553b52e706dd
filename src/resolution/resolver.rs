//! Policy compilation and permission closure resolution

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use regex::Regex;

use crate::error::{PolicyError, Result};
use crate::policy::Policy;
use crate::query::AccessQuery;

use super::catalog::PermissionCatalog;
use super::graph::RoleGraph;
use super::types::{Permission, PermissionPattern};

/// Construction-time configuration for [`PermissionResolver`]
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Reject literal grants that name a permission outside the catalog
    pub strict_literals: bool,

    /// Regex every role, resource, and action identifier must match
    pub ident_pattern: Regex,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strict_literals: false,
            ident_pattern: Regex::new(r"^[A-Za-z0-9_-]+$").unwrap(),
        }
    }
}

/// Resolves the effective permission set a role (or role set) holds under a
/// declarative policy.
///
/// Construction validates the whole document eagerly and fails fast on the
/// first problem; a built resolver is immutable and every operation on it
/// is total. Per-role closures are memoized, keyed by role identity, since
/// the policy never changes for the resolver's lifetime.
///
/// # Thread Safety
///
/// The compiled catalog, graph, and grants are read-only; the memo cache is
/// a `DashMap`, so a resolver can be shared across threads behind an `Arc`
/// with no further locking.
///
/// # Examples
///
/// ```rust
/// use rbac::{PermissionResolver, Policy};
///
/// # fn example() -> Result<(), rbac::PolicyError> {
/// let policy: Policy = serde_json::from_value(serde_json::json!({
///     "roles": ["editor", "viewer"],
///     "resources": { "posts": ["read", "write"] },
///     "permissions": {
///         "editor": { "can": ["posts:*"], "inherits": ["viewer"] },
///         "viewer": { "can": ["posts:read"] }
///     }
/// })).unwrap();
///
/// let resolver = PermissionResolver::new(&policy)?;
/// assert_eq!(resolver.resolve("editor").len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PermissionResolver {
    /// Every declarable permission
    catalog: PermissionCatalog,

    /// Inheritance edges over declared roles
    graph: RoleGraph,

    /// Compiled direct grants per role
    grants: HashMap<String, Vec<PermissionPattern>>,

    /// Declared roles in declaration order
    roles: Vec<String>,

    /// Memoized per-role closures
    cache: DashMap<String, Arc<BTreeSet<Permission>>>,
}

impl PermissionResolver {
    /// Validates and compiles a policy with the default configuration.
    ///
    /// # Errors
    ///
    /// Any [`PolicyError`]; the first problem found aborts construction.
    pub fn new(policy: &Policy) -> Result<Self> {
        Self::with_config(policy, ResolverConfig::default())
    }

    /// Validates and compiles a policy with an explicit configuration.
    ///
    /// Validation order: role identifiers and uniqueness, resource and
    /// action identifiers, then each `permissions` entry (declared key,
    /// pattern shapes, strict-mode catalog membership, declared
    /// `inherits` references).
    pub fn with_config(policy: &Policy, config: ResolverConfig) -> Result<Self> {
        let mut declared: HashSet<&str> = HashSet::with_capacity(policy.roles.len());
        for role in &policy.roles {
            if !config.ident_pattern.is_match(role) {
                return Err(PolicyError::InvalidIdentifier {
                    kind: "role",
                    ident: role.clone(),
                });
            }
            if !declared.insert(role.as_str()) {
                return Err(PolicyError::DuplicateRole { role: role.clone() });
            }
        }

        for (resource, actions) in &policy.resources {
            if !config.ident_pattern.is_match(resource) {
                return Err(PolicyError::InvalidIdentifier {
                    kind: "resource",
                    ident: resource.clone(),
                });
            }
            for action in actions {
                if !config.ident_pattern.is_match(action) {
                    return Err(PolicyError::InvalidIdentifier {
                        kind: "action",
                        ident: action.clone(),
                    });
                }
            }
        }

        let catalog = PermissionCatalog::new(&policy.resources);

        let mut graph = RoleGraph::new();
        for role in &policy.roles {
            graph.add_role(role.clone());
        }

        let mut grants: HashMap<String, Vec<PermissionPattern>> =
            HashMap::with_capacity(policy.permissions.len());
        for (role, rules) in &policy.permissions {
            if !declared.contains(role.as_str()) {
                return Err(PolicyError::UnknownRole { role: role.clone() });
            }

            let mut patterns = Vec::with_capacity(rules.can.len());
            for raw in &rules.can {
                let pattern = PermissionPattern::parse(role, raw)?;
                if config.strict_literals {
                    if let PermissionPattern::Literal(permission) = &pattern {
                        if !catalog.contains(permission) {
                            return Err(PolicyError::UnknownPermission {
                                role: role.clone(),
                                pattern: permission.to_string(),
                            });
                        }
                    }
                }
                patterns.push(pattern);
            }
            grants.insert(role.clone(), patterns);

            for inherited in &rules.inherits {
                if !declared.contains(inherited.as_str()) {
                    return Err(PolicyError::UnknownInheritedRole {
                        role: role.clone(),
                        inherits: inherited.clone(),
                    });
                }
                graph.add_inheritance(role.clone(), inherited.clone());
            }
        }

        tracing::debug!(
            roles = policy.roles.len(),
            resources = policy.resources.len(),
            catalog = catalog.len(),
            cyclic = graph.has_cycle(),
            "policy compiled"
        );

        Ok(Self {
            catalog,
            graph,
            grants,
            roles: policy.roles.clone(),
            cache: DashMap::new(),
        })
    }

    /// Resolves the closure of permissions a role holds: its own expanded
    /// grants unioned with those of every role it transitively inherits.
    ///
    /// A role absent from the policy resolves to the empty set. Results
    /// are memoized per role; repeated calls return equal sets.
    pub fn resolve(&self, role: &str) -> BTreeSet<Permission> {
        if !self.graph.contains(role) {
            return BTreeSet::new();
        }
        self.resolved(role).as_ref().clone()
    }

    /// Resolves the union of [`resolve`](Self::resolve) over a role set.
    ///
    /// An empty input yields the empty set.
    pub fn resolve_many(&self, roles: &[String]) -> BTreeSet<Permission> {
        roles.iter().flat_map(|role| self.resolve(role)).collect()
    }

    /// Collects every declared role whose closure contains `permission`.
    ///
    /// The permission is given in its `"resource:action"` form; a string
    /// that does not parse matches no role. Brute force over the declared
    /// roles; each candidate goes through the (memoized) closure.
    pub fn roles_with_permission(&self, permission: &str) -> BTreeSet<String> {
        let Some(permission) = Permission::parse(permission) else {
            return BTreeSet::new();
        };
        self.roles
            .iter()
            .filter(|role| self.resolved(role).contains(&permission))
            .cloned()
            .collect()
    }

    /// Builds an [`AccessQuery`] snapshot for an active-role set.
    ///
    /// The set is keyed by value: order and duplicates in the slice do not
    /// affect the snapshot.
    pub fn query(&self, roles: &[String]) -> AccessQuery {
        let active: BTreeSet<String> = roles.iter().cloned().collect();
        let permissions = self.resolve_many(roles);
        AccessQuery::new(active, permissions)
    }

    /// Returns the declared roles in declaration order
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Returns the permission catalog
    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    /// Returns the role inheritance graph
    pub fn graph(&self) -> &RoleGraph {
        &self.graph
    }

    /// Fetches or computes the memoized closure for a declared role.
    ///
    /// Concurrent first calls may compute twice; the results are equal, so
    /// whichever insert lands last is indistinguishable.
    fn resolved(&self, role: &str) -> Arc<BTreeSet<Permission>> {
        if let Some(cached) = self.cache.get(role) {
            return Arc::clone(&cached);
        }

        let computed = Arc::new(self.resolve_uncached(role));
        tracing::trace!(role, permissions = computed.len(), "role closure resolved");
        self.cache.insert(role.to_string(), Arc::clone(&computed));
        computed
    }

    /// Iterative depth-first traversal of the inheritance graph.
    ///
    /// The visited set both breaks cycles and keeps shared ancestors from
    /// being expanded twice within one call; each role contributes at most
    /// once, so traversal terminates on any finite graph.
    fn resolve_uncached(&self, role: &str) -> BTreeSet<Permission> {
        let mut permissions = BTreeSet::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![role];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }

            if let Some(patterns) = self.grants.get(current) {
                for pattern in patterns {
                    permissions.extend(self.catalog.expand(pattern));
                }
            }

            for inherited in self.graph.inherits(current) {
                if !visited.contains(inherited.as_str()) {
                    stack.push(inherited);
                }
            }
        }

        permissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::RoleRules;

    fn blog_policy() -> Policy {
        serde_json::from_value(serde_json::json!({
            "roles": ["admin", "editor", "viewer"],
            "resources": {
                "posts": ["create", "read", "update", "delete"],
                "users": ["read"]
            },
            "permissions": {
                "admin": { "can": ["*"] },
                "editor": { "can": ["posts:*"], "inherits": ["viewer"] },
                "viewer": { "can": ["posts:read", "users:read"] }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_admin_global_wildcard_covers_catalog() {
        let resolver = PermissionResolver::new(&blog_policy()).unwrap();
        assert_eq!(resolver.resolve("admin").len(), 5);
    }

    #[test]
    fn test_editor_inherits_viewer() {
        let resolver = PermissionResolver::new(&blog_policy()).unwrap();
        let editor = resolver.resolve("editor");

        assert_eq!(editor.len(), 5);
        for action in ["create", "read", "update", "delete"] {
            assert!(editor.contains(&Permission::new("posts", action)));
        }
        assert!(editor.contains(&Permission::new("users", "read")));
    }

    #[test]
    fn test_resolve_unknown_role_is_empty() {
        let resolver = PermissionResolver::new(&blog_policy()).unwrap();
        assert!(resolver.resolve("ghost").is_empty());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = PermissionResolver::new(&blog_policy()).unwrap();
        assert_eq!(resolver.resolve("editor"), resolver.resolve("editor"));
    }

    #[test]
    fn test_resolve_many_unions_and_dedupes() {
        let resolver = PermissionResolver::new(&blog_policy()).unwrap();
        let both = resolver.resolve_many(&["editor".to_string(), "viewer".to_string()]);
        assert_eq!(both, resolver.resolve("editor"));
    }

    #[test]
    fn test_resolve_many_empty_input() {
        let resolver = PermissionResolver::new(&blog_policy()).unwrap();
        assert!(resolver.resolve_many(&[]).is_empty());
    }

    #[test]
    fn test_cycle_resolves_and_terminates() {
        let policy: Policy = serde_json::from_value(serde_json::json!({
            "roles": ["role_a", "role_b"],
            "resources": { "x": ["y"] },
            "permissions": {
                "role_a": { "can": ["x:y"], "inherits": ["role_b"] },
                "role_b": { "can": [], "inherits": ["role_a"] }
            }
        }))
        .unwrap();
        let resolver = PermissionResolver::new(&policy).unwrap();

        let expected: BTreeSet<Permission> = [Permission::new("x", "y")].into_iter().collect();
        assert_eq!(resolver.resolve("role_a"), expected);
        assert_eq!(resolver.resolve("role_b"), expected);
        assert!(resolver.graph().has_cycle());
    }

    #[test]
    fn test_unknown_resource_wildcard_resolves_empty() {
        let policy: Policy = serde_json::from_value(serde_json::json!({
            "roles": ["phantom"],
            "resources": { "posts": ["read"] },
            "permissions": {
                "phantom": { "can": ["ghost:*"] }
            }
        }))
        .unwrap();
        let resolver = PermissionResolver::new(&policy).unwrap();
        assert!(resolver.resolve("phantom").is_empty());
    }

    #[test]
    fn test_roles_with_permission() {
        let resolver = PermissionResolver::new(&blog_policy()).unwrap();

        let readers = resolver.roles_with_permission("posts:read");
        let expected: BTreeSet<String> = ["admin", "editor", "viewer"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(readers, expected);

        let deleters = resolver.roles_with_permission("posts:delete");
        assert!(!deleters.contains("viewer"));
        assert!(deleters.contains("admin"));
        assert!(deleters.contains("editor"));
    }

    #[test]
    fn test_roles_with_unparsable_permission_is_empty() {
        let resolver = PermissionResolver::new(&blog_policy()).unwrap();
        assert!(resolver.roles_with_permission("posts").is_empty());
    }

    #[test]
    fn test_reverse_lookup_consistent_with_resolve() {
        let resolver = PermissionResolver::new(&blog_policy()).unwrap();
        for permission in resolver.catalog().iter().cloned().collect::<Vec<_>>() {
            let holders = resolver.roles_with_permission(&permission.to_string());
            for role in resolver.roles() {
                assert_eq!(
                    holders.contains(role),
                    resolver.resolve(role).contains(&permission),
                    "mismatch for {role} / {permission}"
                );
            }
        }
    }

    #[test]
    fn test_rejects_undeclared_inherited_role() {
        let policy: Policy = serde_json::from_value(serde_json::json!({
            "roles": ["editor"],
            "resources": {},
            "permissions": {
                "editor": { "can": [], "inherits": ["ghost"] }
            }
        }))
        .unwrap();

        let err = PermissionResolver::new(&policy).unwrap_err();
        assert_eq!(
            err,
            PolicyError::UnknownInheritedRole {
                role: "editor".to_string(),
                inherits: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_role() {
        let policy = Policy {
            roles: vec!["admin".to_string(), "admin".to_string()],
            ..Policy::default()
        };
        let err = PermissionResolver::new(&policy).unwrap_err();
        assert!(matches!(err, PolicyError::DuplicateRole { .. }));
    }

    #[test]
    fn test_rejects_undeclared_permissions_key() {
        let mut policy = Policy {
            roles: vec!["admin".to_string()],
            ..Policy::default()
        };
        policy
            .permissions
            .insert("ghost".to_string(), RoleRules::default());

        let err = PermissionResolver::new(&policy).unwrap_err();
        assert_eq!(
            err,
            PolicyError::UnknownRole {
                role: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_invalid_identifiers() {
        let policy = Policy {
            roles: vec!["not a role".to_string()],
            ..Policy::default()
        };
        let err = PermissionResolver::new(&policy).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::InvalidIdentifier { kind: "role", .. }
        ));

        let mut policy = Policy::default();
        policy
            .resources
            .insert("po:sts".to_string(), vec!["read".to_string()]);
        let err = PermissionResolver::new(&policy).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::InvalidIdentifier {
                kind: "resource",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_pattern() {
        let policy: Policy = serde_json::from_value(serde_json::json!({
            "roles": ["editor"],
            "resources": { "posts": ["read"] },
            "permissions": {
                "editor": { "can": ["posts"] }
            }
        }))
        .unwrap();

        let err = PermissionResolver::new(&policy).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidPattern { .. }));
    }

    #[test]
    fn test_lenient_mode_accepts_undeclared_literal() {
        let policy: Policy = serde_json::from_value(serde_json::json!({
            "roles": ["editor"],
            "resources": { "posts": ["read"] },
            "permissions": {
                "editor": { "can": ["ghost:walk"] }
            }
        }))
        .unwrap();

        let resolver = PermissionResolver::new(&policy).unwrap();
        let resolved = resolver.resolve("editor");
        assert!(resolved.contains(&Permission::new("ghost", "walk")));
    }

    #[test]
    fn test_strict_mode_rejects_undeclared_literal() {
        let policy: Policy = serde_json::from_value(serde_json::json!({
            "roles": ["editor"],
            "resources": { "posts": ["read"] },
            "permissions": {
                "editor": { "can": ["ghost:walk"] }
            }
        }))
        .unwrap();

        let config = ResolverConfig {
            strict_literals: true,
            ..ResolverConfig::default()
        };
        let err = PermissionResolver::with_config(&policy, config).unwrap_err();
        assert_eq!(
            err,
            PolicyError::UnknownPermission {
                role: "editor".to_string(),
                pattern: "ghost:walk".to_string(),
            }
        );
    }

    #[test]
    fn test_strict_mode_still_allows_unknown_resource_wildcard() {
        let policy: Policy = serde_json::from_value(serde_json::json!({
            "roles": ["phantom"],
            "resources": { "posts": ["read"] },
            "permissions": {
                "phantom": { "can": ["ghost:*"] }
            }
        }))
        .unwrap();

        let config = ResolverConfig {
            strict_literals: true,
            ..ResolverConfig::default()
        };
        let resolver = PermissionResolver::with_config(&policy, config).unwrap();
        assert!(resolver.resolve("phantom").is_empty());
    }

    #[test]
    fn test_diamond_inheritance_counts_once() {
        let policy: Policy = serde_json::from_value(serde_json::json!({
            "roles": ["lead", "editor", "reviewer", "viewer"],
            "resources": { "posts": ["read", "write"] },
            "permissions": {
                "lead": { "can": [], "inherits": ["editor", "reviewer"] },
                "editor": { "can": ["posts:write"], "inherits": ["viewer"] },
                "reviewer": { "can": [], "inherits": ["viewer"] },
                "viewer": { "can": ["posts:read"] }
            }
        }))
        .unwrap();

        let resolver = PermissionResolver::new(&policy).unwrap();
        let lead = resolver.resolve("lead");
        assert_eq!(lead.len(), 2);
        assert!(lead.contains(&Permission::new("posts", "read")));
        assert!(lead.contains(&Permission::new("posts", "write")));
    }
}
