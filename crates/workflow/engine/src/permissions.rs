//! Permission matcher: role and permission checks for entering a step
//!
//! Permissions are dot-separated strings (`task.create`). Grants may use
//! hierarchical wildcards (`task.*`), the universal grants `*` / `*.*`,
//! and the reserved superuser grant `admin.*`. Matching never fails; an
//! unmatched permission is simply `false`.

use routeflow_types::Step;
use std::collections::HashSet;

/// Reserved grant that satisfies every permission.
pub const SUPERUSER_GRANT: &str = "admin.*";

const UNIVERSAL_GRANTS: [&str; 2] = ["*", "*.*"];

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// A normalized set of granted permissions (or roles).
///
/// Entries are trimmed and lowercased once; blank entries are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GrantSet {
    entries: HashSet<String>,
}

impl GrantSet {
    pub fn new<I, S>(granted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = granted
            .into_iter()
            .map(|g| normalize(g.as_ref()))
            .filter(|g| !g.is_empty())
            .collect();
        Self { entries }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.entries.contains(value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether `required` is satisfied by this grant set.
    pub fn satisfies(&self, required: &str) -> bool {
        let required = normalize(required);
        if required.is_empty() {
            return false;
        }

        if self.contains(&required) {
            return true;
        }

        if UNIVERSAL_GRANTS.iter().any(|g| self.contains(g)) {
            return true;
        }

        // "a.b.c" -> "a.b.*" -> "a.*" -> "*"
        let parts: Vec<&str> = required.split('.').collect();
        for i in (1..=parts.len()).rev() {
            let candidate = if i == 1 {
                "*".to_string()
            } else {
                format!("{}.*", parts[..i - 1].join("."))
            };
            if self.contains(&candidate) {
                return true;
            }
        }

        // TODO: decide whether a tenant-defined "admin.*" should lose its
        // superuser meaning; see DESIGN.md open questions.
        self.contains(SUPERUSER_GRANT)
    }
}

/// Match a single required permission against a granted collection
/// with wildcard rules.
pub fn permission_matches<I, S>(required: &str, granted: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    GrantSet::new(granted).satisfies(required)
}

/// Decide whether an actor with `user_roles` and `user_perms` may move
/// into `step`.
///
/// 1. Open steps (no roles, no permissions) admit everyone.
/// 2. Any role matching an assignee role (case-insensitive) admits.
/// 3. Otherwise any required permission satisfied by the grants admits.
pub fn can_transition<R, RS, P, PS>(step: &Step, user_roles: R, user_perms: P) -> bool
where
    R: IntoIterator<Item = RS>,
    RS: AsRef<str>,
    P: IntoIterator<Item = PS>,
    PS: AsRef<str>,
{
    if step.is_open() {
        return true;
    }

    let roles = GrantSet::new(user_roles);
    if step
        .assignee_roles
        .iter()
        .any(|r| roles.contains(&normalize(r)))
    {
        return true;
    }

    let perms = GrantSet::new(user_perms);
    step.permissions
        .iter()
        .filter(|p| !p.trim().is_empty())
        .any(|p| perms.satisfies(p))
}
