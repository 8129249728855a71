//! Role-based visibility scoping.
//!
//! Every list/read over projects, updates, attendance, and documents is
//! restricted to the caller's accessible projects. The scope is computed
//! once per request from (role, user id) plus the membership rows the db
//! layer fetched, and then applied as a filter. A direct-by-id fetch that
//! falls outside the scope must answer exactly like a missing row.

use crate::roles::{ROLE_ACCOUNTS, ROLE_ADMIN, ROLE_DEVELOPER};
use crate::types::DbId;

/// The set of project ids a caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    /// No filtering (admin, accounts, developer).
    Unrestricted,
    /// Only these project ids. Sorted, deduplicated, possibly empty.
    Projects(Vec<DbId>),
}

impl AccessScope {
    /// Build a restricted scope from raw membership/assignment rows.
    pub fn restricted(mut project_ids: Vec<DbId>) -> Self {
        project_ids.sort_unstable();
        project_ids.dedup();
        AccessScope::Projects(project_ids)
    }

    /// Whether the caller's role bypasses project filtering entirely.
    pub fn role_is_unrestricted(role: &str) -> bool {
        role == ROLE_ADMIN || role == ROLE_ACCOUNTS || role == ROLE_DEVELOPER
    }

    pub fn allows(&self, project_id: DbId) -> bool {
        match self {
            AccessScope::Unrestricted => true,
            AccessScope::Projects(ids) => ids.binary_search(&project_id).is_ok(),
        }
    }

    /// The id list to hand to a `project_id = ANY($n)` filter, or `None`
    /// when no filter should be applied.
    pub fn filter_ids(&self) -> Option<&[DbId]> {
        match self {
            AccessScope::Unrestricted => None,
            AccessScope::Projects(ids) => Some(ids),
        }
    }
}
