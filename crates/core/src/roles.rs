//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000002_create_roles_table.sql`.

pub const ROLE_DEVELOPER: &str = "developer";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_ACCOUNTS: &str = "accounts";
pub const ROLE_CONTRACTOR: &str = "contractor";
pub const ROLE_MEMBER: &str = "member";

/// Roles that may be added to a team as working members.
///
/// Contractors lead teams rather than appearing in the member list, and
/// admin/accounts/developer are office roles.
pub const TEAM_MEMBER_ROLES: &[&str] = &[ROLE_MEMBER];

/// Validate that a role name is part of the seeded vocabulary.
pub fn validate_role_name(role: &str) -> Result<(), String> {
    const ALL: &[&str] = &[
        ROLE_DEVELOPER,
        ROLE_ADMIN,
        ROLE_ACCOUNTS,
        ROLE_CONTRACTOR,
        ROLE_MEMBER,
    ];
    if ALL.contains(&role) {
        Ok(())
    } else {
        Err(format!("Unknown role '{role}'. Must be one of: {}", ALL.join(", ")))
    }
}
