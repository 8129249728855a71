//! Project status vocabulary and lifecycle transition rules.
//!
//! The status column on `projects` is free text constrained to this
//! vocabulary; every status write goes through [`validate_transition`] and,
//! when a completion/extension request is pending, is refused outright.

pub const STATUS_PLANNING: &str = "planning";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_ON_HOLD: &str = "on_hold";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid status values.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PLANNING,
    STATUS_IN_PROGRESS,
    STATUS_ON_HOLD,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
];

/// Validate that a status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), String> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        ))
    }
}

/// Whether a status admits no further transitions.
pub fn is_terminal(status: &str) -> bool {
    status == STATUS_COMPLETED || status == STATUS_CANCELLED
}

/// Legal transitions:
///
/// ```text
/// planning -> in_progress | cancelled
/// in_progress -> on_hold | completed | cancelled
/// on_hold -> in_progress | cancelled
/// completed, cancelled -> (terminal)
/// ```
pub fn can_transition(from: &str, to: &str) -> bool {
    match (from, to) {
        (STATUS_PLANNING, STATUS_IN_PROGRESS | STATUS_CANCELLED) => true,
        (STATUS_IN_PROGRESS, STATUS_ON_HOLD | STATUS_COMPLETED | STATUS_CANCELLED) => true,
        (STATUS_ON_HOLD, STATUS_IN_PROGRESS | STATUS_CANCELLED) => true,
        _ => false,
    }
}

/// Validate a direct status write on a project.
///
/// `has_pending_request` gates the whole transition: while a completion or
/// extension request is pending, the project status is frozen until an
/// admin resolves it.
pub fn validate_transition(
    from: &str,
    to: &str,
    has_pending_request: bool,
) -> Result<(), String> {
    validate_status(to)?;
    if from == to {
        return Err(format!("Project is already '{from}'"));
    }
    if has_pending_request {
        return Err("Project has pending requests. Resolve pending requests first".to_string());
    }
    if is_terminal(from) {
        return Err(format!("Project status '{from}' is terminal"));
    }
    if !can_transition(from, to) {
        return Err(format!("Cannot transition project from '{from}' to '{to}'"));
    }
    Ok(())
}

/// Whether updates may be posted to a project in this status.
///
/// Field updates are only legal while work is actually running.
pub fn accepts_updates(status: &str) -> bool {
    status == STATUS_IN_PROGRESS
}
