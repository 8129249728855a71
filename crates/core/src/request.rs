//! Completion/extension request vocabulary and workflow preconditions.
//!
//! Requests are created by the project's assigned contractor and resolved
//! exactly once by an admin. The checks here are shared by the api handlers
//! and the db-level tests; the partial unique index on pending requests is
//! the backstop for the one-pending-per-type rule under concurrency.

use crate::project_status::STATUS_IN_PROGRESS;
use crate::types::{DayDate, DbId};

pub const REQUEST_COMPLETION: &str = "completion";
pub const REQUEST_EXTENSION: &str = "extension";

pub const REQUEST_STATUS_PENDING: &str = "pending";
pub const REQUEST_STATUS_APPROVED: &str = "approved";
pub const REQUEST_STATUS_REJECTED: &str = "rejected";

/// All valid request type values.
pub const VALID_REQUEST_TYPES: &[&str] = &[REQUEST_COMPLETION, REQUEST_EXTENSION];

/// Validate that a request type string is one of the accepted values.
pub fn validate_request_type(request_type: &str) -> Result<(), String> {
    if VALID_REQUEST_TYPES.contains(&request_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid request type '{request_type}'. Must be one of: {}",
            VALID_REQUEST_TYPES.join(", ")
        ))
    }
}

/// Preconditions shared by both request kinds: only the assigned contractor
/// may file, and only while the project is running.
pub fn validate_request_creation(
    requested_by: DbId,
    project_contractor_id: Option<DbId>,
    project_status: &str,
) -> Result<(), String> {
    match project_contractor_id {
        Some(contractor_id) if contractor_id == requested_by => {}
        Some(_) => return Err("Only the assigned contractor may file project requests".to_string()),
        None => return Err("Project has no assigned contractor".to_string()),
    }
    if project_status != STATUS_IN_PROGRESS {
        return Err(format!(
            "Requests require an in-progress project (current status: '{project_status}')"
        ));
    }
    Ok(())
}

/// An extension must push the deadline strictly later than it already is.
pub fn validate_extension_date(
    requested_end_date: DayDate,
    current_end_date: Option<DayDate>,
) -> Result<(), String> {
    match current_end_date {
        Some(current) if requested_end_date > current => Ok(()),
        Some(current) => Err(format!(
            "Requested end date {requested_end_date} must be after the current end date {current}"
        )),
        None => Err("Project has no end date to extend".to_string()),
    }
}

/// Pending is the only state a request can be resolved or cancelled from.
pub fn validate_resolvable(request_status: &str) -> Result<(), String> {
    if request_status == REQUEST_STATUS_PENDING {
        Ok(())
    } else {
        Err(format!(
            "Request has already been resolved (status: '{request_status}')"
        ))
    }
}
