//! Date-by-member attendance grid assembly for project reports.
//!
//! The db layer fetches flat update rows for the range; this module turns
//! them into a dense grid: one row per calendar day in the inclusive range,
//! one cell per known member, each cell holding the optional morning and
//! evening update ids.

use crate::attendance::{UPDATE_EVENING, UPDATE_MORNING};
use crate::types::{DayDate, DbId};

/// One flat input row: an update posted by `user_id` on `day`.
#[derive(Debug, Clone)]
pub struct UpdateCell {
    pub user_id: DbId,
    pub day: DayDate,
    pub update_type: String,
    pub update_id: DbId,
}

/// A single member's slot for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DaySlot {
    pub user_id: DbId,
    pub morning_update_id: Option<DbId>,
    pub evening_update_id: Option<DbId>,
}

/// One calendar day of the grid, with a slot for every known member.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DayRow {
    pub day: DayDate,
    pub slots: Vec<DaySlot>,
}

/// Validate an inclusive report range against the project's bounded dates.
pub fn validate_range(
    start: DayDate,
    end: DayDate,
    project_start: Option<DayDate>,
    project_end: Option<DayDate>,
) -> Result<(), String> {
    if start > end {
        return Err(format!("Range start {start} is after range end {end}"));
    }
    if let Some(project_start) = project_start {
        if start < project_start {
            return Err(format!(
                "Range start {start} is before the project start date {project_start}"
            ));
        }
    }
    if let Some(project_end) = project_end {
        if end > project_end {
            return Err(format!(
                "Range end {end} is after the project end date {project_end}"
            ));
        }
    }
    Ok(())
}

/// Build the date-by-member grid.
///
/// `member_ids` is the full set of people the report covers (team members,
/// the contractor, and anyone who ever posted an update); every day row
/// carries a slot for each of them, in sorted member order, with absent
/// halves left as `None`.
pub fn build_grid(
    start: DayDate,
    end: DayDate,
    member_ids: &[DbId],
    updates: &[UpdateCell],
) -> Vec<DayRow> {
    let mut members: Vec<DbId> = member_ids.to_vec();
    members.sort_unstable();
    members.dedup();

    let mut grid: Vec<DayRow> = start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| DayRow {
            day,
            slots: members
                .iter()
                .map(|&user_id| DaySlot {
                    user_id,
                    morning_update_id: None,
                    evening_update_id: None,
                })
                .collect(),
        })
        .collect();

    for update in updates {
        if update.day < start || update.day > end {
            continue;
        }
        let day_index = (update.day - start).num_days() as usize;
        let Ok(member_index) = members.binary_search(&update.user_id) else {
            continue;
        };
        let slot = &mut grid[day_index].slots[member_index];
        match update.update_type.as_str() {
            UPDATE_MORNING => slot.morning_update_id = Some(update.update_id),
            UPDATE_EVENING => slot.evening_update_id = Some(update.update_id),
            _ => {}
        }
    }

    grid
}
