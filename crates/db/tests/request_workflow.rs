//! Integration tests for the completion/extension request workflow.
//!
//! Covers the pending-uniqueness partial index and the transactional
//! request + project mutations on approve/reject.

use chrono::NaiveDate;
use sitelog_db::models::project::CreateProject;
use sitelog_db::models::project_request::CreateRequest;
use sitelog_db::models::user::CreateUser;
use sitelog_db::repositories::{ProjectRepo, ProjectRequestRepo, RoleRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, name: &str, role: &str) -> i64 {
    let role_id = RoleRepo::find_by_name(pool, role)
        .await
        .unwrap()
        .unwrap()
        .id;
    UserRepo::create(
        pool,
        &CreateUser {
            full_name: name.to_string(),
            email: format!("{}@site.test", name.to_lowercase().replace(' ', ".")),
            password_hash: "$argon2id$fake".to_string(),
            role_id,
        },
    )
    .await
    .unwrap()
    .id
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
}

/// An in-progress project with an assigned contractor, ready for requests.
async fn running_project(pool: &PgPool, name: &str, admin: i64, contractor: i64) -> i64 {
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            name: name.to_string(),
            description: None,
            admin_id: admin,
            start_date: Some(day(1)),
            end_date: Some(day(30)),
            budget: None,
        },
    )
    .await
    .unwrap();
    ProjectRepo::set_contractor(pool, project.id, contractor)
        .await
        .unwrap();
    ProjectRepo::set_status(pool, project.id, "in_progress")
        .await
        .unwrap();
    project.id
}

fn completion(project_id: i64, requested_by: i64) -> CreateRequest {
    CreateRequest {
        project_id,
        requested_by,
        request_type: "completion".to_string(),
        requested_end_date: None,
    }
}

fn extension(project_id: i64, requested_by: i64, d: u32) -> CreateRequest {
    CreateRequest {
        project_id,
        requested_by,
        request_type: "extension".to_string(),
        requested_end_date: Some(day(d)),
    }
}

// ---------------------------------------------------------------------------
// Pending uniqueness
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_pending_request_of_same_type_rejected(pool: PgPool) {
    let admin = new_user(&pool, "Admin R1", "admin").await;
    let contractor = new_user(&pool, "Contractor R1", "contractor").await;
    let project = running_project(&pool, "Requests A", admin, contractor).await;

    ProjectRequestRepo::create(&pool, &completion(project, contractor))
        .await
        .unwrap();
    let result = ProjectRequestRepo::create(&pool, &completion(project, contractor)).await;
    assert!(
        result.is_err(),
        "second pending completion request must lose on uq_project_requests_pending"
    );

    // A pending request of the other type is fine.
    ProjectRequestRepo::create(&pool, &extension(project, contractor, 31))
        .await
        .unwrap();

    assert!(ProjectRequestRepo::has_pending_for_project(&pool, project)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pending_uniqueness_clears_after_resolution(pool: PgPool) {
    let admin = new_user(&pool, "Admin R2", "admin").await;
    let contractor = new_user(&pool, "Contractor R2", "contractor").await;
    let project = running_project(&pool, "Requests B", admin, contractor).await;

    let request = ProjectRequestRepo::create(&pool, &completion(project, contractor))
        .await
        .unwrap();
    ProjectRequestRepo::reject(&pool, request.id, admin)
        .await
        .unwrap()
        .expect("pending request should be rejectable");

    // The partial index only covers pending rows, so a fresh request works.
    ProjectRequestRepo::create(&pool, &completion(project, contractor))
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Approve
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_completion_completes_project(pool: PgPool) {
    let admin = new_user(&pool, "Admin R3", "admin").await;
    let contractor = new_user(&pool, "Contractor R3", "contractor").await;
    let project = running_project(&pool, "Requests C", admin, contractor).await;

    let request = ProjectRequestRepo::create(&pool, &completion(project, contractor))
        .await
        .unwrap();
    let (approved, mutated) = ProjectRequestRepo::approve(&pool, request.id, admin, None)
        .await
        .unwrap()
        .expect("pending request should be approvable");

    assert_eq!(approved.status, "approved");
    assert_eq!(approved.reviewed_by, Some(admin));
    assert!(approved.reviewed_at.is_some());
    assert_eq!(mutated.status, "completed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_extension_moves_end_date(pool: PgPool) {
    let admin = new_user(&pool, "Admin R4", "admin").await;
    let contractor = new_user(&pool, "Contractor R4", "contractor").await;
    let project = running_project(&pool, "Requests D", admin, contractor).await;

    let request = ProjectRequestRepo::create(&pool, &extension(project, contractor, 31))
        .await
        .unwrap();
    // Reviewer overrides the requested date.
    let (approved, mutated) =
        ProjectRequestRepo::approve(&pool, request.id, admin, Some(day(29)))
            .await
            .unwrap()
            .unwrap();

    assert_eq!(approved.status, "approved");
    assert_eq!(approved.approved_end_date, Some(day(29)));
    assert_eq!(mutated.end_date, Some(day(29)));
    // Status is untouched by an extension.
    assert_eq!(mutated.status, "in_progress");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_is_single_shot(pool: PgPool) {
    let admin = new_user(&pool, "Admin R5", "admin").await;
    let contractor = new_user(&pool, "Contractor R5", "contractor").await;
    let project = running_project(&pool, "Requests E", admin, contractor).await;

    let request = ProjectRequestRepo::create(&pool, &completion(project, contractor))
        .await
        .unwrap();
    ProjectRequestRepo::approve(&pool, request.id, admin, None)
        .await
        .unwrap()
        .unwrap();

    // Second resolution attempt of either kind finds nothing pending.
    assert!(ProjectRequestRepo::approve(&pool, request.id, admin, None)
        .await
        .unwrap()
        .is_none());
    assert!(ProjectRequestRepo::reject(&pool, request.id, admin)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Reject
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_completion_restores_in_progress(pool: PgPool) {
    let admin = new_user(&pool, "Admin R6", "admin").await;
    let contractor = new_user(&pool, "Contractor R6", "contractor").await;
    let project = running_project(&pool, "Requests F", admin, contractor).await;

    let request = ProjectRequestRepo::create(&pool, &completion(project, contractor))
        .await
        .unwrap();

    // Simulate drift while the request was pending.
    ProjectRepo::set_status(&pool, project, "on_hold").await.unwrap();

    let (rejected, mutated) = ProjectRequestRepo::reject(&pool, request.id, admin)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rejected.status, "rejected");
    assert_eq!(mutated.status, "in_progress");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_extension_leaves_project_unchanged(pool: PgPool) {
    let admin = new_user(&pool, "Admin R7", "admin").await;
    let contractor = new_user(&pool, "Contractor R7", "contractor").await;
    let project = running_project(&pool, "Requests G", admin, contractor).await;

    let request = ProjectRequestRepo::create(&pool, &extension(project, contractor, 31))
        .await
        .unwrap();
    let (rejected, mutated) = ProjectRequestRepo::reject(&pool, request.id, admin)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(rejected.status, "rejected");
    assert_eq!(mutated.status, "in_progress");
    assert_eq!(mutated.end_date, Some(day(30)), "end date must not move");
}

// ---------------------------------------------------------------------------
// Cancel
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancel_only_by_requester_and_only_pending(pool: PgPool) {
    let admin = new_user(&pool, "Admin R8", "admin").await;
    let contractor = new_user(&pool, "Contractor R8", "contractor").await;
    let other = new_user(&pool, "Contractor R8b", "contractor").await;
    let project = running_project(&pool, "Requests H", admin, contractor).await;

    let request = ProjectRequestRepo::create(&pool, &completion(project, contractor))
        .await
        .unwrap();

    // Someone else cannot cancel.
    assert!(!ProjectRequestRepo::cancel(&pool, request.id, other).await.unwrap());
    // The requester can.
    assert!(ProjectRequestRepo::cancel(&pool, request.id, contractor).await.unwrap());
    // The row is gone.
    assert!(ProjectRequestRepo::find_by_id(&pool, request.id)
        .await
        .unwrap()
        .is_none());

    // Resolved requests cannot be cancelled.
    let request = ProjectRequestRepo::create(&pool, &completion(project, contractor))
        .await
        .unwrap();
    ProjectRequestRepo::approve(&pool, request.id, admin, None)
        .await
        .unwrap()
        .unwrap();
    assert!(!ProjectRequestRepo::cancel(&pool, request.id, contractor).await.unwrap());
}
