//! Integration tests for daily updates and attendance derivation.
//!
//! Covers the composite uniqueness on half-day updates (exactly one winner)
//! and the idempotent attendance upsert.

use chrono::NaiveDate;
use sitelog_core::visibility::AccessScope;
use sitelog_db::models::project::CreateProject;
use sitelog_db::models::update::{CreateDocument, CreateUpdate};
use sitelog_db::models::user::CreateUser;
use sitelog_db::repositories::{AttendanceRepo, ProjectRepo, RoleRepo, UpdateRepo, UserRepo};
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

async fn new_project(pool: &PgPool, name: &str, admin_id: i64) -> i64 {
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: name.to_string(),
            description: None,
            admin_id,
            start_date: None,
            end_date: None,
            budget: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
}

fn new_update(project_id: i64, posted_by: i64, update_type: &str, d: u32) -> CreateUpdate {
    CreateUpdate {
        project_id,
        contractor_id: None,
        posted_by,
        update_type: update_type.to_string(),
        update_date: day(d),
        status_note: "rebar inspection done".to_string(),
        documents: vec![CreateDocument {
            file_name: "site.jpg".to_string(),
            url: "https://files.site.test/site.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            size_bytes: Some(120_000),
        }],
    }
}

// ---------------------------------------------------------------------------
// Update uniqueness
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_update_with_documents(pool: PgPool) {
    let admin = new_user(&pool, "Admin U", "admin").await;
    let worker = new_user(&pool, "Worker U", "member").await;
    let project = new_project(&pool, "Updates A", admin).await;

    let created = UpdateRepo::create(&pool, &new_update(project, worker, "morning", 1))
        .await
        .unwrap();
    assert_eq!(created.update.update_type, "morning");
    assert_eq!(created.documents.len(), 1);
    assert_eq!(created.documents[0].position, 0);

    let found = UpdateRepo::find_by_id(&pool, created.update.id)
        .await
        .unwrap()
        .expect("update should be findable");
    assert_eq!(found.documents.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_half_day_update_rejected(pool: PgPool) {
    let admin = new_user(&pool, "Admin Dup", "admin").await;
    let worker = new_user(&pool, "Worker Dup", "member").await;
    let project = new_project(&pool, "Updates B", admin).await;

    UpdateRepo::create(&pool, &new_update(project, worker, "morning", 1))
        .await
        .unwrap();
    let result = UpdateRepo::create(&pool, &new_update(project, worker, "morning", 1)).await;
    assert!(
        result.is_err(),
        "second morning update for the same day must lose on uq_site_updates_daily"
    );

    // The losing attempt wrote nothing: only one update row exists.
    let updates = UpdateRepo::list(&pool, &AccessScope::Unrestricted, Some(project), None, None, None)
        .await
        .unwrap();
    assert_eq!(updates.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_other_half_and_other_day_allowed(pool: PgPool) {
    let admin = new_user(&pool, "Admin Halves", "admin").await;
    let worker = new_user(&pool, "Worker Halves", "member").await;
    let project = new_project(&pool, "Updates C", admin).await;

    UpdateRepo::create(&pool, &new_update(project, worker, "morning", 1))
        .await
        .unwrap();
    UpdateRepo::create(&pool, &new_update(project, worker, "evening", 1))
        .await
        .unwrap();
    UpdateRepo::create(&pool, &new_update(project, worker, "morning", 2))
        .await
        .unwrap();

    let updates = UpdateRepo::list(&pool, &AccessScope::Unrestricted, Some(project), None, None, None)
        .await
        .unwrap();
    assert_eq!(updates.len(), 3);

    let day_one = UpdateRepo::list(
        &pool,
        &AccessScope::Unrestricted,
        Some(project),
        Some(day(1)),
        None,
        None,
    )
    .await
    .unwrap();
    assert_eq!(day_one.len(), 2);
}

// ---------------------------------------------------------------------------
// Attendance derivation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attendance_derived_from_update_pair(pool: PgPool) {
    let admin = new_user(&pool, "Admin Att", "admin").await;
    let worker = new_user(&pool, "Worker Att", "member").await;
    let project = new_project(&pool, "Attendance A", admin).await;

    let morning = UpdateRepo::create(&pool, &new_update(project, worker, "morning", 3))
        .await
        .unwrap();

    let row = AttendanceRepo::find_for_day(&pool, worker, project, day(3))
        .await
        .unwrap()
        .expect("attendance row must exist after first update");
    assert_eq!(row.morning_update_id, Some(morning.update.id));
    assert_eq!(row.evening_update_id, None);
    assert!(!row.is_present, "half a day is not presence");

    let evening = UpdateRepo::create(&pool, &new_update(project, worker, "evening", 3))
        .await
        .unwrap();

    let row = AttendanceRepo::find_for_day(&pool, worker, project, day(3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.morning_update_id, Some(morning.update.id));
    assert_eq!(row.evening_update_id, Some(evening.update.id));
    assert!(row.is_present);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attendance_derivation_is_idempotent(pool: PgPool) {
    let admin = new_user(&pool, "Admin Idem", "admin").await;
    let worker = new_user(&pool, "Worker Idem", "member").await;
    let project = new_project(&pool, "Attendance B", admin).await;

    let morning = UpdateRepo::create(&pool, &new_update(project, worker, "morning", 4))
        .await
        .unwrap();
    let first = AttendanceRepo::find_for_day(&pool, worker, project, day(4))
        .await
        .unwrap()
        .unwrap();

    // Re-deriving the same update must not change the record.
    let replayed = AttendanceRepo::record_half_day(
        &pool,
        worker,
        project,
        day(4),
        "morning",
        morning.update.id,
    )
    .await
    .unwrap();
    assert_eq!(replayed.morning_update_id, first.morning_update_id);
    assert_eq!(replayed.evening_update_id, None);
    assert!(!replayed.is_present);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attendance_never_overwrites_a_set_half(pool: PgPool) {
    let admin = new_user(&pool, "Admin Keep", "admin").await;
    let worker = new_user(&pool, "Worker Keep", "member").await;
    let project = new_project(&pool, "Attendance C", admin).await;

    let morning = UpdateRepo::create(&pool, &new_update(project, worker, "morning", 5))
        .await
        .unwrap();
    let other_day = UpdateRepo::create(&pool, &new_update(project, worker, "morning", 6))
        .await
        .unwrap();

    // A stray re-derivation pointing a different update at the same half
    // keeps the original id.
    let row = AttendanceRepo::record_half_day(
        &pool,
        worker,
        project,
        day(5),
        "morning",
        other_day.update.id,
    )
    .await
    .unwrap();
    assert_eq!(row.morning_update_id, Some(morning.update.id));
    assert_eq!(row.evening_update_id, None);
    assert!(!row.is_present);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attendance_rows_are_per_user_and_day(pool: PgPool) {
    let admin = new_user(&pool, "Admin Grid", "admin").await;
    let worker_a = new_user(&pool, "Worker GA", "member").await;
    let worker_b = new_user(&pool, "Worker GB", "member").await;
    let project = new_project(&pool, "Attendance D", admin).await;

    UpdateRepo::create(&pool, &new_update(project, worker_a, "morning", 6))
        .await
        .unwrap();
    UpdateRepo::create(&pool, &new_update(project, worker_b, "morning", 6))
        .await
        .unwrap();
    UpdateRepo::create(&pool, &new_update(project, worker_a, "evening", 7))
        .await
        .unwrap();

    let rows = AttendanceRepo::list(
        &pool,
        &AccessScope::Unrestricted,
        None,
        Some(project),
        Some(day(6)),
        Some(day(7)),
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 3);

    let worker_a_rows = AttendanceRepo::list(
        &pool,
        &AccessScope::Unrestricted,
        Some(worker_a),
        Some(project),
        None,
        None,
    )
    .await
    .unwrap();
    assert_eq!(worker_a_rows.len(), 2);
    assert!(worker_a_rows.iter().all(|r| !r.is_present));
}
