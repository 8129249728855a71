//! HTTP-level integration tests for the project report grid.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, patch_json_auth, post_json_auth};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Site {
    admin_token: String,
    contractor_token: String,
    worker_token: String,
    contractor_id: i64,
    worker_id: i64,
    project_id: i64,
}

async fn running_site(pool: &PgPool, tag: &str) -> Site {
    let admin = common::create_test_user(pool, &format!("Admin {tag}"), "admin").await;
    let contractor =
        common::create_test_user(pool, &format!("Contractor {tag}"), "contractor").await;
    let worker = common::create_test_user(pool, &format!("Worker {tag}"), "member").await;
    let admin_token = common::login(pool, &admin.email).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/projects",
        &admin_token,
        serde_json::json!({
            "name": format!("Site {tag}"),
            "start_date": "2026-07-01",
            "end_date": "2026-07-31",
        }),
    )
    .await;
    let project_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/v1/projects/{project_id}/assign"),
        &admin_token,
        serde_json::json!({ "contractor_id": contractor.id }),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/projects/{project_id}/teams"),
        &admin_token,
        serde_json::json!({ "contractor_id": contractor.id, "name": "Crew" }),
    )
    .await;
    let team_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/v1/teams/{team_id}/members"),
        &admin_token,
        serde_json::json!({ "user_id": worker.id }),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    patch_json_auth(
        app,
        &format!("/api/v1/projects/{project_id}/status"),
        &admin_token,
        serde_json::json!({ "status": "in_progress" }),
    )
    .await;

    Site {
        admin_token,
        contractor_token: common::login(pool, &contractor.email).await,
        worker_token: common::login(pool, &worker.email).await,
        contractor_id: contractor.id,
        worker_id: worker.id,
        project_id,
    }
}

async fn post_update(pool: &PgPool, token: &str, project_id: i64, update_type: &str, date: &str) {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/updates",
        token,
        serde_json::json!({
            "project_id": project_id,
            "update_type": update_type,
            "update_date": date,
            "documents": [{
                "file_name": "photo.jpg",
                "url": "https://files.site.test/photo.jpg",
                "content_type": "image/jpeg",
            }],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// The grid covers every day of the range and every known member, with
/// empty slots left null.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_report_grid_shape_and_slots(pool: PgPool) {
    let site = running_site(&pool, "Grid").await;

    post_update(&pool, &site.worker_token, site.project_id, "morning", "2026-07-06").await;
    post_update(&pool, &site.worker_token, site.project_id, "evening", "2026-07-06").await;
    post_update(&pool, &site.contractor_token, site.project_id, "morning", "2026-07-07").await;

    let uri = format!(
        "/api/v1/reports/projects/{}?start_date=2026-07-06&end_date=2026-07-08",
        site.project_id
    );
    let app = common::build_test_app(pool);
    let response = get_auth(app, &uri, &site.admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let report = &json["data"];

    // Members: worker (team) and contractor (assignment).
    let member_ids: Vec<i64> = report["member_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();
    assert!(member_ids.contains(&site.worker_id));
    assert!(member_ids.contains(&site.contractor_id));

    let days = report["days"].as_array().unwrap();
    assert_eq!(days.len(), 3, "inclusive range of three days");

    // Day one: the worker's pair is filled, the contractor's slot is empty.
    let day_one = &days[0];
    assert_eq!(day_one["day"], "2026-07-06");
    let slots = day_one["slots"].as_array().unwrap();
    assert_eq!(slots.len(), member_ids.len());
    let worker_slot = slots
        .iter()
        .find(|s| s["user_id"] == site.worker_id)
        .unwrap();
    assert!(worker_slot["morning_update_id"].is_i64());
    assert!(worker_slot["evening_update_id"].is_i64());
    let contractor_slot = slots
        .iter()
        .find(|s| s["user_id"] == site.contractor_id)
        .unwrap();
    assert!(contractor_slot["morning_update_id"].is_null());
    assert!(contractor_slot["evening_update_id"].is_null());

    // Day three: untouched, every slot null.
    let day_three = &days[2];
    assert_eq!(day_three["day"], "2026-07-08");
    for slot in day_three["slots"].as_array().unwrap() {
        assert!(slot["morning_update_id"].is_null());
        assert!(slot["evening_update_id"].is_null());
    }
}

/// Range validation: inverted ranges and ranges outside the project's
/// bounded dates fail.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_report_range_validation(pool: PgPool) {
    let site = running_site(&pool, "Range").await;

    for bad in [
        "start_date=2026-07-10&end_date=2026-07-05", // inverted
        "start_date=2026-06-25&end_date=2026-07-05", // before project start
        "start_date=2026-07-25&end_date=2026-08-05", // past project end
    ] {
        let uri = format!("/api/v1/reports/projects/{}?{bad}", site.project_id);
        let app = common::build_test_app(pool.clone());
        let response = get_auth(app, &uri, &site.admin_token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{bad} must fail");
    }
}

/// Reports are for admin and accounts only.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_report_role_gating(pool: PgPool) {
    let site = running_site(&pool, "Roles").await;
    let accounts = common::create_test_user(&pool, "Accounts Roles", "accounts").await;
    let accounts_token = common::login(&pool, &accounts.email).await;

    let uri = format!(
        "/api/v1/reports/projects/{}?start_date=2026-07-01&end_date=2026-07-03",
        site.project_id
    );

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &uri, &accounts_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    for token in [&site.contractor_token, &site.worker_token] {
        let app = common::build_test_app(pool.clone());
        let response = get_auth(app, &uri, token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

/// Reporting on a missing project is a plain 404.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_report_missing_project(pool: PgPool) {
    let admin = common::create_test_user(&pool, "Admin Missing", "admin").await;
    let token = common::login(&pool, &admin.email).await;

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/v1/reports/projects/999999?start_date=2026-07-01&end_date=2026-07-02",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
