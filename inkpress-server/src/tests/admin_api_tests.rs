use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use super::test_utils::{send, sign_up_user, test_app};
use inkpress_core::database::ports::UsersRepository;
use inkpress_model::UserRole;

#[tokio::test]
async fn roster_is_admin_only() {
    let (router, _) = test_app();
    let (token, _) = sign_up_user(&router, "Ana", "ana@x.com").await;

    let (status, _) =
        send(&router, "GET", "/api/admin/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&router, "GET", "/api/admin/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn roster_lists_filters_and_paginates() {
    let (router, state) = test_app();
    let (admin_token, admin_id) = sign_up_user(&router, "Root", "root@x.com").await;
    state.users.set_role(admin_id, UserRole::Admin).await.unwrap();
    sign_up_user(&router, "Ana", "ana@x.com").await;
    sign_up_user(&router, "Ben", "ben@x.com").await;

    let (status, body) =
        send(&router, "GET", "/api/admin/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["users"].as_array().expect("users").len(), 3);

    let (_, body) = send(
        &router,
        "GET",
        "/api/admin/users?q=ana",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["users"][0]["email"], "ana@x.com");

    let (_, body) = send(
        &router,
        "GET",
        "/api/admin/users?page=2&per_page=2",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["users"].as_array().expect("users").len(), 1);
}

#[tokio::test]
async fn roster_tolerates_out_of_range_pages() {
    let (router, state) = test_app();
    let (admin_token, admin_id) = sign_up_user(&router, "Root", "root@x.com").await;
    state.users.set_role(admin_id, UserRole::Admin).await.unwrap();
    sign_up_user(&router, "Ana", "ana@x.com").await;

    // A page offset near usize::MAX must not overflow, just come back empty.
    let (status, body) = send(
        &router,
        "GET",
        "/api/admin/users?page=100000000000000000&per_page=200",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert!(body["users"].as_array().expect("users").is_empty());

    // page=0 is treated as the first page.
    let (status, body) = send(
        &router,
        "GET",
        "/api/admin/users?page=0",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().expect("users").len(), 2);
}

#[tokio::test]
async fn bulk_ban_reports_per_target_outcomes() {
    let (router, state) = test_app();
    let (admin_token, admin_id) = sign_up_user(&router, "Root", "root@x.com").await;
    state.users.set_role(admin_id, UserRole::Admin).await.unwrap();
    let (_, ana_id) = sign_up_user(&router, "Ana", "ana@x.com").await;
    let missing = Uuid::now_v7();

    let (status, body) = send(
        &router,
        "POST",
        "/api/admin/users/bulk",
        Some(&admin_token),
        Some(json!({
            "action": "ban",
            "reason": "spam",
            "targets": [ana_id, missing, admin_id],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcomes"][ana_id.to_string()], "applied");
    assert_eq!(body["outcomes"][missing.to_string()], "not_found");
    assert_eq!(body["outcomes"][admin_id.to_string()], "forbidden");
    assert_eq!(body["applied"], 1);
    assert_eq!(body["failed"], 2);
}

#[tokio::test]
async fn banned_user_loses_all_access() {
    let (router, state) = test_app();
    let (admin_token, admin_id) = sign_up_user(&router, "Root", "root@x.com").await;
    state.users.set_role(admin_id, UserRole::Admin).await.unwrap();
    let (ana_token, ana_id) = sign_up_user(&router, "Ana", "ana@x.com").await;

    send(
        &router,
        "POST",
        "/api/admin/users/bulk",
        Some(&admin_token),
        Some(json!({ "action": "ban", "targets": [ana_id] })),
    )
    .await;

    // The live session dies with the ban.
    let (status, _) =
        send(&router, "GET", "/api/auth/session", Some(&ana_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // So does a fresh password sign-in.
    let (status, _) = send(
        &router,
        "POST",
        "/api/auth/sign-in",
        None,
        Some(json!({ "email": "ana@x.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bulk_requires_admin() {
    let (router, _) = test_app();
    let (token, _) = sign_up_user(&router, "Ana", "ana@x.com").await;
    let (_, ben_id) = sign_up_user(&router, "Ben", "ben@x.com").await;

    let (status, _) = send(
        &router,
        "POST",
        "/api/admin/users/bulk",
        Some(&token),
        Some(json!({ "action": "makeAdmin", "targets": [ben_id] })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn role_cycle_via_bulk() {
    let (router, state) = test_app();
    let (admin_token, admin_id) = sign_up_user(&router, "Root", "root@x.com").await;
    state.users.set_role(admin_id, UserRole::Admin).await.unwrap();
    let (_, ana_id) = sign_up_user(&router, "Ana", "ana@x.com").await;

    send(
        &router,
        "POST",
        "/api/admin/users/bulk",
        Some(&admin_token),
        Some(json!({ "action": "makeAdmin", "targets": [ana_id] })),
    )
    .await;
    let promoted = state.users.get_user_by_id(ana_id).await.unwrap().unwrap();
    assert_eq!(promoted.role, UserRole::Admin);

    send(
        &router,
        "POST",
        "/api/admin/users/bulk",
        Some(&admin_token),
        Some(json!({ "action": "makeUser", "targets": [ana_id] })),
    )
    .await;
    let demoted = state.users.get_user_by_id(ana_id).await.unwrap().unwrap();
    assert_eq!(demoted.role, UserRole::Visitor);
}
