/// Integration tests for the Rentora API
///
/// These tests verify the full system works end-to-end against a real
/// database:
/// - Registration and login flows
/// - The route guard (login redirect, denial bodies, landing pages)
/// - Role assignment keeping the two role stores in step
/// - Listing, application, and messaging lifecycles
/// - Admin moderation

mod common;

use axum::http::StatusCode;
use common::TestContext;
use rentora_shared::models::role::{Role, UserRole};
use rentora_shared::roles::resolver::RoleSet;
use serde_json::json;

/// Requests without a session are pointed at the login entry point
#[tokio::test]
async fn test_unauthenticated_request_redirects_to_login() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = common::request(&ctx.app, "GET", "/v1/profile", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "authentication_required");
    assert_eq!(body["login"], "/login");
}

/// An invalid token is treated as no session, not as an error page
#[tokio::test]
async fn test_garbage_token_is_unauthenticated() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = common::request(
        &ctx.app,
        "GET",
        "/v1/profile",
        Some("Bearer not-a-token"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "authentication_required");
}

/// Scenario A: a stale admin value on the profile must not open admin routes
///
/// The account has an empty authoritative role set; a planted
/// profiles.role = 'admin' must be invisible to the guard.
#[tokio::test]
async fn test_stale_profile_role_never_authorizes() {
    let ctx = TestContext::new().await.unwrap();

    let account = common::create_account(&ctx.db, &ctx.config, None).await.unwrap();
    sqlx::query("UPDATE profiles SET role = 'admin' WHERE user_id = $1")
        .bind(account.user.id)
        .execute(&ctx.db)
        .await
        .unwrap();

    let (status, body) = common::request(
        &ctx.app,
        "GET",
        "/v1/admin/users?role=landlord",
        Some(&account.auth_header()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "access_denied");
    assert_eq!(body["required_roles"], json!(["admin"]));
    assert!(body["current_role"].is_null());
    assert_eq!(body["redirect_to"], "/");
}

/// Denials name the required roles and point at the caller's landing page
#[tokio::test]
async fn test_denial_body_names_roles_and_landing() {
    let ctx = TestContext::new().await.unwrap();

    // A renter hitting a landlord route
    let (status, body) = common::request(
        &ctx.app,
        "POST",
        "/v1/properties",
        Some(&ctx.renter.auth_header()),
        Some(json!({
            "title": "Denied anyway",
            "address": "1 Test St",
            "city": "Portland",
            "rent_cents": 100_000,
            "bedrooms": 1,
            "bathrooms": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["required_roles"], json!(["landlord"]));
    assert_eq!(body["current_role"], "renter");
    assert_eq!(body["redirect_to"], "/");

    // A landlord hitting an admin route lands on the landlord home
    let (status, body) = common::request(
        &ctx.app,
        "GET",
        "/v1/admin/users?role=renter",
        Some(&ctx.landlord.auth_header()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["redirect_to"], "/landlord");
}

/// Registration + login round trip, including the landing page selection
#[tokio::test]
async fn test_register_and_login_flow() {
    let ctx = TestContext::new().await.unwrap();

    let email = format!("flow-{}@example.com", uuid::Uuid::new_v4());
    let (status, body) = common::request(
        &ctx.app,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "Sup3r$ecret!",
            "full_name": "Flow Tester",
            "role": "landlord"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "register failed: {}", body);
    assert_eq!(body["role"], "landlord");
    assert!(body["access_token"].is_string());

    let (status, body) = common::request(
        &ctx.app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": "Sup3r$ecret!" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    assert_eq!(body["primary_role"], "landlord");
    assert_eq!(body["landing"], "/landlord");

    // The fresh access token opens an authenticated route
    let token = body["access_token"].as_str().unwrap().to_string();
    let (status, _) = common::request(
        &ctx.app,
        "GET",
        "/v1/profile",
        Some(&format!("Bearer {}", token)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

/// The admin role can never be requested at signup
#[tokio::test]
async fn test_register_rejects_admin_role() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = common::request(
        &ctx.app,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({
            "email": format!("admin-{}@example.com", uuid::Uuid::new_v4()),
            "password": "Sup3r$ecret!",
            "role": "admin"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}

/// Scenario B: admin promotes a renter to landlord
///
/// The advisory transition table says renter -> landlord is not
/// self-service, so the response flags the override, but the assignment
/// happens and both stores agree.
#[tokio::test]
async fn test_admin_promotes_renter_to_landlord() {
    let ctx = TestContext::new().await.unwrap();

    let account = common::create_account(&ctx.db, &ctx.config, Some(Role::Renter))
        .await
        .unwrap();

    let (status, body) = common::request(
        &ctx.app,
        "POST",
        &format!("/v1/admin/users/{}/role", account.user.id),
        Some(&ctx.admin.auth_header()),
        Some(json!({ "role": "landlord" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "assignment failed: {}", body);
    assert_eq!(body["role"], "landlord");
    assert_eq!(body["transition_allowed"], false);

    let roles = RoleSet::load(&ctx.db, account.user.id).await.unwrap();
    assert!(roles.has_role(Role::Landlord));
    assert!(!roles.has_role(Role::Renter));

    // The promoted account can now use landlord routes
    let (status, _) = common::request(
        &ctx.app,
        "POST",
        "/v1/properties",
        Some(&account.auth_header()),
        Some(json!({
            "title": "Post-promotion listing",
            "address": "2 Test St",
            "city": "Portland",
            "rent_cents": 150_000,
            "bedrooms": 2,
            "bathrooms": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

/// Idempotence: repeating an assignment leaves exactly one role row
#[tokio::test]
async fn test_role_assignment_is_idempotent_via_api() {
    let ctx = TestContext::new().await.unwrap();

    let account = common::create_account(&ctx.db, &ctx.config, Some(Role::Renter))
        .await
        .unwrap();

    for _ in 0..2 {
        let (status, _) = common::request(
            &ctx.app,
            "POST",
            &format!("/v1/admin/users/{}/role", account.user.id),
            Some(&ctx.admin.auth_header()),
            Some(json!({ "role": "renter" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let count = UserRole::count_for_user(&ctx.db, account.user.id).await.unwrap();
    assert_eq!(count, 1);
}

/// Assignment against a user with no profile reports failure cleanly
#[tokio::test]
async fn test_role_assignment_unknown_user_fails() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = common::request(
        &ctx.app,
        "POST",
        &format!("/v1/admin/users/{}/role", uuid::Uuid::new_v4()),
        Some(&ctx.admin.auth_header()),
        Some(json!({ "role": "renter" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND, "unexpected: {}", body);
}

/// Browse filters and the listed-only rule
#[tokio::test]
async fn test_property_browse_filters() {
    let ctx = TestContext::new().await.unwrap();

    let city = format!("Browse-{}", uuid::Uuid::new_v4());

    let (status, cheap) = common::request(
        &ctx.app,
        "POST",
        "/v1/properties",
        Some(&ctx.landlord.auth_header()),
        Some(json!({
            "title": "Cheap two-bed",
            "address": "3 Test St",
            "city": city,
            "rent_cents": 120_000,
            "bedrooms": 2,
            "bathrooms": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _expensive) = common::request(
        &ctx.app,
        "POST",
        "/v1/properties",
        Some(&ctx.landlord.auth_header()),
        Some(json!({
            "title": "Expensive loft",
            "address": "4 Test St",
            "city": city,
            "rent_cents": 500_000,
            "bedrooms": 1,
            "bathrooms": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Budget filter within the city returns only the cheap listing
    let (status, body) = common::request(
        &ctx.app,
        "GET",
        &format!("/v1/properties?city={}&max_rent_cents=200000", city),
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], cheap["id"]);

    // Unlisting hides it from browse
    let (status, _) = common::request(
        &ctx.app,
        "POST",
        &format!("/v1/properties/{}/unlist", cheap["id"].as_str().unwrap()),
        Some(&ctx.landlord.auth_header()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = common::request(
        &ctx.app,
        "GET",
        &format!("/v1/properties?city={}&max_rent_cents=200000", city),
        None,
        None,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

/// Application lifecycle: apply, duplicate rejection, landlord decision
#[tokio::test]
async fn test_application_lifecycle() {
    let ctx = TestContext::new().await.unwrap();

    let (_, property) = common::request(
        &ctx.app,
        "POST",
        "/v1/properties",
        Some(&ctx.landlord.auth_header()),
        Some(json!({
            "title": "Application target",
            "address": "5 Test St",
            "city": "Portland",
            "rent_cents": 180_000,
            "bedrooms": 2,
            "bathrooms": 1
        })),
    )
    .await;
    let property_id = property["id"].as_str().unwrap().to_string();

    let (status, application) = common::request(
        &ctx.app,
        "POST",
        &format!("/v1/properties/{}/applications", property_id),
        Some(&ctx.renter.auth_header()),
        Some(json!({ "cover_message": "We'd love to rent this." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "apply failed: {}", application);
    assert_eq!(application["status"], "pending");

    // A second live application for the same property is a conflict
    let (status, _) = common::request(
        &ctx.app,
        "POST",
        &format!("/v1/properties/{}/applications", property_id),
        Some(&ctx.renter.auth_header()),
        Some(json!({ "cover_message": "Asking again." })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The landlord sees it and approves
    let (status, list) = common::request(
        &ctx.app,
        "GET",
        "/v1/applications",
        Some(&ctx.landlord.auth_header()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let app_id = application["id"].as_str().unwrap();
    assert!(list
        .as_array()
        .unwrap()
        .iter()
        .any(|a| a["id"] == application["id"]));

    let (status, decided) = common::request(
        &ctx.app,
        "POST",
        &format!("/v1/applications/{}/decide", app_id),
        Some(&ctx.landlord.auth_header()),
        Some(json!({ "decision": "approve" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decided["status"], "approved");

    // Deciding twice is a conflict
    let (status, _) = common::request(
        &ctx.app,
        "POST",
        &format!("/v1/applications/{}/decide", app_id),
        Some(&ctx.landlord.auth_header()),
        Some(json!({ "decision": "decline" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

/// Only the applying renter may withdraw, and only while the application is live
#[tokio::test]
async fn test_application_withdrawal() {
    let ctx = TestContext::new().await.unwrap();

    let (_, property) = common::request(
        &ctx.app,
        "POST",
        "/v1/properties",
        Some(&ctx.landlord.auth_header()),
        Some(json!({
            "title": "Withdrawal target",
            "address": "6 Test St",
            "city": "Portland",
            "rent_cents": 140_000,
            "bedrooms": 1,
            "bathrooms": 1
        })),
    )
    .await;

    let (_, application) = common::request(
        &ctx.app,
        "POST",
        &format!(
            "/v1/properties/{}/applications",
            property["id"].as_str().unwrap()
        ),
        Some(&ctx.renter.auth_header()),
        Some(json!({})),
    )
    .await;
    let app_id = application["id"].as_str().unwrap().to_string();

    // Another renter cannot withdraw it
    let other = common::create_account(&ctx.db, &ctx.config, Some(Role::Renter))
        .await
        .unwrap();
    let (status, _) = common::request(
        &ctx.app,
        "POST",
        &format!("/v1/applications/{}/withdraw", app_id),
        Some(&other.auth_header()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, withdrawn) = common::request(
        &ctx.app,
        "POST",
        &format!("/v1/applications/{}/withdraw", app_id),
        Some(&ctx.renter.auth_header()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(withdrawn["status"], "withdrawn");

    // Withdrawing a settled application is a conflict
    let (status, _) = common::request(
        &ctx.app,
        "POST",
        &format!("/v1/applications/{}/withdraw", app_id),
        Some(&ctx.renter.auth_header()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

/// Messaging: conversation flow and recipient-only read marking
#[tokio::test]
async fn test_message_flow() {
    let ctx = TestContext::new().await.unwrap();

    let (status, message) = common::request(
        &ctx.app,
        "POST",
        "/v1/messages",
        Some(&ctx.renter.auth_header()),
        Some(json!({
            "recipient_id": ctx.landlord.user.id,
            "body": "Is the flat still available?"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "send failed: {}", message);
    assert!(message["read_at"].is_null());

    let (status, conversation) = common::request(
        &ctx.app,
        "GET",
        &format!("/v1/messages/with/{}", ctx.renter.user.id),
        Some(&ctx.landlord.auth_header()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(conversation
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m["id"] == message["id"]));

    // The sender cannot mark it read
    let message_id = message["id"].as_str().unwrap();
    let (status, _) = common::request(
        &ctx.app,
        "POST",
        &format!("/v1/messages/{}/read", message_id),
        Some(&ctx.renter.auth_header()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The recipient can
    let (status, read) = common::request(
        &ctx.app,
        "POST",
        &format!("/v1/messages/{}/read", message_id),
        Some(&ctx.landlord.auth_header()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!read["read_at"].is_null());
}

/// Moderation: suspension blocks login, reinstatement restores it,
/// admin unlisting hides the property
#[tokio::test]
async fn test_admin_moderation() {
    let ctx = TestContext::new().await.unwrap();

    // Register a real credentialed user so login can be exercised
    let email = format!("moderated-{}@example.com", uuid::Uuid::new_v4());
    let (status, registered) = common::request(
        &ctx.app,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "Sup3r$ecret!",
            "role": "renter"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let user_id = registered["user_id"].as_str().unwrap().to_string();

    let (status, profile) = common::request(
        &ctx.app,
        "POST",
        &format!("/v1/admin/users/{}/suspend", user_id),
        Some(&ctx.admin.auth_header()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["status"], "suspended");

    let (status, _) = common::request(
        &ctx.app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": "Sup3r$ecret!" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = common::request(
        &ctx.app,
        "POST",
        &format!("/v1/admin/users/{}/reinstate", user_id),
        Some(&ctx.admin.auth_header()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::request(
        &ctx.app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": "Sup3r$ecret!" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Admin unlists someone else's property
    let (_, property) = common::request(
        &ctx.app,
        "POST",
        "/v1/properties",
        Some(&ctx.landlord.auth_header()),
        Some(json!({
            "title": "To be moderated",
            "address": "7 Test St",
            "city": "Portland",
            "rent_cents": 160_000,
            "bedrooms": 1,
            "bathrooms": 1
        })),
    )
    .await;
    let property_id = property["id"].as_str().unwrap();

    let (status, unlisted) = common::request(
        &ctx.app,
        "POST",
        &format!("/v1/admin/properties/{}/unlist", property_id),
        Some(&ctx.admin.auth_header()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unlisted["status"], "unlisted");

    let (status, _) = common::request(
        &ctx.app,
        "GET",
        &format!("/v1/properties/{}", property_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Admin users listing joins the role table to identity and profile records
#[tokio::test]
async fn test_admin_lists_users_by_role() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = common::request(
        &ctx.app,
        "GET",
        "/v1/admin/users?role=landlord",
        Some(&ctx.admin.auth_header()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let members = body.as_array().unwrap();
    assert!(members
        .iter()
        .any(|m| m["user_id"] == json!(ctx.landlord.user.id)));
    assert!(members.iter().all(|m| m["email"].is_string()));
}
