//! API Integration Tests
//!
//! Every test starts its own server on the in-memory backend with the demo
//! accounts seeded. The PostgreSQL smoke test additionally requires
//! `DATABASE_URL`.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    account_body, assert_error, assert_json, assert_status, fixtures::*, memory_config,
    postgres_config, sign_up_body, unique_username, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/Accounts/Me").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_sign_up_and_sign_in() {
    let server = TestServer::start().await.unwrap();
    let username = unique_username("ada");

    let response = server
        .post(
            "/api/Authentication/SignUp",
            &sign_up_body("Ada", "Lovelace", &username, "engine"),
        )
        .await
        .unwrap();
    let message: Message = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(message.message, "Account created");

    let credentials = server.sign_in(&username, "engine").await.unwrap();
    assert!(!credentials.access_token.is_empty());
    assert!(!credentials.refresh_token.is_empty());
}

#[tokio::test]
async fn test_sign_up_duplicate_username() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post(
            "/api/Authentication/SignUp",
            &sign_up_body("Other", "Admin", ADMIN.0, "whatever"),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::CONFLICT, "USERNAME_EXISTS")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_sign_up_validation() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post(
            "/api/Authentication/SignUp",
            &sign_up_body("Ada", "Lovelace", "", "engine"),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        .await
        .unwrap();

    let response = server
        .post("/api/Authentication/SignUp", &json!({ "username": "ada" }))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_BODY")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_sign_in_wrong_password() {
    let server = TestServer::start().await.unwrap();

    for (username, password) in [(USER.0, "not-the-password"), ("ghost", "boo")] {
        let response = server
            .post(
                "/api/Authentication/SignIn",
                &sign_in_body(username, password),
            )
            .await
            .unwrap();
        assert_error(response, StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILED")
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_sign_in_issues_distinct_pairs() {
    let server = TestServer::start().await.unwrap();

    let first = server.sign_in(USER.0, USER.1).await.unwrap();
    let second = server.sign_in(USER.0, USER.1).await.unwrap();

    assert_ne!(first.access_token, second.access_token);
    assert_ne!(first.refresh_token, second.refresh_token);
}

#[tokio::test]
async fn test_validate() {
    let server = TestServer::start().await.unwrap();
    let token = server.access_token(DOCTOR.0, DOCTOR.1).await.unwrap();

    let response = server
        .get(&format!("/api/Authentication/Validate?accessToken={token}"))
        .await
        .unwrap();
    let payload: Payload = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(payload.roles, ["DOCTOR"]);

    let me: Account = assert_json(
        server.get_auth("/api/Accounts/Me", &token).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(payload.user_id, me.id);

    let response = server
        .get("/api/Authentication/Validate?accessToken=not.a.token")
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_refresh_rotation() {
    let server = TestServer::start().await.unwrap();
    let original = server.sign_in(USER.0, USER.1).await.unwrap();

    let response = server
        .post(
            "/api/Authentication/Refresh",
            &json!({ "refreshToken": original.refresh_token }),
        )
        .await
        .unwrap();
    let rotated: Credentials = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(rotated.refresh_token, original.refresh_token);

    // The consumed token is dead
    let response = server
        .post(
            "/api/Authentication/Refresh",
            &json!({ "refreshToken": original.refresh_token }),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_REFRESH_TOKEN")
        .await
        .unwrap();

    // The new one works exactly once
    let body = json!({ "refreshToken": rotated.refresh_token });
    let response = server
        .post("/api/Authentication/Refresh", &body)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .post("/api/Authentication/Refresh", &body)
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_REFRESH_TOKEN")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_sign_out() {
    let server = TestServer::start().await.unwrap();
    let credentials = server.sign_in(USER.0, USER.1).await.unwrap();

    for _ in 0..2 {
        let response = server
            .put_empty(
                "/api/Authentication/SignOut",
                Some(&credentials.access_token),
            )
            .await
            .unwrap();
        assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    }

    let response = server
        .post(
            "/api/Authentication/Refresh",
            &json!({ "refreshToken": credentials.refresh_token }),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_REFRESH_TOKEN")
        .await
        .unwrap();

    let response = server
        .put_empty("/api/Authentication/SignOut", None)
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "NOT_AUTHENTICATED")
        .await
        .unwrap();
}

// ============================================================================
// Account Tests
// ============================================================================

#[tokio::test]
async fn test_me_requires_authentication() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/Accounts/Me").await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "NOT_AUTHENTICATED")
        .await
        .unwrap();

    let response = server
        .get_auth("/api/Accounts/Me", "garbage")
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "NOT_AUTHENTICATED")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_me() {
    let server = TestServer::start().await.unwrap();
    let token = server.access_token(MANAGER.0, MANAGER.1).await.unwrap();

    let response = server
        .put_auth(
            "/api/Accounts/Update",
            &token,
            &json!({ "first_name": "Mia", "last_name": "Rossi", "username": "manager" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let me: Account = assert_json(
        server.get_auth("/api/Accounts/Me", &token).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(me.first_name, "Mia");
    assert_eq!(me.last_name, "Rossi");
    assert_eq!(me.roles, ["MANAGER"]);

    let response = server
        .put_auth(
            "/api/Accounts/Update",
            &token,
            &json!({ "first_name": "Mia", "last_name": "Rossi", "username": "admin" }),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::CONFLICT, "USERNAME_EXISTS")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_all_accounts_requires_admin() {
    let server = TestServer::start().await.unwrap();
    let token = server.access_token(MANAGER.0, MANAGER.1).await.unwrap();

    let response = server.get_auth("/api/Accounts", &token).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "ACCESS_DENIED")
        .await
        .unwrap();

    let admin = server.access_token(ADMIN.0, ADMIN.1).await.unwrap();
    let accounts: Vec<Account> = assert_json(
        server.get_auth("/api/Accounts", &admin).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let names: Vec<_> = accounts.iter().map(|a| a.username.as_str()).collect();
    assert_eq!(names, ["admin", "manager", "doctor", "user"]);

    let page: Vec<Account> = assert_json(
        server
            .get_auth("/api/Accounts?from=1&count=2", &admin)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].username, "manager");
}

#[tokio::test]
async fn test_account_lifecycle() {
    let server = TestServer::start().await.unwrap();
    let admin = server.access_token(ADMIN.0, ADMIN.1).await.unwrap();
    let username = unique_username("house");

    // Create
    let response = server
        .post_auth(
            "/api/Accounts",
            &admin,
            &account_body("Gregory", "House", &username, "vicodin", &["DOCTOR"]),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            "/api/Accounts",
            &admin,
            &account_body("Gregory", "House", &username, "vicodin", &["DOCTOR"]),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::CONFLICT, "USERNAME_EXISTS")
        .await
        .unwrap();

    let token = server.access_token(&username, "vicodin").await.unwrap();
    let me: Account = assert_json(
        server.get_auth("/api/Accounts/Me", &token).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    // Update roles and password
    let response = server
        .put_auth(
            &format!("/api/Accounts/{}", me.id),
            &admin,
            &account_body("Greg", "House", &username, "lupus", &["DOCTOR", "MANAGER"]),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let credentials = server.sign_in(&username, "lupus").await.unwrap();

    // Delete twice
    let path = format!("/api/Accounts/{}", me.id);
    let response = server.delete_auth(&path, &admin).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.delete_auth(&path, &admin).await.unwrap();
    assert_error(response, StatusCode::GONE, "ALREADY_DELETED")
        .await
        .unwrap();

    // A deleted account can neither sign in nor refresh
    let response = server
        .post(
            "/api/Authentication/SignIn",
            &sign_in_body(&username, "lupus"),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILED")
        .await
        .unwrap();

    let response = server
        .post(
            "/api/Authentication/Refresh",
            &json!({ "refreshToken": credentials.refresh_token }),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_REFRESH_TOKEN")
        .await
        .unwrap();

    // Admin still sees it, inactive
    let accounts: Vec<Account> = assert_json(
        server.get_auth("/api/Accounts", &admin).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let deleted = accounts.iter().find(|a| a.id == me.id).unwrap();
    assert!(!deleted.is_active);
}

#[tokio::test]
async fn test_account_not_found_and_bad_id() {
    let server = TestServer::start().await.unwrap();
    let admin = server.access_token(ADMIN.0, ADMIN.1).await.unwrap();

    let response = server
        .delete_auth(&format!("/api/Accounts/{}", Uuid::new_v4()), &admin)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "USER_NOT_FOUND")
        .await
        .unwrap();

    let response = server
        .delete_auth("/api/Accounts/not-a-uuid", &admin)
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_PATH_PARAMETER")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_account_requires_roles() {
    let server = TestServer::start().await.unwrap();
    let admin = server.access_token(ADMIN.0, ADMIN.1).await.unwrap();

    let response = server
        .post_auth(
            "/api/Accounts",
            &admin,
            &account_body("No", "Roles", &unique_username("noroles"), "pw", &[]),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        .await
        .unwrap();

    let response = server
        .post_auth(
            "/api/Accounts",
            &admin,
            &account_body("Bad", "Role", &unique_username("badrole"), "pw", &["ROOT"]),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_BODY")
        .await
        .unwrap();
}

// ============================================================================
// Doctor Directory Tests
// ============================================================================

#[tokio::test]
async fn test_doctor_directory() {
    let server = TestServer::start().await.unwrap();
    let admin = server.access_token(ADMIN.0, ADMIN.1).await.unwrap();
    let wilson = unique_username("wilson");

    let response = server
        .post_auth(
            "/api/Accounts",
            &admin,
            &account_body("James", "Wilson", &wilson, "oncology", &["DOCTOR", "USER"]),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let token = server.access_token(USER.0, USER.1).await.unwrap();

    let doctors: Vec<Account> = assert_json(
        server.get_auth("/api/Doctors", &token).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let names: Vec<_> = doctors.iter().map(|d| d.username.as_str()).collect();
    assert_eq!(names, ["doctor", wilson.as_str()]);
    assert!(doctors.iter().all(|d| d.roles.iter().any(|r| r == "DOCTOR")));

    let filtered: Vec<Account> = assert_json(
        server
            .get_auth("/api/Doctors?nameFilter=es%20WIL", &token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].username, wilson);

    let found: Account = assert_json(
        server
            .get_auth(&format!("/api/Doctors/{}", filtered[0].id), &token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(found.first_name, "James");

    // A non-doctor is not in the directory
    let me: Account = assert_json(
        server.get_auth("/api/Accounts/Me", &token).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let response = server
        .get_auth(&format!("/api/Doctors/{}", me.id), &token)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "USER_NOT_FOUND")
        .await
        .unwrap();

    // Deleted doctors disappear
    let response = server
        .delete_auth(&format!("/api/Accounts/{}", found.id), &admin)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let doctors: Vec<Account> = assert_json(
        server.get_auth("/api/Doctors", &token).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(doctors.iter().all(|d| d.id != found.id));
}

#[tokio::test]
async fn test_doctor_directory_requires_authentication() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/Doctors").await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "NOT_AUTHENTICATED")
        .await
        .unwrap();
}

// ============================================================================
// API Documentation Tests
// ============================================================================

#[tokio::test]
async fn test_openapi_document() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/openapi.json").await.unwrap();
    let doc: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();

    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/Authentication/SignIn"));
    assert!(paths.contains_key("/api/Accounts/{id}"));
    assert!(doc["paths"]["/api/Accounts/{id}"]["delete"]["responses"]["410"].is_object());
    assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
}

#[tokio::test]
async fn test_swagger_ui_is_served() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/ui-swagger/").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Middleware Tests
// ============================================================================

#[tokio::test]
async fn test_rate_limit() {
    let config = memory_config(&[
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1"),
        ("RATE_LIMIT_BURST", "2"),
    ])
    .unwrap();
    let server = TestServer::start_with_config(config).await.unwrap();

    let mut statuses = Vec::new();
    for _ in 0..3 {
        statuses.push(server.get("/api/Doctors").await.unwrap().status());
    }
    assert_eq!(statuses[2], StatusCode::TOO_MANY_REQUESTS);

    // Health probes are not rate limited
    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// PostgreSQL smoke test
// ============================================================================

#[tokio::test]
async fn test_postgres_backend() {
    let Some(config) = postgres_config().unwrap() else {
        return;
    };

    let server = TestServer::start_with_config(config).await.unwrap();
    let response = server.get("/health/ready").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let username = unique_username(&format!("pg{}-", Uuid::new_v4().simple()));
    let response = server
        .post(
            "/api/Authentication/SignUp",
            &sign_up_body("Pg", "User", &username, "secret"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let credentials = server.sign_in(&username, "secret").await.unwrap();
    let response = server
        .post(
            "/api/Authentication/Refresh",
            &json!({ "refreshToken": credentials.refresh_token }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}
