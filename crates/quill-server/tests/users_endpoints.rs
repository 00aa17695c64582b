use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

mod support;

use quill_core::Role;
use quill_db::repo::PermissionRepo;
use quill_server::domains::users::manager::{
    self, CreateUserCommand, CreateUserOptions,
};
use quill_server::tokens::issue_pair;
use support::TestApp;

const CONTENT_CODENAMES: [&str; 4] = ["add_post", "change_post", "delete_post", "view_post"];

fn command(email: &str, user_name: &str) -> CreateUserCommand {
    CreateUserCommand {
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        user_name: user_name.to_string(),
        password: Some("correct horse battery staple".to_string()),
    }
}

fn access_token_for(app: &TestApp, user_id: Uuid) -> String {
    issue_pair(&app.state.token_secret, user_id, 3600, 86400)
        .expect("issue pair")
        .access
}

async fn admin_token(app: &TestApp) -> String {
    let admin = manager::create_superuser(
        &app.state,
        command("admin@example.com", "admin"),
        CreateUserOptions::default(),
    )
    .await
    .expect("create superuser");
    assert_eq!(admin.role, Role::Admin);
    assert!(admin.is_staff && admin.is_superuser);
    access_token_for(app, admin.id)
}

#[tokio::test]
async fn me_returns_the_calling_account() {
    let app = TestApp::new().await;
    let user = manager::create_user(
        &app.state,
        command("me@example.com", "me"),
        CreateUserOptions::default(),
    )
    .await
    .expect("create user");
    let token = access_token_for(&app, user.id);

    let (status, body) = app
        .send_empty(Method::GET, "/v1/users/me", Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "me@example.com");
    assert_eq!(body["user_name"], "me");
    assert_eq!(body["role"], "NON_ADMIN");
    assert_eq!(body["is_staff"], false);
}

#[tokio::test]
async fn me_requires_a_valid_access_token() {
    let app = TestApp::new().await;
    let user = manager::create_user(
        &app.state,
        command("tokens@example.com", "tokens"),
        CreateUserOptions::default(),
    )
    .await
    .expect("create user");

    let (status, _) = app.send_empty(Method::GET, "/v1/users/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A refresh token is not an access token.
    let refresh = issue_pair(&app.state.token_secret, user.id, 3600, 86400)
        .expect("issue pair")
        .refresh;
    let (status, _) = app
        .send_empty(Method::GET, "/v1/users/me", Some(&refresh))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send_empty(Method::GET, "/v1/users/me", Some("garbage"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn staff_can_create_users_with_a_role() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let (status, body) = app
        .send_json(
            Method::POST,
            "/v1/users",
            Some(&token),
            &json!({
                "first_name": "Mo",
                "last_name": "Derator",
                "email": "mod@example.com",
                "user_name": "mod",
                "password": "another fine password",
                "role": "MODERATOR",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "MODERATOR");
    assert_eq!(body["is_staff"], true);
    assert_eq!(body["is_superuser"], false);

    let id = body["id"].as_str().expect("id");
    let (status, body) = app
        .send_empty(
            Method::GET,
            &format!("/v1/users/{id}/permissions"),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["codenames"], json!(CONTENT_CODENAMES));
}

#[tokio::test]
async fn non_staff_cannot_create_users_or_change_roles() {
    let app = TestApp::new().await;
    let user = manager::create_user(
        &app.state,
        command("plain@example.com", "plain"),
        CreateUserOptions::default(),
    )
    .await
    .expect("create user");
    let token = access_token_for(&app, user.id);

    let (status, body) = app
        .send_json(
            Method::POST,
            "/v1/users",
            Some(&token),
            &json!({
                "first_name": "X",
                "last_name": "Y",
                "email": "x@example.com",
                "user_name": "x",
                "password": "some password here",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "staff_required");

    let (status, _) = app
        .send_json(
            Method::PUT,
            &format!("/v1/users/{}/role", user.id),
            Some(&token),
            &json!({ "role": "ADMIN" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn role_update_grants_and_revokes_content_permissions() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let user = manager::create_user(
        &app.state,
        command("writer@example.com", "writer"),
        CreateUserOptions::default(),
    )
    .await
    .expect("create user");

    // Promote: staff flag and all four grants appear.
    let (status, body) = app
        .send_json(
            Method::PUT,
            &format!("/v1/users/{}/role", user.id),
            Some(&token),
            &json!({ "role": "MODERATOR" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "MODERATOR");
    assert_eq!(body["is_staff"], true);

    let permissions = PermissionRepo::new(&app.pool);
    assert_eq!(
        permissions
            .codenames_for_user(user.id)
            .await
            .expect("codenames"),
        CONTENT_CODENAMES
    );

    // Re-running the same promotion is a no-op, not an error.
    let (status, _) = app
        .send_json(
            Method::PUT,
            &format!("/v1/users/{}/role", user.id),
            Some(&token),
            &json!({ "role": "MODERATOR" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        permissions
            .codenames_for_user(user.id)
            .await
            .expect("codenames"),
        CONTENT_CODENAMES
    );

    // Demote: staff flag and grants disappear, idempotently.
    for _ in 0..2 {
        let (status, body) = app
            .send_json(
                Method::PUT,
                &format!("/v1/users/{}/role", user.id),
                Some(&token),
                &json!({ "role": "NON_ADMIN" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "NON_ADMIN");
        assert_eq!(body["is_staff"], false);
        assert!(permissions
            .codenames_for_user(user.id)
            .await
            .expect("codenames")
            .is_empty());
    }
}

#[tokio::test]
async fn superuser_role_snaps_back_to_admin() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let admin = quill_db::repo::UserRepo::new(&app.pool)
        .get_by_email("admin@example.com")
        .await
        .expect("lookup")
        .expect("admin present");

    let (status, body) = app
        .send_json(
            Method::PUT,
            &format!("/v1/users/{}/role", admin.id),
            Some(&token),
            &json!({ "role": "NON_ADMIN" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "ADMIN");
    assert_eq!(body["is_staff"], true);
    assert_eq!(body["is_superuser"], true);
}

#[tokio::test]
async fn role_update_validates_input() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let user = manager::create_user(
        &app.state,
        command("target@example.com", "target"),
        CreateUserOptions::default(),
    )
    .await
    .expect("create user");

    let (status, body) = app
        .send_json(
            Method::PUT,
            &format!("/v1/users/{}/role", user.id),
            Some(&token),
            &json!({ "role": "OVERLORD" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_role");

    let (status, _) = app
        .send_json(
            Method::PUT,
            &format!("/v1/users/{}/role", Uuid::now_v7()),
            Some(&token),
            &json!({ "role": "ADMIN" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn permissions_readable_by_self_but_not_strangers() {
    let app = TestApp::new().await;
    let first = manager::create_user(
        &app.state,
        command("first@example.com", "first"),
        CreateUserOptions {
            role: Some(Role::Moderator),
            ..CreateUserOptions::default()
        },
    )
    .await
    .expect("create first");
    let second = manager::create_user(
        &app.state,
        command("second@example.com", "second"),
        CreateUserOptions::default(),
    )
    .await
    .expect("create second");
    let second_token = access_token_for(&app, second.id);

    let (status, body) = app
        .send_empty(
            Method::GET,
            &format!("/v1/users/{}/permissions", second.id),
            Some(&second_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["codenames"], json!([]));

    let (status, _) = app
        .send_empty(
            Method::GET,
            &format!("/v1/users/{}/permissions", first.id),
            Some(&second_token),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_superuser_rejects_contradictory_flags() {
    let app = TestApp::new().await;

    let err = manager::create_superuser(
        &app.state,
        command("root@example.com", "root"),
        CreateUserOptions {
            is_staff: Some(false),
            ..CreateUserOptions::default()
        },
    )
    .await
    .expect_err("is_staff=false must be rejected");
    assert_eq!(
        err,
        quill_server::domains::errors::ServiceError::BadRequest("superuser_flags")
    );

    let err = manager::create_superuser(
        &app.state,
        command("root@example.com", "root"),
        CreateUserOptions {
            is_superuser: Some(false),
            ..CreateUserOptions::default()
        },
    )
    .await
    .expect_err("is_superuser=false must be rejected");
    assert_eq!(
        err,
        quill_server::domains::errors::ServiceError::BadRequest("superuser_flags")
    );

    // Neither rejected call wrote anything.
    assert!(quill_db::repo::UserRepo::new(&app.pool)
        .get_by_email("root@example.com")
        .await
        .expect("lookup")
        .is_none());
}

#[tokio::test]
async fn superuser_gets_all_content_permissions_on_create() {
    let app = TestApp::new().await;
    let admin = manager::create_superuser(
        &app.state,
        command("boss@example.com", "boss"),
        CreateUserOptions::default(),
    )
    .await
    .expect("create superuser");

    assert_eq!(admin.role, Role::Admin);
    assert_eq!(
        PermissionRepo::new(&app.pool)
            .codenames_for_user(admin.id)
            .await
            .expect("codenames"),
        CONTENT_CODENAMES
    );
}
