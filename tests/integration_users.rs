mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{ADMIN_NAME, ADMIN_PASSWORD, err_code, phone_for, spawn_app};

#[tokio::test]
async fn test_get_own_profile() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    let (status, body) = app.get("/api/v1/users/me", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], ADMIN_NAME);
    assert_eq!(body["data"]["role"], "teacher");
    assert!(body["data"]["created_by"].is_null());
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn test_update_profile_changes_contact_fields_only() {
    let app = spawn_app().await;
    let (_, token) = app.teacher("tina").await;

    let (status, body) = app
        .put(
            "/api/v1/users/me",
            &token,
            json!({ "phone": "+8613900000000", "email": "tina@school.test" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["phone"], "+8613900000000");
    assert_eq!(body["data"]["email"], "tina@school.test");
    assert_eq!(body["data"]["name"], "tina");
    assert_eq!(body["data"]["role"], "teacher");
}

#[tokio::test]
async fn test_update_profile_rejects_taken_email() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_user(&admin, "sam", "student").await;
    let (_, token) = app.teacher("tina").await;

    let (status, body) = app
        .put("/api/v1/users/me", &token, json!({ "email": "sam@edudesk.test" }))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err_code(&body), 10000409);
    assert_eq!(body["meta"]["err_msg"], "email already exists");
}

#[tokio::test]
async fn test_change_password() {
    let app = spawn_app().await;
    let (_, token) = app.teacher("tina").await;

    let (status, body) = app
        .put(
            "/api/v1/users/me/password",
            &token,
            json!({ "old_password": "wrong-one", "new_password": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err_code(&body), 30000002);

    let (status, _) = app
        .put(
            "/api/v1/users/me/password",
            &token,
            json!({ "old_password": "password1", "new_password": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    app.login("tina", "brand-new-pass").await;
}

#[tokio::test]
async fn test_admin_routes_require_admin_flag() {
    let app = spawn_app().await;
    let (_, token) = app.teacher("tina").await;

    let (status, body) = app.get("/api/v1/admin/users", &token).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err_code(&body), 10000403);
}

#[tokio::test]
async fn test_admin_creates_user_and_rejects_duplicates() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let created = app.create_user(&admin, "sam", "student").await;
    assert_eq!(created["role"], "student");
    assert_eq!(created["is_admin"], false);
    assert!(created.get("password").is_none());

    let duplicate_name = json!({
        "name": "sam",
        "nickname": "Other Sam",
        "phone": "19900000000",
        "email": "other-sam@edudesk.test",
        "password": "password1",
    });
    let (status, body) = app.post("/api/v1/admin/users", &admin, duplicate_name).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["meta"]["err_msg"], "name already exists");

    let duplicate_phone = json!({
        "name": "samuel",
        "nickname": "Samuel",
        "phone": phone_for("sam"),
        "email": "samuel@edudesk.test",
        "password": "password1",
    });
    let (status, body) = app.post("/api/v1/admin/users", &admin, duplicate_phone).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["meta"]["err_msg"], "phone already exists");
}

#[tokio::test]
async fn test_admin_create_validates_fields() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/v1/admin/users",
            &admin,
            json!({
                "name": "x",
                "nickname": "X",
                "phone": "abc",
                "email": "not-an-email",
                "password": "123",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = body["meta"]["err_details"].as_array().unwrap();
    assert_eq!(details.len(), 4);
    assert_eq!(details[0], "email must be a valid email address");
}

#[tokio::test]
async fn test_admin_lists_users_with_pagination_and_filters() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    for i in 0..6 {
        app.create_user(&admin, &format!("student{i}"), "student").await;
    }
    app.create_user(&admin, "tina", "teacher").await;

    let (status, body) = app.get("/api/v1/admin/users?pn=2&ps=3", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pn"], 2);
    assert_eq!(body["data"]["ps"], 3);
    assert_eq!(body["data"]["total"], 8);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 3);

    let (_, body) = app.get("/api/v1/admin/users?role=teacher", &admin).await;
    assert_eq!(body["data"]["total"], 2);

    let (_, body) = app.get("/api/v1/admin/users?query=student1", &admin).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "student1");
}

#[tokio::test]
async fn test_admin_get_user_includes_creator() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let sam = app.create_user(&admin, "sam", "student").await;

    let (status, body) = app
        .get(&format!("/api/v1/admin/users/{}", sam["id"]), &admin)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["created_by"]["name"], ADMIN_NAME);

    let (status, body) = app.get("/api/v1/admin/users/9999", &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err_code(&body), 10000404);

    let (status, _) = app.get("/api/v1/admin/users/0", &admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_updates_user_and_password() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let sam = app.create_user(&admin, "sam", "student").await;
    let uri = format!("/api/v1/admin/users/{}", sam["id"]);

    let (status, body) = app
        .put(&uri, &admin, json!({ "nickname": "Sammy", "password": "" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nickname"], "Sammy");
    app.login("sam", "password1").await;

    let (status, _) = app
        .put(&uri, &admin, json!({ "password": "another-pass" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    app.login("sam", "another-pass").await;
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (_, me) = app.get("/api/v1/users/me", &admin).await;

    let (status, body) = app
        .delete(&format!("/api/v1/admin/users/{}", me["data"]["id"]), &admin)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err_code(&body), 10000403);
}

#[tokio::test]
async fn test_admin_deletes_user() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let sam = app.create_user(&admin, "sam", "student").await;
    let uri = format!("/api/v1/admin/users/{}", sam["id"]);

    let (status, body) = app.delete(&uri, &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(err_code(&body), 0);

    let (status, _) = app.get(&uri, &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Deleting again is not an error.
    let (status, _) = app.delete(&uri, &admin).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_toggle_admin_takes_effect_without_new_token() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (tina_id, tina) = app.teacher("tina").await;

    let (status, _) = app.get("/api/v1/admin/users", &tina).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put(
            &format!("/api/v1/admin/users/{tina_id}/admin"),
            &admin,
            json!({ "is_admin": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_admin"], true);

    let (status, _) = app.get("/api/v1/admin/users", &tina).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_cannot_revoke_own_flag() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (_, me) = app.get("/api/v1/users/me", &admin).await;

    let (status, _) = app
        .put(
            &format!("/api/v1/admin/users/{}/admin", me["data"]["id"]),
            &admin,
            json!({ "is_admin": false }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    app.login(ADMIN_NAME, ADMIN_PASSWORD).await;
}

#[tokio::test]
async fn test_role_change_closes_teacher_routes() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (tina_id, tina) = app.teacher("tina").await;

    let (status, _) = app.get("/api/v1/teacher/students", &tina).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .put(
            &format!("/api/v1/admin/users/{tina_id}/role"),
            &admin,
            json!({ "role": "student" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "student");

    let (status, _) = app.get("/api/v1/teacher/students", &tina).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deleted_user_token_stops_working() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (tina_id, tina) = app.teacher("tina").await;

    app.delete(&format!("/api/v1/admin/users/{tina_id}"), &admin)
        .await;

    let (status, body) = app.get("/api/v1/users/me", &tina).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(err_code(&body), 20000003);

    let (status, body) = app
        .put("/api/v1/users/me", &tina, json!({ "email": "tina@school.test" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(err_code(&body), 20000003);

    let (status, body) = app
        .put(
            "/api/v1/users/me/password",
            &tina,
            json!({ "old_password": "password1", "new_password": "brand-new-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(err_code(&body), 20000003);

    let (status, body) = app.get("/api/v1/subjects", &tina).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(err_code(&body), 20000003);
}
