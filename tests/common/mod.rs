#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use edudesk::edudesk_config::{AdminConfig, RunMode, Settings, SettingsHandle};
use edudesk::edudesk_core::file_storage::LocalFileStorage;
use edudesk::edudesk_db::memory::{
    InMemoryClassRepository, InMemoryLearningMaterialRepository, InMemorySubjectRepository,
    InMemoryUserRepository,
};
use edudesk::router::init_router;
use edudesk::state::{AppState, Repositories};

pub const ADMIN_NAME: &str = "root";
pub const ADMIN_PASSWORD: &str = "rootpass1";
pub const JWT_SECRET: &str = "integration-test-secret";
pub const MAX_FILE_SIZE: usize = 64 * 1024;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub storage_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.storage_dir);
    }
}

pub fn test_settings(storage_dir: PathBuf) -> Settings {
    let mut settings = Settings::default();
    settings.server.mode = RunMode::Test;
    settings.app.bcrypt_cost = 4;
    settings.jwt.secret = JWT_SECRET.to_string();
    settings.storage.base_dir = storage_dir;
    settings.storage.max_file_size = MAX_FILE_SIZE;
    settings.log.file_enabled = false;
    settings.admin = AdminConfig {
        name: ADMIN_NAME.to_string(),
        nickname: "Root".to_string(),
        phone: "10000000000".to_string(),
        email: "root@edudesk.test".to_string(),
        password: ADMIN_PASSWORD.to_string(),
    };
    settings
}

/// Full router over in-memory repositories with the bootstrap admin seeded.
pub async fn spawn_app() -> TestApp {
    let storage_dir = std::env::temp_dir().join(format!("edudesk-test-{}", Uuid::new_v4()));
    let settings = test_settings(storage_dir.clone());
    let admin = settings.admin.clone();

    let repos = Repositories {
        users: Arc::new(InMemoryUserRepository::new()),
        classes: Arc::new(InMemoryClassRepository::new()),
        subjects: Arc::new(InMemorySubjectRepository::new()),
        learning_materials: Arc::new(InMemoryLearningMaterialRepository::new()),
    };
    let storage = Arc::new(LocalFileStorage::new(storage_dir.clone(), MAX_FILE_SIZE));
    let state = AppState::new(SettingsHandle::new(settings), None, repos, storage);

    state
        .users
        .ensure_bootstrap_admin(&admin)
        .await
        .expect("Failed to seed admin");

    TestApp {
        router: init_router(state.clone()),
        state,
        storage_dir,
    }
}

pub async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        read_json(self.send(request).await).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn login(&self, name: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/v1/login",
                None,
                Some(json!({ "name": name, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed for {name}: {body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_NAME, ADMIN_PASSWORD).await
    }

    /// Creates a user through the admin endpoint and returns its JSON.
    pub async fn create_user(&self, admin_token: &str, name: &str, role: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/v1/admin/users",
                admin_token,
                json!({
                    "name": name,
                    "nickname": name,
                    "phone": phone_for(name),
                    "email": format!("{name}@edudesk.test"),
                    "password": "password1",
                    "role": role,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create user failed: {body}");
        body["data"].clone()
    }

    /// Creates a teacher and returns `(id, token)`.
    pub async fn teacher(&self, name: &str) -> (i64, String) {
        let admin = self.admin_token().await;
        let user = self.create_user(&admin, name, "teacher").await;
        let token = self.login(name, "password1").await;
        (user["id"].as_i64().unwrap(), token)
    }
}

/// Deterministic 11-digit phone number derived from a name.
pub fn phone_for(name: &str) -> String {
    let seed = name
        .bytes()
        .fold(7u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)));
    format!("13{:09}", seed % 1_000_000_000)
}

pub fn err_code(body: &Value) -> i64 {
    body["meta"]["err_code"].as_i64().unwrap()
}

pub fn multipart_body(boundary: &str, fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, content)) = file {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
