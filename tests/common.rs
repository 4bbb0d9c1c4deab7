use rsvp_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::factory::{assemble_state, run_sqlite_migrations, Repositories},
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::{json, Value};

pub const PUBLIC_BASE_URL: &str = "https://rsvp.test";
const BOUNDARY: &str = "----rsvp-test-boundary";

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_repos(|repos| repos).await
    }

    /// Lets a test swap in its own adapters before the services are wired.
    pub async fn with_repos(customize: impl FnOnce(Repositories) -> Repositories) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool).await;

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            public_base_url: PUBLIC_BASE_URL.to_string(),
            max_upload_bytes: 1024 * 1024,
            log_dir: "./logs".to_string(),
        };

        let state = Arc::new(
            assemble_state(&config, customize(Repositories::sqlite(pool.clone()))).expect("Failed to assemble state"),
        );
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Registers a fresh host and logs them in.
    pub async fn host(&self) -> AuthHeaders {
        let email = format!("host-{}@example.com", Uuid::new_v4());
        let password = "correct-horse-battery";

        let (status, _) = self.send("POST", "/api/v1/auth/register", None,
            Some(json!({"email": email, "password": password}))).await;
        assert_eq!(status, StatusCode::CREATED, "register failed in test helper");

        self.login(&email, password).await
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let payload = json!({ "email": email, "password": password });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let access_token = cookie_value(&response, "access_token").expect("No access_token cookie returned");

        let body_json = parse_body(response).await;
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

        AuthHeaders {
            access_token,
            csrf_token
        }
    }

    /// JSON request; an empty response body comes back as `Value::Null`.
    pub async fn send(&self, method: &str, uri: &str, auth: Option<&AuthHeaders>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, parse_body(response).await)
    }

    /// Multipart upload with a `file` part plus any extra text fields.
    pub async fn upload(&self, uri: &str, auth: &AuthHeaders, file_name: &str, bytes: &[u8], fields: &[(&str, &str)]) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token)
                .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
                .body(Body::from(multipart_body(file_name, bytes, fields)))
                .unwrap()
        ).await.unwrap();

        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn create_event(&self, auth: &AuthHeaders, name: &str) -> Value {
        let (status, event) = self.send("POST", "/api/v1/events", Some(auth), Some(json!({"name": name}))).await;
        assert_eq!(status, StatusCode::CREATED, "event creation failed: {}", event);
        event
    }

    pub async fn publish(&self, auth: &AuthHeaders, event_id: &str) {
        let (status, _) = self.send("PUT", &format!("/api/v1/events/{}", event_id), Some(auth),
            Some(json!({"is_published": true}))).await;
        assert_eq!(status, StatusCode::OK);
    }

    pub async fn add_guest(&self, auth: &AuthHeaders, event_id: &str, guest: Value) -> Value {
        let (status, created) = self.send("POST", &format!("/api/v1/events/{}/guests", event_id), Some(auth), Some(guest)).await;
        assert_eq!(status, StatusCode::CREATED, "guest creation failed: {}", created);
        created
    }

    pub async fn guests(&self, auth: &AuthHeaders, event_id: &str) -> Vec<Value> {
        let (status, list) = self.send("GET", &format!("/api/v1/events/{}/guests", event_id), Some(auth), None).await;
        assert_eq!(status, StatusCode::OK);
        list.as_array().cloned().unwrap_or_default()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn cookie_value(response: &axum::response::Response, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .find(|c| c.starts_with(&prefix))
        .map(|c| c[prefix.len()..].split(';').next().unwrap_or("").to_string())
}

fn multipart_body(file_name: &str, bytes: &[u8], fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        ).as_bytes());
    }
    body.extend_from_slice(format!(
        "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
        BOUNDARY, file_name
    ).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// In-memory xlsx with one worksheet per `(name, rows)` entry; the first row is the header.
#[allow(dead_code)]
pub fn xlsx_bytes(sheets: &[(&str, Vec<Vec<&str>>)]) -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                worksheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}
