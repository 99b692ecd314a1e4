use eventhub_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::repositories::{
        sqlite_auth_repo::SqliteAuthRepo,
        sqlite_event_repo::SqliteEventRepo,
        sqlite_registration_repo::SqliteRegistrationRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    domain::services::{auth_service::AuthService, registration_service::RegistrationService},
    domain::ports::EmailService,
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::Mutex;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    Router,
};
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::{json, Value};

/// Captures outbound mail instead of sending it.
#[derive(Default)]
pub struct MockEmailService {
    pub sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push((
            recipient.to_string(),
            subject.to_string(),
            html_body.to_string(),
        ));
        Ok(())
    }
}

#[allow(dead_code)]
pub struct AuthHeaders {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub email: Arc<MockEmailService>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            frontend_base_url: "http://localhost:5173".to_string(),
        };

        let event_repo = Arc::new(SqliteEventRepo::new(pool.clone()));
        let registration_repo = Arc::new(SqliteRegistrationRepo::new(pool.clone()));
        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let registration_service = Arc::new(RegistrationService::new(event_repo.clone(), registration_repo.clone()));
        let email = Arc::new(MockEmailService::default());

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            event_repo,
            registration_repo,
            auth_repo,
            auth_service,
            registration_service,
            email_service: email.clone(),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            email,
        }
    }

    pub async fn signup(&self, email: &str, display_name: &str, role: &str) -> AuthHeaders {
        let payload = json!({
            "email": email,
            "password": "hunter2hunter2",
            "display_name": display_name,
            "role": role
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Signup failed in test helper: status {}", response.status());
        }

        extract_auth(response).await
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let payload = json!({
            "email": email,
            "password": password
        });

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

        extract_auth(response).await
    }
}

async fn extract_auth(response: axum::response::Response) -> AuthHeaders {
    let cookies: Vec<String> = response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|h| h.to_str().unwrap().to_string())
        .collect();

    let access_token = cookie_value(&cookies, "access_token").expect("No access_token cookie returned");
    let refresh_token = cookie_value(&cookies, "refresh_token").expect("No refresh_token cookie returned");

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
    let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

    AuthHeaders {
        access_token,
        refresh_token,
        csrf_token,
    }
}

fn cookie_value(cookies: &[String], name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    let cookie = cookies.iter().find(|c| c.starts_with(&prefix))?;
    let rest = &cookie[prefix.len()..];
    let end = rest.find(';').unwrap_or(rest.len());
    Some(rest[..end].to_string())
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
