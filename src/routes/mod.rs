pub mod families;
pub mod health;
pub mod lists;
pub mod sharing;
pub mod webhooks;

/// Shared helpers for route tests: an in-memory database, a router wired
/// like the real one (minus rate limiting and CORS), and request plumbing.
#[cfg(test)]
pub(crate) mod testutil {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use http_body_util::BodyExt;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use tower::ServiceExt;

    use crate::auth::Claims;
    use crate::config::Config;
    use crate::routes;
    use crate::AppState;

    pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
    pub const TEST_WEBHOOK_SECRET: &str = "test-webhook-secret";

    pub async fn test_state() -> Arc<AppState> {
        // A single connection keeps the in-memory database alive and shared
        // across the whole test.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        crate::db::MIGRATOR
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let mut config = Config::default();
        config.identity.jwt_secret = TEST_JWT_SECRET.to_string();
        config.payment.webhook_secret = Some(TEST_WEBHOOK_SECRET.to_string());

        Arc::new(AppState { db: pool, config })
    }

    pub fn test_app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/health", get(routes::health::health_check))
            .nest(
                "/api/lists",
                routes::lists::router().merge(routes::sharing::router()),
            )
            .nest("/api/families", routes::families::router())
            .nest("/webhooks", routes::webhooks::router())
            .with_state(state)
    }

    pub fn token_for(user_id: &str) -> String {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + 3600,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .expect("Failed to encode test token")
    }

    pub async fn request(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("Failed to build request"),
            None => builder.body(Body::empty()).expect("Failed to build request"),
        };

        let response = app.clone().oneshot(request).await.expect("Request failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };

        (status, json)
    }

    pub fn error_code(body: &serde_json::Value) -> &str {
        body["error"]["code"].as_str().unwrap_or("")
    }
}
