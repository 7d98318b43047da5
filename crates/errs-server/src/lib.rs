//! Reference HTTP service for the `errs` crate
//!
//! Wires every error path (validation, lookups, opaque failures) through
//! axum so the JSON contract can be exercised end to end.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod showcase;
pub mod users;

use std::net::SocketAddr;

use axum::{Router, routing::get};
use errs_config::Config;
use tower_http::trace::TraceLayer;

pub use users::{Directory, NewUser, User};

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    pub fn new(config: &Config) -> Self {
        let mut app = users::router().merge(showcase::router());

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(|| async { "ok" }));
        }

        let router = app
            .fallback(|| async { errs::NOT_FOUND.clone() })
            .with_state(Directory::default())
            .layer(TraceLayer::new_for_http());

        Self {
            router,
            listen_address: config.server.listen_address(),
        }
    }

    /// Consume the server and return the router
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    async fn call(config: &Config, request: Request<Body>) -> (StatusCode, Value) {
        let response = Server::new(config).into_router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()));
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_mounted_at_configured_path() {
        let mut config = Config::default();
        config.server.health.path = "/healthz".to_owned();

        let (status, body) = call(&config, get("/healthz")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("ok"));
    }

    #[tokio::test]
    async fn health_can_be_disabled() {
        let mut config = Config::default();
        config.server.health.enabled = false;

        let (status, body) = call(&config, get("/health")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn common_error_by_code() {
        let (status, body) = call(&Config::default(), get("/v1/errors/GONE")).await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(body["code"], "GONE");
        assert_eq!(body["message"], "Gone");
    }

    #[tokio::test]
    async fn unknown_error_code() {
        let (status, body) = call(&Config::default(), get("/v1/errors/TEAPOT")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["info"], json!({ "code": "TEAPOT" }));
    }

    #[tokio::test]
    async fn empty_required_field_is_bad_request() {
        let (status, body) = call(
            &Config::default(),
            post_json("/v1/users", r#"{"name":"","email":"a@b.co","age":30}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["message"], "Bad Request");
        assert_eq!(body["info"], json!({ "name": "name must be longer than 1" }));
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, body) = call(&Config::default(), post_json("/v1/users", "{\"name\":")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["info"]["error"].is_string());
    }

    #[tokio::test]
    async fn valid_user_is_created() {
        let (status, body) = call(
            &Config::default(),
            post_json("/v1/users", r#"{"name":"Grace","email":"grace@example.com","age":40,"role":"admin"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 2);
        assert_eq!(body["role"], "admin");
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (status, body) = call(&Config::default(), get("/v1/users/99")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "user 99 not found");
    }

    #[tokio::test]
    async fn non_numeric_user_id() {
        let (status, body) = call(&Config::default(), get("/v1/users/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["info"], json!({ "id": "id is not valid" }));
    }

    #[tokio::test]
    async fn opaque_failure_hides_details() {
        let (status, body) = call(&Config::default(), get("/v1/failures/opaque")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!("Internal Server Error"));
    }

    #[tokio::test]
    async fn wrapped_failure_unwraps() {
        let (status, body) = call(&Config::default(), get("/v1/failures/wrapped")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], "profile cache offline");
    }
}
