//! Routes that surface each kind of error the way a real handler would

use anyhow::Context;
use axum::{
    Json, Router,
    extract::Path,
    response::Response,
    routing::get,
};
use errs::{Code, ErrorResponse, Info, Options};
use serde_json::Value;

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/v1/errors/{code}", get(show_error))
        .route("/v1/failures/opaque", get(opaque_failure))
        .route("/v1/failures/wrapped", get(wrapped_failure))
}

/// Handle `GET /v1/errors/{code}` by returning the shared error for `code`
async fn show_error(Path(code): Path<String>) -> errs::Error {
    match code.parse::<Code>() {
        Ok(code) => errs::common(code).clone(),
        Err(_) => {
            let mut info = Info::new();
            info.insert("code".to_owned(), Value::String(code));
            errs::Error::with_options(Code::NotFound, "unknown error code", Options::new().info(info))
        }
    }
}

/// Handle `GET /v1/failures/opaque` with an error that must not reach the caller
async fn opaque_failure() -> Response {
    let err = std::io::Error::other("ledger shard 7 unreachable at 10.0.3.17:5432");
    errs::write_error_response(&err)
}

/// Handle `GET /v1/failures/wrapped` with a structured error behind `anyhow` context
async fn wrapped_failure() -> Result<Json<Value>, ErrorResponse> {
    let profile = load_profile().context("loading profile")?;
    Ok(Json(profile))
}

/// Stand-in for a cache-backed lookup whose backend is down
fn load_profile() -> Result<Value, errs::Error> {
    Err(errs::Error::service_unavailable("profile cache offline"))
}
