//! Structured errors for HTTP handlers
//!
//! Handlers return [`Error`] values built from a closed set of [`Code`]s.
//! At the boundary, [`write_error_response`] (or the [`IntoResponse`]
//! impls) turns them into JSON bodies with the matching status code, while
//! any other error is reported as an opaque `500`.
//!
//! [`IntoResponse`]: axum::response::IntoResponse

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod code;
mod error;
mod response;
mod validation;

pub use code::{Code, status_for};
pub use error::{
    BAD_REQUEST, Error, FORBIDDEN, GONE, INTERNAL_SERVER_ERROR, Info, NOT_FOUND, NOT_IMPLEMENTED, Options,
    SERVICE_UNAVAILABLE, TOO_MANY_REQUESTS, UNAUTHORIZED, common,
};
pub use response::{ErrorResponse, write_error_response};
pub use validation::{FieldViolation, ValidationFailure};
