use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;

use crate::{Error, code::status_text};

/// Error as seen at the HTTP boundary
///
/// Either a structured [`Error`] that is shown to the caller as-is, or an
/// opaque failure whose details never leave the process.
#[derive(Debug)]
pub enum ErrorResponse {
    Structured(Error),
    Opaque,
}

impl ErrorResponse {
    /// Classify an arbitrary error, looking through its `source()` chain
    pub fn from_dyn(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut current = Some(err);

        while let Some(err) = current {
            if let Some(structured) = err.downcast_ref::<Error>() {
                return Self::Structured(structured.clone());
            }
            current = err.source();
        }

        tracing::debug!(error = %err, "hiding unstructured error from response");
        Self::Opaque
    }

    /// HTTP status the response will carry
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Structured(err) => err.status_code(),
            Self::Opaque => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ErrorResponse {
    fn from(err: Error) -> Self {
        Self::Structured(err)
    }
}

impl From<anyhow::Error> for ErrorResponse {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<Error>() {
            Ok(structured) => Self::Structured(structured),
            Err(err) => Self::from_dyn(&*err),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Structured(err) => err.into_response(),
            Self::Opaque => {
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (status, Json(status_text(status))).into_response()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Write any error as an HTTP response
///
/// Structured errors, including ones wrapped as the source of another
/// error, keep their code, message, info and timestamp. Everything else
/// becomes a bare `"Internal Server Error"` with status 500.
pub fn write_error_response(err: &(dyn std::error::Error + 'static)) -> Response {
    ErrorResponse::from_dyn(err).into_response()
}
