use std::str::FromStr;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr, VariantArray};

/// Machine-readable category of a failure
///
/// The set is closed: every code has a fixed HTTP status and there is no
/// way to register new ones at runtime. On the wire a code is its
/// `SCREAMING_SNAKE_CASE` name, e.g. `NOT_FOUND`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
    VariantArray,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Code {
    /// The request is malformed or failed validation
    BadRequest,
    /// The request lacks valid credentials
    Unauthorized,
    /// The caller is authenticated but not allowed
    Forbidden,
    /// The resource does not exist
    NotFound,
    /// The resource existed but was removed for good
    Gone,
    /// The caller is being rate limited
    TooManyRequests,
    /// Unexpected server-side failure
    InternalServerError,
    /// The operation exists but is not implemented
    NotImplemented,
    /// A dependency is down or the service is overloaded
    ServiceUnavailable,
}

impl Code {
    /// HTTP status code for this error code
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Gone => StatusCode::GONE,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Canonical reason phrase of the mapped status (e.g. "Not Found")
    pub fn reason(self) -> &'static str {
        status_text(self.status_code())
    }

    /// Wire representation of the code
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Resolve the HTTP status for a code given as an open string
///
/// Strings outside the closed set map to `500 Internal Server Error`.
pub fn status_for(code: &str) -> StatusCode {
    Code::from_str(code).map_or(StatusCode::INTERNAL_SERVER_ERROR, Code::status_code)
}

/// Canonical reason phrase for a status, empty when the status has none
pub(crate) fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_maps_to_its_status() {
        let expected = [
            (Code::BadRequest, 400),
            (Code::Unauthorized, 401),
            (Code::Forbidden, 403),
            (Code::NotFound, 404),
            (Code::Gone, 410),
            (Code::TooManyRequests, 429),
            (Code::InternalServerError, 500),
            (Code::NotImplemented, 501),
            (Code::ServiceUnavailable, 503),
        ];

        assert_eq!(expected.len(), Code::VARIANTS.len());

        for (code, status) in expected {
            assert_eq!(code.status_code().as_u16(), status, "{code}");
        }
    }

    #[test]
    fn wire_names_are_screaming_snake_case() {
        assert_eq!(Code::BadRequest.as_str(), "BAD_REQUEST");
        assert_eq!(Code::TooManyRequests.to_string(), "TOO_MANY_REQUESTS");
        assert_eq!(Code::InternalServerError.as_ref(), "INTERNAL_SERVER_ERROR");
        assert_eq!(
            serde_json::to_string(&Code::ServiceUnavailable).unwrap(),
            "\"SERVICE_UNAVAILABLE\""
        );
    }

    #[test]
    fn status_for_known_strings() {
        for code in Code::VARIANTS {
            assert_eq!(status_for(code.as_str()), code.status_code());
        }
    }

    #[test]
    fn status_for_unknown_strings_is_internal_error() {
        for raw in ["", "TEAPOT", "not_found", "Not Found", "NOT_FOUND "] {
            assert_eq!(status_for(raw), StatusCode::INTERNAL_SERVER_ERROR, "{raw:?}");
        }
    }

    #[test]
    fn status_for_is_stable_across_calls() {
        let first = status_for("GONE");
        for _ in 0..16 {
            assert_eq!(status_for("GONE"), first);
        }
    }

    #[test]
    fn reasons_match_http_status_text() {
        assert_eq!(Code::BadRequest.reason(), "Bad Request");
        assert_eq!(Code::TooManyRequests.reason(), "Too Many Requests");
        assert_eq!(Code::InternalServerError.reason(), "Internal Server Error");
        assert_eq!(Code::ServiceUnavailable.reason(), "Service Unavailable");
    }
}
