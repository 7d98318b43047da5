use std::sync::LazyLock;

use http::StatusCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Code;

/// Structured contextual info attached to an error
pub type Info = serde_json::Map<String, serde_json::Value>;

/// Structured error returned by handlers
///
/// Carries a [`Code`], a human-readable message, optional [`Info`], and
/// the moment it was created. Values are immutable once built; the only
/// way to get one is through the constructors below or
/// [`Error::from_validation`](crate::Error::from_validation).
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("[{code}] {message}")]
pub struct Error {
    code: Code,
    message: String,
    #[serde(default, skip_serializing_if = "Info::is_empty")]
    info: Info,
    timestamp: Timestamp,
}

/// Optional settings applied by [`Error::with_options`]
#[derive(Debug, Default)]
pub struct Options<'a> {
    info: Option<Info>,
    log_cause: Option<&'a (dyn std::error::Error + 'a)>,
}

impl<'a> Options<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach contextual info, replacing any previously attached map
    #[must_use]
    pub fn info(mut self, info: Info) -> Self {
        self.info = Some(info);
        self
    }

    /// Log `cause` at error level while constructing the error
    ///
    /// The cause is only borrowed for logging and is not kept on the
    /// resulting [`Error`].
    #[must_use]
    pub fn log_cause(mut self, cause: &'a (dyn std::error::Error + 'a)) -> Self {
        self.log_cause = Some(cause);
        self
    }
}

impl Error {
    /// Create an error with no info
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self::with_options(code, message, Options::default())
    }

    /// Create an error, applying `options`
    pub fn with_options(code: Code, message: impl Into<String>, options: Options<'_>) -> Self {
        let message = message.into();

        if let Some(cause) = options.log_cause {
            tracing::error!(code = %code, error = %cause, "{message}");
        }

        Self {
            code,
            message,
            info: options.info.unwrap_or_default(),
            timestamp: Timestamp::now(),
        }
    }

    pub const fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Contextual info, empty unless explicitly supplied
    pub const fn info(&self) -> &Info {
        &self.info
    }

    /// When the error was created
    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// HTTP status resolved from the error code
    pub const fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }
}

impl From<Code> for Error {
    fn from(code: Code) -> Self {
        Self::new(code, code.reason())
    }
}

macro_rules! common_errors {
    ($($name:ident, $ctor:ident => $code:ident;)+) => {
        $(
            #[doc = concat!("Shared [`Code::", stringify!($code), "`] error with the status reason as message")]
            pub static $name: LazyLock<Error> = LazyLock::new(|| Error::from(Code::$code));
        )+

        /// Shared read-only error for `code`
        pub fn common(code: Code) -> &'static Error {
            match code {
                $(Code::$code => LazyLock::force(&$name),)+
            }
        }

        impl Error {
            $(
                #[doc = concat!("Create a [`Code::", stringify!($code), "`] error")]
                pub fn $ctor(message: impl Into<String>) -> Self {
                    Self::new(Code::$code, message)
                }
            )+
        }
    };
}

common_errors! {
    BAD_REQUEST, bad_request => BadRequest;
    UNAUTHORIZED, unauthorized => Unauthorized;
    FORBIDDEN, forbidden => Forbidden;
    NOT_FOUND, not_found => NotFound;
    GONE, gone => Gone;
    TOO_MANY_REQUESTS, too_many_requests => TooManyRequests;
    INTERNAL_SERVER_ERROR, internal_server_error => InternalServerError;
    NOT_IMPLEMENTED, not_implemented => NotImplemented;
    SERVICE_UNAVAILABLE, service_unavailable => ServiceUnavailable;
}
