use axum::extract::rejection::JsonRejection;
use convert_case::{Case, Casing};
use serde_json::Value;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::{Code, Error, Info, Options};

/// A single rule violated by a single field
///
/// Library-neutral form of what validation crates report. `rule` uses the
/// short tags `required`, `max`, `min`, `email`, `len` and `oneof`; any
/// other tag is rendered as a generic "is not valid" message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Field identifier as declared on the validated type
    pub field: String,
    /// Rule tag
    pub rule: String,
    /// Rule parameter, e.g. the bound of `max`
    pub param: Option<String>,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            param: None,
        }
    }

    #[must_use]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    /// Human-readable message for this violation
    pub fn message(&self) -> String {
        let field = self.field.to_case(Case::Camel);
        let param = self.param.as_deref().unwrap_or_default();

        match self.rule.as_str() {
            "required" => format!("{field} is required"),
            "max" => format!("{field} cannot be longer than {param}"),
            "min" => format!("{field} must be longer than {param}"),
            "email" => "invalid email format".to_owned(),
            "len" => format!("{field} must be {param} characters long"),
            "oneof" => format!("{field} must be {param}"),
            _ => format!("{field} is not valid"),
        }
    }
}

/// Input to [`Error::from_validation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// One or more per-field rule violations
    Fields(Vec<FieldViolation>),
    /// A failure that is not shaped as field violations
    Other(String),
}

impl ValidationFailure {
    /// Wrap an arbitrary error by its text
    pub fn from_error(error: &(dyn std::error::Error + '_)) -> Self {
        Self::Other(error.to_string())
    }

    /// Info map describing this failure
    ///
    /// Field violations are keyed by the lowerCamelCase field name. When a
    /// field is reported more than once the last violation wins.
    pub fn info(&self) -> Info {
        let mut info = Info::new();

        match self {
            Self::Fields(violations) => {
                for violation in violations {
                    info.insert(
                        violation.field.to_case(Case::Camel),
                        Value::String(violation.message()),
                    );
                }
            }
            Self::Other(text) => {
                info.insert("error".to_owned(), Value::String(text.clone()));
            }
        }

        info
    }
}

impl Error {
    /// Build a `BAD_REQUEST` error describing a validation failure
    pub fn from_validation(failure: impl Into<ValidationFailure>) -> Self {
        let failure = failure.into();

        Self::with_options(
            Code::BadRequest,
            Code::BadRequest.reason(),
            Options::new().info(failure.info()),
        )
    }
}

impl From<Vec<FieldViolation>> for ValidationFailure {
    fn from(violations: Vec<FieldViolation>) -> Self {
        Self::Fields(violations)
    }
}

impl From<FieldViolation> for ValidationFailure {
    fn from(violation: FieldViolation) -> Self {
        Self::Fields(vec![violation])
    }
}

impl From<String> for ValidationFailure {
    fn from(text: String) -> Self {
        Self::Other(text)
    }
}

impl From<&str> for ValidationFailure {
    fn from(text: &str) -> Self {
        Self::Other(text.to_owned())
    }
}

impl From<JsonRejection> for ValidationFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self::Other(rejection.body_text())
    }
}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        Self::from(&errors)
    }
}

impl From<&ValidationErrors> for ValidationFailure {
    fn from(errors: &ValidationErrors) -> Self {
        let mut violations = Vec::new();
        collect(errors, STRUCT_LEVEL_OWNER, &mut violations);
        Self::Fields(violations)
    }
}

/// Key `validator` files struct-level (`schema`) errors under
const STRUCT_LEVEL_KEY: &str = "__all__";

/// Field name for struct-level errors raised by the outermost type
const STRUCT_LEVEL_OWNER: &str = "error";

/// Flatten `errors` into one violation per failed rule
///
/// Failures inside nested structs and list items are reported under their
/// own leaf field name. Struct-level errors are reported under `owner`,
/// the field holding the struct.
fn collect(errors: &ValidationErrors, owner: &str, violations: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let field: &str = field;
        let field = if field == STRUCT_LEVEL_KEY { owner } else { field };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                violations.extend(field_errors.iter().map(|error| translate(field, error)));
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, field, violations),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect(nested, field, violations);
                }
            }
        }
    }
}

/// Map a `validator` error onto the short rule tags
fn translate(field: &str, error: &ValidationError) -> FieldViolation {
    let param = |name: &str| error.params.get(name).map(param_text);
    let code: &str = &error.code;

    let (rule, param) = match code {
        "length" | "range" => match (param("equal"), param("min"), param("max")) {
            (Some(equal), _, _) => ("len", Some(equal)),
            (None, Some(min), None) => ("min", Some(min)),
            (None, None, Some(max)) => ("max", Some(max)),
            (None, Some(min), Some(max)) => {
                if falls_below_min(error) {
                    ("min", Some(min))
                } else {
                    ("max", Some(max))
                }
            }
            (None, None, None) => (code, None),
        },
        _ => (code, param("param")),
    };

    FieldViolation {
        field: field.to_owned(),
        rule: rule.to_owned(),
        param,
    }
}

fn param_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether the rejected value is under the `min` bound rather than over `max`
fn falls_below_min(error: &ValidationError) -> bool {
    let Some(min) = error.params.get("min").and_then(Value::as_f64) else {
        return false;
    };

    let measured = match error.params.get("value") {
        Some(Value::String(s)) => count(s.chars().count()),
        Some(Value::Array(items)) => count(items.len()),
        Some(other) => match other.as_f64() {
            Some(n) => n,
            None => return false,
        },
        None => return false,
    };

    measured < min
}

fn count(n: usize) -> f64 {
    f64::from(u32::try_from(n).unwrap_or(u32::MAX))
}
