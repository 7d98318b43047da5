use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};
use errs::{FieldViolation, Options};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use validator::{Validate, ValidationError};

/// Roles a user may be created with
const ROLES: [&str; 2] = ["admin", "member"];

/// A stored user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub age: u8,
    pub role: String,
}

/// Body of `POST /v1/users`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(required, length(min = 1, max = 64))]
    pub name: Option<String>,
    #[validate(required, email)]
    pub email: Option<String>,
    #[validate(required, range(min = 18, max = 130))]
    pub age: Option<u8>,
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
}

impl NewUser {
    /// Assemble a user once every required field is present
    fn into_user(self, id: u64) -> Option<User> {
        Some(User {
            id,
            name: self.name?,
            email: self.email?,
            age: self.age?,
            role: self.role.unwrap_or_else(|| ROLES[1].to_owned()),
        })
    }
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    if ROLES.contains(&role) {
        return Ok(());
    }

    let mut error = ValidationError::new("oneof");
    error.add_param("param".into(), &ROLES.join(" "));
    Err(error)
}

#[derive(Debug, Error)]
enum LookupError {
    #[error("no user with id {0} in directory")]
    Missing(u64),
}

/// In-memory user directory
#[derive(Debug, Clone)]
pub struct Directory {
    users: Arc<RwLock<BTreeMap<u64, User>>>,
}

impl Default for Directory {
    fn default() -> Self {
        let seed = User {
            id: 1,
            name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            age: 36,
            role: ROLES[0].to_owned(),
        };

        Self {
            users: Arc::new(RwLock::new(BTreeMap::from([(seed.id, seed)]))),
        }
    }
}

impl Directory {
    async fn get(&self, id: u64) -> Result<User, LookupError> {
        self.users.read().await.get(&id).cloned().ok_or(LookupError::Missing(id))
    }

    async fn insert(&self, new_user: NewUser) -> Option<User> {
        let mut users = self.users.write().await;
        let id = users.last_key_value().map_or(1, |(id, _)| id + 1);
        let user = new_user.into_user(id)?;

        users.insert(id, user.clone());
        Some(user)
    }
}

/// Routes for the user directory
pub fn router() -> Router<Directory> {
    Router::new()
        .route("/v1/users", post(create_user))
        .route("/v1/users/{id}", get(get_user))
}

/// Handle `POST /v1/users`
async fn create_user(
    State(directory): State<Directory>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), errs::Error> {
    let Json(new_user) = payload.map_err(errs::Error::from_validation)?;
    new_user.validate().map_err(errs::Error::from_validation)?;

    let user = directory
        .insert(new_user)
        .await
        .ok_or_else(|| errs::BAD_REQUEST.clone())?;

    tracing::debug!(id = user.id, "user created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Handle `GET /v1/users/{id}`
async fn get_user(State(directory): State<Directory>, Path(id): Path<String>) -> Result<Json<User>, errs::Error> {
    let id: u64 = id
        .parse()
        .map_err(|_| errs::Error::from_validation(FieldViolation::new("id", "numeric")))?;

    match directory.get(id).await {
        Ok(user) => Ok(Json(user)),
        Err(e) => Err(errs::Error::with_options(
            errs::Code::NotFound,
            format!("user {id} not found"),
            Options::new().log_cause(&e),
        )),
    }
}
