#![forbid(unsafe_code)]

use crate::auth::AuthError;
use ol_storage::StoreError;
use serde_json::{Value, json};

/// The closed error set of the line protocol. Every failure a caller can see
/// maps to exactly one snake_case kind.
#[derive(Debug)]
pub(crate) enum ApiError {
    NotFound,
    Validation(&'static str),
    InvalidPosition { requested: i64, max: i64 },
    OwnerExists,
    UnknownOwner,
    Unauthorized(&'static str),
    BadRequest(String),
    Store(String),
}

impl ApiError {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation(_) => "validation",
            Self::InvalidPosition { .. } => "invalid_position",
            Self::OwnerExists => "owner_exists",
            Self::UnknownOwner => "unknown_owner",
            Self::Unauthorized(_) => "unauthorized",
            Self::BadRequest(_) => "bad_request",
            Self::Store(_) => "store",
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        match self {
            Self::InvalidPosition { requested, max } => json!({
                "kind": self.kind(),
                "message": format!("invalid position (requested={requested}, max={max})"),
                "requested": requested,
                "max": max,
            }),
            other => json!({
                "kind": other.kind(),
                "message": other.message(),
            }),
        }
    }

    fn message(&self) -> String {
        match self {
            Self::NotFound => "item not found".to_string(),
            Self::Validation(message) => (*message).to_string(),
            Self::InvalidPosition { requested, max } => {
                format!("invalid position (requested={requested}, max={max})")
            }
            Self::OwnerExists => "owner already exists".to_string(),
            Self::UnknownOwner => "unknown owner".to_string(),
            Self::Unauthorized(message) => (*message).to_string(),
            Self::BadRequest(message) => message.clone(),
            Self::Store(message) => message.clone(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => Self::NotFound,
            StoreError::Validation(message) => Self::Validation(message),
            StoreError::InvalidPosition { requested, max } => {
                Self::InvalidPosition { requested, max }
            }
            StoreError::UnknownOwner => Self::UnknownOwner,
            StoreError::OwnerExists => Self::OwnerExists,
            err @ (StoreError::Io(_) | StoreError::Sql(_)) => Self::Store(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::MissingCredential => Self::Unauthorized("missing credential"),
            AuthError::UnknownCredential => Self::Unauthorized("unknown credential"),
            AuthError::ExpiredCredential => Self::Unauthorized("expired credential"),
            AuthError::Store(err) => Self::from(err),
        }
    }
}
