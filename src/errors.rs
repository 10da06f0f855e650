use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::JsonResponse;

/// Failures raised by the catalog and its storage backends.
///
/// Missing records are not errors here: lookups return `Ok(None)` or an empty
/// list. The "not found"s that are errors come from commenting: on an article
/// that does not exist, or as a user that does not exist.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("article not found")]
    ArticleNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

#[derive(Debug)]
pub enum RequestError {
    NotFound(&'static str),
    BadRequest(&'static str),
    Validation {
        message: &'static str,
        errors: Vec<String>,
    },
    Conflict(String),
    ServerError(&'static str),
}

#[derive(Debug, Serialize)]
pub struct RequestErrorJson {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
}

impl RequestErrorJson {
    pub fn new(message: &str) -> RequestErrorJson {
        RequestErrorJson {
            message: message.to_string(),
            errors: None,
        }
    }

    pub fn with_errors(message: &str, errors: Vec<String>) -> RequestErrorJson {
        RequestErrorJson {
            message: message.to_string(),
            errors: Some(errors),
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    /// Maps a catalog failure onto a response. `context` is the message shown
    /// to the client when the failure is internal; the detail is only logged.
    pub fn from_catalog(error: CatalogError, context: &'static str) -> RequestError {
        match error {
            CatalogError::ArticleNotFound => RequestError::NotFound("Article not found"),
            CatalogError::UserNotFound => RequestError::BadRequest("User not found"),
            CatalogError::Conflict(message) => RequestError::Conflict(message),
            error @ (CatalogError::Storage(_) | CatalogError::Hashing(_)) => {
                tracing::error!(%error, "{}", context);
                RequestError::ServerError(context)
            }
        }
    }

    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJson> {
        let (status_code, json) = match self {
            RequestError::NotFound(message) => {
                (StatusCode::NOT_FOUND, RequestErrorJson::new(message))
            }
            RequestError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, RequestErrorJson::new(message))
            }
            RequestError::Validation { message, errors } => (
                StatusCode::BAD_REQUEST,
                RequestErrorJson::with_errors(message, errors.clone()),
            ),
            RequestError::Conflict(message) => {
                (StatusCode::CONFLICT, RequestErrorJson::new(message))
            }
            RequestError::ServerError(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                RequestErrorJson::new(message),
            ),
        };
        (status_code, Json(json))
    }
}
