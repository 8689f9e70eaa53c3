//! HTTP error mapping.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pumapal_api::ErrorBody;
use pumapal_storage::{MembershipError, StoreError, ValidationError};
use thiserror::Error;

pub const GROUP_NOT_FOUND: &str = "Group not found";
pub const NOT_OWNER: &str = "Only the group owner can edit this group";
pub const CONCURRENT_MODIFICATION: &str = "Group was modified concurrently, please retry";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Infrastructure failure. `message` goes to the caller, `detail` only to the log.
    #[error("{message}: {detail}")]
    Internal { message: String, detail: String },
}

impl ApiError {
    pub fn group_not_found() -> Self {
        ApiError::NotFound(GROUP_NOT_FOUND.to_string())
    }

    pub fn concurrent_modification() -> Self {
        ApiError::Conflict(CONCURRENT_MODIFICATION.to_string())
    }

    /// Map a store failure during `action` (e.g. "Failed to join group").
    pub fn from_store(action: &str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::group_not_found(),
            StoreError::Conflict => Self::concurrent_modification(),
            StoreError::Backend(detail) => ApiError::Internal {
                message: action.to_string(),
                detail,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<MembershipError> for ApiError {
    fn from(e: MembershipError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

/// Unreadable bodies (bad JSON, wrong field types, missing content type) are bad requests.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// `Json<T>` whose rejections answer with the usual `{error}` body.
pub struct JsonBody<T>(pub T);

#[async_trait::async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal { message, detail } => {
                tracing::error!(error = %detail, "{}", message);
                message
            }
            ApiError::BadRequest(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m) => m,
        };
        (status, Json(ErrorBody::new(message))).into_response()
    }
}
