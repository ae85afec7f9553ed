use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Only the list owner may do this")]
    NotOwner,

    #[error("List is not owned by or shared with you")]
    NotOwnerOrShared,

    #[error("List is not shared with you")]
    NotShared,

    #[error("Your share does not allow editing")]
    InsufficientSharePermission,

    #[error("Only the family owner may do this")]
    NotFamilyOwner,

    #[error("You are not a member of this family")]
    NotAMember,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("User is already a member of this family")]
    AlreadyMember,

    #[error("The family owner cannot be removed")]
    CannotRemoveOwner,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Inconsistent state: {0}")]
    Inconsistency(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                self.to_string(),
            ),
            AppError::NotOwner => (StatusCode::FORBIDDEN, "NOT_OWNER", self.to_string()),
            AppError::NotOwnerOrShared => (
                StatusCode::FORBIDDEN,
                "NOT_OWNER_OR_SHARED",
                self.to_string(),
            ),
            AppError::NotShared => (StatusCode::FORBIDDEN, "NOT_SHARED", self.to_string()),
            AppError::InsufficientSharePermission => (
                StatusCode::FORBIDDEN,
                "INSUFFICIENT_SHARE_PERMISSION",
                self.to_string(),
            ),
            AppError::NotFamilyOwner => {
                (StatusCode::FORBIDDEN, "NOT_FAMILY_OWNER", self.to_string())
            }
            AppError::NotAMember => (StatusCode::FORBIDDEN, "NOT_A_MEMBER", self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::AlreadyMember => (StatusCode::CONFLICT, "ALREADY_MEMBER", self.to_string()),
            AppError::CannotRemoveOwner => (
                StatusCode::CONFLICT,
                "CANNOT_REMOVE_OWNER",
                self.to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                msg.clone(),
            ),
            AppError::Inconsistency(msg) => {
                // Partial-write bugs must be visible to operators, never downgraded
                // to an ordinary validation failure.
                tracing::error!("Inconsistent state detected: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INCONSISTENT_STATE",
                    "The operation left the store in an inconsistent state".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Jwt(e) => {
                tracing::warn!("JWT error: {:?}", e);
                (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_TOKEN",
                    "Invalid or expired token".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
