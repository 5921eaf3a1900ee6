use crate::auth::Role;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::error::ServiceError;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No validated bearer token on the request
    #[error("Authentication required")]
    Unauthenticated,

    /// The caller is authenticated but lacks the role
    #[error("Requires the {0} role")]
    MissingRole(Role),

    /// JSON body that could not be read into the request type
    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    /// Per-field messages, present on validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::MissingRole(_) => StatusCode::FORBIDDEN,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Service(err) => match err {
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ServiceError::Conflict(_) => StatusCode::CONFLICT,
                ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
                ServiceError::Internal(_) | ServiceError::Database(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Message safe to show the caller; storage details never leave the server
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Service(ServiceError::Validation(_)) => {
                "Please correct the highlighted fields".to_string()
            }
            ApiError::Service(ServiceError::Internal(_) | ServiceError::Database(_)) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    pub(crate) fn log(&self) {
        match self {
            ApiError::Service(ServiceError::Internal(_) | ServiceError::Database(_)) => {
                error!("Internal service error: {self}");
            }
            ApiError::Service(ServiceError::Conflict(_) | ServiceError::Forbidden(_)) => {
                warn!("Rejected request: {self}");
            }
            ApiError::Unauthenticated | ApiError::MissingRole(_) => {
                info!("Authorization error: {self}");
            }
            _ => debug!("Client error: {self}"),
        }
    }
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        let message = err.user_message();
        let fields = match err {
            ApiError::Service(ServiceError::Validation(fields)) => Some(fields),
            _ => None,
        };
        Self { message, fields }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod test {
    use super::*;
    use database::error::FieldErrors;
    use sea_orm::DbErr;

    #[test]
    fn test_database_errors_stay_private() {
        let err = ApiError::from(ServiceError::Database(DbErr::Custom(
            "relation \"students\" does not exist".to_string(),
        )));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = ErrorResponse::from(err);
        assert_eq!(body.message, "Internal server error");
        assert!(body.fields.is_none());
    }

    #[test]
    fn test_validation_carries_fields() {
        let fields = FieldErrors::from([("code".to_string(), "taken".to_string())]);
        let err = ApiError::from(ServiceError::Validation(fields));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = ErrorResponse::from(err);
        assert_eq!(body.fields.unwrap()["code"], "taken");
    }

    #[test]
    fn test_not_found_message() {
        let err = ApiError::from(ServiceError::not_found("Student", 42));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.user_message(), "Student 42 not found");
    }
}
