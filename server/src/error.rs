//! Error handling
//!
//! [`ServiceError`] is what every manager operation and handler returns. It
//! renders as `{"error": <message>, "code": <CODE>, "status": <http status>}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use diabetes_learning::LearningError;
use serde_json::json;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// A required input field is absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field is present but cannot be read as a finite number.
    #[error("Invalid input data: {field} must be a number, got {value}")]
    InvalidInput { field: &'static str, value: String },

    /// The request body is not a JSON object.
    #[error("Invalid input data: {0}")]
    InvalidBody(String),

    /// No model is being served.
    #[error("Model not loaded. Please check if the model is trained properly.")]
    ModelUnavailable,

    /// Startup failed earlier; the manager will not serve.
    #[error("Model initialization failed: {0}")]
    InitializationFailed(String),

    /// Loading, training or saving a model failed.
    #[error("Failed to retrain model: {0}")]
    Training(#[from] LearningError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::ModelUnavailable => "MODEL_UNAVAILABLE",
            Self::InitializationFailed(_) => "INITIALIZATION_FAILED",
            Self::Training(err) => err.error_code(),
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingField(_) | Self::InvalidInput { .. } | Self::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::ModelUnavailable
            | Self::InitializationFailed(_)
            | Self::Training(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{self}");
        } else {
            tracing::debug!(code = self.error_code(), "{self}");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.error_code(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_bad_request() {
        assert_eq!(
            ServiceError::MissingField("glucose").status_code(),
            StatusCode::BAD_REQUEST
        );
        let err = ServiceError::InvalidInput {
            field: "glucose",
            value: "\"abc\"".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_missing_field_message() {
        assert_eq!(
            ServiceError::MissingField("age").to_string(),
            "Missing required field: age"
        );
    }

    #[test]
    fn test_training_error_keeps_inner_code() {
        let err = ServiceError::from(LearningError::TrainingFailed("empty".to_string()));
        assert_eq!(err.error_code(), "TRAINING_FAILED");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Failed to retrain model"));
    }

    #[test]
    fn test_model_unavailable_is_server_error() {
        let err = ServiceError::ModelUnavailable;
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "MODEL_UNAVAILABLE");
    }
}
