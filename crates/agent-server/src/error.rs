use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use agent_core::{RunnerError, SessionError};

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("message must not be empty")]
    EmptyMessage,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Session store error: {0}")]
    Session(#[from] SessionError),

    #[error("Agent run failed: {0}")]
    Runner(RunnerError),
}

impl From<RunnerError> for ApiError {
    fn from(err: RunnerError) -> Self {
        match err {
            // The handler verifies the session first, but the runner races
            // against concurrent deletes.
            RunnerError::SessionNotFound(_) => ApiError::SessionNotFound,
            other => ApiError::Runner(other),
        }
    }
}

#[derive(Serialize)]
struct JsonError {
    message: String,
    r#type: String,
}

#[derive(Serialize)]
struct JsonErrorWrapper {
    error: JsonError,
}

impl ApiError {
    fn error_type(&self) -> &'static str {
        match self {
            ApiError::EmptyMessage => "validation_error",
            ApiError::SessionNotFound => "not_found",
            ApiError::Session(_) | ApiError::Runner(_) => "api_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::EmptyMessage => StatusCode::BAD_REQUEST,
            ApiError::SessionNotFound => StatusCode::NOT_FOUND,
            ApiError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Runner(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_response = JsonErrorWrapper {
            error: JsonError {
                message: self.to_string(),
                r#type: self.error_type().to_string(),
            },
        };
        HttpResponse::build(self.status_code()).json(error_response)
    }
}
