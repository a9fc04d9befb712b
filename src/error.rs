use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::api::envelope::ApiResponse;

/// Errors surfaced by the demo services and rendered as JSON envelopes.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("worker error: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),
}

pub type DemoResult<T> = Result<T, DemoError>;

impl DemoError {
    /// Application-level code carried in the envelope next to the HTTP status.
    pub fn code(&self) -> u16 {
        match self {
            DemoError::NotFound(_) => 40400,
            DemoError::InvalidInput(_) => 40000,
            DemoError::Conflict(_) => 40900,
            DemoError::Io(_) => 50001,
            DemoError::Json(_) => 50002,
            DemoError::Blocking(_) => 50003,
        }
    }
}

impl ResponseError for DemoError {
    fn status_code(&self) -> StatusCode {
        match self {
            DemoError::NotFound(_) => StatusCode::NOT_FOUND,
            DemoError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DemoError::Conflict(_) => StatusCode::CONFLICT,
            DemoError::Io(_) | DemoError::Json(_) | DemoError::Blocking(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::failure(
            self.code(),
            self.to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::DemoError;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    #[test]
    fn not_found_maps_to_404() {
        let err = DemoError::NotFound("article 42".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), 40400);
        assert_eq!(err.to_string(), "article 42 not found");
    }

    #[test]
    fn invalid_input_maps_to_400() {
        let err = DemoError::InvalidInput("difficulty must be 0..=7".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
