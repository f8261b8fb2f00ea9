use crate::database::DbError;
use crate::distribution::DistributionError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use extractors::ParseError;
use shared_types::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("No agents available for distribution")]
    NoAgentsAvailable,

    #[error("{0}")]
    Persistence(String),

    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::UnsupportedFormat(_)
            | ApiError::NoAgentsAvailable => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Persistence(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self);
        }

        // Debug detail stays out of release builds
        let detail = cfg!(debug_assertions).then(|| format!("{:?}", self));
        HttpResponse::build(status).json(ApiResponse::failure(self.to_string()).with_detail(detail))
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            DbError::Duplicate(msg) => ApiError::Validation(msg),
            other => ApiError::Persistence(other.to_string()),
        }
    }
}

impl From<ParseError> for ApiError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::UnsupportedFormat(_) => ApiError::UnsupportedFormat(e.to_string()),
            other => ApiError::Validation(format!("Could not read uploaded file: {}", other)),
        }
    }
}

impl From<DistributionError> for ApiError {
    fn from(e: DistributionError) -> Self {
        match e {
            DistributionError::NoAgentsAvailable => ApiError::NoAgentsAvailable,
        }
    }
}
