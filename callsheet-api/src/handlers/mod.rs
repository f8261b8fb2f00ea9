pub mod agents;
pub mod auth;
pub mod lists;

use crate::error::ApiError;
use uuid::Uuid;

/// Parses a path segment as a UUID, answering 400 with `Invalid {label} ID`.
pub(crate) fn parse_id(raw: &str, label: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation(format!("Invalid {} ID", label)))
}
