use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::profiles::StoreError;

/// # Errors returned by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("profile not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Returns a short stable label (snake_case), sent as the `code` field.
    pub fn as_label(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::Store(err) => err.as_label(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::InvalidEmail { .. }) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.to_string(),
            "code": self.as_label(),
        });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        let store = ApiError::from(StoreError::InvalidEmail { email: String::new() });
        assert_eq!(store.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.as_label(), "invalid_email");
    }
}
