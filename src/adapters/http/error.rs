use crate::utils::error::{ErrorCategory, LibraryError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

impl LibraryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LibraryError::NotFound { .. } | LibraryError::BorrowingRecordNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            LibraryError::AlreadyBorrowed { .. } | LibraryError::DuplicateIsbn { .. } => {
                StatusCode::CONFLICT
            }
            LibraryError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            LibraryError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LibraryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self.category() {
            ErrorCategory::Internal | ErrorCategory::Configuration => {
                tracing::error!(
                    error.cause_chain = ?self,
                    error.message = %self,
                    "Unexpected error happened"
                );
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
