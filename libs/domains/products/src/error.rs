use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::error::{ErrorKind, WriteError, WriteFailure};
use thiserror::Error;

/// Mongo server code for a unique index violation
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product with ID '{0}' not found")]
    NotFound(String),

    #[error("Invalid product ID format: '{0}'")]
    InvalidId(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Insertion(String),

    #[error("{0}")]
    Update(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl ProductError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProductError::NotFound(_) => StatusCode::NOT_FOUND,
            ProductError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ProductError::Validation(_)
            | ProductError::Insertion(_)
            | ProductError::Update(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ProductError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        let message = err.to_string();
        match err {
            ProductError::NotFound(_) => AppError::NotFound(message),
            ProductError::InvalidId(_) => AppError::InvalidId(message),
            ProductError::Validation(_) => AppError::Validation(message),
            ProductError::Insertion(_) | ProductError::Update(_) => {
                AppError::UnprocessableEntity(message)
            }
            ProductError::Database(detail) => AppError::Database(detail),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ProductError {
    fn from(err: validator::ValidationErrors) -> Self {
        ProductError::Validation(err.to_string())
    }
}

/// True when the driver reports a unique index violation.
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError {
            code: DUPLICATE_KEY_CODE,
            ..
        }))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ProductError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ProductError::InvalidId("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProductError::Validation("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ProductError::Insertion("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ProductError::Update("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ProductError::Database("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ProductError::NotFound("abc".into()).to_string(),
            "Product with ID 'abc' not found"
        );
        assert_eq!(
            ProductError::InvalidId("bad-id".into()).to_string(),
            "Invalid product ID format: 'bad-id'"
        );
        assert_eq!(
            ProductError::Update("No fields to update".into()).to_string(),
            "No fields to update"
        );
    }

    #[test]
    fn test_response_status_matches_status_code() {
        let errors = [
            ProductError::NotFound("a".into()),
            ProductError::InvalidId("b".into()),
            ProductError::Validation("c".into()),
            ProductError::Insertion("d".into()),
            ProductError::Update("e".into()),
            ProductError::Database("f".into()),
        ];

        for err in errors {
            let expected = err.status_code();
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
