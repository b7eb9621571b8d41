use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(i32),

    #[error("Category not found: {0}")]
    CategoryNotFound(i32),

    #[error("Product with name '{0}' already exists for this seller")]
    DuplicateName(String),

    #[error("Seller does not own product {0}")]
    Unauthorized(i32),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            // A missing category is a bad reference in the request, not
            // a missing resource at the requested URL
            ProductError::CategoryNotFound(id) => {
                AppError::BadRequest(format!("Category {} does not exist", id))
            }
            ProductError::DuplicateName(name) => AppError::Conflict(format!(
                "Product with name '{}' already exists for this seller",
                name
            )),
            ProductError::Unauthorized(id) => {
                AppError::Forbidden(format!("Access denied to product {}", id))
            }
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        // Convert to AppError for standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
