//! Seller identity extractor.
//!
//! The API trusts the edge to authenticate callers; the seller identity
//! arrives as an opaque UUID in the `x-seller-id` header. This extractor
//! rejects requests where the header is missing or malformed.

use crate::errors::AppError;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Header carrying the acting seller's identity.
pub const SELLER_ID_HEADER: &str = "x-seller-id";

/// Extractor for the acting seller's identity.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::SellerId;
///
/// async fn my_products(SellerId(seller_id): SellerId) -> String {
///     format!("Products of seller {}", seller_id)
/// }
/// ```
pub struct SellerId(pub Uuid);

impl<S> FromRequestParts<S> for SellerId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(SELLER_ID_HEADER)
            .and_then(|v| v.to_str().ok());

        match header {
            Some(value) => match Uuid::parse_str(value) {
                Ok(id) => Ok(SellerId(id)),
                Err(_) => Err(AppError::Unauthorized(format!(
                    "Invalid {} header",
                    SELLER_ID_HEADER
                ))
                .into_response()),
            },
            None => Err(AppError::Unauthorized(format!(
                "Missing {} header",
                SELLER_ID_HEADER
            ))
            .into_response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    async fn whoami(SellerId(id): SellerId) -> String {
        id.to_string()
    }

    fn app() -> Router {
        Router::new().route("/whoami", get(whoami))
    }

    #[tokio::test]
    async fn test_seller_id_accepts_valid_uuid() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(SELLER_ID_HEADER, Uuid::new_v4().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_seller_id_rejects_missing_header() {
        let response = app()
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_seller_id_rejects_malformed_uuid() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(SELLER_ID_HEADER, "not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
