//! Custom extractors for Axum handlers.
//!
//! This module provides reusable extractors that reduce boilerplate
//! and standardize error handling across your API.

pub mod int_path;
pub mod seller_id;
pub mod validated_json;

pub use int_path::IntPath;
pub use seller_id::{SELLER_ID_HEADER, SellerId};
pub use validated_json::ValidatedJson;
