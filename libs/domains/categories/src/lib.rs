//! Category domain for the marketplace catalog
//!
//! Categories group products for browsing. Names are globally unique and
//! comparisons are exact: case and surrounding whitespace are significant.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  HTTP endpoints (axum)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  Business logic (validation, uniqueness, delete guard)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  Data access trait (Postgres or in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  Domain types (Category, CreateCategory, UpdateCategory)
//! └─────────────┘
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CategoryError, CategoryResult};
pub use handlers::ApiDoc;
pub use models::{Category, CreateCategory, UpdateCategory};
pub use postgres::PgCategoryRepository;
pub use repository::{CategoryRepository, InMemoryCategoryRepository};
pub use service::CategoryService;
