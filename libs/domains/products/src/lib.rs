//! Product domain for the marketplace catalog
//!
//! Products belong to exactly one category and one seller. Names are
//! unique per seller (exact comparison), and only the owning seller may
//! update or delete a listing. The seller is never changed by an update.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  HTTP endpoints (axum), seller identity from header
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  Business logic (validation, ownership, category check)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  Data access trait (Postgres or in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  Domain types (Product, CreateProduct, UpdateProduct)
//! └─────────────┘
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{CategorySummary, CreateProduct, Product, UpdateProduct};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
