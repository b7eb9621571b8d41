//! API routes module

pub mod health;

use axum::Router;
use domain_categories::{CategoryService, PgCategoryRepository};
use domain_products::{PgProductRepository, ProductService};
use sea_orm::DatabaseConnection;

/// Create all API routes backed by the given database connection
pub fn routes(db: &DatabaseConnection) -> Router {
    let category_service = CategoryService::new(PgCategoryRepository::new(db.clone()));
    let product_service = ProductService::new(PgProductRepository::new(db.clone()));

    Router::new()
        .nest("/categories", domain_categories::handlers::router(category_service))
        .nest("/products", domain_products::handlers::router(product_service))
}
