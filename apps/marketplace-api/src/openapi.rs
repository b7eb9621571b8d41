//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Marketplace API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace API",
        version = "0.1.0",
        description = "Multi-seller marketplace catalog API (categories and products)",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/categories", api = domain_categories::ApiDoc),
        (path = "/api/products", api = domain_products::ApiDoc)
    ),
    tags(
        (name = "Categories", description = "Category management endpoints"),
        (name = "Products", description = "Product management endpoints")
    )
)]
pub struct ApiDoc;
