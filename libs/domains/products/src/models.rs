use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Custom validator rejecting negative prices. Zero is a valid price
/// (free listings).
fn validate_price(price: &Decimal) -> Result<(), validator::ValidationError> {
    if price.is_sign_negative() {
        return Err(validator::ValidationError::new("negative_price"));
    }
    Ok(())
}

/// Product entity - a listing in the marketplace catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier
    pub id: i32,
    /// Product name (unique per seller, exact comparison)
    pub name: String,
    /// Product description
    pub description: String,
    /// Image URL
    pub image: String,
    /// Price in the marketplace currency
    pub price: Decimal,
    /// Units in stock
    pub stock: i32,
    /// Category the product belongs to
    pub category_id: i32,
    /// Seller who owns the listing
    pub seller_id: Uuid,
    /// Category details, joined eagerly on reads
    pub category: Option<CategorySummary>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Category details attached to a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategorySummary {
    pub id: i32,
    pub name: String,
    pub description: String,
}

/// DTO for creating a new product. The seller comes from the request
/// identity, never from the body.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    #[validate(length(min = 1, max = 1000))]
    pub image: String,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(range(min = 0))]
    pub stock: i32,
    pub category_id: i32,
}

/// DTO for updating an existing product. All fields are required: an
/// update replaces the listing's content wholesale. The seller cannot
/// be reassigned.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    #[validate(length(min = 1, max = 1000))]
    pub image: String,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(range(min = 0))]
    pub stock: i32,
    pub category_id: i32,
}

impl Product {
    /// Apply a full-replace update. `seller_id` and `id` stay as they
    /// are, and the joined category is cleared until re-read.
    pub fn apply_update(&mut self, update: UpdateProduct) {
        self.name = update.name;
        self.description = update.description;
        self.image = update.image;
        self.price = update.price;
        self.stock = update.stock;
        if self.category_id != update.category_id {
            self.category = None;
        }
        self.category_id = update.category_id;
        self.updated_at = Utc::now();
    }
}
