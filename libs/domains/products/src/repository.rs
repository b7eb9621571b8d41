use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use domain_categories::repository::{CategoryRepository, InMemoryCategoryRepository};

use crate::error::{ProductError, ProductResult};
use crate::models::{CategorySummary, CreateProduct, Product, UpdateProduct};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product owned by the given seller
    async fn create(&self, input: CreateProduct, seller_id: Uuid) -> ProductResult<Product>;

    /// Get a product by ID with its category joined
    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>>;

    /// List all products with their categories joined
    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// List products owned by a seller
    async fn list_by_seller(&self, seller_id: Uuid) -> ProductResult<Vec<Product>>;

    /// List products in a category
    async fn list_by_category(&self, category_id: i32) -> ProductResult<Vec<Product>>;

    /// Update an existing product (full replace, seller unchanged)
    async fn update(&self, id: i32, input: UpdateProduct) -> ProductResult<Product>;

    /// Delete a product by ID, returning whether a row was removed
    async fn delete(&self, id: i32) -> ProductResult<bool>;

    /// Find the product a seller already lists under this name, if any.
    /// Comparison is exact.
    async fn get_by_name_and_seller(
        &self,
        seller_id: Uuid,
        name: &str,
    ) -> ProductResult<Option<Product>>;

    /// Check if a category exists
    async fn category_exists(&self, category_id: i32) -> ProductResult<bool>;
}

/// In-memory implementation of ProductRepository (for development/testing).
/// Backed by an in-memory category repository so referential checks and
/// the eager category join behave like the real store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<i32, Product>>>,
    categories: InMemoryCategoryRepository,
    next_id: Arc<AtomicI32>,
}

impl InMemoryProductRepository {
    pub fn new(categories: InMemoryCategoryRepository) -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
            categories,
            next_id: Arc::new(AtomicI32::new(1)),
        }
    }

    fn internal(err: domain_categories::CategoryError) -> ProductError {
        ProductError::Internal(format!("Category lookup failed: {}", err))
    }

    async fn category_summary(&self, category_id: i32) -> ProductResult<Option<CategorySummary>> {
        let category = self
            .categories
            .get_by_id(category_id)
            .await
            .map_err(Self::internal)?;

        Ok(category.map(|c| CategorySummary {
            id: c.id,
            name: c.name,
            description: c.description,
        }))
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct, seller_id: Uuid) -> ProductResult<Product> {
        // Mirrors fk_products_category_id
        let category = self.category_summary(input.category_id).await?;
        if category.is_none() {
            return Err(ProductError::CategoryNotFound(input.category_id));
        }

        let mut products = self.products.write().await;

        // Mirrors the unique index on products(seller_id, name)
        let name_exists = products
            .values()
            .any(|p| p.seller_id == seller_id && p.name == input.name);
        if name_exists {
            return Err(ProductError::DuplicateName(input.name));
        }

        let now = chrono::Utc::now();
        let product = Product {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: input.name,
            description: input.description,
            image: input.image,
            price: input.price,
            stock: input.stock,
            category_id: input.category_id,
            seller_id,
            category,
            created_at: now,
            updated_at: now,
        };
        products.insert(product.id, product.clone());
        // Keeps has_products and the category delete guard accurate
        self.categories.mark_in_use(product.category_id).await;

        tracing::info!(product_id = product.id, seller_id = %seller_id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let product = { self.products.read().await.get(&id).cloned() };

        match product {
            Some(mut product) => {
                product.category = self.category_summary(product.category_id).await?;
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        let mut result: Vec<Product> = { self.products.read().await.values().cloned().collect() };
        result.sort_by_key(|p| p.id);

        for product in &mut result {
            product.category = self.category_summary(product.category_id).await?;
        }

        Ok(result)
    }

    async fn list_by_seller(&self, seller_id: Uuid) -> ProductResult<Vec<Product>> {
        let mut result: Vec<Product> = {
            self.products
                .read()
                .await
                .values()
                .filter(|p| p.seller_id == seller_id)
                .cloned()
                .collect()
        };
        result.sort_by_key(|p| p.id);

        for product in &mut result {
            product.category = self.category_summary(product.category_id).await?;
        }

        Ok(result)
    }

    async fn list_by_category(&self, category_id: i32) -> ProductResult<Vec<Product>> {
        let category = self.category_summary(category_id).await?;

        let mut result: Vec<Product> = {
            self.products
                .read()
                .await
                .values()
                .filter(|p| p.category_id == category_id)
                .cloned()
                .collect()
        };
        result.sort_by_key(|p| p.id);

        for product in &mut result {
            product.category = category.clone();
        }

        Ok(result)
    }

    async fn update(&self, id: i32, input: UpdateProduct) -> ProductResult<Product> {
        let category = self.category_summary(input.category_id).await?;
        if category.is_none() {
            return Err(ProductError::CategoryNotFound(input.category_id));
        }

        let mut products = self.products.write().await;

        let seller_id = products
            .get(&id)
            .ok_or(ProductError::NotFound(id))?
            .seller_id;

        let name_exists = products
            .values()
            .any(|p| p.id != id && p.seller_id == seller_id && p.name == input.name);
        if name_exists {
            return Err(ProductError::DuplicateName(input.name));
        }

        let product = products.get_mut(&id).ok_or(ProductError::NotFound(id))?;
        let old_category_id = product.category_id;
        product.apply_update(input);
        product.category = category;
        let updated = product.clone();

        if old_category_id != updated.category_id {
            self.categories.release(old_category_id).await;
            self.categories.mark_in_use(updated.category_id).await;
        }

        tracing::info!(product_id = id, "Updated product");
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let removed = { self.products.write().await.remove(&id) };

        if let Some(product) = removed {
            self.categories.release(product.category_id).await;
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn get_by_name_and_seller(
        &self,
        seller_id: Uuid,
        name: &str,
    ) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        let found = products
            .values()
            .find(|p| p.seller_id == seller_id && p.name == name)
            .cloned();
        Ok(found)
    }

    async fn category_exists(&self, category_id: i32) -> ProductResult<bool> {
        Ok(self.category_summary(category_id).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_categories::{CategoryError, CategoryService, CreateCategory};
    use rust_decimal::Decimal;

    async fn setup() -> (InMemoryProductRepository, i32) {
        let categories = InMemoryCategoryRepository::new();
        let category = categories
            .create(CreateCategory {
                name: "Electronics".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();

        (InMemoryProductRepository::new(categories), category.id)
    }

    fn create_input(name: &str, category_id: i32) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: "A test product".to_string(),
            image: "https://img.example.com/test.png".to_string(),
            price: Decimal::new(1999, 2),
            stock: 5,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_product() {
        let (repo, category_id) = setup().await;
        let seller_id = Uuid::new_v4();

        let product = repo
            .create(create_input("Laptop", category_id), seller_id)
            .await
            .unwrap();
        assert_eq!(product.name, "Laptop");
        assert_eq!(product.seller_id, seller_id);

        let fetched = repo.get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, product.id);

        // Category join is populated
        let category = fetched.category.unwrap();
        assert_eq!(category.id, category_id);
        assert_eq!(category.name, "Electronics");
    }

    #[tokio::test]
    async fn test_create_with_missing_category_fails() {
        let (repo, _) = setup().await;

        let result = repo.create(create_input("Laptop", 999), Uuid::new_v4()).await;
        assert!(matches!(result, Err(ProductError::CategoryNotFound(999))));
    }

    #[tokio::test]
    async fn test_duplicate_name_per_seller() {
        let (repo, category_id) = setup().await;
        let seller_id = Uuid::new_v4();

        repo.create(create_input("Laptop", category_id), seller_id)
            .await
            .unwrap();

        let result = repo.create(create_input("Laptop", category_id), seller_id).await;
        assert!(matches!(result, Err(ProductError::DuplicateName(_))));

        // A different seller can use the same name
        repo.create(create_input("Laptop", category_id), Uuid::new_v4())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_by_seller_filters() {
        let (repo, category_id) = setup().await;
        let seller_a = Uuid::new_v4();
        let seller_b = Uuid::new_v4();

        repo.create(create_input("A1", category_id), seller_a)
            .await
            .unwrap();
        repo.create(create_input("A2", category_id), seller_a)
            .await
            .unwrap();
        repo.create(create_input("B1", category_id), seller_b)
            .await
            .unwrap();

        let listed = repo.list_by_seller(seller_a).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|p| p.seller_id == seller_a));
    }

    #[tokio::test]
    async fn test_update_keeps_seller() {
        let (repo, category_id) = setup().await;
        let seller_id = Uuid::new_v4();

        let product = repo
            .create(create_input("Phone", category_id), seller_id)
            .await
            .unwrap();

        let updated = repo
            .update(
                product.id,
                UpdateProduct {
                    name: "Phone Pro".to_string(),
                    description: "Updated listing".to_string(),
                    image: "https://img.example.com/phone-pro.png".to_string(),
                    price: Decimal::new(49900, 2),
                    stock: 2,
                    category_id,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Phone Pro");
        assert_eq!(updated.seller_id, seller_id);
    }

    #[tokio::test]
    async fn test_category_delete_guard_follows_product_lifecycle() {
        let categories = InMemoryCategoryRepository::new();
        let category = categories
            .create(CreateCategory {
                name: "Electronics".to_string(),
                description: "Gadgets".to_string(),
            })
            .await
            .unwrap();

        let repo = InMemoryProductRepository::new(categories.clone());
        let product = repo
            .create(create_input("Laptop", category.id), Uuid::new_v4())
            .await
            .unwrap();

        // A category with products cannot be deleted and stays retrievable
        let service = CategoryService::new(categories.clone());
        let result = service.delete_category(category.id).await;
        assert!(matches!(result, Err(CategoryError::HasProducts(_))));
        assert!(categories.get_by_id(category.id).await.unwrap().is_some());

        // Removing the last product frees the category
        assert!(repo.delete(product.id).await.unwrap());
        service.delete_category(category.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_moves_delete_guard_to_new_category() {
        let categories = InMemoryCategoryRepository::new();
        let first = categories
            .create(CreateCategory {
                name: "Electronics".to_string(),
                description: "Gadgets".to_string(),
            })
            .await
            .unwrap();
        let second = categories
            .create(CreateCategory {
                name: "Office".to_string(),
                description: "Desk gear".to_string(),
            })
            .await
            .unwrap();

        let repo = InMemoryProductRepository::new(categories.clone());
        let product = repo
            .create(create_input("Monitor", first.id), Uuid::new_v4())
            .await
            .unwrap();

        repo.update(
            product.id,
            UpdateProduct {
                name: "Monitor".to_string(),
                description: "Moved to office".to_string(),
                image: "https://img.example.com/monitor.png".to_string(),
                price: Decimal::new(12900, 2),
                stock: 1,
                category_id: second.id,
            },
        )
        .await
        .unwrap();

        // The old category is free again, the new one is guarded
        assert!(categories.delete(first.id).await.unwrap());
        let result = categories.delete(second.id).await;
        assert!(matches!(result, Err(CategoryError::HasProducts(_))));
    }
}
