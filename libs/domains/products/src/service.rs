use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::repository::ProductRepository;

/// Service layer for Product business logic
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product for a seller. The category must exist and
    /// the seller must not already have a product with this name.
    pub async fn create_product(
        &self,
        input: CreateProduct,
        seller_id: Uuid,
    ) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        if !self.repository.category_exists(input.category_id).await? {
            return Err(ProductError::CategoryNotFound(input.category_id));
        }

        if self
            .repository
            .get_by_name_and_seller(seller_id, &input.name)
            .await?
            .is_some()
        {
            return Err(ProductError::DuplicateName(input.name));
        }

        self.repository.create(input, seller_id).await
    }

    /// Get a product by ID
    pub async fn get_product(&self, id: i32) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// List all products
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list().await
    }

    /// List products owned by a seller
    pub async fn list_products_by_seller(&self, seller_id: Uuid) -> ProductResult<Vec<Product>> {
        self.repository.list_by_seller(seller_id).await
    }

    /// List products in a category. The category itself must exist so
    /// that an unknown ID is distinguishable from an empty category.
    pub async fn list_products_by_category(&self, category_id: i32) -> ProductResult<Vec<Product>> {
        if !self.repository.category_exists(category_id).await? {
            return Err(ProductError::CategoryNotFound(category_id));
        }

        self.repository.list_by_category(category_id).await
    }

    /// Update a product. Only the owning seller may update it, the
    /// target category must exist, and the new name must not collide
    /// with another of the seller's products. The owner never changes.
    pub async fn update_product(
        &self,
        id: i32,
        seller_id: Uuid,
        input: UpdateProduct,
    ) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let existing = self.get_product(id).await?;
        if existing.seller_id != seller_id {
            return Err(ProductError::Unauthorized(id));
        }

        if !self.repository.category_exists(input.category_id).await? {
            return Err(ProductError::CategoryNotFound(input.category_id));
        }

        // The product's own row does not count as a collision
        let holder = self
            .repository
            .get_by_name_and_seller(seller_id, &input.name)
            .await?;
        if holder.is_some_and(|p| p.id != id) {
            return Err(ProductError::DuplicateName(input.name));
        }

        self.repository.update(id, input).await
    }

    /// Delete a product. Only the owning seller may delete it.
    pub async fn delete_product(&self, id: i32, seller_id: Uuid) -> ProductResult<()> {
        let existing = self.get_product(id).await?;
        if existing.seller_id != seller_id {
            return Err(ProductError::Unauthorized(id));
        }

        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    fn sample_product(id: i32, name: &str, seller_id: Uuid) -> Product {
        let now = chrono::Utc::now();
        Product {
            id,
            name: name.to_string(),
            description: "A test product".to_string(),
            image: "https://img.example.com/test.png".to_string(),
            price: Decimal::new(999, 2),
            stock: 3,
            category_id: 1,
            seller_id,
            category: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn create_input(name: &str, category_id: i32) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: "A test product".to_string(),
            image: "https://img.example.com/test.png".to_string(),
            price: Decimal::new(999, 2),
            stock: 3,
            category_id,
        }
    }

    fn update_input(name: &str, category_id: i32) -> UpdateProduct {
        UpdateProduct {
            name: name.to_string(),
            description: "A test product".to_string(),
            image: "https://img.example.com/test.png".to_string(),
            price: Decimal::new(999, 2),
            stock: 3,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_create_product_rejects_missing_category() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo
            .expect_category_exists()
            .with(eq(42))
            .returning(|_| Ok(false));

        let service = ProductService::new(mock_repo);
        let result = service
            .create_product(create_input("Laptop", 42), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(ProductError::CategoryNotFound(42))));
    }

    #[tokio::test]
    async fn test_create_product_rejects_duplicate_name() {
        let mut mock_repo = MockProductRepository::new();
        let seller_id = Uuid::new_v4();

        mock_repo
            .expect_category_exists()
            .with(eq(1))
            .returning(|_| Ok(true));
        mock_repo
            .expect_get_by_name_and_seller()
            .with(eq(seller_id), eq("Laptop"))
            .returning(move |_, _| Ok(Some(sample_product(3, "Laptop", seller_id))));

        let service = ProductService::new(mock_repo);
        let result = service
            .create_product(create_input("Laptop", 1), seller_id)
            .await;

        assert!(matches!(result, Err(ProductError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_create_product_rejects_negative_price() {
        // Validation fails before the repository is touched
        let mock_repo = MockProductRepository::new();

        let mut input = create_input("Laptop", 1);
        input.price = Decimal::new(-100, 2);

        let service = ProductService::new(mock_repo);
        let result = service.create_product(input, Uuid::new_v4()).await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_product_allows_zero_price_and_stock() {
        let mut mock_repo = MockProductRepository::new();
        let seller_id = Uuid::new_v4();

        mock_repo.expect_category_exists().returning(|_| Ok(true));
        mock_repo
            .expect_get_by_name_and_seller()
            .returning(|_, _| Ok(None));
        mock_repo
            .expect_create()
            .returning(|input, seller_id| {
                let mut product = sample_product(1, &input.name, seller_id);
                product.price = input.price;
                product.stock = input.stock;
                Ok(product)
            });

        let mut input = create_input("Freebie", 1);
        input.price = Decimal::ZERO;
        input.stock = 0;

        let service = ProductService::new(mock_repo);
        let product = service.create_product(input, seller_id).await.unwrap();

        assert_eq!(product.price, Decimal::ZERO);
        assert_eq!(product.stock, 0);
    }

    #[tokio::test]
    async fn test_create_product_rejects_negative_stock() {
        let mock_repo = MockProductRepository::new();

        let mut input = create_input("Laptop", 1);
        input.stock = -1;

        let service = ProductService::new(mock_repo);
        let result = service.create_product(input, Uuid::new_v4()).await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo
            .expect_get_by_id()
            .with(eq(7))
            .returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        let result = service.get_product(7).await;

        assert!(matches!(result, Err(ProductError::NotFound(7))));
    }

    #[tokio::test]
    async fn test_update_product_enforces_ownership() {
        let mut mock_repo = MockProductRepository::new();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();

        mock_repo
            .expect_get_by_id()
            .with(eq(5))
            .returning(move |id| Ok(Some(sample_product(id, "Laptop", owner))));

        let service = ProductService::new(mock_repo);
        let result = service
            .update_product(5, intruder, update_input("Laptop", 1))
            .await;

        assert!(matches!(result, Err(ProductError::Unauthorized(5))));
    }

    #[tokio::test]
    async fn test_update_product_keeps_own_name() {
        let mut mock_repo = MockProductRepository::new();
        let owner = Uuid::new_v4();

        mock_repo
            .expect_get_by_id()
            .with(eq(5))
            .returning(move |id| Ok(Some(sample_product(id, "Laptop", owner))));
        mock_repo
            .expect_category_exists()
            .with(eq(1))
            .returning(|_| Ok(true));
        // The name is held by the product itself, which is not a collision
        mock_repo
            .expect_get_by_name_and_seller()
            .with(eq(owner), eq("Laptop"))
            .returning(move |_, name| Ok(Some(sample_product(5, name, owner))));
        mock_repo
            .expect_update()
            .returning(move |id, input| {
                let mut product = sample_product(id, &input.name, owner);
                product.stock = input.stock;
                Ok(product)
            });

        let service = ProductService::new(mock_repo);
        let updated = service
            .update_product(5, owner, update_input("Laptop", 1))
            .await
            .unwrap();

        assert_eq!(updated.name, "Laptop");
    }

    #[tokio::test]
    async fn test_update_product_rejects_name_held_by_sibling() {
        let mut mock_repo = MockProductRepository::new();
        let owner = Uuid::new_v4();

        mock_repo
            .expect_get_by_id()
            .with(eq(5))
            .returning(move |id| Ok(Some(sample_product(id, "Laptop", owner))));
        mock_repo
            .expect_category_exists()
            .with(eq(1))
            .returning(|_| Ok(true));
        // Another of the seller's products already holds the new name
        mock_repo
            .expect_get_by_name_and_seller()
            .with(eq(owner), eq("Monitor"))
            .returning(move |_, name| Ok(Some(sample_product(8, name, owner))));

        let service = ProductService::new(mock_repo);
        let result = service
            .update_product(5, owner, update_input("Monitor", 1))
            .await;

        assert!(matches!(result, Err(ProductError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_update_product_rejects_missing_category() {
        let mut mock_repo = MockProductRepository::new();
        let owner = Uuid::new_v4();

        mock_repo
            .expect_get_by_id()
            .with(eq(5))
            .returning(move |id| Ok(Some(sample_product(id, "Laptop", owner))));
        mock_repo
            .expect_category_exists()
            .with(eq(99))
            .returning(|_| Ok(false));

        let service = ProductService::new(mock_repo);
        let result = service
            .update_product(5, owner, update_input("Laptop", 99))
            .await;

        assert!(matches!(result, Err(ProductError::CategoryNotFound(99))));
    }

    #[tokio::test]
    async fn test_delete_product_enforces_ownership() {
        let mut mock_repo = MockProductRepository::new();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();

        mock_repo
            .expect_get_by_id()
            .with(eq(5))
            .returning(move |id| Ok(Some(sample_product(id, "Laptop", owner))));

        let service = ProductService::new(mock_repo);
        let result = service.delete_product(5, intruder).await;

        assert!(matches!(result, Err(ProductError::Unauthorized(5))));
    }

    #[tokio::test]
    async fn test_delete_product_succeeds_for_owner() {
        let mut mock_repo = MockProductRepository::new();
        let owner = Uuid::new_v4();

        mock_repo
            .expect_get_by_id()
            .with(eq(5))
            .returning(move |id| Ok(Some(sample_product(id, "Laptop", owner))));
        mock_repo.expect_delete().with(eq(5)).returning(|_| Ok(true));

        let service = ProductService::new(mock_repo);
        assert!(service.delete_product(5, owner).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_by_category_requires_existing_category() {
        let mut mock_repo = MockProductRepository::new();

        mock_repo
            .expect_category_exists()
            .with(eq(12))
            .returning(|_| Ok(false));

        let service = ProductService::new(mock_repo);
        let result = service.list_products_by_category(12).await;

        assert!(matches!(result, Err(ProductError::CategoryNotFound(12))));
    }
}
