use std::sync::Arc;
use validator::Validate;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;

/// Service layer for Category business logic
#[derive(Clone)]
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new category with validation and name uniqueness checking
    pub async fn create_category(&self, input: CreateCategory) -> CategoryResult<Category> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        if self.repository.exists_with_name(&input.name, None).await? {
            return Err(CategoryError::DuplicateName(input.name));
        }

        self.repository.create(input).await
    }

    /// Get a category by ID
    pub async fn get_category(&self, id: i32) -> CategoryResult<Category> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    /// List all categories
    pub async fn list_categories(&self) -> CategoryResult<Vec<Category>> {
        self.repository.list().await
    }

    /// Update a category. The name must not collide with any other
    /// category, but keeping the current name is allowed.
    pub async fn update_category(
        &self,
        id: i32,
        input: UpdateCategory,
    ) -> CategoryResult<Category> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        if self.repository.get_by_id(id).await?.is_none() {
            return Err(CategoryError::NotFound(id));
        }

        if self
            .repository
            .exists_with_name(&input.name, Some(id))
            .await?
        {
            return Err(CategoryError::DuplicateName(input.name));
        }

        self.repository.update(id, input).await
    }

    /// Delete a category, refusing while products still reference it
    pub async fn delete_category(&self, id: i32) -> CategoryResult<()> {
        if self.repository.get_by_id(id).await?.is_none() {
            return Err(CategoryError::NotFound(id));
        }

        if self.repository.has_products(id).await? {
            return Err(CategoryError::HasProducts(id));
        }

        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(CategoryError::NotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCategoryRepository;
    use mockall::predicate::eq;

    fn sample_category(id: i32, name: &str) -> Category {
        let now = chrono::Utc::now();
        Category {
            id,
            name: name.to_string(),
            description: "Things".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_category_rejects_duplicate_name() {
        let mut mock_repo = MockCategoryRepository::new();

        mock_repo
            .expect_exists_with_name()
            .with(eq("Electronics"), eq(None::<i32>))
            .returning(|_, _| Ok(true));

        let service = CategoryService::new(mock_repo);
        let result = service
            .create_category(CreateCategory {
                name: "Electronics".to_string(),
                description: String::new(),
            })
            .await;

        assert!(matches!(result, Err(CategoryError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_create_category_rejects_empty_name() {
        // Validation fails before the repository is touched
        let mock_repo = MockCategoryRepository::new();

        let service = CategoryService::new(mock_repo);
        let result = service
            .create_category(CreateCategory {
                name: String::new(),
                description: String::new(),
            })
            .await;

        assert!(matches!(result, Err(CategoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_category_succeeds() {
        let mut mock_repo = MockCategoryRepository::new();

        mock_repo
            .expect_exists_with_name()
            .with(eq("Books"), eq(None::<i32>))
            .returning(|_, _| Ok(false));
        mock_repo
            .expect_create()
            .returning(|input| Ok(sample_category(1, &input.name)));

        let service = CategoryService::new(mock_repo);
        let category = service
            .create_category(CreateCategory {
                name: "Books".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();

        assert_eq!(category.name, "Books");
    }

    #[tokio::test]
    async fn test_get_category_not_found() {
        let mut mock_repo = MockCategoryRepository::new();

        mock_repo
            .expect_get_by_id()
            .with(eq(42))
            .returning(|_| Ok(None));

        let service = CategoryService::new(mock_repo);
        let result = service.get_category(42).await;

        assert!(matches!(result, Err(CategoryError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_update_category_keeps_own_name() {
        let mut mock_repo = MockCategoryRepository::new();

        mock_repo
            .expect_get_by_id()
            .with(eq(7))
            .returning(|_| Ok(Some(sample_category(7, "Garden"))));
        // The category's own row is excluded from the collision check
        mock_repo
            .expect_exists_with_name()
            .with(eq("Garden"), eq(Some(7)))
            .returning(|_, _| Ok(false));
        mock_repo
            .expect_update()
            .returning(|id, input| Ok(sample_category(id, &input.name)));

        let service = CategoryService::new(mock_repo);
        let updated = service
            .update_category(
                7,
                UpdateCategory {
                    name: "Garden".to_string(),
                    description: "Updated".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Garden");
    }

    #[tokio::test]
    async fn test_update_category_rejects_taken_name() {
        let mut mock_repo = MockCategoryRepository::new();

        mock_repo
            .expect_get_by_id()
            .with(eq(7))
            .returning(|_| Ok(Some(sample_category(7, "Garden"))));
        mock_repo
            .expect_exists_with_name()
            .with(eq("Books"), eq(Some(7)))
            .returning(|_, _| Ok(true));

        let service = CategoryService::new(mock_repo);
        let result = service
            .update_category(
                7,
                UpdateCategory {
                    name: "Books".to_string(),
                    description: String::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(CategoryError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_delete_category_with_products_is_conflict() {
        let mut mock_repo = MockCategoryRepository::new();

        mock_repo
            .expect_get_by_id()
            .with(eq(3))
            .returning(|_| Ok(Some(sample_category(3, "Toys"))));
        mock_repo
            .expect_has_products()
            .with(eq(3))
            .returning(|_| Ok(true));

        let service = CategoryService::new(mock_repo);
        let result = service.delete_category(3).await;

        assert!(matches!(result, Err(CategoryError::HasProducts(3))));
    }

    #[tokio::test]
    async fn test_delete_category_succeeds_when_empty() {
        let mut mock_repo = MockCategoryRepository::new();

        mock_repo
            .expect_get_by_id()
            .with(eq(3))
            .returning(|_| Ok(Some(sample_category(3, "Toys"))));
        mock_repo
            .expect_has_products()
            .with(eq(3))
            .returning(|_| Ok(false));
        mock_repo.expect_delete().with(eq(3)).returning(|_| Ok(true));

        let service = CategoryService::new(mock_repo);
        assert!(service.delete_category(3).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_category_not_found() {
        let mut mock_repo = MockCategoryRepository::new();

        mock_repo
            .expect_get_by_id()
            .with(eq(99))
            .returning(|_| Ok(None));

        let service = CategoryService::new(mock_repo);
        let result = service.delete_category(99).await;

        assert!(matches!(result, Err(CategoryError::NotFound(99))));
    }
}
