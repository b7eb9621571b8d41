use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{Category, CreateCategory, UpdateCategory};

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category>;

    /// Get a category by ID
    async fn get_by_id(&self, id: i32) -> CategoryResult<Option<Category>>;

    /// List all categories
    async fn list(&self) -> CategoryResult<Vec<Category>>;

    /// Update an existing category (full replace)
    async fn update(&self, id: i32, input: UpdateCategory) -> CategoryResult<Category>;

    /// Delete a category by ID, returning whether a row was removed
    async fn delete(&self, id: i32) -> CategoryResult<bool>;

    /// Check if a category name is taken, optionally excluding one ID.
    /// Comparison is exact: case and whitespace are significant.
    async fn exists_with_name(&self, name: &str, exclude_id: Option<i32>) -> CategoryResult<bool>;

    /// Check if any product references this category
    async fn has_products(&self, id: i32) -> CategoryResult<bool>;
}

/// In-memory implementation of CategoryRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCategoryRepository {
    categories: Arc<RwLock<HashMap<i32, Category>>>,
    referenced: Arc<RwLock<HashMap<i32, usize>>>,
    next_id: Arc<AtomicI32>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self {
            categories: Arc::new(RwLock::new(HashMap::new())),
            referenced: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI32::new(1)),
        }
    }

    /// Record one product referencing a category. The reference counts
    /// stand in for the products table FK, so `has_products` and the
    /// delete guard behave like the real store.
    pub async fn mark_in_use(&self, id: i32) {
        *self.referenced.write().await.entry(id).or_insert(0) += 1;
    }

    /// Drop one product reference to a category
    pub async fn release(&self, id: i32) {
        let mut referenced = self.referenced.write().await;
        if let Some(count) = referenced.get_mut(&id) {
            *count -= 1;
            if *count == 0 {
                referenced.remove(&id);
            }
        }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category> {
        let mut categories = self.categories.write().await;

        // Mirrors the unique index on categories(name)
        let name_exists = categories.values().any(|c| c.name == input.name);
        if name_exists {
            return Err(CategoryError::DuplicateName(input.name));
        }

        let now = chrono::Utc::now();
        let category = Category {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: input.name,
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        categories.insert(category.id, category.clone());

        tracing::info!(category_id = category.id, "Created category");
        Ok(category)
    }

    async fn get_by_id(&self, id: i32) -> CategoryResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(&id).cloned())
    }

    async fn list(&self) -> CategoryResult<Vec<Category>> {
        let categories = self.categories.read().await;

        let mut result: Vec<Category> = categories.values().cloned().collect();
        result.sort_by_key(|c| c.id);

        Ok(result)
    }

    async fn update(&self, id: i32, input: UpdateCategory) -> CategoryResult<Category> {
        let mut categories = self.categories.write().await;

        if !categories.contains_key(&id) {
            return Err(CategoryError::NotFound(id));
        }

        let name_exists = categories
            .values()
            .any(|c| c.id != id && c.name == input.name);
        if name_exists {
            return Err(CategoryError::DuplicateName(input.name));
        }

        let category = categories.get_mut(&id).ok_or(CategoryError::NotFound(id))?;
        category.apply_update(input);
        let updated = category.clone();

        tracing::info!(category_id = id, "Updated category");
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> CategoryResult<bool> {
        if self.referenced.read().await.contains_key(&id) {
            return Err(CategoryError::HasProducts(id));
        }

        let mut categories = self.categories.write().await;
        if categories.remove(&id).is_some() {
            tracing::info!(category_id = id, "Deleted category");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn exists_with_name(&self, name: &str, exclude_id: Option<i32>) -> CategoryResult<bool> {
        let categories = self.categories.read().await;
        let exists = categories
            .values()
            .any(|c| c.name == name && Some(c.id) != exclude_id);
        Ok(exists)
    }

    async fn has_products(&self, id: i32) -> CategoryResult<bool> {
        Ok(self.referenced.read().await.contains_key(&id))
    }
}
