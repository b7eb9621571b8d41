use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr, Statement,
};

use crate::{
    entity,
    error::{CategoryError, CategoryResult},
    models::{Category, CreateCategory, UpdateCategory},
    repository::CategoryRepository,
};

pub struct PgCategoryRepository {
    db: DatabaseConnection,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn internal(err: DbErr) -> CategoryError {
        CategoryError::Internal(format!("Database error: {}", err))
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category> {
        let name = input.name.clone();
        let active_model: entity::ActiveModel = input.into();

        let model = entity::Entity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                // uidx_categories_name is the authoritative guard
                Some(SqlErr::UniqueConstraintViolation(_)) => CategoryError::DuplicateName(name),
                _ => Self::internal(e),
            })?;

        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> CategoryResult<Option<Category>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(Self::internal)?;

        Ok(model.map(|m| m.into()))
    }

    async fn list(&self) -> CategoryResult<Vec<Category>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(Self::internal)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn update(&self, id: i32, input: UpdateCategory) -> CategoryResult<Category> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(Self::internal)?
            .ok_or(CategoryError::NotFound(id))?;

        let mut category: Category = model.into();
        let name = input.name.clone();
        category.apply_update(input);

        let active_model = entity::ActiveModel {
            id: Set(category.id),
            name: Set(category.name.clone()),
            description: Set(category.description.clone()),
            created_at: Set(category.created_at.into()),
            updated_at: Set(category.updated_at.into()),
        };

        let updated = entity::Entity::update(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => CategoryError::DuplicateName(name),
                _ => Self::internal(e),
            })?;

        Ok(updated.into())
    }

    async fn delete(&self, id: i32) -> CategoryResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                // fk_products_category_id restricts deleting referenced rows
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => CategoryError::HasProducts(id),
                _ => Self::internal(e),
            })?;

        Ok(result.rows_affected > 0)
    }

    async fn exists_with_name(&self, name: &str, exclude_id: Option<i32>) -> CategoryResult<bool> {
        let mut query = entity::Entity::find().filter(entity::Column::Name.eq(name));

        if let Some(exclude_id) = exclude_id {
            query = query.filter(entity::Column::Id.ne(exclude_id));
        }

        let count = query.count(&self.db).await.map_err(Self::internal)?;

        Ok(count > 0)
    }

    async fn has_products(&self, id: i32) -> CategoryResult<bool> {
        // Raw query keeps this crate independent of the products entity
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM products WHERE category_id = $1) AS in_use",
            [id.into()],
        );

        let row = self
            .db
            .query_one(stmt)
            .await
            .map_err(Self::internal)?
            .ok_or_else(|| CategoryError::Internal("EXISTS query returned no row".to_string()))?;

        row.try_get::<bool>("", "in_use").map_err(Self::internal)
    }
}
