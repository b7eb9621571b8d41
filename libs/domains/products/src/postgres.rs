use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    SqlErr,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{CreateProduct, Product, UpdateProduct},
    repository::ProductRepository,
};

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn internal(err: DbErr) -> ProductError {
        ProductError::Internal(format!("Database error: {}", err))
    }

    /// Map constraint violations raised by the products table
    fn map_write_error(err: DbErr, name: &str, category_id: i32) -> ProductError {
        match err.sql_err() {
            // uidx_products_seller_id_name is the authoritative guard
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                ProductError::DuplicateName(name.to_string())
            }
            // fk_products_category_id rejects dangling category references
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                ProductError::CategoryNotFound(category_id)
            }
            _ => Self::internal(err),
        }
    }

    async fn find_joined(&self, id: i32) -> ProductResult<Option<Product>> {
        let found = entity::Entity::find_by_id(id)
            .find_also_related(domain_categories::entity::Entity)
            .one(&self.db)
            .await
            .map_err(Self::internal)?;

        Ok(found.map(|(model, category)| Product::from_joined(model, category)))
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: CreateProduct, seller_id: Uuid) -> ProductResult<Product> {
        let name = input.name.clone();
        let category_id = input.category_id;
        let active_model: entity::ActiveModel = (input, seller_id).into();

        let model = entity::Entity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| Self::map_write_error(e, &name, category_id))?;

        // Re-read to attach the category join
        self.find_joined(model.id)
            .await?
            .ok_or(ProductError::NotFound(model.id))
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        self.find_joined(id).await
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        let found = entity::Entity::find()
            .find_also_related(domain_categories::entity::Entity)
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(Self::internal)?;

        Ok(found
            .into_iter()
            .map(|(model, category)| Product::from_joined(model, category))
            .collect())
    }

    async fn list_by_seller(&self, seller_id: Uuid) -> ProductResult<Vec<Product>> {
        let found = entity::Entity::find()
            .filter(entity::Column::SellerId.eq(seller_id))
            .find_also_related(domain_categories::entity::Entity)
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(Self::internal)?;

        Ok(found
            .into_iter()
            .map(|(model, category)| Product::from_joined(model, category))
            .collect())
    }

    async fn list_by_category(&self, category_id: i32) -> ProductResult<Vec<Product>> {
        let found = entity::Entity::find()
            .filter(entity::Column::CategoryId.eq(category_id))
            .find_also_related(domain_categories::entity::Entity)
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(Self::internal)?;

        Ok(found
            .into_iter()
            .map(|(model, category)| Product::from_joined(model, category))
            .collect())
    }

    async fn update(&self, id: i32, input: UpdateProduct) -> ProductResult<Product> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(Self::internal)?
            .ok_or(ProductError::NotFound(id))?;

        let mut product: Product = model.into();
        let name = input.name.clone();
        let category_id = input.category_id;
        product.apply_update(input);

        let active_model = entity::ActiveModel {
            id: Set(product.id),
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            image: Set(product.image.clone()),
            price: Set(product.price),
            stock: Set(product.stock),
            category_id: Set(product.category_id),
            seller_id: Set(product.seller_id),
            created_at: Set(product.created_at.into()),
            updated_at: Set(product.updated_at.into()),
        };

        entity::Entity::update(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| Self::map_write_error(e, &name, category_id))?;

        self.find_joined(id).await?.ok_or(ProductError::NotFound(id))
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(Self::internal)?;

        Ok(result.rows_affected > 0)
    }

    async fn get_by_name_and_seller(
        &self,
        seller_id: Uuid,
        name: &str,
    ) -> ProductResult<Option<Product>> {
        let found = entity::Entity::find()
            .filter(entity::Column::SellerId.eq(seller_id))
            .filter(entity::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(Self::internal)?;

        Ok(found.map(Product::from))
    }

    async fn category_exists(&self, category_id: i32) -> ProductResult<bool> {
        let count = domain_categories::entity::Entity::find_by_id(category_id)
            .count(&self.db)
            .await
            .map_err(Self::internal)?;

        Ok(count > 0)
    }
}
