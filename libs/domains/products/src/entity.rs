use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the products table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub image: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub stock: i32,
    pub category_id: i32,
    pub seller_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "domain_categories::entity::Entity",
        from = "Column::CategoryId",
        to = "domain_categories::entity::Column::Id"
    )]
    Category,
}

impl Related<domain_categories::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from Sea-ORM Model to domain Product. The joined category
// is attached separately by the repository.
impl From<Model> for crate::models::Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            image: model.image,
            price: model.price,
            stock: model.stock,
            category_id: model.category_id,
            seller_id: model.seller_id,
            category: None,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl crate::models::Product {
    /// Build a domain Product from a model and its joined category row
    pub(crate) fn from_joined(
        model: Model,
        category: Option<domain_categories::entity::Model>,
    ) -> Self {
        let mut product: Self = model.into();
        product.category = category.map(|c| crate::models::CategorySummary {
            id: c.id,
            name: c.name,
            description: c.description,
        });
        product
    }
}

// Conversion from domain CreateProduct plus seller identity to a
// Sea-ORM ActiveModel. The id stays NotSet so Postgres assigns it.
impl From<(crate::models::CreateProduct, Uuid)> for ActiveModel {
    fn from((input, seller_id): (crate::models::CreateProduct, Uuid)) -> Self {
        ActiveModel {
            id: NotSet,
            name: Set(input.name),
            description: Set(input.description),
            image: Set(input.image),
            price: Set(input.price),
            stock: Set(input.stock),
            category_id: Set(input.category_id),
            seller_id: Set(seller_id),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(chrono::Utc::now().into()),
        }
    }
}
