//! Integration tests for the Products domain against real PostgreSQL
//!
//! These tests start a Postgres container via testcontainers, so they
//! need a running Docker daemon. Run them with:
//!
//! ```sh
//! cargo test -p domain_products -- --ignored
//! ```

use domain_categories::{CategoryService, CreateCategory, PgCategoryRepository};
use domain_products::*;
use rust_decimal::Decimal;
use test_utils::{TestDataBuilder, TestDatabase};
use uuid::Uuid;

async fn seed_category(db: &TestDatabase, name: String) -> i32 {
    let service = CategoryService::new(PgCategoryRepository::new(db.connection()));
    service
        .create_category(CreateCategory {
            name,
            description: String::new(),
        })
        .await
        .unwrap()
        .id
}

fn create_input(name: String, category_id: i32) -> CreateProduct {
    CreateProduct {
        name,
        description: "Integration test product".to_string(),
        image: "https://img.example.com/integration.png".to_string(),
        price: Decimal::new(2500, 2),
        stock: 10,
        category_id,
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_product_joins_category() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("product_join");
    let category_id = seed_category(&db, builder.name("category", "main")).await;

    let service = ProductService::new(PgProductRepository::new(db.connection()));
    let seller_id = builder.user_id();

    let created = service
        .create_product(create_input(builder.name("product", "main"), category_id), seller_id)
        .await
        .unwrap();

    let category = created.category.expect("category should be joined");
    assert_eq!(category.id, category_id);

    let fetched = service.get_product(created.id).await.unwrap();
    assert_eq!(fetched.category.unwrap().name, builder.name("category", "main"));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unique_index_is_scoped_per_seller() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("product_unique_scope");
    let category_id = seed_category(&db, builder.name("category", "main")).await;

    // Go through the repository directly so the service-level check
    // cannot mask the index
    let repo = PgProductRepository::new(db.connection());
    let name = builder.name("product", "dup");
    let seller_id = builder.user_id();

    ProductRepository::create(&repo, create_input(name.clone(), category_id), seller_id)
        .await
        .unwrap();

    let result =
        ProductRepository::create(&repo, create_input(name.clone(), category_id), seller_id).await;
    assert!(matches!(result, Err(ProductError::DuplicateName(_))));

    // Same name is fine for another seller
    ProductRepository::create(&repo, create_input(name, category_id), Uuid::new_v4())
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_foreign_key_rejects_dangling_category() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("product_dangling_fk");

    let repo = PgProductRepository::new(db.connection());

    let result = ProductRepository::create(
        &repo,
        create_input(builder.name("product", "orphan"), 999_999),
        builder.user_id(),
    )
    .await;

    assert!(matches!(result, Err(ProductError::CategoryNotFound(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_and_delete_roundtrip() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("product_update_delete");
    let category_id = seed_category(&db, builder.name("category", "main")).await;

    let service = ProductService::new(PgProductRepository::new(db.connection()));
    let seller_id = builder.user_id();

    let created = service
        .create_product(create_input(builder.name("product", "v1"), category_id), seller_id)
        .await
        .unwrap();

    let updated = service
        .update_product(
            created.id,
            seller_id,
            UpdateProduct {
                name: builder.name("product", "v2"),
                description: "Updated".to_string(),
                image: "https://img.example.com/updated.png".to_string(),
                price: Decimal::new(3000, 2),
                stock: 7,
                category_id,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, builder.name("product", "v2"));
    assert_eq!(updated.price, Decimal::new(3000, 2));
    assert_eq!(updated.seller_id, seller_id);

    service.delete_product(created.id, seller_id).await.unwrap();

    let result = service.get_product(created.id).await;
    assert!(matches!(result, Err(ProductError::NotFound(_))));
}
