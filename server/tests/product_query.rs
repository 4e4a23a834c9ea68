//! Product query builder integration tests against an embedded database.
//!
//! Run: cargo test -p eshop-server --test product_query

use eshop_server::db::DbService;
use eshop_server::db::models::{CategoryCreate, ProductCreate};
use eshop_server::db::repository::{
    CategoryRepository, ProductQuery, ProductRepository, ProductSort, RepoError,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn open_db() -> (tempfile::TempDir, Surreal<Db>) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(&tmp.path().join("test.db")).await.unwrap();
    (tmp, service.db)
}

async fn seed_category(db: &Surreal<Db>, name: &str) -> String {
    let repo = CategoryRepository::new(db.clone());
    let category = repo
        .create(CategoryCreate {
            name: name.to_string(),
            icon: None,
            color: None,
        })
        .await
        .unwrap();
    category.id.unwrap().to_string()
}

async fn seed_product(
    db: &Surreal<Db>,
    name: &str,
    price: f64,
    rating: f64,
    featured: bool,
    category: &str,
) -> String {
    let repo = ProductRepository::new(db.clone());
    let product = repo
        .create(
            ProductCreate {
                name: name.to_string(),
                price,
                category: category.to_string(),
                count_in_stock: 5,
                rating: Some(rating),
                is_featured: Some(featured),
                ..Default::default()
            },
            String::new(),
        )
        .await
        .unwrap();
    product.id.unwrap().to_string()
}

/// Seed two categories with three products each; returns (cat_a, cat_b)
async fn seed_catalog(db: &Surreal<Db>) -> (String, String) {
    let cat_a = seed_category(db, "computing").await;
    let cat_b = seed_category(db, "audio").await;

    seed_product(db, "Laptop", 900.0, 4.5, true, &cat_a).await;
    seed_product(db, "Mouse", 25.0, 3.0, false, &cat_a).await;
    seed_product(db, "Keyboard", 60.0, 4.0, false, &cat_a).await;
    seed_product(db, "Headphones", 120.0, 4.8, true, &cat_b).await;
    seed_product(db, "Speaker", 80.0, 2.5, false, &cat_b).await;
    seed_product(db, "Microphone", 45.0, 3.9, false, &cat_b).await;

    (cat_a, cat_b)
}

#[tokio::test]
async fn category_filter_returns_only_matching_products() {
    let (_tmp, db) = open_db().await;
    let (cat_a, _cat_b) = seed_catalog(&db).await;

    let repo = ProductRepository::new(db.clone());
    let page = repo
        .search(ProductQuery {
            categories: Some(vec![cat_a.clone()]),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.count, 3);
    assert_eq!(page.products.len(), 3);
    for product in &page.products {
        let category = product.category.as_ref().expect("category resolved");
        assert_eq!(category.name, "computing");
    }
}

#[tokio::test]
async fn multi_category_filter_unions_the_set() {
    let (_tmp, db) = open_db().await;
    let (cat_a, cat_b) = seed_catalog(&db).await;

    let repo = ProductRepository::new(db.clone());
    let page = repo
        .search(ProductQuery {
            categories: Some(vec![cat_a, cat_b]),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.count, 6);
    assert_eq!(page.products.len(), 6);
}

#[tokio::test]
async fn category_filter_takes_precedence_over_search() {
    let (_tmp, db) = open_db().await;
    let (cat_a, _cat_b) = seed_catalog(&db).await;

    let repo = ProductRepository::new(db.clone());
    // "Headphones" matches the search but lives in the other category
    let page = repo
        .search(ProductQuery {
            categories: Some(vec![cat_a]),
            search_text: Some("phones".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.count, 3);
    for product in &page.products {
        assert_ne!(product.name, "Headphones");
    }
}

#[tokio::test]
async fn search_is_case_insensitive_substring_match() {
    let (_tmp, db) = open_db().await;
    seed_catalog(&db).await;

    let repo = ProductRepository::new(db.clone());
    let page = repo
        .search(ProductQuery {
            search_text: Some("MIC".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.count, 1);
    assert_eq!(page.products[0].name, "Microphone");
}

#[tokio::test]
async fn price_asc_sort_is_monotonic() {
    let (_tmp, db) = open_db().await;
    seed_catalog(&db).await;

    let repo = ProductRepository::new(db.clone());
    let page = repo
        .search(ProductQuery {
            sort: Some(ProductSort::PriceAsc),
            ..Default::default()
        })
        .await
        .unwrap();

    let prices: Vec<f64> = page.products.iter().map(|p| p.price).collect();
    assert_eq!(prices.len(), 6);
    for pair in prices.windows(2) {
        assert!(pair[0] <= pair[1], "prices not non-decreasing: {:?}", prices);
    }
}

#[tokio::test]
async fn pagination_returns_consecutive_pages_and_full_count() {
    let (_tmp, db) = open_db().await;
    seed_catalog(&db).await;

    let repo = ProductRepository::new(db.clone());

    let page1 = repo
        .search(ProductQuery {
            sort: Some(ProductSort::PriceAsc),
            page: Some((1, 4)),
            ..Default::default()
        })
        .await
        .unwrap();
    let page2 = repo
        .search(ProductQuery {
            sort: Some(ProductSort::PriceAsc),
            page: Some((2, 4)),
            ..Default::default()
        })
        .await
        .unwrap();

    // Count is the filter total, unbounded by pagination
    assert_eq!(page1.count, 6);
    assert_eq!(page2.count, 6);
    assert_eq!(page1.products.len(), 4);
    assert_eq!(page2.products.len(), 2);

    // Page 2 continues exactly where page 1 stopped
    let all: Vec<f64> = page1
        .products
        .iter()
        .chain(page2.products.iter())
        .map(|p| p.price)
        .collect();
    for pair in all.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

#[tokio::test]
async fn pagination_past_the_end_returns_empty_page() {
    let (_tmp, db) = open_db().await;
    seed_catalog(&db).await;

    let repo = ProductRepository::new(db.clone());
    let page = repo
        .search(ProductQuery {
            page: Some((10, 4)),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.count, 6);
    assert!(page.products.is_empty());
}

#[tokio::test]
async fn featured_listing_respects_the_limit() {
    let (_tmp, db) = open_db().await;
    seed_catalog(&db).await;

    let repo = ProductRepository::new(db.clone());
    let featured = repo.find_featured(10).await.unwrap();
    assert_eq!(featured.len(), 2);
    for product in &featured {
        assert!(product.is_featured);
    }

    let one = repo.find_featured(1).await.unwrap();
    assert_eq!(one.len(), 1);
}

#[tokio::test]
async fn count_is_zero_on_empty_collection() {
    let (_tmp, db) = open_db().await;
    let repo = ProductRepository::new(db.clone());
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn create_with_missing_category_is_a_validation_error() {
    let (_tmp, db) = open_db().await;
    let repo = ProductRepository::new(db.clone());

    let result = repo
        .create(
            ProductCreate {
                name: "Orphan".to_string(),
                price: 1.0,
                category: "category:doesnotexist".to_string(),
                count_in_stock: 1,
                ..Default::default()
            },
            String::new(),
        )
        .await;

    match result {
        Err(RepoError::Validation(_)) => {}
        other => panic!("expected Validation error, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn deleting_a_category_in_use_orphans_the_reference() {
    let (_tmp, db) = open_db().await;
    let cat = seed_category(&db, "ephemeral").await;
    let product_id = seed_product(&db, "Leftover", 9.0, 1.0, false, &cat).await;

    let categories = CategoryRepository::new(db.clone());
    categories.delete(&cat).await.unwrap();

    // The product survives with an unresolvable category link
    let products = ProductRepository::new(db.clone());
    let product = products.find_by_id(&product_id).await.unwrap().unwrap();
    assert!(product.category.is_none());
}
