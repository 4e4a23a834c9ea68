//! HTTP surface integration tests: drive the real router in-process.
//!
//! Run: cargo test -p eshop-server --test api_http

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use tower::ServiceExt;

use eshop_server::core::{Config, ServerState, build_app};
use eshop_server::db::DbService;

/// Build the full application against a throwaway database
async fn test_app() -> (tempfile::TempDir, Router, ServerState) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(&tmp.path().join("test.db")).await.unwrap();

    let mut config = Config::from_env();
    config.work_dir = tmp.path().to_string_lossy().to_string();

    let state = ServerState::with_db(config, service.db);
    let app = build_app().with_state(state.clone());
    (tmp, app, state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn with_bearer(mut req: Request<Body>, token: &str) -> Request<Body> {
    req.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    req
}

/// Register a user and log in; returns (user id, token)
async fn register_and_login(app: &Router, email: &str, is_admin: bool) -> (String, String) {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/users/register",
            serde_json::json!({
                "name": "Test User",
                "email": email,
                "password": "test-password",
                "isAdmin": is_admin,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let user = body_json(response).await;
    let user_id = user["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/users/login",
            serde_json::json!({ "email": email, "password": "test-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let login = body_json(response).await;
    let token = login["token"].as_str().unwrap().to_string();
    assert_eq!(login["user"], email);

    (user_id, token)
}

#[tokio::test]
async fn health_is_public() {
    let (_tmp, app, _state) = test_app().await;
    let response = app.oneshot(get("/api/v1/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn product_count_is_zero_not_an_error_on_empty_collection() {
    let (_tmp, app, _state) = test_app().await;
    let response = app.oneshot(get("/api/v1/products/get/count")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({ "productCount": 0 }));
}

#[tokio::test]
async fn public_product_listing_is_open_and_empty() {
    let (_tmp, app, _state) = test_app().await;
    let response = app
        .oneshot(get("/api/v1/products?pageIndex=1&pageIndex=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["products"], serde_json::json!([]));
}

#[tokio::test]
async fn login_with_wrong_password_returns_400_and_no_token() {
    let (_tmp, app, _state) = test_app().await;
    register_and_login(&app, "login@example.com", false).await;

    let response = app
        .oneshot(post_json(
            "/api/v1/users/login",
            serde_json::json!({ "email": "login@example.com", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn login_with_unknown_email_returns_400() {
    let (_tmp, app, _state) = test_app().await;
    let response = app
        .oneshot(post_json(
            "/api/v1/users/login",
            serde_json::json!({ "email": "nobody@example.com", "password": "irrelevant" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registration_response_never_includes_the_password() {
    let (_tmp, app, _state) = test_app().await;
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/users/register",
            serde_json::json!({
                "name": "Private",
                "email": "private@example.com",
                "password": "super-secret-value",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
    assert!(!body.to_string().contains("super-secret-value"));
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (_tmp, app, _state) = test_app().await;

    let response = app.clone().oneshot(get("/api/v1/orders")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.clone().oneshot(get("/api/v1/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get("/api/v1/orders/get/totalsales"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_non_admin_tokens() {
    let (_tmp, app, _state) = test_app().await;
    let (_id, token) = register_and_login(&app, "pleb@example.com", false).await;

    let response = app
        .clone()
        .oneshot(with_bearer(get("/api/v1/users"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(with_bearer(get("/api/v1/orders/get/count"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_token_unlocks_aggregates() {
    let (_tmp, app, _state) = test_app().await;
    let (_id, token) = register_and_login(&app, "boss@example.com", true).await;

    let response = app
        .clone()
        .oneshot(with_bearer(get("/api/v1/orders/get/totalsales"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({ "totalSales": 0.0 }));

    let response = app
        .oneshot(with_bearer(get("/api/v1/users/get/count"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["userCount"], 1);
}

#[tokio::test]
async fn category_crud_via_http() {
    let (_tmp, app, _state) = test_app().await;
    let (_id, token) = register_and_login(&app, "catadmin@example.com", true).await;

    // Create
    let response = app
        .clone()
        .oneshot(with_bearer(
            post_json(
                "/api/v1/categories",
                serde_json::json!({ "name": "computing", "icon": "cpu", "color": "#123456" }),
            ),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "computing");

    // Public read
    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/categories/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Unknown id is a 404, not a 500
    let response = app
        .clone()
        .oneshot(get("/api/v1/categories/doesnotexist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Delete
    let response = app
        .clone()
        .oneshot(with_bearer(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/categories/{id}"))
                .body(Body::empty())
                .unwrap(),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    // Gone now
    let response = app
        .oneshot(get(&format!("/api/v1/categories/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_creation_and_totals_via_http() {
    let (_tmp, app, state) = test_app().await;
    let (user_id, admin_token) = register_and_login(&app, "shopper@example.com", true).await;

    // Seed catalog through the repositories (product create is multipart)
    let categories =
        eshop_server::db::repository::CategoryRepository::new(state.db.clone());
    let category = categories
        .create(eshop_server::db::models::CategoryCreate {
            name: "computing".to_string(),
            icon: None,
            color: None,
        })
        .await
        .unwrap();
    let cat_id = category.id.unwrap().to_string();

    let products = eshop_server::db::repository::ProductRepository::new(state.db.clone());
    let p1 = products
        .create(
            eshop_server::db::models::ProductCreate {
                name: "P1".to_string(),
                price: 10.0,
                category: cat_id.clone(),
                count_in_stock: 5,
                ..Default::default()
            },
            String::new(),
        )
        .await
        .unwrap();
    let p2 = products
        .create(
            eshop_server::db::models::ProductCreate {
                name: "P2".to_string(),
                price: 5.0,
                category: cat_id,
                count_in_stock: 5,
                ..Default::default()
            },
            String::new(),
        )
        .await
        .unwrap();

    // Create the order over HTTP: 2 × $10 + 1 × $5 = $25
    let response = app
        .clone()
        .oneshot(with_bearer(
            post_json(
                "/api/v1/orders",
                serde_json::json!({
                    "orderItems": [
                        { "product": p1.id.unwrap().to_string(), "quantity": 2 },
                        { "product": p2.id.unwrap().to_string(), "quantity": 1 },
                    ],
                    "shippingAddress1": "1 Test Street",
                    "city": "Testville",
                    "user": user_id,
                }),
            ),
            &admin_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let order = body_json(response).await;
    assert_eq!(order["totalPrice"], 25.0);
    assert_eq!(order["orderItems"].as_array().unwrap().len(), 2);

    // Aggregates reflect it
    let response = app
        .clone()
        .oneshot(with_bearer(get("/api/v1/orders/get/totalsales"), &admin_token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["totalSales"], 25.0);

    let response = app
        .oneshot(with_bearer(get("/api/v1/orders/get/count"), &admin_token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["orderCount"], 1);
}
