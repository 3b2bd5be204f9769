//! Integration tests for the API server.

use std::sync::Arc;
use std::sync::OnceLock;

use api::routes::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use store::InMemoryStore;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> (axum::Router, InMemoryStore) {
    let store = InMemoryStore::new();
    let state = Arc::new(AppState {
        store: store.clone(),
    });
    let app = api::create_app(state, get_metrics_handle());
    (app, store)
}

fn form_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn root_serves_welcome_page() {
    let (app, _) = setup();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("Bakery GET-POST-PATCH-DELETE API"));
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn list_bakeries_embeds_baked_goods() {
    let (app, store) = setup();
    let first = store.insert_bakery("Flour Power").await;
    let second = store.insert_bakery("Knead to Know").await;

    app.clone()
        .oneshot(form_request(
            "POST",
            "/baked_goods",
            &format!("name=Croissant&price=3.50&bakery_id={}", first.id),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/bakeries")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bakeries = json_body(response).await;
    let bakeries = bakeries.as_array().unwrap();
    assert_eq!(bakeries.len(), 2);

    assert_eq!(bakeries[0]["id"], first.id.as_i64());
    assert_eq!(bakeries[0]["name"], "Flour Power");
    assert_eq!(bakeries[0]["baked_goods"].as_array().unwrap().len(), 1);
    assert_eq!(bakeries[0]["baked_goods"][0]["name"], "Croissant");
    assert!(bakeries[0]["created_at"].as_str().is_some());

    assert_eq!(bakeries[1]["id"], second.id.as_i64());
    assert!(bakeries[1]["baked_goods"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn get_bakery_echoes_requested_id() {
    let (app, store) = setup();
    let bakery = store.insert_bakery("Flour Power").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/bakeries/{}", bakery.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["id"], bakery.id.as_i64());
    assert_eq!(json["name"], "Flour Power");
    assert!(json["baked_goods"].as_array().is_some());
}

#[tokio::test]
async fn get_missing_bakery_returns_404() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/bakeries/999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Bakery not found");
}

#[tokio::test]
async fn patch_bakery_trims_whitespace_from_name() {
    let (app, store) = setup();
    let bakery = store.insert_bakery("Old Name").await;

    let response = app
        .clone()
        .oneshot(form_request(
            "PATCH",
            &format!("/bakeries/{}", bakery.id),
            "name=++Sweet+Buns++",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["name"], "Sweet Buns");

    // The trimmed name is what got stored
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/bakeries/{}", bakery.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["name"], "Sweet Buns");
}

#[tokio::test]
async fn patch_bakery_without_name_leaves_row_unchanged() {
    let (app, store) = setup();
    let bakery = store.insert_bakery("Flour Power").await;

    let response = app
        .oneshot(form_request("PATCH", &format!("/bakeries/{}", bakery.id), ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["name"], "Flour Power");
}

#[tokio::test]
async fn patch_bakery_with_blank_name_leaves_row_unchanged() {
    let (app, store) = setup();
    let bakery = store.insert_bakery("Flour Power").await;

    let response = app
        .oneshot(form_request(
            "PATCH",
            &format!("/bakeries/{}", bakery.id),
            "name=+++",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["name"], "Flour Power");
}

#[tokio::test]
async fn patch_missing_bakery_returns_404() {
    let (app, _) = setup();

    let response = app
        .oneshot(form_request("PATCH", "/bakeries/999", "name=Nobody"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Bakery not found");
}

#[tokio::test]
async fn create_baked_good_round_trips_fields() {
    let (app, store) = setup();
    let bakery = store.insert_bakery("Flour Power").await;

    let response = app
        .oneshot(form_request(
            "POST",
            "/baked_goods",
            &format!("name=Croissant&price=3.50&bakery_id={}", bakery.id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["name"], "Croissant");
    assert_eq!(json["price"], 3.5);
    assert_eq!(json["bakery_id"], bakery.id.as_i64());
    assert!(json["id"].as_i64().is_some());
    assert!(json["created_at"].as_str().is_some());
}

#[tokio::test]
async fn create_baked_good_missing_price_returns_400() {
    let (app, store) = setup();
    let bakery = store.insert_bakery("Flour Power").await;

    let response = app
        .oneshot(form_request(
            "POST",
            "/baked_goods",
            &format!("name=Croissant&bakery_id={}", bakery.id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "name, price, and bakery_id are required");
}

#[tokio::test]
async fn create_baked_good_missing_name_returns_400() {
    let (app, _) = setup();

    let response = app
        .oneshot(form_request("POST", "/baked_goods", "price=3.50&bakery_id=1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "name, price, and bakery_id are required");
}

#[tokio::test]
async fn create_baked_good_unparseable_price_returns_400() {
    let (app, store) = setup();
    let bakery = store.insert_bakery("Flour Power").await;

    let response = app
        .oneshot(form_request(
            "POST",
            "/baked_goods",
            &format!("name=Croissant&price=cheap&bakery_id={}", bakery.id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("invalid price"));
}

#[tokio::test]
async fn create_baked_good_does_not_check_bakery_exists() {
    let (app, _) = setup();

    // The in-memory store is lenient about dangling bakery ids
    let response = app
        .oneshot(form_request(
            "POST",
            "/baked_goods",
            "name=Orphan&price=1.00&bakery_id=42",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["bakery_id"], 42);
}

#[tokio::test]
async fn by_price_is_sorted_descending() {
    let (app, store) = setup();
    let bakery = store.insert_bakery("Flour Power").await;

    for (name, price) in [
        ("Scone", "2.50"),
        ("Baguette", "4.00"),
        ("Croissant", "3.50"),
    ] {
        let response = app
            .clone()
            .oneshot(form_request(
                "POST",
                "/baked_goods",
                &format!("name={name}&price={price}&bakery_id={}", bakery.id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/baked_goods/by_price")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let goods = json_body(response).await;
    let goods = goods.as_array().unwrap();
    assert_eq!(goods.len(), 3);

    let prices: Vec<f64> = goods.iter().map(|g| g["price"].as_f64().unwrap()).collect();
    assert!(prices.windows(2).all(|pair| pair[0] >= pair[1]));
    assert_eq!(goods[0]["name"], "Baguette");
}

#[tokio::test]
async fn most_expensive_matches_first_of_by_price() {
    let (app, store) = setup();
    let bakery = store.insert_bakery("Flour Power").await;

    // Two goods tied at the top price; the earlier row wins
    for (name, price) in [("Croissant", "3.50"), ("Eclair", "3.50"), ("Scone", "2.50")] {
        app.clone()
            .oneshot(form_request(
                "POST",
                "/baked_goods",
                &format!("name={name}&price={price}&bakery_id={}", bakery.id),
            ))
            .await
            .unwrap();
    }

    let by_price = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/baked_goods/by_price")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let by_price = json_body(by_price).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/baked_goods/most_expensive")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let most_expensive = json_body(response).await;
    assert_eq!(most_expensive, by_price.as_array().unwrap()[0]);
    assert_eq!(most_expensive["name"], "Croissant");
}

#[tokio::test]
async fn most_expensive_of_empty_store_returns_404() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/baked_goods/most_expensive")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"], "No baked goods found");
}

#[tokio::test]
async fn delete_baked_good_removes_row() {
    let (app, store) = setup();
    let bakery = store.insert_bakery("Flour Power").await;

    let created = app
        .clone()
        .oneshot(form_request(
            "POST",
            "/baked_goods",
            &format!("name=Croissant&price=3.50&bakery_id={}", bakery.id),
        ))
        .await
        .unwrap();
    let created = json_body(created).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/baked_goods/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["message"], format!("BakedGood {id} deleted"));

    // The row no longer shows up in listings
    let response = app
        .oneshot(
            Request::builder()
                .uri("/baked_goods/by_price")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let goods = json_body(response).await;
    assert!(goods.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn repeated_delete_returns_404() {
    let (app, store) = setup();
    let bakery = store.insert_bakery("Flour Power").await;

    let created = app
        .clone()
        .oneshot(form_request(
            "POST",
            "/baked_goods",
            &format!("name=Croissant&price=3.50&bakery_id={}", bakery.id),
        ))
        .await
        .unwrap();
    let created = json_body(created).await;
    let id = created["id"].as_i64().unwrap();

    let first = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/baked_goods/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/baked_goods/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    let json = json_body(second).await;
    assert_eq!(json["error"], "BakedGood not found");
}

#[tokio::test]
async fn delete_missing_baked_good_returns_404() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/baked_goods/999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"], "BakedGood not found");
}

#[tokio::test]
async fn metrics_endpoint_renders_prometheus_text() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
