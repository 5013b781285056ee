use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Currency, Engine, FixedRates};
use migration::MigratorTrait;
use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let rates = FixedRates::new().with_rate(
        Currency::try_from("USD").unwrap(),
        rust_decimal::Decimal::new(135, 2),
    );
    let engine = Engine::builder()
        .database(db)
        .exchange_rates(Arc::new(rates))
        .build()
        .await
        .unwrap();
    router(ServerState {
        engine: Arc::new(engine),
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn app_with_net_worth(total: f64) -> Router {
    let app = app().await;
    let (status, _) = send(&app, Method::POST, "/net-worth/", Some(json!({ "total": total }))).await;
    assert_eq!(status, StatusCode::CREATED);
    app
}

fn groceries() -> Value {
    json!({
        "name": "Groceries",
        "description": "weekly",
        "date": "2023-05-01",
        "price": 50.0,
        "currency": "CAD",
        "category": "food"
    })
}

#[tokio::test]
async fn create_then_fetch_expense() {
    let app = app_with_net_worth(1000.0).await;

    let (status, created) = send(&app, Method::POST, "/expense/", Some(groceries())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Groceries");
    assert_eq!(created["price"], 50.0);
    assert_eq!(created["exchange_rate"], 1.0);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(&app, Method::GET, &format!("/expense/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], created["id"]);

    let (_, net_worth) = send(&app, Method::GET, "/net-worth/", None).await;
    assert_eq!(net_worth["total"], 950.0);

    let (_, budget) = send(&app, Method::GET, "/budget/2023/5", None).await;
    assert_eq!(budget["spent"], 50.0);

    let (_, budget) = send(&app, Method::GET, "/category-budget/2023/5/food", None).await;
    assert_eq!(budget["category"], "food");
    assert_eq!(budget["spent"], 50.0);
}

#[tokio::test]
async fn foreign_currency_uses_provider_rate() {
    let app = app_with_net_worth(0.0).await;

    let mut body = groceries();
    body["currency"] = json!("usd");
    let (status, created) = send(&app, Method::POST, "/expense/", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["currency"], "USD");
    assert_eq!(created["exchange_rate"], 1.35);

    let mut body = groceries();
    body["currency"] = json!("JPY");
    let (status, _) = send(&app, Method::POST, "/expense/", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn invalid_create_reports_fields() {
    let app = app_with_net_worth(1000.0).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/expense/",
        Some(json!({ "price": -3.0, "currency": "CAD" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let fields: Vec<&str> = body["detail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"date"));
    assert!(fields.contains(&"price"));
    assert!(fields.contains(&"category"));

    let (_, net_worth) = send(&app, Method::GET, "/net-worth/", None).await;
    assert_eq!(net_worth["total"], 1000.0);
}

#[tokio::test]
async fn malformed_json_keeps_rejection_status() {
    let app = app_with_net_worth(0.0).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/expense/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_and_delete_expense() {
    let app = app_with_net_worth(1000.0).await;
    let (_, created) = send(&app, Method::POST, "/expense/", Some(groceries())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/expense/{id}"),
        Some(json!({ "price": 80.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 80.0);
    assert_eq!(updated["name"], "Groceries");

    let (_, net_worth) = send(&app, Method::GET, "/net-worth/", None).await;
    assert_eq!(net_worth["total"], 920.0);

    let (status, body) = send(&app, Method::DELETE, &format!("/expense/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("Expense with id {id} was successfully deleted")
    );

    let (_, net_worth) = send(&app, Method::GET, "/net-worth/", None).await;
    assert_eq!(net_worth["total"], 1000.0);

    let (status, body) = send(&app, Method::GET, &format!("/expense/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], format!("Expense with id {id} not found"));
}

#[tokio::test]
async fn list_routes() {
    let app = app_with_net_worth(0.0).await;

    let (status, body) = send(&app, Method::GET, "/expenses/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No expenses have been found.");

    for (name, date, category) in [
        ("a", "2023-04-30", "food"),
        ("b", "2023-05-02", "travel"),
        ("c", "2023-05-10", "food"),
    ] {
        let mut body = groceries();
        body["name"] = json!(name);
        body["date"] = json!(date);
        body["category"] = json!(category);
        let (status, _) = send(&app, Method::POST, "/expense/", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let names = |body: &Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, body) = send(&app, Method::GET, "/expenses/", None).await;
    assert_eq!(names(&body), ["c", "b", "a"]);

    let (_, body) = send(&app, Method::GET, "/expense/2023/5", None).await;
    assert_eq!(names(&body), ["c", "b"]);

    let (status, _) = send(&app, Method::GET, "/expense/2023/13", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, Method::GET, "/expense/limited/?limit=1&offset=1", None).await;
    assert_eq!(names(&body), ["b"]);

    let (_, body) = send(&app, Method::GET, "/expense/limited/", None).await;
    assert_eq!(names(&body).len(), 3);

    let (_, body) = send(
        &app,
        Method::GET,
        "/expense/ranged/2023-04-30/2023-05-10",
        None,
    )
    .await;
    assert_eq!(names(&body), ["b", "a"]);

    let (_, body) = send(
        &app,
        Method::GET,
        "/expense/specify/?expense_category=food&expense_name=",
        None,
    )
    .await;
    assert_eq!(names(&body), ["c", "a"]);

    let (status, _) = send(
        &app,
        Method::GET,
        "/expense/specify/?expense_category=rent",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn net_worth_routes() {
    let app = app().await;

    let (status, _) = send(&app, Method::GET, "/net-worth/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, "/net-worth/", Some(json!({ "total": 10.0 }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, "/net-worth/", Some(json!({ "total": 10.0 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (_, created) = send(&app, Method::POST, "/expense/", Some(groceries())).await;
    assert!(created["id"].is_string());

    let (status, history) = send(&app, Method::GET, "/net-worth/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["delta"], -50.0);
    assert_eq!(history[0]["occurred_on"], "2023-05-01");
    assert_eq!(history[0]["is_expense"], true);
}

#[tokio::test]
async fn pages_default_to_ten_and_empty_lists_are_not_found() {
    let app = app_with_net_worth(0.0).await;

    for day in 1..=12 {
        let mut body = groceries();
        body["name"] = json!(format!("day {day}"));
        body["date"] = json!(format!("2023-05-{day:02}"));
        let (status, _) = send(&app, Method::POST, "/expense/", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/expense/limited/", None).await;
    assert_eq!(status, StatusCode::OK);
    let page = body.as_array().unwrap();
    assert_eq!(page.len(), 10);
    assert_eq!(page[0]["name"], "day 12");
    assert_eq!(page[9]["name"], "day 3");

    let (status, body) = send(&app, Method::GET, "/expense/limited/?offset=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(&app, Method::GET, "/expense/limited/?offset=12", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        "No expenses have been found with the given conditions."
    );

    let (status, body) = send(
        &app,
        Method::GET,
        "/expense/ranged/2023-06-01/2023-07-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        "No expenses have been found between the given dates."
    );
}

#[tokio::test]
async fn oversized_price_is_a_field_error() {
    let app = app_with_net_worth(0.0).await;

    let mut body = groceries();
    body["price"] = json!(1_000_000_001.0);
    let (status, body) = send(&app, Method::POST, "/expense/", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["field"], "price");

    let (status, budget) = send(&app, Method::GET, "/budget/2023/5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(budget["spent"], 0.0);
}
