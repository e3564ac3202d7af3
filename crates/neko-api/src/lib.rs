//! JSON REST API for Neko.
//!
//! Exposes an axum [`Router`] backed by any [`neko_core::store::CatStore`].
//! Transport concerns (binding, tracing layers) are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", neko_api::api_router(store.clone()))
//! ```

pub mod cats;
pub mod error;
pub mod input;

use std::sync::Arc;

use axum::{Router, routing::get};
use neko_core::store::CatStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CatStore + 'static,
{
  Router::new()
    .route("/cats", get(cats::list::<S>).post(cats::create::<S>))
    .route(
      "/cats/{id}",
      get(cats::get_one::<S>)
        .put(cats::update::<S>)
        .delete(cats::delete_one::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use neko_core::poop_log::NewPoopLog;
  use neko_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
  }

  async fn send(
    store:  Arc<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   Option<&str>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let req = builder
      .body(Body::from(body.unwrap_or_default().to_string()))
      .unwrap();

    let resp   = api_router(store).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes  = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json   = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
  }

  async fn post(store: Arc<SqliteStore>, body: Value) -> (StatusCode, Value) {
    send(store, "POST", "/cats", Some(&body.to_string())).await
  }

  async fn put(store: Arc<SqliteStore>, id: i64, body: Value) -> (StatusCode, Value) {
    send(store, "PUT", &format!("/cats/{id}"), Some(&body.to_string())).await
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_with_name_and_age_only() {
    let store = make_store().await;
    let (status, cat) = post(store, json!({ "name": "Tama", "age": 3 })).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(cat["id"].as_i64().unwrap() > 0);
    assert_eq!(cat["name"], "Tama");
    assert_eq!(cat["age"], 3);
    for key in [
      "weight", "gender", "allergies", "activityLevel", "furType", "size", "lifeStage",
      "neutered",
    ] {
      assert!(cat[key].is_null(), "{key} should be null: {cat}");
    }
    assert_eq!(cat["poopLogs"], json!([]));
  }

  #[tokio::test]
  async fn create_with_every_field() {
    let store = make_store().await;
    let (status, cat) = post(store, json!({
      "name": "Mike",
      "age": "7",
      "weight": 5.5,
      "gender": "male",
      "allergies": "chicken, fish",
      "activityLevel": "high",
      "furType": "long",
      "size": "large",
      "lifeStage": "senior",
      "neutered": true,
    }))
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cat["age"], 7);
    assert_eq!(cat["weight"], 5.5);
    assert_eq!(cat["gender"], "male");
    assert_eq!(cat["allergies"], "chicken, fish");
    assert_eq!(cat["activityLevel"], "high");
    assert_eq!(cat["furType"], "long");
    assert_eq!(cat["size"], "large");
    assert_eq!(cat["lifeStage"], "senior");
    assert_eq!(cat["neutered"], true);
  }

  #[tokio::test]
  async fn create_without_required_fields_persists_nothing() {
    let store = make_store().await;

    let (status, err) = post(store.clone(), json!({ "age": 3 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].is_string());

    let (status, _) = post(store.clone(), json!({ "name": "Tama" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = send(store, "GET", "/cats", None).await;
    assert_eq!(list, json!([]));
  }

  #[tokio::test]
  async fn create_rejects_unknown_enum_token() {
    let store = make_store().await;
    let (status, err) =
      post(store, json!({ "name": "Tama", "age": 3, "gender": "tom" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "unknown gender value: \"tom\"");
  }

  #[tokio::test]
  async fn malformed_json_is_a_400_with_error_body() {
    let store = make_store().await;
    let (status, err) = send(store.clone(), "POST", "/cats", Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].is_string());

    let (status, err) = send(store, "POST", "/cats", Some("[1,2,3]")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "request body must be a JSON object");
  }

  // ── Read ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_returns_newest_first_with_logs() {
    let store = make_store().await;
    let (_, first) = post(store.clone(), json!({ "name": "Tama", "age": 3 })).await;
    let (_, second) = post(store.clone(), json!({ "name": "Mike", "age": 5 })).await;

    let first_id = first["id"].as_i64().unwrap();
    store.record_poop_log(first_id, NewPoopLog::now()).await.unwrap().unwrap();

    let (status, list) = send(store, "GET", "/cats", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], second["id"]);
    assert_eq!(list[1]["id"], first["id"]);
    assert_eq!(list[1]["poopLogs"].as_array().unwrap().len(), 1);
    assert!(list[1]["poopLogs"][0]["date"].is_string());
  }

  #[tokio::test]
  async fn get_missing_is_404() {
    let store = make_store().await;
    let (status, err) = send(store, "GET", "/cats/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err, json!({ "error": "not found" }));
  }

  #[tokio::test]
  async fn non_numeric_id_is_400() {
    let store = make_store().await;
    for method in ["GET", "DELETE"] {
      let (status, err) = send(store.clone(), method, "/cats/tama", None).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
      assert_eq!(err, json!({ "error": "invalid id" }));
    }

    let (status, err) =
      send(store, "PUT", "/cats/tama", Some(r#"{"age":1}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err, json!({ "error": "invalid id" }));
  }

  // ── Update ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_omitted_keeps_and_null_clears() {
    let store = make_store().await;
    let (_, cat) = post(
      store.clone(),
      json!({ "name": "Tama", "age": 3, "furType": "short", "neutered": false }),
    )
    .await;
    let id = cat["id"].as_i64().unwrap();

    let (status, cat) = put(store.clone(), id, json!({ "weight": 4.2 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cat["weight"], 4.2);
    assert_eq!(cat["name"], "Tama");
    assert_eq!(cat["age"], 3);
    assert_eq!(cat["furType"], "short");
    assert_eq!(cat["neutered"], false);

    let (status, cat) = put(store.clone(), id, json!({ "weight": null, "furType": null })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cat["weight"].is_null());
    assert!(cat["furType"].is_null());
    assert_eq!(cat["neutered"], false);

    let (_, fetched) = send(store, "GET", &format!("/cats/{id}"), None).await;
    assert_eq!(fetched, cat);
  }

  #[tokio::test]
  async fn update_ignores_null_for_required_fields() {
    let store = make_store().await;
    let (_, cat) = post(store.clone(), json!({ "name": "Tama", "age": 3 })).await;
    let id = cat["id"].as_i64().unwrap();

    let (status, cat) = put(store, id, json!({ "name": null, "age": "", "size": "small" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cat["name"], "Tama");
    assert_eq!(cat["age"], 3);
    assert_eq!(cat["size"], "small");
  }

  #[tokio::test]
  async fn update_missing_is_404() {
    let store = make_store().await;
    let (status, _) = put(store, 12, json!({ "age": 4 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn update_with_invalid_value_is_400_and_changes_nothing() {
    let store = make_store().await;
    let (_, cat) = post(store.clone(), json!({ "name": "Tama", "age": 3 })).await;
    let id = cat["id"].as_i64().unwrap();

    let (status, err) = put(store.clone(), id, json!({ "name": "Tama II", "age": -2 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "age must be a non-negative whole number");

    let (_, fetched) = send(store, "GET", &format!("/cats/{id}"), None).await;
    assert_eq!(fetched["name"], "Tama");
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_removes_from_list() {
    let store = make_store().await;
    let (_, cat) = post(store.clone(), json!({ "name": "Tama", "age": 3 })).await;
    let id = cat["id"].as_i64().unwrap();

    let (status, body) = send(store.clone(), "DELETE", &format!("/cats/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (_, list) = send(store.clone(), "GET", "/cats", None).await;
    assert_eq!(list, json!([]));

    let (status, _) = send(store, "DELETE", &format!("/cats/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Walkthrough ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn full_lifecycle() {
    let store = make_store().await;

    let (status, created) = post(store.clone(), json!({ "name": "Tama", "age": 3 })).await;
    assert_eq!(status, StatusCode::CREATED);
    let id  = created["id"].as_i64().unwrap();
    let uri = format!("/cats/{id}");

    let (_, cat) = put(store.clone(), id, json!({ "weight": 4.2 })).await;
    assert_eq!(cat["weight"], 4.2);
    assert_eq!((cat["name"].clone(), cat["age"].clone()), (json!("Tama"), json!(3)));

    let (_, cat) = put(store.clone(), id, json!({ "weight": null })).await;
    assert!(cat["weight"].is_null());

    let (status, body) = send(store.clone(), "DELETE", &uri, None).await;
    assert_eq!((status, body), (StatusCode::OK, json!({ "ok": true })));

    let (status, _) = send(store, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
