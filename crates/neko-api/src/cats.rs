//! Handlers for `/cats` endpoints.
//!
//! | Method   | Path         | Notes |
//! |----------|--------------|-------|
//! | `GET`    | `/cats`      | All profiles with their poop logs, newest id first |
//! | `POST`   | `/cats`      | `name` and `age` required; returns 201 + stored profile |
//! | `GET`    | `/cats/{id}` | 404 if not found, 400 for a non-integer id |
//! | `PUT`    | `/cats/{id}` | Partial update; omitted keys are left unchanged |
//! | `DELETE` | `/cats/{id}` | Cascades to poop logs; returns `{"ok":true}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use neko_core::{cat::CatProfile, store::CatStore};
use serde_json::{Value, json};

use crate::{error::ApiError, input};

type JsonBody = Result<Json<Value>, JsonRejection>;

// ─── Collection ───────────────────────────────────────────────────────────────

/// `GET /cats`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<CatProfile>>, ApiError>
where
  S: CatStore,
{
  let cats = store
    .list_cats()
    .await
    .map_err(ApiError::store("server error"))?;
  Ok(Json(cats))
}

/// `POST /cats` — returns 201 + the stored [`CatProfile`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: JsonBody,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatStore,
{
  let Json(body) = body?;
  let input = input::new_profile(&input::body(body)?)?;

  let cat = store
    .create_cat(input)
    .await
    .map_err(ApiError::store("server error"))?;

  tracing::info!(id = cat.id, name = %cat.name, "registered cat profile");
  Ok((StatusCode::CREATED, Json(cat)))
}

// ─── Item ─────────────────────────────────────────────────────────────────────

/// `GET /cats/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
) -> Result<Json<CatProfile>, ApiError>
where
  S: CatStore,
{
  let id = input::id(&raw_id)?;
  let cat = store
    .get_cat(id)
    .await
    .map_err(ApiError::store("server error"))?
    .ok_or(ApiError::NotFound)?;
  Ok(Json(cat))
}

/// `PUT /cats/{id}` — body is a partial profile.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
  body: JsonBody,
) -> Result<Json<CatProfile>, ApiError>
where
  S: CatStore,
{
  let id = input::id(&raw_id)?;
  let Json(body) = body?;
  let patch = input::patch(&input::body(body)?)?;

  let cat = store
    .update_cat(id, patch)
    .await
    .map_err(ApiError::store("update failed"))?
    .ok_or(ApiError::NotFound)?;

  tracing::info!(id, "updated cat profile");
  Ok(Json(cat))
}

/// `DELETE /cats/{id}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: CatStore,
{
  let id = input::id(&raw_id)?;
  let deleted = store
    .delete_cat(id)
    .await
    .map_err(ApiError::store("delete failed"))?;

  if !deleted {
    return Err(ApiError::NotFound);
  }

  tracing::info!(id, "deleted cat profile");
  Ok(Json(json!({ "ok": true })))
}
