//! Handlers for `/matters` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/matters` | All matters with their membership sets |
//! | `POST` | `/matters` | Body: `{"trial_date":"2014-02-26"}`; 400 for a non-date |
//! | `GET`  | `/matters/:id` | 404 if not found |
//! | `POST` | `/matters/:id/principals` | Body: `{"principal":1}`; idempotent |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use casebook_core::{
  Record,
  id::{MatterId, PrincipalId},
  matter::{Matter, NewMatter},
  store::CaseStore,
};
use serde::Deserialize;

use crate::error::ApiError;

/// `GET /matters`
pub async fn list<S: CaseStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Matter>>, ApiError> {
  let matters = store.list_matters().await.map_err(ApiError::from_store)?;
  Ok(Json(matters))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  /// `YYYY-MM-DD`; kept as text so a malformed date is a 400 with the
  /// parse error rather than a generic body rejection.
  pub trial_date: String,
}

/// `POST /matters`
pub async fn create<S: CaseStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let input = NewMatter::try_from(body.trial_date.as_str())?;
  let matter = store
    .create_matter(input)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(matter)))
}

/// `GET /matters/:id`
pub async fn get_one<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<MatterId>,
) -> Result<Json<Matter>, ApiError> {
  let matter = store
    .get_matter(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::missing(Record::Matter(id)))?;
  Ok(Json(matter))
}

#[derive(Debug, Deserialize)]
pub struct AttachBody {
  pub principal: PrincipalId,
}

/// `POST /matters/:id/principals`
pub async fn attach_principal<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<MatterId>,
  body: Result<Json<AttachBody>, JsonRejection>,
) -> Result<Json<Matter>, ApiError> {
  let Json(body) = body?;
  let matter = store
    .attach_principal(id, body.principal)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(matter))
}
