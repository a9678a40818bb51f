//! Handlers for `/principals` and `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/principals` | Body: [`NewPrincipal`]; returns 201 |
//! | `GET`  | `/principals/:id` | 404 if not found |
//! | `GET`  | `/principals/:id/matters` | Matters the principal is attached to |
//! | `POST` | `/users` | Body: [`NewUser`]; returns 201, password omitted |
//! | `GET`  | `/users/:id` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use casebook_core::{
  Record,
  id::{PrincipalId, UserId},
  matter::Matter,
  principal::{NewPrincipal, NewUser, Principal, User},
  store::CaseStore,
};

use crate::error::ApiError;

/// `POST /principals`
pub async fn create_principal<S: CaseStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewPrincipal>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(input) = body?;
  let principal = store
    .create_principal(input)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(principal)))
}

/// `GET /principals/:id`
pub async fn get_principal<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PrincipalId>,
) -> Result<Json<Principal>, ApiError> {
  let principal = store
    .get_principal(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::missing(Record::Principal(id)))?;
  Ok(Json(principal))
}

/// `GET /principals/:id/matters`
pub async fn principal_matters<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PrincipalId>,
) -> Result<Json<Vec<Matter>>, ApiError> {
  let matters = store
    .matters_for_principal(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(matters))
}

/// `POST /users`
pub async fn create_user<S: CaseStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewUser>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(input) = body?;
  let user = store.create_user(input).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/:id`
pub async fn get_user<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError> {
  let user = store
    .get_user(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::missing(Record::User(id)))?;
  Ok(Json(user))
}
