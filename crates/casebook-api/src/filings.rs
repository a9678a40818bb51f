//! Handlers for `/litigations` and `/oppositions` endpoints.
//!
//! Both kinds share one sub-router; [`FilingsState`] carries the kind so every
//! handler addresses the right table.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | All filings of the kind |
//! | `POST` | `/` | Creates an unconnected filing; returns 201 |
//! | `GET`  | `/:id` | 404 if not found |
//! | `POST` | `/:id/connect` | Body: `{"person":1}` or `{"organization":1}` |
//! | `POST` | `/:id/disconnect` | No body |
//! | `POST` | `/:id/assign` | Body: `{"matter":1}` |
//! | `GET`  | `/:id/matters` | Matters the filing belongs to |
//!
//! Connect, disconnect and assign answer `{"accepted":bool}`. A refusal by
//! the connection rules is `{"accepted":false}` with status 200, not an error.

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
  routing::{get, post},
};
use casebook_core::{
  Record,
  filing::{CaseFiling, FilingKind},
  id::{FilingId, MatterId},
  matter::Matter,
  party::PartyRef,
  store::CaseStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Router state for one filing kind.
pub struct FilingsState<S> {
  pub store: Arc<S>,
  pub kind:  FilingKind,
}

impl<S> Clone for FilingsState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), kind: self.kind }
  }
}

/// Outcome of a connection change or assignment.
#[derive(Debug, Serialize, Deserialize)]
pub struct Accepted {
  pub accepted: bool,
}

/// Build the sub-router for filings of `kind`.
pub fn router<S>(store: Arc<S>, kind: FilingKind) -> Router<()>
where
  S: CaseStore + 'static,
{
  Router::new()
    .route("/", get(list::<S>).post(create::<S>))
    .route("/{id}", get(get_one::<S>))
    .route("/{id}/connect", post(connect::<S>))
    .route("/{id}/disconnect", post(disconnect::<S>))
    .route("/{id}/assign", post(assign::<S>))
    .route("/{id}/matters", get(matters::<S>))
    .with_state(FilingsState { store, kind })
}

// ─── List / create / get ──────────────────────────────────────────────────────

/// `GET /`
pub async fn list<S: CaseStore>(
  State(state): State<FilingsState<S>>,
) -> Result<Json<Vec<CaseFiling>>, ApiError> {
  let filings = state
    .store
    .list_filings(state.kind)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(filings))
}

/// `POST /`
pub async fn create<S: CaseStore>(
  State(state): State<FilingsState<S>>,
) -> Result<impl IntoResponse, ApiError> {
  let filing = state
    .store
    .create_filing(state.kind)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(filing)))
}

/// `GET /:id`
pub async fn get_one<S: CaseStore>(
  State(state): State<FilingsState<S>>,
  Path(id): Path<FilingId>,
) -> Result<Json<CaseFiling>, ApiError> {
  let filing = state
    .store
    .get_filing(state.kind, id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::missing(Record::Filing(state.kind, id)))?;
  Ok(Json(filing))
}

// ─── Connection ───────────────────────────────────────────────────────────────

/// `POST /:id/connect` — body: a [`PartyRef`]
pub async fn connect<S: CaseStore>(
  State(state): State<FilingsState<S>>,
  Path(id): Path<FilingId>,
  body: Result<Json<PartyRef>, JsonRejection>,
) -> Result<Json<Accepted>, ApiError> {
  let Json(party) = body?;
  let accepted = state
    .store
    .connect_filing(state.kind, id, party)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(Accepted { accepted }))
}

/// `POST /:id/disconnect`
pub async fn disconnect<S: CaseStore>(
  State(state): State<FilingsState<S>>,
  Path(id): Path<FilingId>,
) -> Result<Json<Accepted>, ApiError> {
  let accepted = state
    .store
    .disconnect_filing(state.kind, id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(Accepted { accepted }))
}

// ─── Assignment ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AssignBody {
  pub matter: MatterId,
}

/// `POST /:id/assign` — body: `{"matter":1}`
pub async fn assign<S: CaseStore>(
  State(state): State<FilingsState<S>>,
  Path(id): Path<FilingId>,
  body: Result<Json<AssignBody>, JsonRejection>,
) -> Result<Json<Accepted>, ApiError> {
  let Json(body) = body?;
  let accepted = state
    .store
    .assign_filing(state.kind, id, body.matter)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(Accepted { accepted }))
}

/// `GET /:id/matters`
pub async fn matters<S: CaseStore>(
  State(state): State<FilingsState<S>>,
  Path(id): Path<FilingId>,
) -> Result<Json<Vec<Matter>>, ApiError> {
  let matters = state
    .store
    .matters_for_filing(state.kind, id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(matters))
}
