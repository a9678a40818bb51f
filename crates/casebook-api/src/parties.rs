//! Handlers for `/persons` and `/organizations` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/persons` | Body: [`NewPerson`]; returns 201 + stored person |
//! | `GET`    | `/persons/:id` | 404 if not found |
//! | `DELETE` | `/persons/:id` | 204; 409 while a filing is connected to it |
//! | `PUT`    | `/persons/:id/contact` | Body: [`ContactInfo`]; replaces the contact |
//! | `GET`    | `/persons/:id/filings` | Litigations and oppositions against the person |
//!
//! `/organizations` mirrors the same shape.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use casebook_core::{
  Record,
  filing::CaseFiling,
  id::{OrganizationId, PersonId},
  party::{ContactInfo, NewOrganization, NewPerson, Organization, PartyRef, Person},
  store::CaseStore,
};

use crate::error::ApiError;

// ─── Persons ──────────────────────────────────────────────────────────────────

/// `POST /persons`
pub async fn create_person<S: CaseStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewPerson>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(input) = body?;
  let person = store
    .create_person(input)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(person)))
}

/// `GET /persons/:id`
pub async fn get_person<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Person>, ApiError> {
  let person = store
    .get_person(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::missing(Record::Person(id)))?;
  Ok(Json(person))
}

/// `PUT /persons/:id/contact`
pub async fn set_person_contact<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
  body: Result<Json<ContactInfo>, JsonRejection>,
) -> Result<Json<Person>, ApiError> {
  let Json(contact) = body?;
  let person = store
    .set_person_contact(id, contact)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(person))
}

/// `DELETE /persons/:id`
pub async fn delete_person<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
) -> Result<StatusCode, ApiError> {
  store.delete_person(id).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /persons/:id/filings`
pub async fn person_filings<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Vec<CaseFiling>>, ApiError> {
  let filings = store
    .filings_for_party(PartyRef::Person(id))
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(filings))
}

// ─── Organizations ────────────────────────────────────────────────────────────

/// `POST /organizations`
pub async fn create_organization<S: CaseStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewOrganization>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(input) = body?;
  let organization = store
    .create_organization(input)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(organization)))
}

/// `GET /organizations/:id`
pub async fn get_organization<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<OrganizationId>,
) -> Result<Json<Organization>, ApiError> {
  let organization = store
    .get_organization(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::missing(Record::Organization(id)))?;
  Ok(Json(organization))
}

/// `PUT /organizations/:id/contact`
pub async fn set_organization_contact<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<OrganizationId>,
  body: Result<Json<ContactInfo>, JsonRejection>,
) -> Result<Json<Organization>, ApiError> {
  let Json(contact) = body?;
  let organization = store
    .set_organization_contact(id, contact)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(organization))
}

/// `DELETE /organizations/:id`
pub async fn delete_organization<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<OrganizationId>,
) -> Result<StatusCode, ApiError> {
  store
    .delete_organization(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /organizations/:id/filings`
pub async fn organization_filings<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<OrganizationId>,
) -> Result<Json<Vec<CaseFiling>>, ApiError> {
  let filings = store
    .filings_for_party(PartyRef::Organization(id))
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(filings))
}
