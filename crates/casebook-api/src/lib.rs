//! JSON REST API for Casebook.
//!
//! Exposes an axum [`Router`] backed by any [`casebook_core::store::CaseStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", casebook_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod filings;
pub mod matters;
pub mod parties;
pub mod principals;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use casebook_core::{filing::FilingKind, store::CaseStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CaseStore + 'static,
{
  Router::new()
    // Persons
    .route("/persons", post(parties::create_person::<S>))
    .route(
      "/persons/{id}",
      get(parties::get_person::<S>).delete(parties::delete_person::<S>),
    )
    .route("/persons/{id}/contact", put(parties::set_person_contact::<S>))
    .route("/persons/{id}/filings", get(parties::person_filings::<S>))
    // Organizations
    .route("/organizations", post(parties::create_organization::<S>))
    .route(
      "/organizations/{id}",
      get(parties::get_organization::<S>).delete(parties::delete_organization::<S>),
    )
    .route(
      "/organizations/{id}/contact",
      put(parties::set_organization_contact::<S>),
    )
    .route(
      "/organizations/{id}/filings",
      get(parties::organization_filings::<S>),
    )
    // Principals and users
    .route("/principals", post(principals::create_principal::<S>))
    .route("/principals/{id}", get(principals::get_principal::<S>))
    .route("/principals/{id}/matters", get(principals::principal_matters::<S>))
    .route("/users", post(principals::create_user::<S>))
    .route("/users/{id}", get(principals::get_user::<S>))
    // Matters
    .route("/matters", get(matters::list::<S>).post(matters::create::<S>))
    .route("/matters/{id}", get(matters::get_one::<S>))
    .route("/matters/{id}/principals", post(matters::attach_principal::<S>))
    .with_state(Arc::clone(&store))
    // Filings, one sub-router per kind
    .nest("/litigations", filings::router(Arc::clone(&store), FilingKind::Litigation))
    .nest("/oppositions", filings::router(store, FilingKind::Opposition))
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
  };
  use casebook_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(
    app:    &Router,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn create_person(app: &Router) -> i64 {
    let (status, person) = send(
      app,
      "POST",
      "/persons",
      Some(json!({
        "name": "John", "surname": "Snow", "father_name": "Alex", "tax_id": "39048703"
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    person["person_id"].as_i64().unwrap()
  }

  async fn create_organization(app: &Router) -> i64 {
    let (status, org) = send(
      app,
      "POST",
      "/organizations",
      Some(json!({ "name": "IBM", "tax_id": "131312331", "base": "Virginia" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    org["organization_id"].as_i64().unwrap()
  }

  async fn create_matter(app: &Router) -> i64 {
    let (status, matter) =
      send(app, "POST", "/matters", Some(json!({ "trial_date": "2014-02-26" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    matter["matter_id"].as_i64().unwrap()
  }

  // ── Parties ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn person_create_get_and_missing() {
    let app = app().await;
    let id  = create_person(&app).await;

    let (status, person) = send(&app, "GET", &format!("/persons/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(person["surname"], "Snow");
    assert!(person["contact"].is_null());

    let (status, body) = send(&app, "GET", "/persons/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
  }

  #[tokio::test]
  async fn missing_required_field_is_bad_request() {
    let app = app().await;

    // Absent from the body entirely.
    let (status, _) = send(
      &app,
      "POST",
      "/persons",
      Some(json!({ "name": "John", "surname": "Snow", "father_name": "Alex" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Present but blank.
    let (status, body) = send(
      &app,
      "POST",
      "/organizations",
      Some(json!({ "name": "IBM", "tax_id": "", "base": "Virginia" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("tax_id"));
  }

  #[tokio::test]
  async fn contact_replace_and_delete_rules() {
    let app = app().await;
    let org = create_organization(&app).await;

    let (status, updated) = send(
      &app,
      "PUT",
      &format!("/organizations/{org}/contact"),
      Some(json!({
        "address": "1 New Orchard Rd", "city": "Armonk",
        "mobile": "555-0101", "email": "info@ibm.example"
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["contact"]["city"], "Armonk");

    let (_, filing) = send(&app, "POST", "/litigations", None).await;
    let lit = filing["filing_id"].as_i64().unwrap();
    send(
      &app,
      "POST",
      &format!("/litigations/{lit}/connect"),
      Some(json!({ "organization": org })),
    )
    .await;

    let (status, _) = send(&app, "DELETE", &format!("/organizations/{org}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    send(&app, "POST", &format!("/litigations/{lit}/disconnect"), None).await;
    let (status, _) = send(&app, "DELETE", &format!("/organizations/{org}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
  }

  // ── Filings ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn connect_then_second_connect_is_not_accepted() {
    let app    = app().await;
    let org    = create_organization(&app).await;
    let person = create_person(&app).await;

    let (status, filing) = send(&app, "POST", "/litigations", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(filing["connection"]["state"], "unconnected");
    let lit = filing["filing_id"].as_i64().unwrap();

    let uri = format!("/litigations/{lit}/connect");
    let (status, body) =
      send(&app, "POST", &uri, Some(json!({ "organization": org }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "accepted": true }));

    let (status, body) = send(&app, "POST", &uri, Some(json!({ "person": person }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "accepted": false }));

    let (_, filing) = send(&app, "GET", &format!("/litigations/{lit}"), None).await;
    assert_eq!(filing["connection"]["state"], "connected");
    assert_eq!(filing["connection"]["party"], json!({ "organization": org }));

    let (_, filings) =
      send(&app, "GET", &format!("/organizations/{org}/filings"), None).await;
    assert_eq!(filings.as_array().unwrap().len(), 1);
    let (_, filings) = send(&app, "GET", &format!("/persons/{person}/filings"), None).await;
    assert!(filings.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn disconnect_twice() {
    let app    = app().await;
    let person = create_person(&app).await;
    let (_, filing) = send(&app, "POST", "/oppositions", None).await;
    let opp = filing["filing_id"].as_i64().unwrap();

    send(
      &app,
      "POST",
      &format!("/oppositions/{opp}/connect"),
      Some(json!({ "person": person })),
    )
    .await;

    let uri = format!("/oppositions/{opp}/disconnect");
    let (_, body) = send(&app, "POST", &uri, None).await;
    assert_eq!(body, json!({ "accepted": true }));
    let (_, body) = send(&app, "POST", &uri, None).await;
    assert_eq!(body, json!({ "accepted": false }));
  }

  #[tokio::test]
  async fn unknown_filing_or_party_is_not_found() {
    let app = app().await;
    let (status, _) = send(&app, "GET", "/oppositions/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, filing) = send(&app, "POST", "/litigations", None).await;
    let lit = filing["filing_id"].as_i64().unwrap();
    let (status, _) = send(
      &app,
      "POST",
      &format!("/litigations/{lit}/connect"),
      Some(json!({ "person": 404 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn assignment_requires_connection() {
    let app    = app().await;
    let person = create_person(&app).await;
    let matter = create_matter(&app).await;
    let (_, filing) = send(&app, "POST", "/oppositions", None).await;
    let opp = filing["filing_id"].as_i64().unwrap();

    let assign = format!("/oppositions/{opp}/assign");
    let (_, body) = send(&app, "POST", &assign, Some(json!({ "matter": matter }))).await;
    assert_eq!(body, json!({ "accepted": false }));

    send(
      &app,
      "POST",
      &format!("/oppositions/{opp}/connect"),
      Some(json!({ "person": person })),
    )
    .await;
    let (_, body) = send(&app, "POST", &assign, Some(json!({ "matter": matter }))).await;
    assert_eq!(body, json!({ "accepted": true }));
    let (_, body) = send(&app, "POST", &assign, Some(json!({ "matter": matter }))).await;
    assert_eq!(body, json!({ "accepted": true }));

    let (_, stored) = send(&app, "GET", &format!("/matters/{matter}"), None).await;
    assert_eq!(stored["oppositions"], json!([opp]));
    assert_eq!(stored["litigations"], json!([]));

    let (_, matters) = send(&app, "GET", &format!("/oppositions/{opp}/matters"), None).await;
    assert_eq!(matters.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "POST", &assign, Some(json!({ "matter": 77 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Matters ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn matter_trial_date_must_be_a_date() {
    let app = app().await;
    let (status, body) =
      send(&app, "POST", "/matters", Some(json!({ "trial_date": "not-a-date" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not-a-date"));

    for loose in ["14-02-26", "2014-2-6"] {
      let (status, _) =
        send(&app, "POST", "/matters", Some(json!({ "trial_date": loose }))).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{loose}");
    }

    let id = create_matter(&app).await;
    let (_, matters) = send(&app, "GET", "/matters", None).await;
    assert_eq!(matters[0]["matter_id"], id);
    assert_eq!(matters[0]["trial_date"], "2014-02-26");
  }

  #[tokio::test]
  async fn attach_principal_is_idempotent() {
    let app    = app().await;
    let matter = create_matter(&app).await;
    let (status, principal) = send(
      &app,
      "POST",
      "/principals",
      Some(json!({ "name": "John", "surname": "Edwards", "tax_id": "12321312" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let pid = principal["principal_id"].as_i64().unwrap();

    let uri = format!("/matters/{matter}/principals");
    for _ in 0..2 {
      let (status, body) = send(&app, "POST", &uri, Some(json!({ "principal": pid }))).await;
      assert_eq!(status, StatusCode::OK);
      assert_eq!(body["principals"], json!([pid]));
    }

    let (status, matters) =
      send(&app, "GET", &format!("/principals/{pid}/matters"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(matters.as_array().unwrap().len(), 1);
    assert_eq!(matters[0]["matter_id"], matter);

    let (status, _) = send(&app, "POST", &uri, Some(json!({ "principal": 99 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/principals/99/matters", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn user_password_is_not_echoed() {
    let app = app().await;
    let (status, user) = send(
      &app,
      "POST",
      "/users",
      Some(json!({ "name": "Bob", "surname": "Marley", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(user.get("password").is_none());

    let id = user["user_id"].as_i64().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Bob");
  }
}
