//! The `CaseStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `casebook-store-sqlite`). Higher layers (`casebook-api`,
//! `casebook-server`) depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  Error,
  filing::{CaseFiling, FilingKind},
  id::{FilingId, MatterId, OrganizationId, PersonId, PrincipalId, UserId},
  matter::{Matter, NewMatter},
  party::{ContactInfo, NewOrganization, NewPerson, Organization, PartyRef, Person},
  principal::{NewPrincipal, NewUser, Principal, User},
};

/// Lets callers that only see a backend's associated error type recover the
/// domain error it wraps, e.g. to tell "not found" from a database failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn as_domain(&self) -> Option<&Error>;
}

impl StoreError for Error {
  fn as_domain(&self) -> Option<&Error> { Some(self) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Casebook storage backend.
///
/// Connection changes and assignments report rule refusals as `Ok(false)`;
/// `Err` is reserved for unknown ids, invalid input and backend failures.
/// Implementations must run each connect, disconnect and assign as a single
/// atomic read-modify-write so that two concurrent callers cannot both
/// connect the same unconnected filing.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CaseStore: Send + Sync {
  type Error: StoreError;

  // ── Parties ───────────────────────────────────────────────────────────

  fn create_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Replace (or add) the person's contact record.
  fn set_person_contact(
    &self,
    id: PersonId,
    contact: ContactInfo,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Delete a person together with its contact record. Refused with
  /// [`Error::PartyInUse`] while any filing is connected to the person.
  fn delete_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn create_organization(
    &self,
    input: NewOrganization,
  ) -> impl Future<Output = Result<Organization, Self::Error>> + Send + '_;

  fn get_organization(
    &self,
    id: OrganizationId,
  ) -> impl Future<Output = Result<Option<Organization>, Self::Error>> + Send + '_;

  fn set_organization_contact(
    &self,
    id: OrganizationId,
    contact: ContactInfo,
  ) -> impl Future<Output = Result<Organization, Self::Error>> + Send + '_;

  /// Same deletion rule as [`CaseStore::delete_person`].
  fn delete_organization(
    &self,
    id: OrganizationId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Every litigation and opposition currently connected to `party`.
  fn filings_for_party(
    &self,
    party: PartyRef,
  ) -> impl Future<Output = Result<Vec<CaseFiling>, Self::Error>> + Send + '_;

  // ── Principals and users ──────────────────────────────────────────────

  fn create_principal(
    &self,
    input: NewPrincipal,
  ) -> impl Future<Output = Result<Principal, Self::Error>> + Send + '_;

  fn get_principal(
    &self,
    id: PrincipalId,
  ) -> impl Future<Output = Result<Option<Principal>, Self::Error>> + Send + '_;

  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Filings ───────────────────────────────────────────────────────────

  /// Create an unconnected filing. The creation timestamp is set by the
  /// store.
  fn create_filing(
    &self,
    kind: FilingKind,
  ) -> impl Future<Output = Result<CaseFiling, Self::Error>> + Send + '_;

  fn get_filing(
    &self,
    kind: FilingKind,
    id: FilingId,
  ) -> impl Future<Output = Result<Option<CaseFiling>, Self::Error>> + Send + '_;

  fn list_filings(
    &self,
    kind: FilingKind,
  ) -> impl Future<Output = Result<Vec<CaseFiling>, Self::Error>> + Send + '_;

  /// Connect an unconnected filing to `party`.
  ///
  /// `Ok(false)` if the filing is already connected. `Err` if the filing or
  /// the party does not exist.
  fn connect_filing(
    &self,
    kind: FilingKind,
    id: FilingId,
    party: PartyRef,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// `Ok(false)` if the filing was not connected.
  fn disconnect_filing(
    &self,
    kind: FilingKind,
    id: FilingId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Add a connected filing to the matter's membership set for its kind.
  ///
  /// `Ok(false)` if the filing is not connected; repeated assignment of a
  /// connected filing is `Ok(true)` and leaves a single membership row.
  fn assign_filing(
    &self,
    kind: FilingKind,
    id: FilingId,
    matter: MatterId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Every matter the filing is a member of.
  fn matters_for_filing(
    &self,
    kind: FilingKind,
    id: FilingId,
  ) -> impl Future<Output = Result<Vec<Matter>, Self::Error>> + Send + '_;

  // ── Matters ───────────────────────────────────────────────────────────

  fn create_matter(
    &self,
    input: NewMatter,
  ) -> impl Future<Output = Result<Matter, Self::Error>> + Send + '_;

  fn get_matter(
    &self,
    id: MatterId,
  ) -> impl Future<Output = Result<Option<Matter>, Self::Error>> + Send + '_;

  fn list_matters(
    &self,
  ) -> impl Future<Output = Result<Vec<Matter>, Self::Error>> + Send + '_;

  /// Every matter the principal is attached to.
  fn matters_for_principal(
    &self,
    principal: PrincipalId,
  ) -> impl Future<Output = Result<Vec<Matter>, Self::Error>> + Send + '_;

  /// Attach a principal to a matter. Idempotent.
  fn attach_principal(
    &self,
    matter: MatterId,
    principal: PrincipalId,
  ) -> impl Future<Output = Result<Matter, Self::Error>> + Send + '_;
}
