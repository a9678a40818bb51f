//! Case filings — litigations and oppositions — and their connection state
//! machine.
//!
//! A filing starts out unconnected. It can be connected to exactly one party
//! (a person or an organization), and only `disconnect` brings it back to the
//! unconnected state. A filing may join a matter only while connected; see
//! [`crate::assignment`].
//!
//! ```text
//!                connect(party)
//!   Unconnected ───────────────▶ Connected(party)
//!        ▲                            │
//!        └────────── disconnect ──────┘
//! ```
//!
//! Refused transitions never raise: the boolean-returning methods report them
//! as `false` and log the [`Rejection`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  Error, Result,
  id::{FilingId, OrganizationId, PersonId},
  matter::Matter,
  party::PartyRef,
};

// ─── Kind ────────────────────────────────────────────────────────────────────

/// Litigations and oppositions obey identical rules but are never
/// interchangeable: they are numbered independently and a matter keeps them in
/// separate membership sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilingKind {
  Litigation,
  Opposition,
}

impl FilingKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Litigation => "litigation",
      Self::Opposition => "opposition",
    }
  }
}

impl fmt::Display for FilingKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Connection ──────────────────────────────────────────────────────────────

/// Why a connection or assignment was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
  #[error("filing is already connected to {0}")]
  AlreadyConnected(PartyRef),

  #[error("filing is not connected to any party")]
  NotConnected,
}

/// The party a filing is brought against, if any.
///
/// Holding the party inside a single variant makes "connected to a person and
/// an organization at once" unrepresentable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "party", rename_all = "snake_case")]
pub enum Connection {
  #[default]
  Unconnected,
  Connected(PartyRef),
}

impl Connection {
  /// Rebuild a connection from the two nullable foreign-key columns a store
  /// keeps for it.
  pub fn from_columns(
    person: Option<PersonId>,
    organization: Option<OrganizationId>,
  ) -> Result<Self> {
    match (person, organization) {
      (None, None) => Ok(Self::Unconnected),
      (Some(p), None) => Ok(Self::Connected(PartyRef::Person(p))),
      (None, Some(o)) => Ok(Self::Connected(PartyRef::Organization(o))),
      (Some(person), Some(organization)) => {
        Err(Error::ConflictingConnection { person, organization })
      }
    }
  }

  /// Split into `(person_id, organization_id)` columns; at most one is set.
  pub fn to_columns(&self) -> (Option<PersonId>, Option<OrganizationId>) {
    match self {
      Self::Unconnected => (None, None),
      Self::Connected(PartyRef::Person(p)) => (Some(*p), None),
      Self::Connected(PartyRef::Organization(o)) => (None, Some(*o)),
    }
  }

  pub fn party(&self) -> Option<PartyRef> {
    match self {
      Self::Unconnected => None,
      Self::Connected(party) => Some(*party),
    }
  }

  pub fn is_connected(&self) -> bool { matches!(self, Self::Connected(_)) }

  /// Transition `Unconnected -> Connected(party)`.
  pub fn connect(&mut self, party: PartyRef) -> Result<(), Rejection> {
    match self {
      Self::Unconnected => {
        *self = Self::Connected(party);
        Ok(())
      }
      Self::Connected(current) => Err(Rejection::AlreadyConnected(*current)),
    }
  }

  /// Transition `Connected(_) -> Unconnected`, returning the released party.
  pub fn disconnect(&mut self) -> Result<PartyRef, Rejection> {
    match std::mem::take(self) {
      Self::Connected(party) => Ok(party),
      Self::Unconnected => Err(Rejection::NotConnected),
    }
  }
}

// ─── CaseFiling ──────────────────────────────────────────────────────────────

/// A litigation or an opposition brought against a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFiling {
  pub filing_id:   FilingId,
  pub kind:        FilingKind,
  pub created_at:  DateTime<Utc>,
  /// Unset until the first successful connect or disconnect.
  pub modified_at: Option<DateTime<Utc>>,
  pub connection:  Connection,
}

impl CaseFiling {
  /// A fresh, unconnected filing.
  pub fn new(filing_id: FilingId, kind: FilingKind) -> Self {
    Self {
      filing_id,
      kind,
      created_at: Utc::now(),
      modified_at: None,
      connection: Connection::Unconnected,
    }
  }

  pub fn litigation(filing_id: FilingId) -> Self {
    Self::new(filing_id, FilingKind::Litigation)
  }

  pub fn opposition(filing_id: FilingId) -> Self {
    Self::new(filing_id, FilingKind::Opposition)
  }

  // ── Queries ─────────────────────────────────────────────────────────────

  pub fn party(&self) -> Option<PartyRef> { self.connection.party() }

  pub fn is_connected_to_person(&self) -> bool {
    self.party().is_some_and(|p| p.is_person())
  }

  pub fn is_connected_to_organization(&self) -> bool {
    self.party().is_some_and(|p| p.is_organization())
  }

  pub fn is_connected(&self) -> bool { self.connection.is_connected() }

  // ── Transitions ─────────────────────────────────────────────────────────

  pub fn connect_to_person(&mut self, person: PersonId) -> bool {
    self.connect(PartyRef::Person(person))
  }

  pub fn connect_to_organization(&mut self, organization: OrganizationId) -> bool {
    self.connect(PartyRef::Organization(organization))
  }

  /// Connect to `party` if, and only if, the filing is unconnected.
  pub fn connect(&mut self, party: PartyRef) -> bool {
    match self.connection.connect(party) {
      Ok(()) => {
        self.touch();
        tracing::debug!(
          kind = %self.kind,
          filing = self.filing_id.0,
          %party,
          "filing connected"
        );
        true
      }
      Err(rejection) => {
        self.refused("connect", rejection);
        false
      }
    }
  }

  /// Clear the connection. Matters the filing was already assigned to keep
  /// it.
  pub fn disconnect(&mut self) -> bool {
    match self.connection.disconnect() {
      Ok(party) => {
        self.touch();
        tracing::debug!(
          kind = %self.kind,
          filing = self.filing_id.0,
          %party,
          "filing disconnected"
        );
        true
      }
      Err(rejection) => {
        self.refused("disconnect", rejection);
        false
      }
    }
  }

  /// Add this filing to the matching membership set of `matter`. Refused
  /// unless the filing is connected.
  pub fn assign_to_matter(&self, matter: &mut Matter) -> bool {
    crate::assignment::assign(self, matter)
  }

  fn touch(&mut self) { self.modified_at = Some(Utc::now()); }

  pub(crate) fn refused(&self, operation: &'static str, rejection: Rejection) {
    tracing::warn!(
      kind = %self.kind,
      filing = self.filing_id.0,
      operation,
      %rejection,
      "filing operation refused"
    );
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const JOHN: PersonId = PersonId(1);
  const ALEX: PersonId = PersonId(2);
  const IBM: OrganizationId = OrganizationId(10);
  const MICROSOFT: OrganizationId = OrganizationId(11);

  fn exclusive(f: &CaseFiling) -> bool {
    !(f.is_connected_to_person() && f.is_connected_to_organization())
  }

  #[test]
  fn new_filing_is_unconnected() {
    let f = CaseFiling::litigation(FilingId(1));
    assert!(!f.is_connected());
    assert!(!f.is_connected_to_person());
    assert!(!f.is_connected_to_organization());
    assert!(f.modified_at.is_none());
  }

  #[test]
  fn connect_unconnected_to_organization() {
    let mut f = CaseFiling::litigation(FilingId(1));
    assert!(f.connect_to_organization(IBM));
    assert!(f.is_connected_to_organization());
    assert!(!f.is_connected_to_person());
    assert!(f.modified_at.is_some());
  }

  #[test]
  fn connect_unconnected_to_person() {
    let mut f = CaseFiling::opposition(FilingId(1));
    assert!(f.connect_to_person(JOHN));
    assert_eq!(f.party(), Some(PartyRef::Person(JOHN)));
  }

  #[test]
  fn connecting_twice_is_refused_and_keeps_the_first_party() {
    for kind in [FilingKind::Litigation, FilingKind::Opposition] {
      let mut f = CaseFiling::new(FilingId(1), kind);
      assert!(f.connect_to_organization(IBM));
      let stamped = f.modified_at;

      assert!(!f.connect_to_organization(MICROSOFT));
      assert!(!f.connect_to_person(JOHN));
      assert_eq!(f.party(), Some(PartyRef::Organization(IBM)));
      assert_eq!(f.modified_at, stamped);
      assert!(exclusive(&f));
    }
  }

  #[test]
  fn person_then_person_is_refused() {
    let mut f = CaseFiling::litigation(FilingId(1));
    assert!(f.connect_to_person(JOHN));
    assert!(!f.connect_to_person(ALEX));
    assert_eq!(f.party(), Some(PartyRef::Person(JOHN)));
  }

  #[test]
  fn litigation_scenario_organization_then_person() {
    let mut l = CaseFiling::litigation(FilingId(1));
    assert!(l.connect_to_organization(IBM));
    assert!(!l.connect_to_person(JOHN));
    assert!(l.is_connected());
  }

  #[test]
  fn disconnect_only_succeeds_once() {
    let mut l = CaseFiling::litigation(FilingId(1));
    assert!(l.connect_to_organization(IBM));
    assert!(l.disconnect());
    assert!(!l.is_connected());
    assert!(!l.disconnect());
  }

  #[test]
  fn disconnect_unconnected_is_refused() {
    let mut f = CaseFiling::opposition(FilingId(4));
    assert!(!f.disconnect());
    assert!(f.modified_at.is_none());
  }

  #[test]
  fn reconnect_after_disconnect_may_switch_variant() {
    let mut f = CaseFiling::opposition(FilingId(1));
    assert!(f.connect_to_person(ALEX));
    assert!(f.disconnect());
    assert!(f.connect_to_organization(IBM));
    assert!(f.is_connected_to_organization());
    assert!(exclusive(&f));
  }

  #[test]
  fn exclusivity_holds_over_an_operation_sequence() {
    let mut f = CaseFiling::litigation(FilingId(9));
    let ops: [&dyn Fn(&mut CaseFiling) -> bool; 5] = [
      &|f: &mut CaseFiling| f.connect_to_person(JOHN),
      &|f: &mut CaseFiling| f.connect_to_organization(IBM),
      &|f: &mut CaseFiling| f.disconnect(),
      &|f: &mut CaseFiling| f.connect_to_organization(MICROSOFT),
      &|f: &mut CaseFiling| f.connect_to_person(ALEX),
    ];
    for _ in 0..3 {
      for op in &ops {
        op(&mut f);
        assert!(exclusive(&f));
      }
    }
  }

  #[test]
  fn connection_columns() {
    assert_eq!(
      Connection::from_columns(None, None).unwrap(),
      Connection::Unconnected
    );
    let c = Connection::from_columns(None, Some(IBM)).unwrap();
    assert_eq!(c.to_columns(), (None, Some(IBM)));
    assert!(matches!(
      Connection::from_columns(Some(JOHN), Some(IBM)),
      Err(Error::ConflictingConnection { .. })
    ));
  }

  #[test]
  fn connection_reports_rejection_reason() {
    let mut c = Connection::Unconnected;
    assert_eq!(c.disconnect(), Err(Rejection::NotConnected));
    c.connect(PartyRef::Person(JOHN)).unwrap();
    assert_eq!(
      c.connect(PartyRef::Organization(IBM)),
      Err(Rejection::AlreadyConnected(PartyRef::Person(JOHN)))
    );
  }
}
