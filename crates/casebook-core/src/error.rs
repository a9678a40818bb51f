//! Error types for `casebook-core`.
//!
//! Only construction failures and store-level failures are errors. Refusals
//! of the filing state machine are not errors; they are reported as `false`
//! and described by [`Rejection`](crate::filing::Rejection).

use std::fmt;

use thiserror::Error;

use crate::{
  filing::FilingKind,
  id::{FilingId, MatterId, OrganizationId, PersonId, PrincipalId, UserId},
  party::PartyRef,
};

/// A record addressed by identifier, used in not-found errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
  Person(PersonId),
  Organization(OrganizationId),
  Principal(PrincipalId),
  User(UserId),
  Filing(FilingKind, FilingId),
  Matter(MatterId),
}

impl fmt::Display for Record {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Person(id) => id.fmt(f),
      Self::Organization(id) => id.fmt(f),
      Self::Principal(id) => id.fmt(f),
      Self::User(id) => id.fmt(f),
      Self::Filing(kind, id) => write!(f, "{kind} #{}", id.0),
      Self::Matter(id) => id.fmt(f),
    }
  }
}

impl From<PartyRef> for Record {
  fn from(party: PartyRef) -> Self {
    match party {
      PartyRef::Person(id) => Self::Person(id),
      PartyRef::Organization(id) => Self::Organization(id),
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  // ── Construction ─────────────────────────────────────────────────────────
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("invalid trial date {input:?}: {source}")]
  InvalidTrialDate {
    input:  String,
    source: chrono::ParseError,
  },

  /// Text that is not exactly `YYYY-MM-DD` (zero-padded, four-digit year).
  #[error("malformed trial date {input:?}: expected YYYY-MM-DD")]
  MalformedTrialDate { input: String },

  /// A stored filing row names both a person and an organization.
  #[error("filing references both {person} and {organization}")]
  ConflictingConnection {
    person:       PersonId,
    organization: OrganizationId,
  },

  // ── Store ────────────────────────────────────────────────────────────────
  #[error("{0} not found")]
  NotFound(Record),

  /// Deleting a party is refused while any filing is connected to it.
  #[error("{party} is still referenced by {filings} filing(s)")]
  PartyInUse { party: PartyRef, filings: usize },
}

impl Error {
  /// True for errors caused by the shape of caller input rather than by the
  /// state of the store.
  pub fn is_construction(&self) -> bool {
    matches!(
      self,
      Self::MissingField(_)
        | Self::InvalidTrialDate { .. }
        | Self::MalformedTrialDate { .. }
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reject blank values for a required text field.
pub(crate) fn present(field: &'static str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    Err(Error::MissingField(field))
  } else {
    Ok(())
  }
}

pub(crate) fn required(field: &'static str, value: String) -> Result<String> {
  present(field, &value)?;
  Ok(value)
}
