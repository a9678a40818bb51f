//! Integer record identifiers.
//!
//! Every identifier is assigned by the store. Each record family gets its own
//! newtype so a person id can never be passed where an organization id is
//! expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
  ($(#[$meta:meta])* $name:ident, $label:literal) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
      Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, concat!($label, " #{}"), self.0)
      }
    }

    impl From<i64> for $name {
      fn from(raw: i64) -> Self { Self(raw) }
    }
  };
}

record_id!(
  /// Identifies a natural person.
  PersonId,
  "person"
);
record_id!(
  /// Identifies an organization (company, NGO, public body).
  OrganizationId,
  "organization"
);
record_id!(PrincipalId, "principal");
record_id!(UserId, "user");
record_id!(
  /// Identifies a litigation or an opposition. Litigations and oppositions
  /// are numbered independently, so a `FilingId` is only meaningful together
  /// with its [`FilingKind`](crate::filing::FilingKind).
  FilingId,
  "filing"
);
record_id!(
  /// Identifies a matter (an application before the firm).
  MatterId,
  "matter"
);
