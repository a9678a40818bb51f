//! The assignment gate: a filing joins a matter only after it is connected to
//! a party.
//!
//! The rule is the same for litigations and oppositions and for either party
//! variant. In-memory callers use [`assign`] (or
//! [`CaseFiling::assign_to_matter`]); storage backends call [`admit`] inside
//! the transaction that writes the membership row.

use crate::{
  filing::{CaseFiling, Rejection},
  matter::Matter,
};

/// Check whether `filing` may join a matter. Refusals are logged.
pub fn admit(filing: &CaseFiling) -> Result<(), Rejection> {
  if filing.is_connected() {
    Ok(())
  } else {
    filing.refused("assign", Rejection::NotConnected);
    Err(Rejection::NotConnected)
  }
}

/// Add `filing` to the membership set of `matter` that matches its kind.
///
/// Returns `true` whenever the filing is admitted, including when it was
/// already a member; membership stays duplicate-free either way.
pub fn assign(filing: &CaseFiling, matter: &mut Matter) -> bool {
  if admit(filing).is_err() {
    return false;
  }
  let inserted = matter.admit(filing.kind, filing.filing_id);
  tracing::debug!(
    kind = %filing.kind,
    filing = filing.filing_id.0,
    matter = matter.matter_id.0,
    inserted,
    "filing assigned to matter"
  );
  true
}
