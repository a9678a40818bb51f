//! Matters — the active cases ("applications") handled by the firm.

use std::{collections::BTreeSet, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  filing::{CaseFiling, FilingKind},
  id::{FilingId, MatterId, PrincipalId},
};

/// Accepted textual form of a trial date.
pub const TRIAL_DATE_FORMAT: &str = "%Y-%m-%d";

// ─── NewMatter ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::CaseStore::create_matter`].
///
/// The trial date is the only required attribute. A `NaiveDate` is always a
/// genuine calendar date; textual input goes through [`NewMatter::try_from`],
/// which rejects anything that is not `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMatter {
  pub trial_date: NaiveDate,
}

impl NewMatter {
  pub fn new(trial_date: NaiveDate) -> Self { Self { trial_date } }
}

impl FromStr for NewMatter {
  type Err = Error;

  fn from_str(input: &str) -> Result<Self> {
    let text = input.trim();
    // chrono accepts short years, unpadded fields and a leading sign.
    if !is_iso_date_shape(text) {
      return Err(Error::MalformedTrialDate { input: input.to_owned() });
    }
    NaiveDate::parse_from_str(text, TRIAL_DATE_FORMAT)
      .map(Self::new)
      .map_err(|source| Error::InvalidTrialDate {
        input: input.to_owned(),
        source,
      })
  }
}

/// `DDDD-DD-DD`, ASCII digits only.
fn is_iso_date_shape(text: &str) -> bool {
  let bytes = text.as_bytes();
  bytes.len() == 10
    && bytes.iter().enumerate().all(|(i, b)| match i {
      4 | 7 => *b == b'-',
      _ => b.is_ascii_digit(),
    })
}

impl TryFrom<&str> for NewMatter {
  type Error = Error;

  fn try_from(input: &str) -> Result<Self> { input.parse() }
}

// ─── Matter ──────────────────────────────────────────────────────────────────

/// A matter with its membership sets.
///
/// Sets are duplicate-free and unordered in meaning (`BTreeSet` only for a
/// stable serialised order). Filings enter through
/// [`crate::assignment::assign`]; nothing removes a member once added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matter {
  pub matter_id:  MatterId,
  pub trial_date: NaiveDate,
  principals:     BTreeSet<PrincipalId>,
  litigations:    BTreeSet<FilingId>,
  oppositions:    BTreeSet<FilingId>,
}

impl Matter {
  /// A matter with no members yet.
  pub fn new(matter_id: MatterId, input: NewMatter) -> Self {
    Self {
      matter_id,
      trial_date: input.trial_date,
      principals: BTreeSet::new(),
      litigations: BTreeSet::new(),
      oppositions: BTreeSet::new(),
    }
  }

  /// Rebuild a matter from persisted membership rows.
  pub fn restore(
    matter_id: MatterId,
    trial_date: NaiveDate,
    principals: impl IntoIterator<Item = PrincipalId>,
    litigations: impl IntoIterator<Item = FilingId>,
    oppositions: impl IntoIterator<Item = FilingId>,
  ) -> Self {
    Self {
      matter_id,
      trial_date,
      principals: principals.into_iter().collect(),
      litigations: litigations.into_iter().collect(),
      oppositions: oppositions.into_iter().collect(),
    }
  }

  pub fn principals(&self) -> &BTreeSet<PrincipalId> { &self.principals }

  pub fn litigations(&self) -> &BTreeSet<FilingId> { &self.litigations }

  pub fn oppositions(&self) -> &BTreeSet<FilingId> { &self.oppositions }

  pub fn filings(&self, kind: FilingKind) -> &BTreeSet<FilingId> {
    match kind {
      FilingKind::Litigation => &self.litigations,
      FilingKind::Opposition => &self.oppositions,
    }
  }

  pub fn contains(&self, filing: &CaseFiling) -> bool {
    self.filings(filing.kind).contains(&filing.filing_id)
  }

  /// Attach a principal. Principals carry no precondition. Returns `false`
  /// if the principal was already attached.
  pub fn attach_principal(&mut self, principal: PrincipalId) -> bool {
    self.principals.insert(principal)
  }

  /// Insert into the membership set for `kind`. Only the assignment gate
  /// calls this.
  pub(crate) fn admit(&mut self, kind: FilingKind, filing: FilingId) -> bool {
    match kind {
      FilingKind::Litigation => self.litigations.insert(filing),
      FilingKind::Opposition => self.oppositions.insert(filing),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn construct_with_a_genuine_date() {
    let date = NaiveDate::from_ymd_opt(2014, 2, 26).unwrap();
    let m = Matter::new(MatterId(1), NewMatter::new(date));
    assert_eq!(m.trial_date, date);
    assert!(m.principals().is_empty());
    assert!(m.litigations().is_empty());
    assert!(m.oppositions().is_empty());
  }

  #[test]
  fn parse_trial_date_text() {
    let input = NewMatter::try_from("2013-12-13").unwrap();
    assert_eq!(
      input.trial_date,
      NaiveDate::from_ymd_opt(2013, 12, 13).unwrap()
    );
  }

  #[test]
  fn non_date_is_a_construction_error() {
    let err = NewMatter::try_from("not-a-date").unwrap_err();
    assert!(matches!(err, Error::MalformedTrialDate { .. }));
    assert!(err.is_construction());
  }

  #[test]
  fn impossible_calendar_date_is_rejected() {
    let err = "2014-02-30".parse::<NewMatter>().unwrap_err();
    assert!(matches!(err, Error::InvalidTrialDate { .. }));
  }

  #[test]
  fn loose_date_forms_are_malformed() {
    for input in ["14-02-26", "2014-2-6", "+2014-02-26", "2014/02/26", "２014-02-26"] {
      let err = NewMatter::try_from(input).unwrap_err();
      assert!(
        matches!(err, Error::MalformedTrialDate { .. }),
        "{input:?} gave {err:?}"
      );
      assert!(err.is_construction());
    }
  }

  #[test]
  fn surrounding_whitespace_is_trimmed() {
    let input = NewMatter::try_from(" 2014-02-26 ").unwrap();
    assert_eq!(input.trial_date, NaiveDate::from_ymd_opt(2014, 2, 26).unwrap());
  }

  #[test]
  fn principals_attach_once() {
    let date = NaiveDate::from_ymd_opt(2014, 2, 12).unwrap();
    let mut m = Matter::new(MatterId(1), NewMatter::new(date));
    assert!(m.attach_principal(PrincipalId(5)));
    assert!(!m.attach_principal(PrincipalId(5)));
    assert_eq!(m.principals().len(), 1);
  }

  #[test]
  fn restore_collapses_duplicate_rows() {
    let date = NaiveDate::from_ymd_opt(2014, 2, 12).unwrap();
    let m = Matter::restore(
      MatterId(3),
      date,
      [PrincipalId(1)],
      [FilingId(1), FilingId(1), FilingId(2)],
      [],
    );
    assert_eq!(m.litigations().len(), 2);
    assert!(m.oppositions().is_empty());
  }
}
