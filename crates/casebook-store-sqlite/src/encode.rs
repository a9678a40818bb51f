//! Encoding and decoding helpers between Rust domain types and the plain-text
//! and integer representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and trial dates as `YYYY-MM-DD`.
//! Identifiers are the SQLite integer row ids.

use casebook_core::{
  filing::{CaseFiling, Connection, FilingKind},
  id::{FilingId, MatterId, OrganizationId, PersonId, PrincipalId, UserId},
  matter::{Matter, TRIAL_DATE_FORMAT},
  party::{ContactInfo, Organization, PartyRef, Person},
  principal::{Principal, User},
};
use chrono::{DateTime, NaiveDate, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String {
  d.format(TRIAL_DATE_FORMAT).to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, TRIAL_DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Table names ─────────────────────────────────────────────────────────────

/// Table holding filings of `kind`.
pub fn filing_table(kind: FilingKind) -> &'static str {
  match kind {
    FilingKind::Litigation => "litigation",
    FilingKind::Opposition => "opposition",
  }
}

/// Join table linking filings of `kind` to applications.
pub fn membership_table(kind: FilingKind) -> &'static str {
  match kind {
    FilingKind::Litigation => "litigation_application",
    FilingKind::Opposition => "opposition_application",
  }
}

/// `(party table, filing foreign-key column, row id)` for a party.
pub fn party_columns(party: PartyRef) -> (&'static str, &'static str, i64) {
  match party {
    PartyRef::Person(id) => ("nperson", "nperson_id", id.0),
    PartyRef::Organization(id) => ("entity", "entity_id", id.0),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`raw_filing`].
pub const FILING_COLUMNS: &str =
  "id, time_created, time_modified, nperson_id, entity_id";

/// Raw values read directly from a `litigation` or `opposition` row.
pub struct RawFiling {
  pub id:            i64,
  pub time_created:  String,
  pub time_modified: Option<String>,
  pub nperson_id:    Option<i64>,
  pub entity_id:     Option<i64>,
}

pub fn raw_filing(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFiling> {
  Ok(RawFiling {
    id:            row.get(0)?,
    time_created:  row.get(1)?,
    time_modified: row.get(2)?,
    nperson_id:    row.get(3)?,
    entity_id:     row.get(4)?,
  })
}

impl RawFiling {
  pub fn into_filing(self, kind: FilingKind) -> Result<CaseFiling> {
    let connection = Connection::from_columns(
      self.nperson_id.map(PersonId),
      self.entity_id.map(OrganizationId),
    )?;

    Ok(CaseFiling {
      filing_id: FilingId(self.id),
      kind,
      created_at: decode_dt(&self.time_created)?,
      modified_at: self.time_modified.as_deref().map(decode_dt).transpose()?,
      connection,
    })
  }
}

/// Column list matching [`contact_from_row`], prefixed for a `LEFT JOIN
/// contact_info c`.
pub const CONTACT_COLUMNS: &str = "c.address, c.city, c.mobile, c.email, \
                                   c.post_office, c.secondary_address, \
                                   c.home_phone, c.work_phone";

/// Read the eight contact columns starting at `at`. A NULL address means the
/// join found no contact row.
pub fn contact_from_row(
  row: &rusqlite::Row<'_>,
  at: usize,
) -> rusqlite::Result<Option<ContactInfo>> {
  let address: Option<String> = row.get(at)?;
  let Some(address) = address else {
    return Ok(None);
  };
  Ok(Some(ContactInfo {
    address,
    city: row.get(at + 1)?,
    mobile: row.get(at + 2)?,
    email: row.get(at + 3)?,
    post_office: row.get(at + 4)?,
    secondary_address: row.get(at + 5)?,
    home_phone: row.get(at + 6)?,
    work_phone: row.get(at + 7)?,
  }))
}

pub fn person_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person {
    person_id:   PersonId(row.get(0)?),
    name:        row.get(1)?,
    surname:     row.get(2)?,
    father_name: row.get(3)?,
    mother_name: row.get(4)?,
    national_id: row.get(5)?,
    tax_id:      row.get(6)?,
    contact:     contact_from_row(row, 7)?,
  })
}

pub fn organization_from_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<Organization> {
  Ok(Organization {
    organization_id: OrganizationId(row.get(0)?),
    name:            row.get(1)?,
    brand_name:      row.get(2)?,
    base:            row.get(3)?,
    tax_id:          row.get(4)?,
    notes:           row.get(5)?,
    contact:         contact_from_row(row, 6)?,
  })
}

pub fn principal_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Principal> {
  Ok(Principal {
    principal_id: PrincipalId(row.get(0)?),
    name:         row.get(1)?,
    surname:      row.get(2)?,
    tax_id:       row.get(3)?,
  })
}

pub fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
  Ok(User {
    user_id:  UserId(row.get(0)?),
    name:     row.get(1)?,
    surname:  row.get(2)?,
    password: row.get(3)?,
  })
}

/// Raw values for an `application` row plus its three membership lists.
pub struct RawMatter {
  pub id:            i64,
  pub date_of_trial: String,
  pub principals:    Vec<i64>,
  pub litigations:   Vec<i64>,
  pub oppositions:   Vec<i64>,
}

impl RawMatter {
  pub fn into_matter(self) -> Result<Matter> {
    Ok(Matter::restore(
      MatterId(self.id),
      decode_date(&self.date_of_trial)?,
      self.principals.into_iter().map(PrincipalId),
      self.litigations.into_iter().map(FilingId),
      self.oppositions.into_iter().map(FilingId),
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn trial_date_roundtrips_through_text() {
    let d = NaiveDate::from_ymd_opt(2014, 2, 26).unwrap();
    assert_eq!(encode_date(d), "2014-02-26");
    assert_eq!(decode_date("2014-02-26").unwrap(), d);
    assert!(decode_date("26/02/2014").is_err());
  }

  #[test]
  fn raw_filing_with_both_parties_is_rejected() {
    let raw = RawFiling {
      id:            1,
      time_created:  encode_dt(Utc::now()),
      time_modified: None,
      nperson_id:    Some(1),
      entity_id:     Some(2),
    };
    assert!(matches!(
      raw.into_filing(FilingKind::Litigation),
      Err(Error::Core(casebook_core::Error::ConflictingConnection { .. }))
    ));
  }
}
