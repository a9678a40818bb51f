//! [`SqliteStore`] — the SQLite implementation of [`CaseStore`].

use std::path::Path;

use casebook_core::{
  Error as CoreError, Record, assignment,
  filing::{CaseFiling, FilingKind},
  id::{FilingId, MatterId, OrganizationId, PersonId, PrincipalId, UserId},
  matter::{Matter, NewMatter},
  party::{ContactInfo, NewOrganization, NewPerson, Organization, PartyRef, Person},
  principal::{NewPrincipal, NewUser, Principal, User},
  store::CaseStore,
};
use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use crate::{
  Result,
  encode::{
    CONTACT_COLUMNS, FILING_COLUMNS, RawFiling, RawMatter, encode_date, encode_dt,
    filing_table, membership_table, organization_from_row, party_columns,
    person_from_row, principal_from_row, raw_filing, user_from_row,
  },
  error::abort,
  schema::SCHEMA,
};

/// Result type of a `Connection::call` closure.
type CallResult<T> = tokio_rusqlite::Result<T>;

const FILING_KINDS: [FilingKind; 2] =
  [FilingKind::Litigation, FilingKind::Opposition];

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Casebook store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row helpers (run on the connection thread) ──────────────────────────────

fn exists(
  conn: &rusqlite::Connection,
  table: &str,
  id: i64,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        &format!("SELECT 1 FROM {table} WHERE id = ?1"),
        rusqlite::params![id],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

fn ensure_party(conn: &rusqlite::Connection, party: PartyRef) -> CallResult<()> {
  let (table, _, id) = party_columns(party);
  if exists(conn, table, id)? {
    Ok(())
  } else {
    Err(abort(CoreError::NotFound(party.into())))
  }
}

fn read_filing(
  conn: &rusqlite::Connection,
  kind: FilingKind,
  id: FilingId,
) -> rusqlite::Result<Option<RawFiling>> {
  conn
    .query_row(
      &format!(
        "SELECT {FILING_COLUMNS} FROM {} WHERE id = ?1",
        filing_table(kind)
      ),
      rusqlite::params![id.0],
      raw_filing,
    )
    .optional()
}

/// Read and decode a filing; a missing row aborts the call with not-found.
fn load_filing(
  conn: &rusqlite::Connection,
  kind: FilingKind,
  id: FilingId,
) -> CallResult<CaseFiling> {
  let raw = read_filing(conn, kind, id)?
    .ok_or_else(|| abort(CoreError::NotFound(Record::Filing(kind, id))))?;
  raw.into_filing(kind).map_err(abort)
}

/// Persist the connection columns and modification stamp of `filing`.
fn write_connection(
  conn: &rusqlite::Connection,
  filing: &CaseFiling,
) -> rusqlite::Result<()> {
  let (person, organization) = filing.connection.to_columns();
  conn.execute(
    &format!(
      "UPDATE {} SET nperson_id = ?1, entity_id = ?2, time_modified = ?3
       WHERE id = ?4",
      filing_table(filing.kind)
    ),
    rusqlite::params![
      person.map(|p| p.0),
      organization.map(|o| o.0),
      filing.modified_at.map(encode_dt),
      filing.filing_id.0,
    ],
  )?;
  Ok(())
}

fn insert_contact(
  conn: &rusqlite::Connection,
  c: &ContactInfo,
) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO contact_info (
       address, city, mobile, email,
       post_office, secondary_address, home_phone, work_phone
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    rusqlite::params![
      c.address,
      c.city,
      c.mobile,
      c.email,
      c.post_office,
      c.secondary_address,
      c.home_phone,
      c.work_phone,
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

fn read_person(
  conn: &rusqlite::Connection,
  id: PersonId,
) -> rusqlite::Result<Option<Person>> {
  conn
    .query_row(
      &format!(
        "SELECT p.id, p.name, p.surname, p.father_name, p.mother_name,
                p.national_id, p.tax_id, {CONTACT_COLUMNS}
         FROM nperson p
         LEFT JOIN contact_info c ON c.id = p.contact_info_id
         WHERE p.id = ?1"
      ),
      rusqlite::params![id.0],
      person_from_row,
    )
    .optional()
}

fn read_organization(
  conn: &rusqlite::Connection,
  id: OrganizationId,
) -> rusqlite::Result<Option<Organization>> {
  conn
    .query_row(
      &format!(
        "SELECT e.id, e.name, e.brand_name, e.base, e.tax_id, e.notes,
                {CONTACT_COLUMNS}
         FROM entity e
         LEFT JOIN contact_info c ON c.id = e.contact_info_id
         WHERE e.id = ?1"
      ),
      rusqlite::params![id.0],
      organization_from_row,
    )
    .optional()
}

fn member_ids(
  conn: &rusqlite::Connection,
  sql: &str,
  matter: i64,
) -> rusqlite::Result<Vec<i64>> {
  let mut stmt = conn.prepare(sql)?;
  stmt
    .query_map(rusqlite::params![matter], |row| row.get(0))?
    .collect()
}

fn read_matter(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawMatter>> {
  let date_of_trial: Option<String> = conn
    .query_row(
      "SELECT date_of_trial FROM application WHERE id = ?1",
      rusqlite::params![id],
      |row| row.get(0),
    )
    .optional()?;

  let Some(date_of_trial) = date_of_trial else {
    return Ok(None);
  };

  Ok(Some(RawMatter {
    id,
    date_of_trial,
    principals: member_ids(
      conn,
      "SELECT principal_id FROM principal_application
       WHERE application_id = ?1",
      id,
    )?,
    litigations: member_ids(
      conn,
      "SELECT filing_id FROM litigation_application WHERE application_id = ?1",
      id,
    )?,
    oppositions: member_ids(
      conn,
      "SELECT filing_id FROM opposition_application WHERE application_id = ?1",
      id,
    )?,
  }))
}

/// Read the matters whose ids the single-parameter `sql` selects.
fn read_matters(
  conn: &rusqlite::Connection,
  sql: &str,
  param: i64,
) -> rusqlite::Result<Vec<RawMatter>> {
  let ids = member_ids(conn, sql, param)?;
  let mut matters = Vec::with_capacity(ids.len());
  for id in ids {
    if let Some(raw) = read_matter(conn, id)? {
      matters.push(raw);
    }
  }
  Ok(matters)
}

/// Number of filings (of either kind) connected to `party`.
fn count_connected(
  conn: &rusqlite::Connection,
  party: PartyRef,
) -> rusqlite::Result<usize> {
  let (_, column, id) = party_columns(party);
  let mut total = 0;
  for kind in FILING_KINDS {
    let n: i64 = conn.query_row(
      &format!(
        "SELECT COUNT(*) FROM {} WHERE {column} = ?1",
        filing_table(kind)
      ),
      rusqlite::params![id],
      |row| row.get(0),
    )?;
    total += n as usize;
  }
  Ok(total)
}

/// Current `contact_info_id` of a party; the outer `None` means the party row
/// does not exist.
fn contact_of(
  conn: &rusqlite::Connection,
  party: PartyRef,
) -> rusqlite::Result<Option<Option<i64>>> {
  let (table, _, id) = party_columns(party);
  conn
    .query_row(
      &format!("SELECT contact_info_id FROM {table} WHERE id = ?1"),
      rusqlite::params![id],
      |row| row.get(0),
    )
    .optional()
}

fn delete_party(conn: &mut rusqlite::Connection, party: PartyRef) -> CallResult<()> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let (table, _, id) = party_columns(party);

  let Some(contact) = contact_of(&tx, party)? else {
    return Err(abort(CoreError::NotFound(party.into())));
  };

  let filings = count_connected(&tx, party)?;
  if filings > 0 {
    return Err(abort(CoreError::PartyInUse { party, filings }));
  }

  tx.execute(
    &format!("DELETE FROM {table} WHERE id = ?1"),
    rusqlite::params![id],
  )?;
  if let Some(contact_id) = contact {
    tx.execute(
      "DELETE FROM contact_info WHERE id = ?1",
      rusqlite::params![contact_id],
    )?;
  }
  tx.commit()?;
  Ok(())
}

fn replace_contact(
  conn: &mut rusqlite::Connection,
  party: PartyRef,
  contact: &ContactInfo,
) -> CallResult<()> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let (table, _, id) = party_columns(party);

  let Some(previous) = contact_of(&tx, party)? else {
    return Err(abort(CoreError::NotFound(party.into())));
  };

  let contact_id = insert_contact(&tx, contact)?;
  tx.execute(
    &format!("UPDATE {table} SET contact_info_id = ?1 WHERE id = ?2"),
    rusqlite::params![contact_id, id],
  )?;
  if let Some(previous) = previous {
    tx.execute(
      "DELETE FROM contact_info WHERE id = ?1",
      rusqlite::params![previous],
    )?;
  }
  tx.commit()?;
  Ok(())
}

// ─── CaseStore impl ──────────────────────────────────────────────────────────

impl CaseStore for SqliteStore {
  type Error = crate::Error;

  // ── Parties ───────────────────────────────────────────────────────────────

  async fn create_person(&self, input: NewPerson) -> Result<Person> {
    input.validate()?;

    let person = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let contact_id = input
          .contact
          .as_ref()
          .map(|c| insert_contact(&tx, c))
          .transpose()?;
        tx.execute(
          "INSERT INTO nperson (
             name, surname, father_name, mother_name, national_id, tax_id,
             contact_info_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            input.name,
            input.surname,
            input.father_name,
            input.mother_name,
            input.national_id,
            input.tax_id,
            contact_id,
          ],
        )?;
        let id = PersonId(tx.last_insert_rowid());
        tx.commit()?;
        Ok(Person::from_new(id, input))
      })
      .await?;

    tracing::debug!(person = person.person_id.0, "person created");
    Ok(person)
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    Ok(self.conn.call(move |conn| Ok(read_person(conn, id)?)).await?)
  }

  async fn set_person_contact(
    &self,
    id:      PersonId,
    contact: ContactInfo,
  ) -> Result<Person> {
    contact.validate()?;

    Ok(
      self
        .conn
        .call(move |conn| {
          replace_contact(conn, PartyRef::Person(id), &contact)?;
          read_person(conn, id)?
            .ok_or_else(|| abort(CoreError::NotFound(Record::Person(id))))
        })
        .await?,
    )
  }

  async fn delete_person(&self, id: PersonId) -> Result<()> {
    self
      .conn
      .call(move |conn| delete_party(conn, PartyRef::Person(id)))
      .await?;
    tracing::debug!(person = id.0, "person deleted");
    Ok(())
  }

  async fn create_organization(&self, input: NewOrganization) -> Result<Organization> {
    input.validate()?;

    let organization = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let contact_id = input
          .contact
          .as_ref()
          .map(|c| insert_contact(&tx, c))
          .transpose()?;
        tx.execute(
          "INSERT INTO entity (
             name, brand_name, base, tax_id, notes, contact_info_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            input.name,
            input.brand_name,
            input.base,
            input.tax_id,
            input.notes,
            contact_id,
          ],
        )?;
        let id = OrganizationId(tx.last_insert_rowid());
        tx.commit()?;
        Ok(Organization::from_new(id, input))
      })
      .await?;

    tracing::debug!(
      organization = organization.organization_id.0,
      "organization created"
    );
    Ok(organization)
  }

  async fn get_organization(&self, id: OrganizationId) -> Result<Option<Organization>> {
    Ok(self.conn.call(move |conn| Ok(read_organization(conn, id)?)).await?)
  }

  async fn set_organization_contact(
    &self,
    id:      OrganizationId,
    contact: ContactInfo,
  ) -> Result<Organization> {
    contact.validate()?;

    Ok(
      self
        .conn
        .call(move |conn| {
          replace_contact(conn, PartyRef::Organization(id), &contact)?;
          read_organization(conn, id)?
            .ok_or_else(|| abort(CoreError::NotFound(Record::Organization(id))))
        })
        .await?,
    )
  }

  async fn delete_organization(&self, id: OrganizationId) -> Result<()> {
    self
      .conn
      .call(move |conn| delete_party(conn, PartyRef::Organization(id)))
      .await?;
    tracing::debug!(organization = id.0, "organization deleted");
    Ok(())
  }

  async fn filings_for_party(&self, party: PartyRef) -> Result<Vec<CaseFiling>> {
    let raws: Vec<(FilingKind, RawFiling)> = self
      .conn
      .call(move |conn| {
        ensure_party(conn, party)?;
        let (_, column, id) = party_columns(party);

        let mut rows = Vec::new();
        for kind in FILING_KINDS {
          let mut stmt = conn.prepare(&format!(
            "SELECT {FILING_COLUMNS} FROM {} WHERE {column} = ?1 ORDER BY id",
            filing_table(kind)
          ))?;
          let found = stmt
            .query_map(rusqlite::params![id], raw_filing)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          rows.extend(found.into_iter().map(|raw| (kind, raw)));
        }
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(kind, raw)| raw.into_filing(kind))
      .collect()
  }

  // ── Principals and users ──────────────────────────────────────────────────

  async fn create_principal(&self, input: NewPrincipal) -> Result<Principal> {
    input.validate()?;

    Ok(
      self
        .conn
        .call(move |conn| {
          conn.execute(
            "INSERT INTO principal (name, surname, tax_id) VALUES (?1, ?2, ?3)",
            rusqlite::params![input.name, input.surname, input.tax_id],
          )?;
          let id = PrincipalId(conn.last_insert_rowid());
          Ok(Principal::from_new(id, input))
        })
        .await?,
    )
  }

  async fn get_principal(&self, id: PrincipalId) -> Result<Option<Principal>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT id, name, surname, tax_id FROM principal WHERE id = ?1",
                rusqlite::params![id.0],
                principal_from_row,
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn create_user(&self, input: NewUser) -> Result<User> {
    input.validate()?;

    Ok(
      self
        .conn
        .call(move |conn| {
          conn.execute(
            "INSERT INTO user (name, surname, password) VALUES (?1, ?2, ?3)",
            rusqlite::params![input.name, input.surname, input.password],
          )?;
          let id = UserId(conn.last_insert_rowid());
          Ok(User::from_new(id, input))
        })
        .await?,
    )
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT id, name, surname, password FROM user WHERE id = ?1",
                rusqlite::params![id.0],
                user_from_row,
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  // ── Filings ───────────────────────────────────────────────────────────────

  async fn create_filing(&self, kind: FilingKind) -> Result<CaseFiling> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!("INSERT INTO {} (time_created) VALUES (?1)", filing_table(kind)),
          rusqlite::params![at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    let mut filing = CaseFiling::new(FilingId(id), kind);
    filing.created_at = created_at;
    tracing::debug!(%kind, filing = id, "filing created");
    Ok(filing)
  }

  async fn get_filing(&self, kind: FilingKind, id: FilingId) -> Result<Option<CaseFiling>> {
    let raw = self
      .conn
      .call(move |conn| Ok(read_filing(conn, kind, id)?))
      .await?;

    raw.map(|r| r.into_filing(kind)).transpose()
  }

  async fn list_filings(&self, kind: FilingKind) -> Result<Vec<CaseFiling>> {
    let raws: Vec<RawFiling> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {FILING_COLUMNS} FROM {} ORDER BY id",
          filing_table(kind)
        ))?;
        let rows = stmt
          .query_map([], raw_filing)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(|r| r.into_filing(kind)).collect()
  }

  async fn connect_filing(
    &self,
    kind:  FilingKind,
    id:    FilingId,
    party: PartyRef,
  ) -> Result<bool> {
    // Read, transition and write under one IMMEDIATE transaction so that a
    // concurrent connect observes the committed state, never a stale one.
    Ok(
      self
        .conn
        .call(move |conn| {
          let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
          let mut filing = load_filing(&tx, kind, id)?;
          ensure_party(&tx, party)?;

          if !filing.connect(party) {
            return Ok(false);
          }

          write_connection(&tx, &filing)?;
          tx.commit()?;
          Ok(true)
        })
        .await?,
    )
  }

  async fn disconnect_filing(&self, kind: FilingKind, id: FilingId) -> Result<bool> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
          let mut filing = load_filing(&tx, kind, id)?;

          if !filing.disconnect() {
            return Ok(false);
          }

          write_connection(&tx, &filing)?;
          tx.commit()?;
          Ok(true)
        })
        .await?,
    )
  }

  async fn assign_filing(
    &self,
    kind:   FilingKind,
    id:     FilingId,
    matter: MatterId,
  ) -> Result<bool> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
          let filing = load_filing(&tx, kind, id)?;
          if !exists(&tx, "application", matter.0)? {
            return Err(abort(CoreError::NotFound(Record::Matter(matter))));
          }

          if assignment::admit(&filing).is_err() {
            return Ok(false);
          }

          let inserted = tx.execute(
            &format!(
              "INSERT OR IGNORE INTO {} (filing_id, application_id) VALUES (?1, ?2)",
              membership_table(kind)
            ),
            rusqlite::params![id.0, matter.0],
          )?;
          tx.commit()?;

          tracing::debug!(
            %kind,
            filing = id.0,
            matter = matter.0,
            inserted = inserted > 0,
            "filing assigned to matter"
          );
          Ok(true)
        })
        .await?,
    )
  }

  async fn matters_for_filing(&self, kind: FilingKind, id: FilingId) -> Result<Vec<Matter>> {
    let raws: Vec<RawMatter> = self
      .conn
      .call(move |conn| {
        if read_filing(conn, kind, id)?.is_none() {
          return Err(abort(CoreError::NotFound(Record::Filing(kind, id))));
        }
        Ok(read_matters(
          conn,
          &format!(
            "SELECT application_id FROM {} WHERE filing_id = ?1
             ORDER BY application_id",
            membership_table(kind)
          ),
          id.0,
        )?)
      })
      .await?;

    raws.into_iter().map(RawMatter::into_matter).collect()
  }

  // ── Matters ───────────────────────────────────────────────────────────────

  async fn create_matter(&self, input: NewMatter) -> Result<Matter> {
    let date_str = encode_date(input.trial_date);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO application (date_of_trial) VALUES (?1)",
          rusqlite::params![date_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(matter = id, trial_date = %input.trial_date, "matter created");
    Ok(Matter::new(MatterId(id), input))
  }

  async fn get_matter(&self, id: MatterId) -> Result<Option<Matter>> {
    let raw = self
      .conn
      .call(move |conn| Ok(read_matter(conn, id.0)?))
      .await?;

    raw.map(RawMatter::into_matter).transpose()
  }

  async fn list_matters(&self) -> Result<Vec<Matter>> {
    let raws: Vec<RawMatter> = self
      .conn
      .call(|conn| {
        let ids = {
          let mut stmt = conn.prepare("SELECT id FROM application ORDER BY id")?;
          stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?
        };

        let mut matters = Vec::with_capacity(ids.len());
        for id in ids {
          if let Some(raw) = read_matter(conn, id)? {
            matters.push(raw);
          }
        }
        Ok(matters)
      })
      .await?;

    raws.into_iter().map(RawMatter::into_matter).collect()
  }

  async fn matters_for_principal(&self, principal: PrincipalId) -> Result<Vec<Matter>> {
    let raws: Vec<RawMatter> = self
      .conn
      .call(move |conn| {
        if !exists(conn, "principal", principal.0)? {
          return Err(abort(CoreError::NotFound(Record::Principal(principal))));
        }
        Ok(read_matters(
          conn,
          "SELECT application_id FROM principal_application WHERE principal_id = ?1
           ORDER BY application_id",
          principal.0,
        )?)
      })
      .await?;

    raws.into_iter().map(RawMatter::into_matter).collect()
  }

  async fn attach_principal(&self, matter: MatterId, principal: PrincipalId) -> Result<Matter> {
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !exists(&tx, "principal", principal.0)? {
          return Err(abort(CoreError::NotFound(Record::Principal(principal))));
        }

        tx.execute(
          "INSERT OR IGNORE INTO principal_application (principal_id, application_id)
           SELECT ?1, id FROM application WHERE id = ?2",
          rusqlite::params![principal.0, matter.0],
        )?;
        let raw = read_matter(&tx, matter.0)?
          .ok_or_else(|| abort(CoreError::NotFound(Record::Matter(matter))))?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_matter()
  }
}

#[cfg(test)]
impl SqliteStore {
  /// `SELECT COUNT(*)` over `table`, for asserting on rows no query exposes.
  pub(crate) async fn count_rows(&self, table: &'static str) -> i64 {
    self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
          row.get(0)
        })?)
      })
      .await
      .expect("count rows")
  }
}
