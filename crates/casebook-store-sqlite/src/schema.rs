//! SQL schema for the Casebook SQLite store.
//!
//! Executed once at connection startup. The schema is versioned through
//! `PRAGMA user_version`; future migrations will be gated on that number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
-- Writers on other handles wait for an IMMEDIATE transaction to finish.
PRAGMA busy_timeout = 5000;

CREATE TABLE IF NOT EXISTS user (
    id       INTEGER PRIMARY KEY,
    name     TEXT NOT NULL,
    surname  TEXT NOT NULL,
    password TEXT
);

CREATE TABLE IF NOT EXISTS principal (
    id      INTEGER PRIMARY KEY,
    name    TEXT NOT NULL,
    surname TEXT NOT NULL,
    tax_id  TEXT NOT NULL
);

-- Owned 1:1 by a row of `nperson` or `entity`; deleted together with it.
CREATE TABLE IF NOT EXISTS contact_info (
    id                INTEGER PRIMARY KEY,
    address           TEXT NOT NULL,
    city              TEXT NOT NULL,
    mobile            TEXT NOT NULL,
    email             TEXT NOT NULL,
    post_office       TEXT,
    secondary_address TEXT,
    home_phone        TEXT,
    work_phone        TEXT
);

-- Natural persons.
CREATE TABLE IF NOT EXISTS nperson (
    id              INTEGER PRIMARY KEY,
    name            TEXT NOT NULL,
    surname         TEXT NOT NULL,
    father_name     TEXT NOT NULL,
    mother_name     TEXT,
    national_id     TEXT,
    tax_id          TEXT NOT NULL,
    contact_info_id INTEGER REFERENCES contact_info(id)
);

-- Organizations.
CREATE TABLE IF NOT EXISTS entity (
    id              INTEGER PRIMARY KEY,
    name            TEXT NOT NULL,
    brand_name      TEXT,
    base            TEXT NOT NULL,
    tax_id          TEXT NOT NULL,
    notes           TEXT,
    contact_info_id INTEGER REFERENCES contact_info(id)
);

-- Unconnected: both party columns NULL. Connected: exactly one set.
CREATE TABLE IF NOT EXISTS litigation (
    id            INTEGER PRIMARY KEY,
    time_created  TEXT NOT NULL,   -- RFC 3339 UTC; store-assigned
    time_modified TEXT,
    nperson_id    INTEGER REFERENCES nperson(id),
    entity_id     INTEGER REFERENCES entity(id),
    CHECK (nperson_id IS NULL OR entity_id IS NULL)
);

CREATE TABLE IF NOT EXISTS opposition (
    id            INTEGER PRIMARY KEY,
    time_created  TEXT NOT NULL,
    time_modified TEXT,
    nperson_id    INTEGER REFERENCES nperson(id),
    entity_id     INTEGER REFERENCES entity(id),
    CHECK (nperson_id IS NULL OR entity_id IS NULL)
);

CREATE TABLE IF NOT EXISTS application (
    id            INTEGER PRIMARY KEY,
    date_of_trial TEXT NOT NULL    -- YYYY-MM-DD
);

-- Membership tables are append-only; the UNIQUE pairs keep them
-- duplicate-free under concurrent assignment.
CREATE TABLE IF NOT EXISTS principal_application (
    principal_id   INTEGER NOT NULL REFERENCES principal(id),
    application_id INTEGER NOT NULL REFERENCES application(id),
    UNIQUE (principal_id, application_id)
);

CREATE TABLE IF NOT EXISTS litigation_application (
    filing_id      INTEGER NOT NULL REFERENCES litigation(id),
    application_id INTEGER NOT NULL REFERENCES application(id),
    UNIQUE (filing_id, application_id)
);

CREATE TABLE IF NOT EXISTS opposition_application (
    filing_id      INTEGER NOT NULL REFERENCES opposition(id),
    application_id INTEGER NOT NULL REFERENCES application(id),
    UNIQUE (filing_id, application_id)
);

CREATE INDEX IF NOT EXISTS litigation_nperson_idx ON litigation(nperson_id);
CREATE INDEX IF NOT EXISTS litigation_entity_idx  ON litigation(entity_id);
CREATE INDEX IF NOT EXISTS opposition_nperson_idx ON opposition(nperson_id);
CREATE INDEX IF NOT EXISTS opposition_entity_idx  ON opposition(entity_id);

PRAGMA user_version = 1;
";
