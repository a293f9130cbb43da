//! SQL schema for the Stargate SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS people (
    person_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL       -- RFC 3339 UTC; server-assigned
);

-- Only end_date is ever updated, once, when the next duty opens.
CREATE TABLE IF NOT EXISTS duties (
    duty_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id   INTEGER NOT NULL REFERENCES people(person_id) ON DELETE CASCADE,
    rank        TEXT NOT NULL,
    duty_title  TEXT NOT NULL,
    start_date  TEXT NOT NULL,      -- YYYY-MM-DD, inclusive
    end_date    TEXT,               -- YYYY-MM-DD, inclusive; NULL while open
    UNIQUE (person_id, duty_title, start_date)
);

-- At most one open duty per person.
CREATE UNIQUE INDEX IF NOT EXISTS duties_one_open_idx
    ON duties(person_id) WHERE end_date IS NULL;

CREATE INDEX IF NOT EXISTS duties_person_start_idx
    ON duties(person_id, start_date);

-- Derived from duties by the status projector; one row per enrolled person.
CREATE TABLE IF NOT EXISTS career_status (
    person_id          INTEGER PRIMARY KEY
                       REFERENCES people(person_id) ON DELETE CASCADE,
    current_rank       TEXT NOT NULL,
    current_title      TEXT NOT NULL,
    career_start_date  TEXT NOT NULL,
    career_end_date    TEXT
);

PRAGMA user_version = 1;
";
