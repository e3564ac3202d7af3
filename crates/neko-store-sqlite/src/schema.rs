//! SQL schema for the Neko SQLite store.
//!
//! Executed at connection startup. `PRAGMA user_version` records the schema
//! revision for future migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- AUTOINCREMENT keeps ids of deleted profiles from being reused.
CREATE TABLE IF NOT EXISTS cat_profiles (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT    NOT NULL,
    age             INTEGER NOT NULL,
    weight          REAL,
    gender          TEXT,            -- 'male' | 'female' | 'unknown'
    allergies       TEXT,            -- comma-separated free text
    activity_level  TEXT,
    fur_type        TEXT,            -- 'short' | 'long' | 'hairless'
    size            TEXT,            -- 'small' | 'medium' | 'large'
    life_stage      TEXT,            -- 'kitten' | 'adult' | 'senior'
    neutered        INTEGER          -- 0 | 1
);

CREATE TABLE IF NOT EXISTS poop_logs (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    cat_id  INTEGER NOT NULL REFERENCES cat_profiles(id) ON DELETE CASCADE,
    date    TEXT    NOT NULL,        -- RFC 3339 UTC, fixed microsecond width
    score   REAL,
    note    TEXT
);

CREATE INDEX IF NOT EXISTS poop_logs_cat_idx ON poop_logs(cat_id, date);

PRAGMA user_version = 1;
";
