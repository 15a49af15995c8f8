//! SQL schema for the inventory SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `(name, location)` is indexed, not UNIQUE; uniqueness is
/// an opt-in check in the store.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS products (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT    NOT NULL,
    quantity      INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
    location      TEXT    NOT NULL CHECK (location IN ('box', 'apartment')),
    description   TEXT,
    last_modified TEXT    NOT NULL   -- RFC 3339 UTC, fixed width
);

-- Append-only; rows leave only through the cascade.
CREATE TABLE IF NOT EXISTS product_history (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id   INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    timestamp    TEXT    NOT NULL,
    action       TEXT    NOT NULL CHECK (action IN ('create', 'update', 'delete', 'reset')),
    old_quantity INTEGER,
    new_quantity INTEGER,
    old_location TEXT,
    new_location TEXT
);

CREATE INDEX IF NOT EXISTS products_name_location_idx ON products(name, location);
CREATE INDEX IF NOT EXISTS history_product_idx        ON product_history(product_id);
CREATE INDEX IF NOT EXISTS history_action_idx         ON product_history(action);
CREATE INDEX IF NOT EXISTS history_timestamp_idx      ON product_history(timestamp);

PRAGMA user_version = 1;
";
