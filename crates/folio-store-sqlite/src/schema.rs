//! SQL schema for the folio SQLite event store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` pragma.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Event histories are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS events (
    event_id         TEXT PRIMARY KEY,
    submission_id    TEXT NOT NULL,
    sequence         INTEGER NOT NULL,  -- zero-based position in the history
    event_type       TEXT NOT NULL,     -- discriminant of EventPayload variant
    attribution_json TEXT NOT NULL,     -- creator/client/proxy triple
    payload_json     TEXT NOT NULL,     -- JSON payload (inner data only)
    recorded_at      TEXT NOT NULL,     -- ISO 8601 UTC; server-assigned
    UNIQUE (submission_id, sequence)    -- optimistic-concurrency guard
);

CREATE INDEX IF NOT EXISTS events_submission_idx
    ON events(submission_id, sequence);

PRAGMA user_version = 1;
";
