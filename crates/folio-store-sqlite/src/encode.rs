//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, attribution triples and event
//! payloads as compact JSON, UUIDs as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use folio_core::{
  actor::Attribution,
  event::{EventPayload, RecordedEvent},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Attribution ─────────────────────────────────────────────────────────────

pub fn encode_attribution(attribution: &Attribution) -> Result<String> {
  Ok(serde_json::to_string(attribution)?)
}

pub fn decode_attribution(s: &str) -> Result<Attribution> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `events` row.
pub struct RawEvent {
  pub event_id:         String,
  pub submission_id:    String,
  pub sequence:         i64,
  pub event_type:       String,
  pub attribution_json: String,
  pub payload_json:     String,
  pub recorded_at:      String,
}

impl RawEvent {
  pub fn decode(self) -> Result<RecordedEvent> {
    let payload = EventPayload::from_parts(
      &self.event_type,
      serde_json::from_str(&self.payload_json)?,
    )?;

    Ok(RecordedEvent {
      event_id: decode_uuid(&self.event_id)?,
      submission_id: decode_uuid(&self.submission_id)?,
      sequence: self.sequence as u64,
      recorded_at: decode_dt(&self.recorded_at)?,
      attribution: decode_attribution(&self.attribution_json)?,
      payload,
    })
  }
}
