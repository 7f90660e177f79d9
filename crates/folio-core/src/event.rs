//! Domain events — the fundamental unit of the folio submission store.
//!
//! An event is an immutable, attributed record of one intended change to a
//! submission. Events are never mutated after construction; a submission's
//! history is an append-only sequence of them, and its current state is
//! recomputed by folding that sequence in order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, actor::Attribution};

// ─── Payload leaf types ──────────────────────────────────────────────────────

/// A license selected for the submission's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
  pub name: Option<String>,
  pub uri:  String,
}

/// A category in the classification taxonomy, e.g. `astro-ph.GA`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
  pub category: String,
}

/// One entry in a submission's author list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorEntry {
  /// Zero-based position among the submission's authors. Input that omits it
  /// gets the entry's position in the supplied list.
  pub order:       u32,
  pub forename:    String,
  pub surname:     String,
  pub email:       String,
  pub affiliation: Option<String>,
}

// ─── Metadata fields ─────────────────────────────────────────────────────────

/// The recognized metadata field names, in canonical order.
///
/// Membership in this enum is the allow-list: unrecognized keys in an update
/// document are dropped, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
  Title,
  Abstract,
  Comments,
  MscClass,
  AcmClass,
  Doi,
  JournalRef,
}

impl MetadataField {
  /// All recognized fields, in canonical order.
  pub const ALL: [Self; 7] = [
    Self::Title,
    Self::Abstract,
    Self::Comments,
    Self::MscClass,
    Self::AcmClass,
    Self::Doi,
    Self::JournalRef,
  ];

  /// The document key and storage name for this field.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn key(self) -> &'static str {
    match self {
      Self::Title => "title",
      Self::Abstract => "abstract",
      Self::Comments => "comments",
      Self::MscClass => "msc_class",
      Self::AcmClass => "acm_class",
      Self::Doi => "doi",
      Self::JournalRef => "journal_ref",
    }
  }
}

// ─── EventPayload ────────────────────────────────────────────────────────────

/// The kind-specific payload of an event. The variant name doubles as the
/// `event_type` discriminant stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventPayload {
  /// Open a new submission. Always the first event of a history.
  CreateSubmission,
  /// The submitter asserts (or denies) being an author of the work.
  AssertAuthorship { submitter_is_author: bool },
  SelectLicense(License),
  /// The submitter accepts the submission policy.
  AcceptPolicy,
  SetPrimaryClassification(Classification),
  AddSecondaryClassification(Classification),
  /// Overwrite exactly the named metadata fields, leaving others untouched.
  /// Emitted even with an empty field set when the update document carried a
  /// `metadata` key.
  UpdateMetadata { fields: Vec<(MetadataField, String)> },
  /// Replace the whole author list with `authors`, in order.
  UpdateAuthors { authors: Vec<AuthorEntry> },
}

impl EventPayload {
  /// The discriminant string stored in the `event_type` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn discriminant(&self) -> &'static str {
    match self {
      Self::CreateSubmission => "create_submission",
      Self::AssertAuthorship { .. } => "assert_authorship",
      Self::SelectLicense(_) => "select_license",
      Self::AcceptPolicy => "accept_policy",
      Self::SetPrimaryClassification(_) => "set_primary_classification",
      Self::AddSecondaryClassification(_) => "add_secondary_classification",
      Self::UpdateMetadata { .. } => "update_metadata",
      Self::UpdateAuthors { .. } => "update_authors",
    }
  }

  /// Serialise the inner payload (without the type tag) for the
  /// `payload_json` database column.
  pub fn to_json(&self) -> Result<serde_json::Value> {
    // The full serialised form is `{"type": "...", "data": <payload>}`.
    // We want only the payload.
    let full = serde_json::to_value(self)?;
    Ok(full.get("data").cloned().unwrap_or(serde_json::Value::Null))
  }

  /// Deserialise from the discriminant string and JSON payload stored in the
  /// database.
  pub fn from_parts(
    discriminant: &str,
    data: serde_json::Value,
  ) -> Result<Self> {
    let wrapped = serde_json::json!({ "type": discriminant, "data": data });
    Ok(serde_json::from_value(wrapped)?)
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// A not-yet-persisted event, as produced by the update compiler. The store
/// assigns identity, position, and timestamp when it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub attribution: Attribution,
  pub payload:     EventPayload,
}

impl Event {
  pub fn new(attribution: Attribution, payload: EventPayload) -> Self {
    Self { attribution, payload }
  }
}

// ─── RecordedEvent ───────────────────────────────────────────────────────────

/// An event as persisted: its position in the submission's history plus the
/// store-assigned identity and timestamp. Never mutated after recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
  pub event_id:      Uuid,
  pub submission_id: Uuid,
  /// Zero-based position in the submission's history.
  pub sequence:      u64,
  /// Server-assigned timestamp; never changes after recording.
  pub recorded_at:   DateTime<Utc>,
  pub attribution:   Attribution,
  pub payload:       EventPayload,
}
