//! The `EventStore` trait and the store outcome taxonomy.
//!
//! The trait is implemented by storage backends (e.g. `folio-store-sqlite`).
//! Higher layers (`folio-api`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use thiserror::Error;
use uuid::Uuid;

use crate::{
  event::{Event, RecordedEvent},
  submission::Submission,
};

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Why a store operation failed. This is the complete set of outcomes the
/// orchestration layer interprets; backends fold their internal errors into
/// these variants rather than exposing their own types.
#[derive(Debug, Error)]
pub enum StoreError {
  /// The referenced submission does not exist.
  #[error("no submission found with id {0}")]
  NoSuchSubmission(Uuid),

  /// The submitted event sequence was rejected as semantically invalid.
  /// The command list is rejected as a whole; nothing is recorded.
  #[error("invalid event: {0}")]
  InvalidEvent(#[from] crate::Error),

  /// The backend failed to read or durably append. Retrying is the caller's
  /// decision; the store itself never retries.
  #[error("persistence failure: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// Anything else a backend can produce. Translated to a generic fault at
  /// the orchestration boundary, never shown to a caller.
  #[error("event store fault: {0}")]
  Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
  /// Wrap a backend failure as a persistence outcome.
  pub fn persistence(
    err: impl std::error::Error + Send + Sync + 'static,
  ) -> Self {
    Self::Persistence(Box::new(err))
  }

  /// Wrap an unclassified backend failure.
  pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Other(Box::new(err))
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an append-only submission event store.
///
/// Histories are keyed by submission id. Writes append, never update; the
/// current state is recomputed by folding the history on read. Two
/// concurrent appends against one submission are serialized or
/// conflict-detected by the backend, not by callers.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (tokio with axum).
pub trait EventStore: Send + Sync {
  /// Open a new submission from `events`, appended as one atomic unit.
  ///
  /// The first event must be a `CreateSubmission`; every event is validated
  /// against the state it lands on. On rejection nothing is recorded and no
  /// partial application is visible to any reader.
  fn create(
    &self,
    events: Vec<Event>,
  ) -> impl Future<Output = Result<(Submission, Vec<RecordedEvent>), StoreError>>
  + Send
  + '_;

  /// Append `events` to an existing submission's history, continuing its
  /// sequence numbering. An empty list is valid and returns the current
  /// snapshot unchanged.
  fn append(
    &self,
    submission_id: Uuid,
    events: Vec<Event>,
  ) -> impl Future<Output = Result<(Submission, Vec<RecordedEvent>), StoreError>>
  + Send
  + '_;

  /// Load the full history of a submission, oldest first, together with the
  /// snapshot folded from it.
  fn load(
    &self,
    submission_id: Uuid,
  ) -> impl Future<Output = Result<(Submission, Vec<RecordedEvent>), StoreError>>
  + Send
  + '_;
}
