//! The submission orchestrator — composes the compiler with the event store
//! and shapes every outcome into a uniform reply envelope.

use std::sync::Arc;

use axum::{
  Json,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use folio_core::{
  actor::Attribution,
  event::{Event, EventPayload},
  store::EventStore,
  submission::Submission,
};
use uuid::Uuid;

use crate::{
  compile::{UpdateDocument, compile},
  error::ApiError,
};

// ─── Reply envelope ──────────────────────────────────────────────────────────

/// The uniform (body, status, headers) envelope every operation returns.
#[derive(Debug)]
pub struct Reply {
  pub body:     Submission,
  pub status:   StatusCode,
  /// Canonical reference to the submission resource, when one is returned.
  pub location: Option<String>,
}

impl IntoResponse for Reply {
  fn into_response(self) -> Response {
    match self.location {
      Some(location) => {
        (self.status, [(header::LOCATION, location)], Json(self.body))
          .into_response()
      }
      None => (self.status, Json(self.body)).into_response(),
    }
  }
}

/// The canonical reference to a submission resource. Create and update both
/// use this one form.
pub fn submission_location(submission_id: Uuid) -> String {
  format!("/submissions/{submission_id}")
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

/// Drives create/update/read operations against an [`EventStore`].
///
/// Store outcomes convert into the [`ApiError`] taxonomy on the way out; no
/// raw store error escapes this boundary.
pub struct SubmissionOrchestrator<S> {
  store: Arc<S>,
}

impl<S: EventStore> SubmissionOrchestrator<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Open a new submission from `document`.
  ///
  /// The compiled list is prepended with a `CreateSubmission` — always
  /// present, always index 0 — and submitted as one atomic append.
  pub async fn create(
    &self,
    document: &UpdateDocument,
    attribution: &Attribution,
  ) -> Result<Reply, ApiError> {
    let compiled = compile(document, attribution)?;
    let mut events =
      vec![Event::new(attribution.clone(), EventPayload::CreateSubmission)];
    events.extend(compiled);

    let (submission, _) = self.store.create(events).await?;
    Ok(Reply {
      location: Some(submission_location(submission.submission_id)),
      status:   StatusCode::CREATED,
      body:     submission,
    })
  }

  /// Apply `document` to an existing submission.
  ///
  /// An empty compiled list is submitted as-is; the store answers with the
  /// unchanged snapshot.
  pub async fn update(
    &self,
    submission_id: Uuid,
    document: &UpdateDocument,
    attribution: &Attribution,
  ) -> Result<Reply, ApiError> {
    let events = compile(document, attribution)?;
    let (submission, _) = self.store.append(submission_id, events).await?;
    Ok(Reply {
      location: Some(submission_location(submission.submission_id)),
      status:   StatusCode::OK,
      body:     submission,
    })
  }

  /// The current snapshot of a submission.
  pub async fn get(&self, submission_id: Uuid) -> Result<Reply, ApiError> {
    let (submission, _) = self.store.load(submission_id).await?;
    Ok(Reply { location: None, status: StatusCode::OK, body: submission })
  }
}
