//! Orchestrator tests against hand-written stub stores.
//!
//! The stubs stand in for the event store: one records every event list it
//! is handed and answers with a canned snapshot, the others fail from a
//! script. This keeps the orchestrator's translation and sequencing rules
//! observable without a database.

use std::{
  future::Future,
  sync::{Arc, Mutex},
};

use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;
use folio_core::{
  actor::{Actor, Attribution},
  event::{Classification, Event, EventPayload, RecordedEvent},
  store::{EventStore, StoreError},
  submission::{Submission, SubmissionMetadata},
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::{
  compile::UpdateDocument,
  error::ApiError,
  identity::{AuthenticatedClient, AuthenticatedUser},
  orchestrate::SubmissionOrchestrator,
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn attribution() -> Attribution {
  let headers = HeaderMap::new();
  let user = AuthenticatedUser {
    user_id:      "1234".into(),
    email:        "foo@bar.baz".into(),
    endorsements: Vec::new(),
  };
  let client = AuthenticatedClient { client_id: "5678".into() };
  crate::identity::resolve(&headers, &user, &client)
}

fn document(value: serde_json::Value) -> UpdateDocument {
  serde_json::from_value(value).expect("document deserializes")
}

fn snapshot(submission_id: Uuid) -> Submission {
  let attribution = attribution();
  Submission {
    submission_id,
    created_at: Utc::now(),
    creator: attribution.creator,
    client: attribution.client,
    proxy: None,
    submitter_is_author: None,
    license: None,
    submitter_accepts_policy: false,
    primary_classification: None,
    secondary_classification: Vec::new(),
    metadata: SubmissionMetadata::default(),
    authors: Vec::new(),
  }
}

// ─── Stub stores ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("the database is down")]
struct Boom;

/// What the stub should answer with.
enum Script {
  Succeed,
  NoSuchSubmission,
  InvalidEvent,
  PersistenceFailure,
  UnclassifiedFault,
}

/// An in-memory stand-in for the event store. Records every event list it
/// receives; answers from the script.
struct StubStore {
  script:   Script,
  received: Mutex<Vec<Vec<Event>>>,
}

impl StubStore {
  fn new(script: Script) -> Self {
    Self { script, received: Mutex::new(Vec::new()) }
  }

  fn received(&self) -> Vec<Vec<Event>> {
    self.received.lock().unwrap().clone()
  }

  fn answer(
    &self,
    submission_id: Uuid,
  ) -> Result<(Submission, Vec<RecordedEvent>), StoreError> {
    match self.script {
      Script::Succeed => Ok((snapshot(submission_id), Vec::new())),
      Script::NoSuchSubmission => {
        Err(StoreError::NoSuchSubmission(submission_id))
      }
      Script::InvalidEvent => Err(StoreError::InvalidEvent(
        folio_core::Error::DuplicateCategory("cs.AI".into()),
      )),
      Script::PersistenceFailure => Err(StoreError::persistence(Boom)),
      Script::UnclassifiedFault => Err(StoreError::other(Boom)),
    }
  }
}

impl EventStore for StubStore {
  fn create(
    &self,
    events: Vec<Event>,
  ) -> impl Future<Output = Result<(Submission, Vec<RecordedEvent>), StoreError>>
  + Send
  + '_ {
    self.received.lock().unwrap().push(events);
    let result = self.answer(Uuid::new_v4());
    async move { result }
  }

  fn append(
    &self,
    submission_id: Uuid,
    events: Vec<Event>,
  ) -> impl Future<Output = Result<(Submission, Vec<RecordedEvent>), StoreError>>
  + Send
  + '_ {
    self.received.lock().unwrap().push(events);
    let result = self.answer(submission_id);
    async move { result }
  }

  fn load(
    &self,
    submission_id: Uuid,
  ) -> impl Future<Output = Result<(Submission, Vec<RecordedEvent>), StoreError>>
  + Send
  + '_ {
    let result = self.answer(submission_id);
    async move { result }
  }
}

fn orchestrator(
  script: Script,
) -> (Arc<StubStore>, SubmissionOrchestrator<StubStore>) {
  let store = Arc::new(StubStore::new(script));
  (store.clone(), SubmissionOrchestrator::new(store))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_emits_create_submission_first() {
  let (store, orch) = orchestrator(Script::Succeed);
  let doc = document(json!({
    "primary_classification": { "category": "astro-ph.GA" },
  }));

  let reply = orch.create(&doc, &attribution()).await.unwrap();

  assert_eq!(reply.status, StatusCode::CREATED);
  assert!(reply.location.is_some(), "should include a Location reference");

  let sent = store.received();
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0][0].payload, EventPayload::CreateSubmission);
  assert_eq!(
    sent[0][1].payload,
    EventPayload::SetPrimaryClassification(Classification {
      category: "astro-ph.GA".into(),
    })
  );
}

#[tokio::test]
async fn create_with_empty_document_still_creates() {
  let (store, orch) = orchestrator(Script::Succeed);

  let reply = orch.create(&document(json!({})), &attribution()).await.unwrap();

  assert_eq!(reply.status, StatusCode::CREATED);
  let sent = store.received();
  assert_eq!(sent[0].len(), 1);
  assert_eq!(sent[0][0].payload, EventPayload::CreateSubmission);
}

#[tokio::test]
async fn create_with_invalid_license_never_reaches_the_store() {
  let (store, orch) = orchestrator(Script::Succeed);
  let doc = document(json!({ "license": { "name": "CC BY 4.0" } }));

  let err = orch.create(&doc, &attribution()).await.unwrap_err();

  assert!(matches!(err, ApiError::Validation(_)));
  assert!(store.received().is_empty());
}

#[tokio::test]
async fn create_when_store_rejects_events_is_a_client_fault() {
  let (_, orch) = orchestrator(Script::InvalidEvent);
  let doc = document(json!({
    "primary_classification": { "category": "astro-ph.GA" },
  }));

  let err = orch.create(&doc, &attribution()).await.unwrap_err();
  assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn create_when_store_is_down_is_a_persistence_fault() {
  let (_, orch) = orchestrator(Script::PersistenceFailure);

  let err =
    orch.create(&document(json!({})), &attribution()).await.unwrap_err();
  assert!(matches!(err, ApiError::Persistence(_)));
}

#[tokio::test]
async fn create_on_unclassified_store_fault_answers_generically() {
  let (_, orch) = orchestrator(Script::UnclassifiedFault);

  let err =
    orch.create(&document(json!({})), &attribution()).await.unwrap_err();
  assert!(matches!(err, ApiError::Unhandled));
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_succeeds_with_location() {
  let (store, orch) = orchestrator(Script::Succeed);
  let doc = document(json!({ "submitter_accepts_policy": true }));

  let reply =
    orch.update(Uuid::new_v4(), &doc, &attribution()).await.unwrap();

  assert_eq!(reply.status, StatusCode::OK);
  assert_eq!(
    reply.location.as_deref(),
    Some(format!("/submissions/{}", reply.body.submission_id).as_str())
  );

  let sent = store.received();
  assert_eq!(sent[0].len(), 1);
  assert_eq!(sent[0][0].payload, EventPayload::AcceptPolicy);
}

#[tokio::test]
async fn update_with_empty_document_submits_an_empty_list() {
  let (store, orch) = orchestrator(Script::Succeed);

  orch
    .update(Uuid::new_v4(), &document(json!({})), &attribution())
    .await
    .unwrap();

  assert_eq!(store.received(), vec![Vec::<Event>::new()]);
}

#[tokio::test]
async fn update_of_unknown_submission_is_not_found() {
  let (_, orch) = orchestrator(Script::NoSuchSubmission);

  let err = orch
    .update(Uuid::new_v4(), &document(json!({})), &attribution())
    .await
    .unwrap_err();
  assert!(matches!(err, ApiError::NotFound(_)));
}

// ─── Get ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_returns_the_snapshot() {
  let (_, orch) = orchestrator(Script::Succeed);
  let id = Uuid::new_v4();

  let reply = orch.get(id).await.unwrap();

  assert_eq!(reply.status, StatusCode::OK);
  assert_eq!(reply.body.submission_id, id);
  assert!(reply.location.is_none());
}

#[tokio::test]
async fn get_of_unknown_submission_is_not_found() {
  let (_, orch) = orchestrator(Script::NoSuchSubmission);

  let err = orch.get(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn get_on_unclassified_store_fault_answers_generically() {
  let (_, orch) = orchestrator(Script::UnclassifiedFault);

  let err = orch.get(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, ApiError::Unhandled));
}
