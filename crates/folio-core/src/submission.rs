//! Submission — the materialized read model.
//!
//! A submission is never stored or mutated in place; it is recomputed by
//! folding the recorded event history in sequence order. Each application
//! step also enforces the business rules an event must satisfy against the
//! state it lands on.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  actor::{Actor, Attribution},
  event::{
    AuthorEntry, Classification, EventPayload, License, MetadataField,
    RecordedEvent,
  },
};

// ─── Metadata ────────────────────────────────────────────────────────────────

/// The scalar metadata fields of a submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionMetadata {
  pub title:         Option<String>,
  #[serde(rename = "abstract")]
  pub abstract_text: Option<String>,
  pub comments:      Option<String>,
  pub msc_class:     Option<String>,
  pub acm_class:     Option<String>,
  pub doi:           Option<String>,
  pub journal_ref:   Option<String>,
}

impl SubmissionMetadata {
  /// Overwrite the field named by `field`; all others are left untouched.
  pub fn set(&mut self, field: MetadataField, value: String) {
    match field {
      MetadataField::Title => self.title = Some(value),
      MetadataField::Abstract => self.abstract_text = Some(value),
      MetadataField::Comments => self.comments = Some(value),
      MetadataField::MscClass => self.msc_class = Some(value),
      MetadataField::AcmClass => self.acm_class = Some(value),
      MetadataField::Doi => self.doi = Some(value),
      MetadataField::JournalRef => self.journal_ref = Some(value),
    }
  }
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// The computed current state of a submission — never stored, always derived
/// from the event history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
  pub submission_id:            Uuid,
  pub created_at:               DateTime<Utc>,
  pub creator:                  Actor,
  pub client:                   Actor,
  pub proxy:                    Option<Actor>,
  pub submitter_is_author:      Option<bool>,
  pub license:                  Option<License>,
  pub submitter_accepts_policy: bool,
  pub primary_classification:   Option<Classification>,
  /// Secondary categories in the order they were added.
  pub secondary_classification: Vec<Classification>,
  pub metadata:                 SubmissionMetadata,
  pub authors:                  Vec<AuthorEntry>,
}

impl Submission {
  /// The empty state opened by a `CreateSubmission` event.
  fn open(attribution: &Attribution, submission_id: Uuid, at: DateTime<Utc>) -> Self {
    Self {
      submission_id,
      created_at: at,
      creator: attribution.creator.clone(),
      client: attribution.client.clone(),
      proxy: attribution.proxy.clone(),
      submitter_is_author: None,
      license: None,
      submitter_accepts_policy: false,
      primary_classification: None,
      secondary_classification: Vec::new(),
      metadata: SubmissionMetadata::default(),
      authors: Vec::new(),
    }
  }

  /// Apply one event to `state`, producing the next state.
  ///
  /// `state` is `None` only before the first event of a history;
  /// `CreateSubmission` is the only payload valid there. A rule violation
  /// rejects the event and leaves no trace on the state.
  pub fn apply(
    state: Option<Self>,
    attribution: &Attribution,
    payload: &EventPayload,
    submission_id: Uuid,
    at: DateTime<Utc>,
  ) -> Result<Self> {
    if matches!(payload, EventPayload::CreateSubmission) {
      if state.is_some() {
        return Err(Error::AlreadyCreated);
      }
      return Ok(Self::open(attribution, submission_id, at));
    }

    let mut submission =
      state.ok_or_else(|| Error::NotYetCreated(payload.discriminant()))?;

    match payload {
      // Handled above.
      EventPayload::CreateSubmission => {}

      EventPayload::AssertAuthorship { submitter_is_author } => {
        submission.submitter_is_author = Some(*submitter_is_author);
      }

      EventPayload::SelectLicense(license) => {
        if license.uri.is_empty() {
          return Err(Error::EmptyLicenseUri);
        }
        submission.license = Some(license.clone());
      }

      EventPayload::AcceptPolicy => {
        submission.submitter_accepts_policy = true;
      }

      EventPayload::SetPrimaryClassification(classification) => {
        if classification.category.is_empty() {
          return Err(Error::EmptyCategory);
        }
        if submission
          .secondary_classification
          .iter()
          .any(|c| c.category == classification.category)
        {
          return Err(Error::DuplicateCategory(classification.category.clone()));
        }
        submission.primary_classification = Some(classification.clone());
      }

      EventPayload::AddSecondaryClassification(classification) => {
        if classification.category.is_empty() {
          return Err(Error::EmptyCategory);
        }
        let taken = submission
          .primary_classification
          .iter()
          .chain(submission.secondary_classification.iter())
          .any(|c| c.category == classification.category);
        if taken {
          return Err(Error::DuplicateCategory(classification.category.clone()));
        }
        submission.secondary_classification.push(classification.clone());
      }

      EventPayload::UpdateMetadata { fields } => {
        for (field, value) in fields {
          submission.metadata.set(*field, value.clone());
        }
      }

      EventPayload::UpdateAuthors { authors } => {
        let mut orders = HashSet::new();
        for author in authors {
          if !orders.insert(author.order) {
            return Err(Error::DuplicateAuthorOrder(author.order));
          }
        }
        submission.authors = authors.clone();
      }
    }

    Ok(submission)
  }

  /// Rebuild the current state by folding a recorded history, oldest first.
  pub fn replay<'a>(
    events: impl IntoIterator<Item = &'a RecordedEvent>,
  ) -> Result<Self> {
    let mut state = None;
    for event in events {
      state = Some(Self::apply(
        state,
        &event.attribution,
        &event.payload,
        event.submission_id,
        event.recorded_at,
      )?);
    }
    state.ok_or(Error::EmptyHistory)
  }
}
