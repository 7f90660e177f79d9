//! The update compiler — a pure function from a partial update document to
//! an ordered list of domain events.
//!
//! Rules run in a fixed order; consumers of the emitted list rely on event
//! positions. The compiler performs no I/O and holds no state.

use std::collections::BTreeMap;

use folio_core::{
  actor::Attribution,
  event::{
    AuthorEntry, Classification, Event, EventPayload, License, MetadataField,
  },
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Document types ──────────────────────────────────────────────────────────

/// A partial update document, as deserialized from a request body.
///
/// Unrecognized top-level keys are ignored. Rejecting malformed shapes is
/// the deserializer's job, before the compiler runs.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDocument {
  pub submitter_is_author:      Option<bool>,
  pub license:                  Option<LicenseDoc>,
  pub submitter_accepts_policy: Option<bool>,
  pub primary_classification:   Option<ClassificationDoc>,
  #[serde(default)]
  pub secondary_classification: Vec<ClassificationDoc>,
  pub metadata:                 Option<MetadataDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LicenseDoc {
  pub name: Option<String>,
  /// Required; its absence fails the whole compilation.
  pub uri:  Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationDoc {
  pub category: String,
}

/// The `metadata` sub-document. `authors` is pulled out; every other key
/// lands in `fields`, where the allow-list filter picks out the recognized
/// ones.
#[derive(Debug, Default, Deserialize)]
pub struct MetadataDoc {
  pub authors: Option<Vec<AuthorDoc>>,
  #[serde(flatten)]
  pub fields:  BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorDoc {
  pub forename:    String,
  pub surname:     String,
  pub email:       String,
  pub affiliation: Option<String>,
  pub order:       Option<u32>,
}

impl AuthorDoc {
  /// Build the domain entry, defaulting a missing `order` to the entry's
  /// zero-based position in the supplied list.
  fn into_entry(self, position: usize) -> AuthorEntry {
    AuthorEntry {
      order:       self.order.unwrap_or(position as u32),
      forename:    self.forename,
      surname:     self.surname,
      email:       self.email,
      affiliation: self.affiliation,
    }
  }
}

// ─── Compiler ────────────────────────────────────────────────────────────────

/// Compile `document` into the ordered event list it describes.
///
/// Every produced event carries a clone of `attribution`. A document with
/// none of the recognized keys compiles to an empty list; whether an empty
/// update is acceptable is the caller's decision.
pub fn compile(
  document: &UpdateDocument,
  attribution: &Attribution,
) -> Result<Vec<Event>, ApiError> {
  let mut events = Vec::new();

  if let Some(submitter_is_author) = document.submitter_is_author {
    events.push(Event::new(
      attribution.clone(),
      EventPayload::AssertAuthorship { submitter_is_author },
    ));
  }

  if let Some(license) = &document.license {
    let uri = license
      .uri
      .clone()
      .ok_or_else(|| ApiError::Validation("license requires a uri".into()))?;
    events.push(Event::new(
      attribution.clone(),
      EventPayload::SelectLicense(License { name: license.name.clone(), uri }),
    ));
  }

  if document.submitter_accepts_policy == Some(true) {
    events.push(Event::new(attribution.clone(), EventPayload::AcceptPolicy));
  }

  if let Some(primary) = &document.primary_classification {
    events.push(Event::new(
      attribution.clone(),
      EventPayload::SetPrimaryClassification(Classification {
        category: primary.category.clone(),
      }),
    ));
  }

  for secondary in &document.secondary_classification {
    events.push(Event::new(
      attribution.clone(),
      EventPayload::AddSecondaryClassification(Classification {
        category: secondary.category.clone(),
      }),
    ));
  }

  if let Some(metadata) = &document.metadata {
    // Intersect the input keys with the recognized-field allow-list, in
    // canonical field order. Emitted even when the set comes out empty.
    let fields = MetadataField::ALL
      .into_iter()
      .filter_map(|field| {
        metadata.fields.get(field.key()).map(|value| (field, value.clone()))
      })
      .collect();
    events.push(Event::new(
      attribution.clone(),
      EventPayload::UpdateMetadata { fields },
    ));

    if let Some(authors) = &metadata.authors {
      let authors = authors
        .iter()
        .enumerate()
        .map(|(position, author)| author.clone().into_entry(position))
        .collect();
      events.push(Event::new(
        attribution.clone(),
        EventPayload::UpdateAuthors { authors },
      ));
    }
  }

  Ok(events)
}
