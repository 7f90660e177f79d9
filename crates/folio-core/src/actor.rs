//! Actors — the identities that events are attributed to.
//!
//! Every event records who caused it, as a triple: the creator (whose
//! submission it is), the client application that made the call, and — for
//! delegated requests — the proxy who acted on the creator's behalf.

use serde::{Deserialize, Serialize};

// ─── Endorsement ─────────────────────────────────────────────────────────────

/// A category-endorsement grant held by a person, e.g. `astro-ph.GA`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endorsement {
  pub archive:       String,
  pub subject_class: String,
}

impl Endorsement {
  /// Split a dotted category string into archive and subject class:
  /// `"astro-ph.GA"` → (`astro-ph`, `GA`). A string without a dot endorses
  /// the whole archive (empty subject class).
  pub fn parse(s: &str) -> Self {
    match s.split_once('.') {
      Some((archive, subject_class)) => Self {
        archive:       archive.to_owned(),
        subject_class: subject_class.to_owned(),
      },
      None => Self { archive: s.to_owned(), subject_class: String::new() },
    }
  }
}

// ─── Actor ───────────────────────────────────────────────────────────────────

/// An identity that events can be attributed to. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "agent_type", rename_all = "snake_case")]
pub enum Actor {
  /// A human user, identified by the stable id issued upstream.
  Person {
    native_id:    String,
    email:        Option<String>,
    #[serde(default)]
    endorsements: Vec<Endorsement>,
  },
  /// The calling application.
  Application { native_id: String },
  /// An automated process acting with no human in the loop.
  Process { native_id: String },
}

impl Actor {
  /// A person known only by identifier — no email, no endorsements. Used for
  /// the subject of an on-behalf-of request.
  pub fn person(native_id: impl Into<String>) -> Self {
    Self::Person {
      native_id:    native_id.into(),
      email:        None,
      endorsements: Vec::new(),
    }
  }

  pub fn native_id(&self) -> &str {
    match self {
      Self::Person { native_id, .. }
      | Self::Application { native_id }
      | Self::Process { native_id } => native_id,
    }
  }
}

// ─── Attribution ─────────────────────────────────────────────────────────────

/// The (creator, client, proxy) identity bundle recorded on every event.
///
/// If `proxy` is set, `creator` is the impersonated subject and `proxy` the
/// authenticated actor who performed the action on the subject's behalf.
/// `client` is always the calling application, delegated or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
  pub creator: Actor,
  pub client:  Actor,
  pub proxy:   Option<Actor>,
}
