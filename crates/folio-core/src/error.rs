//! Error types for `folio-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("submission is already created")]
  AlreadyCreated,

  #[error("cannot apply {0:?} before the submission is created")]
  NotYetCreated(&'static str),

  #[error("license uri cannot be empty")]
  EmptyLicenseUri,

  #[error("classification category cannot be empty")]
  EmptyCategory,

  #[error("category {0:?} is already attached to the submission")]
  DuplicateCategory(String),

  #[error("author order {0} appears more than once")]
  DuplicateAuthorOrder(u32),

  #[error("event history is empty")]
  EmptyHistory,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
