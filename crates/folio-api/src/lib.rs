//! JSON REST API for the folio submission metadata service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`folio_core::store::EventStore`]. Update documents are compiled into
//! ordered event lists, attributed to the identity resolved from the request,
//! and handed to the store as one atomic append; responses are built from the
//! snapshot the store folds back.
//!
//! Authentication, TLS, and transport concerns are the caller's
//! responsibility; handlers trust the gateway identity headers described in
//! [`identity`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(folio_api::api_router(store.clone()))
//! ```

pub mod compile;
pub mod error;
pub mod identity;
pub mod orchestrate;
pub mod submissions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use folio_core::store::EventStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: EventStore + 'static,
{
  Router::new()
    .route("/submissions", post(submissions::create::<S>))
    .route(
      "/submissions/{id}",
      get(submissions::get_one::<S>).post(submissions::update::<S>),
    )
    .with_state(store)
}

#[cfg(test)]
mod tests;
