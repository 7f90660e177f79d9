//! Handlers for `/submissions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/submissions` | Body: [`UpdateDocument`]; 201 + Location |
//! | `POST` | `/submissions/:id` | Body: [`UpdateDocument`]; 200 + Location |
//! | `GET`  | `/submissions/:id` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::HeaderMap,
};
use folio_core::store::EventStore;
use tracing::debug;
use uuid::Uuid;

use crate::{
  compile::UpdateDocument,
  error::ApiError,
  identity::{RequestIdentity, resolve},
  orchestrate::{Reply, SubmissionOrchestrator},
};

/// `POST /submissions`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  identity: RequestIdentity,
  headers: HeaderMap,
  Json(document): Json<UpdateDocument>,
) -> Result<Reply, ApiError>
where
  S: EventStore,
{
  debug!("received request to create submission");
  let attribution = resolve(&headers, &identity.user, &identity.client);
  debug!(?attribution, "resolved acting identity");
  SubmissionOrchestrator::new(store)
    .create(&document, &attribution)
    .await
}

/// `POST /submissions/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  identity: RequestIdentity,
  headers: HeaderMap,
  Json(document): Json<UpdateDocument>,
) -> Result<Reply, ApiError>
where
  S: EventStore,
{
  let attribution = resolve(&headers, &identity.user, &identity.client);
  SubmissionOrchestrator::new(store)
    .update(id, &document, &attribution)
    .await
}

/// `GET /submissions/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Reply, ApiError>
where
  S: EventStore,
{
  SubmissionOrchestrator::new(store).get(id).await
}
