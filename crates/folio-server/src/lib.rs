//! Hosting layer for the folio submission metadata service.
//!
//! Wires configuration, request tracing, and the API surface together over
//! any event store. Authentication is not implemented here: handlers trust
//! the `X-Auth-*` identity headers an upstream gateway sets (see
//! [`folio_api::identity`]), so this server must only be reachable through
//! that gateway.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use folio_core::store::EventStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the service router: the API surface plus request tracing.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: EventStore + 'static,
{
  folio_api::api_router(store).layer(TraceLayer::new_for_http())
}
