//! Identity resolution — who is acting, on whose behalf, through which
//! client.
//!
//! Authentication happens upstream; this service trusts the `X-Auth-*`
//! headers its gateway sets. [`resolve`] turns that identity plus the
//! optional `X-On-Behalf-Of` delegation header into the [`Attribution`]
//! stamped on every event compiled from a request.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use folio_core::actor::{Actor, Attribution, Endorsement};

use crate::error::ApiError;

/// Gateway header carrying the authenticated user's stable id.
pub const USER_ID_HEADER: &str = "x-auth-user-id";
/// Gateway header carrying the authenticated user's email.
pub const USER_EMAIL_HEADER: &str = "x-auth-user-email";
/// Gateway header carrying the calling application's stable id.
pub const CLIENT_ID_HEADER: &str = "x-auth-client-id";
/// Optional gateway header with comma-separated category endorsements.
pub const ENDORSEMENTS_HEADER: &str = "x-auth-endorsements";
/// Optional header naming the subject a delegated request acts for.
pub const ON_BEHALF_OF_HEADER: &str = "x-on-behalf-of";

// ─── Authenticated identity ──────────────────────────────────────────────────

/// The authenticated user, as asserted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
  pub user_id:      String,
  pub email:        String,
  pub endorsements: Vec<Endorsement>,
}

/// The calling application, as asserted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedClient {
  pub client_id: String,
}

/// The full per-request identity bundle.
///
/// As an extractor it rejects with 401 when a required identity header is
/// missing, before any handler logic runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
  pub user:   AuthenticatedUser,
  pub client: AuthenticatedClient,
}

impl<S> FromRequestParts<S> for RequestIdentity
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    let headers = &parts.headers;
    let user_id = require(headers, USER_ID_HEADER)?;
    let email = require(headers, USER_EMAIL_HEADER)?;
    let client_id = require(headers, CLIENT_ID_HEADER)?;
    let endorsements = headers
      .get(ENDORSEMENTS_HEADER)
      .and_then(|v| v.to_str().ok())
      .map(parse_endorsements)
      .unwrap_or_default();

    Ok(Self {
      user:   AuthenticatedUser { user_id, email, endorsements },
      client: AuthenticatedClient { client_id },
    })
  }
}

fn require(headers: &HeaderMap, name: &str) -> Result<String, ApiError> {
  headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
    .ok_or_else(|| ApiError::Unauthorized(name.to_owned()))
}

/// Split `"astro-ph.GA,math.CO"` into endorsement grants.
fn parse_endorsements(s: &str) -> Vec<Endorsement> {
  s.split(',')
    .map(str::trim)
    .filter(|e| !e.is_empty())
    .map(Endorsement::parse)
    .collect()
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// Derive the attribution triple for one request.
///
/// Without delegation the authenticated user is the creator and there is no
/// proxy. With `X-On-Behalf-Of` present, the authenticated user becomes the
/// proxy and the creator is a minimal person built from the header value
/// alone — no email, no endorsements. Absent, empty, or non-UTF-8 header
/// values mean no delegation; resolution never fails.
pub fn resolve(
  headers: &HeaderMap,
  user: &AuthenticatedUser,
  client: &AuthenticatedClient,
) -> Attribution {
  let authenticated = Actor::Person {
    native_id:    user.user_id.clone(),
    email:        Some(user.email.clone()),
    endorsements: user.endorsements.clone(),
  };
  let client = Actor::Application { native_id: client.client_id.clone() };

  let on_behalf_of = headers
    .get(ON_BEHALF_OF_HEADER)
    .and_then(|v| v.to_str().ok())
    .filter(|s| !s.is_empty());

  match on_behalf_of {
    Some(subject) => Attribution {
      creator: Actor::person(subject),
      client,
      proxy: Some(authenticated),
    },
    None => Attribution { creator: authenticated, client, proxy: None },
  }
}
