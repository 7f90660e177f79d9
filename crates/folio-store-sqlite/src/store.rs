//! [`SqliteEventStore`] — the SQLite implementation of
//! [`EventStore`](folio_core::store::EventStore).

use std::{future::Future, path::Path};

use chrono::Utc;
use uuid::Uuid;

use folio_core::{
  event::{Event, RecordedEvent},
  store::{EventStore, StoreError},
  submission::Submission,
};

use crate::{
  Result,
  encode::{RawEvent, encode_attribution, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A folio event store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Writes
/// validate the whole event batch against the folded state before any row is
/// inserted, so a rejected batch leaves no trace.
#[derive(Clone)]
pub struct SqliteEventStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteEventStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read a submission's raw rows, oldest first.
  async fn select_history(&self, submission_id: Uuid) -> Result<Vec<RawEvent>> {
    let id_str = encode_uuid(submission_id);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT event_id, submission_id, sequence, event_type,
                  attribution_json, payload_json, recorded_at
             FROM events
            WHERE submission_id = ?1
            ORDER BY sequence",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |r| {
            Ok(RawEvent {
              event_id:         r.get(0)?,
              submission_id:    r.get(1)?,
              sequence:         r.get(2)?,
              event_type:       r.get(3)?,
              attribution_json: r.get(4)?,
              payload_json:     r.get(5)?,
              recorded_at:      r.get(6)?,
            })
          })?
          .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  /// Insert recorded events as one transaction. The UNIQUE constraint on
  /// `(submission_id, sequence)` makes a concurrent append against the same
  /// submission fail here rather than fork the history.
  async fn insert_events(&self, events: &[RecordedEvent]) -> Result<()> {
    let mut rows = Vec::with_capacity(events.len());
    for event in events {
      rows.push((
        encode_uuid(event.event_id),
        encode_uuid(event.submission_id),
        event.sequence as i64,
        event.payload.discriminant().to_owned(),
        encode_attribution(&event.attribution)?,
        event.payload.to_json()?.to_string(),
        encode_dt(event.recorded_at),
      ));
    }

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for row in &rows {
          tx.execute(
            "INSERT INTO events (
               event_id, submission_id, sequence, event_type,
               attribution_json, payload_json, recorded_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
              row.0, row.1, row.2, row.3, row.4, row.5, row.6
            ],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  /// Load and decode a submission's history, oldest first.
  ///
  /// A missing submission is a [`StoreError::NoSuchSubmission`]; rows that
  /// fail to decode mean the store itself is damaged, which is a persistence
  /// fault, never a client fault.
  async fn load_history(
    &self,
    submission_id: Uuid,
  ) -> std::result::Result<Vec<RecordedEvent>, StoreError> {
    let rows = self
      .select_history(submission_id)
      .await
      .map_err(StoreError::persistence)?;

    if rows.is_empty() {
      return Err(StoreError::NoSuchSubmission(submission_id));
    }

    rows
      .into_iter()
      .map(RawEvent::decode)
      .collect::<Result<Vec<_>>>()
      .map_err(StoreError::persistence)
  }
}

// ─── EventStore ──────────────────────────────────────────────────────────────

impl EventStore for SqliteEventStore {
  fn create(
    &self,
    events: Vec<Event>,
  ) -> impl Future<Output = std::result::Result<(Submission, Vec<RecordedEvent>), StoreError>>
  + Send
  + '_ {
    async move {
      let submission_id = Uuid::new_v4();
      let now = Utc::now();

      let mut state: Option<Submission> = None;
      let mut recorded = Vec::with_capacity(events.len());
      for (sequence, event) in events.iter().enumerate() {
        let next = Submission::apply(
          state.take(),
          &event.attribution,
          &event.payload,
          submission_id,
          now,
        )?;
        recorded.push(RecordedEvent {
          event_id: Uuid::new_v4(),
          submission_id,
          sequence: sequence as u64,
          recorded_at: now,
          attribution: event.attribution.clone(),
          payload: event.payload.clone(),
        });
        state = Some(next);
      }

      let Some(submission) = state else {
        return Err(StoreError::InvalidEvent(folio_core::Error::EmptyHistory));
      };

      self
        .insert_events(&recorded)
        .await
        .map_err(StoreError::persistence)?;

      Ok((submission, recorded))
    }
  }

  fn append(
    &self,
    submission_id: Uuid,
    events: Vec<Event>,
  ) -> impl Future<Output = std::result::Result<(Submission, Vec<RecordedEvent>), StoreError>>
  + Send
  + '_ {
    async move {
      let history = self.load_history(submission_id).await?;
      let mut submission =
        Submission::replay(&history).map_err(StoreError::persistence)?;

      let now = Utc::now();
      let mut next_sequence =
        history.last().map(|e| e.sequence + 1).unwrap_or(0);

      let mut recorded = Vec::with_capacity(events.len());
      for event in &events {
        submission = Submission::apply(
          Some(submission),
          &event.attribution,
          &event.payload,
          submission_id,
          now,
        )?;
        recorded.push(RecordedEvent {
          event_id: Uuid::new_v4(),
          submission_id,
          sequence: next_sequence,
          recorded_at: now,
          attribution: event.attribution.clone(),
          payload: event.payload.clone(),
        });
        next_sequence += 1;
      }

      if !recorded.is_empty() {
        self
          .insert_events(&recorded)
          .await
          .map_err(StoreError::persistence)?;
      }

      Ok((submission, recorded))
    }
  }

  fn load(
    &self,
    submission_id: Uuid,
  ) -> impl Future<Output = std::result::Result<(Submission, Vec<RecordedEvent>), StoreError>>
  + Send
  + '_ {
    async move {
      let history = self.load_history(submission_id).await?;
      let submission =
        Submission::replay(&history).map_err(StoreError::persistence)?;
      Ok((submission, history))
    }
  }
}
