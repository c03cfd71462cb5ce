//! Error types for `flexcrew-core`.

use serde::Serialize;
use strum::Display;
use thiserror::Error;
use uuid::Uuid;

/// The kind of entity a [`Error::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
  Employee,
  Team,
  /// The team exists but nobody belongs to it.
  TeamMembers,
  Schedule,
  Project,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{kind} not found: {id}")]
  NotFound { kind: EntityKind, id: Uuid },

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("schedule {schedule_id} is at maximum capacity ({max_employees})")]
  CapacityExceeded { schedule_id: Uuid, max_employees: u32 },

  #[error("no schedules available")]
  NoSchedulesAvailable,

  #[error("schedule {0} was modified concurrently; retry the assignment")]
  ConflictOnConcurrentUpdate(Uuid),

  #[error("schedule {schedule_id} still has {occupants} assigned employee(s)")]
  ScheduleOccupied { schedule_id: Uuid, occupants: u32 },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn not_found(kind: EntityKind, id: Uuid) -> Self {
    Self::NotFound { kind, id }
  }
}

/// Wrap a backend error; used as `.map_err(store_err)` on store calls.
pub(crate) fn store_err<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
