//! Schedules: time-slot shifts with a fixed employee capacity.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A shift with a capacity and a cached occupancy counter.
///
/// `current_employees` must always equal the number of employees whose
/// `schedule_id` points here. Only the capacity ledger writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
  pub schedule_id:       Uuid,
  pub name:              String,
  pub start_time:        NaiveTime,
  pub end_time:          NaiveTime,
  pub max_employees:     u32,
  pub current_employees: u32,
  /// Optimistic-concurrency token; bumped on every committed counter change.
  pub version:           u64,
}

impl Schedule {
  /// `true` when no further employee can be assigned.
  pub fn is_full(&self) -> bool { self.current_employees >= self.max_employees }

  /// `true` when at least one seat is free.
  pub fn is_open(&self) -> bool { !self.is_full() }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::ledger::CapacityLedger::create`].
///
/// Every field is optional so that a malformed payload reaches validation
/// instead of failing deserialisation. The occupancy counter is not accepted:
/// a new schedule always starts empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleDraft {
  pub name:          Option<String>,
  pub start_time:    Option<NaiveTime>,
  pub end_time:      Option<NaiveTime>,
  pub max_employees: Option<u32>,
}

/// Input to [`crate::ledger::CapacityLedger::update`]. All fields are
/// replaced; the payload id must match the schedule being updated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleUpdate {
  pub schedule_id:   Option<Uuid>,
  pub name:          Option<String>,
  pub start_time:    Option<NaiveTime>,
  pub end_time:      Option<NaiveTime>,
  pub max_employees: Option<u32>,
}

/// The validated shape shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScheduleFields {
  pub name:          String,
  pub start_time:    NaiveTime,
  pub end_time:      NaiveTime,
  pub max_employees: u32,
}

pub(crate) fn validate_fields(
  name: Option<String>,
  start_time: Option<NaiveTime>,
  end_time: Option<NaiveTime>,
  max_employees: Option<u32>,
) -> Result<ScheduleFields> {
  let name = name
    .filter(|n| !n.trim().is_empty())
    .ok_or_else(|| Error::InvalidInput("schedule name is required".into()))?;
  let start_time = start_time
    .ok_or_else(|| Error::InvalidInput("schedule start time is required".into()))?;
  let end_time = end_time
    .ok_or_else(|| Error::InvalidInput("schedule end time is required".into()))?;
  let max_employees = max_employees.filter(|&m| m > 0).ok_or_else(|| {
    Error::InvalidInput("max employees must be greater than zero".into())
  })?;

  Ok(ScheduleFields { name, start_time, end_time, max_employees })
}

impl ScheduleDraft {
  pub(crate) fn validate(self) -> Result<ScheduleFields> {
    validate_fields(self.name, self.start_time, self.end_time, self.max_employees)
  }
}

impl ScheduleUpdate {
  pub(crate) fn validate(self, schedule_id: Uuid) -> Result<ScheduleFields> {
    if self.schedule_id != Some(schedule_id) {
      return Err(Error::InvalidInput(format!(
        "schedule id mismatch: path {schedule_id}, body {}",
        self
          .schedule_id
          .map_or_else(|| "missing".to_string(), |id| id.to_string()),
      )));
    }
    validate_fields(self.name, self.start_time, self.end_time, self.max_employees)
  }
}
