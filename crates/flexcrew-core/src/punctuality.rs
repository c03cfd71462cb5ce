//! Punctuality records: a [`Record`] ties an employee and a schedule to an
//! [`Issue`], whose status name describes how the shift was attended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::EnumString;
use uuid::Uuid;

/// The punctuality outcomes the analytics rollup recognises. Status names
/// outside this set may exist in storage; they are ignored by the rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum PunctualityStatus {
  Punctual,
  Late,
  Early,
  Missed,
}

/// An attendance outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
  pub issue_id:      Uuid,
  /// Raw status name, e.g. `"Late"`; see [`PunctualityStatus`].
  pub status:        String,
  pub delay_minutes: u32,
  pub description:   Option<String>,
}

impl Issue {
  pub fn new(status: impl Into<String>, delay_minutes: u32) -> Self {
    Self {
      issue_id: Uuid::new_v4(),
      status: status.into(),
      delay_minutes,
      description: None,
    }
  }
}

/// A clock-in event for an employee on a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
  pub record_id:   Uuid,
  pub employee_id: Uuid,
  pub schedule_id: Uuid,
  pub issue_id:    Uuid,
  pub recorded_at: DateTime<Utc>,
}

impl Record {
  pub fn new(employee_id: Uuid, schedule_id: Uuid, issue_id: Uuid) -> Self {
    Self {
      record_id: Uuid::new_v4(),
      employee_id,
      schedule_id,
      issue_id,
      recorded_at: Utc::now(),
    }
  }
}

/// Number of records whose issue carries `status_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
  pub status_name: String,
  pub count:       u64,
}

impl StatusCount {
  pub fn new(status_name: impl Into<String>, count: u64) -> Self {
    Self { status_name: status_name.into(), count }
  }
}
