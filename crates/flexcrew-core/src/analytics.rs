//! Read-only rollups for dashboards: punctuality outcomes and schedule load.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
  Result,
  error::store_err,
  punctuality::{PunctualityStatus, StatusCount},
  schedule::Schedule,
  store::DirectoryStore,
};

/// Record counts per known punctuality status.
///
/// `total_records` is the sum of the four counters, so records whose status
/// name is not a [`PunctualityStatus`] are not part of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PunctualityStats {
  pub punctual_count: u64,
  pub late_count:     u64,
  pub early_count:    u64,
  pub missed_count:   u64,
  pub total_records:  u64,
}

/// Occupancy of one schedule as a percentage of its capacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleLoad {
  pub schedule_id:       Uuid,
  pub schedule_name:     String,
  pub current_employees: u32,
  pub max_employees:     u32,
  /// `0.0` when the capacity is zero. Not capped: a counter that drifted
  /// above capacity reads above 100.
  pub load_percentage:   f64,
}

pub fn rollup_punctuality(counts: &[StatusCount]) -> PunctualityStats {
  let mut stats = PunctualityStats::default();
  for c in counts {
    let Ok(status) = c.status_name.parse::<PunctualityStatus>() else {
      continue;
    };
    let slot = match status {
      PunctualityStatus::Punctual => &mut stats.punctual_count,
      PunctualityStatus::Late => &mut stats.late_count,
      PunctualityStatus::Early => &mut stats.early_count,
      PunctualityStatus::Missed => &mut stats.missed_count,
    };
    *slot += c.count;
  }
  stats.total_records =
    stats.punctual_count + stats.late_count + stats.early_count + stats.missed_count;
  stats
}

pub fn load_percentage(current_employees: u32, max_employees: u32) -> f64 {
  if max_employees == 0 {
    return 0.0;
  }
  f64::from(current_employees) / f64::from(max_employees) * 100.0
}

pub fn schedule_loads(schedules: &[Schedule]) -> Vec<ScheduleLoad> {
  schedules
    .iter()
    .map(|s| ScheduleLoad {
      schedule_id:       s.schedule_id,
      schedule_name:     s.name.clone(),
      current_employees: s.current_employees,
      max_employees:     s.max_employees,
      load_percentage:   load_percentage(s.current_employees, s.max_employees),
    })
    .collect()
}

pub struct Analytics<S> {
  store: Arc<S>,
}

impl<S: DirectoryStore> Analytics<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn punctuality(&self) -> Result<PunctualityStats> {
    let counts = self.store.count_records_by_status().await.map_err(store_err)?;
    Ok(rollup_punctuality(&counts))
  }

  /// Load per schedule, in listing order.
  pub async fn schedule_load(&self) -> Result<Vec<ScheduleLoad>> {
    let schedules = self.store.list_schedules().await.map_err(store_err)?;
    Ok(schedule_loads(&schedules))
  }
}
