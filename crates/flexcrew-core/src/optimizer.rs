//! Schedule recommendation for a team.
//!
//! The heuristic packs densely: among schedules with a free seat, the most
//! occupied one wins. It does not look at where the team's members are now
//! and never moves anyone; callers act on the result through
//! [`crate::ledger::CapacityLedger::assign`], which re-checks capacity.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  EntityKind, Error, Result,
  error::store_err,
  schedule::Schedule,
  store::DirectoryStore,
};

/// Pick the recommended schedule out of `schedules`.
///
/// Open schedules are ranked by occupancy, highest first; ties keep their
/// listing order. With no open schedule the first listed one is returned.
pub fn pick_schedule(schedules: Vec<Schedule>) -> Option<Schedule> {
  let best = {
    let mut open: Vec<&Schedule> = schedules.iter().filter(|s| s.is_open()).collect();
    open.sort_by(|a, b| b.current_employees.cmp(&a.current_employees));
    open.first().map(|s| s.schedule_id)
  };

  match best {
    Some(id) => schedules.into_iter().find(|s| s.schedule_id == id),
    None => schedules.into_iter().next(),
  }
}

pub struct ScheduleOptimizer<S> {
  store: Arc<S>,
}

impl<S: DirectoryStore> ScheduleOptimizer<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Recommend one schedule for the members of `team_id`.
  pub async fn recommend_for_team(&self, team_id: Uuid) -> Result<Schedule> {
    self
      .store
      .get_team(team_id)
      .await
      .map_err(store_err)?
      .ok_or_else(|| Error::not_found(EntityKind::Team, team_id))?;

    let members = self.store.list_employees_by_team(team_id).await.map_err(store_err)?;
    if members.is_empty() {
      return Err(Error::not_found(EntityKind::TeamMembers, team_id));
    }

    let schedules = self.store.list_schedules().await.map_err(store_err)?;
    pick_schedule(schedules).ok_or(Error::NoSchedulesAvailable)
  }
}
