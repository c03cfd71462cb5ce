//! The capacity ledger: the only path that moves an employee between
//! schedules, and the owner of each schedule's occupancy counter.
//!
//! # Invariants
//! - `schedule.current_employees` equals the number of employees whose
//!   `schedule_id` is that schedule.
//! - After a successful [`CapacityLedger::assign`],
//!   `0 <= current_employees <= max_employees` on the target schedule.
//!
//! Concurrency is optimistic: [`CapacityLedger::assign`] commits a plan
//! guarded by the schedule versions it read. A lost race surfaces as
//! [`Error::ConflictOnConcurrentUpdate`] and is not retried.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  EntityKind, Error, Result,
  error::store_err,
  schedule::{Schedule, ScheduleDraft, ScheduleUpdate},
  store::{AssignmentPlan, Commit, CounterWrite, Deletion, DirectoryStore},
  workforce::Employee,
};

/// Working days covered by [`CapacityLedger::weekly_schedule`].
pub const WORK_DAYS_PER_WEEK: usize = 5;

/// A schedule whose cached counter disagrees with the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupancyDrift {
  pub schedule_id: Uuid,
  pub cached:      u32,
  pub rostered:    u32,
}

/// Decide what moving `employee` onto `target` writes.
///
/// `previous` is the schedule the employee currently holds, if it still
/// exists. Returns `Ok(None)` when the employee already holds `target`.
pub fn plan_assignment(
  employee: &Employee,
  target: &Schedule,
  previous: Option<&Schedule>,
) -> Result<Option<AssignmentPlan>> {
  if employee.schedule_id == Some(target.schedule_id) {
    return Ok(None);
  }
  if target.is_full() {
    return Err(Error::CapacityExceeded {
      schedule_id:   target.schedule_id,
      max_employees: target.max_employees,
    });
  }

  let release = previous.map(|old| {
    if old.current_employees == 0 {
      warn!(
        schedule_id = %old.schedule_id,
        employee_id = %employee.employee_id,
        "releasing a seat from a schedule whose counter is already zero"
      );
    }
    CounterWrite {
      schedule_id:       old.schedule_id,
      expected_version:  old.version,
      current_employees: old.current_employees.saturating_sub(1),
    }
  });

  Ok(Some(AssignmentPlan {
    employee_id: employee.employee_id,
    expected_previous: employee.schedule_id,
    release,
    acquire: CounterWrite {
      schedule_id:       target.schedule_id,
      expected_version:  target.version,
      current_employees: target.current_employees + 1,
    },
  }))
}

/// Schedule lifecycle and employee-to-schedule assignment.
pub struct CapacityLedger<S> {
  store: Arc<S>,
}

impl<S: DirectoryStore> CapacityLedger<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  async fn require_schedule(&self, id: Uuid) -> Result<Schedule> {
    self
      .store
      .get_schedule(id)
      .await
      .map_err(store_err)?
      .ok_or_else(|| Error::not_found(EntityKind::Schedule, id))
  }

  async fn require_employee(&self, id: Uuid) -> Result<Employee> {
    self
      .store
      .get_employee(id)
      .await
      .map_err(store_err)?
      .ok_or_else(|| Error::not_found(EntityKind::Employee, id))
  }

  /// Move `employee_id` onto `schedule_id` and return the target schedule
  /// with its updated counter.
  ///
  /// Re-assigning an employee to the schedule they already hold is a no-op
  /// success, even when that schedule is full.
  pub async fn assign(&self, employee_id: Uuid, schedule_id: Uuid) -> Result<Schedule> {
    let employee = self.require_employee(employee_id).await?;
    let target = self.require_schedule(schedule_id).await?;

    let previous = match employee.schedule_id {
      Some(old) if old != schedule_id => {
        self.store.get_schedule(old).await.map_err(store_err)?
      }
      _ => None,
    };

    let Some(plan) = plan_assignment(&employee, &target, previous.as_ref())? else {
      debug!(%employee_id, %schedule_id, "employee already holds schedule");
      return Ok(target);
    };

    match self.store.commit_assignment(plan).await.map_err(store_err)? {
      Commit::Applied(schedule) => {
        info!(
          %employee_id,
          %schedule_id,
          from = ?employee.schedule_id,
          occupancy = schedule.current_employees,
          capacity = schedule.max_employees,
          "employee assigned to schedule"
        );
        Ok(schedule)
      }
      Commit::Stale => {
        debug!(%employee_id, %schedule_id, "assignment lost a concurrent update");
        Err(Error::ConflictOnConcurrentUpdate(schedule_id))
      }
    }
  }

  /// Create a schedule. The occupancy counter always starts at zero.
  pub async fn create(&self, draft: ScheduleDraft) -> Result<Schedule> {
    let fields = draft.validate()?;
    let schedule = Schedule {
      schedule_id:       Uuid::new_v4(),
      name:              fields.name,
      start_time:        fields.start_time,
      end_time:          fields.end_time,
      max_employees:     fields.max_employees,
      current_employees: 0,
      version:           0,
    };
    self.store.save_schedule(schedule).await.map_err(store_err)
  }

  /// Replace the descriptive fields and capacity of an existing schedule.
  /// The occupancy counter is left as the last assignment wrote it.
  pub async fn update(&self, schedule_id: Uuid, update: ScheduleUpdate) -> Result<Schedule> {
    let fields = update.validate(schedule_id)?;

    // The store keeps the stored counter and version.
    let schedule = Schedule {
      schedule_id,
      name: fields.name,
      start_time: fields.start_time,
      end_time: fields.end_time,
      max_employees: fields.max_employees,
      current_employees: 0,
      version: 0,
    };
    self
      .store
      .update_schedule(schedule)
      .await
      .map_err(store_err)?
      .ok_or_else(|| Error::not_found(EntityKind::Schedule, schedule_id))
  }

  /// Delete a schedule nobody is assigned to.
  ///
  /// Fails with [`Error::ScheduleOccupied`] while either the counter or the
  /// roster shows an occupant; employees are never unassigned implicitly.
  /// The delete is guarded by the version read here, so an assignment that
  /// commits in between surfaces as [`Error::ConflictOnConcurrentUpdate`].
  pub async fn delete(&self, schedule_id: Uuid) -> Result<()> {
    let schedule = self.require_schedule(schedule_id).await?;
    let rostered = self
      .store
      .list_employees_by_schedule(schedule_id)
      .await
      .map_err(store_err)?
      .len() as u32;

    let occupants = schedule.current_employees.max(rostered);
    if occupants > 0 {
      return Err(Error::ScheduleOccupied { schedule_id, occupants });
    }

    match self
      .store
      .delete_schedule(schedule_id, schedule.version)
      .await
      .map_err(store_err)?
    {
      Deletion::Deleted => {
        info!(%schedule_id, "schedule deleted");
        Ok(())
      }
      Deletion::Missing => Err(Error::not_found(EntityKind::Schedule, schedule_id)),
      Deletion::Stale => {
        debug!(%schedule_id, "schedule delete lost a concurrent update");
        Err(Error::ConflictOnConcurrentUpdate(schedule_id))
      }
    }
  }

  /// The employee's schedule for each working day of the coming week, or an
  /// empty list when they hold no schedule.
  pub async fn weekly_schedule(&self, employee_id: Uuid) -> Result<Vec<Schedule>> {
    let employee = self.require_employee(employee_id).await?;
    let Some(schedule_id) = employee.schedule_id else {
      return Ok(Vec::new());
    };
    let Some(schedule) = self.store.get_schedule(schedule_id).await.map_err(store_err)?
    else {
      return Ok(Vec::new());
    };
    Ok(vec![schedule; WORK_DAYS_PER_WEEK])
  }

  /// Every schedule whose cached counter disagrees with the roster.
  pub async fn audit(&self) -> Result<Vec<OccupancyDrift>> {
    let schedules = self.store.list_schedules().await.map_err(store_err)?;
    let mut drifts = Vec::new();
    for schedule in schedules {
      let rostered = self
        .store
        .list_employees_by_schedule(schedule.schedule_id)
        .await
        .map_err(store_err)?
        .len() as u32;
      if rostered != schedule.current_employees {
        drifts.push(OccupancyDrift {
          schedule_id: schedule.schedule_id,
          cached: schedule.current_employees,
          rostered,
        });
      }
    }
    Ok(drifts)
  }
}
