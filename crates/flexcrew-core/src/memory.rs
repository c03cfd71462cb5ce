//! [`MemoryStore`], a process-local [`DirectoryStore`].
//!
//! Used by tests and by embedders that do not need durability. All state sits
//! behind one mutex, so [`DirectoryStore::commit_assignment`] is trivially
//! atomic. The schedule roster is kept as an index from schedule id to the
//! set of employee ids pointing at it, maintained on first insert and on
//! every assignment commit.

use std::{
  collections::{HashMap, HashSet},
  sync::{Arc, Mutex, MutexGuard},
};

use thiserror::Error;
use uuid::Uuid;

use crate::{
  project::{
    Project, ProjectAssignment, RequiredTeam, StaffedAssignment,
    StaffingRequirement,
  },
  punctuality::{Issue, Record, StatusCount},
  schedule::Schedule,
  store::{AssignmentPlan, Commit, CounterWrite, Deletion, DirectoryStore},
  workforce::{Employee, Team},
};

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("store lock poisoned")]
  Poisoned,

  #[error("email already in use: {0}")]
  DuplicateEmail(String),

  #[error("team name already in use: {0}")]
  DuplicateTeamName(String),

  #[error("project not found: {0}")]
  ProjectNotFound(Uuid),

  #[error("employee {employee_id} is already assigned to project {project_id}")]
  DuplicateAssignment { project_id: Uuid, employee_id: Uuid },
}

// ─── Tables ──────────────────────────────────────────────────────────────────

trait Keyed {
  fn key(&self) -> Uuid;
}

impl Keyed for Employee {
  fn key(&self) -> Uuid { self.employee_id }
}
impl Keyed for Team {
  fn key(&self) -> Uuid { self.team_id }
}
impl Keyed for Schedule {
  fn key(&self) -> Uuid { self.schedule_id }
}
impl Keyed for Project {
  fn key(&self) -> Uuid { self.project_id }
}
impl Keyed for RequiredTeam {
  fn key(&self) -> Uuid { self.required_team_id }
}
impl Keyed for ProjectAssignment {
  fn key(&self) -> Uuid { self.assignment_id }
}
impl Keyed for Issue {
  fn key(&self) -> Uuid { self.issue_id }
}
impl Keyed for Record {
  fn key(&self) -> Uuid { self.record_id }
}

/// Rows in insertion order; an upsert keeps the original position.
struct Table<T> {
  rows: Vec<T>,
}

impl<T> Default for Table<T> {
  fn default() -> Self { Self { rows: Vec::new() } }
}

impl<T: Keyed + Clone> Table<T> {
  fn get(&self, id: Uuid) -> Option<&T> {
    self.rows.iter().find(|r| r.key() == id)
  }

  fn get_mut(&mut self, id: Uuid) -> Option<&mut T> {
    self.rows.iter_mut().find(|r| r.key() == id)
  }

  /// Insert or replace; returns the replaced row.
  fn upsert(&mut self, row: T) -> Option<T> {
    match self.get_mut(row.key()) {
      Some(slot) => Some(std::mem::replace(slot, row)),
      None => {
        self.rows.push(row);
        None
      }
    }
  }

  fn remove(&mut self, id: Uuid) -> Option<T> {
    let idx = self.rows.iter().position(|r| r.key() == id)?;
    Some(self.rows.remove(idx))
  }

  fn iter(&self) -> impl Iterator<Item = &T> { self.rows.iter() }
}

#[derive(Default)]
struct State {
  employees:      Table<Employee>,
  teams:          Table<Team>,
  schedules:      Table<Schedule>,
  projects:       Table<Project>,
  required_teams: Table<RequiredTeam>,
  assignments:    Table<ProjectAssignment>,
  issues:         Table<Issue>,
  records:        Table<Record>,
  /// schedule id → ids of employees whose `schedule_id` points at it.
  roster:         HashMap<Uuid, HashSet<Uuid>>,
}

impl State {
  fn move_in_roster(&mut self, employee_id: Uuid, from: Option<Uuid>, to: Option<Uuid>) {
    if from == to {
      return;
    }
    if let Some(old) = from
      && let Some(set) = self.roster.get_mut(&old)
    {
      set.remove(&employee_id);
      if set.is_empty() {
        self.roster.remove(&old);
      }
    }
    if let Some(new) = to {
      self.roster.entry(new).or_default().insert(employee_id);
    }
  }

  fn version_matches(&self, write: &CounterWrite) -> bool {
    self
      .schedules
      .get(write.schedule_id)
      .is_some_and(|s| s.version == write.expected_version)
  }

  fn apply_counter(&mut self, write: &CounterWrite) -> Option<Schedule> {
    let schedule = self.schedules.get_mut(write.schedule_id)?;
    schedule.current_employees = write.current_employees;
    schedule.version += 1;
    Some(schedule.clone())
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An in-memory directory. Cloning is cheap and shares state.
#[derive(Clone, Default)]
pub struct MemoryStore {
  state: Arc<Mutex<State>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> Result<MutexGuard<'_, State>, MemoryError> {
    self.state.lock().map_err(|_| MemoryError::Poisoned)
  }
}

impl DirectoryStore for MemoryStore {
  type Error = MemoryError;

  // ── Employees ─────────────────────────────────────────────────────────────

  async fn get_employee(&self, id: Uuid) -> Result<Option<Employee>, MemoryError> {
    Ok(self.lock()?.employees.get(id).cloned())
  }

  async fn get_employee_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> Result<Option<Employee>, MemoryError> {
    Ok(self.lock()?.employees.iter().find(|e| e.email == email).cloned())
  }

  async fn list_employees_by_team(
    &self,
    team_id: Uuid,
  ) -> Result<Vec<Employee>, MemoryError> {
    let state = self.lock()?;
    Ok(
      state
        .employees
        .iter()
        .filter(|e| e.team_id == Some(team_id))
        .cloned()
        .collect(),
    )
  }

  async fn list_employees_by_schedule(
    &self,
    schedule_id: Uuid,
  ) -> Result<Vec<Employee>, MemoryError> {
    let state = self.lock()?;
    let Some(ids) = state.roster.get(&schedule_id) else {
      return Ok(Vec::new());
    };
    Ok(
      state
        .employees
        .iter()
        .filter(|e| ids.contains(&e.employee_id))
        .cloned()
        .collect(),
    )
  }

  async fn save_employee(&self, employee: Employee) -> Result<Employee, MemoryError> {
    let mut state = self.lock()?;
    if state
      .employees
      .iter()
      .any(|e| e.email == employee.email && e.employee_id != employee.employee_id)
    {
      return Err(MemoryError::DuplicateEmail(employee.email));
    }
    let held = state.employees.get(employee.employee_id).map(|e| e.schedule_id);
    let stored = match held {
      Some(schedule_id) => Employee { schedule_id, ..employee },
      None => {
        state.move_in_roster(employee.employee_id, None, employee.schedule_id);
        employee
      }
    };
    state.employees.upsert(stored.clone());
    Ok(stored)
  }

  // ── Teams ─────────────────────────────────────────────────────────────────

  async fn get_team(&self, id: Uuid) -> Result<Option<Team>, MemoryError> {
    Ok(self.lock()?.teams.get(id).cloned())
  }

  async fn list_teams(&self) -> Result<Vec<Team>, MemoryError> {
    Ok(self.lock()?.teams.iter().cloned().collect())
  }

  async fn save_team(&self, team: Team) -> Result<Team, MemoryError> {
    let mut state = self.lock()?;
    if state
      .teams
      .iter()
      .any(|t| t.name == team.name && t.team_id != team.team_id)
    {
      return Err(MemoryError::DuplicateTeamName(team.name));
    }
    state.teams.upsert(team.clone());
    Ok(team)
  }

  // ── Schedules ─────────────────────────────────────────────────────────────

  async fn get_schedule(&self, id: Uuid) -> Result<Option<Schedule>, MemoryError> {
    Ok(self.lock()?.schedules.get(id).cloned())
  }

  async fn list_schedules(&self) -> Result<Vec<Schedule>, MemoryError> {
    Ok(self.lock()?.schedules.iter().cloned().collect())
  }

  async fn save_schedule(&self, schedule: Schedule) -> Result<Schedule, MemoryError> {
    let mut state = self.lock()?;
    let stored = match state.schedules.get(schedule.schedule_id) {
      Some(existing) => Schedule {
        current_employees: existing.current_employees,
        version: existing.version + 1,
        ..schedule
      },
      None => schedule,
    };
    state.schedules.upsert(stored.clone());
    Ok(stored)
  }

  async fn update_schedule(
    &self,
    schedule: Schedule,
  ) -> Result<Option<Schedule>, MemoryError> {
    let mut state = self.lock()?;
    let Some(slot) = state.schedules.get_mut(schedule.schedule_id) else {
      return Ok(None);
    };
    *slot = Schedule {
      current_employees: slot.current_employees,
      version: slot.version + 1,
      ..schedule
    };
    Ok(Some(slot.clone()))
  }

  async fn delete_schedule(
    &self,
    id: Uuid,
    expected_version: u64,
  ) -> Result<Deletion, MemoryError> {
    let mut state = self.lock()?;
    let Some(schedule) = state.schedules.get(id) else {
      return Ok(Deletion::Missing);
    };
    let rostered = state.roster.get(&id).is_some_and(|ids| !ids.is_empty());
    if schedule.version != expected_version || rostered {
      return Ok(Deletion::Stale);
    }
    state.schedules.remove(id);
    Ok(Deletion::Deleted)
  }

  async fn schedule_exists(&self, id: Uuid) -> Result<bool, MemoryError> {
    Ok(self.lock()?.schedules.get(id).is_some())
  }

  async fn commit_assignment(&self, plan: AssignmentPlan) -> Result<Commit, MemoryError> {
    let mut state = self.lock()?;

    let holds_expected = state
      .employees
      .get(plan.employee_id)
      .is_some_and(|e| e.schedule_id == plan.expected_previous);
    let versions_match = state.version_matches(&plan.acquire)
      && plan.release.as_ref().is_none_or(|w| state.version_matches(w));
    if !holds_expected || !versions_match {
      return Ok(Commit::Stale);
    }

    if let Some(release) = &plan.release {
      state.apply_counter(release);
    }
    let Some(target) = state.apply_counter(&plan.acquire) else {
      return Ok(Commit::Stale);
    };
    if let Some(employee) = state.employees.get_mut(plan.employee_id) {
      employee.schedule_id = Some(target.schedule_id);
    }
    state.move_in_roster(plan.employee_id, plan.expected_previous, Some(target.schedule_id));

    Ok(Commit::Applied(target))
  }

  // ── Projects ──────────────────────────────────────────────────────────────

  async fn get_project(&self, id: Uuid) -> Result<Option<Project>, MemoryError> {
    Ok(self.lock()?.projects.get(id).cloned())
  }

  async fn save_project(&self, project: Project) -> Result<Project, MemoryError> {
    self.lock()?.projects.upsert(project.clone());
    Ok(project)
  }

  async fn delete_project(&self, id: Uuid) -> Result<bool, MemoryError> {
    let mut state = self.lock()?;
    if state.projects.remove(id).is_none() {
      return Ok(false);
    }
    state.required_teams.rows.retain(|r| r.project_id != id);
    state.assignments.rows.retain(|a| a.project_id != id);
    Ok(true)
  }

  async fn save_required_team(
    &self,
    required: RequiredTeam,
  ) -> Result<RequiredTeam, MemoryError> {
    let mut state = self.lock()?;
    if state.projects.get(required.project_id).is_none() {
      return Err(MemoryError::ProjectNotFound(required.project_id));
    }
    state.required_teams.upsert(required.clone());
    Ok(required)
  }

  async fn save_assignment(
    &self,
    assignment: ProjectAssignment,
  ) -> Result<ProjectAssignment, MemoryError> {
    let mut state = self.lock()?;
    if state.projects.get(assignment.project_id).is_none() {
      return Err(MemoryError::ProjectNotFound(assignment.project_id));
    }
    if state.assignments.iter().any(|a| {
      a.project_id == assignment.project_id
        && a.employee_id == assignment.employee_id
        && a.assignment_id != assignment.assignment_id
    }) {
      return Err(MemoryError::DuplicateAssignment {
        project_id:  assignment.project_id,
        employee_id: assignment.employee_id,
      });
    }
    state.assignments.upsert(assignment.clone());
    Ok(assignment)
  }

  async fn list_required_teams(
    &self,
    project_id: Uuid,
  ) -> Result<Vec<StaffingRequirement>, MemoryError> {
    let state = self.lock()?;
    Ok(
      state
        .required_teams
        .iter()
        .filter(|r| r.project_id == project_id)
        .map(|r| StaffingRequirement {
          requirement: r.clone(),
          team:        state.teams.get(r.team_id).cloned(),
        })
        .collect(),
    )
  }

  async fn list_assignments(
    &self,
    project_id: Uuid,
  ) -> Result<Vec<StaffedAssignment>, MemoryError> {
    let state = self.lock()?;
    Ok(
      state
        .assignments
        .iter()
        .filter(|a| a.project_id == project_id)
        .map(|a| StaffedAssignment {
          assignment: a.clone(),
          employee:   state.employees.get(a.employee_id).cloned(),
        })
        .collect(),
    )
  }

  // ── Punctuality ───────────────────────────────────────────────────────────

  async fn save_issue(&self, issue: Issue) -> Result<Issue, MemoryError> {
    self.lock()?.issues.upsert(issue.clone());
    Ok(issue)
  }

  async fn save_record(&self, record: Record) -> Result<Record, MemoryError> {
    self.lock()?.records.upsert(record.clone());
    Ok(record)
  }

  async fn count_records_by_status(&self) -> Result<Vec<StatusCount>, MemoryError> {
    let state = self.lock()?;
    let mut counts: Vec<StatusCount> = Vec::new();
    for record in state.records.iter() {
      let Some(issue) = state.issues.get(record.issue_id) else {
        continue;
      };
      match counts.iter_mut().find(|c| c.status_name == issue.status) {
        Some(c) => c.count += 1,
        None => counts.push(StatusCount::new(issue.status.clone(), 1)),
      }
    }
    Ok(counts)
  }
}
