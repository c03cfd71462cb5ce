//! The `DirectoryStore` trait and the assignment commit types.
//!
//! The trait is implemented by storage backends (e.g. `flexcrew-store-sqlite`)
//! and by [`crate::memory::MemoryStore`]. The core components depend on this
//! abstraction, never on a concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  project::{
    Project, ProjectAssignment, RequiredTeam, StaffedAssignment,
    StaffingRequirement,
  },
  punctuality::{Issue, Record, StatusCount},
  schedule::Schedule,
  workforce::{Employee, Team},
};

// ─── Assignment commit ───────────────────────────────────────────────────────

/// A new value for one schedule's occupancy counter, valid only if the stored
/// schedule still carries `expected_version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterWrite {
  pub schedule_id:       Uuid,
  pub expected_version:  u64,
  pub current_employees: u32,
}

/// Everything [`DirectoryStore::commit_assignment`] writes for one move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentPlan {
  pub employee_id:       Uuid,
  /// The schedule the employee must still hold for the plan to apply.
  pub expected_previous: Option<Uuid>,
  /// Decrement of the schedule being vacated, if it still exists.
  pub release:           Option<CounterWrite>,
  /// Increment of the target schedule.
  pub acquire:           CounterWrite,
}

/// Outcome of [`DirectoryStore::commit_assignment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
  /// All writes were applied; carries the target schedule as stored.
  Applied(Schedule),
  /// A guard failed because another writer got there first. Nothing was
  /// written.
  Stale,
}

/// Outcome of [`DirectoryStore::delete_schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
  Deleted,
  /// No schedule with that id.
  Missing,
  /// The schedule changed since it was read, or someone is assigned to it.
  /// Nothing was deleted.
  Stale,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the durable directory of employees, teams, schedules,
/// projects and punctuality records.
///
/// `save_*` methods are upserts keyed on the entity id. List methods return
/// rows in insertion order.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait DirectoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Employees ─────────────────────────────────────────────────────────

  fn get_employee(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Employee>, Self::Error>> + Send + '_;

  fn get_employee_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Employee>, Self::Error>> + Send + 'a;

  fn list_employees_by_team(
    &self,
    team_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Employee>, Self::Error>> + Send + '_;

  /// The occupancy index: every employee whose `schedule_id` is `schedule_id`.
  fn list_employees_by_schedule(
    &self,
    schedule_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Employee>, Self::Error>> + Send + '_;

  /// Insert or replace an employee and return it as stored.
  ///
  /// `schedule_id` is taken from `employee` only on first insert. For an
  /// existing employee the stored schedule is kept; moves between schedules
  /// go through [`Self::commit_assignment`].
  fn save_employee(
    &self,
    employee: Employee,
  ) -> impl Future<Output = Result<Employee, Self::Error>> + Send + '_;

  // ── Teams ─────────────────────────────────────────────────────────────

  fn get_team(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Team>, Self::Error>> + Send + '_;

  fn list_teams(
    &self,
  ) -> impl Future<Output = Result<Vec<Team>, Self::Error>> + Send + '_;

  fn save_team(
    &self,
    team: Team,
  ) -> impl Future<Output = Result<Team, Self::Error>> + Send + '_;

  // ── Schedules ─────────────────────────────────────────────────────────

  fn get_schedule(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Schedule>, Self::Error>> + Send + '_;

  fn list_schedules(
    &self,
  ) -> impl Future<Output = Result<Vec<Schedule>, Self::Error>> + Send + '_;

  /// Insert a new schedule as given, or replace the name, times and capacity
  /// of an existing one. An existing schedule's occupancy counter is never
  /// overwritten here (only [`Self::commit_assignment`] writes it); its
  /// version is incremented. Returns the schedule as stored.
  fn save_schedule(
    &self,
    schedule: Schedule,
  ) -> impl Future<Output = Result<Schedule, Self::Error>> + Send + '_;

  /// Replace the name, times and capacity of an existing schedule, keeping
  /// its occupancy counter and incrementing its version. Returns `None`
  /// without writing anything if the schedule does not exist.
  fn update_schedule(
    &self,
    schedule: Schedule,
  ) -> impl Future<Output = Result<Option<Schedule>, Self::Error>> + Send + '_;

  /// Remove a schedule, as one atomic unit, only if it still carries
  /// `expected_version` and no employee references it.
  fn delete_schedule(
    &self,
    id: Uuid,
    expected_version: u64,
  ) -> impl Future<Output = Result<Deletion, Self::Error>> + Send + '_;

  fn schedule_exists(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Apply `plan` as one atomic unit.
  ///
  /// Returns [`Commit::Stale`] without writing anything if the employee no
  /// longer holds `plan.expected_previous`, or if any schedule named by the
  /// plan no longer carries its expected version. On success every written
  /// schedule's version is incremented.
  fn commit_assignment(
    &self,
    plan: AssignmentPlan,
  ) -> impl Future<Output = Result<Commit, Self::Error>> + Send + '_;

  // ── Projects ──────────────────────────────────────────────────────────

  fn get_project(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  fn save_project(
    &self,
    project: Project,
  ) -> impl Future<Output = Result<Project, Self::Error>> + Send + '_;

  /// Remove a project together with its required teams and assignments.
  /// Returns `false` if it did not exist.
  fn delete_project(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn save_required_team(
    &self,
    required: RequiredTeam,
  ) -> impl Future<Output = Result<RequiredTeam, Self::Error>> + Send + '_;

  /// Fails if the (project, employee) pair is already assigned.
  fn save_assignment(
    &self,
    assignment: ProjectAssignment,
  ) -> impl Future<Output = Result<ProjectAssignment, Self::Error>> + Send + '_;

  fn list_required_teams(
    &self,
    project_id: Uuid,
  ) -> impl Future<Output = Result<Vec<StaffingRequirement>, Self::Error>>
  + Send
  + '_;

  fn list_assignments(
    &self,
    project_id: Uuid,
  ) -> impl Future<Output = Result<Vec<StaffedAssignment>, Self::Error>>
  + Send
  + '_;

  // ── Punctuality ───────────────────────────────────────────────────────

  fn save_issue(
    &self,
    issue: Issue,
  ) -> impl Future<Output = Result<Issue, Self::Error>> + Send + '_;

  fn save_record(
    &self,
    record: Record,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + '_;

  /// Number of records per issue status name, for every status name that
  /// has at least one record.
  fn count_records_by_status(
    &self,
  ) -> impl Future<Output = Result<Vec<StatusCount>, Self::Error>> + Send + '_;
}
