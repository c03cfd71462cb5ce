//! Component tests against the in-memory store.

use std::sync::Arc;

use chrono::NaiveTime;
use uuid::Uuid;

use crate::{
  EntityKind, Error,
  analytics::Analytics,
  ledger::{CapacityLedger, WORK_DAYS_PER_WEEK},
  memory::MemoryStore,
  optimizer::ScheduleOptimizer,
  project::{Project, ProjectAssignment, RequiredTeam},
  punctuality::{Issue, Record},
  schedule::{Schedule, ScheduleDraft, ScheduleUpdate},
  staffing::StaffingGapAnalyzer,
  store::{Deletion, DirectoryStore},
  workforce::{Employee, Team},
};

fn store() -> Arc<MemoryStore> { Arc::new(MemoryStore::new()) }

fn at(hour: u32) -> NaiveTime { NaiveTime::from_hms_opt(hour, 0, 0).unwrap() }

fn draft(name: &str, max: u32) -> ScheduleDraft {
  ScheduleDraft {
    name:          Some(name.into()),
    start_time:    Some(at(8)),
    end_time:      Some(at(16)),
    max_employees: Some(max),
  }
}

async fn schedule(s: &Arc<MemoryStore>, name: &str, max: u32) -> Schedule {
  CapacityLedger::new(s.clone()).create(draft(name, max)).await.unwrap()
}

fn hire(team_id: Option<Uuid>) -> Employee {
  let id = Uuid::new_v4();
  let mut e = Employee::new("Worker", id.simple().to_string(), format!("{id}@example.com"));
  e.team_id = team_id;
  e
}

async fn employee(s: &Arc<MemoryStore>, team_id: Option<Uuid>) -> Employee {
  s.save_employee(hire(team_id)).await.unwrap()
}

/// An employee inserted already pointing at `schedule_id`, bypassing the
/// ledger and its counter.
async fn drifted(s: &Arc<MemoryStore>, schedule_id: Uuid) -> Employee {
  let mut e = hire(None);
  e.schedule_id = Some(schedule_id);
  s.save_employee(e).await.unwrap()
}

async fn team(s: &Arc<MemoryStore>, name: &str) -> Team {
  s.save_team(Team::new(name)).await.unwrap()
}

async fn fill(s: &Arc<MemoryStore>, schedule_id: Uuid, n: usize) -> Vec<Employee> {
  let ledger = CapacityLedger::new(s.clone());
  let mut out = Vec::new();
  for _ in 0..n {
    let e = employee(s, None).await;
    ledger.assign(e.employee_id, schedule_id).await.unwrap();
    out.push(e);
  }
  out
}

// ─── Capacity ledger ─────────────────────────────────────────────────────────

#[tokio::test]
async fn create_forces_empty_counter() {
  let s = store();
  let created = schedule(&s, "Morning", 3).await;
  assert_eq!(created.current_employees, 0);
  assert_eq!(created.max_employees, 3);

  let stored = s.get_schedule(created.schedule_id).await.unwrap().unwrap();
  assert_eq!(stored, created);
}

#[tokio::test]
async fn create_rejects_invalid_payload() {
  let s = store();
  let ledger = CapacityLedger::new(s.clone());
  let err = ledger.create(draft("", 3)).await.unwrap_err();
  assert!(matches!(err, Error::InvalidInput(_)));
  let err = ledger.create(draft("Night", 0)).await.unwrap_err();
  assert!(matches!(err, Error::InvalidInput(_)));
  assert!(s.list_schedules().await.unwrap().is_empty());
}

#[tokio::test]
async fn assign_increments_target_counter() {
  let s = store();
  let sched = schedule(&s, "Morning", 3).await;
  let e = employee(&s, None).await;

  let updated = CapacityLedger::new(s.clone())
    .assign(e.employee_id, sched.schedule_id)
    .await
    .unwrap();
  assert_eq!(updated.current_employees, 1);

  let stored = s.get_employee(e.employee_id).await.unwrap().unwrap();
  assert_eq!(stored.schedule_id, Some(sched.schedule_id));
}

#[tokio::test]
async fn assign_missing_entities_is_not_found() {
  let s = store();
  let ledger = CapacityLedger::new(s.clone());
  let sched = schedule(&s, "Morning", 3).await;
  let e = employee(&s, None).await;

  let missing = Uuid::new_v4();
  let err = ledger.assign(missing, sched.schedule_id).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Employee, id } if id == missing));

  let err = ledger.assign(e.employee_id, missing).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Schedule, .. }));
}

#[tokio::test]
async fn assign_is_idempotent() {
  let s = store();
  let ledger = CapacityLedger::new(s.clone());
  let sched = schedule(&s, "Morning", 3).await;
  let e = employee(&s, None).await;

  let first = ledger.assign(e.employee_id, sched.schedule_id).await.unwrap();
  let second = ledger.assign(e.employee_id, sched.schedule_id).await.unwrap();
  assert_eq!(first.current_employees, 1);
  assert_eq!(second.current_employees, 1);
  assert!(ledger.audit().await.unwrap().is_empty());
}

#[tokio::test]
async fn full_schedule_rejects_newcomer_but_not_occupant() {
  let s = store();
  let ledger = CapacityLedger::new(s.clone());
  let sched = schedule(&s, "Solo", 1).await;
  let a = fill(&s, sched.schedule_id, 1).await.remove(0);
  let b = employee(&s, None).await;

  let err = ledger.assign(b.employee_id, sched.schedule_id).await.unwrap_err();
  assert!(matches!(err, Error::CapacityExceeded { max_employees: 1, .. }));

  let same = ledger.assign(a.employee_id, sched.schedule_id).await.unwrap();
  assert_eq!(same.current_employees, 1);

  let b_stored = s.get_employee(b.employee_id).await.unwrap().unwrap();
  assert_eq!(b_stored.schedule_id, None);
}

#[tokio::test]
async fn reassignment_conserves_occupancy() {
  let s = store();
  let ledger = CapacityLedger::new(s.clone());
  let s1 = schedule(&s, "S1", 5).await;
  let s2 = schedule(&s, "S2", 5).await;
  let mut on_s1 = fill(&s, s1.schedule_id, 3).await;
  fill(&s, s2.schedule_id, 2).await;
  let a = on_s1.remove(0);

  let updated = ledger.assign(a.employee_id, s2.schedule_id).await.unwrap();
  assert_eq!(updated.current_employees, 3);

  let s1_after = s.get_schedule(s1.schedule_id).await.unwrap().unwrap();
  assert_eq!(s1_after.current_employees, 2);
  assert!(ledger.audit().await.unwrap().is_empty());
}

#[tokio::test]
async fn release_from_drifted_schedule_clamps_at_zero() {
  let s = store();
  let ledger = CapacityLedger::new(s.clone());
  let stale = schedule(&s, "Stale", 2).await;
  let target = schedule(&s, "Target", 2).await;

  // Point the employee at `stale` without going through the ledger.
  let e = drifted(&s, stale.schedule_id).await;

  let drifts = ledger.audit().await.unwrap();
  assert_eq!(drifts.len(), 1);
  assert_eq!(drifts[0].cached, 0);
  assert_eq!(drifts[0].rostered, 1);

  ledger.assign(e.employee_id, target.schedule_id).await.unwrap();
  let stale_after = s.get_schedule(stale.schedule_id).await.unwrap().unwrap();
  assert_eq!(stale_after.current_employees, 0);
  assert!(ledger.audit().await.unwrap().is_empty());
}

#[tokio::test]
async fn employee_on_deleted_schedule_can_be_reassigned() {
  let s = store();
  let ledger = CapacityLedger::new(s.clone());
  let target = schedule(&s, "Target", 2).await;

  let e = drifted(&s, Uuid::new_v4()).await;

  let updated = ledger.assign(e.employee_id, target.schedule_id).await.unwrap();
  assert_eq!(updated.current_employees, 1);
}

#[tokio::test]
async fn saving_stale_employee_keeps_assignment() {
  let s = store();
  let ledger = CapacityLedger::new(s.clone());
  let sched = schedule(&s, "Morning", 2).await;
  let mut snapshot = employee(&s, None).await;

  ledger.assign(snapshot.employee_id, sched.schedule_id).await.unwrap();
  snapshot.password_hash = "rotated".into();
  let saved = s.save_employee(snapshot.clone()).await.unwrap();

  assert_eq!(saved.schedule_id, Some(sched.schedule_id));
  assert_eq!(saved.password_hash, "rotated");
  let stored = s.get_schedule(sched.schedule_id).await.unwrap().unwrap();
  let rostered = s.list_employees_by_schedule(sched.schedule_id).await.unwrap();
  assert_eq!(stored.current_employees, 1);
  assert_eq!(rostered.len(), 1);
  assert!(ledger.audit().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_assignments_never_overshoot_capacity() {
  let s = store();
  let sched = schedule(&s, "Last seat", 1).await;

  let mut handles = Vec::new();
  for _ in 0..8 {
    let e = employee(&s, None).await;
    let ledger = CapacityLedger::new(s.clone());
    let schedule_id = sched.schedule_id;
    handles.push(tokio::spawn(async move {
      ledger.assign(e.employee_id, schedule_id).await
    }));
  }

  let mut won = 0;
  for h in handles {
    match h.await.unwrap() {
      Ok(_) => won += 1,
      Err(Error::CapacityExceeded { .. } | Error::ConflictOnConcurrentUpdate(_)) => {}
      Err(other) => panic!("unexpected error: {other}"),
    }
  }
  assert_eq!(won, 1);

  let stored = s.get_schedule(sched.schedule_id).await.unwrap().unwrap();
  assert_eq!(stored.current_employees, 1);
  assert!(CapacityLedger::new(s.clone()).audit().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_counter() {
  let s = store();
  let ledger = CapacityLedger::new(s.clone());
  let sched = schedule(&s, "Morning", 3).await;
  fill(&s, sched.schedule_id, 2).await;

  let updated = ledger
    .update(sched.schedule_id, ScheduleUpdate {
      schedule_id:   Some(sched.schedule_id),
      name:          Some("Early".into()),
      start_time:    Some(at(6)),
      end_time:      Some(at(14)),
      max_employees: Some(4),
    })
    .await
    .unwrap();

  assert_eq!(updated.name, "Early");
  assert_eq!(updated.start_time, at(6));
  assert_eq!(updated.max_employees, 4);
  assert_eq!(updated.current_employees, 2);
  assert!(updated.version > sched.version);
}

#[tokio::test]
async fn update_unknown_schedule_is_not_found() {
  let s = store();
  let id = Uuid::new_v4();
  let err = CapacityLedger::new(s.clone())
    .update(id, ScheduleUpdate {
      schedule_id:   Some(id),
      name:          Some("Ghost".into()),
      start_time:    Some(at(6)),
      end_time:      Some(at(14)),
      max_employees: Some(4),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Schedule, .. }));
}

#[tokio::test]
async fn delete_rejects_occupied_schedule() {
  let s = store();
  let ledger = CapacityLedger::new(s.clone());
  let sched = schedule(&s, "Busy", 3).await;
  fill(&s, sched.schedule_id, 2).await;

  let err = ledger.delete(sched.schedule_id).await.unwrap_err();
  assert!(matches!(err, Error::ScheduleOccupied { occupants: 2, .. }));
  assert!(s.schedule_exists(sched.schedule_id).await.unwrap());
}

#[tokio::test]
async fn delete_empty_schedule() {
  let s = store();
  let ledger = CapacityLedger::new(s.clone());
  let sched = schedule(&s, "Idle", 3).await;

  ledger.delete(sched.schedule_id).await.unwrap();
  assert!(!s.schedule_exists(sched.schedule_id).await.unwrap());

  let err = ledger.delete(sched.schedule_id).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Schedule, .. }));
}

#[tokio::test]
async fn delete_with_stale_version_is_refused() {
  let s = store();
  let ledger = CapacityLedger::new(s.clone());
  let sched = schedule(&s, "Contested", 2).await;

  // An assignment commits after the version was read, then leaves again.
  let e = employee(&s, None).await;
  ledger.assign(e.employee_id, sched.schedule_id).await.unwrap();
  let elsewhere = schedule(&s, "Elsewhere", 2).await;
  ledger.assign(e.employee_id, elsewhere.schedule_id).await.unwrap();

  let outcome = s.delete_schedule(sched.schedule_id, sched.version).await.unwrap();
  assert_eq!(outcome, Deletion::Stale);
  assert!(s.schedule_exists(sched.schedule_id).await.unwrap());
}

#[tokio::test]
async fn delete_refuses_rostered_schedule_with_zero_counter() {
  let s = store();
  let sched = schedule(&s, "Drifted", 2).await;
  drifted(&s, sched.schedule_id).await;

  let outcome = s.delete_schedule(sched.schedule_id, sched.version).await.unwrap();
  assert_eq!(outcome, Deletion::Stale);
  assert!(s.schedule_exists(sched.schedule_id).await.unwrap());

  let err = CapacityLedger::new(s.clone()).delete(sched.schedule_id).await.unwrap_err();
  assert!(matches!(err, Error::ScheduleOccupied { occupants: 1, .. }));
}

#[tokio::test]
async fn update_schedule_never_recreates_a_missing_row() {
  let s = store();
  let sched = schedule(&s, "Gone", 2).await;
  assert_eq!(
    s.delete_schedule(sched.schedule_id, sched.version).await.unwrap(),
    Deletion::Deleted
  );

  let updated = s.update_schedule(sched.clone()).await.unwrap();
  assert!(updated.is_none());
  assert!(!s.schedule_exists(sched.schedule_id).await.unwrap());
}

#[tokio::test]
async fn weekly_schedule_repeats_current_shift() {
  let s = store();
  let ledger = CapacityLedger::new(s.clone());
  let sched = schedule(&s, "Morning", 3).await;
  let e = employee(&s, None).await;

  assert!(ledger.weekly_schedule(e.employee_id).await.unwrap().is_empty());

  ledger.assign(e.employee_id, sched.schedule_id).await.unwrap();
  let week = ledger.weekly_schedule(e.employee_id).await.unwrap();
  assert_eq!(week.len(), WORK_DAYS_PER_WEEK);
  assert!(week.iter().all(|d| d.schedule_id == sched.schedule_id));
}

// ─── Schedule optimizer ──────────────────────────────────────────────────────

#[tokio::test]
async fn optimizer_recommends_most_occupied_open_schedule() {
  let s = store();
  let t = team(&s, "Ops").await;
  employee(&s, Some(t.team_id)).await;

  let quiet = schedule(&s, "Quiet", 5).await;
  let busy = schedule(&s, "Busy", 5).await;
  let full = schedule(&s, "Full", 2).await;
  fill(&s, quiet.schedule_id, 1).await;
  fill(&s, busy.schedule_id, 3).await;
  fill(&s, full.schedule_id, 2).await;

  let picked = ScheduleOptimizer::new(s.clone())
    .recommend_for_team(t.team_id)
    .await
    .unwrap();
  assert_eq!(picked.schedule_id, busy.schedule_id);
}

#[tokio::test]
async fn optimizer_falls_back_when_everything_is_full() {
  let s = store();
  let t = team(&s, "Ops").await;
  employee(&s, Some(t.team_id)).await;
  let first = schedule(&s, "First", 1).await;
  let second = schedule(&s, "Second", 1).await;
  fill(&s, first.schedule_id, 1).await;
  fill(&s, second.schedule_id, 1).await;

  let picked = ScheduleOptimizer::new(s.clone())
    .recommend_for_team(t.team_id)
    .await
    .unwrap();
  assert_eq!(picked.schedule_id, first.schedule_id);
}

#[tokio::test]
async fn optimizer_errors() {
  let s = store();
  let optimizer = ScheduleOptimizer::new(s.clone());

  let err = optimizer.recommend_for_team(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Team, .. }));

  let empty = team(&s, "Empty").await;
  let err = optimizer.recommend_for_team(empty.team_id).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::TeamMembers, .. }));

  let staffed = team(&s, "Staffed").await;
  employee(&s, Some(staffed.team_id)).await;
  let err = optimizer.recommend_for_team(staffed.team_id).await.unwrap_err();
  assert!(matches!(err, Error::NoSchedulesAvailable));
}

// ─── Staffing gap analyzer ───────────────────────────────────────────────────

#[tokio::test]
async fn staffing_gap_counts_and_candidates() {
  let s = store();
  let t = team(&s, "Backend").await;
  let mut members = Vec::new();
  for _ in 0..4 {
    members.push(employee(&s, Some(t.team_id)).await);
  }
  let project = s.save_project(Project::new("Apollo")).await.unwrap();
  s.save_required_team(RequiredTeam::new(project.project_id, t.team_id, 3))
    .await
    .unwrap();
  s.save_assignment(ProjectAssignment::new(project.project_id, members[0].employee_id))
    .await
    .unwrap();

  let report = StaffingGapAnalyzer::new(s.clone())
    .analyze(project.project_id)
    .await
    .unwrap();
  assert_eq!(report.project_name, "Apollo");
  assert_eq!(report.team_suggestions.len(), 1);

  let row = &report.team_suggestions[0];
  assert_eq!(row.team_name, "Backend");
  assert_eq!(row.required_count, 3);
  assert_eq!(row.assigned_count, 1);
  assert_eq!(row.needed_count, 2);
  assert_eq!(row.assigned_employees.len(), 1);
  assert_eq!(row.assigned_employees[0].employee_id, members[0].employee_id);
  assert_eq!(row.suggested_employees.len(), 3);
  assert!(row.suggested_employees.len() <= 4);
  assert!(
    row
      .suggested_employees
      .iter()
      .all(|e| e.employee_id != members[0].employee_id)
  );
}

#[tokio::test]
async fn staffing_oversamples_by_two() {
  let s = store();
  let t = team(&s, "QA").await;
  for _ in 0..10 {
    employee(&s, Some(t.team_id)).await;
  }
  let project = s.save_project(Project::new("Gemini")).await.unwrap();
  s.save_required_team(RequiredTeam::new(project.project_id, t.team_id, 2))
    .await
    .unwrap();

  let report = StaffingGapAnalyzer::new(s.clone())
    .analyze(project.project_id)
    .await
    .unwrap();
  let row = &report.team_suggestions[0];
  assert_eq!(row.needed_count, 2);
  assert_eq!(row.suggested_employees.len(), 4);
}

#[tokio::test]
async fn fully_staffed_team_gets_no_suggestions() {
  let s = store();
  let t = team(&s, "Design").await;
  let a = employee(&s, Some(t.team_id)).await;
  let b = employee(&s, Some(t.team_id)).await;
  employee(&s, Some(t.team_id)).await;
  let project = s.save_project(Project::new("Mercury")).await.unwrap();
  s.save_required_team(RequiredTeam::new(project.project_id, t.team_id, 1))
    .await
    .unwrap();
  for e in [&a, &b] {
    s.save_assignment(ProjectAssignment::new(project.project_id, e.employee_id))
      .await
      .unwrap();
  }

  let report = StaffingGapAnalyzer::new(s.clone())
    .analyze(project.project_id)
    .await
    .unwrap();
  let row = &report.team_suggestions[0];
  assert_eq!(row.assigned_count, 2);
  assert_eq!(row.needed_count, 0);
  assert!(row.suggested_employees.is_empty());
}

#[tokio::test]
async fn staffing_skips_teamless_assignments_and_dangling_teams() {
  let s = store();
  let infra = team(&s, "Infra").await;
  let data = team(&s, "Data").await;
  let teamless = employee(&s, None).await;
  let project = s.save_project(Project::new("Vostok")).await.unwrap();

  s.save_required_team(RequiredTeam::new(project.project_id, infra.team_id, 1))
    .await
    .unwrap();
  s.save_required_team(RequiredTeam::new(project.project_id, Uuid::new_v4(), 5))
    .await
    .unwrap();
  s.save_required_team(RequiredTeam::new(project.project_id, data.team_id, 2))
    .await
    .unwrap();
  s.save_assignment(ProjectAssignment::new(project.project_id, teamless.employee_id))
    .await
    .unwrap();
  s.save_assignment(ProjectAssignment::new(project.project_id, Uuid::new_v4()))
    .await
    .unwrap();

  let report = StaffingGapAnalyzer::new(s.clone())
    .analyze(project.project_id)
    .await
    .unwrap();
  let names: Vec<&str> =
    report.team_suggestions.iter().map(|r| r.team_name.as_str()).collect();
  assert_eq!(names, ["Infra", "Data"]);
  assert!(report.team_suggestions.iter().all(|r| r.assigned_count == 0));
  assert!(report.team_suggestions.iter().all(|r| r.suggested_employees.is_empty()));
}

#[tokio::test]
async fn staffing_unknown_project_is_not_found() {
  let s = store();
  let err = StaffingGapAnalyzer::new(s.clone())
    .analyze(Uuid::new_v4())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Project, .. }));
}

// ─── Analytics ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn punctuality_rollup_from_records() {
  let s = store();
  let sched = schedule(&s, "Morning", 3).await;
  let e = employee(&s, None).await;

  for status in ["Punctual", "Punctual", "Late", "Missed", "Excused"] {
    let issue = s.save_issue(Issue::new(status, 0)).await.unwrap();
    s.save_record(Record::new(e.employee_id, sched.schedule_id, issue.issue_id))
      .await
      .unwrap();
  }

  let stats = Analytics::new(s.clone()).punctuality().await.unwrap();
  assert_eq!(stats.punctual_count, 2);
  assert_eq!(stats.late_count, 1);
  assert_eq!(stats.early_count, 0);
  assert_eq!(stats.missed_count, 1);
  assert_eq!(stats.total_records, 4);
}

#[tokio::test]
async fn schedule_load_follows_ledger_counters() {
  let s = store();
  let sched = schedule(&s, "Ten", 10).await;
  fill(&s, sched.schedule_id, 8).await;
  schedule(&s, "Empty", 4).await;

  let loads = Analytics::new(s.clone()).schedule_load().await.unwrap();
  assert_eq!(loads.len(), 2);
  assert_eq!(loads[0].schedule_name, "Ten");
  assert_eq!(loads[0].load_percentage, 80.0);
  assert_eq!(loads[1].load_percentage, 0.0);
}
