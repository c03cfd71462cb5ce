//! [`SqliteStore`], the SQLite implementation of [`DirectoryStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, TransactionBehavior};
use tracing::debug;
use uuid::Uuid;

use flexcrew_core::{
  project::{
    Project, ProjectAssignment, RequiredTeam, StaffedAssignment,
    StaffingRequirement,
  },
  punctuality::{Issue, Record, StatusCount},
  schedule::Schedule,
  store::{AssignmentPlan, Commit, CounterWrite, Deletion, DirectoryStore},
  workforce::{Employee, Team},
};

use crate::{
  encode::{
    decode_u64, encode_dt, encode_time, encode_uuid,
    encode_version, RawAssignment, RawEmployee, RawProject, RawRequiredTeam,
    RawSchedule, RawTeam, EMPLOYEE_COLUMNS, PROJECT_COLUMNS, SCHEDULE_COLUMNS,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A FlexCrew directory backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
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

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }

  /// Employees matching `clause`, which may reference the single parameter
  /// `?1` and the table alias `e`.
  async fn employees_where(
    &self,
    clause: &'static str,
    param: String,
  ) -> Result<Vec<Employee>> {
    let sql = format!(
      "SELECT {EMPLOYEE_COLUMNS} FROM employees e WHERE {clause} ORDER BY \
       e.rowid"
    );

    let raws: Vec<RawEmployee> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![param], |row| {
            RawEmployee::from_row(row, 0)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEmployee::into_employee).collect()
  }

  async fn project_exists(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM projects WHERE project_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }
}

/// Apply one guarded counter write inside an open transaction. Returns
/// `false` if the schedule is gone or its version has moved on.
fn write_counter(
  tx: &rusqlite::Transaction<'_>,
  write: &(String, i64, i64),
) -> rusqlite::Result<bool> {
  let (schedule_id, expected_version, current_employees) = write;
  let changed = tx.execute(
    "UPDATE schedules
        SET current_employees = ?1, version = version + 1
      WHERE schedule_id = ?2 AND version = ?3",
    rusqlite::params![current_employees, schedule_id, expected_version],
  )?;
  Ok(changed == 1)
}

fn encode_counter_write(write: CounterWrite) -> (String, i64, i64) {
  (
    encode_uuid(write.schedule_id),
    encode_version(write.expected_version),
    i64::from(write.current_employees),
  )
}

// ─── DirectoryStore impl ─────────────────────────────────────────────────────

impl DirectoryStore for SqliteStore {
  type Error = Error;

  // ── Employees ─────────────────────────────────────────────────────────────

  async fn get_employee(&self, id: Uuid) -> Result<Option<Employee>> {
    let found = self.employees_where("e.employee_id = ?1", encode_uuid(id)).await?;
    Ok(found.into_iter().next())
  }

  async fn get_employee_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> Result<Option<Employee>> {
    let found = self.employees_where("e.email = ?1", email.to_owned()).await?;
    Ok(found.into_iter().next())
  }

  async fn list_employees_by_team(&self, team_id: Uuid) -> Result<Vec<Employee>> {
    self.employees_where("e.team_id = ?1", encode_uuid(team_id)).await
  }

  async fn list_employees_by_schedule(
    &self,
    schedule_id: Uuid,
  ) -> Result<Vec<Employee>> {
    self
      .employees_where("e.schedule_id = ?1", encode_uuid(schedule_id))
      .await
  }

  async fn save_employee(&self, employee: Employee) -> Result<Employee> {
    let id_str       = encode_uuid(employee.employee_id);
    let team_str     = employee.team_id.map(encode_uuid);
    let schedule_str = employee.schedule_id.map(encode_uuid);
    let names        = employee.names;
    let first        = employee.first_surname;
    let second       = employee.second_surname;
    let email        = employee.email;
    let hash         = employee.password_hash;
    let select       =
      format!("SELECT {EMPLOYEE_COLUMNS} FROM employees e WHERE e.employee_id = ?1");

    // `schedule_id` is written on insert only; moves go through
    // `commit_assignment`.
    let raw: RawEmployee = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO employees
             (employee_id, names, first_surname, second_surname, email,
              password_hash, team_id, schedule_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
           ON CONFLICT(employee_id) DO UPDATE SET
             names          = excluded.names,
             first_surname  = excluded.first_surname,
             second_surname = excluded.second_surname,
             email          = excluded.email,
             password_hash  = excluded.password_hash,
             team_id        = excluded.team_id",
          rusqlite::params![
            id_str,
            names,
            first,
            second,
            email,
            hash,
            team_str,
            schedule_str
          ],
        )?;
        let raw = tx.query_row(&select, rusqlite::params![id_str], |row| {
          RawEmployee::from_row(row, 0)
        })?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_employee()
  }

  // ── Teams ─────────────────────────────────────────────────────────────────

  async fn get_team(&self, id: Uuid) -> Result<Option<Team>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawTeam> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT team_id, name FROM teams WHERE team_id = ?1",
              rusqlite::params![id_str],
              |row| RawTeam::from_joined_row(row, 0),
            )
            .optional()?
            .flatten(),
        )
      })
      .await?;

    raw.map(RawTeam::into_team).transpose()
  }

  async fn list_teams(&self) -> Result<Vec<Team>> {
    let raws: Vec<Option<RawTeam>> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT team_id, name FROM teams ORDER BY rowid")?;
        let rows = stmt
          .query_map([], |row| RawTeam::from_joined_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().flatten().map(RawTeam::into_team).collect()
  }

  async fn save_team(&self, team: Team) -> Result<Team> {
    let id_str = encode_uuid(team.team_id);
    let name   = team.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO teams (team_id, name) VALUES (?1, ?2)
           ON CONFLICT(team_id) DO UPDATE SET name = excluded.name",
          rusqlite::params![id_str, name],
        )?;
        Ok(())
      })
      .await?;

    Ok(team)
  }

  // ── Schedules ─────────────────────────────────────────────────────────────

  async fn get_schedule(&self, id: Uuid) -> Result<Option<Schedule>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE schedule_id = ?1");

    let raw: Option<RawSchedule> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawSchedule::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSchedule::into_schedule).transpose()
  }

  async fn list_schedules(&self) -> Result<Vec<Schedule>> {
    let sql = format!("SELECT {SCHEDULE_COLUMNS} FROM schedules ORDER BY rowid");

    let raws: Vec<RawSchedule> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawSchedule::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSchedule::into_schedule).collect()
  }

  async fn save_schedule(&self, schedule: Schedule) -> Result<Schedule> {
    let id_str  = encode_uuid(schedule.schedule_id);
    let name    = schedule.name;
    let start   = encode_time(schedule.start_time);
    let end     = encode_time(schedule.end_time);
    let max     = i64::from(schedule.max_employees);
    let current = i64::from(schedule.current_employees);
    let version = encode_version(schedule.version);
    let select  = format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE schedule_id = ?1");

    let raw: RawSchedule = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO schedules
             (schedule_id, name, start_time, end_time, max_employees,
              current_employees, version)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT(schedule_id) DO UPDATE SET
             name          = excluded.name,
             start_time    = excluded.start_time,
             end_time      = excluded.end_time,
             max_employees = excluded.max_employees,
             version       = schedules.version + 1",
          rusqlite::params![id_str, name, start, end, max, current, version],
        )?;
        let raw =
          tx.query_row(&select, rusqlite::params![id_str], RawSchedule::from_row)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_schedule()
  }

  async fn update_schedule(&self, schedule: Schedule) -> Result<Option<Schedule>> {
    let id_str = encode_uuid(schedule.schedule_id);
    let name   = schedule.name;
    let start  = encode_time(schedule.start_time);
    let end    = encode_time(schedule.end_time);
    let max    = i64::from(schedule.max_employees);
    let select = format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE schedule_id = ?1");

    let raw: Option<RawSchedule> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE schedules
           SET name          = ?2,
               start_time    = ?3,
               end_time      = ?4,
               max_employees = ?5,
               version       = version + 1
           WHERE schedule_id = ?1",
          rusqlite::params![id_str, name, start, end, max],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let raw =
          tx.query_row(&select, rusqlite::params![id_str], RawSchedule::from_row)?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawSchedule::into_schedule).transpose()
  }

  async fn delete_schedule(&self, id: Uuid, expected_version: u64) -> Result<Deletion> {
    let id_str   = encode_uuid(id);
    let expected = encode_version(expected_version);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let version: Option<i64> = tx
          .query_row(
            "SELECT version FROM schedules WHERE schedule_id = ?1",
            rusqlite::params![id_str],
            |row| row.get(0),
          )
          .optional()?;
        let Some(version) = version else {
          return Ok(Deletion::Missing);
        };
        let rostered = tx
          .query_row(
            "SELECT 1 FROM employees WHERE schedule_id = ?1 LIMIT 1",
            rusqlite::params![id_str],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if version != expected || rostered {
          return Ok(Deletion::Stale);
        }
        tx.execute(
          "DELETE FROM schedules WHERE schedule_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(Deletion::Deleted)
      })
      .await?;

    if outcome == Deletion::Stale {
      debug!(schedule_id = %id, "stale schedule delete rolled back");
    }
    Ok(outcome)
  }

  async fn schedule_exists(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM schedules WHERE schedule_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  async fn commit_assignment(&self, plan: AssignmentPlan) -> Result<Commit> {
    let employee_str = encode_uuid(plan.employee_id);
    let previous_str = plan.expected_previous.map(encode_uuid);
    let release      = plan.release.map(encode_counter_write);
    let acquire      = encode_counter_write(plan.acquire);
    let select       = format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE schedule_id = ?1");

    // `None` means a guard failed; dropping the transaction rolls it back.
    let raw: Option<RawSchedule> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let moved = tx.execute(
          "UPDATE employees SET schedule_id = ?1
            WHERE employee_id = ?2 AND schedule_id IS ?3",
          rusqlite::params![acquire.0, employee_str, previous_str],
        )?;
        if moved != 1 {
          return Ok(None);
        }

        if let Some(release) = &release {
          if !write_counter(&tx, release)? {
            return Ok(None);
          }
        }
        if !write_counter(&tx, &acquire)? {
          return Ok(None);
        }

        let raw =
          tx.query_row(&select, rusqlite::params![acquire.0], RawSchedule::from_row)?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    match raw {
      Some(raw) => Ok(Commit::Applied(raw.into_schedule()?)),
      None => {
        debug!(employee_id = %plan.employee_id, "assignment guard failed, rolled back");
        Ok(Commit::Stale)
      }
    }
  }

  // ── Projects ──────────────────────────────────────────────────────────────

  async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE project_id = ?1");

    let raw: Option<RawProject> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawProject::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProject::into_project).transpose()
  }

  async fn save_project(&self, project: Project) -> Result<Project> {
    let id_str      = encode_uuid(project.project_id);
    let name        = project.name.clone();
    let description = project.description.clone();
    let status      = project.status.clone();
    let created_str = encode_dt(project.created_at);
    let due_str     = project.due_date.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO projects
             (project_id, name, description, status, created_at, due_date)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT(project_id) DO UPDATE SET
             name        = excluded.name,
             description = excluded.description,
             status      = excluded.status,
             due_date    = excluded.due_date",
          rusqlite::params![id_str, name, description, status, created_str, due_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(project)
  }

  async fn delete_project(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let removed = self
      .conn
      .call(move |conn| {
        // Required teams and assignments follow via ON DELETE CASCADE.
        Ok(conn.execute(
          "DELETE FROM projects WHERE project_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }

  async fn save_required_team(&self, required: RequiredTeam) -> Result<RequiredTeam> {
    if !self.project_exists(required.project_id).await? {
      return Err(Error::ProjectNotFound(required.project_id));
    }

    let id_str      = encode_uuid(required.required_team_id);
    let project_str = encode_uuid(required.project_id);
    let team_str    = encode_uuid(required.team_id);
    let count       = i64::from(required.required_count);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO project_required_teams
             (required_team_id, project_id, team_id, required_count)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(required_team_id) DO UPDATE SET
             team_id        = excluded.team_id,
             required_count = excluded.required_count",
          rusqlite::params![id_str, project_str, team_str, count],
        )?;
        Ok(())
      })
      .await?;

    Ok(required)
  }

  async fn save_assignment(
    &self,
    assignment: ProjectAssignment,
  ) -> Result<ProjectAssignment> {
    if !self.project_exists(assignment.project_id).await? {
      return Err(Error::ProjectNotFound(assignment.project_id));
    }

    let id_str       = encode_uuid(assignment.assignment_id);
    let project_str  = encode_uuid(assignment.project_id);
    let employee_str = encode_uuid(assignment.employee_id);
    let at_str       = encode_dt(assignment.assigned_at);
    let notes        = assignment.notes.clone();

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let taken: bool = conn
          .query_row(
            "SELECT 1 FROM project_assignments
              WHERE project_id = ?1 AND employee_id = ?2 AND assignment_id <> ?3",
            rusqlite::params![project_str, employee_str, id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO project_assignments
             (assignment_id, project_id, employee_id, assigned_at, notes)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT(assignment_id) DO UPDATE SET
             employee_id = excluded.employee_id,
             assigned_at = excluded.assigned_at,
             notes       = excluded.notes",
          rusqlite::params![id_str, project_str, employee_str, at_str, notes],
        )?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::DuplicateAssignment {
        project_id:  assignment.project_id,
        employee_id: assignment.employee_id,
      });
    }
    Ok(assignment)
  }

  async fn list_required_teams(
    &self,
    project_id: Uuid,
  ) -> Result<Vec<StaffingRequirement>> {
    let project_str = encode_uuid(project_id);

    let raws: Vec<(RawRequiredTeam, Option<RawTeam>)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT r.required_team_id, r.project_id, r.team_id, r.required_count,
                  t.team_id, t.name
             FROM project_required_teams r
             LEFT JOIN teams t ON t.team_id = r.team_id
            WHERE r.project_id = ?1
            ORDER BY r.rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![project_str], |row| {
            let requirement = RawRequiredTeam {
              required_team_id: row.get(0)?,
              project_id:       row.get(1)?,
              team_id:          row.get(2)?,
              required_count:   row.get(3)?,
            };
            Ok((requirement, RawTeam::from_joined_row(row, 4)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(requirement, team)| {
        Ok(StaffingRequirement {
          requirement: requirement.into_required_team()?,
          team:        team.map(RawTeam::into_team).transpose()?,
        })
      })
      .collect()
  }

  async fn list_assignments(
    &self,
    project_id: Uuid,
  ) -> Result<Vec<StaffedAssignment>> {
    let project_str = encode_uuid(project_id);
    let sql = format!(
      "SELECT a.assignment_id, a.project_id, a.employee_id, a.assigned_at,
              a.notes, {EMPLOYEE_COLUMNS}
         FROM project_assignments a
         LEFT JOIN employees e ON e.employee_id = a.employee_id
        WHERE a.project_id = ?1
        ORDER BY a.rowid"
    );

    let raws: Vec<(RawAssignment, Option<RawEmployee>)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![project_str], |row| {
            let assignment = RawAssignment {
              assignment_id: row.get(0)?,
              project_id:    row.get(1)?,
              employee_id:   row.get(2)?,
              assigned_at:   row.get(3)?,
              notes:         row.get(4)?,
            };
            Ok((assignment, RawEmployee::from_joined_row(row, 5)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(assignment, employee)| {
        Ok(StaffedAssignment {
          assignment: assignment.into_assignment()?,
          employee:   employee.map(RawEmployee::into_employee).transpose()?,
        })
      })
      .collect()
  }

  // ── Punctuality ───────────────────────────────────────────────────────────

  async fn save_issue(&self, issue: Issue) -> Result<Issue> {
    let id_str      = encode_uuid(issue.issue_id);
    let status      = issue.status.clone();
    let delay       = i64::from(issue.delay_minutes);
    let description = issue.description.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO issues (issue_id, status, delay_minutes, description)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(issue_id) DO UPDATE SET
             status        = excluded.status,
             delay_minutes = excluded.delay_minutes,
             description   = excluded.description",
          rusqlite::params![id_str, status, delay, description],
        )?;
        Ok(())
      })
      .await?;

    Ok(issue)
  }

  async fn save_record(&self, record: Record) -> Result<Record> {
    let id_str       = encode_uuid(record.record_id);
    let employee_str = encode_uuid(record.employee_id);
    let schedule_str = encode_uuid(record.schedule_id);
    let issue_str    = encode_uuid(record.issue_id);
    let at_str       = encode_dt(record.recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO records
             (record_id, employee_id, schedule_id, issue_id, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT(record_id) DO UPDATE SET
             employee_id = excluded.employee_id,
             schedule_id = excluded.schedule_id,
             issue_id    = excluded.issue_id,
             recorded_at = excluded.recorded_at",
          rusqlite::params![id_str, employee_str, schedule_str, issue_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn count_records_by_status(&self) -> Result<Vec<StatusCount>> {
    let rows: Vec<(String, i64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT i.status, COUNT(r.record_id)
             FROM records r
             JOIN issues i ON i.issue_id = r.issue_id
            GROUP BY i.status
            ORDER BY MIN(r.rowid)",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(status, count)| {
        Ok(StatusCount::new(status, decode_u64("count", count)?))
      })
      .collect()
  }
}

