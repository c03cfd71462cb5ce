//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and shift boundaries as
//! `HH:MM:SS`. UUIDs are stored as hyphenated lowercase strings. Counters are
//! `INTEGER` columns; a NULL counter reads as zero.

use chrono::{DateTime, NaiveTime, Utc};
use flexcrew_core::{
  project::{Project, ProjectAssignment, RequiredTeam},
  schedule::Schedule,
  workforce::{Employee, Team},
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveTime ───────────────────────────────────────────────────────────────

const TIME_FORMAT: &str = "%H:%M:%S";

pub fn encode_time(t: NaiveTime) -> String { t.format(TIME_FORMAT).to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, TIME_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Counters ────────────────────────────────────────────────────────────────

/// Decode a nullable count column; NULL is zero.
pub fn decode_count(column: &'static str, value: Option<i64>) -> Result<u32> {
  let value = value.unwrap_or(0);
  u32::try_from(value).map_err(|_| Error::OutOfRange { column, value })
}

/// Versions past `i64::MAX` saturate.
pub fn encode_version(version: u64) -> i64 {
  i64::try_from(version).unwrap_or(i64::MAX)
}

pub fn decode_u64(column: &'static str, value: i64) -> Result<u64> {
  u64::try_from(value).map_err(|_| Error::OutOfRange { column, value })
}

// ─── Column lists ────────────────────────────────────────────────────────────

pub const EMPLOYEE_COLUMNS: &str = "e.employee_id, e.names, e.first_surname, \
  e.second_surname, e.email, e.password_hash, e.team_id, e.schedule_id";

pub const SCHEDULE_COLUMNS: &str = "schedule_id, name, start_time, end_time, \
  max_employees, current_employees, version";

pub const PROJECT_COLUMNS: &str =
  "project_id, name, description, status, created_at, due_date";

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from an `employees` row (aliased `e`).
pub struct RawEmployee {
  pub employee_id:    String,
  pub names:          String,
  pub first_surname:  String,
  pub second_surname: Option<String>,
  pub email:          String,
  pub password_hash:  String,
  pub team_id:        Option<String>,
  pub schedule_id:    Option<String>,
}

impl RawEmployee {
  /// Read [`EMPLOYEE_COLUMNS`] starting at column `at`.
  pub fn from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      employee_id:    row.get(at)?,
      names:          row.get(at + 1)?,
      first_surname:  row.get(at + 2)?,
      second_surname: row.get(at + 3)?,
      email:          row.get(at + 4)?,
      password_hash:  row.get(at + 5)?,
      team_id:        row.get(at + 6)?,
      schedule_id:    row.get(at + 7)?,
    })
  }

  /// Like [`Self::from_row`], for the nullable side of a LEFT JOIN.
  pub fn from_joined_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Option<Self>> {
    let id: Option<String> = row.get(at)?;
    match id {
      Some(_) => Self::from_row(row, at).map(Some),
      None => Ok(None),
    }
  }

  pub fn into_employee(self) -> Result<Employee> {
    Ok(Employee {
      employee_id:    decode_uuid(&self.employee_id)?,
      names:          self.names,
      first_surname:  self.first_surname,
      second_surname: self.second_surname,
      email:          self.email,
      password_hash:  self.password_hash,
      team_id:        decode_opt_uuid(self.team_id)?,
      schedule_id:    decode_opt_uuid(self.schedule_id)?,
    })
  }
}

/// Raw values read from a `teams` row.
pub struct RawTeam {
  pub team_id: String,
  pub name:    String,
}

impl RawTeam {
  pub fn from_joined_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Option<Self>> {
    let team_id: Option<String> = row.get(at)?;
    let name: Option<String> = row.get(at + 1)?;
    Ok(team_id.zip(name).map(|(team_id, name)| Self { team_id, name }))
  }

  pub fn into_team(self) -> Result<Team> {
    Ok(Team { team_id: decode_uuid(&self.team_id)?, name: self.name })
  }
}

/// Raw values read from a `schedules` row.
pub struct RawSchedule {
  pub schedule_id:       String,
  pub name:              String,
  pub start_time:        String,
  pub end_time:          String,
  pub max_employees:     Option<i64>,
  pub current_employees: Option<i64>,
  pub version:           i64,
}

impl RawSchedule {
  /// Read [`SCHEDULE_COLUMNS`] from the start of `row`.
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      schedule_id:       row.get(0)?,
      name:              row.get(1)?,
      start_time:        row.get(2)?,
      end_time:          row.get(3)?,
      max_employees:     row.get(4)?,
      current_employees: row.get(5)?,
      version:           row.get(6)?,
    })
  }

  pub fn into_schedule(self) -> Result<Schedule> {
    Ok(Schedule {
      schedule_id:       decode_uuid(&self.schedule_id)?,
      name:              self.name,
      start_time:        decode_time(&self.start_time)?,
      end_time:          decode_time(&self.end_time)?,
      max_employees:     decode_count("max_employees", self.max_employees)?,
      current_employees: decode_count("current_employees", self.current_employees)?,
      version:           decode_u64("version", self.version)?,
    })
  }
}

/// Raw values read from a `projects` row.
pub struct RawProject {
  pub project_id:  String,
  pub name:        String,
  pub description: Option<String>,
  pub status:      String,
  pub created_at:  String,
  pub due_date:    Option<String>,
}

impl RawProject {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      project_id:  row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
      status:      row.get(3)?,
      created_at:  row.get(4)?,
      due_date:    row.get(5)?,
    })
  }

  pub fn into_project(self) -> Result<Project> {
    Ok(Project {
      project_id:  decode_uuid(&self.project_id)?,
      name:        self.name,
      description: self.description,
      status:      self.status,
      created_at:  decode_dt(&self.created_at)?,
      due_date:    self.due_date.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw values read from a `project_required_teams` row.
pub struct RawRequiredTeam {
  pub required_team_id: String,
  pub project_id:       String,
  pub team_id:          String,
  pub required_count:   i64,
}

impl RawRequiredTeam {
  pub fn into_required_team(self) -> Result<RequiredTeam> {
    Ok(RequiredTeam {
      required_team_id: decode_uuid(&self.required_team_id)?,
      project_id:       decode_uuid(&self.project_id)?,
      team_id:          decode_uuid(&self.team_id)?,
      required_count:   decode_count("required_count", Some(self.required_count))?,
    })
  }
}

/// Raw values read from a `project_assignments` row.
pub struct RawAssignment {
  pub assignment_id: String,
  pub project_id:    String,
  pub employee_id:   String,
  pub assigned_at:   String,
  pub notes:         Option<String>,
}

impl RawAssignment {
  pub fn into_assignment(self) -> Result<ProjectAssignment> {
    Ok(ProjectAssignment {
      assignment_id: decode_uuid(&self.assignment_id)?,
      project_id:    decode_uuid(&self.project_id)?,
      employee_id:   decode_uuid(&self.employee_id)?,
      assigned_at:   decode_dt(&self.assigned_at)?,
      notes:         self.notes,
    })
  }
}
