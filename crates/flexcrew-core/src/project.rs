//! Projects and their staffing: required team headcounts and the employees
//! assigned to work on them.
//!
//! Project staffing is independent of schedule assignment: assigning an
//! employee to a project never touches the capacity ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workforce::{Employee, Team};

/// Status a project is created with unless the caller says otherwise.
pub const DEFAULT_PROJECT_STATUS: &str = "OPEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
  pub project_id:  Uuid,
  pub name:        String,
  pub description: Option<String>,
  /// Free-form; defaults to [`DEFAULT_PROJECT_STATUS`].
  pub status:      String,
  pub created_at:  DateTime<Utc>,
  pub due_date:    Option<DateTime<Utc>>,
}

impl Project {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      project_id:  Uuid::new_v4(),
      name:        name.into(),
      description: None,
      status:      DEFAULT_PROJECT_STATUS.to_string(),
      created_at:  Utc::now(),
      due_date:    None,
    }
  }
}

/// A (project, team, headcount) staffing target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredTeam {
  pub required_team_id: Uuid,
  pub project_id:       Uuid,
  pub team_id:          Uuid,
  pub required_count:   u32,
}

impl RequiredTeam {
  pub fn new(project_id: Uuid, team_id: Uuid, required_count: u32) -> Self {
    Self {
      required_team_id: Uuid::new_v4(),
      project_id,
      team_id,
      required_count,
    }
  }
}

/// An employee staffed on a project. Unique per (project, employee).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAssignment {
  pub assignment_id: Uuid,
  pub project_id:    Uuid,
  pub employee_id:   Uuid,
  pub assigned_at:   DateTime<Utc>,
  pub notes:         Option<String>,
}

impl ProjectAssignment {
  pub fn new(project_id: Uuid, employee_id: Uuid) -> Self {
    Self {
      assignment_id: Uuid::new_v4(),
      project_id,
      employee_id,
      assigned_at: Utc::now(),
      notes: None,
    }
  }
}

// ─── Joined read models ──────────────────────────────────────────────────────

/// A [`RequiredTeam`] joined with the team it references. `team` is `None`
/// when the reference dangles.
#[derive(Debug, Clone)]
pub struct StaffingRequirement {
  pub requirement: RequiredTeam,
  pub team:        Option<Team>,
}

/// A [`ProjectAssignment`] joined with its employee. `employee` is `None`
/// when the reference dangles.
#[derive(Debug, Clone)]
pub struct StaffedAssignment {
  pub assignment: ProjectAssignment,
  pub employee:   Option<Employee>,
}
