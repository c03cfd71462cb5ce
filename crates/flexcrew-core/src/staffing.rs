//! Staffing gap analysis for a project.
//!
//! For every required team the analyzer reports how many of its members are
//! already staffed on the project, how many are still missing, and proposes
//! up to twice the missing headcount as candidates. It is read-only and never
//! creates project assignments.

use std::{
  collections::{HashMap, HashSet},
  sync::Arc,
};

use serde::Serialize;
use uuid::Uuid;

use crate::{
  EntityKind, Error, Result,
  error::store_err,
  store::DirectoryStore,
  workforce::{Employee, Team},
};

/// Candidates proposed per missing seat.
pub const CANDIDATE_OVERSAMPLING: usize = 2;

/// An employee as shown in a staffing report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeSuggestion {
  pub employee_id:   Uuid,
  pub names:         String,
  pub first_surname: String,
  pub team_name:     String,
}

impl EmployeeSuggestion {
  fn project(employee: &Employee, team: &Team) -> Self {
    Self {
      employee_id:   employee.employee_id,
      names:         employee.names.clone(),
      first_surname: employee.first_surname.clone(),
      team_name:     team.name.clone(),
    }
  }
}

/// Staffing status of one required team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamStaffing {
  pub team_id:             Uuid,
  pub team_name:           String,
  pub required_count:      u32,
  pub assigned_count:      u32,
  pub needed_count:        u32,
  pub assigned_employees:  Vec<EmployeeSuggestion>,
  pub suggested_employees: Vec<EmployeeSuggestion>,
}

/// Staffing report for a whole project. `team_suggestions` follows the order
/// the project's required teams were recorded in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffingReport {
  pub project_id:       Uuid,
  pub project_name:     String,
  pub team_suggestions: Vec<TeamStaffing>,
}

pub struct StaffingGapAnalyzer<S> {
  store: Arc<S>,
}

impl<S: DirectoryStore> StaffingGapAnalyzer<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn analyze(&self, project_id: Uuid) -> Result<StaffingReport> {
    let project = self
      .store
      .get_project(project_id)
      .await
      .map_err(store_err)?
      .ok_or_else(|| Error::not_found(EntityKind::Project, project_id))?;

    let requirements = self.store.list_required_teams(project_id).await.map_err(store_err)?;
    let assignments = self.store.list_assignments(project_id).await.map_err(store_err)?;

    let already_staffed: HashSet<Uuid> =
      assignments.iter().map(|a| a.assignment.employee_id).collect();

    // Assignments whose employee is missing or has no team belong to no group.
    let mut by_team: HashMap<Uuid, Vec<Employee>> = HashMap::new();
    for employee in assignments.into_iter().filter_map(|a| a.employee) {
      if let Some(team_id) = employee.team_id {
        by_team.entry(team_id).or_default().push(employee);
      }
    }

    let mut team_suggestions = Vec::with_capacity(requirements.len());
    for requirement in requirements {
      let Some(team) = requirement.team else {
        continue;
      };
      let required_count = requirement.requirement.required_count;

      let assigned = by_team.get(&team.team_id).map(Vec::as_slice).unwrap_or_default();
      let assigned_count = assigned.len() as u32;
      let needed_count = required_count.saturating_sub(assigned_count);

      let suggested_employees = if needed_count > 0 {
        self
          .store
          .list_employees_by_team(team.team_id)
          .await
          .map_err(store_err)?
          .iter()
          .filter(|e| !already_staffed.contains(&e.employee_id))
          .take(needed_count as usize * CANDIDATE_OVERSAMPLING)
          .map(|e| EmployeeSuggestion::project(e, &team))
          .collect()
      } else {
        Vec::new()
      };

      team_suggestions.push(TeamStaffing {
        team_id: team.team_id,
        team_name: team.name.clone(),
        required_count,
        assigned_count,
        needed_count,
        assigned_employees: assigned
          .iter()
          .map(|e| EmployeeSuggestion::project(e, &team))
          .collect(),
        suggested_employees,
      });
    }

    Ok(StaffingReport {
      project_id:   project.project_id,
      project_name: project.name,
      team_suggestions,
    })
  }
}
