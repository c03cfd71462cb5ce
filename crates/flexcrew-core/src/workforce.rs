//! Workforce entities: employees and the teams they belong to.
//!
//! Both relations out of an [`Employee`] are weak references: the employee
//! holds the foreign key, and neither a [`Team`] nor a schedule owns its
//! members. Membership is always derived through a store lookup.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named group of employees. Names are unique across the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
  pub team_id: Uuid,
  pub name:    String,
}

impl Team {
  pub fn new(name: impl Into<String>) -> Self {
    Self { team_id: Uuid::new_v4(), name: name.into() }
  }
}

/// A member of the workforce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
  pub employee_id:    Uuid,
  /// Given name(s).
  pub names:          String,
  pub first_surname:  String,
  pub second_surname: Option<String>,
  /// Unique across the directory; doubles as the login name.
  pub email:          String,
  /// Opaque credential owned by the authentication layer. Never serialised.
  #[serde(skip_serializing, default)]
  pub password_hash:  String,
  pub team_id:        Option<Uuid>,
  /// Changed only through [`crate::ledger::CapacityLedger::assign`].
  pub schedule_id:    Option<Uuid>,
}

impl Employee {
  /// Convenience constructor: no team, no schedule, empty credential.
  pub fn new(
    names: impl Into<String>,
    first_surname: impl Into<String>,
    email: impl Into<String>,
  ) -> Self {
    Self {
      employee_id:    Uuid::new_v4(),
      names:          names.into(),
      first_surname:  first_surname.into(),
      second_surname: None,
      email:          email.into(),
      password_hash:  String::new(),
      team_id:        None,
      schedule_id:    None,
    }
  }

  pub fn in_team(mut self, team_id: Uuid) -> Self {
    self.team_id = Some(team_id);
    self
  }
}
