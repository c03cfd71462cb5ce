//! Error type for `flexcrew-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored integer does not fit the domain type (e.g. a negative count).
  #[error("column {column} holds out-of-range value {value}")]
  OutOfRange { column: &'static str, value: i64 },

  #[error("project not found: {0}")]
  ProjectNotFound(uuid::Uuid),

  #[error("employee {employee_id} is already assigned to project {project_id}")]
  DuplicateAssignment {
    project_id:  uuid::Uuid,
    employee_id: uuid::Uuid,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
