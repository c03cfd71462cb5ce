//! Handlers for `/projects` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use flexcrew_core::{
  staffing::{StaffingGapAnalyzer, StaffingReport},
  store::DirectoryStore,
};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /projects/{id}/assignment-suggestions`
///
/// Per required team: how many are staffed, how many are still needed, and
/// candidates from that team not yet on the project.
pub async fn assignment_suggestions<S: DirectoryStore + 'static>(
  State(store): State<Arc<S>>,
  Path(project_id): Path<Uuid>,
) -> Result<Json<StaffingReport>, ApiError> {
  let report = StaffingGapAnalyzer::new(store).analyze(project_id).await?;
  Ok(Json(report))
}
