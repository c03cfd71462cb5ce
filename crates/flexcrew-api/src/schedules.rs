//! Handlers for `/schedules` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/schedules` | Body: name, start/end time, capacity. 201 |
//! | `PUT`    | `/schedules/{id}` | Body `schedule_id` is required and must match the path |
//! | `DELETE` | `/schedules/{id}` | 409 while anyone is assigned or on a concurrent change. 204 |
//! | `POST`   | `/schedules/assign/{employee_id}/{schedule_id}` | 409 when full |
//! | `GET`    | `/schedules/audit` | Counters that disagree with the roster |
//! | `GET`    | `/schedules/employee/{employee_id}/week` | One entry per work day |
//! | `GET`    | `/schedules/optimize/team/{team_id}` | Recommended schedule |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use flexcrew_core::{
  ledger::{CapacityLedger, OccupancyDrift},
  optimizer::ScheduleOptimizer,
  schedule::{Schedule, ScheduleDraft, ScheduleUpdate},
  store::DirectoryStore,
};
use uuid::Uuid;

use crate::error::ApiError;

// ─── Create / update / delete ────────────────────────────────────────────────

/// `POST /schedules`
pub async fn create<S: DirectoryStore + 'static>(
  State(store): State<Arc<S>>,
  body: Result<Json<ScheduleDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(draft) = body?;
  let schedule = CapacityLedger::new(store).create(draft).await?;
  Ok((StatusCode::CREATED, Json(schedule)))
}

/// `PUT /schedules/{id}`
pub async fn update<S: DirectoryStore + 'static>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  body: Result<Json<ScheduleUpdate>, JsonRejection>,
) -> Result<Json<Schedule>, ApiError> {
  let Json(update) = body?;
  let schedule = CapacityLedger::new(store).update(id, update).await?;
  Ok(Json(schedule))
}

/// `DELETE /schedules/{id}`
pub async fn delete<S: DirectoryStore + 'static>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  CapacityLedger::new(store).delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Assignment ──────────────────────────────────────────────────────────────

/// `POST /schedules/assign/{employee_id}/{schedule_id}`
pub async fn assign<S: DirectoryStore + 'static>(
  State(store): State<Arc<S>>,
  Path((employee_id, schedule_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Schedule>, ApiError> {
  let schedule = CapacityLedger::new(store).assign(employee_id, schedule_id).await?;
  Ok(Json(schedule))
}

/// `GET /schedules/audit`
pub async fn audit<S: DirectoryStore + 'static>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<OccupancyDrift>>, ApiError> {
  Ok(Json(CapacityLedger::new(store).audit().await?))
}

/// `GET /schedules/employee/{employee_id}/week`
pub async fn week<S: DirectoryStore + 'static>(
  State(store): State<Arc<S>>,
  Path(employee_id): Path<Uuid>,
) -> Result<Json<Vec<Schedule>>, ApiError> {
  Ok(Json(CapacityLedger::new(store).weekly_schedule(employee_id).await?))
}

// ─── Optimizer ───────────────────────────────────────────────────────────────

/// `GET /schedules/optimize/team/{team_id}`
pub async fn optimize_for_team<S: DirectoryStore + 'static>(
  State(store): State<Arc<S>>,
  Path(team_id): Path<Uuid>,
) -> Result<Json<Schedule>, ApiError> {
  let schedule = ScheduleOptimizer::new(store).recommend_for_team(team_id).await?;
  Ok(Json(schedule))
}
