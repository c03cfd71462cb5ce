//! Handlers for `/analytics` endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use flexcrew_core::{
  analytics::{Analytics, PunctualityStats, ScheduleLoad},
  store::DirectoryStore,
};

use crate::error::ApiError;

/// `GET /analytics/punctuality`
pub async fn punctuality<S: DirectoryStore + 'static>(
  State(store): State<Arc<S>>,
) -> Result<Json<PunctualityStats>, ApiError> {
  Ok(Json(Analytics::new(store).punctuality().await?))
}

/// `GET /analytics/schedule-load`
pub async fn schedule_load<S: DirectoryStore + 'static>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<ScheduleLoad>>, ApiError> {
  Ok(Json(Analytics::new(store).schedule_load().await?))
}
