//! JSON REST API for FlexCrew.
//!
//! Exposes an axum [`Router`] backed by any
//! [`flexcrew_core::store::DirectoryStore`], plus the [`ServerConfig`] the
//! `flexcrew` binary deserialises at startup.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", flexcrew_api::api_router(store.clone()))
//! ```

pub mod analytics;
pub mod error;
pub mod projects;
pub mod schedules;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use flexcrew_core::store::DirectoryStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `FLEXCREW_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("flexcrew.db"),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: DirectoryStore + 'static,
{
  Router::new()
    // Schedules
    .route("/schedules", post(schedules::create::<S>))
    .route(
      "/schedules/{id}",
      put(schedules::update::<S>).delete(schedules::delete::<S>),
    )
    .route(
      "/schedules/assign/{employee_id}/{schedule_id}",
      post(schedules::assign::<S>),
    )
    .route("/schedules/audit", get(schedules::audit::<S>))
    .route("/schedules/employee/{employee_id}/week", get(schedules::week::<S>))
    .route(
      "/schedules/optimize/team/{team_id}",
      get(schedules::optimize_for_team::<S>),
    )
    // Projects
    .route(
      "/projects/{id}/assignment-suggestions",
      get(projects::assignment_suggestions::<S>),
    )
    // Analytics
    .route("/analytics/punctuality", get(analytics::punctuality::<S>))
    .route("/analytics/schedule-load", get(analytics::schedule_load::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}
