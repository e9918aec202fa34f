//! JSON REST API for the Tenure ledgers.
//!
//! Exposes an axum [`Router`] backed by any type implementing the core
//! ledger and registry traits. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tenure_api::api_router(ledger.clone()))
//! ```

pub mod assignments;
pub mod error;
pub mod registry;
pub mod supervisions;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tenure_core::{
  directory::{HolderDirectory, ResourceCatalog},
  ledger::{ReservationLedger, SupervisionLedger},
};

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `ledger`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<L>(ledger: Arc<L>) -> Router<()>
where
  L: ReservationLedger
    + SupervisionLedger
    + HolderDirectory
    + ResourceCatalog
    + 'static,
{
  Router::new()
    // Reservation ledger
    .route(
      "/assignments",
      post(assignments::reserve::<L>).delete(assignments::delete::<L>),
    )
    .route("/assignments/close", post(assignments::close::<L>))
    .route("/assignments/reopen", post(assignments::reopen::<L>))
    .route("/assignments/open", get(assignments::list_open::<L>))
    .route("/assignments/history", get(assignments::history::<L>))
    // Supervision ledger
    .route(
      "/supervisions",
      post(supervisions::create::<L>).delete(supervisions::delete::<L>),
    )
    .route("/supervisions/close", post(supervisions::close::<L>))
    .route("/supervisions/reopen", post(supervisions::reopen::<L>))
    .route("/supervisions/theme", post(supervisions::update_theme::<L>))
    .route("/supervisions/open", get(supervisions::list_open::<L>))
    .route("/supervisions/history", get(supervisions::history::<L>))
    // Registries
    .route(
      "/researchers",
      get(registry::list_researchers::<L>).post(registry::create_researcher::<L>),
    )
    .route(
      "/students",
      get(registry::list_students::<L>).post(registry::create_student::<L>),
    )
    .route(
      "/resources",
      get(registry::list_resources::<L>).post(registry::create_resource::<L>),
    )
    .with_state(ledger)
}

// ─── Integration tests ───────────────────────────────────────────────────────
