//! Handlers for the directory and catalog registries.
//!
//! Registration is an upsert: posting an existing code updates its display
//! attributes. The ledgers only ever read these tables.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use tenure_core::directory::{HolderDirectory, HolderRecord, ResourceCatalog, ResourceRecord};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct HolderBody {
  pub code:         String,
  pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ResourceBody {
  pub code:  String,
  pub label: String,
}

/// `POST /researchers`
pub async fn create_researcher<L>(
  State(ledger): State<Arc<L>>,
  Json(body): Json<HolderBody>,
) -> Result<impl IntoResponse, ApiError>
where
  L: HolderDirectory,
{
  let record = ledger
    .register_researcher(&body.code, &body.display_name)
    .await?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /researchers`
pub async fn list_researchers<L>(
  State(ledger): State<Arc<L>>,
) -> Result<Json<Vec<HolderRecord>>, ApiError>
where
  L: HolderDirectory,
{
  Ok(Json(ledger.list_researchers().await?))
}

/// `POST /students`
pub async fn create_student<L>(
  State(ledger): State<Arc<L>>,
  Json(body): Json<HolderBody>,
) -> Result<impl IntoResponse, ApiError>
where
  L: HolderDirectory,
{
  let record = ledger
    .register_student(&body.code, &body.display_name)
    .await?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /students`
pub async fn list_students<L>(
  State(ledger): State<Arc<L>>,
) -> Result<Json<Vec<HolderRecord>>, ApiError>
where
  L: HolderDirectory,
{
  Ok(Json(ledger.list_students().await?))
}

/// `POST /resources`
pub async fn create_resource<L>(
  State(ledger): State<Arc<L>>,
  Json(body): Json<ResourceBody>,
) -> Result<impl IntoResponse, ApiError>
where
  L: ResourceCatalog,
{
  let record = ledger.register_resource(&body.code, &body.label).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /resources`
pub async fn list_resources<L>(
  State(ledger): State<Arc<L>>,
) -> Result<Json<Vec<ResourceRecord>>, ApiError>
where
  L: ResourceCatalog,
{
  Ok(Json(ledger.list_resources().await?))
}
