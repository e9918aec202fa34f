//! Handlers for `/supervisions` endpoints.
//!
//! Themes arrive as plain strings and are validated here, so a bad theme is
//! reported through the same error body as every other rule violation.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tenure_core::{
  ledger::{SupervisionLedger, SupervisionQuery},
  supervision::{Supervision, Theme},
};

use crate::error::ApiError;

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub researcher: String,
  pub student:    String,
  pub started_on: NaiveDate,
  pub theme:      String,
}

/// `POST /supervisions`
pub async fn create<L>(
  State(ledger): State<Arc<L>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  L: SupervisionLedger,
{
  let theme = Theme::new(body.theme)?;
  let supervision = ledger
    .create_supervision(&body.researcher, &body.student, body.started_on, theme)
    .await?;
  Ok((StatusCode::CREATED, Json(supervision)))
}

// ─── Close ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CloseBody {
  pub researcher: String,
  pub student:    String,
  pub ended_on:   NaiveDate,
}

/// `POST /supervisions/close`
pub async fn close<L>(
  State(ledger): State<Arc<L>>,
  Json(body): Json<CloseBody>,
) -> Result<Json<Supervision>, ApiError>
where
  L: SupervisionLedger,
{
  let supervision = ledger
    .close_supervision(&body.researcher, &body.student, body.ended_on)
    .await?;
  Ok(Json(supervision))
}

// ─── Reopen ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PairBody {
  pub researcher: String,
  pub student:    String,
}

/// `POST /supervisions/reopen`
pub async fn reopen<L>(
  State(ledger): State<Arc<L>>,
  Json(body): Json<PairBody>,
) -> Result<Json<Supervision>, ApiError>
where
  L: SupervisionLedger,
{
  let supervision = ledger
    .reopen_supervision(&body.researcher, &body.student)
    .await?;
  Ok(Json(supervision))
}

// ─── Theme ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ThemeBody {
  pub researcher: String,
  pub student:    String,
  pub theme:      String,
}

/// `POST /supervisions/theme`
pub async fn update_theme<L>(
  State(ledger): State<Arc<L>>,
  Json(body): Json<ThemeBody>,
) -> Result<Json<Supervision>, ApiError>
where
  L: SupervisionLedger,
{
  let theme = Theme::new(body.theme)?;
  let supervision = ledger
    .update_theme(&body.researcher, &body.student, theme)
    .await?;
  Ok(Json(supervision))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /supervisions`
pub async fn delete<L>(
  State(ledger): State<Arc<L>>,
  Json(body): Json<PairBody>,
) -> Result<impl IntoResponse, ApiError>
where
  L: SupervisionLedger,
{
  ledger
    .delete_supervision(&body.researcher, &body.student)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OpenParams {
  pub researcher: Option<String>,
  pub student:    Option<String>,
}

/// `GET /supervisions/open?researcher=<code>` or `?student=<code>`
pub async fn list_open<L>(
  State(ledger): State<Arc<L>>,
  Query(params): Query<OpenParams>,
) -> Result<Json<Vec<Supervision>>, ApiError>
where
  L: SupervisionLedger,
{
  let open = match (params.researcher, params.student) {
    (Some(researcher), None) => ledger.open_for_researcher(&researcher).await?,
    (None, Some(student)) => ledger.open_for_student(&student).await?,
    _ => {
      return Err(ApiError::BadRequest(
        "exactly one of ?researcher= or ?student= is required".into(),
      ));
    }
  };
  Ok(Json(open))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  pub researcher: Option<String>,
  pub student:    Option<String>,
  pub limit:      Option<usize>,
  pub offset:     Option<usize>,
}

/// `GET /supervisions/history[?researcher=&student=&limit=&offset=]`
pub async fn history<L>(
  State(ledger): State<Arc<L>>,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<Supervision>>, ApiError>
where
  L: SupervisionLedger,
{
  let query = SupervisionQuery {
    researcher: params.researcher,
    student:    params.student,
    limit:      params.limit,
    offset:     params.offset,
  };
  let rows = ledger.supervision_history(&query).await?;
  Ok(Json(rows))
}
