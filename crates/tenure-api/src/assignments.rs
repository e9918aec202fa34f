//! Handlers for `/assignments` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/assignments` | Reserve; body: resource, holder, assigned_on |
//! | `POST`   | `/assignments/close` | Set the return date |
//! | `POST`   | `/assignments/reopen` | Clear the return date |
//! | `DELETE` | `/assignments` | Administrative removal |
//! | `GET`    | `/assignments/open?resource=` | Current holder, if any |
//! | `GET`    | `/assignments/history` | Filterable full history |

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
  assignment::Assignment,
  holder::{Holder, HolderKind},
  ledger::{AssignmentQuery, ReservationLedger},
};

use crate::error::ApiError;

// ─── Reserve ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReserveBody {
  pub resource:    String,
  pub holder:      Holder,
  pub assigned_on: NaiveDate,
}

/// `POST /assignments`
pub async fn reserve<L>(
  State(ledger): State<Arc<L>>,
  Json(body): Json<ReserveBody>,
) -> Result<impl IntoResponse, ApiError>
where
  L: ReservationLedger,
{
  let assignment = ledger
    .reserve(&body.resource, body.holder, body.assigned_on)
    .await?;
  Ok((StatusCode::CREATED, Json(assignment)))
}

// ─── Close ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CloseBody {
  pub resource:    String,
  pub holder:      Holder,
  pub returned_on: NaiveDate,
}

/// `POST /assignments/close`
pub async fn close<L>(
  State(ledger): State<Arc<L>>,
  Json(body): Json<CloseBody>,
) -> Result<Json<Assignment>, ApiError>
where
  L: ReservationLedger,
{
  let assignment = ledger
    .close(&body.resource, &body.holder, body.returned_on)
    .await?;
  Ok(Json(assignment))
}

// ─── Reopen ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReopenBody {
  pub resource: String,
  pub holder:   Holder,
}

/// `POST /assignments/reopen`
pub async fn reopen<L>(
  State(ledger): State<Arc<L>>,
  Json(body): Json<ReopenBody>,
) -> Result<Json<Assignment>, ApiError>
where
  L: ReservationLedger,
{
  let assignment = ledger.reopen(&body.resource, &body.holder).await?;
  Ok(Json(assignment))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeleteBody {
  pub resource: String,
  pub holder:   Holder,
}

/// `DELETE /assignments`
pub async fn delete<L>(
  State(ledger): State<Arc<L>>,
  Json(body): Json<DeleteBody>,
) -> Result<impl IntoResponse, ApiError>
where
  L: ReservationLedger,
{
  ledger.delete(&body.resource, &body.holder).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OpenParams {
  pub resource: String,
}

/// `GET /assignments/open?resource=<code>`
pub async fn list_open<L>(
  State(ledger): State<Arc<L>>,
  Query(params): Query<OpenParams>,
) -> Result<Json<Vec<Assignment>>, ApiError>
where
  L: ReservationLedger,
{
  let open = ledger.list_open_for(&params.resource).await?;
  Ok(Json(open))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  pub resource:    Option<String>,
  pub holder_kind: Option<HolderKind>,
  pub holder_code: Option<String>,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
}

/// `GET /assignments/history[?resource=&holder_kind=&holder_code=&limit=&offset=]`
pub async fn history<L>(
  State(ledger): State<Arc<L>>,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<Assignment>>, ApiError>
where
  L: ReservationLedger,
{
  let query = AssignmentQuery {
    resource:    params.resource,
    holder_kind: params.holder_kind,
    holder_code: params.holder_code,
    limit:       params.limit,
    offset:      params.offset,
  };
  let rows = ledger.assignment_history(&query).await?;
  Ok(Json(rows))
}
