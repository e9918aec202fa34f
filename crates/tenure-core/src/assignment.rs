//! Assignment — a temporal record of one holder holding one resource.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::holder::Holder;

/// One row of the reservation ledger.
///
/// Identity is the `(holder, resource)` pair; a pair appears at most once in
/// the ledger's entire history. A missing `returned_on` means the record is
/// open, i.e. the resource is currently in this holder's hands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
  pub assignment_id: Uuid,
  pub resource_code: String,
  pub holder:        Holder,
  pub assigned_on:   NaiveDate,
  pub returned_on:   Option<NaiveDate>,
  /// Server-assigned timestamp; never changes after creation.
  pub recorded_at:   DateTime<Utc>,
}

impl Assignment {
  pub fn is_open(&self) -> bool {
    self.returned_on.is_none()
  }
}
