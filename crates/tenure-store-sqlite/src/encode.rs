//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO
//! `%Y-%m-%d`, UUIDs as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use tenure_core::{
  Error, Result,
  assignment::Assignment,
  directory::{HolderRecord, ResourceRecord},
  holder::{Holder, HolderKind},
  supervision::{Supervision, Theme},
};
use uuid::Uuid;

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.hyphenated().to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Uuid::parse_str(s).map_err(|e| Error::Internal(format!("bad uuid {s:?}: {e}")))
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Internal(format!("bad timestamp {s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String {
  date.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Internal(format!("bad date {s:?}: {e}")))
}

// ─── HolderKind ──────────────────────────────────────────────────────────────

pub fn decode_holder_kind(s: &str) -> Result<HolderKind> {
  match s {
    "researcher" => Ok(HolderKind::Researcher),
    "doctoral_student" => Ok(HolderKind::DoctoralStudent),
    other => Err(Error::Internal(format!("unknown holder kind: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `assignments` row.
pub struct RawAssignment {
  pub assignment_id: String,
  pub resource_code: String,
  pub holder_kind:   String,
  pub holder_code:   String,
  pub assigned_on:   String,
  pub returned_on:   Option<String>,
  pub recorded_at:   String,
}

impl RawAssignment {
  pub fn into_assignment(self) -> Result<Assignment> {
    let kind = decode_holder_kind(&self.holder_kind)?;
    Ok(Assignment {
      assignment_id: decode_uuid(&self.assignment_id)?,
      resource_code: self.resource_code,
      holder:        Holder::from_parts(kind, self.holder_code),
      assigned_on:   decode_date(&self.assigned_on)?,
      returned_on:   self.returned_on.as_deref().map(decode_date).transpose()?,
      recorded_at:   decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw strings read directly from a `supervisions` row.
pub struct RawSupervision {
  pub supervision_id:  String,
  pub researcher_code: String,
  pub student_code:    String,
  pub started_on:      String,
  pub ended_on:        Option<String>,
  pub theme:           String,
  pub recorded_at:     String,
}

impl RawSupervision {
  pub fn into_supervision(self) -> Result<Supervision> {
    Ok(Supervision {
      supervision_id:  decode_uuid(&self.supervision_id)?,
      researcher_code: self.researcher_code,
      student_code:    self.student_code,
      started_on:      decode_date(&self.started_on)?,
      ended_on:        self.ended_on.as_deref().map(decode_date).transpose()?,
      theme:           Theme::new(self.theme)?,
      recorded_at:     decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw strings read from a `researchers` or `doctoral_students` row.
pub struct RawHolderRecord {
  pub code:         String,
  pub display_name: String,
  pub created_at:   String,
}

impl RawHolderRecord {
  pub fn into_record(self, kind: HolderKind) -> Result<HolderRecord> {
    Ok(HolderRecord {
      holder:       Holder::from_parts(kind, self.code),
      display_name: self.display_name,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read from a `resources` row.
pub struct RawResource {
  pub code:       String,
  pub label:      String,
  pub created_at: String,
}

impl RawResource {
  pub fn into_record(self) -> Result<ResourceRecord> {
    Ok(ResourceRecord {
      code:       self.code,
      label:      self.label,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
