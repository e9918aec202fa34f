//! The shared error type for ledger operations.
//!
//! Every backend returns this one enum so the retry policy can be decided by
//! kind alone: business-rule violations are permanent given the current
//! state, `ConcurrentConflict` is transient, `Internal` is neither.

use chrono::NaiveDate;
use thiserror::Error;

use crate::holder::Holder;

#[derive(Debug, Error)]
pub enum Error {
  #[error("resource {resource} is currently held")]
  ResourceBusy { resource: String },

  #[error("{holder} already has an assignment record for resource {resource}")]
  DuplicateAssignment { resource: String, holder: Holder },

  #[error("no assignment of resource {resource} to {holder}")]
  AssignmentNotFound { resource: String, holder: Holder },

  #[error("no supervision of student {student} by researcher {researcher}")]
  SupervisionNotFound { researcher: String, student: String },

  #[error("invalid interval: end {end} precedes start {start}")]
  InvalidInterval { start: NaiveDate, end: NaiveDate },

  #[error("researcher {researcher} already has an open supervision")]
  ResearcherAlreadySupervising { researcher: String },

  #[error("student {student} is already supervised")]
  StudentAlreadySupervised { student: String },

  #[error("supervision of student {student} by researcher {researcher} is already recorded")]
  SupervisionAlreadyRecorded { researcher: String, student: String },

  #[error("unknown holder: {0}")]
  UnknownHolder(Holder),

  #[error("unknown resource: {0}")]
  UnknownResource(String),

  #[error("supervision theme must not be blank")]
  EmptyTheme,

  #[error("supervision theme is too long: {len} characters, limit is {max}")]
  ThemeTooLong { len: usize, max: usize },

  /// The storage-level exclusivity guard rejected a write that passed an
  /// earlier, now-stale, in-transaction check. Safe to retry once.
  #[error("concurrent write conflict")]
  ConcurrentConflict,

  #[error("internal storage error: {0}")]
  Internal(String),
}

impl Error {
  /// Whether a caller may retry the failed operation as-is.
  ///
  /// Only transient conflicts qualify; retrying a rule violation would
  /// produce the same answer.
  pub fn is_retryable(&self) -> bool {
    matches!(self, Self::ConcurrentConflict)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
