//! The temporal validator shared by both ledgers.

use chrono::NaiveDate;

use crate::{Error, Result};

/// Check that a closing date does not precede its opening date.
///
/// An absent end means the record stays open. Equal dates are valid — a
/// same-day return is a legitimate interval.
pub fn validate_interval(start: NaiveDate, end: Option<NaiveDate>) -> Result<()> {
  match end {
    Some(end) if end < start => Err(Error::InvalidInterval { start, end }),
    _ => Ok(()),
  }
}
