//! Supervision — the researcher ↔ doctoral-student pairing record.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Theme ───────────────────────────────────────────────────────────────────

/// The thesis theme attached to a supervision. Required, at most 250
/// characters after trimming. Constructing one is the only way to get text
/// into a supervision record, so a stored theme is always valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Theme(String);

impl Theme {
  pub const MAX_LEN: usize = 250;

  pub fn new(text: impl Into<String>) -> Result<Self> {
    let text = text.into();
    let trimmed = text.trim();
    if trimmed.is_empty() {
      return Err(Error::EmptyTheme);
    }
    let len = trimmed.chars().count();
    if len > Self::MAX_LEN {
      return Err(Error::ThemeTooLong { len, max: Self::MAX_LEN });
    }
    Ok(Self(trimmed.to_owned()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl TryFrom<String> for Theme {
  type Error = Error;

  fn try_from(text: String) -> Result<Self> {
    Self::new(text)
  }
}

impl From<Theme> for String {
  fn from(theme: Theme) -> Self {
    theme.0
  }
}

impl AsRef<str> for Theme {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Theme {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Supervision ─────────────────────────────────────────────────────────────

/// One row of the supervision ledger.
///
/// Identity is the `(researcher, student)` pair, which appears at most once
/// in the ledger's history. A missing `ended_on` means the supervision is
/// active; an active supervision excludes both parties from any other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supervision {
  pub supervision_id:  Uuid,
  pub researcher_code: String,
  pub student_code:    String,
  pub started_on:      NaiveDate,
  pub ended_on:        Option<NaiveDate>,
  pub theme:           Theme,
  /// Server-assigned timestamp; never changes after creation.
  pub recorded_at:     DateTime<Utc>,
}

impl Supervision {
  pub fn is_open(&self) -> bool {
    self.ended_on.is_none()
  }
}
