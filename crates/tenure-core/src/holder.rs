//! Holder — the polymorphic reference to whoever holds a resource.
//!
//! A holder is one of two disjoint kinds, researcher or doctoral student.
//! Both are identified by an opaque directory code; the directory owns all
//! other attributes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of entity a holder reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolderKind {
  Researcher,
  DoctoralStudent,
}

impl HolderKind {
  /// The discriminant string stored in the `holder_kind` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Researcher => "researcher",
      Self::DoctoralStudent => "doctoral_student",
    }
  }
}

/// A reference to a researcher or doctoral student by directory code.
///
/// Exclusivity rules treat both kinds as one domain: a resource held by a
/// researcher is just as unavailable to a student, and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum Holder {
  Researcher(String),
  DoctoralStudent(String),
}

impl Holder {
  pub fn kind(&self) -> HolderKind {
    match self {
      Self::Researcher(_) => HolderKind::Researcher,
      Self::DoctoralStudent(_) => HolderKind::DoctoralStudent,
    }
  }

  pub fn code(&self) -> &str {
    match self {
      Self::Researcher(code) | Self::DoctoralStudent(code) => code,
    }
  }

  /// Rebuild a holder from the discriminant and code stored in the database.
  pub fn from_parts(kind: HolderKind, code: impl Into<String>) -> Self {
    match kind {
      HolderKind::Researcher => Self::Researcher(code.into()),
      HolderKind::DoctoralStudent => Self::DoctoralStudent(code.into()),
    }
  }
}

impl fmt::Display for Holder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Researcher(code) => write!(f, "researcher {code}"),
      Self::DoctoralStudent(code) => write!(f, "doctoral student {code}"),
    }
  }
}
