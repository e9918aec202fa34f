//! Directory and catalog collaborator contracts.
//!
//! The ledgers validate referential integrity against these before any
//! write; they never render directory data. Registration exists so the
//! registries can be populated at all — inventory metadata beyond a display
//! label is out of scope.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, holder::Holder};

/// Display attributes for a registered researcher or doctoral student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolderRecord {
  pub holder:       Holder,
  pub display_name: String,
  pub created_at:   DateTime<Utc>,
}

/// Display attributes for a registered inventory item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecord {
  pub code:       String,
  pub label:      String,
  pub created_at: DateTime<Utc>,
}

/// The researcher / doctoral-student directory.
pub trait HolderDirectory: Send + Sync {
  /// Look up a holder's display record. `None` if not registered.
  fn lookup_holder<'a>(
    &'a self,
    holder: &'a Holder,
  ) -> impl Future<Output = Result<Option<HolderRecord>>> + Send + 'a;

  /// Register (or update the display name of) a researcher.
  fn register_researcher<'a>(
    &'a self,
    code: &'a str,
    display_name: &'a str,
  ) -> impl Future<Output = Result<HolderRecord>> + Send + 'a;

  /// Register (or update the display name of) a doctoral student.
  fn register_student<'a>(
    &'a self,
    code: &'a str,
    display_name: &'a str,
  ) -> impl Future<Output = Result<HolderRecord>> + Send + 'a;

  fn list_researchers(
    &self,
  ) -> impl Future<Output = Result<Vec<HolderRecord>>> + Send + '_;

  fn list_students(
    &self,
  ) -> impl Future<Output = Result<Vec<HolderRecord>>> + Send + '_;
}

/// The equipment inventory catalog.
pub trait ResourceCatalog: Send + Sync {
  /// Look up a resource's display record. `None` if not registered.
  fn lookup_resource<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<ResourceRecord>>> + Send + 'a;

  /// Register (or relabel) an inventory item.
  fn register_resource<'a>(
    &'a self,
    code: &'a str,
    label: &'a str,
  ) -> impl Future<Output = Result<ResourceRecord>> + Send + 'a;

  fn list_resources(
    &self,
  ) -> impl Future<Output = Result<Vec<ResourceRecord>>> + Send + '_;
}
