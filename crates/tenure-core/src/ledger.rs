//! The ledger traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g.
//! `tenure-store-sqlite`). Higher layers (`tenure-api`) depend on these
//! abstractions, not on any concrete backend.
//!
//! Both ledgers follow the same contract: every mutating operation runs its
//! exclusivity checks, temporal validation, and the write inside one atomic
//! unit of work. No intermediate state is ever visible to other callers, and
//! a failure aborts the whole operation.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  Result,
  assignment::Assignment,
  holder::{Holder, HolderKind},
  supervision::{Supervision, Theme},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`ReservationLedger::assignment_history`].
#[derive(Debug, Clone, Default)]
pub struct AssignmentQuery {
  /// Restrict to one resource.
  pub resource:    Option<String>,
  /// Restrict to one holder kind.
  pub holder_kind: Option<HolderKind>,
  /// Restrict to one holder code (usually combined with `holder_kind`).
  pub holder_code: Option<String>,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
}

/// Parameters for [`SupervisionLedger::supervision_history`].
#[derive(Debug, Clone, Default)]
pub struct SupervisionQuery {
  pub researcher: Option<String>,
  pub student:    Option<String>,
  pub limit:      Option<usize>,
  pub offset:     Option<usize>,
}

// ─── Reservation ledger ──────────────────────────────────────────────────────

/// The equipment-assignment ledger.
///
/// Exclusivity rules, which must hold at all times including under
/// concurrent writers:
///
/// - per resource, at most one open assignment, across both holder kinds;
/// - a `(holder, resource)` pair appears at most once in the full history,
///   open or closed.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ReservationLedger: Send + Sync {
  /// Open a new assignment of `resource` to `holder`.
  ///
  /// Fails with `ResourceBusy` if any assignment for the resource is
  /// currently open under either holder kind, and with
  /// `DuplicateAssignment` if this pair has ever been recorded. The holder
  /// and resource must exist in their registries.
  fn reserve<'a>(
    &'a self,
    resource: &'a str,
    holder: Holder,
    assigned_on: NaiveDate,
  ) -> impl Future<Output = Result<Assignment>> + Send + 'a;

  /// Close the assignment by setting its return date.
  ///
  /// Fails with `AssignmentNotFound` if no record matches, and with
  /// `InvalidInterval` if `returned_on` precedes the assignment date.
  fn close<'a>(
    &'a self,
    resource: &'a str,
    holder: &'a Holder,
    returned_on: NaiveDate,
  ) -> impl Future<Output = Result<Assignment>> + Send + 'a;

  /// Clear the return date, making the assignment current again.
  ///
  /// Re-validated at this moment: fails with `ResourceBusy` if another
  /// holder has an open assignment for the same resource.
  fn reopen<'a>(
    &'a self,
    resource: &'a str,
    holder: &'a Holder,
  ) -> impl Future<Output = Result<Assignment>> + Send + 'a;

  /// Remove the record unconditionally — the administrative escape hatch.
  /// No invariant check; fails only if the record does not exist.
  fn delete<'a>(
    &'a self,
    resource: &'a str,
    holder: &'a Holder,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// All open assignments for a resource. The exclusivity invariant bounds
  /// the result at one element; returning a `Vec` lets callers observe the
  /// invariant instead of assuming it.
  fn list_open_for<'a>(
    &'a self,
    resource: &'a str,
  ) -> impl Future<Output = Result<Vec<Assignment>>> + Send + 'a;

  /// Assignment history, open and closed, filtered by `query`.
  fn assignment_history<'a>(
    &'a self,
    query: &'a AssignmentQuery,
  ) -> impl Future<Output = Result<Vec<Assignment>>> + Send + 'a;
}

// ─── Supervision ledger ──────────────────────────────────────────────────────

/// The researcher ↔ doctoral-student pairing ledger.
///
/// Same shape as [`ReservationLedger`], specialized to a single holder-pair
/// type: at most one open supervision per researcher and per student, and a
/// pair is recorded at most once in the full history.
pub trait SupervisionLedger: Send + Sync {
  /// Open a new supervision pairing.
  ///
  /// Fails with `SupervisionAlreadyRecorded` if this exact pair exists in
  /// any state, `ResearcherAlreadySupervising` if the researcher has an
  /// open pairing with a different student, and `StudentAlreadySupervised`
  /// if the student has an open pairing with a different researcher.
  fn create_supervision<'a>(
    &'a self,
    researcher: &'a str,
    student: &'a str,
    started_on: NaiveDate,
    theme: Theme,
  ) -> impl Future<Output = Result<Supervision>> + Send + 'a;

  /// Close the pairing by setting its end date.
  fn close_supervision<'a>(
    &'a self,
    researcher: &'a str,
    student: &'a str,
    ended_on: NaiveDate,
  ) -> impl Future<Output = Result<Supervision>> + Send + 'a;

  /// Clear the end date, re-validating both open-slot rules at this moment.
  fn reopen_supervision<'a>(
    &'a self,
    researcher: &'a str,
    student: &'a str,
  ) -> impl Future<Output = Result<Supervision>> + Send + 'a;

  /// Replace the theme text. Administrative; no exclusivity implications.
  fn update_theme<'a>(
    &'a self,
    researcher: &'a str,
    student: &'a str,
    theme: Theme,
  ) -> impl Future<Output = Result<Supervision>> + Send + 'a;

  /// Remove the record unconditionally, as in
  /// [`ReservationLedger::delete`].
  fn delete_supervision<'a>(
    &'a self,
    researcher: &'a str,
    student: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Open supervisions where `researcher` is the supervisor (at most one,
  /// observable as with [`ReservationLedger::list_open_for`]).
  fn open_for_researcher<'a>(
    &'a self,
    researcher: &'a str,
  ) -> impl Future<Output = Result<Vec<Supervision>>> + Send + 'a;

  /// Open supervisions where `student` is the supervisee.
  fn open_for_student<'a>(
    &'a self,
    student: &'a str,
  ) -> impl Future<Output = Result<Vec<Supervision>>> + Send + 'a;

  /// Supervision history, open and closed, filtered by `query`.
  fn supervision_history<'a>(
    &'a self,
    query: &'a SupervisionQuery,
  ) -> impl Future<Output = Result<Vec<Supervision>>> + Send + 'a;
}
