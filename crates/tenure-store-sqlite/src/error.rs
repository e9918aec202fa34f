//! Conversion between storage failures and the shared domain error.
//!
//! Business-rule rejections detected inside a `Connection::call` closure are
//! tunnelled out through [`tokio_rusqlite::Error::Other`] and downcast back
//! after the await, so a single closure can run checks and the write in one
//! transaction while the trait surface keeps returning
//! [`tenure_core::Error`].

use tenure_core::Error as DomainError;

/// Wrap a domain error for transport out of a `call` closure.
pub(crate) fn domain(err: DomainError) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(err))
}

/// Recover the domain error from a completed `call`, folding anything that
/// is not a tunnelled rejection into `Internal`.
pub(crate) fn from_db(err: tokio_rusqlite::Error) -> DomainError {
  match err {
    tokio_rusqlite::Error::Other(inner) => match inner.downcast::<DomainError>() {
      Ok(domain) => *domain,
      Err(other) => DomainError::Internal(other.to_string()),
    },
    tokio_rusqlite::Error::Rusqlite(e) => DomainError::Internal(e.to_string()),
    other => DomainError::Internal(other.to_string()),
  }
}

/// Map a write failure on a ledger statement.
///
/// A UNIQUE violation here means an exclusivity guard fired after the
/// in-transaction pre-check had already passed — another writer got there
/// first — so it surfaces as the retryable `ConcurrentConflict` rather than
/// a raw database error.
pub(crate) fn map_constraint(err: rusqlite::Error) -> tokio_rusqlite::Error {
  if let rusqlite::Error::SqliteFailure(e, Some(ref msg)) = err
    && e.code == rusqlite::ErrorCode::ConstraintViolation
    && msg.contains("UNIQUE constraint failed")
  {
    return domain(DomainError::ConcurrentConflict);
  }
  tokio_rusqlite::Error::Rusqlite(err)
}
