//! SQLite backend for the Tenure ledgers.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Every mutating ledger
//! operation executes inside one IMMEDIATE transaction; the schema's partial
//! unique indexes are the canonical exclusivity guard, with in-transaction
//! pre-checks supplying precise error kinds.

mod encode;
mod error;
mod schema;
mod store;

pub use store::SqliteLedger;

#[cfg(test)]
mod tests;
