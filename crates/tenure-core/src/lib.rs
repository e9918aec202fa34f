//! Core types and trait definitions for the Tenure reservation engine.
//!
//! Tenure tracks who currently holds a piece of shared equipment, and which
//! researcher supervises which doctoral student. This crate owns the domain
//! types, the exclusivity rules, and the ledger abstractions; it is
//! deliberately free of HTTP and database dependencies. All other crates
//! depend on it; it depends on nothing proprietary.

pub mod assignment;
pub mod directory;
pub mod error;
pub mod holder;
pub mod interval;
pub mod ledger;
pub mod supervision;

pub use error::{Error, Result};
