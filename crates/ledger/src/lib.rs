//! Decision Ledger HTTP API.
//!
//! Workspaces contain decisions; each decision has details, candidate options
//! (at most one chosen) and an append-only revision history. Every data
//! endpoint authenticates the caller, checks workspace membership, then talks
//! to the storage adapter.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod decision;
pub mod health;
pub mod logging;
pub mod option;
pub mod prelude;
pub mod revision;
pub mod routes;
pub mod user;
pub mod workspace;

pub use app::AppBuilder;
pub use ledger_core::app::{App, AppOpts, AppState, VERSION};

// vim: ts=4
