//! Core infrastructure for the Decision Ledger service.
//!
//! Identity (bearer token verification against the provider's key set),
//! authorization (workspace membership and roles), the shared app state and
//! the axum glue that connects them to request handlers.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod access;
pub mod app;
pub mod extract;
pub mod middleware;
pub mod prelude;
pub mod roles;
pub mod token;

// Re-export commonly used types
pub use app::{App, AppOpts, AppState};
pub use extract::{Auth, AuthCtx, JsonBody};
pub use token::{JwksCache, TokenVerifier, VerifiedToken};

// vim: ts=4
