//! Shared records, adapter traits, and core utilities for the Decision Ledger.
//!
//! This crate contains the foundational types that are shared between the
//! API crate and the storage adapter implementations.

#![forbid(unsafe_code)]

pub mod error;
pub mod prelude;
pub mod store_adapter;
pub mod types;

// vim: ts=4
