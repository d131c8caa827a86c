//! App state type

use std::sync::Arc;

use crate::prelude::*;
use crate::token::TokenVerifier;

use ledger_types::store_adapter::StoreAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub opts: AppOpts,
	pub verifier: TokenVerifier,
	/// `None` when no database is configured; data endpoints then fail with `ConfigError`
	pub store: Option<Arc<dyn StoreAdapter>>,
}

impl AppState {
	pub fn new(opts: AppOpts, verifier: TokenVerifier, store: Option<Arc<dyn StoreAdapter>>) -> App {
		Arc::new(AppState { opts, verifier, store })
	}

	pub fn store(&self) -> ClResult<&Arc<dyn StoreAdapter>> {
		self.store.as_ref().ok_or_else(|| Error::ConfigError("DATABASE_URL is not set".into()))
	}
}

pub type App = Arc<AppState>;

#[derive(Debug, Clone)]
pub struct AppOpts {
	pub listen: Box<str>,
	pub cors_origins: Box<[Box<str>]>,
}

impl Default for AppOpts {
	fn default() -> Self {
		AppOpts {
			listen: "127.0.0.1:8000".into(),
			cors_origins: [
				"http://localhost:3000",
				"http://127.0.0.1:3000",
				"http://localhost:5173",
				"http://127.0.0.1:5173",
			]
			.into_iter()
			.map(Box::from)
			.collect(),
		}
	}
}

// vim: ts=4
