//! App builder - constructs and runs the Decision Ledger application

use std::sync::Arc;

use crate::prelude::*;
use crate::routes;
use ledger_core::app::{AppOpts, AppState, VERSION};
use ledger_core::token::TokenVerifier;
use ledger_types::store_adapter::StoreAdapter;

pub struct AppBuilder {
	opts: AppOpts,
	store: Option<Arc<dyn StoreAdapter>>,
	verifier: Option<TokenVerifier>,
	auth_provider_url: Option<Box<str>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		// A subscriber may already be installed (tests build several apps)
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder { opts: AppOpts::default(), store: None, verifier: None, auth_provider_url: None }
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}

	pub fn cors_origins(&mut self, origins: &[&str]) -> &mut Self {
		self.opts.cors_origins = origins.iter().map(|o| Box::from(*o)).collect();
		self
	}

	/// Identity provider base URL; the key set is fetched from below it
	pub fn auth_provider_url(&mut self, url: impl Into<Box<str>>) -> &mut Self {
		self.auth_provider_url = Some(url.into());
		self
	}

	/// Overrides the HTTP key source, e.g. with a pinned key set
	pub fn verifier(&mut self, verifier: TokenVerifier) -> &mut Self {
		self.verifier = Some(verifier);
		self
	}

	// Adapters
	pub fn store(&mut self, store: Arc<dyn StoreAdapter>) -> &mut Self {
		self.store = Some(store);
		self
	}

	pub fn build(self) -> App {
		if self.store.is_none() {
			warn!("No store configured: data endpoints will fail until DATABASE_URL is set");
		}
		let verifier = self
			.verifier
			.unwrap_or_else(|| TokenVerifier::from_provider_url(self.auth_provider_url.as_deref()));
		AppState::new(self.opts, verifier, self.store)
	}

	pub async fn run(self) -> ClResult<()> {
		info!("Decision Ledger V{}", VERSION);

		let app = self.build();
		let router = routes::init(app.clone());

		let listener = tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await.map_err(|err| {
			error!("FATAL: Cannot listen on {}: {}", app.opts.listen, err);
			err
		})?;
		info!("Listening on http://{}", app.opts.listen);

		axum::serve(listener, router).await?;
		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4
