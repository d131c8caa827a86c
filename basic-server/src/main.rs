use std::{env, sync::Arc};

use ledger::prelude::*;
use ledger_store_adapter_sqlite::StoreAdapterSqlite;

pub struct Config {
	pub listen: String,
	pub database_url: Option<String>,
	pub auth_provider_url: Option<String>,
}

/// Unset and blank are the same
fn env_var(name: &str) -> Option<String> {
	env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Config {
	pub fn from_env() -> Self {
		Config {
			listen: env_var("LISTEN").unwrap_or_else(|| "127.0.0.1:8000".to_string()),
			database_url: env_var("DATABASE_URL"),
			auth_provider_url: env_var("AUTH_PROVIDER_URL").or_else(|| env_var("SUPABASE_URL")),
		}
	}
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ClResult<()> {
	// .env is optional
	let _ = dotenvy::dotenv();
	let config = Config::from_env();

	let mut builder = ledger::AppBuilder::new();
	builder.listen(config.listen);

	match config.auth_provider_url {
		Some(url) => {
			builder.auth_provider_url(url);
		}
		None => warn!("AUTH_PROVIDER_URL is not set: authenticated endpoints will fail"),
	}

	if let Some(url) = config.database_url {
		let store = StoreAdapterSqlite::connect(&url).await.inspect_err(|err| {
			error!("FATAL: Cannot open database {}: {}", url, err);
		})?;
		builder.store(Arc::new(store));
	}

	builder.run().await
}

// vim: ts=4
