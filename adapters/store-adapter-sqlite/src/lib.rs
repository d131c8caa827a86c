//! SQLite-backed store adapter for the Decision Ledger.
//!
//! Implements `StoreAdapter` on top of an sqlx connection pool. Each entity
//! lives in its own module with an explicit row → record mapping function;
//! hierarchy deletes go through the `cascade` module.

#![forbid(unsafe_code)]

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};

use ledger_types::prelude::*;
use ledger_types::store_adapter::*;

pub mod cascade;
mod decision;
mod option;
mod revision;
mod schema;
mod user;
mod utils;
mod workspace;

use utils::db_err;

#[derive(Debug)]
pub struct StoreAdapterSqlite {
	db: SqlitePool,
}

impl StoreAdapterSqlite {
	/// Open (or create) a database file
	pub async fn new(path: impl AsRef<Path>) -> ClResult<Self> {
		let path = path.as_ref();
		if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(dir).await?;
		}
		let opts = sqlite::SqliteConnectOptions::new().filename(path);
		Self::open(opts).await
	}

	/// Open a database from a connection string such as `sqlite://data/ledger.db`.
	/// A bare path is accepted as well.
	pub async fn connect(url: &str) -> ClResult<Self> {
		if !url.starts_with("sqlite:") {
			return Self::new(url).await;
		}
		let opts = sqlite::SqliteConnectOptions::from_str(url)
			.map_err(|err| Error::ConfigError(format!("Invalid DATABASE_URL: {}", err)))?;
		Self::open(opts).await
	}

	async fn open(opts: sqlite::SqliteConnectOptions) -> ClResult<Self> {
		let opts = opts
			.create_if_missing(true)
			.foreign_keys(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.map_err(db_err)?;

		schema::init_db(&db).await.map_err(db_err)?;
		info!("Store initialized");

		Ok(Self { db })
	}

	#[cfg(test)]
	pub(crate) fn pool(&self) -> &SqlitePool {
		&self.db
	}
}

#[async_trait]
impl StoreAdapter for StoreAdapterSqlite {
	// Health
	//********
	async fn server_time(&self) -> ClResult<Timestamp> {
		let now: i64 =
			sqlx::query_scalar("SELECT unixepoch()").fetch_one(&self.db).await.map_err(db_err)?;
		Ok(Timestamp(now))
	}

	// Users
	//*******
	async fn upsert_user(&self, data: &UpsertUser<'_>) -> ClResult<User> {
		user::upsert(&self.db, data).await
	}

	async fn read_user(&self, user_id: &str) -> ClResult<Option<User>> {
		user::read(&self.db, user_id).await
	}

	// Workspaces
	//************
	async fn list_workspaces(&self) -> ClResult<Vec<Workspace>> {
		workspace::list(&self.db).await
	}

	async fn create_workspace(&self, data: &CreateWorkspace<'_>) -> ClResult<Workspace> {
		workspace::create(&self.db, data).await
	}

	async fn read_workspace(&self, workspace_id: &str) -> ClResult<Option<Workspace>> {
		workspace::read(&self.db, workspace_id).await
	}

	async fn read_workspace_for_user(
		&self,
		workspace_id: &str,
		user_id: &str,
	) -> ClResult<Option<WorkspaceForUser>> {
		workspace::read_for_user(&self.db, workspace_id, user_id).await
	}

	async fn delete_workspace(&self, workspace_id: &str) -> ClResult<bool> {
		cascade::run(&self.db, cascade::WORKSPACE_CASCADE, workspace_id).await
	}

	// Members
	//*********
	async fn read_member(
		&self,
		workspace_id: &str,
		user_id: &str,
	) -> ClResult<Option<WorkspaceMember>> {
		workspace::read_member(&self.db, workspace_id, user_id).await
	}

	async fn list_members(&self, workspace_id: &str) -> ClResult<Vec<WorkspaceMember>> {
		workspace::list_members(&self.db, workspace_id).await
	}

	async fn add_member(
		&self,
		workspace_id: &str,
		user_id: &str,
		role: &str,
	) -> ClResult<WorkspaceMember> {
		workspace::add_member(&self.db, workspace_id, user_id, role).await
	}

	// Decisions
	//***********
	async fn list_decisions(&self, workspace_id: &str) -> ClResult<Vec<Decision>> {
		decision::list(&self.db, workspace_id).await
	}

	async fn create_decision(&self, data: &CreateDecision<'_>) -> ClResult<Decision> {
		decision::create(&self.db, data).await
	}

	async fn read_decision(&self, decision_id: &str) -> ClResult<Option<Decision>> {
		decision::read(&self.db, decision_id).await
	}

	async fn update_decision(
		&self,
		decision_id: &str,
		data: &UpdateDecisionData,
	) -> ClResult<Option<Decision>> {
		decision::update(&self.db, decision_id, data).await
	}

	async fn delete_decision(&self, decision_id: &str) -> ClResult<bool> {
		cascade::run(&self.db, cascade::DECISION_CASCADE, decision_id).await
	}

	// Details
	//*********
	async fn read_details(&self, decision_id: &str) -> ClResult<Option<DecisionDetails>> {
		decision::read_details(&self.db, decision_id).await
	}

	async fn upsert_details(
		&self,
		decision_id: &str,
		data: &DetailsData,
	) -> ClResult<DecisionDetails> {
		decision::upsert_details(&self.db, decision_id, data).await
	}

	// Options
	//*********
	async fn list_options(&self, decision_id: &str) -> ClResult<Vec<DecisionOption>> {
		option::list(&self.db, decision_id).await
	}

	async fn create_option(&self, data: &CreateOption<'_>) -> ClResult<DecisionOption> {
		option::create(&self.db, data).await
	}

	async fn read_option(&self, option_id: &str) -> ClResult<Option<DecisionOption>> {
		option::read(&self.db, option_id).await
	}

	async fn choose_option(&self, option_id: &str) -> ClResult<Option<DecisionOption>> {
		option::choose(&self.db, option_id).await
	}

	async fn delete_option(&self, option_id: &str) -> ClResult<bool> {
		option::delete(&self.db, option_id).await
	}

	// Revisions
	//***********
	async fn list_revisions(&self, decision_id: &str) -> ClResult<Vec<DecisionRevision>> {
		revision::list(&self.db, decision_id).await
	}

	async fn create_revision(&self, data: &CreateRevision<'_>) -> ClResult<DecisionRevision> {
		revision::create(&self.db, data).await
	}
}

// vim: ts=4
