//! Database schema initialization
//!
//! Foreign keys are declared without `ON DELETE CASCADE`: removing a parent
//! row is the job of the cascade module, which deletes dependents first.

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Users
	//*******
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS users (
		id text NOT NULL,
		email text,
		name text,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Workspaces
	//************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS workspaces (
		id text NOT NULL,
		name text NOT NULL,
		created_by text NOT NULL REFERENCES users(id),
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS workspace_members (
		workspace_id text NOT NULL REFERENCES workspaces(id),
		user_id text NOT NULL REFERENCES users(id),
		role text NOT NULL DEFAULT 'member',
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(workspace_id, user_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_workspace_members_user ON workspace_members(user_id)")
		.execute(&mut *tx)
		.await?;

	// Decisions
	//***********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS decisions (
		id text NOT NULL,
		workspace_id text NOT NULL REFERENCES workspaces(id),
		title text NOT NULL,
		status text NOT NULL DEFAULT 'proposed',
		owner_id text NOT NULL REFERENCES users(id),
		created_at datetime DEFAULT (unixepoch()),
		updated_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_decisions_workspace ON decisions(workspace_id)")
		.execute(&mut *tx)
		.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS decision_details (
		decision_id text NOT NULL REFERENCES decisions(id),
		context text,
		final_decision text,
		rationale text,
		updated_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(decision_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS decision_options (
		id text NOT NULL,
		decision_id text NOT NULL REFERENCES decisions(id),
		option_name text NOT NULL,
		pros text,
		cons text,
		is_chosen boolean NOT NULL DEFAULT 0,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_decision_options_decision ON decision_options(decision_id)",
	)
	.execute(&mut *tx)
	.await?;

	// Revisions (append-only)
	//*************************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS decision_revisions (
		id text NOT NULL,
		decision_id text NOT NULL REFERENCES decisions(id),
		author_id text NOT NULL REFERENCES users(id),
		summary text NOT NULL,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_decision_revisions_decision ON decision_revisions(decision_id)",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
