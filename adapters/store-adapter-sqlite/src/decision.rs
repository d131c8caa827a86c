//! Decisions and their singleton details record

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::utils::*;
use ledger_types::prelude::*;
use ledger_types::store_adapter::{
	CreateDecision, DEFAULT_DECISION_STATUS, Decision, DecisionDetails, DetailsData,
	UpdateDecisionData,
};

const DECISION_COLUMNS: &str = "id, workspace_id, title, status, owner_id, created_at, updated_at";

pub(crate) fn map_decision(row: &SqliteRow) -> Result<Decision, sqlx::Error> {
	Ok(Decision {
		id: row.try_get("id")?,
		workspace_id: row.try_get("workspace_id")?,
		title: row.try_get("title")?,
		status: row.try_get("status")?,
		owner_id: row.try_get("owner_id")?,
		created_at: Timestamp(row.try_get("created_at")?),
		updated_at: Timestamp(row.try_get("updated_at")?),
	})
}

pub(crate) fn map_details(row: &SqliteRow) -> Result<DecisionDetails, sqlx::Error> {
	Ok(DecisionDetails {
		decision_id: row.try_get("decision_id")?,
		context: row.try_get("context")?,
		final_decision: row.try_get("final_decision")?,
		rationale: row.try_get("rationale")?,
		updated_at: Timestamp(row.try_get("updated_at")?),
	})
}

/// List decisions of a workspace, newest first
pub(crate) async fn list(db: &SqlitePool, workspace_id: &str) -> ClResult<Vec<Decision>> {
	let res = sqlx::query(&format!(
		"SELECT {} FROM decisions WHERE workspace_id = ? ORDER BY created_at DESC, rowid DESC",
		DECISION_COLUMNS
	))
	.bind(workspace_id)
	.fetch_all(db)
	.await
	.map_err(db_err)?;

	collect_res(res.iter().map(map_decision))
}

pub(crate) async fn create(db: &SqlitePool, data: &CreateDecision<'_>) -> ClResult<Decision> {
	let res = sqlx::query(&format!(
		"INSERT INTO decisions (id, workspace_id, title, status, owner_id, created_at, updated_at)
		VALUES (?, ?, ?, ?, ?, unixepoch(), unixepoch())
		RETURNING {}",
		DECISION_COLUMNS
	))
	.bind(new_id())
	.bind(data.workspace_id)
	.bind(data.title)
	.bind(data.status.unwrap_or(DEFAULT_DECISION_STATUS))
	.bind(data.owner_id)
	.fetch_one(db)
	.await;

	map_res(res, map_decision)
}

pub(crate) async fn read(db: &SqlitePool, decision_id: &str) -> ClResult<Option<Decision>> {
	let res = sqlx::query(&format!("SELECT {} FROM decisions WHERE id = ?", DECISION_COLUMNS))
		.bind(decision_id)
		.fetch_optional(db)
		.await;

	map_opt(res, map_decision)
}

/// Apply a partial update; an empty patch just returns the current row
pub(crate) async fn update(
	db: &SqlitePool,
	decision_id: &str,
	data: &UpdateDecisionData,
) -> ClResult<Option<Decision>> {
	// title and status are NOT NULL columns
	if data.title.is_null() || data.status.is_null() {
		return Err(Error::ValidationError("title and status cannot be null".into()));
	}

	let mut query: sqlx::QueryBuilder<'_, sqlx::Sqlite> =
		sqlx::QueryBuilder::new("UPDATE decisions SET ");
	let mut has_updates = false;

	has_updates = push_patch!(query, has_updates, "title", &data.title);
	has_updates = push_patch!(query, has_updates, "status", &data.status);

	if !has_updates {
		return read(db, decision_id).await;
	}

	query.push(", updated_at=unixepoch() WHERE id=").push_bind(decision_id);
	query.push(" RETURNING ").push(DECISION_COLUMNS);

	let res = query.build().fetch_optional(db).await;

	map_opt(res, map_decision)
}

pub(crate) async fn read_details(
	db: &SqlitePool,
	decision_id: &str,
) -> ClResult<Option<DecisionDetails>> {
	let res = sqlx::query(
		"SELECT decision_id, context, final_decision, rationale, updated_at
		FROM decision_details WHERE decision_id = ?",
	)
	.bind(decision_id)
	.fetch_optional(db)
	.await;

	map_opt(res, map_details)
}

/// Create or wholesale replace the details of a decision
pub(crate) async fn upsert_details(
	db: &SqlitePool,
	decision_id: &str,
	data: &DetailsData,
) -> ClResult<DecisionDetails> {
	let res = sqlx::query(
		"INSERT INTO decision_details (decision_id, context, final_decision, rationale, updated_at)
		VALUES (?, ?, ?, ?, unixepoch())
		ON CONFLICT(decision_id) DO UPDATE SET
			context = excluded.context,
			final_decision = excluded.final_decision,
			rationale = excluded.rationale,
			updated_at = excluded.updated_at
		RETURNING decision_id, context, final_decision, rationale, updated_at",
	)
	.bind(decision_id)
	.bind(data.context.as_deref())
	.bind(data.final_decision.as_deref())
	.bind(data.rationale.as_deref())
	.fetch_one(db)
	.await;

	map_res(res, map_details)
}

// vim: ts=4
