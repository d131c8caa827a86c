//! Append-only decision revisions

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::utils::*;
use ledger_types::prelude::*;
use ledger_types::store_adapter::{CreateRevision, DecisionRevision};

pub(crate) fn map_revision(row: &SqliteRow) -> Result<DecisionRevision, sqlx::Error> {
	Ok(DecisionRevision {
		id: row.try_get("id")?,
		decision_id: row.try_get("decision_id")?,
		author_id: row.try_get("author_id")?,
		summary: row.try_get("summary")?,
		created_at: Timestamp(row.try_get("created_at")?),
	})
}

/// Newest first; rows created within the same second keep insertion order
pub(crate) async fn list(db: &SqlitePool, decision_id: &str) -> ClResult<Vec<DecisionRevision>> {
	let res = sqlx::query(
		"SELECT id, decision_id, author_id, summary, created_at FROM decision_revisions
		WHERE decision_id = ? ORDER BY created_at DESC, rowid DESC",
	)
	.bind(decision_id)
	.fetch_all(db)
	.await
	.map_err(db_err)?;

	collect_res(res.iter().map(map_revision))
}

pub(crate) async fn create(
	db: &SqlitePool,
	data: &CreateRevision<'_>,
) -> ClResult<DecisionRevision> {
	let res = sqlx::query(
		"INSERT INTO decision_revisions (id, decision_id, author_id, summary, created_at)
		VALUES (?, ?, ?, ?, unixepoch())
		RETURNING id, decision_id, author_id, summary, created_at",
	)
	.bind(new_id())
	.bind(data.decision_id)
	.bind(data.author_id)
	.bind(data.summary)
	.fetch_one(db)
	.await;

	map_res(res, map_revision)
}

// vim: ts=4
