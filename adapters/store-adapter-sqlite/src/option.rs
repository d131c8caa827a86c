//! Decision options and the choose (clear-then-set) operation

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::utils::*;
use ledger_types::prelude::*;
use ledger_types::store_adapter::{CreateOption, DecisionOption};

const OPTION_COLUMNS: &str = "id, decision_id, option_name, pros, cons, is_chosen, created_at";

pub(crate) fn map_option(row: &SqliteRow) -> Result<DecisionOption, sqlx::Error> {
	Ok(DecisionOption {
		id: row.try_get("id")?,
		decision_id: row.try_get("decision_id")?,
		option_name: row.try_get("option_name")?,
		pros: row.try_get("pros")?,
		cons: row.try_get("cons")?,
		is_chosen: row.try_get("is_chosen")?,
		created_at: Timestamp(row.try_get("created_at")?),
	})
}

/// List options of a decision, oldest first
pub(crate) async fn list(db: &SqlitePool, decision_id: &str) -> ClResult<Vec<DecisionOption>> {
	let res = sqlx::query(&format!(
		"SELECT {} FROM decision_options WHERE decision_id = ? ORDER BY created_at, rowid",
		OPTION_COLUMNS
	))
	.bind(decision_id)
	.fetch_all(db)
	.await
	.map_err(db_err)?;

	collect_res(res.iter().map(map_option))
}

pub(crate) async fn create(db: &SqlitePool, data: &CreateOption<'_>) -> ClResult<DecisionOption> {
	let res = sqlx::query(&format!(
		"INSERT INTO decision_options (id, decision_id, option_name, pros, cons, is_chosen, created_at)
		VALUES (?, ?, ?, ?, ?, 0, unixepoch())
		RETURNING {}",
		OPTION_COLUMNS
	))
	.bind(new_id())
	.bind(data.decision_id)
	.bind(data.option_name)
	.bind(data.pros)
	.bind(data.cons)
	.fetch_one(db)
	.await;

	map_res(res, map_option)
}

pub(crate) async fn read(db: &SqlitePool, option_id: &str) -> ClResult<Option<DecisionOption>> {
	let res = sqlx::query(&format!("SELECT {} FROM decision_options WHERE id = ?", OPTION_COLUMNS))
		.bind(option_id)
		.fetch_optional(db)
		.await;

	map_opt(res, map_option)
}

/// Mark an option chosen: clear every sibling, then set the target, in one transaction.
///
/// The first statement is a write, so the transaction takes the write lock up
/// front and concurrent calls wait on the busy timeout instead of failing on a
/// stale read snapshot. The last commit wins and at most one option stays chosen.
pub(crate) async fn choose(db: &SqlitePool, option_id: &str) -> ClResult<Option<DecisionOption>> {
	let mut tx = db.begin().await.map_err(db_err)?;

	sqlx::query(
		"UPDATE decision_options SET is_chosen = 0
		WHERE decision_id = (SELECT decision_id FROM decision_options WHERE id = ?)",
	)
	.bind(option_id)
	.execute(&mut *tx)
	.await
	.map_err(db_err)?;

	let res = sqlx::query(&format!(
		"UPDATE decision_options SET is_chosen = 1 WHERE id = ? RETURNING {}",
		OPTION_COLUMNS
	))
	.bind(option_id)
	.fetch_optional(&mut *tx)
	.await;
	let Some(option) = map_opt(res, map_option)? else {
		// Nothing was cleared either; dropping the transaction rolls it back
		return Ok(None);
	};

	tx.commit().await.map_err(db_err)?;

	debug!("Option {} chosen for decision {}", option_id, option.decision_id);
	Ok(Some(option))
}

pub(crate) async fn delete(db: &SqlitePool, option_id: &str) -> ClResult<bool> {
	let res = sqlx::query("DELETE FROM decision_options WHERE id = ?")
		.bind(option_id)
		.execute(db)
		.await
		.map_err(db_err)?;

	Ok(res.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use sqlx::sqlite::SqlitePoolOptions;

	#[tokio::test]
	async fn test_map_option_row() {
		let db = SqlitePoolOptions::new().connect("sqlite::memory:").await.unwrap();
		let row = sqlx::query(
			"SELECT 'o1' AS id, 'd1' AS decision_id, 'Postgres' AS option_name,
				'mature' AS pros, NULL AS cons, 1 AS is_chosen, 5 AS created_at",
		)
		.fetch_one(&db)
		.await
		.unwrap();

		let option = map_option(&row).unwrap();
		assert_eq!(option.option_name.as_ref(), "Postgres");
		assert_eq!(option.pros.as_deref(), Some("mature"));
		assert_eq!(option.cons, None);
		assert!(option.is_chosen);
		assert_eq!(option.created_at, Timestamp(5));
	}
}

// vim: ts=4
