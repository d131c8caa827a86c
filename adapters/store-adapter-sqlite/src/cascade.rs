//! Ordered multi-table deletes for the workspace → decision hierarchy
//!
//! The schema declares foreign keys without `ON DELETE CASCADE`, so every
//! dependent table is emptied before its parent. Each sequence runs inside a
//! single transaction: a failure at any step rolls back all previous steps.

use sqlx::SqlitePool;

use crate::utils::*;
use ledger_types::prelude::*;

/// One delete statement of a cascade; binds the root id once
#[derive(Debug, Clone, Copy)]
pub struct CascadeStep {
	pub table: &'static str,
	pub sql: &'static str,
}

/// Workspace deletion order. The last step removes the root row.
pub const WORKSPACE_CASCADE: &[CascadeStep] = &[
	CascadeStep {
		table: "decision_details",
		sql: "DELETE FROM decision_details
			WHERE decision_id IN (SELECT id FROM decisions WHERE workspace_id = ?)",
	},
	CascadeStep {
		table: "decision_options",
		sql: "DELETE FROM decision_options
			WHERE decision_id IN (SELECT id FROM decisions WHERE workspace_id = ?)",
	},
	CascadeStep {
		table: "decision_revisions",
		sql: "DELETE FROM decision_revisions
			WHERE decision_id IN (SELECT id FROM decisions WHERE workspace_id = ?)",
	},
	CascadeStep { table: "decisions", sql: "DELETE FROM decisions WHERE workspace_id = ?" },
	CascadeStep {
		table: "workspace_members",
		sql: "DELETE FROM workspace_members WHERE workspace_id = ?",
	},
	CascadeStep { table: "workspaces", sql: "DELETE FROM workspaces WHERE id = ?" },
];

/// Decision deletion order. The last step removes the root row.
pub const DECISION_CASCADE: &[CascadeStep] = &[
	CascadeStep {
		table: "decision_details",
		sql: "DELETE FROM decision_details WHERE decision_id = ?",
	},
	CascadeStep {
		table: "decision_options",
		sql: "DELETE FROM decision_options WHERE decision_id = ?",
	},
	CascadeStep {
		table: "decision_revisions",
		sql: "DELETE FROM decision_revisions WHERE decision_id = ?",
	},
	CascadeStep { table: "decisions", sql: "DELETE FROM decisions WHERE id = ?" },
];

/// Run a cascade for `id`. Returns whether the root row existed.
pub(crate) async fn run(db: &SqlitePool, steps: &[CascadeStep], id: &str) -> ClResult<bool> {
	let mut tx = db.begin().await.map_err(db_err)?;

	let mut root_deleted = 0;
	for step in steps {
		let res = sqlx::query(step.sql)
			.bind(id)
			.execute(&mut *tx)
			.await
			.inspect_err(|err| warn!("Cascade step {} failed for {}: {}", step.table, id, err))
			.map_err(db_err)?;
		debug!("Cascade {}: {} rows from {}", id, res.rows_affected(), step.table);
		root_deleted = res.rows_affected();
	}

	tx.commit().await.map_err(db_err)?;

	Ok(root_deleted > 0)
}


// vim: ts=4
