//! Workspace and membership operations

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::utils::*;
use ledger_types::prelude::*;
use ledger_types::store_adapter::{CreateWorkspace, Workspace, WorkspaceForUser, WorkspaceMember};

pub(crate) fn map_workspace(row: &SqliteRow) -> Result<Workspace, sqlx::Error> {
	Ok(Workspace {
		id: row.try_get("id")?,
		name: row.try_get("name")?,
		created_by: row.try_get("created_by")?,
		created_at: Timestamp(row.try_get("created_at")?),
	})
}

pub(crate) fn map_member(row: &SqliteRow) -> Result<WorkspaceMember, sqlx::Error> {
	Ok(WorkspaceMember {
		workspace_id: row.try_get("workspace_id")?,
		user_id: row.try_get("user_id")?,
		role: row.try_get("role")?,
		created_at: Timestamp(row.try_get("created_at")?),
	})
}

pub(crate) async fn list(db: &SqlitePool) -> ClResult<Vec<Workspace>> {
	let res = sqlx::query(
		"SELECT id, name, created_by, created_at FROM workspaces ORDER BY created_at DESC, rowid DESC",
	)
	.fetch_all(db)
	.await
	.map_err(db_err)?;

	collect_res(res.iter().map(map_workspace))
}

/// Create a workspace together with the creator's membership row
pub(crate) async fn create(db: &SqlitePool, data: &CreateWorkspace<'_>) -> ClResult<Workspace> {
	let mut tx = db.begin().await.map_err(db_err)?;

	let res = sqlx::query(
		"INSERT INTO workspaces (id, name, created_by, created_at) VALUES (?, ?, ?, unixepoch())
		RETURNING id, name, created_by, created_at",
	)
	.bind(new_id())
	.bind(data.name)
	.bind(data.created_by)
	.fetch_one(&mut *tx)
	.await;
	let workspace = map_res(res, map_workspace)?;

	sqlx::query(
		"INSERT INTO workspace_members (workspace_id, user_id, role, created_at)
		VALUES (?, ?, ?, unixepoch())",
	)
	.bind(workspace.id.as_ref())
	.bind(data.created_by)
	.bind(data.creator_role)
	.execute(&mut *tx)
	.await
	.map_err(db_err)?;

	tx.commit().await.map_err(db_err)?;

	Ok(workspace)
}

pub(crate) async fn read(db: &SqlitePool, workspace_id: &str) -> ClResult<Option<Workspace>> {
	let res = sqlx::query("SELECT id, name, created_by, created_at FROM workspaces WHERE id = ?")
		.bind(workspace_id)
		.fetch_optional(db)
		.await;

	map_opt(res, map_workspace)
}

/// Read a workspace with the given user's membership in a single query
pub(crate) async fn read_for_user(
	db: &SqlitePool,
	workspace_id: &str,
	user_id: &str,
) -> ClResult<Option<WorkspaceForUser>> {
	let res = sqlx::query(
		"SELECT w.id, w.name, w.created_by, w.created_at,
			m.role AS member_role, m.created_at AS member_created_at
		FROM workspaces w
		LEFT JOIN workspace_members m ON m.workspace_id = w.id AND m.user_id = ?
		WHERE w.id = ?",
	)
	.bind(user_id)
	.bind(workspace_id)
	.fetch_optional(db)
	.await;

	map_opt(res, |row| {
		let workspace = map_workspace(row)?;
		let role: Option<Box<str>> = row.try_get("member_role")?;
		let member = match role {
			Some(role) => Some(WorkspaceMember {
				workspace_id: workspace.id.clone(),
				user_id: user_id.into(),
				role,
				created_at: Timestamp(row.try_get("member_created_at")?),
			}),
			None => None,
		};
		Ok(WorkspaceForUser { workspace, member })
	})
}

pub(crate) async fn read_member(
	db: &SqlitePool,
	workspace_id: &str,
	user_id: &str,
) -> ClResult<Option<WorkspaceMember>> {
	let res = sqlx::query(
		"SELECT workspace_id, user_id, role, created_at FROM workspace_members
		WHERE workspace_id = ? AND user_id = ?",
	)
	.bind(workspace_id)
	.bind(user_id)
	.fetch_optional(db)
	.await;

	map_opt(res, map_member)
}

pub(crate) async fn list_members(
	db: &SqlitePool,
	workspace_id: &str,
) -> ClResult<Vec<WorkspaceMember>> {
	let res = sqlx::query(
		"SELECT workspace_id, user_id, role, created_at FROM workspace_members
		WHERE workspace_id = ? ORDER BY created_at, rowid",
	)
	.bind(workspace_id)
	.fetch_all(db)
	.await
	.map_err(db_err)?;

	collect_res(res.iter().map(map_member))
}

/// Add a member; an existing membership keeps its role
pub(crate) async fn add_member(
	db: &SqlitePool,
	workspace_id: &str,
	user_id: &str,
	role: &str,
) -> ClResult<WorkspaceMember> {
	let mut tx = db.begin().await.map_err(db_err)?;

	// Members may be added before their first authenticated write
	sqlx::query("INSERT OR IGNORE INTO users (id, created_at) VALUES (?, unixepoch())")
		.bind(user_id)
		.execute(&mut *tx)
		.await
		.map_err(db_err)?;

	sqlx::query(
		"INSERT OR IGNORE INTO workspace_members (workspace_id, user_id, role, created_at)
		VALUES (?, ?, ?, unixepoch())",
	)
	.bind(workspace_id)
	.bind(user_id)
	.bind(role)
	.execute(&mut *tx)
	.await
	.map_err(db_err)?;

	let res = sqlx::query(
		"SELECT workspace_id, user_id, role, created_at FROM workspace_members
		WHERE workspace_id = ? AND user_id = ?",
	)
	.bind(workspace_id)
	.bind(user_id)
	.fetch_one(&mut *tx)
	.await;
	let member = map_res(res, map_member)?;

	tx.commit().await.map_err(db_err)?;

	Ok(member)
}


// vim: ts=4
