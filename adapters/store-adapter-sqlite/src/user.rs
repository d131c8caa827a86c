//! User records, created lazily by the idempotent upsert

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::utils::*;
use ledger_types::prelude::*;
use ledger_types::store_adapter::{UpsertUser, User};

pub(crate) fn map_user(row: &SqliteRow) -> Result<User, sqlx::Error> {
	Ok(User {
		id: row.try_get("id")?,
		email: row.try_get("email")?,
		name: row.try_get("name")?,
		created_at: Timestamp(row.try_get("created_at")?),
	})
}

/// Insert or update a user; known email/name are never replaced by NULL
pub(crate) async fn upsert(db: &SqlitePool, user: &UpsertUser<'_>) -> ClResult<User> {
	let res = sqlx::query(
		"INSERT INTO users (id, email, name, created_at) VALUES (?, ?, ?, unixepoch())
		ON CONFLICT(id) DO UPDATE SET
			email = COALESCE(excluded.email, users.email),
			name = COALESCE(excluded.name, users.name)
		RETURNING id, email, name, created_at",
	)
	.bind(user.id)
	.bind(user.email)
	.bind(user.name)
	.fetch_one(db)
	.await;

	map_res(res, map_user)
}

pub(crate) async fn read(db: &SqlitePool, user_id: &str) -> ClResult<Option<User>> {
	let res = sqlx::query("SELECT id, email, name, created_at FROM users WHERE id = ?")
		.bind(user_id)
		.fetch_optional(db)
		.await;

	map_opt(res, map_user)
}

// vim: ts=4
