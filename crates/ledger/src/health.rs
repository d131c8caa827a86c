//! Health check and identity endpoints

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::prelude::*;
use ledger_core::extract::Auth;

/// GET /health
pub async fn get_health() -> Json<Value> {
	Json(json!({ "ok": true }))
}

/// GET /db-test - Round trip to the database
pub async fn get_db_test(State(app): State<App>) -> ClResult<Json<Value>> {
	let server_time = app.store()?.server_time().await?;

	Ok(Json(json!({ "db_ok": true, "server_time": server_time })))
}

/// GET /me - Identity of the verified caller
pub async fn get_me(Auth(auth): Auth) -> Json<Value> {
	Json(json!({ "user_id": auth.user_id }))
}

// vim: ts=4
