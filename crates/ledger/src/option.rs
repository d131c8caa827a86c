//! Decision option HTTP handlers

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::prelude::*;
use crate::user::{ensure_user, required_text};
use ledger_core::{
	access,
	extract::{Auth, JsonBody},
};
use ledger_types::store_adapter::{CreateOption, DecisionOption};

#[derive(Debug, Deserialize)]
pub struct CreateOptionReq {
	pub option_name: String,
	pub pros: Option<String>,
	pub cons: Option<String>,
}

/// GET /decisions/{id}/options - Oldest first
pub async fn list_options(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(decision_id): Path<String>,
) -> ClResult<Json<Vec<DecisionOption>>> {
	let store = app.store()?;
	access::authorize_decision(store.as_ref(), &auth.user_id, &decision_id, None).await?;

	let options = store.list_options(&decision_id).await?;

	Ok(Json(options))
}

/// POST /decisions/{id}/options
pub async fn post_option(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(decision_id): Path<String>,
	body: JsonBody<CreateOptionReq>,
) -> ClResult<(StatusCode, Json<DecisionOption>)> {
	let store = app.store()?;
	access::authorize_decision(store.as_ref(), &auth.user_id, &decision_id, None).await?;

	let req = body.into_inner()?;
	let option_name = required_text("option_name", &req.option_name)?;
	ensure_user(store.as_ref(), &auth).await?;

	let option = store
		.create_option(&CreateOption {
			decision_id: &decision_id,
			option_name,
			pros: req.pros.as_deref(),
			cons: req.cons.as_deref(),
		})
		.await?;

	Ok((StatusCode::CREATED, Json(option)))
}

/// PUT /options/{id}/choose - Mark this option chosen and every sibling not chosen
pub async fn choose_option(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(option_id): Path<String>,
) -> ClResult<Json<DecisionOption>> {
	let store = app.store()?;
	access::authorize_option(store.as_ref(), &auth.user_id, &option_id, None).await?;
	ensure_user(store.as_ref(), &auth).await?;

	let option = store.choose_option(&option_id).await?.ok_or(Error::NotFound)?;

	info!("User {} chose option {} for decision {}", auth.user_id, option.id, option.decision_id);

	Ok(Json(option))
}

/// DELETE /options/{id}
pub async fn delete_option(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(option_id): Path<String>,
) -> ClResult<Json<Value>> {
	let store = app.store()?;
	access::authorize_option(store.as_ref(), &auth.user_id, &option_id, None).await?;

	if !store.delete_option(&option_id).await? {
		return Err(Error::NotFound);
	}

	Ok(Json(json!({ "ok": true })))
}

// vim: ts=4
