//! Decision and decision details HTTP handlers

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::prelude::*;
use crate::user::{ensure_user, optional_text, required_text};
use ledger_core::{
	access,
	extract::{Auth, JsonBody},
};
use ledger_types::store_adapter::{
	CreateDecision, Decision, DecisionDetails, DetailsData, UpdateDecisionData,
};

#[derive(Debug, Deserialize)]
pub struct CreateDecisionReq {
	pub title: String,
	pub status: Option<String>,
}

/// GET /workspaces/{id}/decisions - Newest first
pub async fn list_decisions(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(workspace_id): Path<String>,
) -> ClResult<Json<Vec<Decision>>> {
	let store = app.store()?;
	access::authorize_workspace(store.as_ref(), &auth.user_id, &workspace_id, None).await?;

	let decisions = store.list_decisions(&workspace_id).await?;

	Ok(Json(decisions))
}

/// POST /workspaces/{id}/decisions - The caller becomes the owner
pub async fn post_decision(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(workspace_id): Path<String>,
	body: JsonBody<CreateDecisionReq>,
) -> ClResult<(StatusCode, Json<Decision>)> {
	let store = app.store()?;
	access::authorize_workspace(store.as_ref(), &auth.user_id, &workspace_id, None).await?;

	let req = body.into_inner()?;
	let title = required_text("title", &req.title)?;
	let status = optional_text("status", req.status.as_deref())?;
	ensure_user(store.as_ref(), &auth).await?;

	let decision = store
		.create_decision(&CreateDecision {
			workspace_id: &workspace_id,
			title,
			status,
			owner_id: &auth.user_id,
		})
		.await?;

	info!("User {} created decision {} in {}", auth.user_id, decision.id, workspace_id);

	Ok((StatusCode::CREATED, Json(decision)))
}

/// GET /decisions/{id}
pub async fn get_decision(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(decision_id): Path<String>,
) -> ClResult<Json<Decision>> {
	let store = app.store()?;
	let access = access::authorize_decision(store.as_ref(), &auth.user_id, &decision_id, None).await?;

	Ok(Json(access.decision))
}

/// PATCH /decisions/{id} - Update title and/or status
pub async fn patch_decision(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(decision_id): Path<String>,
	body: JsonBody<UpdateDecisionData>,
) -> ClResult<Json<Decision>> {
	let store = app.store()?;
	access::authorize_decision(store.as_ref(), &auth.user_id, &decision_id, None).await?;

	let patch = body.into_inner()?;
	let patch = UpdateDecisionData {
		title: trim_patch("title", patch.title)?,
		status: trim_patch("status", patch.status)?,
	};
	ensure_user(store.as_ref(), &auth).await?;

	let decision = store.update_decision(&decision_id, &patch).await?.ok_or(Error::NotFound)?;

	Ok(Json(decision))
}

/// Values must be non-empty after trimming; clearing a required field is rejected
fn trim_patch(field: &str, patch: Patch<String>) -> ClResult<Patch<String>> {
	match patch {
		Patch::Undefined => Ok(Patch::Undefined),
		Patch::Null => Err(Error::ValidationError(format!("{} cannot be null", field))),
		Patch::Value(value) => Ok(Patch::Value(required_text(field, &value)?.to_string())),
	}
}

/// DELETE /decisions/{id} - Delete the decision with its details, options and revisions
pub async fn delete_decision(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(decision_id): Path<String>,
) -> ClResult<Json<Value>> {
	let store = app.store()?;
	access::authorize_decision(store.as_ref(), &auth.user_id, &decision_id, None).await?;

	if !store.delete_decision(&decision_id).await? {
		return Err(Error::NotFound);
	}

	info!("User {} deleted decision {}", auth.user_id, decision_id);

	Ok(Json(json!({ "ok": true })))
}

/// GET /decisions/{id}/details - 404 until details were saved once
pub async fn get_details(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(decision_id): Path<String>,
) -> ClResult<Json<DecisionDetails>> {
	let store = app.store()?;
	access::authorize_decision(store.as_ref(), &auth.user_id, &decision_id, None).await?;

	let details = store.read_details(&decision_id).await?.ok_or(Error::NotFound)?;

	Ok(Json(details))
}

/// PUT /decisions/{id}/details - Create or replace the details wholesale
pub async fn put_details(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(decision_id): Path<String>,
	body: JsonBody<DetailsData>,
) -> ClResult<Json<DecisionDetails>> {
	let store = app.store()?;
	access::authorize_decision(store.as_ref(), &auth.user_id, &decision_id, None).await?;
	let data = body.into_inner()?;
	ensure_user(store.as_ref(), &auth).await?;

	let details = store.upsert_details(&decision_id, &data).await?;

	Ok(Json(details))
}


// vim: ts=4
