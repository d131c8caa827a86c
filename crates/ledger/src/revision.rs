//! Decision revision HTTP handlers. Revisions are append-only.

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::Deserialize;

use crate::prelude::*;
use crate::user::{ensure_user, required_text};
use ledger_core::{
	access,
	extract::{Auth, JsonBody},
};
use ledger_types::store_adapter::{CreateRevision, DecisionRevision};

#[derive(Debug, Deserialize)]
pub struct CreateRevisionReq {
	pub summary: String,
}

/// GET /decisions/{id}/revisions - Newest first
pub async fn list_revisions(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(decision_id): Path<String>,
) -> ClResult<Json<Vec<DecisionRevision>>> {
	let store = app.store()?;
	access::authorize_decision(store.as_ref(), &auth.user_id, &decision_id, None).await?;

	let revisions = store.list_revisions(&decision_id).await?;

	Ok(Json(revisions))
}

/// POST /decisions/{id}/revisions - The caller is recorded as author
pub async fn post_revision(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(decision_id): Path<String>,
	body: JsonBody<CreateRevisionReq>,
) -> ClResult<(StatusCode, Json<DecisionRevision>)> {
	let store = app.store()?;
	access::authorize_decision(store.as_ref(), &auth.user_id, &decision_id, None).await?;

	let req = body.into_inner()?;
	let summary = required_text("summary", &req.summary)?;
	ensure_user(store.as_ref(), &auth).await?;

	let revision = store
		.create_revision(&CreateRevision {
			decision_id: &decision_id,
			author_id: &auth.user_id,
			summary,
		})
		.await?;

	Ok((StatusCode::CREATED, Json(revision)))
}

// vim: ts=4
