//! Workspace and membership HTTP handlers

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::prelude::*;
use crate::user::{ensure_user, required_text};
use ledger_core::{
	access,
	extract::{Auth, JsonBody},
	roles,
};
use ledger_types::store_adapter::{CreateWorkspace, Workspace, WorkspaceMember};

#[derive(Debug, Deserialize)]
pub struct CreateWorkspaceReq {
	pub name: String,
}

/// A workspace as seen by one of its members
#[derive(Debug, Serialize)]
pub struct WorkspaceView {
	#[serde(flatten)]
	pub workspace: Workspace,
	pub role: Box<str>,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberReq {
	pub user_id: String,
	pub role: Option<String>,
}

/// GET /workspaces - List all workspaces
pub async fn list_workspaces(
	State(app): State<App>,
	Auth(_auth): Auth,
) -> ClResult<Json<Vec<Workspace>>> {
	let workspaces = app.store()?.list_workspaces().await?;

	Ok(Json(workspaces))
}

/// POST /workspaces - Create a workspace; the creator becomes its admin
pub async fn post_workspace(
	State(app): State<App>,
	Auth(auth): Auth,
	body: JsonBody<CreateWorkspaceReq>,
) -> ClResult<(StatusCode, Json<Workspace>)> {
	let req = body.into_inner()?;
	let name = required_text("name", &req.name)?;
	let store = app.store()?;
	ensure_user(store.as_ref(), &auth).await?;

	let workspace = store
		.create_workspace(&CreateWorkspace {
			name,
			created_by: &auth.user_id,
			creator_role: roles::ROLE_CREATOR,
		})
		.await?;

	info!("User {} created workspace {}", auth.user_id, workspace.id);

	Ok((StatusCode::CREATED, Json(workspace)))
}

/// GET /workspaces/{id} - Workspace with the caller's role
pub async fn get_workspace(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(workspace_id): Path<String>,
) -> ClResult<Json<WorkspaceView>> {
	let store = app.store()?;
	let access = access::authorize_workspace(store.as_ref(), &auth.user_id, &workspace_id, None).await?;

	Ok(Json(WorkspaceView { workspace: access.workspace, role: access.member.role }))
}

/// DELETE /workspaces/{id} - Delete a workspace with everything in it (admin/owner)
pub async fn delete_workspace(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(workspace_id): Path<String>,
) -> ClResult<Json<Value>> {
	let store = app.store()?;
	access::authorize_workspace(
		store.as_ref(),
		&auth.user_id,
		&workspace_id,
		Some(roles::WORKSPACE_ADMIN_ROLES),
	)
	.await?;

	if !store.delete_workspace(&workspace_id).await? {
		return Err(Error::NotFound);
	}

	info!("User {} deleted workspace {}", auth.user_id, workspace_id);

	Ok(Json(json!({ "ok": true })))
}

/// GET /workspaces/{id}/members
pub async fn list_members(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(workspace_id): Path<String>,
) -> ClResult<Json<Vec<WorkspaceMember>>> {
	let store = app.store()?;
	access::authorize_workspace(store.as_ref(), &auth.user_id, &workspace_id, None).await?;

	let members = store.list_members(&workspace_id).await?;

	Ok(Json(members))
}

/// POST /workspaces/{id}/members - Add a member (admin/owner). Existing members keep their role.
pub async fn post_member(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(workspace_id): Path<String>,
	body: JsonBody<AddMemberReq>,
) -> ClResult<(StatusCode, Json<WorkspaceMember>)> {
	let store = app.store()?;
	access::authorize_workspace(
		store.as_ref(),
		&auth.user_id,
		&workspace_id,
		Some(roles::WORKSPACE_ADMIN_ROLES),
	)
	.await?;

	let req = body.into_inner()?;
	let user_id = required_text("user_id", &req.user_id)?;
	let role = match req.role.as_deref() {
		None => roles::ROLE_MEMBER,
		Some(role) => roles::parse_role(role)
			.ok_or_else(|| Error::ValidationError(format!("Unknown role: {}", role)))?,
	};

	let member = store.add_member(&workspace_id, user_id, role).await?;

	info!("User {} added {} to workspace {} as {}", auth.user_id, user_id, workspace_id, member.role);

	Ok((StatusCode::CREATED, Json(member)))
}

// vim: ts=4
