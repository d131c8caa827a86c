//! Workspace membership and role checks
//!
//! Every check resolves the target first and reports `NotFound` before it
//! looks at membership, so a missing resource is always a 404 even for
//! callers who could not have seen it. Non-members get `PermissionDenied`.

use ledger_types::store_adapter::{Decision, DecisionOption, StoreAdapter, Workspace, WorkspaceMember};

use crate::prelude::*;

/// A workspace the caller may access, with the caller's membership
#[derive(Debug, Clone)]
pub struct WorkspaceAccess {
	pub workspace: Workspace,
	pub member: WorkspaceMember,
}

#[derive(Debug, Clone)]
pub struct DecisionAccess {
	pub decision: Decision,
	pub member: WorkspaceMember,
}

#[derive(Debug, Clone)]
pub struct OptionAccess {
	pub option: DecisionOption,
	pub decision: Decision,
	pub member: WorkspaceMember,
}

/// Checks that `user_id` is a member of the workspace, optionally holding one of `roles`
pub async fn authorize_workspace(
	store: &dyn StoreAdapter,
	user_id: &str,
	workspace_id: &str,
	roles: Option<&[&str]>,
) -> ClResult<WorkspaceAccess> {
	let found = store.read_workspace_for_user(workspace_id, user_id).await?.ok_or(Error::NotFound)?;
	let member = check_member(found.member, roles)?;

	Ok(WorkspaceAccess { workspace: found.workspace, member })
}

/// Resolves the decision's workspace and checks membership there
pub async fn authorize_decision(
	store: &dyn StoreAdapter,
	user_id: &str,
	decision_id: &str,
	roles: Option<&[&str]>,
) -> ClResult<DecisionAccess> {
	let decision = store.read_decision(decision_id).await?.ok_or(Error::NotFound)?;
	let member = member_of(store, user_id, &decision.workspace_id, roles).await?;

	Ok(DecisionAccess { decision, member })
}

/// Resolves option → decision → workspace and checks membership there
pub async fn authorize_option(
	store: &dyn StoreAdapter,
	user_id: &str,
	option_id: &str,
	roles: Option<&[&str]>,
) -> ClResult<OptionAccess> {
	let option = store.read_option(option_id).await?.ok_or(Error::NotFound)?;
	// Options never outlive their decision, but a concurrent cascade may be in flight
	let decision = store.read_decision(&option.decision_id).await?.ok_or(Error::NotFound)?;
	let member = member_of(store, user_id, &decision.workspace_id, roles).await?;

	Ok(OptionAccess { option, decision, member })
}

async fn member_of(
	store: &dyn StoreAdapter,
	user_id: &str,
	workspace_id: &str,
	roles: Option<&[&str]>,
) -> ClResult<WorkspaceMember> {
	check_member(store.read_member(workspace_id, user_id).await?, roles)
}

fn check_member(member: Option<WorkspaceMember>, roles: Option<&[&str]>) -> ClResult<WorkspaceMember> {
	let member = member.ok_or_else(|| {
		debug!("Access denied: not a member");
		Error::PermissionDenied
	})?;
	match roles {
		Some(roles) if !member.has_role(roles) => {
			debug!("Access denied: role {} not in {:?}", member.role, roles);
			Err(Error::PermissionDenied)
		}
		_ => Ok(member),
	}
}


// vim: ts=4
