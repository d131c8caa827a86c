//! Adapter that stores workspaces, decisions and everything hanging off them.
//!
//! Lookups by id return `Ok(None)` when nothing matches; deciding whether that
//! is a 404 is left to the caller. Every multi-statement write runs inside a
//! single transaction of the backing store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::prelude::*;

pub const DEFAULT_DECISION_STATUS: &str = "proposed";

// Users //
//*******//
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: Box<str>,
	pub email: Option<Box<str>>,
	pub name: Option<Box<str>>,
	pub created_at: Timestamp,
}

/// Data for the idempotent user upsert. `None` fields never overwrite a known value.
#[derive(Debug)]
pub struct UpsertUser<'a> {
	pub id: &'a str,
	pub email: Option<&'a str>,
	pub name: Option<&'a str>,
}

// Workspaces //
//************//
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
	pub id: Box<str>,
	pub name: Box<str>,
	pub created_by: Box<str>,
	pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMember {
	pub workspace_id: Box<str>,
	pub user_id: Box<str>,
	pub role: Box<str>,
	pub created_at: Timestamp,
}

impl WorkspaceMember {
	/// Case-insensitive role check
	pub fn has_role(&self, roles: &[&str]) -> bool {
		roles.iter().any(|r| self.role.eq_ignore_ascii_case(r))
	}
}

/// A workspace together with the requesting user's membership, if any
#[derive(Debug, Clone)]
pub struct WorkspaceForUser {
	pub workspace: Workspace,
	pub member: Option<WorkspaceMember>,
}

#[derive(Debug)]
pub struct CreateWorkspace<'a> {
	pub name: &'a str,
	pub created_by: &'a str,
	/// Role of the creator's initial membership row
	pub creator_role: &'a str,
}

// Decisions //
//***********//
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
	pub id: Box<str>,
	pub workspace_id: Box<str>,
	pub title: Box<str>,
	pub status: Box<str>,
	pub owner_id: Box<str>,
	pub created_at: Timestamp,
	pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateDecision<'a> {
	pub workspace_id: &'a str,
	pub title: &'a str,
	/// Defaults to `DEFAULT_DECISION_STATUS`
	pub status: Option<&'a str>,
	pub owner_id: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDecisionData {
	#[serde(default)]
	pub title: Patch<String>,
	#[serde(default)]
	pub status: Patch<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionDetails {
	pub decision_id: Box<str>,
	pub context: Option<Box<str>>,
	pub final_decision: Option<Box<str>>,
	pub rationale: Option<Box<str>>,
	pub updated_at: Timestamp,
}

/// Full replacement payload for a decision's details
#[derive(Debug, Default, Deserialize)]
pub struct DetailsData {
	pub context: Option<String>,
	pub final_decision: Option<String>,
	pub rationale: Option<String>,
}

// Options //
//*********//
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOption {
	pub id: Box<str>,
	pub decision_id: Box<str>,
	pub option_name: Box<str>,
	pub pros: Option<Box<str>>,
	pub cons: Option<Box<str>>,
	pub is_chosen: bool,
	pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateOption<'a> {
	pub decision_id: &'a str,
	pub option_name: &'a str,
	pub pros: Option<&'a str>,
	pub cons: Option<&'a str>,
}

// Revisions //
//***********//
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRevision {
	pub id: Box<str>,
	pub decision_id: Box<str>,
	pub author_id: Box<str>,
	pub summary: Box<str>,
	pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateRevision<'a> {
	pub decision_id: &'a str,
	pub author_id: &'a str,
	pub summary: &'a str,
}

#[async_trait]
pub trait StoreAdapter: Debug + Send + Sync {
	// Health
	//********
	/// Round trip to the database, returning its clock
	async fn server_time(&self) -> ClResult<Timestamp>;

	// Users
	//*******
	async fn upsert_user(&self, user: &UpsertUser<'_>) -> ClResult<User>;
	async fn read_user(&self, user_id: &str) -> ClResult<Option<User>>;

	// Workspaces
	//************
	async fn list_workspaces(&self) -> ClResult<Vec<Workspace>>;
	/// Creates the workspace and the creator's membership row atomically
	async fn create_workspace(&self, data: &CreateWorkspace<'_>) -> ClResult<Workspace>;
	async fn read_workspace(&self, workspace_id: &str) -> ClResult<Option<Workspace>>;
	async fn read_workspace_for_user(
		&self,
		workspace_id: &str,
		user_id: &str,
	) -> ClResult<Option<WorkspaceForUser>>;
	/// Deletes the workspace and its whole hierarchy. Returns false if it did not exist.
	async fn delete_workspace(&self, workspace_id: &str) -> ClResult<bool>;

	// Members
	//*********
	async fn read_member(
		&self,
		workspace_id: &str,
		user_id: &str,
	) -> ClResult<Option<WorkspaceMember>>;
	async fn list_members(&self, workspace_id: &str) -> ClResult<Vec<WorkspaceMember>>;
	/// Adds a member; an existing membership is returned unchanged
	async fn add_member(
		&self,
		workspace_id: &str,
		user_id: &str,
		role: &str,
	) -> ClResult<WorkspaceMember>;

	// Decisions
	//***********
	async fn list_decisions(&self, workspace_id: &str) -> ClResult<Vec<Decision>>;
	async fn create_decision(&self, data: &CreateDecision<'_>) -> ClResult<Decision>;
	async fn read_decision(&self, decision_id: &str) -> ClResult<Option<Decision>>;
	async fn update_decision(
		&self,
		decision_id: &str,
		data: &UpdateDecisionData,
	) -> ClResult<Option<Decision>>;
	/// Deletes the decision with its details, options and revisions
	async fn delete_decision(&self, decision_id: &str) -> ClResult<bool>;

	// Details
	//*********
	async fn read_details(&self, decision_id: &str) -> ClResult<Option<DecisionDetails>>;
	async fn upsert_details(
		&self,
		decision_id: &str,
		data: &DetailsData,
	) -> ClResult<DecisionDetails>;

	// Options
	//*********
	async fn list_options(&self, decision_id: &str) -> ClResult<Vec<DecisionOption>>;
	async fn create_option(&self, data: &CreateOption<'_>) -> ClResult<DecisionOption>;
	async fn read_option(&self, option_id: &str) -> ClResult<Option<DecisionOption>>;
	/// Un-chooses every sibling and chooses this option, atomically
	async fn choose_option(&self, option_id: &str) -> ClResult<Option<DecisionOption>>;
	async fn delete_option(&self, option_id: &str) -> ClResult<bool>;

	// Revisions
	//***********
	/// Newest first
	async fn list_revisions(&self, decision_id: &str) -> ClResult<Vec<DecisionRevision>>;
	async fn create_revision(&self, data: &CreateRevision<'_>) -> ClResult<DecisionRevision>;
}


// vim: ts=4
