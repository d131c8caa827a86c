//! Workspace membership roles
//!
//! Roles are free text in storage and always compared case-insensitively
//! (see `WorkspaceMember::has_role`).

pub const ROLE_MEMBER: &str = "member";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_OWNER: &str = "owner";

/// Role given to the creator of a workspace
pub const ROLE_CREATOR: &str = ROLE_ADMIN;

/// Roles allowed to delete a workspace or manage its members
pub const WORKSPACE_ADMIN_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_OWNER];

/// Every role a membership can be granted through the API
pub const KNOWN_ROLES: &[&str] = &[ROLE_MEMBER, ROLE_ADMIN, ROLE_OWNER];

/// Normalizes a requested role, rejecting unknown ones
pub fn parse_role(role: &str) -> Option<&'static str> {
	KNOWN_ROLES.iter().copied().find(|r| r.eq_ignore_ascii_case(role.trim()))
}


// vim: ts=4
