//! Lazy user creation and request field validation shared by the handlers

use ledger_core::extract::AuthCtx;
use ledger_types::store_adapter::{StoreAdapter, UpsertUser};

use crate::prelude::*;

/// Users are never registered explicitly: the first write creates the row
pub async fn ensure_user(store: &dyn StoreAdapter, auth: &AuthCtx) -> ClResult<()> {
	store
		.upsert_user(&UpsertUser {
			id: &auth.user_id,
			email: auth.email.as_deref(),
			name: auth.name.as_deref(),
		})
		.await?;
	Ok(())
}

/// Trims `value`, rejecting it when nothing is left
pub fn required_text<'a>(field: &str, value: &'a str) -> ClResult<&'a str> {
	let value = value.trim();
	if value.is_empty() {
		return Err(Error::ValidationError(format!("{} must not be empty", field)));
	}
	Ok(value)
}

/// Like `required_text`, but absent is fine
pub fn optional_text<'a>(field: &str, value: Option<&'a str>) -> ClResult<Option<&'a str>> {
	value.map(|v| required_text(field, v)).transpose()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_required_text() {
		assert_eq!(required_text("name", "  Q3 Planning ").unwrap(), "Q3 Planning");
		assert!(matches!(required_text("name", " \t"), Err(Error::ValidationError(_))));
		assert!(matches!(required_text("name", ""), Err(Error::ValidationError(_))));
	}

	#[test]
	fn test_optional_text() {
		assert_eq!(optional_text("status", None).unwrap(), None);
		assert_eq!(optional_text("status", Some("accepted")).unwrap(), Some("accepted"));
		assert!(optional_text("status", Some(" ")).is_err());
	}
}

// vim: ts=4
