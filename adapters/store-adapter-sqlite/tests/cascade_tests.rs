//! Cascade delete tests: hierarchy removal and sibling isolation

use ledger_store_adapter_sqlite::StoreAdapterSqlite;
use ledger_types::store_adapter::*;
use tempfile::TempDir;

struct Fixture {
	adapter: StoreAdapterSqlite,
	_temp: TempDir,
	workspace: Workspace,
	decisions: Vec<Decision>,
}

/// A workspace with two fully populated decisions
async fn populated() -> Fixture {
	let temp = TempDir::new().expect("Failed to create temp directory");
	let adapter =
		StoreAdapterSqlite::new(temp.path().join("ledger.db")).await.expect("Failed to create adapter");

	adapter.upsert_user(&UpsertUser { id: "u1", email: None, name: None }).await.unwrap();
	let workspace = adapter
		.create_workspace(&CreateWorkspace { name: "Q3 Planning", created_by: "u1", creator_role: "admin" })
		.await
		.unwrap();
	adapter.add_member(&workspace.id, "u2", "member").await.unwrap();

	let mut decisions = Vec::new();
	for title in ["Pick DB", "Pick queue"] {
		let decision = adapter
			.create_decision(&CreateDecision {
				workspace_id: &workspace.id,
				title,
				status: None,
				owner_id: "u1",
			})
			.await
			.unwrap();
		adapter
			.upsert_details(&decision.id, &DetailsData { context: Some("ctx".into()), ..Default::default() })
			.await
			.unwrap();
		for name in ["A", "B"] {
			adapter
				.create_option(&CreateOption { decision_id: &decision.id, option_name: name, pros: None, cons: None })
				.await
				.unwrap();
		}
		adapter
			.create_revision(&CreateRevision { decision_id: &decision.id, author_id: "u2", summary: "init" })
			.await
			.unwrap();
		decisions.push(decision);
	}

	Fixture { adapter, _temp: temp, workspace, decisions }
}

#[tokio::test]
async fn test_delete_decision_spares_siblings() {
	let fx = populated().await;
	let (gone, kept) = (&fx.decisions[0], &fx.decisions[1]);

	assert!(fx.adapter.delete_decision(&gone.id).await.unwrap());

	assert!(fx.adapter.read_decision(&gone.id).await.unwrap().is_none());
	assert!(fx.adapter.read_details(&gone.id).await.unwrap().is_none());
	assert!(fx.adapter.list_options(&gone.id).await.unwrap().is_empty());
	assert!(fx.adapter.list_revisions(&gone.id).await.unwrap().is_empty());

	assert!(fx.adapter.read_decision(&kept.id).await.unwrap().is_some());
	assert!(fx.adapter.read_details(&kept.id).await.unwrap().is_some());
	assert_eq!(fx.adapter.list_options(&kept.id).await.unwrap().len(), 2);
	assert_eq!(fx.adapter.list_revisions(&kept.id).await.unwrap().len(), 1);

	let remaining = fx.adapter.list_decisions(&fx.workspace.id).await.unwrap();
	assert_eq!(remaining.len(), 1);
}

#[tokio::test]
async fn test_delete_missing_decision() {
	let fx = populated().await;
	assert!(!fx.adapter.delete_decision("missing").await.unwrap());
	assert_eq!(fx.adapter.list_decisions(&fx.workspace.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_workspace_removes_hierarchy() {
	let fx = populated().await;

	// An unrelated workspace must survive
	let other = fx
		.adapter
		.create_workspace(&CreateWorkspace { name: "Other", created_by: "u1", creator_role: "admin" })
		.await
		.unwrap();

	assert!(fx.adapter.delete_workspace(&fx.workspace.id).await.unwrap());

	assert!(fx.adapter.read_workspace(&fx.workspace.id).await.unwrap().is_none());
	assert!(fx.adapter.list_members(&fx.workspace.id).await.unwrap().is_empty());
	assert!(fx.adapter.list_decisions(&fx.workspace.id).await.unwrap().is_empty());
	for decision in &fx.decisions {
		assert!(fx.adapter.read_decision(&decision.id).await.unwrap().is_none());
		assert!(fx.adapter.read_details(&decision.id).await.unwrap().is_none());
		assert!(fx.adapter.list_options(&decision.id).await.unwrap().is_empty());
		assert!(fx.adapter.list_revisions(&decision.id).await.unwrap().is_empty());
	}

	assert!(fx.adapter.read_workspace(&other.id).await.unwrap().is_some());
	assert!(fx.adapter.read_member(&other.id, "u1").await.unwrap().is_some());

	// Users are never deleted
	assert!(fx.adapter.read_user("u2").await.unwrap().is_some());

	assert!(!fx.adapter.delete_workspace(&fx.workspace.id).await.unwrap());
}

// vim: ts=4
