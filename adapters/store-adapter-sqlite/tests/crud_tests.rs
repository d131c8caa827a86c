//! Store adapter CRUD operation tests
//!
//! Tests create, read, update and delete operations for every ledger entity

use ledger_store_adapter_sqlite::StoreAdapterSqlite;
use ledger_types::store_adapter::*;
use ledger_types::types::Patch;
use std::sync::Arc;
use tempfile::TempDir;

async fn create_test_adapter() -> (StoreAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = StoreAdapterSqlite::new(temp_dir.path().join("ledger.db"))
		.await
		.expect("Failed to create adapter");

	(adapter, temp_dir)
}

async fn create_user(adapter: &StoreAdapterSqlite, id: &str) {
	adapter
		.upsert_user(&UpsertUser { id, email: None, name: None })
		.await
		.expect("Should upsert user");
}

async fn create_workspace(adapter: &StoreAdapterSqlite, name: &str, user_id: &str) -> Workspace {
	adapter
		.create_workspace(&CreateWorkspace { name, created_by: user_id, creator_role: "admin" })
		.await
		.expect("Should create workspace")
}

async fn create_decision(adapter: &StoreAdapterSqlite, ws: &Workspace, title: &str) -> Decision {
	adapter
		.create_decision(&CreateDecision {
			workspace_id: &ws.id,
			title,
			status: None,
			owner_id: &ws.created_by,
		})
		.await
		.expect("Should create decision")
}

async fn create_option(adapter: &StoreAdapterSqlite, decision: &Decision, name: &str) -> DecisionOption {
	adapter
		.create_option(&CreateOption {
			decision_id: &decision.id,
			option_name: name,
			pros: None,
			cons: None,
		})
		.await
		.expect("Should create option")
}

#[tokio::test]
async fn test_user_upsert_is_idempotent() {
	let (adapter, _temp) = create_test_adapter().await;

	let user = adapter
		.upsert_user(&UpsertUser { id: "u1", email: Some("alice@example.com"), name: Some("Alice") })
		.await
		.expect("Should upsert user");
	assert_eq!(user.email.as_deref(), Some("alice@example.com"));

	// A later upsert without profile data keeps what is known
	let user = adapter
		.upsert_user(&UpsertUser { id: "u1", email: None, name: None })
		.await
		.expect("Should upsert user again");
	assert_eq!(user.email.as_deref(), Some("alice@example.com"));
	assert_eq!(user.name.as_deref(), Some("Alice"));

	assert!(adapter.read_user("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_workspace_adds_creator_as_admin() {
	let (adapter, _temp) = create_test_adapter().await;
	create_user(&adapter, "u1").await;

	let ws = create_workspace(&adapter, "Q3 Planning", "u1").await;
	assert_eq!(ws.name.as_ref(), "Q3 Planning");
	assert_eq!(ws.created_by.as_ref(), "u1");

	let member = adapter.read_member(&ws.id, "u1").await.unwrap().expect("Creator is a member");
	assert_eq!(member.role.as_ref(), "admin");

	let members = adapter.list_members(&ws.id).await.unwrap();
	assert_eq!(members.len(), 1);
}

#[tokio::test]
async fn test_create_workspace_requires_existing_user() {
	let (adapter, _temp) = create_test_adapter().await;

	let res = adapter
		.create_workspace(&CreateWorkspace { name: "Orphan", created_by: "ghost", creator_role: "admin" })
		.await;
	assert!(res.is_err(), "Foreign key on created_by should reject unknown users");
	assert!(adapter.list_workspaces().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_read_workspace_for_user() {
	let (adapter, _temp) = create_test_adapter().await;
	create_user(&adapter, "u1").await;
	create_user(&adapter, "u2").await;
	let ws = create_workspace(&adapter, "Q3 Planning", "u1").await;

	let view = adapter.read_workspace_for_user(&ws.id, "u1").await.unwrap().unwrap();
	assert_eq!(view.workspace, ws);
	assert_eq!(view.member.map(|m| m.role), Some("admin".into()));

	let view = adapter.read_workspace_for_user(&ws.id, "u2").await.unwrap().unwrap();
	assert!(view.member.is_none());

	assert!(adapter.read_workspace_for_user("missing", "u1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_add_member_keeps_existing_role() {
	let (adapter, _temp) = create_test_adapter().await;
	create_user(&adapter, "u1").await;
	let ws = create_workspace(&adapter, "Q3 Planning", "u1").await;

	// Unknown users get a bare user row
	let member = adapter.add_member(&ws.id, "u2", "member").await.unwrap();
	assert_eq!(member.role.as_ref(), "member");
	assert!(adapter.read_user("u2").await.unwrap().is_some());

	let member = adapter.add_member(&ws.id, "u1", "member").await.unwrap();
	assert_eq!(member.role.as_ref(), "admin");
	assert_eq!(adapter.list_members(&ws.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_decision_defaults_and_update() {
	let (adapter, _temp) = create_test_adapter().await;
	create_user(&adapter, "u1").await;
	let ws = create_workspace(&adapter, "Q3 Planning", "u1").await;

	let decision = create_decision(&adapter, &ws, "Pick DB").await;
	assert_eq!(decision.status.as_ref(), "proposed");
	assert_eq!(decision.workspace_id, ws.id);
	assert_eq!(decision.owner_id.as_ref(), "u1");

	let updated = adapter
		.update_decision(
			&decision.id,
			&UpdateDecisionData { title: Patch::Undefined, status: Patch::Value("accepted".into()) },
		)
		.await
		.unwrap()
		.unwrap();
	assert_eq!(updated.status.as_ref(), "accepted");
	assert_eq!(updated.title.as_ref(), "Pick DB");

	let res = adapter
		.update_decision(&decision.id, &UpdateDecisionData { title: Patch::Null, status: Patch::Undefined })
		.await;
	assert!(res.is_err(), "Title cannot be cleared");

	let missing = adapter
		.update_decision("missing", &UpdateDecisionData { title: Patch::Value("x".into()), status: Patch::Undefined })
		.await
		.unwrap();
	assert!(missing.is_none());
}

#[tokio::test]
async fn test_details_upsert_replaces_wholesale() {
	let (adapter, _temp) = create_test_adapter().await;
	create_user(&adapter, "u1").await;
	let ws = create_workspace(&adapter, "Q3 Planning", "u1").await;
	let decision = create_decision(&adapter, &ws, "Pick DB").await;

	assert!(adapter.read_details(&decision.id).await.unwrap().is_none());

	adapter
		.upsert_details(
			&decision.id,
			&DetailsData {
				context: Some("We need a database".into()),
				final_decision: None,
				rationale: Some("first pass".into()),
			},
		)
		.await
		.unwrap();
	let details = adapter
		.upsert_details(
			&decision.id,
			&DetailsData { context: None, final_decision: Some("Postgres".into()), rationale: None },
		)
		.await
		.unwrap();

	assert_eq!(details.context, None);
	assert_eq!(details.final_decision.as_deref(), Some("Postgres"));
	assert_eq!(details.rationale, None);

	let read = adapter.read_details(&decision.id).await.unwrap().unwrap();
	assert_eq!(read, details);
}

#[tokio::test]
async fn test_choose_option_leaves_exactly_one_chosen() {
	let (adapter, _temp) = create_test_adapter().await;
	create_user(&adapter, "u1").await;
	let ws = create_workspace(&adapter, "Q3 Planning", "u1").await;
	let decision = create_decision(&adapter, &ws, "Pick DB").await;
	let other = create_decision(&adapter, &ws, "Pick queue").await;

	let postgres = create_option(&adapter, &decision, "Postgres").await;
	let mysql = create_option(&adapter, &decision, "MySQL").await;
	let sqlite = create_option(&adapter, &decision, "SQLite").await;
	let kafka = create_option(&adapter, &other, "Kafka").await;
	assert!(!postgres.is_chosen);

	adapter.choose_option(&kafka.id).await.unwrap();
	adapter.choose_option(&mysql.id).await.unwrap();
	adapter.choose_option(&sqlite.id).await.unwrap();
	let chosen = adapter.choose_option(&postgres.id).await.unwrap().unwrap();
	assert!(chosen.is_chosen);
	assert_eq!(chosen.id, postgres.id);

	let options = adapter.list_options(&decision.id).await.unwrap();
	let chosen: Vec<_> = options.iter().filter(|o| o.is_chosen).collect();
	assert_eq!(chosen.len(), 1);
	assert_eq!(chosen[0].id, postgres.id);

	// Sibling decisions are untouched
	assert!(adapter.read_option(&kafka.id).await.unwrap().unwrap().is_chosen);

	assert!(adapter.choose_option("missing").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_choose_all_succeed() {
	let (adapter, _temp) = create_test_adapter().await;
	create_user(&adapter, "u1").await;
	let ws = create_workspace(&adapter, "Q3 Planning", "u1").await;
	let decision = create_decision(&adapter, &ws, "Pick DB").await;

	let mut option_ids = Vec::new();
	for name in ["Postgres", "MySQL", "SQLite", "CockroachDB", "DuckDB"] {
		option_ids.push(create_option(&adapter, &decision, name).await.id);
	}
	let adapter = Arc::new(adapter);

	for _round in 0..10 {
		let handles: Vec<_> = option_ids
			.iter()
			.cloned()
			.map(|option_id| {
				let adapter = Arc::clone(&adapter);
				tokio::spawn(async move { adapter.choose_option(&option_id).await })
			})
			.collect();

		for handle in handles {
			let chosen = handle.await.expect("task completes").expect("choose succeeds");
			assert!(chosen.is_some());
		}

		let options = adapter.list_options(&decision.id).await.unwrap();
		assert_eq!(options.iter().filter(|o| o.is_chosen).count(), 1);
	}
}

#[tokio::test]
async fn test_delete_option() {
	let (adapter, _temp) = create_test_adapter().await;
	create_user(&adapter, "u1").await;
	let ws = create_workspace(&adapter, "Q3 Planning", "u1").await;
	let decision = create_decision(&adapter, &ws, "Pick DB").await;
	let option = create_option(&adapter, &decision, "Postgres").await;

	assert!(adapter.delete_option(&option.id).await.unwrap());
	assert!(!adapter.delete_option(&option.id).await.unwrap());
	assert!(adapter.read_option(&option.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_revisions_are_listed_newest_first() {
	let (adapter, _temp) = create_test_adapter().await;
	create_user(&adapter, "u1").await;
	let ws = create_workspace(&adapter, "Q3 Planning", "u1").await;
	let decision = create_decision(&adapter, &ws, "Pick DB").await;

	for summary in ["created", "added options", "chose Postgres"] {
		adapter
			.create_revision(&CreateRevision { decision_id: &decision.id, author_id: "u1", summary })
			.await
			.unwrap();
	}

	let revisions = adapter.list_revisions(&decision.id).await.unwrap();
	let summaries: Vec<_> = revisions.iter().map(|r| r.summary.as_ref()).collect();
	assert_eq!(summaries, ["chose Postgres", "added options", "created"]);
}

#[tokio::test]
async fn test_read_nonexistent_entities() {
	let (adapter, _temp) = create_test_adapter().await;

	assert!(adapter.read_workspace("missing").await.unwrap().is_none());
	assert!(adapter.read_decision("missing").await.unwrap().is_none());
	assert!(adapter.read_option("missing").await.unwrap().is_none());
	assert!(adapter.read_details("missing").await.unwrap().is_none());
	assert!(adapter.list_decisions("missing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_server_time() {
	let (adapter, _temp) = create_test_adapter().await;
	let now = adapter.server_time().await.unwrap();
	assert!(now.0 > 1_600_000_000);
}

// vim: ts=4
