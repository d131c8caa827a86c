use axum::{
	Router,
	http::{HeaderValue, Method, header},
	middleware,
	routing::{delete, get, put},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::prelude::*;
use crate::{decision, health, logging, option, revision, workspace};
use ledger_core::middleware::require_auth;

fn cors_layer(origins: &[Box<str>]) -> CorsLayer {
	let origins: Vec<HeaderValue> = origins
		.iter()
		.filter_map(|origin| {
			HeaderValue::from_str(origin)
				.inspect_err(|err| warn!("Ignoring CORS origin {}: {}", origin, err))
				.ok()
		})
		.collect();

	CorsLayer::new()
		.allow_origin(AllowOrigin::list(origins))
		.allow_methods([
			Method::GET,
			Method::POST,
			Method::PUT,
			Method::PATCH,
			Method::DELETE,
			Method::OPTIONS,
		])
		.allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
		.allow_credentials(true)
}

pub fn init(app: App) -> Router {
	let protected_router = Router::new()
		.route("/me", get(health::get_me))
		// Workspaces
		.route("/workspaces", get(workspace::list_workspaces).post(workspace::post_workspace))
		.route(
			"/workspaces/{workspace_id}",
			get(workspace::get_workspace).delete(workspace::delete_workspace),
		)
		.route(
			"/workspaces/{workspace_id}/members",
			get(workspace::list_members).post(workspace::post_member),
		)
		.route(
			"/workspaces/{workspace_id}/decisions",
			get(decision::list_decisions).post(decision::post_decision),
		)
		// Decisions
		.route(
			"/decisions/{decision_id}",
			get(decision::get_decision)
				.patch(decision::patch_decision)
				.delete(decision::delete_decision),
		)
		.route(
			"/decisions/{decision_id}/details",
			get(decision::get_details).put(decision::put_details),
		)
		.route(
			"/decisions/{decision_id}/options",
			get(option::list_options).post(option::post_option),
		)
		.route(
			"/decisions/{decision_id}/revisions",
			get(revision::list_revisions).post(revision::post_revision),
		)
		// Options
		.route("/options/{option_id}", delete(option::delete_option))
		.route("/options/{option_id}/choose", put(option::choose_option))
		.route_layer(middleware::from_fn_with_state(app.clone(), require_auth));

	let public_router = Router::new()
		.route("/health", get(health::get_health))
		.route("/db-test", get(health::get_db_test));

	Router::new()
		.merge(public_router)
		.merge(protected_router)
		.layer(middleware::from_fn(logging::log_request))
		.layer(TraceLayer::new_for_http())
		.layer(cors_layer(&app.opts.cors_origins))
		.with_state(app)
}

// vim: ts=4
