//! Custom middlewares

use axum::{
	body::Body,
	extract::State,
	http::{Request, header, response::Response},
	middleware::Next,
};

use crate::extract::{Auth, AuthCtx};
use crate::prelude::*;

/// Verifies the bearer token before the handler (and any data access) runs
pub async fn require_auth(
	State(state): State<App>,
	mut req: Request<Body>,
	next: Next,
) -> ClResult<Response<Body>> {
	let auth_header = req.headers().get(header::AUTHORIZATION).and_then(|h| h.to_str().ok());
	let verified = state.verifier.verify(auth_header).await?;
	debug!("Authenticated user {}", verified.user_id);

	req.extensions_mut().insert(Auth(AuthCtx::from(verified)));

	Ok(next.run(req).await)
}

// vim: ts=4
