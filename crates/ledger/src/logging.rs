//! Request logging middleware

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::prelude::*;

pub async fn log_request(req: Request<Body>, next: Next) -> Response {
	let method = req.method().clone();
	let path = req.uri().path().to_owned();
	let start = Instant::now();
	info!("REQ [{} {}]", method, path);

	let res = next.run(req).await;

	let status = res.status();
	let tm = start.elapsed().as_millis();
	if status.is_client_error() || status.is_server_error() {
		warn!("RES [{} {}] {} tm:{}ms", method, path, status.as_u16(), tm);
	} else {
		info!("RES [{} {}] {} tm:{}ms", method, path, status.as_u16(), tm);
	}
	res
}

// vim: ts=4
