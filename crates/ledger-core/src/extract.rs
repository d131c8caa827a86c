//! Custom extractors for ledger-specific data

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::prelude::*;
use crate::token::VerifiedToken;

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct AuthCtx {
	pub user_id: Box<str>,
	pub email: Option<Box<str>>,
	pub name: Option<Box<str>>,
}

impl From<VerifiedToken> for AuthCtx {
	fn from(token: VerifiedToken) -> Self {
		AuthCtx { user_id: token.user_id, email: token.email, name: token.name }
	}
}

// Auth //
//******//
/// Inserted into the request extensions by `middleware::require_auth`
#[derive(Debug, Clone)]
pub struct Auth(pub AuthCtx);

impl<S> FromRequestParts<S> for Auth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(auth) = parts.extensions.get::<Auth>().cloned() {
			Ok(auth)
		} else {
			Err(Error::Unauthorized(AuthError::MissingOrMalformedHeader))
		}
	}
}

// JsonBody //
//**********//
/// JSON request body whose parse errors surface as `Error::ValidationError`.
///
/// Extraction itself never fails; call `into_inner()` after the access
/// checks so a non-member gets 403 even when the body is malformed.
#[derive(Debug)]
pub struct JsonBody<T>(Result<T, String>);

impl<T> JsonBody<T> {
	pub fn into_inner(self) -> ClResult<T> {
		self.0.map_err(Error::ValidationError)
	}
}

impl<T, S> FromRequest<S> for JsonBody<T>
where
	T: DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		match Json::<T>::from_request(req, state).await {
			Ok(Json(value)) => Ok(JsonBody(Ok(value))),
			Err(rejection) => {
				debug!("Rejected request body: {}", rejection.body_text());
				Ok(JsonBody(Err(rejection.body_text())))
			}
		}
	}
}


// vim: ts=4
