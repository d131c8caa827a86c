//! Error types shared by every Decision Ledger crate.
//!
//! Components return `ClResult<T>`; the HTTP layer performs the single
//! translation to a status code through `IntoResponse`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

pub type ClResult<T> = std::result::Result<T, Error>;

/// Reasons a bearer token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
	/// No `Authorization` header, or not of the form `Bearer <token>`
	MissingOrMalformedHeader,
	/// The token header carries no `kid`
	MissingKeyId,
	/// No key in the provider's key set matches the token's `kid`
	UnknownSigningKey,
	/// Expired, malformed, or signature mismatch
	InvalidToken,
	/// The verified claims carry no `sub`
	MissingSubject,
}

impl AuthError {
	pub fn code(self) -> &'static str {
		match self {
			AuthError::MissingOrMalformedHeader => "E-AUTH-HEADER",
			AuthError::MissingKeyId => "E-AUTH-NOKID",
			AuthError::UnknownSigningKey => "E-AUTH-UNKNOWNKEY",
			AuthError::InvalidToken => "E-AUTH-INVALID",
			AuthError::MissingSubject => "E-AUTH-NOSUB",
		}
	}

	pub fn message(self) -> &'static str {
		match self {
			AuthError::MissingOrMalformedHeader => "Authorization must be: Bearer <token>",
			AuthError::MissingKeyId => "Token missing kid",
			AuthError::UnknownSigningKey => "Unknown signing key (kid)",
			AuthError::InvalidToken => "Invalid token",
			AuthError::MissingSubject => "Token missing sub (user id)",
		}
	}
}

impl std::fmt::Display for AuthError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.message())
	}
}

#[derive(Debug)]
pub enum Error {
	NotFound,
	PermissionDenied,
	Unauthorized(AuthError),
	ValidationError(String),
	DbError,
	ConfigError(String),
	ServiceUnavailable(String),
	Internal(String),
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
			Error::ValidationError(_) => StatusCode::BAD_REQUEST,
			Error::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
			Error::DbError | Error::ConfigError(_) | Error::Internal(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	fn code(&self) -> &'static str {
		match self {
			Error::NotFound => "E-NOT-FOUND",
			Error::PermissionDenied => "E-PERMISSION",
			Error::Unauthorized(err) => err.code(),
			Error::ValidationError(_) => "E-VALIDATION",
			Error::DbError => "E-DB",
			Error::ConfigError(_) => "E-CONFIG",
			Error::ServiceUnavailable(_) => "E-UNAVAILABLE",
			Error::Internal(_) => "E-INTERNAL",
		}
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::Unauthorized(err) => write!(f, "unauthorized: {}", err),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::DbError => write!(f, "database error"),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::ServiceUnavailable(msg) => write!(f, "service unavailable: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

impl From<AuthError> for Error {
	fn from(err: AuthError) -> Self {
		Error::Unauthorized(err)
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		warn!("io error: {}", err);
		Error::Internal(format!("io error: {}", err))
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		// Internal details stay in the log, never in the response
		let message = match &self {
			Error::NotFound => "Not found".to_string(),
			Error::PermissionDenied => "Not a member or insufficient role".to_string(),
			Error::Unauthorized(err) => err.message().to_string(),
			Error::ValidationError(msg) => msg.clone(),
			Error::ServiceUnavailable(msg) => {
				warn!("Service unavailable: {}", msg);
				"Upstream service unavailable".to_string()
			}
			Error::DbError | Error::ConfigError(_) | Error::Internal(_) => {
				error!("{}", self);
				"Internal server error".to_string()
			}
		};
		let body = serde_json::json!({
			"error": {
				"code": self.code(),
				"message": message,
			}
		});
		(status, Json(body)).into_response()
	}
}


// vim: ts=4
