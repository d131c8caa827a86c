//! Bearer token verification against the identity provider's key set
//!
//! The provider publishes its signing keys as a JWKS document. Keys are
//! fetched once, on first use, and kept in a `JwksCache` owned by the
//! verifier. Nothing refreshes the cache automatically: a key rotation at the
//! provider shows up as `UnknownSigningKey` until `invalidate()` or
//! `refresh()` is called.

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{DecodingKey, Validation};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::prelude::*;

const JWKS_PATH: &str = "/auth/v1/.well-known/jwks.json";
const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

// JwksSource //
//************//
/// Where the key set comes from
#[async_trait]
pub trait JwksSource: Debug + Send + Sync {
	async fn fetch(&self) -> ClResult<JwkSet>;
}

/// Fetches the key set from `{base_url}/auth/v1/.well-known/jwks.json`
#[derive(Debug, Clone)]
pub struct HttpJwksSource {
	client: reqwest::Client,
	base_url: Option<Box<str>>,
}

impl HttpJwksSource {
	/// A missing base URL is reported at first fetch, not here
	pub fn new(base_url: Option<&str>) -> Self {
		let base_url = base_url
			.map(|url| url.trim().trim_end_matches('/'))
			.filter(|url| !url.is_empty())
			.map(Box::from);
		HttpJwksSource { client: reqwest::Client::new(), base_url }
	}

	pub fn jwks_url(&self) -> ClResult<String> {
		let base_url = self.base_url.as_deref().ok_or_else(|| {
			Error::ConfigError("AUTH_PROVIDER_URL (or SUPABASE_URL) is not set".into())
		})?;
		Ok(format!("{}{}", base_url, JWKS_PATH))
	}
}

#[async_trait]
impl JwksSource for HttpJwksSource {
	async fn fetch(&self) -> ClResult<JwkSet> {
		let url = self.jwks_url()?;
		debug!("Fetching JWKS from {}", url);

		let res = self
			.client
			.get(&url)
			.timeout(JWKS_FETCH_TIMEOUT)
			.send()
			.await
			.and_then(reqwest::Response::error_for_status)
			.map_err(|err| {
				warn!("JWKS fetch failed: {}", err);
				Error::ServiceUnavailable("JWKS fetch failed".into())
			})?;

		res.json::<JwkSet>().await.map_err(|err| {
			warn!("JWKS response is not a key set: {}", err);
			Error::ServiceUnavailable("JWKS response is not a key set".into())
		})
	}
}

/// Serves a fixed key set. Used by tests and for pinned deployments.
#[derive(Debug, Clone)]
pub struct StaticJwksSource(pub JwkSet);

#[async_trait]
impl JwksSource for StaticJwksSource {
	async fn fetch(&self) -> ClResult<JwkSet> {
		Ok(self.0.clone())
	}
}

// JwksCache //
//***********//
/// Lazily populated key set. A failed fetch leaves the cache empty, so the
/// next request tries again.
#[derive(Debug)]
pub struct JwksCache {
	source: Arc<dyn JwksSource>,
	keys: RwLock<Option<Arc<JwkSet>>>,
}

impl JwksCache {
	pub fn new(source: Arc<dyn JwksSource>) -> Self {
		JwksCache { source, keys: RwLock::new(None) }
	}

	pub async fn get(&self) -> ClResult<Arc<JwkSet>> {
		if let Some(keys) = &*self.keys.read().await {
			return Ok(Arc::clone(keys));
		}

		let mut keys = self.keys.write().await;
		// Another request may have filled it while we waited for the lock
		if let Some(keys) = &*keys {
			return Ok(Arc::clone(keys));
		}
		let fetched = Arc::new(self.source.fetch().await?);
		info!("JWKS loaded: {} key(s)", fetched.keys.len());
		*keys = Some(Arc::clone(&fetched));
		Ok(fetched)
	}

	/// Drops the cached keys; the next `get` fetches again
	pub async fn invalidate(&self) {
		*self.keys.write().await = None;
	}

	/// Fetches the key set now, replacing the cached one on success
	pub async fn refresh(&self) -> ClResult<Arc<JwkSet>> {
		let fetched = Arc::new(self.source.fetch().await?);
		*self.keys.write().await = Some(Arc::clone(&fetched));
		Ok(fetched)
	}

	pub async fn is_loaded(&self) -> bool {
		self.keys.read().await.is_some()
	}
}

// TokenVerifier //
//***************//
/// Identity established from a verified token
#[derive(Debug, Clone)]
pub struct VerifiedToken {
	pub user_id: Box<str>,
	pub email: Option<Box<str>>,
	pub name: Option<Box<str>>,
	pub claims: serde_json::Value,
}

#[derive(Debug)]
pub struct TokenVerifier {
	cache: JwksCache,
}

impl TokenVerifier {
	pub fn new(source: Arc<dyn JwksSource>) -> Self {
		TokenVerifier { cache: JwksCache::new(source) }
	}

	pub fn from_provider_url(base_url: Option<&str>) -> Self {
		Self::new(Arc::new(HttpJwksSource::new(base_url)))
	}

	pub fn cache(&self) -> &JwksCache {
		&self.cache
	}

	/// Verifies the raw value of an `Authorization` header
	pub async fn verify(&self, auth_header: Option<&str>) -> ClResult<VerifiedToken> {
		let token = bearer_token(auth_header)?;

		let header = jsonwebtoken::decode_header(token).map_err(|err| {
			debug!("Undecodable token header: {}", err);
			AuthError::InvalidToken
		})?;
		let kid = header.kid.as_deref().ok_or(AuthError::MissingKeyId)?;

		let keys = self.cache.get().await?;
		let jwk = keys.find(kid).ok_or(AuthError::UnknownSigningKey)?;
		let key = DecodingKey::from_jwk(jwk).map_err(|err| {
			warn!("Unusable JWK {}: {}", kid, err);
			AuthError::InvalidToken
		})?;

		let mut validation = Validation::new(header.alg);
		validation.validate_aud = false;
		// Expiry is enforced when present, but tokens without `exp` are accepted
		validation.required_spec_claims.clear();
		let data = jsonwebtoken::decode::<serde_json::Value>(token, &key, &validation)
			.map_err(|err| {
				debug!("Token rejected: {}", err);
				AuthError::InvalidToken
			})?;

		verified_from_claims(data.claims)
	}
}

/// Extracts the token from `Bearer <token>`
fn bearer_token(auth_header: Option<&str>) -> Result<&str, AuthError> {
	let token = auth_header
		.and_then(|h| h.strip_prefix("Bearer "))
		.map(str::trim)
		.ok_or(AuthError::MissingOrMalformedHeader)?;
	if token.is_empty() {
		return Err(AuthError::MissingOrMalformedHeader);
	}
	Ok(token)
}

fn claim_str<'a>(value: &'a serde_json::Value, key: &str) -> Option<&'a str> {
	value.get(key).and_then(serde_json::Value::as_str).filter(|s| !s.is_empty())
}

fn verified_from_claims(claims: serde_json::Value) -> ClResult<VerifiedToken> {
	let user_id = claim_str(&claims, "sub").ok_or(AuthError::MissingSubject)?.into();
	let email = claim_str(&claims, "email").map(Box::from);
	let name = claims
		.get("user_metadata")
		.and_then(|meta| claim_str(meta, "name").or_else(|| claim_str(meta, "full_name")))
		.map(Box::from);

	Ok(VerifiedToken { user_id, email, name, claims })
}

#[cfg(test)]
mod tests {
	use super::*;
	use jsonwebtoken::{Algorithm, EncodingKey, Header};
	use serde_json::json;
	use std::sync::atomic::{AtomicUsize, Ordering};

	pub const TEST_KID: &str = "test-key";
	pub const TEST_SECRET: &[u8] = b"decision-ledger-test-signing-secret!";

	pub fn test_jwks() -> JwkSet {
		serde_json::from_value(json!({
			"keys": [{
				"kty": "oct",
				"kid": TEST_KID,
				"alg": "HS256",
				"k": "ZGVjaXNpb24tbGVkZ2VyLXRlc3Qtc2lnbmluZy1zZWNyZXQh"
			}]
		}))
		.expect("valid JWKS")
	}

	pub fn sign(kid: Option<&str>, claims: &serde_json::Value) -> String {
		let mut header = Header::new(Algorithm::HS256);
		header.kid = kid.map(str::to_string);
		jsonwebtoken::encode(&header, claims, &EncodingKey::from_secret(TEST_SECRET))
			.expect("token encodes")
	}

	pub fn exp_in(secs: i64) -> i64 {
		Timestamp::now().0 + secs
	}

	/// Counts fetches so cache behavior can be observed
	#[derive(Debug, Default)]
	struct CountingSource(AtomicUsize);

	#[async_trait]
	impl JwksSource for CountingSource {
		async fn fetch(&self) -> ClResult<JwkSet> {
			self.0.fetch_add(1, Ordering::SeqCst);
			Ok(test_jwks())
		}
	}

	fn verifier() -> TokenVerifier {
		TokenVerifier::new(Arc::new(StaticJwksSource(test_jwks())))
	}

	fn auth_err(res: ClResult<VerifiedToken>) -> AuthError {
		match res {
			Err(Error::Unauthorized(err)) => err,
			other => panic!("expected auth error, got {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_verify_valid_token() {
		let token = sign(
			Some(TEST_KID),
			&json!({
				"sub": "user-1",
				"exp": exp_in(600),
				"aud": "authenticated",
				"email": "alice@example.com",
				"user_metadata": { "full_name": "Alice A." }
			}),
		);
		let verified = verifier().verify(Some(&format!("Bearer {}", token))).await.unwrap();

		assert_eq!(verified.user_id.as_ref(), "user-1");
		assert_eq!(verified.email.as_deref(), Some("alice@example.com"));
		assert_eq!(verified.name.as_deref(), Some("Alice A."));
		assert_eq!(verified.claims["aud"], "authenticated");
	}

	#[tokio::test]
	async fn test_malformed_header() {
		let v = verifier();
		assert_eq!(auth_err(v.verify(None).await), AuthError::MissingOrMalformedHeader);
		assert_eq!(auth_err(v.verify(Some("Token abc")).await), AuthError::MissingOrMalformedHeader);
		assert_eq!(auth_err(v.verify(Some("Bearer   ")).await), AuthError::MissingOrMalformedHeader);
		assert_eq!(auth_err(v.verify(Some("bearer abc")).await), AuthError::MissingOrMalformedHeader);
	}

	#[tokio::test]
	async fn test_garbage_token_is_invalid() {
		let v = verifier();
		assert_eq!(auth_err(v.verify(Some("Bearer not-a-jwt")).await), AuthError::InvalidToken);
	}

	#[tokio::test]
	async fn test_missing_and_unknown_kid() {
		let v = verifier();
		let claims = json!({ "sub": "user-1", "exp": exp_in(600) });

		let token = sign(None, &claims);
		assert_eq!(auth_err(v.verify(Some(&format!("Bearer {}", token))).await), AuthError::MissingKeyId);

		let token = sign(Some("rotated-away"), &claims);
		assert_eq!(
			auth_err(v.verify(Some(&format!("Bearer {}", token))).await),
			AuthError::UnknownSigningKey
		);
	}

	#[tokio::test]
	async fn test_expired_and_forged_tokens() {
		let v = verifier();

		let token = sign(Some(TEST_KID), &json!({ "sub": "user-1", "exp": exp_in(-3600) }));
		assert_eq!(auth_err(v.verify(Some(&format!("Bearer {}", token))).await), AuthError::InvalidToken);

		let mut header = Header::new(Algorithm::HS256);
		header.kid = Some(TEST_KID.into());
		let forged = jsonwebtoken::encode(
			&header,
			&json!({ "sub": "user-1", "exp": exp_in(600) }),
			&EncodingKey::from_secret(b"some-other-secret"),
		)
		.unwrap();
		assert_eq!(auth_err(v.verify(Some(&format!("Bearer {}", forged))).await), AuthError::InvalidToken);
	}

	#[tokio::test]
	async fn test_token_without_exp_is_accepted() {
		let token = sign(Some(TEST_KID), &json!({ "sub": "user-1" }));
		let verified = verifier().verify(Some(&format!("Bearer {}", token))).await.unwrap();
		assert_eq!(verified.user_id.as_ref(), "user-1");
	}

	#[tokio::test]
	async fn test_missing_subject() {
		let v = verifier();
		let token = sign(Some(TEST_KID), &json!({ "exp": exp_in(600) }));
		assert_eq!(auth_err(v.verify(Some(&format!("Bearer {}", token))).await), AuthError::MissingSubject);

		let token = sign(Some(TEST_KID), &json!({ "sub": "", "exp": exp_in(600) }));
		assert_eq!(auth_err(v.verify(Some(&format!("Bearer {}", token))).await), AuthError::MissingSubject);
	}

	#[tokio::test]
	async fn test_cache_fetches_once_until_invalidated() {
		let source = Arc::new(CountingSource::default());
		let cache = JwksCache::new(source.clone());
		assert!(!cache.is_loaded().await);

		cache.get().await.unwrap();
		cache.get().await.unwrap();
		assert_eq!(source.0.load(Ordering::SeqCst), 1);
		assert!(cache.is_loaded().await);

		cache.invalidate().await;
		assert!(!cache.is_loaded().await);
		cache.get().await.unwrap();
		assert_eq!(source.0.load(Ordering::SeqCst), 2);

		cache.refresh().await.unwrap();
		assert_eq!(source.0.load(Ordering::SeqCst), 3);
	}

	#[tokio::test]
	async fn test_missing_provider_url_is_config_error() {
		let v = TokenVerifier::from_provider_url(None);
		let token = sign(Some(TEST_KID), &json!({ "sub": "user-1", "exp": exp_in(600) }));

		let res = v.verify(Some(&format!("Bearer {}", token))).await;
		assert!(matches!(res, Err(Error::ConfigError(_))));
		assert!(!v.cache().is_loaded().await);
	}

	#[test]
	fn test_jwks_url() {
		let source = HttpJwksSource::new(Some("https://abc.supabase.co/"));
		assert_eq!(source.jwks_url().unwrap(), "https://abc.supabase.co/auth/v1/.well-known/jwks.json");
		assert!(HttpJwksSource::new(Some("  ")).jwks_url().is_err());
	}
}

// vim: ts=4
