//! OIDC token exchange against the tenant realm.
//!
//! One form-encoded POST per call. The response is parsed as loosely typed JSON and the
//! `access_token` field is checked for presence and type before it becomes a
//! [`BearerToken`]. Nothing is retried; callers re-run the exchange when a token expires.

// self
use crate::{
	_prelude::*,
	auth::{BearerToken, Grant},
	config::ClientConfig,
	decode,
	error::{AuthError, TransportError},
	http::{ApiHttpClient, ApiRequest, CONTENT_TYPE, FORM_CONTENT_TYPE, HttpMethod},
	obs::{self, CallOutcome, CallSpan, Surface},
};

/// Exchanges `grant` for a bearer token at the tenant's token endpoint.
pub async fn authenticate<C>(
	http_client: &C,
	config: &ClientConfig,
	grant: &Grant,
) -> Result<BearerToken, AuthError>
where
	C: ?Sized + ApiHttpClient,
{
	const SURFACE: Surface = Surface::Token;

	let span = CallSpan::new(SURFACE, "authenticate", config.tenant.as_ref());

	obs::record_call_outcome(SURFACE, CallOutcome::Attempt);

	let result = span.instrument(exchange(http_client, config, grant)).await;

	match &result {
		Ok(token) => {
			tracing::debug!(token = %token.preview(), "Obtained bearer token.");
			obs::record_call_outcome(SURFACE, CallOutcome::Success);
		},
		Err(e) => {
			tracing::warn!(error = %e, "Authentication failed.");
			obs::record_call_outcome(SURFACE, CallOutcome::Failure);
		},
	}

	result
}

async fn exchange<C>(
	http_client: &C,
	config: &ClientConfig,
	grant: &Grant,
) -> Result<BearerToken, AuthError>
where
	C: ?Sized + ApiHttpClient,
{
	let endpoint = config.token_endpoint().map_err(|e| AuthError::Transport {
		source: TransportError::build(HttpMethod::Post, config.iam_url.as_str(), e),
	})?;

	tracing::info!(
		tenant = %config.tenant,
		grant_type = %grant.grant_type(),
		endpoint = %endpoint,
		"Authenticating with the identity provider."
	);

	let form = url::form_urlencoded::Serializer::new(String::new())
		.extend_pairs(grant.form_fields(&config.defaults))
		.finish();
	let request = ApiRequest::new(HttpMethod::Post, endpoint)
		.with_header(CONTENT_TYPE, FORM_CONTENT_TYPE)
		.with_body(form.into_bytes());
	let response = http_client
		.execute(request)
		.await
		.map_err(|source| AuthError::Transport { source })?;
	let status = response.status;
	let mut de = serde_json::Deserializer::from_slice(&response.body);
	let body: Value = serde_path_to_error::deserialize(&mut de).map_err(|source| {
		AuthError::MalformedResponse { len: response.body.len(), status, source }
	})?;

	match body.get("access_token") {
		Some(Value::String(token)) => BearerToken::new(token.as_str()),
		None | Some(Value::Null) => Err(rejection(&body, status)),
		Some(other) => Err(AuthError::InvalidAccessToken { found: decode::type_name(other) }),
	}
}

fn rejection(body: &Value, status: u16) -> AuthError {
	match body.get("error").and_then(Value::as_str) {
		Some(error) => AuthError::Rejected {
			status,
			error: error.to_owned(),
			description: body.get("error_description").and_then(Value::as_str).map(str::to_owned),
		},
		None => AuthError::MissingAccessToken { status },
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use parking_lot::Mutex;
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		http::{ApiResponse, HttpFuture},
		model::TenantId,
	};

	struct Canned {
		response: ApiResponse,
		seen: Mutex<Vec<ApiRequest>>,
	}
	impl Canned {
		fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
			Self { response: ApiResponse::new(status, body), seen: Mutex::new(Vec::new()) }
		}
	}
	impl ApiHttpClient for Canned {
		fn execute(
			&self,
			request: ApiRequest,
		) -> HttpFuture<'_, Result<ApiResponse, TransportError>> {
			self.seen.lock().push(request);

			let response = self.response.clone();

			Box::pin(async move { Ok(response) })
		}
	}

	fn config() -> ClientConfig {
		ClientConfig::builder(TenantId::new("acme").expect("Tenant fixture should be valid."))
			.api_url(Url::parse("https://eu.ast.checkmarx.net").expect("API URL should parse."))
			.iam_url(Url::parse("https://eu.iam.checkmarx.net").expect("IAM URL should parse."))
			.build()
			.expect("Configuration fixture should build.")
	}

	#[tokio::test]
	async fn api_key_grant_posts_form_and_reads_token() {
		let http = Canned::new(200, json!({ "access_token": "X" }).to_string());
		let token = authenticate(&http, &config(), &Grant::api_key("key-123"))
			.await
			.expect("Token should be extracted.");

		assert_eq!(token.expose(), "X");

		let seen = http.seen.lock();
		let request = &seen[0];
		let body = String::from_utf8(request.body.clone().expect("Form body should be set."))
			.expect("Form body should be UTF-8.");

		assert_eq!(seen.len(), 1);
		assert_eq!(request.method, HttpMethod::Post);
		assert_eq!(
			request.url.as_str(),
			"https://eu.iam.checkmarx.net/auth/realms/acme/protocol/openid-connect/token"
		);
		assert_eq!(request.header(CONTENT_TYPE), Some(FORM_CONTENT_TYPE));
		assert_eq!(body, "grant_type=refresh_token&client_id=ast-app&refresh_token=key-123");
	}

	#[tokio::test]
	async fn missing_and_mistyped_tokens_are_errors() {
		let missing = Canned::new(200, "{\"token_type\":\"Bearer\"}");
		let err = authenticate(&missing, &config(), &Grant::client_credentials("svc", "s"))
			.await
			.expect_err("Missing access_token must fail.");

		assert!(matches!(err, AuthError::MissingAccessToken { status: 200 }));

		let numeric = Canned::new(200, "{\"access_token\":42}");
		let err = authenticate(&numeric, &config(), &Grant::client_credentials("svc", "s"))
			.await
			.expect_err("Numeric access_token must fail.");

		assert!(matches!(err, AuthError::InvalidAccessToken { found: "a number" }));

		let empty = Canned::new(200, "{\"access_token\":\"\"}");
		let err = authenticate(&empty, &config(), &Grant::api_key("k"))
			.await
			.expect_err("Empty access_token must fail.");

		assert!(matches!(err, AuthError::EmptyAccessToken));
	}

	#[tokio::test]
	async fn oidc_errors_and_garbage_bodies() {
		let rejected = Canned::new(
			401,
			json!({ "error": "invalid_grant", "error_description": "Token is not active" })
				.to_string(),
		);
		let err = authenticate(&rejected, &config(), &Grant::api_key("stale"))
			.await
			.expect_err("Rejected grant must fail.");

		match err {
			AuthError::Rejected { status, error, description } => {
				assert_eq!(status, 401);
				assert_eq!(error, "invalid_grant");
				assert_eq!(description.as_deref(), Some("Token is not active"));
			},
			other => panic!("Unexpected error: {other:?}"),
		}

		let garbage = Canned::new(502, "<html>Bad Gateway</html>");
		let err = authenticate(&garbage, &config(), &Grant::api_key("k"))
			.await
			.expect_err("HTML bodies must fail.");

		assert!(matches!(err, AuthError::MalformedResponse { len: 24, status: 502, .. }));
	}
}
