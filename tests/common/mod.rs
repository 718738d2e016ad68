//! Helpers shared by the integration tests.

#![allow(dead_code)]

// std
use std::{collections::VecDeque, sync::Arc};
// crates.io
use cx1_client::{
	api::{Cx1Client, ReqwestCx1Client},
	auth::BearerToken,
	config::ClientConfig,
	error::TransportError,
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpFuture, ReqwestHttpClient},
	model::TenantId,
	reqwest::Client,
	url::Url,
};
use httpmock::MockServer;
use parking_lot::Mutex;

pub const TENANT: &str = "acme";
pub const TOKEN: &str = "test-token";
pub const BEARER: &str = "Bearer test-token";

/// Configuration with both endpoints pointing at `base`.
pub fn config(base: &str) -> ClientConfig {
	let url = Url::parse(base).expect("Mock base URL should parse.");

	ClientConfig::builder(TenantId::new(TENANT).expect("Tenant fixture should be valid."))
		.api_url(url.clone())
		.iam_url(url)
		.build()
		.expect("Configuration fixture should build.")
}

pub fn token() -> BearerToken {
	BearerToken::new(TOKEN).expect("Token fixture should be valid.")
}

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
/// `httpmock` during tests.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Reqwest-backed client talking to `server`, already holding [`TOKEN`].
pub fn mock_client(server: &MockServer) -> ReqwestCx1Client {
	Cx1Client::with_token(test_reqwest_http_client(), config(&server.base_url()), token())
}

/// Client over a [`RecordingHttpClient`], already holding [`TOKEN`].
pub fn recording_client(
	http: &Arc<RecordingHttpClient>,
) -> Cx1Client<RecordingHttpClient> {
	Cx1Client::with_token(http.clone(), config("https://cx1.example.com"), token())
}

/// Fake transport replaying queued responses and keeping every request it receives.
///
/// When the queue runs dry it answers `404` with an empty body.
#[derive(Default)]
pub struct RecordingHttpClient {
	responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
	requests: Mutex<Vec<ApiRequest>>,
}
impl RecordingHttpClient {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn respond(&self, status: u16, body: impl Into<Vec<u8>>) {
		self.responses.lock().push_back(Ok(ApiResponse::new(status, body)));
	}

	pub fn fail(&self, error: TransportError) {
		self.responses.lock().push_back(Err(error));
	}

	pub fn requests(&self) -> Vec<ApiRequest> {
		self.requests.lock().clone()
	}

	pub fn calls(&self) -> usize {
		self.requests.lock().len()
	}

	/// JSON body of the `index`-th request.
	pub fn json_body(&self, index: usize) -> serde_json::Value {
		let requests = self.requests.lock();
		let body = requests[index].body.as_deref().expect("Request should carry a body.");

		serde_json::from_slice(body).expect("Request body should be JSON.")
	}
}
impl ApiHttpClient for RecordingHttpClient {
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Result<ApiResponse, TransportError>> {
		self.requests.lock().push(request);

		let next =
			self.responses.lock().pop_front().unwrap_or_else(|| Ok(ApiResponse::new(404, "")));

		Box::pin(async move { next })
	}
}
