//! Transport primitives for authenticated API calls.
//!
//! The module exposes [`ApiHttpClient`] together with the crate-owned [`ApiRequest`] and
//! [`ApiResponse`] types so downstream crates can plug in their own HTTP stack without the
//! client depending on reqwest-specific structures. Implementations execute exactly one
//! request per call and hand back the raw status and body; classifying statuses is left to
//! the callers that decode the payload.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// `Authorization` header name.
pub const AUTHORIZATION: &str = "authorization";
/// `Content-Type` header name.
pub const CONTENT_TYPE: &str = "content-type";
/// `Content-Length` header name.
pub const CONTENT_LENGTH: &str = "content-length";

/// Media type of JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// Media type of OIDC token requests.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
/// Media type of source archive uploads.
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Keyed JSON map sent as the body of JSON requests.
pub type JsonObject = serde_json::Map<String, Value>;

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Abstraction over HTTP transports able to execute a single request.
///
/// The trait is the client's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so one transport can be shared by every clone of a client, and
/// must not retry: each call maps to exactly one round trip.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes `request` and returns the status and full body, whatever the status code.
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Result<ApiResponse, TransportError>>;
}

/// HTTP methods used by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
}
impl HttpMethod {
	/// Returns the method token as sent on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Patch => "PATCH",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outbound request handed to an [`ApiHttpClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Absolute target URL.
	pub url: Url,
	/// Header name/value pairs; names are lowercase.
	pub headers: Vec<(&'static str, String)>,
	/// Request body, if any.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Creates a request without headers or body.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { method, url, headers: Vec::new(), body: None }
	}

	/// Appends a header.
	pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
		self.headers.push((name, value.into()));

		self
	}

	/// Sets the request body.
	pub fn with_body(mut self, body: Vec<u8>) -> Self {
		self.body = Some(body);

		self
	}

	/// Returns the first value of the named header, compared case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Target URL with the query string and fragment removed, safe for logs and errors.
	pub fn loggable_url(&self) -> String {
		loggable_url(&self.url)
	}
}
impl Debug for ApiRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers = self
			.headers
			.iter()
			.map(|(name, value)| {
				if name.eq_ignore_ascii_case(AUTHORIZATION) {
					(*name, "<redacted>")
				} else {
					(*name, value.as_str())
				}
			})
			.collect::<Vec<_>>();

		f.debug_struct("ApiRequest")
			.field("method", &self.method)
			.field("url", &self.loggable_url())
			.field("headers", &headers)
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.finish()
	}
}

/// Raw response returned by an [`ApiHttpClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Full response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Creates a response from a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns true for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Pre-signed upload URLs and report downloads are absolute URLs issued by the platform, so
/// the default client keeps reqwest's redirect policy.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Result<ApiResponse, TransportError>> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = request.method;
			let target = request.loggable_url();
			let ApiRequest { url, headers, body, .. } = request;
			let mut builder = client.request(reqwest_method(method), url);

			for (name, value) in headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = body {
				builder = builder.body(body);
			}

			let outbound =
				builder.build().map_err(|e| TransportError::build(method, target.clone(), e))?;
			let response = client
				.execute(outbound)
				.await
				.map_err(|e| TransportError::network(method, target.clone(), e))?;
			let status = response.status().as_u16();
			let body =
				response.bytes().await.map_err(|e| TransportError::body(method, target, e))?;

			Ok(ApiResponse { status, body: body.to_vec() })
		})
	}
}

#[cfg(feature = "reqwest")]
fn reqwest_method(method: HttpMethod) -> reqwest::Method {
	match method {
		HttpMethod::Get => reqwest::Method::GET,
		HttpMethod::Post => reqwest::Method::POST,
		HttpMethod::Put => reqwest::Method::PUT,
		HttpMethod::Patch => reqwest::Method::PATCH,
	}
}

/// Drops the query string and fragment so pre-signed signatures never reach logs.
pub(crate) fn loggable_url(url: &Url) -> String {
	let mut view = url.clone();

	view.set_query(None);
	view.set_fragment(None);

	view.into()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn request() -> ApiRequest {
		ApiRequest::new(
			HttpMethod::Put,
			Url::parse("https://uploads.example.com/bucket/archive.zip?X-Amz-Signature=abc")
				.expect("Upload URL fixture should parse."),
		)
		.with_header(AUTHORIZATION, "Bearer secret-token")
		.with_header(CONTENT_TYPE, ZIP_CONTENT_TYPE)
		.with_body(vec![1, 2, 3])
	}

	#[test]
	fn header_lookup_ignores_case() {
		let request = request();

		assert_eq!(request.header("Content-Type"), Some(ZIP_CONTENT_TYPE));
		assert_eq!(request.header("x-missing"), None);
	}

	#[test]
	fn debug_output_hides_token_and_signature() {
		let rendered = format!("{:?}", request());

		assert!(!rendered.contains("secret-token"));
		assert!(!rendered.contains("X-Amz-Signature"));
		assert!(rendered.contains("<redacted>"));
		assert!(rendered.contains("https://uploads.example.com/bucket/archive.zip"));
	}

	#[test]
	fn success_range_covers_2xx_only() {
		assert!(ApiResponse::new(204, Vec::new()).is_success());
		assert!(!ApiResponse::new(302, Vec::new()).is_success());
		assert!(!ApiResponse::new(401, Vec::new()).is_success());
	}
}
