//! Authenticated request helpers shared by every operation.
//!
//! Each helper issues exactly one request and returns the raw body whatever the status code;
//! non-2xx statuses are only logged. Product API paths are joined onto
//! [`ClientConfig::api_url`](crate::config::ClientConfig::api_url) and identity admin paths onto
//! the tenant realm of [`ClientConfig::iam_url`](crate::config::ClientConfig::iam_url).

// std
use std::path::Path;
// self
use crate::{
	_prelude::*,
	api::Cx1Client,
	error::TransportError,
	http::{
		self, ApiHttpClient, ApiRequest, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE,
		HttpMethod, JSON_CONTENT_TYPE, JsonObject, ZIP_CONTENT_TYPE,
	},
	obs::{self, Surface},
};

impl<C> Cx1Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Authenticated GET against the product API.
	pub async fn get(&self, path: &str) -> Result<Vec<u8>> {
		let url = self.api_url(HttpMethod::Get, path)?;

		self.send(ApiRequest::new(HttpMethod::Get, url)).await
	}

	/// Authenticated GET against an absolute URL, e.g. a report download link.
	pub async fn get_absolute(&self, url: Url) -> Result<Vec<u8>> {
		self.send(ApiRequest::new(HttpMethod::Get, url)).await
	}

	/// Sends `body` as JSON to the product API.
	pub async fn request_json(
		&self,
		method: HttpMethod,
		path: &str,
		body: &JsonObject,
	) -> Result<Vec<u8>> {
		let bytes =
			serde_json::to_vec(body).map_err(|e| TransportError::build(method, path, e))?;

		self.request_bytes(method, path, bytes).await
	}

	/// Sends pre-serialized JSON to the product API, e.g. a top-level array.
	pub async fn request_bytes(
		&self,
		method: HttpMethod,
		path: &str,
		body: Vec<u8>,
	) -> Result<Vec<u8>> {
		let url = self.api_url(method, path)?;
		let request =
			ApiRequest::new(method, url).with_header(CONTENT_TYPE, JSON_CONTENT_TYPE).with_body(body);

		self.send(request).await
	}

	/// Authenticated GET against the identity admin API of the tenant realm.
	pub async fn get_iam(&self, path: &str) -> Result<Vec<u8>> {
		let url = self.iam_url(HttpMethod::Get, path)?;

		self.send(ApiRequest::new(HttpMethod::Get, url)).await
	}

	/// Sends `body` as JSON to the identity admin API of the tenant realm.
	pub async fn post_iam(&self, path: &str, body: &JsonObject) -> Result<Vec<u8>> {
		let url = self.iam_url(HttpMethod::Post, path)?;
		let bytes = serde_json::to_vec(body)
			.map_err(|e| TransportError::build(HttpMethod::Post, path, e))?;
		let request = ApiRequest::new(HttpMethod::Post, url)
			.with_header(CONTENT_TYPE, JSON_CONTENT_TYPE)
			.with_body(bytes);

		self.send(request).await
	}

	/// Reads `file` into memory and PUTs it to a pre-signed upload URL.
	pub async fn put_file(&self, url: &Url, file: impl AsRef<Path>) -> Result<Vec<u8>> {
		let file = file.as_ref();
		let target = http::loggable_url(url);

		obs::observe(Surface::Upload, "put_file", &target, async {
			let bytes = std::fs::read(file)
				.map_err(|source| TransportError::Io { path: file.to_path_buf(), source })?;

			tracing::debug!(file = %file.display(), len = bytes.len(), "Uploading archive.");

			let request = ApiRequest::new(HttpMethod::Put, url.clone())
				.with_header(CONTENT_TYPE, ZIP_CONTENT_TYPE)
				.with_header(CONTENT_LENGTH, bytes.len().to_string())
				.with_body(bytes);

			self.send(request).await
		})
		.await
	}

	async fn send(&self, request: ApiRequest) -> Result<Vec<u8>> {
		let method = request.method;
		let target = request.loggable_url();
		let request = request.with_header(AUTHORIZATION, self.token.read().header_value());

		tracing::trace!(%method, url = %target, "Sending request.");

		let response = self.http_client.execute(request).await?;

		if !response.is_success() {
			tracing::debug!(
				%method,
				url = %target,
				status = response.status,
				len = response.body.len(),
				"Request returned a non-success status."
			);
		}

		Ok(response.body)
	}

	fn api_url(&self, method: HttpMethod, path: &str) -> Result<Url, TransportError> {
		self.config.api_endpoint(path).map_err(|e| TransportError::build(method, path, e))
	}

	fn iam_url(&self, method: HttpMethod, path: &str) -> Result<Url, TransportError> {
		self.config.iam_admin_endpoint(path).map_err(|e| TransportError::build(method, path, e))
	}
}

/// Encodes `pairs` as a query string (`a=1&b=2`), form-style.
pub(crate) fn query(pairs: &[(&str, &str)]) -> String {
	url::form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish()
}
