// std
use std::path::Path;
// self
use crate::{
	_prelude::*,
	api::Cx1Client,
	decode,
	error::DecodeError,
	http::{ApiHttpClient, HttpMethod, JsonObject},
	obs::{self, Surface},
};

impl<C> Cx1Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Obtains a pre-signed URL to PUT a source archive to.
	pub async fn get_upload_url(&self) -> Result<Url> {
		obs::observe(Surface::Product, "get_upload_url", "", async {
			let body =
				self.request_json(HttpMethod::Post, "/api/uploads", &JsonObject::new()).await?;

			Ok(decode_upload_url(&body)?)
		})
		.await
	}

	/// Uploads `file` and returns the URL to pass to
	/// [`scan_project_zip`](Self::scan_project_zip).
	///
	/// Issues exactly two requests: one for the pre-signed URL, one PUT of the archive.
	pub async fn upload_file(&self, file: impl AsRef<Path>) -> Result<Url> {
		let url = self.get_upload_url().await?;

		self.put_file(&url, file).await?;

		Ok(url)
	}
}

fn decode_upload_url(bytes: &[u8]) -> Result<Url, DecodeError> {
	decode::decode_object("upload", bytes, |reader| {
		let raw = reader.required_str("url")?;

		Url::parse(raw).map_err(|source| DecodeError::InvalidUrl {
			record: "upload",
			field: "url",
			source,
		})
	})
}
