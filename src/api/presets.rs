// self
use crate::{
	_prelude::*,
	api::Cx1Client,
	http::ApiHttpClient,
	model::{self, Preset, Query},
	obs::{self, Surface},
};

impl<C> Cx1Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Lists the scan presets available to the tenant.
	pub async fn get_presets(&self) -> Result<Vec<Preset>> {
		obs::observe(Surface::Product, "get_presets", "", async {
			let body = self.get("/api/queries/presets").await?;
			let presets = model::decode_presets(&body)?;

			tracing::trace!(count = presets.len(), "Listed presets.");

			Ok(presets)
		})
		.await
	}

	/// Lists the queries known to the tenant.
	pub async fn get_queries(&self) -> Result<Vec<Query>> {
		obs::observe(Surface::Product, "get_queries", "", async {
			let body = self.get("/api/queries").await?;
			let queries = model::decode_queries(&body)?;

			tracing::trace!(count = queries.len(), "Listed queries.");

			Ok(queries)
		})
		.await
	}
}
