// self
use crate::{
	_prelude::*,
	api::Cx1Client,
	http::ApiHttpClient,
	model::{self, User},
	obs::{self, Surface},
};

impl<C> Cx1Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Lists the users of the tenant realm, service accounts included.
	pub async fn get_users(&self) -> Result<Vec<User>> {
		obs::observe(Surface::Identity, "get_users", "", async {
			let body = self.get_iam("/users?briefRepresentation=true").await?;
			let users = model::decode_users(&body)?;

			tracing::trace!(count = users.len(), "Listed users.");

			Ok(users)
		})
		.await
	}
}
