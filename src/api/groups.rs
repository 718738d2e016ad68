// self
use crate::{
	_prelude::*,
	api::{Cx1Client, transport},
	error::ValidationError,
	http::{ApiHttpClient, JsonObject},
	model::{self, Group},
	obs::{self, Surface},
};

impl<C> Cx1Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a group in the tenant realm and returns it as listed afterwards.
	///
	/// The identity provider answers the create call with an empty body, so the group is
	/// looked up by name once it exists. Failures of the create call are returned as is.
	pub async fn create_group(&self, name: &str) -> Result<Group> {
		obs::observe(Surface::Identity, "create_group", name, async {
			require("group name", name)?;

			let mut body = JsonObject::new();

			body.insert("name".into(), Value::from(name));

			self.post_iam("/groups", &body).await?;

			self.find_group(name).await
		})
		.await
	}

	/// Lists the groups of the tenant realm.
	pub async fn get_groups(&self) -> Result<Vec<Group>> {
		obs::observe(Surface::Identity, "get_groups", "", async {
			let body = self.get_iam("/groups?briefRepresentation=true").await?;
			let groups = model::decode_groups(&body)?;

			tracing::trace!(count = groups.len(), "Listed groups.");

			Ok(groups)
		})
		.await
	}

	/// Finds the group whose name equals `name` exactly.
	///
	/// The server-side search matches prefixes and substrings; only an exact match is returned.
	pub async fn get_group_by_name(&self, name: &str) -> Result<Group> {
		obs::observe(Surface::Identity, "get_group_by_name", name, self.find_group(name)).await
	}

	async fn find_group(&self, name: &str) -> Result<Group> {
		let path = format!(
			"/groups?{}",
			transport::query(&[("briefRepresentation", "true"), ("search", name)])
		);
		let body = self.get_iam(&path).await?;
		let groups = model::decode_groups(&body)?;

		tracing::trace!(count = groups.len(), "Group search returned candidates.");

		groups
			.into_iter()
			.find(|group| group.name == name)
			.ok_or_else(|| Error::NotFound { kind: "group", name: name.to_owned() })
	}
}

pub(crate) fn require(what: &'static str, value: &str) -> Result<(), ValidationError> {
	if value.is_empty() {
		return Err(ValidationError::EmptyArgument { what });
	}

	Ok(())
}
