// self
use crate::{
	_prelude::*,
	api::{Cx1Client, groups::require, transport},
	http::{ApiHttpClient, HttpMethod, JsonObject},
	model::{self, GroupId, Project, ProjectId},
	obs::{self, Surface},
};

impl<C> Cx1Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a project in `group`, tagged with the configured origin and criticality.
	pub async fn create_project(
		&self,
		name: &str,
		group: &GroupId,
		tags: &BTreeMap<String, String>,
	) -> Result<Project> {
		obs::observe(Surface::Product, "create_project", name, async {
			require("project name", name)?;

			let defaults = &self.config.defaults;
			let mut body = JsonObject::new();

			body.insert("name".into(), Value::from(name));
			body.insert("groups".into(), Value::from(vec![group.to_string()]));
			body.insert(
				"tags".into(),
				Value::Object(
					tags.iter().map(|(key, value)| (key.clone(), Value::from(value.as_str()))).collect(),
				),
			);
			body.insert("criticality".into(), Value::from(defaults.project_criticality));
			body.insert("origin".into(), Value::from(defaults.project_origin.as_str()));

			tracing::debug!(group = %group, "Creating project.");

			let response = self.request_json(HttpMethod::Post, "/api/projects", &body).await?;

			Ok(model::decode_project(&response)?)
		})
		.await
	}

	/// Lists projects.
	///
	/// Only the first page the platform returns is decoded.
	pub async fn get_projects(&self) -> Result<Vec<Project>> {
		obs::observe(Surface::Product, "get_projects", "", async {
			let body = self.get("/api/projects/").await?;
			let projects = model::decode_project_page(&body)?;

			tracing::trace!(count = projects.len(), "Listed projects.");

			Ok(projects)
		})
		.await
	}

	/// Fetches one project.
	pub async fn get_project_by_id(&self, id: &ProjectId) -> Result<Project> {
		obs::observe(Surface::Product, "get_project_by_id", id, async {
			let body = self.get(&format!("/projects/{id}")).await?;

			Ok(model::decode_project(&body)?)
		})
		.await
	}

	/// Finds the project whose name equals `name` exactly.
	pub async fn get_project_by_name(&self, name: &str) -> Result<Project> {
		obs::observe(Surface::Product, "get_project_by_name", name, async {
			let path = format!("/api/projects?{}", transport::query(&[("name", name)]));
			let body = self.get(&path).await?;
			let projects = model::decode_project_page(&body)?;

			tracing::trace!(count = projects.len(), "Project search returned candidates.");

			projects
				.into_iter()
				.find(|project| project.name == name)
				.ok_or_else(|| Error::NotFound { kind: "project", name: name.to_owned() })
		})
		.await
	}

	/// Lists projects filtered by name and group on the server side. Either filter may be
	/// omitted; with neither, this lists every project on the first page.
	pub async fn get_projects_by_name_and_group(
		&self,
		name: Option<&str>,
		group: Option<&GroupId>,
	) -> Result<Vec<Project>> {
		let subject = name.unwrap_or_default();

		obs::observe(Surface::Product, "get_projects_by_name_and_group", subject, async {
			let mut filters = Vec::with_capacity(2);

			if let Some(group) = group {
				filters.push(("groups", &**group));
			}
			if let Some(name) = name.filter(|name| !name.is_empty()) {
				filters.push(("name", name));
			}

			let path = if filters.is_empty() {
				"/projects/".to_owned()
			} else {
				format!("/projects/?{}", transport::query(&filters))
			};
			let body = self.get(&path).await?;

			Ok(model::decode_project_page(&body)?)
		})
		.await
	}
}
