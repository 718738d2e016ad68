// self
use crate::{
	_prelude::*,
	api::{Cx1Client, transport},
	error::{TransportError, ValidationError},
	http::{ApiHttpClient, HttpMethod},
	model::{self, ProjectConfigurationSetting, ProjectId},
	obs::{self, Surface},
};

impl<C> Cx1Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Reads the effective configuration of a project.
	pub async fn get_project_configuration(
		&self,
		project: &ProjectId,
	) -> Result<Vec<ProjectConfigurationSetting>> {
		obs::observe(Surface::Product, "get_project_configuration", project, async {
			let body = self.get(&configuration_path(project)).await?;

			Ok(model::decode_settings(&body)?)
		})
		.await
	}

	/// Applies a batch of overrides to a project. An empty batch is rejected locally.
	pub async fn update_project_configuration(
		&self,
		project: &ProjectId,
		settings: &[ProjectConfigurationSetting],
	) -> Result<()> {
		obs::observe(Surface::Product, "update_project_configuration", project, async {
			if settings.is_empty() {
				return Err(ValidationError::EmptySettings.into());
			}

			let path = configuration_path(project);
			let body = serde_json::to_vec(settings)
				.map_err(|e| TransportError::build(HttpMethod::Patch, path.as_str(), e))?;

			tracing::debug!(count = settings.len(), "Updating project configuration.");

			self.request_bytes(HttpMethod::Patch, &path, body).await?;

			Ok(())
		})
		.await
	}

	/// Sets the branch scanned by git handlers.
	pub async fn set_project_branch(
		&self,
		project: &ProjectId,
		branch: &str,
		allow_override: bool,
	) -> Result<()> {
		self.set_project_setting(
			project,
			ProjectConfigurationSetting::BRANCH,
			branch,
			allow_override,
		)
		.await
	}

	/// Sets the static analysis preset.
	pub async fn set_project_preset(
		&self,
		project: &ProjectId,
		preset: &str,
		allow_override: bool,
	) -> Result<()> {
		self.set_project_setting(
			project,
			ProjectConfigurationSetting::PRESET_NAME,
			preset,
			allow_override,
		)
		.await
	}

	/// Sets the static analysis language mode.
	pub async fn set_project_language_mode(
		&self,
		project: &ProjectId,
		language_mode: &str,
		allow_override: bool,
	) -> Result<()> {
		self.set_project_setting(
			project,
			ProjectConfigurationSetting::LANGUAGE_MODE,
			language_mode,
			allow_override,
		)
		.await
	}

	/// Sets the static analysis file filter.
	pub async fn set_project_file_filter(
		&self,
		project: &ProjectId,
		filter: &str,
		allow_override: bool,
	) -> Result<()> {
		self.set_project_setting(
			project,
			ProjectConfigurationSetting::FILE_FILTER,
			filter,
			allow_override,
		)
		.await
	}

	async fn set_project_setting(
		&self,
		project: &ProjectId,
		key: &'static str,
		value: &str,
		allow_override: bool,
	) -> Result<()> {
		let setting = ProjectConfigurationSetting::new(key, value, allow_override);

		self.update_project_configuration(project, std::slice::from_ref(&setting)).await
	}
}

fn configuration_path(project: &ProjectId) -> String {
	format!("/configuration/project?{}", transport::query(&[("project-id", &**project)]))
}
