// self
use crate::{
	_prelude::*,
	api::{Cx1Client, transport},
	http::{ApiHttpClient, HttpMethod},
	model::{self, ProjectId, Scan, ScanConfiguration, ScanId, ScanSource},
	obs::{self, Surface},
};

impl<C> Cx1Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Fetches one scan.
	pub async fn get_scan(&self, id: &ScanId) -> Result<Scan> {
		obs::observe(Surface::Product, "get_scan", id, async {
			let body = self.get(&format!("/scans/{id}")).await?;

			Ok(model::decode_scan(&body)?)
		})
		.await
	}

	/// Lists up to `limit` scans of a project, oldest first.
	///
	/// A single page starting at offset zero is requested; older history beyond `limit` is not
	/// fetched.
	pub async fn get_last_scans(&self, project: &ProjectId, limit: u32) -> Result<Vec<Scan>> {
		obs::observe(Surface::Product, "get_last_scans", project, async {
			let limit = limit.to_string();
			let path = format!(
				"/scans?{}",
				transport::query(&[
					("limit", limit.as_str()),
					("offset", "0"),
					("projectId", &**project),
					("sort", "+created_at"),
				])
			);
			let body = self.get(&path).await?;
			let scans = model::decode_scans(&body)?;

			tracing::trace!(count = scans.len(), "Listed scans.");

			Ok(scans)
		})
		.await
	}

	/// Starts a scan from a source given by its wire tag, `upload` or `git`.
	///
	/// Any other tag is rejected before a request is sent.
	pub async fn scan_project(
		&self,
		project: &ProjectId,
		source_type: &str,
		source_url: &str,
		branch: &str,
		settings: &[ScanConfiguration],
	) -> Result<Scan> {
		let source = ScanSource::from_tag(source_type, source_url).map_err(|e| {
			tracing::warn!(project = %project, error = %e, "Rejected scan request.");

			Error::from(e).in_call("scan_project", project.to_string())
		})?;

		self.start_scan(project, &source, branch, settings).await
	}

	/// Starts a scan of an archive previously uploaded to `upload_url`.
	pub async fn scan_project_zip(
		&self,
		project: &ProjectId,
		upload_url: &str,
		branch: &str,
		settings: &[ScanConfiguration],
	) -> Result<Scan> {
		let source = ScanSource::Upload { upload_url: upload_url.to_owned() };

		self.start_scan(project, &source, branch, settings).await
	}

	/// Starts a scan of a git repository.
	pub async fn scan_project_git(
		&self,
		project: &ProjectId,
		repo_url: &str,
		branch: &str,
		settings: &[ScanConfiguration],
	) -> Result<Scan> {
		let source = ScanSource::Git { repo_url: repo_url.to_owned() };

		self.start_scan(project, &source, branch, settings).await
	}

	async fn start_scan(
		&self,
		project: &ProjectId,
		source: &ScanSource,
		branch: &str,
		settings: &[ScanConfiguration],
	) -> Result<Scan> {
		let op = match source {
			ScanSource::Upload { .. } => "scan_project_zip",
			ScanSource::Git { .. } => "scan_project_git",
		};

		obs::observe(Surface::Product, op, project, async {
			let body = model::scan_request(project, source, branch, settings);

			tracing::debug!(source = source.tag(), branch, "Starting scan.");

			let response = self.request_json(HttpMethod::Post, "/scans", &body).await?;

			Ok(model::decode_scan(&response)?)
		})
		.await
	}
}
