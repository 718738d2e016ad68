// self
use crate::{
	_prelude::*,
	api::Cx1Client,
	http::{self, ApiHttpClient, HttpMethod},
	model::{self, ProjectId, ReportFormat, ReportId, ReportStatus, ScanId},
	obs::{self, Surface},
};

impl<C> Cx1Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Asks the platform to render a report for a scan and returns the report job id.
	pub async fn request_new_report(
		&self,
		scan: &ScanId,
		project: &ProjectId,
		branch: &str,
		format: ReportFormat,
	) -> Result<ReportId> {
		obs::observe(Surface::Product, "request_new_report", scan, async {
			let body = model::report_request(scan, project, branch, format);
			let response = self.request_json(HttpMethod::Post, "/reports", &body).await?;
			let id = model::decode_report_id(&response)?;

			tracing::info!(report = %id, %format, "Requested report generation.");

			Ok(id)
		})
		.await
	}

	/// Reads the generation status of a report.
	pub async fn get_report_status(&self, id: &ReportId) -> Result<ReportStatus> {
		obs::observe(Surface::Product, "get_report_status", id, async {
			let body = self.get(&format!("/reports/{id}")).await?;

			Ok(model::decode_report_status(&body, id)?)
		})
		.await
	}

	/// Downloads a generated report.
	///
	/// Absolute URLs, as found in [`ReportStatus::url`], are fetched as given; anything else is
	/// treated as a path on the product API.
	pub async fn download_report(&self, url: &str) -> Result<Vec<u8>> {
		match Url::parse(url) {
			Ok(absolute) if matches!(absolute.scheme(), "http" | "https") => {
				let subject = http::loggable_url(&absolute);

				obs::observe(Surface::Product, "download_report", &subject, async {
					self.get_absolute(absolute).await
				})
				.await
			},
			_ => obs::observe(Surface::Product, "download_report", url, self.get(url)).await,
		}
	}
}
