//! Scan report generation.

// crates.io
use serde_json::json;
// self
use crate::{
	_prelude::*,
	decode::{self, FieldReader},
	error::DecodeError,
	http::JsonObject,
	model::{ProjectId, ReportId, ScanId},
};

/// File format of a generated report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
	/// PDF document.
	#[default]
	Pdf,
	/// JSON document.
	Json,
	/// Comma-separated values.
	Csv,
}
impl ReportFormat {
	/// Returns the `fileFormat` value sent to the platform.
	pub const fn as_str(self) -> &'static str {
		match self {
			ReportFormat::Pdf => "pdf",
			ReportFormat::Json => "json",
			ReportFormat::Csv => "csv",
		}
	}
}
impl Display for ReportFormat {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Generation status of a requested report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStatus {
	/// Report identifier.
	pub id: ReportId,
	/// Generation status, e.g. `requested`, `started`, `completed`, `failed`.
	pub status: String,
	/// Download URL, once the report is ready.
	pub url: Option<String>,
}
impl ReportStatus {
	/// Status reported once the document can be downloaded.
	pub const COMPLETED: &'static str = "completed";

	/// Whether the report can be downloaded.
	pub fn is_ready(&self) -> bool {
		self.status.eq_ignore_ascii_case(Self::COMPLETED) && self.url.is_some()
	}
}

/// Body of the report generation request.
pub(crate) fn report_request(
	scan: &ScanId,
	project: &ProjectId,
	branch: &str,
	format: ReportFormat,
) -> JsonObject {
	let mut body = JsonObject::new();

	body.insert("fileFormat".into(), Value::from(format.as_str()));
	body.insert("reportType".into(), Value::from("ui"));
	body.insert("reportName".into(), Value::from("scan-report"));
	body.insert(
		"data".into(),
		json!({
			"scanId": scan,
			"projectId": project,
			"branchName": branch,
			"sections": ["ScanSummary", "ExecutiveSummary", "ScanResults"],
			"scanners": ["SAST"],
			"host": "",
		}),
	);

	body
}

pub(crate) fn decode_report_id(bytes: &[u8]) -> Result<ReportId, DecodeError> {
	decode::decode_object("report request", bytes, |reader| reader.required_id("reportId"))
}

/// Decodes a report status. The record's own id wins; `requested` fills in when it is absent.
pub(crate) fn decode_report_status(
	bytes: &[u8],
	requested: &ReportId,
) -> Result<ReportStatus, DecodeError> {
	decode::decode_object("report status", bytes, |reader: &FieldReader<'_>| {
		Ok(ReportStatus {
			id: reader.optional_id("reportId")?.unwrap_or_else(|| requested.clone()),
			status: reader.required_str("status")?.to_owned(),
			url: reader.non_empty_str("url")?,
		})
	})
}
