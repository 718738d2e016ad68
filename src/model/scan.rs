//! Scans, their metadata, and scan sources.

// crates.io
use serde_json::json;
// self
use crate::{
	_prelude::*,
	decode::{self, FieldReader},
	error::{DecodeError, ValidationError},
	http::JsonObject,
	model::{ProjectId, ScanId},
};

/// Scan of one project at one point in time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
	/// Scan identifier.
	pub id: ScanId,
	/// Overall status, e.g. `Queued`, `Running`, `Completed`, `Failed`.
	pub status: String,
	/// Per-stage status, in the order the platform reports them.
	pub status_details: Vec<ScanStatusDetail>,
	/// Scanned branch.
	pub branch: Option<String>,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Last status change.
	#[serde(with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
	/// Owning project.
	pub project_id: Option<ProjectId>,
	/// Owning project's name.
	pub project_name: Option<String>,
	/// User agent of the client that started the scan.
	pub user_agent: Option<String>,
	/// Account that started the scan.
	pub initiator: Option<String>,
	/// Free-form tags.
	pub tags: BTreeMap<String, String>,
	/// Engine configuration the scan ran with.
	pub metadata: ScanMetadata,
	/// Engines that took part.
	pub engines: Vec<String>,
	/// How the source was supplied, e.g. `zip` or `git`.
	pub source_type: Option<String>,
	/// Integration that supplied the source.
	pub source_origin: Option<String>,
}
impl Scan {
	/// Whether the static analysis engine ran incrementally.
	///
	/// Fails with [`Error::NotSet`] when no `sast` configuration carries an `incremental`
	/// value; absence is not read as `false`.
	pub fn is_incremental(&self) -> Result<bool> {
		self.metadata
			.configs
			.iter()
			.filter(|config| config.scan_type == ScanConfiguration::SAST)
			.find_map(|config| config.values.get(ScanConfiguration::INCREMENTAL))
			.map(|value| value == "true")
			.ok_or_else(|| Error::NotSet {
				what: "sast-engine incremental flag",
				subject: format!("Scan {}", self.id),
			})
	}

	pub(crate) fn from_reader(reader: &FieldReader<'_>) -> Result<Self, DecodeError> {
		let status_details = decode::decode_list(
			"scan status detail",
			reader.array("statusDetails")?,
			ScanStatusDetail::from_reader,
		);
		let metadata = match reader.optional_object("metadata")? {
			Some(object) => ScanMetadata::from_reader(&FieldReader::new("scan metadata", object))?,
			None => ScanMetadata::default(),
		};

		Ok(Self {
			id: reader.required_id("id")?,
			status: reader.string_or_default("status")?,
			status_details,
			branch: reader.non_empty_str("branch")?,
			created_at: reader.optional_timestamp("createdAt")?,
			updated_at: reader.optional_timestamp("updatedAt")?,
			project_id: reader.optional_id("projectId")?,
			project_name: reader.non_empty_str("projectName")?,
			user_agent: reader.non_empty_str("userAgent")?,
			initiator: reader.non_empty_str("initiator")?,
			tags: reader.string_map("tags")?,
			metadata,
			engines: reader.string_list("engines")?,
			source_type: reader.non_empty_str("sourceType")?,
			source_origin: reader.non_empty_str("sourceOrigin")?,
		})
	}
}

/// Status of one scan stage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStatusDetail {
	/// Stage or engine name.
	pub name: String,
	/// Stage status.
	pub status: String,
	/// Free-text details.
	pub details: String,
}
impl ScanStatusDetail {
	fn from_reader(reader: &FieldReader<'_>) -> Result<Self, DecodeError> {
		Ok(Self {
			name: reader.required_str("name")?.to_owned(),
			status: reader.string_or_default("status")?,
			details: reader.string_or_default("details")?,
		})
	}
}

/// Engine tag plus per-engine configuration of a scan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanMetadata {
	/// Engine-type tag.
	pub scan_type: Option<String>,
	/// Per-engine configuration sets.
	pub configs: Vec<ScanConfiguration>,
}
impl ScanMetadata {
	fn from_reader(reader: &FieldReader<'_>) -> Result<Self, DecodeError> {
		Ok(Self {
			scan_type: reader.non_empty_str("type")?,
			configs: decode::decode_list(
				"scan configuration",
				reader.array("configs")?,
				ScanConfiguration::from_reader,
			),
		})
	}
}

/// Key/value configuration for one engine, e.g. `{"type":"sast","value":{"incremental":"true"}}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfiguration {
	/// Engine the values apply to.
	#[serde(rename = "type")]
	pub scan_type: String,
	/// Engine settings.
	#[serde(rename = "value")]
	pub values: BTreeMap<String, String>,
}
impl ScanConfiguration {
	/// Static analysis engine tag.
	pub const SAST: &'static str = "sast";
	/// Key holding the incremental flag of the static analysis engine.
	pub const INCREMENTAL: &'static str = "incremental";

	/// Creates an empty configuration for `scan_type`.
	pub fn new(scan_type: impl Into<String>) -> Self {
		Self { scan_type: scan_type.into(), values: BTreeMap::new() }
	}

	/// Adds or replaces one setting.
	pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.values.insert(key.into(), value.into());

		self
	}

	/// Static analysis configuration with the incremental flag set.
	pub fn sast_incremental(incremental: bool) -> Self {
		Self::new(Self::SAST).with_value(Self::INCREMENTAL, incremental.to_string())
	}

	fn from_reader(reader: &FieldReader<'_>) -> Result<Self, DecodeError> {
		Ok(Self {
			scan_type: reader.required_str("type")?.to_owned(),
			values: reader.string_map("value")?,
		})
	}
}

/// Where the platform fetches the source of a new scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanSource {
	/// Archive previously PUT to a pre-signed upload URL.
	Upload {
		/// Pre-signed URL the archive was uploaded to.
		upload_url: String,
	},
	/// Git repository cloned by the platform.
	Git {
		/// Repository URL.
		repo_url: String,
	},
}
impl ScanSource {
	/// Tag of uploaded-archive sources.
	pub const UPLOAD: &'static str = "upload";
	/// Tag of git sources.
	pub const GIT: &'static str = "git";

	/// Builds a source from its wire tag. Any tag other than `upload` or `git` is rejected.
	pub fn from_tag(tag: &str, url: impl Into<String>) -> Result<Self, ValidationError> {
		match tag {
			Self::UPLOAD => Ok(Self::Upload { upload_url: url.into() }),
			Self::GIT => Ok(Self::Git { repo_url: url.into() }),
			_ => Err(ValidationError::UnknownScanSource { tag: tag.to_owned() }),
		}
	}

	/// Wire tag sent as the scan `type`.
	pub fn tag(&self) -> &'static str {
		match self {
			Self::Upload { .. } => Self::UPLOAD,
			Self::Git { .. } => Self::GIT,
		}
	}

	/// `handler` payload of the scan-create request.
	pub(crate) fn handler(&self, branch: &str) -> Value {
		match self {
			Self::Upload { upload_url } => json!({ "uploadurl": upload_url, "branch": branch }),
			Self::Git { repo_url } => json!({ "repoUrl": repo_url, "branch": branch }),
		}
	}
}

/// Body of the scan-create request.
pub(crate) fn scan_request(
	project: &ProjectId,
	source: &ScanSource,
	branch: &str,
	settings: &[ScanConfiguration],
) -> JsonObject {
	let mut body = JsonObject::new();

	body.insert("project".into(), json!({ "id": project }));
	body.insert("type".into(), Value::from(source.tag()));
	body.insert("handler".into(), source.handler(branch));
	body.insert("config".into(), json!(settings));

	body
}

pub(crate) fn decode_scan(bytes: &[u8]) -> Result<Scan, DecodeError> {
	decode::decode_object("scan", bytes, Scan::from_reader)
}

/// Decodes a scan listing, either a bare array or an object wrapping it under `scans`.
pub(crate) fn decode_scans(bytes: &[u8]) -> Result<Vec<Scan>, DecodeError> {
	match decode::parse("scan list", bytes)? {
		Value::Array(items) => Ok(decode::decode_list("scan", &items, Scan::from_reader)),
		Value::Object(object) => {
			let reader = FieldReader::new("scan list", &object);

			Ok(decode::decode_list("scan", reader.required_array("scans")?, Scan::from_reader))
		},
		other => Err(DecodeError::UnexpectedShape {
			what: "scan list",
			expected: "array or object",
			found: decode::type_name(&other),
		}),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const SCAN: &[u8] = br#"{
		"id":"s-1",
		"status":"Completed",
		"statusDetails":[
			{"name":"general","status":"Completed","details":""},
			{"name":"sast","status":"Completed","details":"","loc":1200}
		],
		"branch":"main",
		"createdAt":"2024-02-03T04:05:06Z",
		"projectId":"p-1",
		"projectName":"payments",
		"tags":{},
		"metadata":{"type":"upload","configs":[
			{"type":"sca","value":{"exploitablePath":"false"}},
			{"type":"sast","value":{"incremental":"true","presetName":"ASA Premium"}}
		]},
		"engines":["sast","sca"],
		"sourceType":"zip",
		"sourceOrigin":"cx1-client"
	}"#;

	#[test]
	fn scan_decodes_details_and_metadata() {
		let scan = decode_scan(SCAN).expect("Scan should decode.");

		assert_eq!(scan.id, "s-1");
		assert_eq!(scan.status_details.len(), 2);
		assert_eq!(scan.status_details[1].name, "sast");
		assert_eq!(scan.metadata.scan_type.as_deref(), Some("upload"));
		assert_eq!(scan.metadata.configs.len(), 2);
		assert_eq!(scan.engines, ["sast", "sca"]);
		assert_eq!(scan.project_id.as_ref().map(|id| id.as_ref()), Some("p-1"));
	}

	#[test]
	fn incremental_flag_is_read_from_sast_config() {
		let mut scan = decode_scan(SCAN).expect("Scan should decode.");

		assert!(scan.is_incremental().expect("Flag is present."));

		scan.metadata.configs[1] = ScanConfiguration::sast_incremental(false);

		assert!(!scan.is_incremental().expect("Flag is present."));

		scan.metadata.configs[1] = ScanConfiguration::new(ScanConfiguration::SAST)
			.with_value(ScanConfiguration::INCREMENTAL, "TRUE");

		assert!(!scan.is_incremental().expect("Only the exact `true` string enables the flag."));

		scan.metadata.configs.remove(1);

		match scan.is_incremental() {
			Err(Error::NotSet { what, subject }) => {
				assert_eq!(what, "sast-engine incremental flag");
				assert_eq!(subject, "Scan s-1");
			},
			other => panic!("Expected a not-set error, got {other:?}."),
		}
	}

	#[test]
	fn sources_build_distinct_handlers() {
		let upload = ScanSource::from_tag("upload", "https://uploads.example.com/a.zip")
			.expect("Upload tag should be accepted.");
		let git = ScanSource::from_tag("git", "https://github.com/acme/payments.git")
			.expect("Git tag should be accepted.");

		assert_eq!(
			upload.handler("main"),
			json!({ "uploadurl": "https://uploads.example.com/a.zip", "branch": "main" })
		);
		assert_eq!(
			git.handler("dev"),
			json!({ "repoUrl": "https://github.com/acme/payments.git", "branch": "dev" })
		);
		assert_eq!(
			ScanSource::from_tag("svn", "x"),
			Err(ValidationError::UnknownScanSource { tag: "svn".into() })
		);
	}

	#[test]
	fn scan_request_carries_project_type_and_config() {
		let project = ProjectId::new("p-1").expect("Project fixture should be valid.");
		let body = scan_request(
			&project,
			&ScanSource::Git { repo_url: "https://github.com/acme/payments.git".into() },
			"main",
			&[ScanConfiguration::sast_incremental(true)],
		);

		assert_eq!(
			Value::Object(body),
			json!({
				"project": { "id": "p-1" },
				"type": "git",
				"handler": { "repoUrl": "https://github.com/acme/payments.git", "branch": "main" },
				"config": [{ "type": "sast", "value": { "incremental": "true" } }],
			})
		);
	}

	#[test]
	fn scan_lists_accept_both_shapes() {
		let bare = decode_scans(br#"[{"id":"s-1"},{"status":"no id"}]"#)
			.expect("Bare array should decode.");
		let wrapped = decode_scans(br#"{"totalCount":1,"scans":[{"id":"s-2"}]}"#)
			.expect("Wrapped list should decode.");

		assert_eq!(bare.len(), 1);
		assert_eq!(wrapped[0].id, "s-2");
		assert!(decode_scans(b"\"nope\"").is_err());
	}
}
