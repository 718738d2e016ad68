//! Project configuration overrides.

// self
use crate::{
	_prelude::*,
	decode::{self, FieldReader},
	error::DecodeError,
};

/// One key/value override in a project's scan configuration.
///
/// Only `key`, `value`, and `allow_override` are meaningful on update; the remaining fields are
/// filled in by the platform when reading.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfigurationSetting {
	/// Setting key, e.g. [`BRANCH`](Self::BRANCH).
	pub key: String,
	/// Display name.
	pub name: String,
	/// Setting category.
	pub category: String,
	/// Level the value was inherited from (tenant, project, ...).
	#[serde(rename = "originLevel")]
	pub origin_level: String,
	/// Value as text.
	pub value: String,
	/// Declared value type.
	#[serde(rename = "valuetype")]
	pub value_type: String,
	/// Type parameters, e.g. the allowed values of an enumeration.
	#[serde(rename = "valuetypeparams")]
	pub value_type_params: String,
	/// Whether scans may override the value.
	#[serde(rename = "allowOverride")]
	pub allow_override: bool,
}
impl ProjectConfigurationSetting {
	/// Branch scanned by git handlers.
	pub const BRANCH: &'static str = "scan.handler.git.branch";
	/// Static analysis preset name.
	pub const PRESET_NAME: &'static str = "scan.config.sast.presetName";
	/// Static analysis language mode.
	pub const LANGUAGE_MODE: &'static str = "scan.config.sast.languageMode";
	/// Static analysis file filter.
	pub const FILE_FILTER: &'static str = "scan.config.sast.filter";

	/// Override carrying only a key, value, and override flag.
	pub fn new(key: impl Into<String>, value: impl Into<String>, allow_override: bool) -> Self {
		Self { key: key.into(), value: value.into(), allow_override, ..Default::default() }
	}

	pub(crate) fn from_reader(reader: &FieldReader<'_>) -> Result<Self, DecodeError> {
		Ok(Self {
			key: reader.required_str("key")?.to_owned(),
			name: reader.string_or_default("name")?,
			category: reader.string_or_default("category")?,
			origin_level: reader.string_or_default("originLevel")?,
			value: reader.string_or_default("value")?,
			value_type: reader.string_or_default("valuetype")?,
			value_type_params: reader.string_or_default("valuetypeparams")?,
			allow_override: reader.optional_bool("allowOverride")?.unwrap_or_default(),
		})
	}
}

pub(crate) fn decode_settings(
	bytes: &[u8],
) -> Result<Vec<ProjectConfigurationSetting>, DecodeError> {
	decode::decode_array("configuration setting", bytes, ProjectConfigurationSetting::from_reader)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn wire_names_follow_the_platform() {
		let setting =
			ProjectConfigurationSetting::new(ProjectConfigurationSetting::BRANCH, "main", true);
		let wire = serde_json::to_value(&setting).expect("Setting should serialize.");

		assert_eq!(wire["key"], "scan.handler.git.branch");
		assert_eq!(wire["value"], "main");
		assert_eq!(wire["allowOverride"], true);
		assert_eq!(wire["originLevel"], "");
		assert!(wire.get("valuetype").is_some());
		assert!(wire.get("valuetypeparams").is_some());
	}

	#[test]
	fn settings_decode_with_missing_optional_fields() {
		let settings = decode_settings(
			br#"[
				{"key":"scan.config.sast.presetName","name":"presetName","category":"sast",
				 "originLevel":"Tenant","value":"ASA Premium","valuetype":"List",
				 "valuetypeparams":"ASA Premium,Default","allowOverride":true},
				{"key":"scan.config.sast.filter","value":null},
				{"name":"no key"}
			]"#,
		)
		.expect("Settings should decode.");

		assert_eq!(settings.len(), 2);
		assert_eq!(settings[0].origin_level, "Tenant");
		assert_eq!(settings[0].value_type_params, "ASA Premium,Default");
		assert!(settings[0].allow_override);
		assert_eq!(settings[1].value, "");
		assert!(!settings[1].allow_override);
	}
}
