//! Projects and the paged project listing.

// self
use crate::{
	_prelude::*,
	decode::{self, FieldReader},
	error::DecodeError,
	model::{GroupId, ProjectId},
};

/// Project registered on the platform.
///
/// Groups are referenced by identifier only; resolve them with
/// [`Cx1Client::get_groups`](crate::api::Cx1Client::get_groups) when names are needed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
	/// Project identifier.
	pub id: ProjectId,
	/// Project name.
	pub name: String,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Last modification time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
	/// Groups the project belongs to.
	pub groups: Vec<GroupId>,
	/// Free-form tags.
	pub tags: BTreeMap<String, String>,
	/// Repository URL, when configured.
	pub repo_url: Option<String>,
	/// Default branch, when configured.
	pub main_branch: Option<String>,
	/// Tool or integration that created the project.
	pub origin: Option<String>,
	/// Business-impact ranking.
	pub criticality: Option<i32>,
}
impl Project {
	pub(crate) fn from_reader(reader: &FieldReader<'_>) -> Result<Self, DecodeError> {
		Ok(Self {
			id: reader.required_id("id")?,
			name: reader.required_str("name")?.to_owned(),
			created_at: reader.optional_timestamp("createdAt")?,
			updated_at: reader.optional_timestamp("updatedAt")?,
			groups: reader.id_list("groups")?,
			tags: reader.string_map("tags")?,
			repo_url: reader.non_empty_str("repoUrl")?,
			main_branch: reader.non_empty_str("mainBranch")?,
			origin: reader.non_empty_str("origin")?,
			criticality: reader.optional_i32("criticality")?,
		})
	}
}

/// Decodes one project object (by-id lookup, creation response).
pub(crate) fn decode_project(bytes: &[u8]) -> Result<Project, DecodeError> {
	decode::decode_object("project", bytes, |reader| Project::from_reader(reader))
}

/// Decodes the `{totalCount, filteredTotalCount, projects}` page object.
///
/// Only the returned page is decoded; the counts are compared to detect truncation.
pub(crate) fn decode_project_page(bytes: &[u8]) -> Result<Vec<Project>, DecodeError> {
	let page = decode::parse_object("project page", bytes)?;
	let reader = FieldReader::new("project page", &page);
	let total = reader.optional_i64("totalCount")?;
	let filtered = reader.optional_i64("filteredTotalCount")?;
	let projects =
		decode::decode_list("project", reader.required_array("projects")?, Project::from_reader);
	let expected = filtered.or(total).unwrap_or_default();

	if expected > projects.len() as i64 {
		tracing::debug!(
			returned = projects.len(),
			expected,
			"Project listing holds more records than one page returned."
		);
	}

	Ok(projects)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn project_fields_decode_tolerantly() {
		let project = decode_project(
			br#"{
				"id":"p-1",
				"name":"payments",
				"createdAt":"2023-01-02T03:04:05.678Z",
				"updatedAt":"not a date",
				"groups":["g1","g2"],
				"tags":{"team":"red"},
				"repoUrl":"",
				"mainBranch":"main",
				"origin":"cx1-client",
				"criticality":3
			}"#,
		)
		.expect("Project should decode.");

		assert_eq!(project.id, "p-1");
		assert!(project.created_at.is_some());
		assert!(project.updated_at.is_none());
		assert_eq!(project.groups.len(), 2);
		assert_eq!(project.tags.get("team").map(String::as_str), Some("red"));
		assert_eq!(project.repo_url, None);
		assert_eq!(project.main_branch.as_deref(), Some("main"));
		assert_eq!(project.criticality, Some(3));
	}

	#[test]
	fn page_decoding_skips_bad_records() {
		let projects = decode_project_page(
			br#"{"totalCount":5,"filteredTotalCount":3,"projects":[
				{"id":"p-1","name":"a"},
				{"name":"missing-id"},
				{"id":"p-3","name":"c","tags":null}
			]}"#,
		)
		.expect("Page should decode.");

		assert_eq!(projects.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(), ["a", "c"]);
	}

	#[test]
	fn page_must_be_an_object() {
		assert!(matches!(
			decode_project_page(b"[]"),
			Err(DecodeError::UnexpectedShape { expected: "object", .. })
		));
	}
}
