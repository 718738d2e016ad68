//! Identity-provider groups.

// self
use crate::{
	_prelude::*,
	decode::{self, FieldReader},
	error::DecodeError,
	model::GroupId,
};

/// Group defined in the tenant realm.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
	/// Group identifier.
	pub id: GroupId,
	/// Display name.
	pub name: String,
}
impl Group {
	pub(crate) fn from_reader(reader: &FieldReader<'_>) -> Result<Self, DecodeError> {
		Ok(Self { id: reader.required_id("id")?, name: reader.required_str("name")?.to_owned() })
	}
}

/// Decodes the group array returned by the identity admin API.
pub(crate) fn decode_groups(bytes: &[u8]) -> Result<Vec<Group>, DecodeError> {
	decode::decode_array("group", bytes, Group::from_reader)
}
