//! Scan presets and queries.

// self
use crate::{
	_prelude::*,
	decode::{self, FieldReader},
	error::DecodeError,
};

/// Named set of queries applied by the static analysis engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
	/// Numeric preset identifier.
	pub id: i64,
	/// Preset name, e.g. `ASA Premium`.
	pub name: String,
}
impl Preset {
	pub(crate) fn from_reader(reader: &FieldReader<'_>) -> Result<Self, DecodeError> {
		Ok(Self { id: reader.required_i64("id")?, name: reader.required_str("name")?.to_owned() })
	}
}

/// Single query known to the platform.
///
/// Query identifiers are large unsigned integers on some tenants and strings on others, so
/// they are kept as text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
	/// Query identifier.
	pub id: String,
	/// Query name.
	pub name: String,
}
impl Query {
	pub(crate) fn from_reader(reader: &FieldReader<'_>) -> Result<Self, DecodeError> {
		Ok(Self { id: reader.id_text("id")?, name: reader.required_str("name")?.to_owned() })
	}
}

pub(crate) fn decode_presets(bytes: &[u8]) -> Result<Vec<Preset>, DecodeError> {
	decode::decode_array("preset", bytes, Preset::from_reader)
}

pub(crate) fn decode_queries(bytes: &[u8]) -> Result<Vec<Query>, DecodeError> {
	decode::decode_array("query", bytes, Query::from_reader)
}
