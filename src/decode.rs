//! Tolerant JSON decoding helpers.
//!
//! Payloads are first parsed into loosely typed [`Value`]s, then fields are pulled out
//! through [`FieldReader`], which checks presence and type before every narrowing
//! conversion. List decoders skip (and log) records that fail extraction; failures to parse
//! the body at all abort the call.

// crates.io
use time::format_description::well_known::Rfc3339;
// self
use crate::{_prelude::*, error::DecodeError, http::JsonObject, model::IdentifierError};

/// Parses `bytes` as JSON, reporting the input size (never the body) on failure.
pub(crate) fn parse(what: &'static str, bytes: &[u8]) -> Result<Value, DecodeError> {
	let mut de = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut de).map_err(|source| {
		tracing::debug!(what, len = bytes.len(), error = %source, "Failed to parse response body.");

		DecodeError::Malformed { what, len: bytes.len(), source }
	})
}

/// Parses a top-level JSON array.
pub(crate) fn parse_array(what: &'static str, bytes: &[u8]) -> Result<Vec<Value>, DecodeError> {
	match parse(what, bytes)? {
		Value::Array(items) => Ok(items),
		other => Err(DecodeError::UnexpectedShape {
			what,
			expected: "array",
			found: type_name(&other),
		}),
	}
}

/// Parses a top-level JSON object.
pub(crate) fn parse_object(what: &'static str, bytes: &[u8]) -> Result<JsonObject, DecodeError> {
	match parse(what, bytes)? {
		Value::Object(object) => Ok(object),
		other => Err(DecodeError::UnexpectedShape {
			what,
			expected: "object",
			found: type_name(&other),
		}),
	}
}

/// Decodes every object in `items`, logging and skipping the ones that fail.
pub(crate) fn decode_list<T, F>(record: &'static str, items: &[Value], decode: F) -> Vec<T>
where
	F: Fn(&FieldReader<'_>) -> Result<T, DecodeError>,
{
	let mut decoded = Vec::with_capacity(items.len());

	for (index, item) in items.iter().enumerate() {
		let Some(object) = item.as_object() else {
			tracing::warn!(
				record,
				index,
				found = type_name(item),
				"Skipping list entry that is not an object."
			);

			continue;
		};

		match decode(&FieldReader::new(record, object)) {
			Ok(value) => decoded.push(value),
			Err(e) => tracing::warn!(record, index, error = %e, "Skipping malformed record."),
		}
	}

	decoded
}

/// Parses a top-level array and decodes its records with [`decode_list`].
pub(crate) fn decode_array<T, F>(
	record: &'static str,
	bytes: &[u8],
	decode: F,
) -> Result<Vec<T>, DecodeError>
where
	F: Fn(&FieldReader<'_>) -> Result<T, DecodeError>,
{
	let items = parse_array(record, bytes)?;

	Ok(decode_list(record, &items, decode))
}

/// Parses a top-level object and decodes it as a single record.
pub(crate) fn decode_object<T, F>(
	record: &'static str,
	bytes: &[u8],
	decode: F,
) -> Result<T, DecodeError>
where
	F: FnOnce(&FieldReader<'_>) -> Result<T, DecodeError>,
{
	let object = parse_object(record, bytes)?;

	decode(&FieldReader::new(record, &object))
}

/// Checked field access over one JSON object.
///
/// `null` is treated the same as an absent field.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FieldReader<'a> {
	record: &'static str,
	object: &'a JsonObject,
}
impl<'a> FieldReader<'a> {
	pub(crate) fn new(record: &'static str, object: &'a JsonObject) -> Self {
		Self { record, object }
	}

	fn get(&self, field: &'static str) -> Option<&'a Value> {
		self.object.get(field).filter(|value| !value.is_null())
	}

	fn missing(&self, field: &'static str) -> DecodeError {
		DecodeError::MissingField { record: self.record, field }
	}

	fn wrong_type(
		&self,
		field: &'static str,
		expected: &'static str,
		found: &Value,
	) -> DecodeError {
		DecodeError::WrongType { record: self.record, field, expected, found: type_name(found) }
	}

	pub(crate) fn required_str(&self, field: &'static str) -> Result<&'a str, DecodeError> {
		self.optional_str(field)?.ok_or_else(|| self.missing(field))
	}

	pub(crate) fn optional_str(&self, field: &'static str) -> Result<Option<&'a str>, DecodeError> {
		match self.get(field) {
			None => Ok(None),
			Some(Value::String(value)) => Ok(Some(value.as_str())),
			Some(other) => Err(self.wrong_type(field, "a string", other)),
		}
	}

	/// Optional string where absence and `""` both mean "not set".
	pub(crate) fn non_empty_str(&self, field: &'static str) -> Result<Option<String>, DecodeError> {
		Ok(self.optional_str(field)?.filter(|value| !value.is_empty()).map(str::to_owned))
	}

	pub(crate) fn string_or_default(&self, field: &'static str) -> Result<String, DecodeError> {
		Ok(self.optional_str(field)?.unwrap_or_default().to_owned())
	}

	pub(crate) fn required_id<I>(&self, field: &'static str) -> Result<I, DecodeError>
	where
		I: FromStr<Err = IdentifierError>,
	{
		let raw = self.required_str(field)?;

		raw.parse().map_err(|source| DecodeError::InvalidIdentifier {
			record: self.record,
			field,
			source,
		})
	}

	pub(crate) fn optional_id<I>(&self, field: &'static str) -> Result<Option<I>, DecodeError>
	where
		I: FromStr<Err = IdentifierError>,
	{
		match self.optional_str(field)? {
			None | Some("") => Ok(None),
			Some(raw) => raw.parse().map(Some).map_err(|source| DecodeError::InvalidIdentifier {
				record: self.record,
				field,
				source,
			}),
		}
	}

	/// Identifier that may be encoded either as a string or as an integer.
	pub(crate) fn id_text(&self, field: &'static str) -> Result<String, DecodeError> {
		match self.get(field) {
			None => Err(self.missing(field)),
			Some(Value::String(value)) if !value.is_empty() => Ok(value.clone()),
			Some(Value::Number(value)) if value.is_i64() || value.is_u64() =>
				Ok(value.to_string()),
			Some(other) => Err(self.wrong_type(field, "a string or integer identifier", other)),
		}
	}

	pub(crate) fn required_i64(&self, field: &'static str) -> Result<i64, DecodeError> {
		self.optional_i64(field)?.ok_or_else(|| self.missing(field))
	}

	pub(crate) fn optional_i64(&self, field: &'static str) -> Result<Option<i64>, DecodeError> {
		match self.get(field) {
			None => Ok(None),
			Some(value @ Value::Number(number)) => number
				.as_i64()
				.or_else(|| {
					number.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 9e15).map(|f| f as i64)
				})
				.map(Some)
				.ok_or_else(|| self.wrong_type(field, "an integer", value)),
			Some(other) => Err(self.wrong_type(field, "an integer", other)),
		}
	}

	pub(crate) fn optional_i32(&self, field: &'static str) -> Result<Option<i32>, DecodeError> {
		match self.optional_i64(field)? {
			None => Ok(None),
			Some(value) => i32::try_from(value).map(Some).map_err(|_| DecodeError::WrongType {
				record: self.record,
				field,
				expected: "a 32-bit integer",
				found: "an out-of-range number",
			}),
		}
	}

	pub(crate) fn optional_bool(&self, field: &'static str) -> Result<Option<bool>, DecodeError> {
		match self.get(field) {
			None => Ok(None),
			Some(Value::Bool(value)) => Ok(Some(*value)),
			Some(other) => Err(self.wrong_type(field, "a boolean", other)),
		}
	}

	pub(crate) fn optional_object(
		&self,
		field: &'static str,
	) -> Result<Option<&'a JsonObject>, DecodeError> {
		match self.get(field) {
			None => Ok(None),
			Some(Value::Object(object)) => Ok(Some(object)),
			Some(other) => Err(self.wrong_type(field, "an object", other)),
		}
	}

	/// Array field; absence yields an empty slice.
	pub(crate) fn array(&self, field: &'static str) -> Result<&'a [Value], DecodeError> {
		match self.get(field) {
			None => Ok(&[]),
			Some(Value::Array(items)) => Ok(items.as_slice()),
			Some(other) => Err(self.wrong_type(field, "an array", other)),
		}
	}

	/// Array that must be present; `null` still reads as an empty list.
	pub(crate) fn required_array(&self, field: &'static str) -> Result<&'a [Value], DecodeError> {
		match self.object.get(field) {
			None => Err(self.missing(field)),
			Some(Value::Null) => Ok(&[]),
			Some(Value::Array(items)) => Ok(items.as_slice()),
			Some(other) => Err(self.wrong_type(field, "an array", other)),
		}
	}

	/// Array of strings; absence yields an empty list.
	pub(crate) fn string_list(&self, field: &'static str) -> Result<Vec<String>, DecodeError> {
		self.array(field)?
			.iter()
			.map(|item| match item {
				Value::String(value) => Ok(value.clone()),
				other => Err(self.wrong_type(field, "an array of strings", other)),
			})
			.collect()
	}

	/// Array of identifiers; absence yields an empty list.
	pub(crate) fn id_list<I>(&self, field: &'static str) -> Result<Vec<I>, DecodeError>
	where
		I: FromStr<Err = IdentifierError>,
	{
		self.string_list(field)?
			.iter()
			.map(|raw| {
				raw.parse().map_err(|source| DecodeError::InvalidIdentifier {
					record: self.record,
					field,
					source,
				})
			})
			.collect()
	}

	/// String-to-string map; absence yields an empty map.
	pub(crate) fn string_map(
		&self,
		field: &'static str,
	) -> Result<BTreeMap<String, String>, DecodeError> {
		let Some(object) = self.optional_object(field)? else {
			return Ok(BTreeMap::new());
		};

		object
			.iter()
			.map(|(key, value)| match value {
				Value::String(text) => Ok((key.clone(), text.clone())),
				other => Err(self.wrong_type(field, "a map of strings", other)),
			})
			.collect()
	}

	/// RFC 3339 timestamp. A string that does not parse is logged and read as `None`.
	pub(crate) fn optional_timestamp(
		&self,
		field: &'static str,
	) -> Result<Option<OffsetDateTime>, DecodeError> {
		let Some(raw) = self.optional_str(field)? else {
			return Ok(None);
		};

		match OffsetDateTime::parse(raw, &Rfc3339) {
			Ok(moment) => Ok(Some(moment)),
			Err(e) => {
				tracing::warn!(
					record = self.record,
					field,
					value = raw,
					error = %e,
					"Failed to parse timestamp."
				);

				Ok(None)
			},
		}
	}
}

/// Human-readable JSON type label for diagnostics.
pub(crate) fn type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
