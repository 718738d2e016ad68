//! Identity-provider users.

// self
use crate::{
	_prelude::*,
	decode::{self, FieldReader},
	error::DecodeError,
	model::UserId,
};

/// User account in the tenant realm. Service accounts backing API keys are listed too.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// User identifier.
	pub id: UserId,
	/// Login name.
	pub username: String,
	/// Given name, when set.
	pub first_name: Option<String>,
	/// Family name, when set.
	pub last_name: Option<String>,
}
impl User {
	pub(crate) fn from_reader(reader: &FieldReader<'_>) -> Result<Self, DecodeError> {
		Ok(Self {
			id: reader.required_id("id")?,
			username: reader.required_str("username")?.to_owned(),
			first_name: reader.non_empty_str("firstName")?,
			last_name: reader.non_empty_str("lastName")?,
		})
	}
}

pub(crate) fn decode_users(bytes: &[u8]) -> Result<Vec<User>, DecodeError> {
	decode::decode_array("user", bytes, User::from_reader)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn malformed_users_are_skipped() {
		let users = decode_users(
			br#"[
				{"id":"u1","username":"alice","firstName":"Alice","lastName":""},
				{"username":"no-id"},
				{"id":"u3","username":7},
				{"id":"u4","username":"service-account-ci"}
			]"#,
		)
		.expect("User list should decode.");

		assert_eq!(users.len(), 2);
		assert_eq!(users[0].first_name.as_deref(), Some("Alice"));
		assert_eq!(users[0].last_name, None);
		assert_eq!(users[1].username, "service-account-ci");
	}
}
