//! Credentials exchanged at the identity provider's token endpoint.

// self
use crate::{_prelude::*, config::RequestDefaults};

/// OAuth 2.0 grant types used against the identity provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Client Credentials grant for OAuth clients.
	ClientCredentials,
	/// Refresh Token grant; used with platform API keys.
	RefreshToken,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub fn as_str(self) -> &'static str {
		match self {
			GrantType::ClientCredentials => "client_credentials",
			GrantType::RefreshToken => "refresh_token",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Credentials used to obtain a bearer token.
#[derive(Clone, PartialEq, Eq)]
pub enum Grant {
	/// OAuth client registered in the tenant realm.
	ClientCredentials {
		/// OAuth client identifier.
		client_id: String,
		/// OAuth client secret.
		client_secret: String,
	},
	/// Platform API key, sent as a refresh token on behalf of the platform's own client.
	ApiKey {
		/// The API key.
		api_key: String,
	},
}
impl Grant {
	/// Client-credentials grant.
	pub fn client_credentials(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Self {
		Self::ClientCredentials { client_id: client_id.into(), client_secret: client_secret.into() }
	}

	/// API-key grant.
	pub fn api_key(api_key: impl Into<String>) -> Self {
		Self::ApiKey { api_key: api_key.into() }
	}

	/// Grant type sent as `grant_type`.
	pub fn grant_type(&self) -> GrantType {
		match self {
			Self::ClientCredentials { .. } => GrantType::ClientCredentials,
			Self::ApiKey { .. } => GrantType::RefreshToken,
		}
	}

	/// Form fields for the token request, in wire order.
	pub(crate) fn form_fields<'a>(
		&'a self,
		defaults: &'a RequestDefaults,
	) -> [(&'static str, &'a str); 3] {
		let grant_type = self.grant_type().as_str();

		match self {
			Self::ClientCredentials { client_id, client_secret } => [
				("grant_type", grant_type),
				("client_id", client_id.as_str()),
				("client_secret", client_secret.as_str()),
			],
			Self::ApiKey { api_key } => [
				("grant_type", grant_type),
				("client_id", defaults.api_key_client_id.as_str()),
				("refresh_token", api_key.as_str()),
			],
		}
	}
}
impl Debug for Grant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::ClientCredentials { client_id, .. } => f
				.debug_struct("ClientCredentials")
				.field("client_id", client_id)
				.field("client_secret", &"<redacted>")
				.finish(),
			Self::ApiKey { .. } => f.debug_struct("ApiKey").field("api_key", &"<redacted>").finish(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn api_key_grant_uses_configured_client_id() {
		let defaults = RequestDefaults {
			api_key_client_id: "custom-app".into(),
			..RequestDefaults::default()
		};
		let grant = Grant::api_key("key-123");

		assert_eq!(
			grant.form_fields(&defaults),
			[
				("grant_type", "refresh_token"),
				("client_id", "custom-app"),
				("refresh_token", "key-123")
			]
		);
		assert_eq!(
			Grant::api_key("k").form_fields(&RequestDefaults::default())[1],
			("client_id", "ast-app")
		);
	}

	#[test]
	fn client_credentials_fields() {
		let grant = Grant::client_credentials("svc", "s3cret");

		assert_eq!(
			grant.form_fields(&RequestDefaults::default()),
			[
				("grant_type", "client_credentials"),
				("client_id", "svc"),
				("client_secret", "s3cret")
			]
		);
	}

	#[test]
	fn debug_output_hides_secrets() {
		let rendered = format!(
			"{:?} {:?}",
			Grant::client_credentials("svc", "s3cret"),
			Grant::api_key("key-123")
		);

		assert!(rendered.contains("svc"));
		assert!(!rendered.contains("s3cret"));
		assert!(!rendered.contains("key-123"));
	}
}
