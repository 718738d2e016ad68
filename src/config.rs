//! Client configuration: endpoints, tenant, and request defaults.
//!
//! [`ClientConfig`] values are assembled through [`ClientConfigBuilder`], loaded from the
//! environment with [`ClientConfig::from_env`], or deserialized by the caller and checked with
//! [`ClientConfig::validate`].

// self
use crate::{_prelude::*, error::ConfigError, model::TenantId};

/// Environment variable holding the product API base URL.
pub const ENV_API_URL: &str = "CX1_API_URL";
/// Environment variable holding the identity provider base URL.
pub const ENV_IAM_URL: &str = "CX1_IAM_URL";
/// Environment variable holding the tenant name.
pub const ENV_TENANT: &str = "CX1_TENANT";
/// Optional override for [`RequestDefaults::api_key_client_id`].
pub const ENV_API_KEY_CLIENT_ID: &str = "CX1_API_KEY_CLIENT_ID";
/// Optional override for [`RequestDefaults::project_origin`].
pub const ENV_PROJECT_ORIGIN: &str = "CX1_PROJECT_ORIGIN";

/// Fixed identifiers the client embeds in requests. Overridable for testing or for
/// tenants that register their own clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
	/// Client identifier sent with the API-key (refresh-token) grant.
	pub api_key_client_id: String,
	/// `origin` tag attached to projects created by this client.
	pub project_origin: String,
	/// Criticality assigned to projects created by this client.
	pub project_criticality: i32,
}
impl RequestDefaults {
	/// Client the platform registers for API-key logins.
	pub const API_KEY_CLIENT_ID: &'static str = "ast-app";
	/// Default `origin` tag for created projects.
	pub const PROJECT_ORIGIN: &'static str = "cx1-client";
	/// Default criticality for created projects.
	pub const PROJECT_CRITICALITY: i32 = 3;
}
impl Default for RequestDefaults {
	fn default() -> Self {
		Self {
			api_key_client_id: Self::API_KEY_CLIENT_ID.into(),
			project_origin: Self::PROJECT_ORIGIN.into(),
			project_criticality: Self::PROJECT_CRITICALITY,
		}
	}
}

/// Immutable configuration consumed by [`Cx1Client`](crate::api::Cx1Client).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
	/// Product API base URL, e.g. `https://eu.ast.checkmarx.net`.
	pub api_url: Url,
	/// Identity provider base URL, e.g. `https://eu.iam.checkmarx.net`.
	pub iam_url: Url,
	/// Tenant (realm) name.
	pub tenant: TenantId,
	/// Request defaults.
	#[serde(default)]
	pub defaults: RequestDefaults,
}
impl ClientConfig {
	/// Creates a new builder for the provided tenant.
	pub fn builder(tenant: TenantId) -> ClientConfigBuilder {
		ClientConfigBuilder::new(tenant)
	}

	/// Loads the configuration from `CX1_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Loads the configuration through an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&'static str) -> Option<String>,
	{
		let required = |var: &'static str| {
			lookup(var)
				.filter(|value| !value.trim().is_empty())
				.ok_or(ConfigError::MissingEnv { var })
		};
		let tenant = TenantId::new(required(ENV_TENANT)?.trim())?;
		let api_url = parse_endpoint("api", required(ENV_API_URL)?.trim())?;
		let iam_url = parse_endpoint("iam", required(ENV_IAM_URL)?.trim())?;
		let mut defaults = RequestDefaults::default();

		if let Some(client_id) = lookup(ENV_API_KEY_CLIENT_ID).filter(|v| !v.trim().is_empty()) {
			defaults.api_key_client_id = client_id.trim().to_owned();
		}
		if let Some(origin) = lookup(ENV_PROJECT_ORIGIN).filter(|v| !v.trim().is_empty()) {
			defaults.project_origin = origin.trim().to_owned();
		}

		Self::builder(tenant).api_url(api_url).iam_url(iam_url).defaults(defaults).build()
	}

	/// Re-checks the endpoint invariants, e.g. after deserializing a configuration.
	pub fn validate(&self) -> Result<(), ConfigError> {
		validate_endpoint("api", &self.api_url)?;
		validate_endpoint("iam", &self.iam_url)
	}

	/// OIDC token endpoint of the tenant realm.
	pub fn token_endpoint(&self) -> Result<Url, url::ParseError> {
		Url::parse(&format!(
			"{}/auth/realms/{}/protocol/openid-connect/token",
			trimmed(&self.iam_url),
			self.tenant
		))
	}

	/// Product API URL for `path` (which starts with `/`).
	pub fn api_endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
		Url::parse(&format!("{}{path}", trimmed(&self.api_url)))
	}

	/// Identity admin API URL for `path` (which starts with `/`) in the tenant realm.
	pub fn iam_admin_endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
		Url::parse(&format!("{}/auth/admin/realms/{}{path}", trimmed(&self.iam_url), self.tenant))
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Tenant the configuration targets.
	pub tenant: TenantId,
	/// Product API base URL.
	pub api_url: Option<Url>,
	/// Identity provider base URL.
	pub iam_url: Option<Url>,
	/// Request defaults.
	pub defaults: RequestDefaults,
}
impl ClientConfigBuilder {
	/// Creates a builder with default request settings.
	pub fn new(tenant: TenantId) -> Self {
		Self { tenant, api_url: None, iam_url: None, defaults: RequestDefaults::default() }
	}

	/// Sets the product API base URL.
	pub fn api_url(mut self, url: Url) -> Self {
		self.api_url = Some(url);

		self
	}

	/// Sets the identity provider base URL.
	pub fn iam_url(mut self, url: Url) -> Self {
		self.iam_url = Some(url);

		self
	}

	/// Replaces the request defaults.
	pub fn defaults(mut self, defaults: RequestDefaults) -> Self {
		self.defaults = defaults;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let api_url = self.api_url.ok_or(ConfigError::MissingEndpoint { field: "api" })?;
		let iam_url = self.iam_url.ok_or(ConfigError::MissingEndpoint { field: "iam" })?;
		let config = ClientConfig { api_url, iam_url, tenant: self.tenant, defaults: self.defaults };

		config.validate()?;

		Ok(config)
	}
}

fn parse_endpoint(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { field, source })
}

fn validate_endpoint(field: &'static str, url: &Url) -> Result<(), ConfigError> {
	if !matches!(url.scheme(), "http" | "https") {
		return Err(ConfigError::UnsupportedScheme { field, url: url.to_string() });
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ConfigError::UnexpectedUrlParts { field, url: url.to_string() });
	}

	Ok(())
}

fn trimmed(url: &Url) -> &str {
	url.as_str().trim_end_matches('/')
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	fn tenant() -> TenantId {
		TenantId::new("acme").expect("Tenant fixture should be valid.")
	}

	fn url(value: &str) -> Url {
		Url::parse(value).expect("URL fixture should parse.")
	}

	#[test]
	fn builder_requires_both_endpoints() {
		let err = ClientConfig::builder(tenant())
			.api_url(url("https://eu.ast.checkmarx.net"))
			.build()
			.expect_err("Missing IAM endpoint must be rejected.");

		assert!(matches!(err, ConfigError::MissingEndpoint { field: "iam" }));
	}

	#[test]
	fn builder_rejects_foreign_schemes_and_queries() {
		let err = ClientConfig::builder(tenant())
			.api_url(url("ftp://eu.ast.checkmarx.net"))
			.iam_url(url("https://eu.iam.checkmarx.net"))
			.build()
			.expect_err("Non-HTTP schemes must be rejected.");

		assert!(matches!(err, ConfigError::UnsupportedScheme { field: "api", .. }));

		let err = ClientConfig::builder(tenant())
			.api_url(url("https://eu.ast.checkmarx.net"))
			.iam_url(url("https://eu.iam.checkmarx.net/?realm=x"))
			.build()
			.expect_err("Query strings must be rejected.");

		assert!(matches!(err, ConfigError::UnexpectedUrlParts { field: "iam", .. }));
	}

	#[test]
	fn endpoints_join_without_double_slashes() {
		let config = ClientConfig::builder(tenant())
			.api_url(url("https://eu.ast.checkmarx.net/"))
			.iam_url(url("https://eu.iam.checkmarx.net"))
			.build()
			.expect("Configuration should build.");

		assert_eq!(
			config.token_endpoint().expect("Token endpoint should build.").as_str(),
			"https://eu.iam.checkmarx.net/auth/realms/acme/protocol/openid-connect/token"
		);
		assert_eq!(
			config.api_endpoint("/api/projects/").expect("API endpoint should build.").as_str(),
			"https://eu.ast.checkmarx.net/api/projects/"
		);
		assert_eq!(
			config
				.iam_admin_endpoint("/groups?briefRepresentation=true")
				.expect("IAM endpoint should build.")
				.as_str(),
			"https://eu.iam.checkmarx.net/auth/admin/realms/acme/groups?briefRepresentation=true"
		);
	}

	#[test]
	fn lookup_reads_required_and_optional_variables() {
		let vars = HashMap::from([
			(ENV_TENANT, "acme"),
			(ENV_API_URL, "https://eu.ast.checkmarx.net"),
			(ENV_IAM_URL, " https://eu.iam.checkmarx.net "),
			(ENV_PROJECT_ORIGIN, "pipeline"),
		]);
		let config = ClientConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
			.expect("Configuration should load from the lookup.");

		assert_eq!(config.tenant, "acme");
		assert_eq!(config.defaults.project_origin, "pipeline");
		assert_eq!(config.defaults.api_key_client_id, RequestDefaults::API_KEY_CLIENT_ID);

		let err = ClientConfig::from_lookup(|key| {
			(key != ENV_TENANT).then(|| "https://eu.ast.checkmarx.net".to_owned())
		})
		.expect_err("Missing tenant must be reported.");

		assert!(matches!(err, ConfigError::MissingEnv { var: ENV_TENANT }));
	}

	#[test]
	fn defaults_fill_in_when_deserializing() {
		let config: ClientConfig = serde_json::from_str(
			"{\"api_url\":\"https://eu.ast.checkmarx.net\",\"iam_url\":\"https://eu.iam.checkmarx.net\",\"tenant\":\"acme\",\"defaults\":{\"project_criticality\":5}}",
		)
		.expect("Configuration should deserialize.");

		assert_eq!(config.defaults.project_criticality, 5);
		assert_eq!(config.defaults.project_origin, RequestDefaults::PROJECT_ORIGIN);
		config.validate().expect("Deserialized configuration should validate.");
	}
}
