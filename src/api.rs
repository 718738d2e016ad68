//! Authenticated client and its domain operations.
//!
//! [`Cx1Client`] owns the transport, the configuration, and the current bearer token. Every
//! operation composes the transport helpers in [`transport`] with a decoder from
//! [`model`](crate::model) and issues its requests one after another; nothing is spawned and
//! nothing is retried.

pub mod transport;

mod configuration;
mod groups;
mod presets;
mod projects;
mod reports;
mod scans;
mod uploads;
mod users;

// self
use crate::{
	_prelude::*,
	auth::{self, BearerToken, Grant},
	config::ClientConfig,
	http::ApiHttpClient,
	model::TenantId,
};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestCx1Client = Cx1Client<ReqwestHttpClient>;

/// Authenticated Checkmarx One client.
///
/// Clones share the transport and the token, so [`Cx1Client::replace_token`] on one clone is
/// observed by all of them. Tokens are not refreshed automatically; call
/// [`Cx1Client::reauthenticate`] when the platform starts rejecting the current one.
pub struct Cx1Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Endpoints, tenant, and request defaults.
	pub config: ClientConfig,
	token: Arc<RwLock<BearerToken>>,
}
impl<C> Cx1Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Authenticates with `grant` and returns a client holding the issued token.
	pub async fn authenticate(
		http_client: impl Into<Arc<C>>,
		config: ClientConfig,
		grant: &Grant,
	) -> Result<Self> {
		config.validate()?;

		let http_client = http_client.into();
		let token = auth::authenticate(&*http_client, &config, grant).await?;

		Ok(Self::with_token(http_client, config, token))
	}

	/// Creates a client around a token acquired elsewhere.
	pub fn with_token(
		http_client: impl Into<Arc<C>>,
		config: ClientConfig,
		token: BearerToken,
	) -> Self {
		Self { http_client: http_client.into(), config, token: Arc::new(RwLock::new(token)) }
	}

	/// Runs the token exchange again and swaps the new token in.
	pub async fn reauthenticate(&self, grant: &Grant) -> Result<()> {
		let token = auth::authenticate(&*self.http_client, &self.config, grant).await?;

		self.replace_token(token);

		Ok(())
	}

	/// Replaces the bearer token used by this client and all of its clones.
	pub fn replace_token(&self, token: BearerToken) {
		*self.token.write() = token;
	}

	/// Returns a copy of the current bearer token.
	pub fn token(&self) -> BearerToken {
		self.token.read().clone()
	}

	/// Tenant the client is bound to.
	pub fn tenant(&self) -> &TenantId {
		&self.config.tenant
	}

	/// One-line description safe for logs: tenant, API URL, and a token preview.
	pub fn summary(&self) -> String {
		format!(
			"{} on {} with token: {}",
			self.config.tenant,
			self.config.api_url,
			self.token.read().preview()
		)
	}
}
#[cfg(feature = "reqwest")]
impl Cx1Client<ReqwestHttpClient> {
	/// Builds a reqwest transport and authenticates with `grant`.
	pub async fn connect(config: ClientConfig, grant: &Grant) -> Result<Self> {
		let client = ReqwestClient::builder()
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.build()
			.map_err(ConfigError::from)?;

		Self::authenticate(ReqwestHttpClient::with_client(client), config, grant).await
	}
}
impl<C> Clone for Cx1Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			config: self.config.clone(),
			token: self.token.clone(),
		}
	}
}
impl<C> Debug for Cx1Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Cx1Client")
			.field("config", &self.config)
			.field("token", &"<redacted>")
			.finish()
	}
}
impl<C> Display for Cx1Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.summary())
	}
}
