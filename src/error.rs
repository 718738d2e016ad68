//! Client-level error types shared by authentication, transport, decoding, and operations.

// std
use std::path::PathBuf;
// self
use crate::{_prelude::*, http::HttpMethod, model::IdentifierError};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token acquisition failed.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Request construction, network, or body-read failure.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response payload could not be parsed or lacked a required field.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Caller supplied an argument that was rejected before any request was sent.
	#[error(transparent)]
	Validation(#[from] ValidationError),

	/// Client-side exact-match filter found nothing.
	#[error("No {kind} named `{name}` was found.")]
	NotFound {
		/// Record kind that was searched for.
		kind: &'static str,
		/// Exact name that failed to match.
		name: String,
	},
	/// A flag the caller asked about is absent from the record.
	#[error("{subject} did not have the {what} set.")]
	NotSet {
		/// Flag description.
		what: &'static str,
		/// Record that was inspected.
		subject: String,
	},

	/// A client operation failed; names the operation and the record or name it was about.
	///
	/// Use [`Error::root`] to match on the underlying failure.
	#[error("Operation `{op}`{} failed: {source}", subject_suffix(.subject))]
	Call {
		/// Operation name, e.g. `get_project_by_id`.
		op: &'static str,
		/// Identifier or name the operation was about; empty for listings.
		subject: String,
		/// Underlying failure.
		#[source]
		source: Box<Error>,
	},
}
impl Error {
	/// Wraps `self` with the operation and subject it failed in.
	pub fn in_call(self, op: &'static str, subject: impl Into<String>) -> Self {
		Self::Call { op, subject: subject.into(), source: Box::new(self) }
	}

	/// Underlying failure with every [`Error::Call`] layer peeled off.
	pub fn root(&self) -> &Error {
		match self {
			Self::Call { source, .. } => source.root(),
			other => other,
		}
	}

	/// Operation name and subject of the outermost [`Error::Call`] layer, if any.
	pub fn call_context(&self) -> Option<(&'static str, &str)> {
		match self {
			Self::Call { op, subject, .. } => Some((*op, subject.as_str())),
			_ => None,
		}
	}
}

fn subject_suffix(subject: &str) -> String {
	if subject.is_empty() { String::new() } else { format!(" for `{subject}`") }
}

/// Failures raised while exchanging a grant for a bearer token.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// The token request could not be built or sent, or its body could not be read.
	#[error("Token request failed.")]
	Transport {
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// The token endpoint answered with something that is not JSON.
	#[error("Token endpoint returned malformed JSON ({len} bytes, status {status}).")]
	MalformedResponse {
		/// Body size in bytes.
		len: usize,
		/// HTTP status code.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The identity provider rejected the grant with an OIDC error payload.
	#[error("Identity provider rejected the grant with status {status}: {error}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// OIDC `error` field.
		error: String,
		/// OIDC `error_description` field, when supplied.
		description: Option<String>,
	},
	/// The response carried no `access_token` field.
	#[error("Token endpoint response is missing access_token (status {status}).")]
	MissingAccessToken {
		/// HTTP status code.
		status: u16,
	},
	/// The `access_token` field was present but not a string.
	#[error("Token endpoint returned a non-string access_token ({found}).")]
	InvalidAccessToken {
		/// JSON type that was found instead.
		found: &'static str,
	},
	/// The `access_token` field was an empty string.
	#[error("Token endpoint returned an empty access_token.")]
	EmptyAccessToken,
}

/// Configuration and validation failures raised while setting up a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A required endpoint was not configured.
	#[error("The {field} endpoint is required.")]
	MissingEndpoint {
		/// Endpoint label.
		field: &'static str,
	},
	/// An endpoint could not be parsed.
	#[error("The {field} endpoint is not a valid URL.")]
	InvalidUrl {
		/// Endpoint label.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// An endpoint uses a scheme other than `http` or `https`.
	#[error("The {field} endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Endpoint label.
		field: &'static str,
		/// Offending URL.
		url: String,
	},
	/// An endpoint carries a query string or fragment.
	#[error("The {field} endpoint must not carry a query or fragment: {url}.")]
	UnexpectedUrlParts {
		/// Endpoint label.
		field: &'static str,
		/// Offending URL.
		url: String,
	},
	/// A required environment variable is missing.
	#[error("Environment variable `{var}` is not set.")]
	MissingEnv {
		/// Variable name.
		var: &'static str,
	},
	/// Tenant identifier failed validation.
	#[error("Tenant identifier is invalid.")]
	InvalidTenant(#[from] IdentifierError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures. Every variant is terminal for the call that raised it.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The request could not be constructed (bad URL, header, or body encoding).
	#[error("Failed to build the {method} request for {url}.")]
	Build {
		/// HTTP method of the request.
		method: HttpMethod,
		/// Target URL without its query string.
		url: String,
		/// Underlying construction failure.
		#[source]
		source: BoxError,
	},
	/// The underlying HTTP client reported a network failure.
	#[error("Network error occurred during {method} {url}.")]
	Network {
		/// HTTP method of the request.
		method: HttpMethod,
		/// Target URL without its query string.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The response body could not be read.
	#[error("Failed to read the response body of {method} {url}.")]
	Body {
		/// HTTP method of the request.
		method: HttpMethod,
		/// Target URL without its query string.
		url: String,
		/// Transport-specific read error.
		#[source]
		source: BoxError,
	},
	/// A local file needed for the request could not be read.
	#[error("Failed to read {}.", .path.display())]
	Io {
		/// File that was being read.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
}
impl TransportError {
	/// Wraps a request construction failure.
	pub fn build(
		method: HttpMethod,
		url: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Build { method, url: url.into(), source: Box::new(src) }
	}

	/// Wraps a transport-specific network error.
	pub fn network(
		method: HttpMethod,
		url: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { method, url: url.into(), source: Box::new(src) }
	}

	/// Wraps a transport-specific body read error.
	pub fn body(
		method: HttpMethod,
		url: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Body { method, url: url.into(), source: Box::new(src) }
	}
}

/// Failures raised while turning a response body into typed records.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// The body is not valid JSON.
	#[error("Failed to parse {what} from a {len}-byte response.")]
	Malformed {
		/// What was being decoded.
		what: &'static str,
		/// Body size in bytes.
		len: usize,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The body parsed but has the wrong top-level shape.
	#[error("Expected {what} to be a JSON {expected}, found {found}.")]
	UnexpectedShape {
		/// What was being decoded.
		what: &'static str,
		/// Expected JSON type.
		expected: &'static str,
		/// JSON type that was found.
		found: &'static str,
	},
	/// A required field is absent or null.
	#[error("The {record} record is missing the `{field}` field.")]
	MissingField {
		/// Record kind.
		record: &'static str,
		/// Field name.
		field: &'static str,
	},
	/// A field holds a value of the wrong JSON type.
	#[error("The {record} field `{field}` should be {expected}, found {found}.")]
	WrongType {
		/// Record kind.
		record: &'static str,
		/// Field name.
		field: &'static str,
		/// Expected type.
		expected: &'static str,
		/// JSON type that was found.
		found: &'static str,
	},
	/// A field holds a string that is not a valid identifier.
	#[error("The {record} field `{field}` holds an invalid identifier.")]
	InvalidIdentifier {
		/// Record kind.
		record: &'static str,
		/// Field name.
		field: &'static str,
		/// Validation failure.
		#[source]
		source: IdentifierError,
	},
	/// A field holds a string that is not a valid URL.
	#[error("The {record} field `{field}` holds an invalid URL.")]
	InvalidUrl {
		/// Record kind.
		record: &'static str,
		/// Field name.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Arguments rejected locally before any request is issued.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// A configuration update was requested with no settings.
	#[error("At least one configuration setting must be provided.")]
	EmptySettings,
	/// The scan source tag is neither `upload` nor `git`.
	#[error("Scan source type `{tag}` is not supported; expected `upload` or `git`.")]
	UnknownScanSource {
		/// Tag supplied by the caller.
		tag: String,
	},
	/// A required string argument was empty.
	#[error("The {what} must not be empty.")]
	EmptyArgument {
		/// Argument description.
		what: &'static str,
	},
	/// An identifier argument failed validation.
	#[error(transparent)]
	Identifier(#[from] IdentifierError),
}
