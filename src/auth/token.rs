//! Bearer token wrapper that redacts sensitive material.

// self
use crate::{_prelude::*, error::AuthError};

/// Redacted bearer token keeping sensitive material out of logs.
///
/// A token is never empty. It carries no expiry; callers re-authenticate to replace it.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);
impl BearerToken {
	const PREVIEW_EDGE: usize = 4;

	/// Wraps a token string, rejecting empty values.
	pub fn new(value: impl Into<String>) -> Result<Self, AuthError> {
		let value = value.into();

		if value.is_empty() {
			return Err(AuthError::EmptyAccessToken);
		}

		Ok(Self(value))
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// `Authorization` header value for this token.
	pub(crate) fn header_value(&self) -> String {
		format!("Bearer {}", self.0)
	}

	/// Shows the first and last four characters, or nothing for short tokens.
	pub fn preview(&self) -> String {
		let chars = self.0.chars().collect::<Vec<_>>();

		if chars.len() < Self::PREVIEW_EDGE * 3 {
			return "<redacted>".into();
		}

		let head = chars[..Self::PREVIEW_EDGE].iter().collect::<String>();
		let tail = chars[chars.len() - Self::PREVIEW_EDGE..].iter().collect::<String>();

		format!("{head}...{tail}")
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("BearerToken").field(&"<redacted>").finish()
	}
}
impl Display for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_formatters_redact() {
		let token = BearerToken::new("eyJhbGciOiJSUzI1NiJ9.payload.signature")
			.expect("Non-empty token should be accepted.");

		assert_eq!(format!("{token:?}"), "BearerToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
		assert_eq!(token.preview(), "eyJh...ture");
		assert_eq!(token.header_value(), "Bearer eyJhbGciOiJSUzI1NiJ9.payload.signature");
	}

	#[test]
	fn empty_and_short_tokens() {
		assert!(matches!(BearerToken::new(""), Err(AuthError::EmptyAccessToken)));

		let short = BearerToken::new("abc").expect("Short tokens are still tokens.");

		assert_eq!(short.preview(), "<redacted>");
	}
}
