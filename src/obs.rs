//! Observability helpers for client calls.
//!
//! - Every operation runs inside a `cx1_client.call` span carrying the `op` (operation name),
//!   `surface` (which base the request targets), and `subject` (identifier or name the call is
//!   about) fields.
//! - Enable `metrics` to increment the `cx1_client_call_total` counter for every
//!   attempt/success/failure, labeled by `surface` + `outcome`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Remote surface a call is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
	/// OIDC token endpoint.
	Token,
	/// Identity provider admin API (groups, users).
	Identity,
	/// Product REST API.
	Product,
	/// Pre-signed upload URL.
	Upload,
}
impl Surface {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Surface::Token => "token",
			Surface::Identity => "identity",
			Surface::Product => "product",
			Surface::Upload => "upload",
		}
	}
}
impl Display for Surface {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside a call span and records its outcome.
///
/// Failures come back wrapped in [`Error::Call`] carrying `op` and `subject`.
pub(crate) async fn observe<T, Fut>(
	surface: Surface,
	op: &'static str,
	subject: &str,
	fut: Fut,
) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = CallSpan::new(surface, op, subject);

	record_call_outcome(surface, CallOutcome::Attempt);

	match span.instrument(fut).await {
		Ok(value) => {
			record_call_outcome(surface, CallOutcome::Success);

			Ok(value)
		},
		Err(e) => {
			span.in_scope(|| ::tracing::warn!(error = %e, "Call failed."));
			record_call_outcome(surface, CallOutcome::Failure);

			Err(e.in_call(op, subject))
		},
	}
}
