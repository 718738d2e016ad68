// self
use crate::obs::{CallOutcome, Surface};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(surface: Surface, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"cx1_client_call_total",
			"surface" => surface.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (surface, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_call_outcome_noop_without_recorder() {
		record_call_outcome(Surface::Upload, CallOutcome::Failure);
	}
}
