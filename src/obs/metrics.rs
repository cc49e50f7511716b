// self
use crate::obs::{CycleKind, CycleOutcome};

/// Records a cycle outcome via the global metrics recorder (when enabled).
pub fn record_cycle_outcome(kind: CycleKind, outcome: CycleOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"telemetry_agent_cycle_total",
			"cycle" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_cycle_outcome_noop_without_metrics() {
		record_cycle_outcome(CycleKind::Publish, CycleOutcome::Failure);
	}
}
