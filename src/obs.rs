//! Observability helpers for agent cycles.
//!
//! Structured spans named `telemetry_agent.cycle` carry the `cycle` (kind) and
//! `stage` (call site) fields on every step. Enable the `metrics` feature to
//! additionally increment the `telemetry_agent_cycle_total` counter for every
//! attempt/success/retry/failure, labeled by `cycle` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Cycle kinds observed by the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CycleKind {
	/// Configuration polling cycle.
	ConfigRefresh,
	/// Measurement cycle.
	Measure,
	/// Message publishing.
	Publish,
}
impl CycleKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CycleKind::ConfigRefresh => "config_refresh",
			CycleKind::Measure => "measure",
			CycleKind::Publish => "publish",
		}
	}
}
impl Display for CycleKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CycleOutcome {
	/// Entry to a cycle step.
	Attempt,
	/// The step completed its work.
	Success,
	/// The step skipped its work and rescheduled.
	Retry,
	/// The step failed and rescheduled.
	Failure,
}
impl CycleOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CycleOutcome::Attempt => "attempt",
			CycleOutcome::Success => "success",
			CycleOutcome::Retry => "retry",
			CycleOutcome::Failure => "failure",
		}
	}
}
impl Display for CycleOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
