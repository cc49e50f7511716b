// self
use crate::{_prelude::*, obs::CycleKind};

/// A span builder used by agent cycles.
#[derive(Clone, Debug)]
pub struct CycleSpan {
	span: tracing::Span,
}
impl CycleSpan {
	/// Creates a new span tagged with the provided cycle kind + stage.
	pub fn new(kind: CycleKind, stage: &'static str) -> Self {
		let span = tracing::info_span!("telemetry_agent.cycle", cycle = kind.as_str(), stage);

		Self { span }
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> CycleSpanGuard {
		CycleSpanGuard { _guard: self.span.entered() }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> tracing::instrument::Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}

/// RAII guard returned by [`CycleSpan::entered`].
pub struct CycleSpanGuard {
	_guard: tracing::span::EnteredSpan,
}
impl Debug for CycleSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("CycleSpanGuard(..)")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn entered_span_guard_exists() {
		let _guard = CycleSpan::new(CycleKind::ConfigRefresh, "test").entered();
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = CycleSpan::new(CycleKind::Measure, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
