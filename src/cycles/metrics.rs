// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for cycle steps.
#[derive(Debug, Default)]
pub struct CycleMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	retries: AtomicU64,
}
impl CycleMetrics {
	/// Returns the total number of cycle steps attempted.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of steps that completed their work.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of steps answered with a jittered reschedule.
	pub fn retries(&self) -> u64 {
		self.retries.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_retry(&self) {
		self.retries.fetch_add(1, Ordering::Relaxed);
	}
}
