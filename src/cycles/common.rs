//! Shared helpers for cycle implementations (states, retry jitter).

// self
use crate::_prelude::*;

/// Lower bound of the retry window, in milliseconds.
pub const MIN_RETRY_DELAY_MS: u64 = 3_000;
/// Upper bound of the retry window, in milliseconds.
pub const MAX_RETRY_DELAY_MS: u64 = 15_000;

/// Logical state of the configuration cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleState {
	/// No usable snapshot; a fetch is due.
	AwaitingConfig,
	/// A snapshot is stored and the refresh timer is armed.
	ConfigActive,
	/// A failure was answered with a jittered delay before the next fetch.
	RetryBackoff,
}
impl CycleState {
	/// State every agent starts in, re-entered on each fetch.
	pub const fn initial() -> Self {
		Self::AwaitingConfig
	}
}

/// Uniformly random delay in the inclusive retry window.
pub fn random_retry_delay() -> StdDuration {
	StdDuration::from_millis(rand::random_range(MIN_RETRY_DELAY_MS..=MAX_RETRY_DELAY_MS))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn retry_delay_stays_in_the_inclusive_window() {
		for _ in 0..1_000 {
			let delay = random_retry_delay().as_millis() as u64;

			assert!((MIN_RETRY_DELAY_MS..=MAX_RETRY_DELAY_MS).contains(&delay));
		}
	}
}
