//! Network-time collaborator contract for devices without a trustworthy clock.

// self
use crate::_prelude::*;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future returned by [`TimeSource::now_utc`].
pub type TimeSourceFuture<'a> =
	Pin<Box<dyn Future<Output = Result<OffsetDateTime, ClockError>> + 'a + Send>>;

/// Source of UTC instants used to stamp measurements.
///
/// Failure is a normal, expected condition; callers answer it with a jittered
/// reschedule rather than escalation.
pub trait TimeSource
where
	Self: Send + Sync,
{
	/// Returns the current UTC instant.
	fn now_utc(&self) -> TimeSourceFuture<'_>;
}

/// Time source backed by the local system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;
impl TimeSource for SystemTimeSource {
	fn now_utc(&self) -> TimeSourceFuture<'_> {
		Box::pin(async { Ok(OffsetDateTime::now_utc()) })
	}
}

/// Error produced when a time source cannot supply an instant.
#[derive(Debug, ThisError)]
pub enum ClockError {
	/// The upstream time service could not be reached.
	#[error("Network time source is unavailable.")]
	Unavailable {
		/// Source-specific failure.
		#[source]
		source: BoxError,
	},
}
impl ClockError {
	/// Wraps a source-specific failure.
	pub fn unavailable(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Unavailable { source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn system_time_source_supplies_utc_instants() {
		let before = OffsetDateTime::now_utc();
		let instant = SystemTimeSource
			.now_utc()
			.await
			.expect("System time source should never fail.");

		assert!(instant >= before);
	}
}
