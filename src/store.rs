//! Storage contract and the built-in in-memory measurement log.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{_prelude::*, telemetry::Measurement};

/// Boxed future returned by [`MeasurementStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Append-only log contract for captured measurements.
///
/// The log is unbounded: nothing evicts or flushes records, and draining them
/// sits with the caller.
pub trait MeasurementStore
where
	Self: Send + Sync,
{
	/// Appends a reading to the log.
	fn append(&self, measurement: Measurement) -> StoreFuture<'_, ()>;

	/// Returns a point-in-time copy of every reading appended so far.
	fn snapshot(&self) -> StoreFuture<'_, Vec<Measurement>>;

	/// Number of readings appended so far.
	fn count(&self) -> StoreFuture<'_, usize>;
}

/// Error type produced by [`MeasurementStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
