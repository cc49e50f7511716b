//! Thread-safe in-memory [`MeasurementStore`] for devices that never flush.

// self
use crate::{
	_prelude::*,
	store::{MeasurementStore, StoreError, StoreFuture},
	telemetry::Measurement,
};

type Log = Arc<RwLock<Vec<Measurement>>>;

/// Thread-safe append-only log kept in process memory.
///
/// Records accumulate until process exit; nothing bounds the log.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Log);
impl MemoryStore {
	fn append_now(log: Log, measurement: Measurement) -> Result<(), StoreError> {
		log.write().push(measurement);

		Ok(())
	}

	fn snapshot_now(log: Log) -> Vec<Measurement> {
		log.read().clone()
	}

	fn count_now(log: Log) -> usize {
		log.read().len()
	}
}
impl MeasurementStore for MemoryStore {
	fn append(&self, measurement: Measurement) -> StoreFuture<'_, ()> {
		let log = self.0.clone();

		Box::pin(async move { Self::append_now(log, measurement) })
	}

	fn snapshot(&self) -> StoreFuture<'_, Vec<Measurement>> {
		let log = self.0.clone();

		Box::pin(async move { Ok(Self::snapshot_now(log)) })
	}

	fn count(&self) -> StoreFuture<'_, usize> {
		let log = self.0.clone();

		Box::pin(async move { Ok(Self::count_now(log)) })
	}
}
