//! Measurement cycle: network-time-stamped readings appended to the log.
//!
//! [`DeviceAgent::measure_once`] is a single step: read the shared snapshot,
//! ask the time source for UTC now, sample the probe, and append the keyed
//! reading. Missing configuration and collaborator failures all reschedule
//! inside the bounded retry window without consuming a measurement period.

// self
use crate::{
	_prelude::*,
	cycles::{DeviceAgent, random_retry_delay},
	http::AgentTransport,
	obs::{self, CycleKind, CycleOutcome, CycleSpan},
	telemetry::Measurement,
};

/// Outcome of a single measurement step.
#[derive(Debug)]
pub enum MeasureStep {
	/// A reading was appended; measure again after the configured period.
	Recorded {
		/// The reading that was appended.
		measurement: Measurement,
		/// Configured measurement interval.
		next_in: StdDuration,
	},
	/// No configuration snapshot is available; nothing was appended.
	AwaitingConfig {
		/// Jittered delay before the next attempt.
		retry_in: StdDuration,
	},
	/// The network time source could not supply an instant.
	ClockUnavailable {
		/// Jittered delay before the next attempt.
		retry_in: StdDuration,
	},
	/// The reading could not be appended to the log.
	StoreUnavailable {
		/// Jittered delay before the next attempt.
		retry_in: StdDuration,
	},
}
impl MeasureStep {
	/// Delay before the next step regardless of outcome.
	pub fn next_delay(&self) -> StdDuration {
		match self {
			Self::Recorded { next_in, .. } => *next_in,
			Self::AwaitingConfig { retry_in }
			| Self::ClockUnavailable { retry_in }
			| Self::StoreUnavailable { retry_in } => *retry_in,
		}
	}
}

impl<C> DeviceAgent<C>
where
	C: ?Sized + AgentTransport,
{
	/// Takes one measurement if a configuration snapshot is available.
	pub async fn measure_once(&self) -> MeasureStep {
		const KIND: CycleKind = CycleKind::Measure;

		let span = CycleSpan::new(KIND, "measure_once");

		obs::record_cycle_outcome(KIND, CycleOutcome::Attempt);
		self.cycle_metrics.record_attempt();

		let step = span.instrument(async move { self.measure_step().await }).await;

		match &step {
			MeasureStep::Recorded { .. } => {
				self.cycle_metrics.record_success();
				obs::record_cycle_outcome(KIND, CycleOutcome::Success);
			},
			MeasureStep::AwaitingConfig { .. } => {
				self.cycle_metrics.record_retry();
				obs::record_cycle_outcome(KIND, CycleOutcome::Retry);
			},
			MeasureStep::ClockUnavailable { .. } | MeasureStep::StoreUnavailable { .. } => {
				self.cycle_metrics.record_retry();
				obs::record_cycle_outcome(KIND, CycleOutcome::Failure);
			},
		}

		step
	}

	async fn measure_step(&self) -> MeasureStep {
		let Some(config) = self.slot.snapshot() else {
			let retry_in = random_retry_delay();

			tracing::warn!(retry_in = ?retry_in, "no configuration snapshot; measurement skipped");

			return MeasureStep::AwaitingConfig { retry_in };
		};
		let measured_at = match self.time_source.now_utc().await {
			Ok(instant) => instant,
			Err(err) => {
				let retry_in = random_retry_delay();

				tracing::warn!(error = %err, retry_in = ?retry_in, "network time unavailable");

				return MeasureStep::ClockUnavailable { retry_in };
			},
		};
		let sample = self.probe.sample();
		let measurement =
			Measurement::new(&self.device, measured_at, sample.temperature, sample.humidity);

		if let Err(err) = self.store.append(measurement.clone()).await {
			let retry_in = random_retry_delay();

			tracing::warn!(error = %err, retry_in = ?retry_in, "measurement could not be stored");

			return MeasureStep::StoreUnavailable { retry_in };
		}

		tracing::info!(
			partition_key = %measurement.partition_key,
			row_key = %measurement.row_key,
			temperature = measurement.temperature,
			humidity = measurement.humidity,
			"measurement recorded",
		);

		MeasureStep::Recorded { measurement, next_in: config.measurement_period }
	}
}
