//! Timer-driven cycles that keep an unattended device reporting.
//!
//! Two independently scheduled cycles interleave without coordination: the
//! configuration cycle is the single writer of the shared snapshot, and the
//! measurement cycle only ever reads it. Neither cycle halts on failure;
//! every error is logged and answered with a reschedule.

pub mod common;
pub mod config_refresh;
pub mod measure;
pub mod publish;

mod metrics;

pub use common::*;
pub use config_refresh::*;
pub use measure::*;
pub use metrics::CycleMetrics;
pub use publish::*;

// std
use std::sync::atomic::{AtomicBool, Ordering};
// self
use crate::{
	_prelude::*,
	auth::DeviceId,
	config::ConfigSlot,
	ext::{BusyIndicator, NullIndicator, RandomProbe, SensorProbe, TimeSource},
	http::AgentTransport,
	store::MeasurementStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Agent specialized for the crate's default reqwest transport.
pub type ReqwestDeviceAgent = DeviceAgent<ReqwestTransport>;

/// Coordinates the configuration and measurement cycles for one device.
///
/// The agent owns every collaborator so cycle implementations can focus on
/// scheduling decisions. The configuration snapshot has exactly one writer
/// (the configuration cycle) and is replaced wholesale, so readers never
/// observe partial updates.
pub struct DeviceAgent<C>
where
	C: ?Sized + AgentTransport,
{
	/// Transport used for every outbound call.
	pub transport: Arc<C>,
	/// Append-only measurement log.
	pub store: Arc<dyn MeasurementStore>,
	/// Network-time collaborator that stamps measurements.
	pub time_source: Arc<dyn TimeSource>,
	/// Probe supplying temperature/humidity samples.
	pub probe: Arc<dyn SensorProbe>,
	/// Indicator lit while a configuration call is in flight.
	pub api_indicator: Arc<dyn BusyIndicator>,
	/// Configuration endpoint base URL.
	pub config_endpoint: Url,
	/// Identifier the device reports as.
	pub device: DeviceId,
	/// Shared configuration snapshot.
	pub slot: ConfigSlot,
	/// Shared counters for cycle steps.
	pub cycle_metrics: Arc<CycleMetrics>,
	measurement_started: Arc<AtomicBool>,
}
impl<C> DeviceAgent<C>
where
	C: ?Sized + AgentTransport,
{
	/// Creates an agent that reuses the caller-provided transport.
	pub fn with_transport(
		transport: impl Into<Arc<C>>,
		store: Arc<dyn MeasurementStore>,
		time_source: Arc<dyn TimeSource>,
		config_endpoint: Url,
		device: DeviceId,
	) -> Self {
		Self {
			transport: transport.into(),
			store,
			time_source,
			probe: Arc::new(RandomProbe),
			api_indicator: Arc::new(NullIndicator),
			config_endpoint,
			device,
			slot: ConfigSlot::default(),
			cycle_metrics: Default::default(),
			measurement_started: Default::default(),
		}
	}

	/// Sets or replaces the sensor probe.
	pub fn with_probe(mut self, probe: Arc<dyn SensorProbe>) -> Self {
		self.probe = probe;

		self
	}

	/// Sets or replaces the indicator lit during configuration calls.
	pub fn with_api_indicator(mut self, indicator: Arc<dyn BusyIndicator>) -> Self {
		self.api_indicator = indicator;

		self
	}

	/// URL of the configuration document for this device.
	pub fn config_url(&self) -> Url {
		let mut url = self.config_endpoint.clone();

		url.query_pairs_mut().append_pair("deviceId", self.device.as_ref());

		url
	}

	/// Latches the measurement-cycle start; `true` exactly once per agent.
	pub(crate) fn mark_measurement_started(&self) -> bool {
		!self.measurement_started.swap(true, Ordering::SeqCst)
	}
}
#[cfg(feature = "reqwest")]
impl DeviceAgent<ReqwestTransport> {
	/// Creates a new agent with the crate's default reqwest transport.
	pub fn new(
		store: Arc<dyn MeasurementStore>,
		time_source: Arc<dyn TimeSource>,
		config_endpoint: Url,
		device: DeviceId,
	) -> Self {
		Self::with_transport(
			ReqwestTransport::default(),
			store,
			time_source,
			config_endpoint,
			device,
		)
	}
}
impl<C> Clone for DeviceAgent<C>
where
	C: ?Sized + AgentTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			store: self.store.clone(),
			time_source: self.time_source.clone(),
			probe: self.probe.clone(),
			api_indicator: self.api_indicator.clone(),
			config_endpoint: self.config_endpoint.clone(),
			device: self.device.clone(),
			slot: self.slot.clone(),
			cycle_metrics: self.cycle_metrics.clone(),
			measurement_started: self.measurement_started.clone(),
		}
	}
}
impl<C> Debug for DeviceAgent<C>
where
	C: ?Sized + AgentTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("DeviceAgent")
			.field("device", &self.device)
			.field("config_endpoint", &self.config_endpoint)
			.field("config_present", &!self.slot.is_empty())
			.finish()
	}
}
impl<C> DeviceAgent<C>
where
	C: AgentTransport,
{
	/// Drives both cycles until the task is dropped.
	///
	/// The configuration cycle runs in the calling task; the measurement cycle
	/// is spawned exactly once, on the first successful poll. Neither cycle
	/// ever halts on failure.
	pub async fn run(self) {
		loop {
			let poll = self.refresh_config_once().await;

			if matches!(poll, ConfigPoll::Refreshed { first: true, .. }) {
				tokio::spawn(self.clone().run_measure_cycle());
			}

			tokio::time::sleep(poll.next_delay()).await;
		}
	}

	/// Drives the measurement cycle until the task is dropped.
	pub async fn run_measure_cycle(self) {
		loop {
			let step = self.measure_once().await;

			tokio::time::sleep(step.next_delay()).await;
		}
	}
}
