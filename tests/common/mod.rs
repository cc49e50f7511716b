//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::{collections::VecDeque, sync::Arc};
// crates.io
use parking_lot::Mutex;
use time::{OffsetDateTime, macros};
// self
use telemetry_agent::{
	auth::{DeviceId, KeyName, SasToken, SigningKey, sas},
	cycles::DeviceAgent,
	error::TransportError,
	ext::{ClockError, TimeSource, TimeSourceFuture},
	http::{AgentTransport, PostRequest, TransportFuture, TransportResponse},
	store::{MeasurementStore, MemoryStore},
	url::Url,
};

/// Frozen instant used across the fixtures: a Wednesday, noon UTC.
pub const FROZEN_NOW: OffsetDateTime = macros::datetime!(2015-06-17 12:00 UTC);

/// Transport that replays a scripted sequence of GET results and records POSTs.
pub struct ScriptedTransport {
	responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
	/// Every POST issued through this transport, in order.
	pub posts: Mutex<Vec<PostRequest>>,
}
impl ScriptedTransport {
	pub fn new(
		responses: impl IntoIterator<Item = Result<TransportResponse, TransportError>>,
	) -> Self {
		Self {
			responses: Mutex::new(responses.into_iter().collect()),
			posts: Mutex::new(Vec::new()),
		}
	}

	pub fn ok(status: u16, body: &str) -> Result<TransportResponse, TransportError> {
		Ok(TransportResponse { status, body: body.as_bytes().to_vec() })
	}

	pub fn network_failure() -> Result<TransportResponse, TransportError> {
		Err(TransportError::network(std::io::Error::other("connection reset")))
	}
}
impl AgentTransport for ScriptedTransport {
	fn get(&self, _url: Url) -> TransportFuture<'_, TransportResponse> {
		let next = self.responses.lock().pop_front();

		Box::pin(async move {
			next.unwrap_or_else(|| {
				Err(TransportError::network(std::io::Error::other("script exhausted")))
			})
		})
	}

	fn post(&self, request: PostRequest) -> TransportFuture<'_, TransportResponse> {
		self.posts.lock().push(request);

		Box::pin(async move { Ok(TransportResponse { status: 201, body: Vec::new() }) })
	}
}

/// Time source that always returns the same instant.
pub struct StaticTimeSource(pub OffsetDateTime);
impl TimeSource for StaticTimeSource {
	fn now_utc(&self) -> TimeSourceFuture<'_> {
		let instant = self.0;

		Box::pin(async move { Ok(instant) })
	}
}

/// Time source that always fails, like a device that cannot reach its NTP pool.
pub struct FailingTimeSource;
impl TimeSource for FailingTimeSource {
	fn now_utc(&self) -> TimeSourceFuture<'_> {
		Box::pin(async { Err(ClockError::unavailable(std::io::Error::other("ntp timeout"))) })
	}
}

pub fn device() -> DeviceId {
	DeviceId::new("test-device").expect("Device fixture should be valid.")
}

pub fn signed_sas_string() -> String {
	let key = SigningKey::new(b"integration-test-key".to_vec());
	let key_name = KeyName::new("device-policy").expect("Key name fixture should be valid.");

	SasToken::sign("https://host.example.net/hub", key_name, &key, FROZEN_NOW, sas::DEFAULT_TTL)
		.expect("Signing fixture should succeed.")
		.to_string()
}

/// Authorized configuration body with the provided periods, in seconds.
pub fn config_body(measurement: u64, upload: u64, refresh: u64) -> String {
	format!(
		"{{\"authorized\":true,\"configRefreshPeriod\":{refresh},\"measurementPeriod\":{measurement},\
		\"uploadPeriod\":{upload},\"host\":{{\"primaryHost\":\"host.example.net\"}},\"sas\":\"{sas}\"}}",
		sas = signed_sas_string(),
	)
}

/// Builds an agent over the provided scripted transport with a frozen clock.
pub fn scripted_agent(transport: ScriptedTransport) -> (DeviceAgent<ScriptedTransport>, Arc<MemoryStore>) {
	scripted_agent_with_time(transport, Arc::new(StaticTimeSource(FROZEN_NOW)))
}

/// Builds an agent over the provided scripted transport and time source.
pub fn scripted_agent_with_time(
	transport: ScriptedTransport,
	time_source: Arc<dyn TimeSource>,
) -> (DeviceAgent<ScriptedTransport>, Arc<MemoryStore>) {
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn MeasurementStore> = store_backend.clone();
	let endpoint = Url::parse("https://config.example.net/api/weatherconfig")
		.expect("Config endpoint fixture should parse.");
	let agent = DeviceAgent::with_transport(transport, store, time_source, endpoint, device());

	(agent, store_backend)
}
