//! Rust’s turnkey device telemetry agent—mint shared access signatures, poll remote
//! configuration, and keep measurement cycles alive in one crate built for unattended devices.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod cycles;
pub mod error;
pub mod ext;
pub mod http;
pub mod obs;
pub mod store;
pub mod telemetry;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::DeviceId,
		cycles::DeviceAgent,
		ext::{SystemTimeSource, TimeSource},
		http::ReqwestTransport,
		store::{MeasurementStore, MemoryStore},
	};

	/// Agent type alias used by reqwest-backed integration tests.
	pub type ReqwestTestAgent = DeviceAgent<ReqwestTransport>;

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Constructs a [`DeviceAgent`] backed by an in-memory store, the system clock, and the
	/// reqwest transport used across integration tests.
	pub fn build_reqwest_test_agent(
		config_endpoint: Url,
		device: DeviceId,
	) -> (ReqwestTestAgent, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn MeasurementStore> = store_backend.clone();
		let time_source: Arc<dyn TimeSource> = Arc::new(SystemTimeSource);
		let agent = DeviceAgent::with_transport(
			test_reqwest_transport(),
			store,
			time_source,
			config_endpoint,
			device,
		);

		(agent, store_backend)
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
