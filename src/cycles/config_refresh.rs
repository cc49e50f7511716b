//! Configuration polling with wholesale snapshot replacement and jittered retries.
//!
//! The agent exposes [`DeviceAgent::refresh_config_once`] as a single poll
//! step: fetch the document, validate it, and replace the shared snapshot.
//! Denials, malformed bodies, and transport failures all clear the snapshot
//! and schedule a retry inside the same bounded window; the surrounding
//! driver never halts.

// self
use crate::{
	_prelude::*,
	config::{ConfigResponse, DeviceConfig},
	cycles::{CycleState, DeviceAgent, random_retry_delay},
	error::TransientError,
	ext::IndicatorGuard,
	http::AgentTransport,
	obs::{self, CycleKind, CycleOutcome, CycleSpan},
};

/// Outcome of a single configuration poll.
#[derive(Debug)]
pub enum ConfigPoll {
	/// A fresh snapshot was stored; poll again after the server-directed interval.
	Refreshed {
		/// `true` exactly once, on the first successful poll of the agent's
		/// lifetime; the caller starts the measurement cycle on it.
		first: bool,
		/// Server-directed refresh interval.
		next_poll: StdDuration,
	},
	/// The server refused the device or the document was unusable; the
	/// snapshot was cleared.
	Rejected {
		/// Jittered delay before the next poll.
		retry_in: StdDuration,
	},
	/// The endpoint could not be reached; the snapshot was cleared.
	Unreachable {
		/// Jittered delay before the next poll.
		retry_in: StdDuration,
	},
}
impl ConfigPoll {
	/// Delay before the next poll regardless of outcome.
	pub fn next_delay(&self) -> StdDuration {
		match self {
			Self::Refreshed { next_poll, .. } => *next_poll,
			Self::Rejected { retry_in } | Self::Unreachable { retry_in } => *retry_in,
		}
	}

	/// State the configuration cycle is in after this outcome.
	pub fn state(&self) -> CycleState {
		match self {
			Self::Refreshed { .. } => CycleState::ConfigActive,
			Self::Rejected { .. } | Self::Unreachable { .. } => CycleState::RetryBackoff,
		}
	}
}

impl<C> DeviceAgent<C>
where
	C: ?Sized + AgentTransport,
{
	/// Polls the configuration endpoint once and replaces the shared snapshot.
	pub async fn refresh_config_once(&self) -> ConfigPoll {
		const KIND: CycleKind = CycleKind::ConfigRefresh;

		let span = CycleSpan::new(KIND, "refresh_config_once");

		obs::record_cycle_outcome(KIND, CycleOutcome::Attempt);
		self.cycle_metrics.record_attempt();

		let result = span.instrument(async move { self.fetch_config().await }).await;

		match result {
			Ok(config) => {
				let next_poll = config.config_refresh_period;

				tracing::info!(
					refresh_in = ?next_poll,
					measurement_period = ?config.measurement_period,
					upload_period = ?config.upload_period,
					"configuration refreshed",
				);
				self.slot.replace(config);

				let first = self.mark_measurement_started();

				self.cycle_metrics.record_success();
				obs::record_cycle_outcome(KIND, CycleOutcome::Success);

				ConfigPoll::Refreshed { first, next_poll }
			},
			Err(err) => {
				self.slot.clear();

				let retry_in = random_retry_delay();

				tracing::warn!(error = %err, retry_in = ?retry_in, "configuration poll failed");
				self.cycle_metrics.record_retry();
				obs::record_cycle_outcome(KIND, CycleOutcome::Failure);

				match err {
					Error::Transport(_) => ConfigPoll::Unreachable { retry_in },
					_ => ConfigPoll::Rejected { retry_in },
				}
			},
		}
	}

	async fn fetch_config(&self) -> Result<DeviceConfig> {
		let _busy = IndicatorGuard::lit(self.api_indicator.as_ref());
		let response = self.transport.get(self.config_url()).await?;
		// The body is parsed regardless of HTTP status; `authorized` is the
		// only signal the endpoint commits to.
		let mut deserializer = serde_json::Deserializer::from_slice(&response.body);
		let wire: ConfigResponse =
			serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
				TransientError::ConfigResponseParse { source, status: response.status }
			})?;

		if !wire.authorized {
			return Err(Error::AuthorizationDenied { reason: wire.message });
		}

		Ok(DeviceConfig::try_from(wire)?)
	}
}
